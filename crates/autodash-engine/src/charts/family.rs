//! Chart families and their column preconditions.

use crate::types::{ColumnKind, Schema};
use serde::{Deserialize, Serialize};
use std::fmt;

/// View id for categorical-vs-numeric bars.
pub const CAT_VS_NUM: &str = "cat_vs_num";
/// View id for the temporal trend.
pub const TIME_SERIES: &str = "time_series";
/// View id for the numeric breakdown.
pub const NUMERIC_PIE: &str = "numeric_pie";
/// View id for numeric-vs-numeric scatter.
pub const NUM_VS_NUM: &str = "num_vs_num";

/// A named chart shape the user can request.
///
/// Several families share a view id; the first one requested wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartFamily {
    Bar,
    Column,
    Line,
    Area,
    TimeSeries,
    Pie,
    Donut,
    Scatter,
}

impl ChartFamily {
    /// Interpret a user-facing chart identifier.
    ///
    /// Matching ignores case, separators and a trailing "chart", "plot" or
    /// "graph", so "Bar Chart", "bar" and "BAR_CHART" are all [`ChartFamily::Bar`].
    pub fn parse(identifier: &str) -> Option<Self> {
        let mut key: String = identifier
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();

        for suffix in ["chart", "plot", "graph"] {
            if key.len() > suffix.len()
                && let Some(stripped) = key.strip_suffix(suffix)
            {
                key = stripped.to_string();
                break;
            }
        }

        match key.as_str() {
            "bar" => Some(Self::Bar),
            "column" => Some(Self::Column),
            "line" => Some(Self::Line),
            "area" => Some(Self::Area),
            "timeseries" | "trend" => Some(Self::TimeSeries),
            "pie" => Some(Self::Pie),
            "donut" | "doughnut" => Some(Self::Donut),
            "scatter" => Some(Self::Scatter),
            _ => None,
        }
    }

    /// Deduplication key of the view this family produces.
    pub fn view_id(&self) -> &'static str {
        match self {
            Self::Bar | Self::Column => CAT_VS_NUM,
            Self::Line | Self::Area | Self::TimeSeries => TIME_SERIES,
            Self::Pie | Self::Donut => NUMERIC_PIE,
            Self::Scatter => NUM_VS_NUM,
        }
    }

    /// Whether the schema has the columns this family needs.
    pub fn is_realizable(&self, schema: &Schema) -> bool {
        let numeric = schema.count_of(ColumnKind::Numeric);
        match self.view_id() {
            CAT_VS_NUM => numeric >= 1 && schema.count_of(ColumnKind::Categorical) >= 1,
            TIME_SERIES => numeric >= 1 && schema.count_of(ColumnKind::Temporal) >= 1,
            NUMERIC_PIE => numeric >= 1,
            _ => numeric >= 2,
        }
    }
}

impl fmt::Display for ChartFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bar => "Bar Chart",
            Self::Column => "Column Chart",
            Self::Line => "Line Chart",
            Self::Area => "Area Chart",
            Self::TimeSeries => "Time Series",
            Self::Pie => "Pie Chart",
            Self::Donut => "Donut Chart",
            Self::Scatter => "Scatter Plot",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnSchema;

    fn schema(kinds: &[(&str, ColumnKind)]) -> Schema {
        Schema::new(
            kinds
                .iter()
                .map(|(name, kind)| ColumnSchema {
                    name: name.to_string(),
                    kind: *kind,
                })
                .collect(),
        )
    }

    #[test]
    fn test_parse_identifiers() {
        assert_eq!(ChartFamily::parse("Bar Chart"), Some(ChartFamily::Bar));
        assert_eq!(ChartFamily::parse("column"), Some(ChartFamily::Column));
        assert_eq!(ChartFamily::parse("Time-Series"), Some(ChartFamily::TimeSeries));
        assert_eq!(ChartFamily::parse("DOUGHNUT_CHART"), Some(ChartFamily::Donut));
        assert_eq!(ChartFamily::parse("Scatter Plot"), Some(ChartFamily::Scatter));
        assert_eq!(ChartFamily::parse("Heatmap"), None);
        assert_eq!(ChartFamily::parse("chart"), None);
        assert_eq!(ChartFamily::parse(""), None);
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for family in [
            ChartFamily::Bar,
            ChartFamily::Column,
            ChartFamily::Line,
            ChartFamily::Area,
            ChartFamily::TimeSeries,
            ChartFamily::Pie,
            ChartFamily::Donut,
            ChartFamily::Scatter,
        ] {
            assert_eq!(ChartFamily::parse(&family.to_string()), Some(family));
        }
    }

    #[test]
    fn test_shared_view_ids() {
        assert_eq!(ChartFamily::Bar.view_id(), ChartFamily::Column.view_id());
        assert_eq!(ChartFamily::Line.view_id(), ChartFamily::TimeSeries.view_id());
        assert_eq!(ChartFamily::Pie.view_id(), ChartFamily::Donut.view_id());
    }

    #[test]
    fn test_preconditions() {
        let only_numeric = schema(&[("amount", ColumnKind::Numeric)]);
        assert!(!ChartFamily::Bar.is_realizable(&only_numeric));
        assert!(!ChartFamily::Line.is_realizable(&only_numeric));
        assert!(ChartFamily::Pie.is_realizable(&only_numeric));
        assert!(!ChartFamily::Scatter.is_realizable(&only_numeric));

        let full = schema(&[
            ("region", ColumnKind::Categorical),
            ("day", ColumnKind::Temporal),
            ("amount", ColumnKind::Numeric),
            ("units", ColumnKind::Numeric),
        ]);
        assert!(ChartFamily::Column.is_realizable(&full));
        assert!(ChartFamily::Area.is_realizable(&full));
        assert!(ChartFamily::Scatter.is_realizable(&full));

        let text_only = schema(&[("notes", ColumnKind::Text)]);
        assert!(!ChartFamily::Donut.is_realizable(&text_only));
    }
}
