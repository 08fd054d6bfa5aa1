//! Chart selection.
//!
//! Turns the user's requested chart identifiers into an ordered, deduplicated
//! list of [`ChartView`]s whose preconditions hold for the current schema.

mod aggregate;
mod family;
pub mod vegalite;

pub use aggregate::{BLANK_LABEL, column_total, numeric_pairs, order_chronologically, sum_by_group};
pub use family::{CAT_VS_NUM, ChartFamily, NUM_VS_NUM, NUMERIC_PIE, TIME_SERIES};

use crate::types::{ChartView, ColumnKind, Schema, Table, ViewSize};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;
use vegalite::TrendMark;

/// Families tried, in order, when no requested chart could be produced.
const FALLBACK: [ChartFamily; 3] = [ChartFamily::Bar, ChartFamily::TimeSeries, ChartFamily::Pie];

/// Families appended to every selection when their view is missing.
const SUPPLEMENTS: [ChartFamily; 2] = [ChartFamily::TimeSeries, ChartFamily::Pie];

/// User-chosen view sizes keyed by view id.
///
/// Keyed by id rather than position so a resize survives regenerations that
/// reorder or drop views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SizeOverrides(BTreeMap<String, ViewSize>);

impl SizeOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, view_id: impl Into<String>, size: ViewSize) {
        self.0.insert(view_id.into(), size);
    }

    pub fn get(&self, view_id: &str) -> Option<ViewSize> {
        self.0.get(view_id).copied()
    }

    pub fn remove(&mut self, view_id: &str) -> Option<ViewSize> {
        self.0.remove(view_id)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Picks and parameterizes chart views.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartSelector;

impl ChartSelector {
    /// Produce the views for `requested` over the filtered `table`.
    ///
    /// Unknown identifiers and families whose columns are missing produce no
    /// view. At most one view is emitted per view id; the first request wins.
    pub fn select(
        table: &Table,
        schema: &Schema,
        requested: &[String],
        overrides: &SizeOverrides,
    ) -> Vec<ChartView> {
        let mut picker = Picker::new(table, schema);

        for identifier in requested {
            match ChartFamily::parse(identifier) {
                Some(family) => picker.push(family),
                None => debug!("Skipping unknown chart type '{}'", identifier),
            }
        }

        if picker.views.is_empty() {
            debug!("No requested chart could be built, using fallback set");
            for family in FALLBACK {
                picker.push(family);
            }
        }

        for family in SUPPLEMENTS {
            picker.push(family);
        }

        let mut views = picker.views;
        for (position, view) in views.iter_mut().enumerate() {
            view.size = overrides.get(&view.id).unwrap_or(if position == 0 {
                ViewSize::Small
            } else {
                ViewSize::Medium
            });
        }
        views
    }
}

/// Accumulates views while enforcing preconditions and id uniqueness.
struct Picker<'a> {
    table: &'a Table,
    schema: &'a Schema,
    seen: HashSet<&'static str>,
    views: Vec<ChartView>,
}

impl<'a> Picker<'a> {
    fn new(table: &'a Table, schema: &'a Schema) -> Self {
        Self {
            table,
            schema,
            seen: HashSet::new(),
            views: Vec::new(),
        }
    }

    fn push(&mut self, family: ChartFamily) {
        let id = family.view_id();
        if self.seen.contains(id) {
            return;
        }
        if !family.is_realizable(self.schema) {
            debug!("Skipping {}: required columns not present", family);
            return;
        }
        if let Some(view) = build_view(family, self.table, self.schema) {
            self.seen.insert(id);
            self.views.push(view);
        }
    }
}

fn build_view(family: ChartFamily, table: &Table, schema: &Schema) -> Option<ChartView> {
    let numeric = schema.first_of(ColumnKind::Numeric)?;

    let (title, chart_spec) = match family {
        ChartFamily::Bar | ChartFamily::Column => {
            let category = schema.first_of(ColumnKind::Categorical)?;
            let groups = sum_by_group(table, category, numeric);
            (
                format!("{} by {}", numeric, category),
                vegalite::category_bars(category, numeric, &groups),
            )
        }
        ChartFamily::Line | ChartFamily::Area | ChartFamily::TimeSeries => {
            let temporal = schema.first_of(ColumnKind::Temporal)?;
            let mut points = sum_by_group(table, temporal, numeric);
            order_chronologically(&mut points);
            let mark = if family == ChartFamily::Area {
                TrendMark::Area
            } else {
                TrendMark::Line
            };
            (
                format!("{} over {}", numeric, temporal),
                vegalite::time_series(temporal, numeric, &points, mark),
            )
        }
        ChartFamily::Pie | ChartFamily::Donut => {
            let totals: Vec<(String, f64)> = schema
                .names_of(ColumnKind::Numeric)
                .map(|name| (name.to_string(), column_total(table, name)))
                .collect();
            (
                "Totals by measure".to_string(),
                vegalite::numeric_breakdown(&totals, family == ChartFamily::Donut),
            )
        }
        ChartFamily::Scatter => {
            let y = schema.nth_of(ColumnKind::Numeric, 1)?;
            let pairs = numeric_pairs(table, numeric, y);
            (
                format!("{} vs {}", y, numeric),
                vegalite::scatter(numeric, y, &pairs),
            )
        }
    };

    Some(ChartView {
        id: family.view_id().to_string(),
        title,
        size: ViewSize::default(),
        chart_spec,
    })
}
