//! Shared data model for the dashboard engine.
//!
//! Tables flow through the pipeline in two shapes: [`RawTable`] straight out
//! of the parser (string cells) and [`Table`] after coercion (tagged
//! [`Value`] cells). Everything downstream of coercion works on [`Table`].

use crate::utils::number_json;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

// ============================================================================
// Cell values
// ============================================================================

/// A coerced cell value.
///
/// Resolved once during coercion; consumers never re-sniff the raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Null,
}

static NULL_VALUE: Value = Value::Null;

impl Value {
    /// Numeric view of this value. Only `Number` cells are numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// String form used for grouping, membership and substring matching.
    ///
    /// `Null` renders as the empty string.
    pub fn display_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
            Value::Null => Ok(()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Number(n) => number_json(*n).serialize(serializer),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Null => serializer.serialize_none(),
        }
    }
}

// ============================================================================
// Tables
// ============================================================================

/// Parser output: ordered column names and string rows.
///
/// Every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.rows.is_empty()
    }

    /// Same columns, the rows at `indices` in the given order.
    ///
    /// Indices past the end are skipped.
    pub fn select_rows(&self, indices: &[usize]) -> RawTable {
        RawTable {
            columns: self.columns.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }
}

/// A coerced row, aligned to its table's column list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row {
    cells: Vec<Value>,
}

impl Row {
    pub fn new(cells: Vec<Value>) -> Self {
        Self { cells }
    }

    /// Cell at `index`, or `Null` when the row is shorter.
    pub fn get(&self, index: usize) -> &Value {
        self.cells.get(index).unwrap_or(&NULL_VALUE)
    }

    pub fn cells(&self) -> &[Value] {
        &self.cells
    }
}

/// A coerced table. Row order is source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell of `row` in the named column; `Null` for unknown columns.
    pub fn cell<'a>(&self, row: &'a Row, column: &str) -> &'a Value {
        match self.column_index(column) {
            Some(idx) => row.get(idx),
            None => &NULL_VALUE,
        }
    }

    /// All cells of a column in row order.
    pub fn column_values<'a>(&'a self, column: &str) -> impl Iterator<Item = &'a Value> + 'a {
        let idx = self.column_index(column);
        self.rows.iter().map(move |row| match idx {
            Some(i) => row.get(i),
            None => &NULL_VALUE,
        })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Same columns, a new row subset.
    pub fn with_rows(&self, rows: Vec<Row>) -> Table {
        Table {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Render back to string cells (numbers lose thousands separators).
    pub fn to_raw(&self) -> RawTable {
        let width = self.columns.len();
        RawTable {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .map(|row| (0..width).map(|i| row.get(i).display_string()).collect())
                .collect(),
        }
    }
}

// ============================================================================
// Schema
// ============================================================================

/// Semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Temporal,
    Categorical,
    Text,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Temporal => "temporal",
            Self::Categorical => "categorical",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub kind: ColumnKind,
}

/// Column classification for a table.
///
/// Each column carries exactly one [`ColumnKind`], so the four buckets are
/// disjoint and cover every column. Lookups always scan in original column
/// order, which gives "first numeric column" a deterministic meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<ColumnSchema>,
}

/// The four schema buckets as ordered name lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaBuckets {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
    pub temporal: Vec<String>,
    pub text: Vec<String>,
}

impl Schema {
    pub fn new(columns: Vec<ColumnSchema>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[ColumnSchema] {
        &self.columns
    }

    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.kind)
    }

    /// Names of the columns of `kind`, in original column order.
    pub fn names_of(&self, kind: ColumnKind) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(move |c| c.kind == kind)
            .map(|c| c.name.as_str())
    }

    /// The `n`th (zero-based) column of `kind` in original order.
    pub fn nth_of(&self, kind: ColumnKind, n: usize) -> Option<&str> {
        self.names_of(kind).nth(n)
    }

    pub fn first_of(&self, kind: ColumnKind) -> Option<&str> {
        self.nth_of(kind, 0)
    }

    pub fn count_of(&self, kind: ColumnKind) -> usize {
        self.names_of(kind).count()
    }

    pub fn buckets(&self) -> SchemaBuckets {
        let collect = |kind| self.names_of(kind).map(str::to_string).collect();
        SchemaBuckets {
            numeric: collect(ColumnKind::Numeric),
            categorical: collect(ColumnKind::Categorical),
            temporal: collect(ColumnKind::Temporal),
            text: collect(ColumnKind::Text),
        }
    }
}

// ============================================================================
// Dashboard document
// ============================================================================

/// Display size of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl std::str::FromStr for ViewSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" | "s" => Ok(Self::Small),
            "medium" | "m" => Ok(Self::Medium),
            "large" | "l" => Ok(Self::Large),
            other => Err(format!("unknown view size '{}'", other)),
        }
    }
}

/// One chart description within a dashboard.
///
/// `id` is a stable semantic key ("cat_vs_num", "time_series", ...) used for
/// deduplication. Remote dashboards name the payload `vega_lite` and may omit
/// `size`; both are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartView {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub size: ViewSize,
    #[serde(alias = "vega_lite")]
    pub chart_spec: serde_json::Value,
}

/// Layout hint for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub columns: u32,
}

impl Default for Layout {
    fn default() -> Self {
        Self { columns: 2 }
    }
}

/// The output document handed to the rendering collaborator.
///
/// Replaced wholesale on every generation; only per-view `size` is ever
/// changed in place, and only through a user resize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub views: Vec<ChartView>,
}

impl Dashboard {
    pub fn view_ids(&self) -> Vec<&str> {
        self.views.iter().map(|v| v.id.as_str()).collect()
    }
}

/// Summary metrics over the filtered rows.
///
/// Totals are `None` when the underlying column does not exist and
/// `Some(0.0)` when it exists but no rows remain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSet {
    pub primary_label: Option<String>,
    pub primary_total: Option<f64>,
    pub secondary_label: Option<String>,
    pub secondary_total: Option<f64>,
    pub avg_primary: Option<f64>,
    pub top_label: Option<String>,
    pub top_value: Option<f64>,
    pub row_count: usize,
}

/// Output of one local generation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Generation {
    pub dashboard: Dashboard,
    pub kpis: KpiSet,
}
