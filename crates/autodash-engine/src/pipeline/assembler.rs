//! Dashboard assembly and the pure generation pass.

use crate::charts::{ChartSelector, SizeOverrides};
use crate::config::EngineConfig;
use crate::error::{DashboardError, Result};
use crate::filter::{FilterEngine, FilterSet};
use crate::kpi::KpiAggregator;
use crate::types::{ChartView, Dashboard, Generation, Layout, Schema, Table};
use tracing::info;

/// Packages views into a [`Dashboard`].
#[derive(Debug, Clone, Copy)]
pub struct DashboardAssembler {
    layout: Layout,
}

impl Default for DashboardAssembler {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
        }
    }
}

impl DashboardAssembler {
    pub fn new(layout_columns: u32) -> Self {
        Self {
            layout: Layout {
                columns: layout_columns,
            },
        }
    }

    pub fn assemble(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
        views: Vec<ChartView>,
    ) -> Dashboard {
        Dashboard {
            title: title.into(),
            description: description.into(),
            layout: self.layout,
            views,
        }
    }
}

/// Everything one generation pass depends on.
///
/// `table` and `schema` describe the whole loaded dataset; filtering happens
/// inside [`generate`].
#[derive(Debug, Clone, Copy)]
pub struct GenerationInput<'a> {
    pub table: &'a Table,
    pub schema: &'a Schema,
    pub filters: &'a FilterSet,
    pub requested: &'a [String],
    pub sizes: &'a SizeOverrides,
    pub config: &'a EngineConfig,
}

/// Run filter, chart selection, KPIs and assembly.
///
/// Pure: the same input always yields the same [`Generation`]. Fails only
/// when the loaded dataset has no columns or no rows; a filter that removes
/// every row still produces a dashboard.
pub fn generate(input: &GenerationInput<'_>) -> Result<Generation> {
    if input.table.columns.is_empty() || input.table.rows.is_empty() {
        return Err(DashboardError::NoData);
    }

    let filtered = FilterEngine::apply(input.table, input.filters);
    let views = ChartSelector::select(&filtered, input.schema, input.requested, input.sizes);
    let kpis = KpiAggregator::compute(&filtered, input.schema);

    info!(
        "Generated {} views from {} of {} rows",
        views.len(),
        filtered.row_count(),
        input.table.row_count()
    );

    let description = format!(
        "{} of {} rows, {} columns",
        filtered.row_count(),
        input.table.row_count(),
        input.table.columns.len()
    );
    let dashboard = DashboardAssembler::new(input.config.layout_columns).assemble(
        input.config.dashboard_title.clone(),
        description,
        views,
    );

    Ok(Generation { dashboard, kpis })
}
