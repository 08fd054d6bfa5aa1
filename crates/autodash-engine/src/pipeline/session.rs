//! Interactive dashboard session.
//!
//! [`DashboardSession`] owns everything that changes while a user works with
//! a dataset: the loaded table and schema, filters, chart selection, size
//! overrides and the current [`Generation`]. Every change that affects the
//! charts re-runs the pure [`generate`] pass; parsing and schema inference
//! only happen on [`DashboardSession::load`].

use super::assembler::{GenerationInput, generate};
use super::guard::{GenerationGuard, RemoteTicket};
use crate::charts::SizeOverrides;
use crate::config::EngineConfig;
use crate::error::{DashboardError, Result, ResultExt};
use crate::filter::{FilterEngine, FilterSet, Predicate, coerce_table};
use crate::parser::TabularParser;
use crate::profiler::{DatasetProfile, SchemaInferencer, profile_columns};
use crate::remote::RemoteRequest;
use crate::types::{Dashboard, Generation, RawTable, Schema, Table, ViewSize};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, warn};

/// What happened to a remote response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RemoteOutcome {
    /// The remote dashboard replaced the current one.
    Applied,
    /// A newer generation started after the request; the response was dropped.
    Superseded,
    /// The request failed; the current dashboard is unchanged.
    Failed { warning: String },
}

/// Mutable state of one dashboard editing session.
#[derive(Debug, Clone)]
pub struct DashboardSession {
    config: EngineConfig,
    source_name: String,
    source: String,
    raw: RawTable,
    table: Table,
    schema: Schema,
    filters: FilterSet,
    requested: Vec<String>,
    sizes: SizeOverrides,
    current: Option<Generation>,
    guard: GenerationGuard,
}

impl Default for DashboardSession {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl DashboardSession {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            source_name: "data.csv".to_string(),
            source: String::new(),
            raw: RawTable::default(),
            table: Table::default(),
            schema: Schema::default(),
            filters: FilterSet::new(),
            requested: Vec::new(),
            sizes: SizeOverrides::new(),
            current: None,
            guard: GenerationGuard::new(),
        }
    }

    /// Name reported for the dataset in remote uploads.
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = name.into();
        self
    }

    /// Read a file, name the session after it and [`load`](Self::load) it.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<&Generation> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?;
        if let Some(name) = path.file_name() {
            self.source_name = name.to_string_lossy().into_owned();
        }
        self.load(&text).context(format!("Failed to load {}", path.display()))
    }

    /// Parse `text`, infer its schema and generate the first dashboard.
    ///
    /// Filters and size overrides from a previous dataset are dropped; the
    /// chart selection is kept. Returns [`DashboardError::NoData`] when the
    /// text has no header or no data rows. The text itself is kept verbatim
    /// for remote uploads.
    pub fn load(&mut self, text: &str) -> Result<&Generation> {
        self.source = text.to_string();
        self.raw = TabularParser::new().parse(text);
        self.table = coerce_table(&self.raw);
        self.schema = SchemaInferencer::new(self.config.clone()).infer(&self.table);
        self.filters.clear();
        self.sizes.clear();
        self.current = None;

        info!(
            "Loaded {} rows x {} columns",
            self.table.row_count(),
            self.table.columns.len()
        );
        self.regenerate()
    }

    /// Re-run the pipeline with the current state.
    ///
    /// Supersedes any remote request still in flight.
    pub fn regenerate(&mut self) -> Result<&Generation> {
        self.guard.advance();

        let input = GenerationInput {
            table: &self.table,
            schema: &self.schema,
            filters: &self.filters,
            requested: &self.requested,
            sizes: &self.sizes,
            config: &self.config,
        };

        match generate(&input) {
            Ok(generation) => Ok(&*self.current.insert(generation)),
            Err(err) => {
                self.current = None;
                Err(err)
            }
        }
    }

    /// Set (or clear with `None`) the predicate of one column and regenerate.
    pub fn set_filter(
        &mut self,
        column: impl Into<String>,
        predicate: Option<Predicate>,
    ) -> Result<&Generation> {
        self.filters.set(column, predicate);
        self.regenerate()
    }

    /// Replace all filters and regenerate.
    pub fn set_filters(&mut self, filters: FilterSet) -> Result<&Generation> {
        self.filters = filters;
        self.regenerate()
    }

    pub fn clear_filters(&mut self) -> Result<&Generation> {
        self.filters.clear();
        self.regenerate()
    }

    /// Replace the requested chart identifiers and regenerate.
    pub fn set_selection<I, S>(&mut self, charts: I) -> Result<&Generation>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requested = charts.into_iter().map(Into::into).collect();
        self.regenerate()
    }

    /// Resize the view at `index` of the current dashboard.
    ///
    /// The size is remembered by view id so it survives later regenerations.
    pub fn resize_view(&mut self, index: usize, size: ViewSize) -> Result<()> {
        let Some(view) = self
            .current
            .as_mut()
            .and_then(|generation| generation.dashboard.views.get_mut(index))
        else {
            return Err(DashboardError::InvalidConfig(format!(
                "no view at position {}",
                index
            )));
        };

        view.size = size;
        self.sizes.set(view.id.clone(), size);
        debug!("View '{}' resized to {:?}", view.id, size);
        Ok(())
    }

    /// Start a remote request for the loaded dataset.
    ///
    /// The upload is the loaded text exactly as it was read. The returned
    /// ticket must be handed back to [`apply_remote`] together with the
    /// provider's result.
    ///
    /// [`apply_remote`]: Self::apply_remote
    pub fn begin_remote(&self, intent: impl Into<String>) -> Result<(RemoteTicket, RemoteRequest)> {
        if self.raw.is_empty() {
            return Err(DashboardError::NoData);
        }

        let request = RemoteRequest::new(self.source_name.clone(), self.source.clone(), intent);
        let ticket = self.guard.issue();
        debug!("Issued remote ticket {}", ticket.generation());
        Ok((ticket, request))
    }

    /// Apply a remote result if nothing newer has happened since `ticket`.
    ///
    /// A successful, current response replaces the dashboard wholesale (size
    /// overrides are reapplied by view id). Failures leave the current
    /// dashboard untouched.
    pub fn apply_remote(&mut self, ticket: RemoteTicket, result: Result<Dashboard>) -> RemoteOutcome {
        if !self.guard.is_current(&ticket) {
            warn!(
                "Discarding remote response for generation {} (latest is {})",
                ticket.generation(),
                self.guard.latest()
            );
            return RemoteOutcome::Superseded;
        }

        let mut dashboard = match result {
            Ok(dashboard) => dashboard,
            Err(err) => {
                warn!("Remote generation failed: {}", err);
                return RemoteOutcome::Failed {
                    warning: err.to_string(),
                };
            }
        };

        let Some(current) = self.current.as_mut() else {
            return RemoteOutcome::Failed {
                warning: DashboardError::NoData.to_string(),
            };
        };

        for view in &mut dashboard.views {
            if let Some(size) = self.sizes.get(&view.id) {
                view.size = size;
            }
        }

        info!("Applied remote dashboard with {} views", dashboard.views.len());
        current.dashboard = dashboard;
        RemoteOutcome::Applied
    }

    /// Column profiles of the loaded dataset.
    pub fn profile(&self) -> Option<DatasetProfile> {
        if self.table.columns.is_empty() {
            return None;
        }
        Some(profile_columns(
            &self.table,
            &self.schema,
            self.config.profile_sample_rows,
        ))
    }

    /// The loaded rows that pass the current filters, with their cells as read.
    pub fn filtered_raw(&self) -> RawTable {
        let matching = FilterEngine::matching_rows(&self.table, &self.filters);
        self.raw.select_rows(&matching)
    }

    pub fn generation(&self) -> Option<&Generation> {
        self.current.as_ref()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn size_overrides(&self) -> &SizeOverrides {
        &self.sizes
    }

    /// A handle on the session's generation counter.
    pub fn guard(&self) -> GenerationGuard {
        self.guard.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChartView, Layout};
    use serde_json::json;

    const SALES: &str = "region,month,revenue\n\
                         North,2024-01-01,100\n\
                         South,2024-02-01,50\n\
                         North,2024-03-01,25\n";

    fn remote_dashboard() -> Dashboard {
        Dashboard {
            title: "Remote".to_string(),
            description: String::new(),
            layout: Layout::default(),
            views: vec![ChartView {
                id: "v1".to_string(),
                title: "Remote view".to_string(),
                size: ViewSize::Medium,
                chart_spec: json!({"mark": "bar"}),
            }],
        }
    }

    #[test]
    fn test_load_rejects_empty_text() {
        let mut session = DashboardSession::default();
        assert!(matches!(session.load(""), Err(DashboardError::NoData)));
        assert!(session.generation().is_none());
    }

    #[test]
    fn test_filter_change_regenerates() {
        let mut session = DashboardSession::default();
        session.load(SALES).unwrap();

        let generation = session
            .set_filter("region", Some(Predicate::membership(["South"])))
            .unwrap();
        assert_eq!(generation.kpis.row_count, 1);
        assert_eq!(generation.kpis.primary_total, Some(50.0));

        let cleared = session.clear_filters().unwrap();
        assert_eq!(cleared.kpis.row_count, 3);
    }

    #[test]
    fn test_resize_survives_regeneration() {
        let mut session = DashboardSession::default();
        session.load(SALES).unwrap();
        session.resize_view(1, ViewSize::Large).unwrap();

        let id = session.generation().unwrap().dashboard.views[1].id.clone();
        let generation = session
            .set_filter("region", Some(Predicate::membership(["North"])))
            .unwrap();
        let view = generation.dashboard.views.iter().find(|v| v.id == id).unwrap();
        assert_eq!(view.size, ViewSize::Large);
    }

    #[test]
    fn test_resize_out_of_range() {
        let mut session = DashboardSession::default();
        session.load(SALES).unwrap();
        assert!(session.resize_view(99, ViewSize::Small).is_err());
    }

    #[test]
    fn test_remote_applied_when_current() {
        let mut session = DashboardSession::default();
        session.load(SALES).unwrap();

        let (ticket, request) = session.begin_remote("show revenue").unwrap();
        assert!(request.csv.starts_with("region,month,revenue\n"));
        assert_eq!(request.intent, "show revenue");

        let outcome = session.apply_remote(ticket, Ok(remote_dashboard()));
        assert_eq!(outcome, RemoteOutcome::Applied);
        assert_eq!(session.generation().unwrap().dashboard.title, "Remote");
    }

    #[test]
    fn test_remote_upload_is_source_text() {
        let text = "zip,amount,price\n00501,\"1,200\",1.50\n02134,300,2.00\n";
        let mut session = DashboardSession::default();
        session.load(text).unwrap();

        let (_, request) = session.begin_remote("by zip").unwrap();
        assert_eq!(request.csv, text);
    }

    #[test]
    fn test_filtered_raw_keeps_cells_as_read() {
        let text = "zip,amount,price\n00501,\"1,200\",1.50\n02134,300,2.00\n";
        let mut session = DashboardSession::default();
        session.load(text).unwrap();
        session
            .set_filter("amount", Some(Predicate::range(1000.0, 2000.0)))
            .unwrap();

        let raw = session.filtered_raw();
        assert_eq!(raw.rows, vec![vec!["00501", "1,200", "1.50"]]);
        assert_eq!(
            TabularParser::new().serialize(&raw),
            "zip,amount,price\n00501,\"1,200\",1.50\n"
        );
    }

    #[test]
    fn test_load_file_names_session() {
        let path = std::env::temp_dir().join(format!("autodash-{}-orders.csv", std::process::id()));
        std::fs::write(&path, SALES).unwrap();

        let mut session = DashboardSession::default();
        session.load_file(&path).unwrap();
        let (_, request) = session.begin_remote("trend").unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(request.file_name, path.file_name().unwrap().to_string_lossy());
        assert_eq!(request.csv, SALES);
    }

    #[test]
    fn test_load_file_missing() {
        let mut session = DashboardSession::default();
        let err = session.load_file("/nonexistent/autodash/data.csv").unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_stale_remote_discarded() {
        let mut session = DashboardSession::default();
        session.load(SALES).unwrap();

        let (ticket, _) = session.begin_remote("show revenue").unwrap();
        session
            .set_filter("region", Some(Predicate::membership(["North"])))
            .unwrap();

        let outcome = session.apply_remote(ticket, Ok(remote_dashboard()));
        assert_eq!(outcome, RemoteOutcome::Superseded);
        assert_eq!(
            session.generation().unwrap().dashboard.title,
            EngineConfig::default().dashboard_title
        );
    }

    #[test]
    fn test_remote_failure_keeps_dashboard() {
        let mut session = DashboardSession::default();
        session.load(SALES).unwrap();
        let before = session.generation().unwrap().clone();

        let (ticket, _) = session.begin_remote("anything").unwrap();
        let outcome = session.apply_remote(
            ticket,
            Err(DashboardError::RemoteQuota("quota exceeded".to_string())),
        );

        assert!(matches!(outcome, RemoteOutcome::Failed { .. }));
        assert_eq!(session.generation(), Some(&before));
    }

    #[test]
    fn test_profile_requires_data() {
        let session = DashboardSession::default();
        assert!(session.profile().is_none());

        let mut loaded = DashboardSession::default();
        loaded.load(SALES).unwrap();
        let profile = loaded.profile().unwrap();
        assert_eq!(profile.row_count, 3);
        assert_eq!(profile.columns.len(), 3);
    }
}
