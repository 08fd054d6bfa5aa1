//! Auto Dashboard Engine
//!
//! A local, schema-inference-driven dashboard generator: load a delimited
//! text dataset, classify its columns, and get a ready-to-render dashboard of
//! Vega-Lite views plus headline metrics.
//!
//! # Overview
//!
//! - **Parsing**: Quote-aware CSV reading and writing ([`TabularParser`])
//! - **Schema Inference**: Numeric, temporal, categorical and text columns ([`SchemaInferencer`])
//! - **Filtering**: Membership, range and substring predicates combined by AND ([`FilterEngine`])
//! - **Chart Selection**: Deduplicated views with fallback and supplements ([`ChartSelector`])
//! - **KPIs**: Totals, average and top row over the filtered data ([`KpiAggregator`])
//! - **Remote Generation**: Optional whole-dashboard replacement from a backend,
//!   guarded against stale responses ([`remote`], [`GenerationGuard`])
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use autodash_engine::{DashboardSession, Predicate};
//!
//! let mut session = DashboardSession::default();
//! session.load(&std::fs::read_to_string("sales.csv")?)?;
//!
//! session.set_selection(["Bar Chart", "Scatter Plot"])?;
//! let generation = session.set_filter("region", Some(Predicate::membership(["North"])))?;
//!
//! println!("{}", serde_json::to_string_pretty(&generation.dashboard)?);
//! println!("Total: {:?}", generation.kpis.primary_total);
//! ```
//!
//! # Pure Generation
//!
//! Everything a session does funnels through [`generate`], which has no
//! hidden state:
//!
//! ```rust,ignore
//! use autodash_engine::*;
//!
//! let table = coerce_table(&TabularParser::new().parse(text));
//! let schema = SchemaInferencer::default().infer(&table);
//! let config = EngineConfig::default();
//!
//! let generation = generate(&GenerationInput {
//!     table: &table,
//!     schema: &schema,
//!     filters: &FilterSet::new(),
//!     requested: &["Line Chart".to_string()],
//!     sizes: &SizeOverrides::new(),
//!     config: &config,
//! })?;
//! ```
//!
//! # Remote Generation
//!
//! A remote dashboard replaces the local one only if no filter, selection or
//! reload happened while it was in flight:
//!
//! ```rust,ignore
//! use autodash_engine::remote::{HttpDashboardProvider, RemoteDashboardProvider};
//!
//! let provider = HttpDashboardProvider::new("http://127.0.0.1:8000")?;
//! let (ticket, request) = session.begin_remote("monthly revenue trend")?;
//! let result = provider.generate(&request).await;
//!
//! match session.apply_remote(ticket, result) {
//!     RemoteOutcome::Applied => println!("Remote dashboard applied"),
//!     RemoteOutcome::Superseded => println!("Stale response dropped"),
//!     RemoteOutcome::Failed { warning } => eprintln!("Warning: {}", warning),
//! }
//! ```

pub mod charts;
pub mod config;
pub mod error;
pub mod filter;
pub mod kpi;
pub mod parser;
pub mod pipeline;
pub mod profiler;
pub mod remote;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use charts::{ChartFamily, ChartSelector, SizeOverrides};
pub use config::{ConfigValidationError, EngineConfig, EngineConfigBuilder};
pub use error::{DashboardError, Result as DashboardResult, ResultExt};
pub use filter::{FilterEngine, FilterSet, Predicate, coerce_table, coerce_value};
pub use kpi::KpiAggregator;
pub use parser::TabularParser;
pub use pipeline::{
    DashboardAssembler, DashboardSession, GenerationGuard, GenerationInput, RemoteOutcome,
    RemoteTicket, generate,
};
pub use profiler::{ColumnProfile, DatasetProfile, SchemaInferencer, profile_columns};
pub use types::{
    ChartView, ColumnKind, ColumnSchema, Dashboard, Generation, KpiSet, Layout, RawTable, Row,
    Schema, SchemaBuckets, Table, Value, ViewSize,
};
