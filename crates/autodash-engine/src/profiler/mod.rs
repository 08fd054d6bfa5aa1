//! Schema inference and column profiling.
//!
//! This module classifies each column as numeric, temporal, categorical or
//! text. The checks run in that order and the first match wins, so the
//! resulting [`Schema`] is total and exclusive by construction.

mod summary;
mod type_inference;

pub use summary::{ColumnProfile, DatasetProfile, profile_columns};

use crate::config::EngineConfig;
use crate::types::{ColumnKind, ColumnSchema, Schema, Table};
use tracing::{debug, info};
use type_inference::infer_column_kind;

/// Classifies the columns of a table.
#[derive(Debug, Clone, Default)]
pub struct SchemaInferencer {
    config: EngineConfig,
}

impl SchemaInferencer {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Infer the schema of a coerced table.
    pub fn infer(&self, table: &Table) -> Schema {
        let row_count = table.row_count();

        let columns: Vec<ColumnSchema> = table
            .columns
            .iter()
            .map(|name| {
                let kind = infer_column_kind(table.column_values(name), row_count, &self.config);
                debug!("Column '{}' classified as {}", name, kind);
                ColumnSchema {
                    name: name.clone(),
                    kind,
                }
            })
            .collect();

        let schema = Schema::new(columns);
        info!(
            "Inferred schema: {} numeric, {} temporal, {} categorical, {} text",
            schema.count_of(ColumnKind::Numeric),
            schema.count_of(ColumnKind::Temporal),
            schema.count_of(ColumnKind::Categorical),
            schema.count_of(ColumnKind::Text),
        );
        schema
    }
}
