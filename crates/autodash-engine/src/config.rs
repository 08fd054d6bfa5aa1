//! Configuration types for the dashboard engine.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic engine setup.

use serde::{Deserialize, Serialize};

/// Default title given to locally generated dashboards.
pub const DEFAULT_DASHBOARD_TITLE: &str = "Auto Dashboard";

/// Configuration for schema inference and dashboard assembly.
///
/// Use [`EngineConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use autodash_engine::config::EngineConfig;
///
/// let config = EngineConfig::builder()
///     .numeric_ratio(0.9)
///     .layout_columns(3)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// A column is numeric when the fraction of non-empty values that parse
    /// as numbers reaches this ratio.
    /// Default: 0.8
    pub numeric_ratio: f64,

    /// A column is temporal when the fraction of year-like or ISO-date-like
    /// values strictly exceeds this ratio.
    /// Default: 0.6
    pub temporal_ratio: f64,

    /// Lower bound of the distinct-value allowance for categorical columns.
    /// Default: 50
    pub categorical_min_distinct: usize,

    /// Fraction of the row count allowed as distinct values for categorical
    /// columns (the allowance is the larger of this and the lower bound).
    /// Default: 0.2
    pub categorical_row_fraction: f64,

    /// Column count of the layout hint handed to the renderer.
    /// Default: 2
    pub layout_columns: u32,

    /// Title of locally generated dashboards.
    /// Default: "Auto Dashboard"
    pub dashboard_title: String,

    /// Number of leading rows used for column profiles and remote context.
    /// Default: 200
    pub profile_sample_rows: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            numeric_ratio: 0.8,
            temporal_ratio: 0.6,
            categorical_min_distinct: 50,
            categorical_row_fraction: 0.2,
            layout_columns: 2,
            dashboard_title: DEFAULT_DASHBOARD_TITLE.to_string(),
            profile_sample_rows: 200,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (field, value) in [
            ("numeric_ratio", self.numeric_ratio),
            ("temporal_ratio", self.temporal_ratio),
            ("categorical_row_fraction", self.categorical_row_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigValidationError::InvalidThreshold {
                    field: field.to_string(),
                    value,
                });
            }
        }

        if self.layout_columns == 0 {
            return Err(ConfigValidationError::InvalidLayoutColumns(
                self.layout_columns,
            ));
        }

        if self.profile_sample_rows == 0 {
            return Err(ConfigValidationError::InvalidSampleRows(
                self.profile_sample_rows,
            ));
        }

        Ok(())
    }

    /// Distinct-value allowance for a categorical column in a table of
    /// `row_count` rows.
    pub fn categorical_allowance(&self, row_count: usize) -> f64 {
        (self.categorical_min_distinct as f64)
            .max(self.categorical_row_fraction * row_count as f64)
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Invalid layout columns: {0} (must be at least 1)")]
    InvalidLayoutColumns(u32),

    #[error("Invalid profile sample rows: {0} (must be at least 1)")]
    InvalidSampleRows(usize),
}

impl From<ConfigValidationError> for crate::error::DashboardError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::DashboardError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`EngineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    numeric_ratio: Option<f64>,
    temporal_ratio: Option<f64>,
    categorical_min_distinct: Option<usize>,
    categorical_row_fraction: Option<f64>,
    layout_columns: Option<u32>,
    dashboard_title: Option<String>,
    profile_sample_rows: Option<usize>,
}

impl EngineConfigBuilder {
    /// Set the parse-success ratio above which a column is numeric.
    ///
    /// # Arguments
    /// * `ratio` - Value between 0.0 and 1.0 (e.g., 0.8 = 80%)
    pub fn numeric_ratio(mut self, ratio: f64) -> Self {
        self.numeric_ratio = Some(ratio);
        self
    }

    /// Set the date-pattern ratio above which a column is temporal.
    pub fn temporal_ratio(mut self, ratio: f64) -> Self {
        self.temporal_ratio = Some(ratio);
        self
    }

    /// Set the minimum distinct-value allowance for categorical columns.
    pub fn categorical_min_distinct(mut self, count: usize) -> Self {
        self.categorical_min_distinct = Some(count);
        self
    }

    /// Set the row fraction used for the categorical distinct-value allowance.
    pub fn categorical_row_fraction(mut self, fraction: f64) -> Self {
        self.categorical_row_fraction = Some(fraction);
        self
    }

    /// Set the layout column hint.
    pub fn layout_columns(mut self, columns: u32) -> Self {
        self.layout_columns = Some(columns);
        self
    }

    /// Set the title of locally generated dashboards.
    pub fn dashboard_title(mut self, title: impl Into<String>) -> Self {
        self.dashboard_title = Some(title.into());
        self
    }

    /// Set how many leading rows feed column profiles.
    pub fn profile_sample_rows(mut self, rows: usize) -> Self {
        self.profile_sample_rows = Some(rows);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `EngineConfig` or an error if validation fails.
    pub fn build(self) -> Result<EngineConfig, ConfigValidationError> {
        let defaults = EngineConfig::default();
        let config = EngineConfig {
            numeric_ratio: self.numeric_ratio.unwrap_or(defaults.numeric_ratio),
            temporal_ratio: self.temporal_ratio.unwrap_or(defaults.temporal_ratio),
            categorical_min_distinct: self
                .categorical_min_distinct
                .unwrap_or(defaults.categorical_min_distinct),
            categorical_row_fraction: self
                .categorical_row_fraction
                .unwrap_or(defaults.categorical_row_fraction),
            layout_columns: self.layout_columns.unwrap_or(defaults.layout_columns),
            dashboard_title: self.dashboard_title.unwrap_or(defaults.dashboard_title),
            profile_sample_rows: self
                .profile_sample_rows
                .unwrap_or(defaults.profile_sample_rows),
        };

        config.validate()?;
        Ok(config)
    }
}
