//! HTTP provider for a dashboard-generation backend.
//!
//! The backend accepts a multipart upload (`file` with the raw CSV and
//! `intent` with the free-text request) at `{base_url}/generate_dashboard`.

use super::provider::{RemoteDashboardProvider, RemoteRequest};
use super::response::parse_dashboard_response;
use crate::error::{DashboardError, Result};
use crate::types::Dashboard;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::{debug, info};

/// Default backend address.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Default endpoint path below the base URL.
const DEFAULT_ENDPOINT: &str = "generate_dashboard";

/// Default timeout for remote generation in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the HTTP provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Backend address, e.g. "http://127.0.0.1:8000".
    pub base_url: String,
    /// Endpoint path appended to `base_url`.
    pub endpoint: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl RemoteConfig {
    /// Create a new configuration builder.
    pub fn builder() -> RemoteConfigBuilder {
        RemoteConfigBuilder::default()
    }

    /// Full URL of the generation endpoint.
    pub fn url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.endpoint.trim_start_matches('/')
        )
    }
}

/// Builder for [`RemoteConfig`].
#[derive(Debug, Default)]
pub struct RemoteConfigBuilder {
    base_url: Option<String>,
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
}

impl RemoteConfigBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout in seconds.
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    pub fn build(self) -> RemoteConfig {
        RemoteConfig {
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            endpoint: self.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Dashboard provider backed by an HTTP service.
///
/// # Example
///
/// ```rust,ignore
/// use autodash_engine::remote::{HttpDashboardProvider, RemoteConfig};
///
/// let config = RemoteConfig::builder()
///     .base_url("http://localhost:8000")
///     .timeout_secs(60)
///     .build();
/// let provider = HttpDashboardProvider::with_config(config)?;
/// ```
pub struct HttpDashboardProvider {
    config: RemoteConfig,
    client: Client,
}

impl HttpDashboardProvider {
    /// Create a provider for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_config(RemoteConfig::builder().base_url(base_url).build())
    }

    /// Create a provider with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_config(config: RemoteConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    fn build_form(request: &RemoteRequest) -> Result<Form> {
        let file = Part::bytes(request.csv.clone().into_bytes())
            .file_name(request.file_name.clone())
            .mime_str("text/csv")?;

        Ok(Form::new()
            .part("file", file)
            .text("intent", request.intent.clone()))
    }

    fn map_transport_error(&self, err: reqwest::Error) -> DashboardError {
        if err.is_timeout() {
            DashboardError::RemoteTimeout(self.config.timeout_secs)
        } else {
            DashboardError::HttpRequest(err)
        }
    }
}

#[async_trait]
impl RemoteDashboardProvider for HttpDashboardProvider {
    async fn generate(&self, request: &RemoteRequest) -> Result<Dashboard> {
        let url = self.config.url();
        debug!("Posting {} bytes to {}", request.csv.len(), url);

        let response = self
            .client
            .post(&url)
            .multipart(Self::build_form(request)?)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let dashboard = parse_dashboard_response(status, &body)?;
        info!(
            "Remote backend returned '{}' with {} views",
            dashboard.title,
            dashboard.views.len()
        );
        Ok(dashboard)
    }

    fn name(&self) -> &str {
        "HTTP"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder_defaults() {
        let config = RemoteConfig::builder().build();
        assert_eq!(config, RemoteConfig::default());
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.url(), "http://127.0.0.1:8000/generate_dashboard");
    }

    #[test]
    fn test_config_builder_custom_values() {
        let config = RemoteConfig::builder()
            .base_url("https://dash.example.com/")
            .endpoint("/v2/generate")
            .timeout_secs(5)
            .build();

        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.url(), "https://dash.example.com/v2/generate");
    }

    #[test]
    fn test_provider_creation() {
        let provider = HttpDashboardProvider::new("http://localhost:9000").unwrap();
        assert_eq!(provider.name(), "HTTP");
        assert_eq!(provider.config().base_url, "http://localhost:9000");
    }
}
