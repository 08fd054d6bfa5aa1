//! Remote dashboard provider trait.
//!
//! A remote provider receives the loaded dataset and a free-text intent and
//! answers with a complete [`Dashboard`]. The local engine never merges a
//! remote dashboard with its own; a response either replaces the current
//! dashboard wholesale or is dropped.
//!
//! # Implementing a New Provider
//!
//! 1. Create a new file in `src/remote/`
//! 2. Implement [`RemoteDashboardProvider`] for your provider struct
//! 3. Export the provider in `src/remote/mod.rs`
//!
//! # Example
//!
//! ```rust,ignore
//! use autodash_engine::remote::{HttpDashboardProvider, RemoteDashboardProvider};
//!
//! let provider = HttpDashboardProvider::new("http://127.0.0.1:8000")?;
//! let (ticket, request) = session.begin_remote("revenue by region")?;
//! let result = provider.generate(&request).await;
//! session.apply_remote(ticket, result);
//! ```

use crate::error::Result;
use crate::types::Dashboard;
use async_trait::async_trait;
use serde::Serialize;

/// What a remote provider is asked to build a dashboard from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteRequest {
    /// File name reported for the upload.
    pub file_name: String,
    /// The dataset as CSV text, header included.
    pub csv: String,
    /// Free-text description of what the user wants to see.
    pub intent: String,
}

impl RemoteRequest {
    pub fn new(
        file_name: impl Into<String>,
        csv: impl Into<String>,
        intent: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            csv: csv.into(),
            intent: intent.into(),
        }
    }
}

/// Trait for collaborators that generate whole dashboards.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a provider can be shared with the
/// task awaiting its response.
///
/// # Error Handling
///
/// Failures should use the `Remote*` variants of
/// [`DashboardError`](crate::error::DashboardError). The caller turns every
/// failure into a warning and keeps the local dashboard.
#[async_trait]
pub trait RemoteDashboardProvider: Send + Sync {
    /// Ask the collaborator for a dashboard.
    async fn generate(&self, request: &RemoteRequest) -> Result<Dashboard>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}
