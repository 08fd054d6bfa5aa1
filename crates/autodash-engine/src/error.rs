//! Custom error types for the dashboard engine.
//!
//! This module provides the error hierarchy using `thiserror`. The local
//! pipeline has exactly one hard stop ([`DashboardError::NoData`]); everything
//! else it encounters degrades to `None` or empty collections. The remaining
//! variants describe failures of the remote collaborator, configuration, and
//! I/O at the binary boundary.
//!
//! Errors are serializable so they can be handed to a UI layer as
//! `{ "code": ..., "message": ... }`.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the dashboard engine.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The loaded dataset has no rows or no columns.
    #[error("No data: load a dataset with a header and at least one row")]
    NoData,

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A filter document could not be interpreted.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// The remote service rejected the request because of quota or rate limits.
    #[error("Remote generation rate-limited: {0}")]
    RemoteQuota(String),

    /// The remote service rejected the credentials it was configured with.
    #[error("Remote generation unauthorized: {0}")]
    RemoteAuth(String),

    /// The remote service answered with a non-success status.
    #[error("Remote generation failed with status {status}: {detail}")]
    RemoteStatus { status: u16, detail: String },

    /// The remote service answered, but the body is not a dashboard document.
    #[error("Remote response malformed: {0}")]
    RemoteMalformed(String),

    /// The remote call did not complete within the configured timeout.
    #[error("Remote generation timed out after {0}s")]
    RemoteTimeout(u64),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error (only with the "remote" feature).
    #[cfg(feature = "remote")]
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<DashboardError>,
    },
}

impl DashboardError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        DashboardError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoData => "NO_DATA",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::InvalidFilter(_) => "INVALID_FILTER",
            Self::RemoteQuota(_) => "REMOTE_QUOTA",
            Self::RemoteAuth(_) => "REMOTE_AUTH",
            Self::RemoteStatus { .. } => "REMOTE_STATUS",
            Self::RemoteMalformed(_) => "REMOTE_MALFORMED",
            Self::RemoteTimeout(_) => "REMOTE_TIMEOUT",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            #[cfg(feature = "remote")]
            Self::HttpRequest(_) => "HTTP_REQUEST_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error came from the remote collaborator.
    ///
    /// Remote errors are surfaced as warnings; they never replace or clear
    /// the locally generated dashboard.
    pub fn is_remote(&self) -> bool {
        match self {
            Self::RemoteQuota(_)
            | Self::RemoteAuth(_)
            | Self::RemoteStatus { .. }
            | Self::RemoteMalformed(_)
            | Self::RemoteTimeout(_) => true,
            #[cfg(feature = "remote")]
            Self::HttpRequest(_) => true,
            Self::WithContext { source, .. } => source.is_remote(),
            _ => false,
        }
    }
}

/// Serialize implementation for UI transport.
///
/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for DashboardError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("DashboardError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| DashboardError::Io(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(DashboardError::NoData.error_code(), "NO_DATA");
        assert_eq!(
            DashboardError::RemoteStatus {
                status: 502,
                detail: "bad gateway".to_string()
            }
            .error_code(),
            "REMOTE_STATUS"
        );
    }

    #[test]
    fn test_is_remote() {
        assert!(DashboardError::RemoteTimeout(30).is_remote());
        assert!(DashboardError::RemoteAuth("invalid key".to_string()).is_remote());
        assert!(!DashboardError::NoData.is_remote());
    }

    #[test]
    fn test_io_result_context() {
        let result: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::other("disk gone"));
        let error = result.context("Failed to read sales.csv").unwrap_err();
        assert_eq!(error.error_code(), "IO_ERROR");
        assert!(error.to_string().starts_with("Failed to read sales.csv"));
    }

    #[test]
    fn test_error_serialization() {
        let error = DashboardError::InvalidFilter("region".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("INVALID_FILTER"));
        assert!(json.contains("region"));
    }

    #[test]
    fn test_with_context() {
        let error = DashboardError::RemoteMalformed("missing views".to_string())
            .with_context("While applying remote dashboard");
        assert!(error.to_string().contains("While applying remote dashboard"));
        assert_eq!(error.error_code(), "REMOTE_MALFORMED");
        assert!(error.is_remote());
    }
}
