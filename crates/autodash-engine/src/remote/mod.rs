//! Remote dashboard generation.
//!
//! The [`RemoteDashboardProvider`] trait and response handling are always
//! available. The HTTP provider and timeout helper need the `remote` feature.

#[cfg(feature = "remote")]
mod http;
mod provider;
mod response;

#[cfg(feature = "remote")]
pub use http::{DEFAULT_BASE_URL, HttpDashboardProvider, RemoteConfig, RemoteConfigBuilder};
pub use provider::{RemoteDashboardProvider, RemoteRequest};
pub use response::parse_dashboard_response;

#[cfg(feature = "remote")]
use crate::error::{DashboardError, Result};
#[cfg(feature = "remote")]
use crate::types::Dashboard;

/// Run `provider` with an upper bound on how long the caller waits.
#[cfg(feature = "remote")]
pub async fn generate_with_timeout(
    provider: &dyn RemoteDashboardProvider,
    request: &RemoteRequest,
    timeout: std::time::Duration,
) -> Result<Dashboard> {
    match tokio::time::timeout(timeout, provider.generate(request)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                "{} provider did not answer within {}s",
                provider.name(),
                timeout.as_secs()
            );
            Err(DashboardError::RemoteTimeout(timeout.as_secs()))
        }
    }
}

#[cfg(all(test, feature = "remote"))]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;

    struct SlowProvider;

    #[async_trait]
    impl RemoteDashboardProvider for SlowProvider {
        async fn generate(&self, _request: &RemoteRequest) -> Result<Dashboard> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Err(DashboardError::RemoteMalformed("unreachable".to_string()))
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_timeout_maps_to_remote_timeout() {
        let request = RemoteRequest::new("data.csv", "a\n1\n", "anything");
        let err = generate_with_timeout(&SlowProvider, &request, Duration::from_millis(20))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "REMOTE_TIMEOUT");
    }
}
