//! Interpretation of remote generation responses.
//!
//! Success bodies look like `{"dashboard": {...}}`. Failures carry
//! `{"detail": "..."}` and a status that tells quota exhaustion (429) and
//! rejected credentials (401) apart from other upstream trouble.

use crate::error::{DashboardError, Result};
use crate::types::Dashboard;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SuccessBody {
    dashboard: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct FailureBody {
    detail: Option<String>,
}

/// Map a status code and body to a dashboard or a remote error.
pub fn parse_dashboard_response(status: u16, body: &str) -> Result<Dashboard> {
    if !(200..300).contains(&status) {
        let detail = failure_detail(body);
        return Err(match status {
            429 => DashboardError::RemoteQuota(detail),
            401 => DashboardError::RemoteAuth(detail),
            _ => DashboardError::RemoteStatus { status, detail },
        });
    }

    let parsed: SuccessBody = serde_json::from_str(body)
        .map_err(|e| DashboardError::RemoteMalformed(format!("response is not JSON: {}", e)))?;

    let dashboard = parsed.dashboard.ok_or_else(|| {
        DashboardError::RemoteMalformed("response has no 'dashboard' field".to_string())
    })?;

    serde_json::from_value(dashboard)
        .map_err(|e| DashboardError::RemoteMalformed(format!("invalid dashboard: {}", e)))
}

fn failure_detail(body: &str) -> String {
    match serde_json::from_str::<FailureBody>(body) {
        Ok(FailureBody {
            detail: Some(detail),
        }) => detail,
        _ if body.trim().is_empty() => "no detail provided".to_string(),
        _ => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ViewSize;

    #[test]
    fn test_success_body() {
        let body = r#"{"dashboard": {
            "title": "Sales",
            "description": "Remote",
            "layout": {"columns": 2},
            "views": [{"id": "v1", "title": "Trend", "vega_lite": {"mark": "line"}}]
        }}"#;

        let dashboard = parse_dashboard_response(200, body).unwrap();
        assert_eq!(dashboard.title, "Sales");
        assert_eq!(dashboard.views.len(), 1);
        assert_eq!(dashboard.views[0].size, ViewSize::Medium);
    }

    #[test]
    fn test_quota_and_auth_statuses() {
        let quota = parse_dashboard_response(429, r#"{"detail": "quota exceeded"}"#).unwrap_err();
        assert_eq!(quota.error_code(), "REMOTE_QUOTA");
        assert!(quota.to_string().contains("quota exceeded"));

        let auth = parse_dashboard_response(401, r#"{"detail": "bad key"}"#).unwrap_err();
        assert_eq!(auth.error_code(), "REMOTE_AUTH");
    }

    #[test]
    fn test_other_statuses_keep_detail() {
        let err = parse_dashboard_response(502, r#"{"detail": "model returned junk"}"#).unwrap_err();
        match err {
            DashboardError::RemoteStatus { status, detail } => {
                assert_eq!(status, 502);
                assert_eq!(detail, "model returned junk");
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let plain = parse_dashboard_response(500, "Internal Server Error").unwrap_err();
        assert!(plain.to_string().contains("Internal Server Error"));
    }

    #[test]
    fn test_malformed_bodies() {
        let missing = parse_dashboard_response(200, r#"{"result": {}}"#).unwrap_err();
        assert_eq!(missing.error_code(), "REMOTE_MALFORMED");

        let not_json = parse_dashboard_response(200, "<html>").unwrap_err();
        assert_eq!(not_json.error_code(), "REMOTE_MALFORMED");

        let bad_shape = parse_dashboard_response(200, r#"{"dashboard": {"views": []}}"#).unwrap_err();
        assert_eq!(bad_shape.error_code(), "REMOTE_MALFORMED");
    }
}
