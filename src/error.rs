// Error types for the photoframe service.
// Internal failures use FrameError; upstream fetch failures travel as ApiError data.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrameError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No usable data directory on this platform")]
    NoDataDir,
}

pub type Result<T> = std::result::Result<T, FrameError>;

/// Structured error extracted from a failed upstream call.
///
/// Fetches never propagate failures as `Err` past the fetcher boundary; they
/// return whatever accumulated plus one of these. `code` doubles as the
/// outward HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: u16,
    pub name: String,
    pub message: String,
}

/// The two ways an upstream call can fail.
#[derive(Debug)]
pub enum FetchFailure {
    /// Transport-level failure (unreachable, connection reset); no structured
    /// body is available.
    Transport(reqwest::Error),
    /// The upstream answered with a non-success status, possibly carrying a
    /// nested `{"error": {code, status, message}}` body.
    Upstream {
        status: u16,
        body: Option<serde_json::Value>,
    },
}

impl ApiError {
    /// Normalize a raw failure into the structured shape.
    pub fn from_failure(failure: FetchFailure) -> Self {
        match failure {
            FetchFailure::Transport(err) => {
                let code = err.status().map(|s| s.as_u16()).unwrap_or(500);
                ApiError {
                    code,
                    name: "TransportError".to_string(),
                    message: err.to_string(),
                }
            }
            FetchFailure::Upstream { status, body } => {
                let nested = body.as_ref().and_then(|v| v.get("error"));
                let code = nested
                    .and_then(|e| e.get("code"))
                    .and_then(|c| c.as_u64())
                    .map(|c| c as u16)
                    .unwrap_or(status);
                let name = nested
                    .and_then(|e| e.get("status"))
                    .and_then(|s| s.as_str())
                    .unwrap_or("UpstreamApiError")
                    .to_string();
                let message = nested
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                    .unwrap_or("Upstream API request failed")
                    .to_string();
                ApiError {
                    code,
                    name,
                    message,
                }
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: {}", self.code, self.name, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_upstream_body_passed_through() {
        let failure = FetchFailure::Upstream {
            status: 403,
            body: Some(json!({
                "error": {
                    "code": 401,
                    "status": "UNAUTHENTICATED",
                    "message": "Request had invalid authentication credentials."
                }
            })),
        };

        let err = ApiError::from_failure(failure);
        assert_eq!(err.code, 401);
        assert_eq!(err.name, "UNAUTHENTICATED");
        assert!(err.message.contains("invalid authentication"));
    }

    #[test]
    fn test_upstream_without_body_uses_status() {
        let failure = FetchFailure::Upstream {
            status: 503,
            body: None,
        };

        let err = ApiError::from_failure(failure);
        assert_eq!(err.code, 503);
        assert_eq!(err.name, "UpstreamApiError");
        assert_eq!(err.message, "Upstream API request failed");
    }

    #[test]
    fn test_upstream_with_unrelated_body_uses_status() {
        let failure = FetchFailure::Upstream {
            status: 502,
            body: Some(json!({"detail": "bad gateway"})),
        };

        let err = ApiError::from_failure(failure);
        assert_eq!(err.code, 502);
        assert_eq!(err.name, "UpstreamApiError");
    }
}
