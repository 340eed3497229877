use serde::Serialize;
use thiserror::Error;

/// Why a scan did not produce a result.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ScanError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("could not reach inference service: {0}")]
    Connectivity(String),

    #[error("inference service answered with HTTP {status}")]
    Service { status: u16 },

    #[error("confidence {confidence:.2} is below the threshold {threshold:.2}")]
    LowConfidence { confidence: f64, threshold: f64 },

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("scan cancelled")]
    Cancelled,
}

impl ScanError {
    /// Short text shown to the user; every variant leaves the app interactive.
    pub fn user_message(&self) -> &'static str {
        match self {
            ScanError::InvalidInput(_) => "Please select a valid image.",
            ScanError::LowConfidence { .. } => "Low confidence. Try clearer image.",
            ScanError::Connectivity(_) | ScanError::Service { .. } | ScanError::Decode(_) => {
                "Failed to connect to backend."
            }
            ScanError::Cancelled => "Scan cancelled.",
        }
    }
}

impl From<reqwest::Error> for ScanError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ScanError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ScanError::Service {
                status: status.as_u16(),
            }
        } else {
            ScanError::Connectivity(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("failed to decode persisted state: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_failures_share_one_message() {
        let connect = ScanError::Connectivity("refused".into());
        let status = ScanError::Service { status: 502 };
        let decode = ScanError::Decode("eof".into());
        assert_eq!(connect.user_message(), "Failed to connect to backend.");
        assert_eq!(status.user_message(), connect.user_message());
        assert_eq!(decode.user_message(), connect.user_message());
    }

    #[test]
    fn policy_rejections_have_their_own_messages() {
        assert_eq!(
            ScanError::InvalidInput("text/plain".into()).user_message(),
            "Please select a valid image."
        );
        let low = ScanError::LowConfidence {
            confidence: 0.4,
            threshold: 0.6,
        };
        assert_eq!(low.user_message(), "Low confidence. Try clearer image.");
    }

    #[test]
    fn scan_error_serializes_with_kind_tag() {
        let json = serde_json::to_value(ScanError::Service { status: 503 }).unwrap();
        assert_eq!(json["kind"], "service");
        assert_eq!(json["detail"]["status"], 503);

        let json = serde_json::to_value(ScanError::Cancelled).unwrap();
        assert_eq!(json["kind"], "cancelled");
    }
}
