//! Error types for image operations.

use std::time::Duration;

/// Errors that can occur while running an image operation.
#[derive(Debug, thiserror::Error)]
pub enum ForgeError {
    /// No API credential configured.
    #[error("configuration error: {0}")]
    Config(String),

    /// Reading a local image file failed.
    #[error("failed to read image file: {0}")]
    Read(String),

    /// Input image rejected before dispatch (unsupported type, too large).
    #[error("invalid image: {0}")]
    InvalidAsset(String),

    /// Rate limit exceeded upstream.
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Delay suggested by the upstream `Retry-After` header, if present.
        retry_after: Option<Duration>,
    },

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Upstream {
        /// HTTP status code reported upstream.
        status: u16,
        /// Sanitized upstream error message.
        message: String,
    },

    /// The call succeeded but the response carried nothing usable.
    #[error("empty response from the API")]
    EmptyResponse,

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to decode base64 data.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (e.g., saving a result).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ForgeError {
    /// Returns true if this error is likely transient and worth retrying.
    ///
    /// The gateway never retries on its own; callers that choose to must
    /// re-dispatch themselves.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Network(_))
    }

    /// Returns the suggested retry delay, if available.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            Self::Network(_) => Some(Duration::from_secs(2)),
            _ => None,
        }
    }
}

/// Result type alias for image operations.
pub type Result<T> = std::result::Result<T, ForgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable() {
        assert!(ForgeError::RateLimited { retry_after: None }.is_retryable());

        assert!(!ForgeError::Config("missing key".into()).is_retryable());
        assert!(!ForgeError::Read("gone".into()).is_retryable());
        assert!(!ForgeError::EmptyResponse.is_retryable());
        assert!(!ForgeError::Decode("bad base64".into()).is_retryable());
    }

    #[test]
    fn test_retry_after() {
        let rate_limited = ForgeError::RateLimited {
            retry_after: Some(Duration::from_secs(60)),
        };
        assert_eq!(rate_limited.retry_after(), Some(Duration::from_secs(60)));

        let rate_limited_no_hint = ForgeError::RateLimited { retry_after: None };
        assert_eq!(rate_limited_no_hint.retry_after(), None);

        let config = ForgeError::Config("missing key".into());
        assert_eq!(config.retry_after(), None);
    }

    #[test]
    fn test_error_display() {
        let err = ForgeError::Upstream {
            status: 500,
            message: "Internal error".into(),
        };
        assert_eq!(err.to_string(), "API error: 500 - Internal error");

        let err = ForgeError::EmptyResponse;
        assert_eq!(err.to_string(), "empty response from the API");
    }
}
