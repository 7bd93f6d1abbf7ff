//! Error types for the Sherpa clients

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the queue store or the inference API
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Remote service returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error body returned by the service
        message: String,
    },

    /// Queue store answered 2xx but reported a command error
    #[error("Queue store error: {0}")]
    StoreError(String),

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Whether the failure came from the network or an unavailable service
    ///
    /// Transport failures are worth retrying after a backoff; the others
    /// indicate a request the service will keep rejecting.
    pub fn is_transport(&self) -> bool {
        match self {
            Self::RequestFailed(_) => true,
            Self::ApiError { status, .. } => *status >= 500 || *status == 429,
            Self::StoreError(_) | Self::ParseError(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_classification() {
        assert!(ClientError::api_error(503, "unavailable").is_transport());
        assert!(ClientError::api_error(429, "slow down").is_transport());
        assert!(!ClientError::api_error(401, "bad token").is_transport());
        assert!(!ClientError::StoreError("WRONGTYPE".to_string()).is_transport());
    }
}
