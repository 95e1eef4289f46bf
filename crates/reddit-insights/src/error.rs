//! Error types for Reddit Insights client operations

use serde_json::Value;
use thiserror::Error;

/// Result type alias for Reddit Insights client operations
pub type Result<T> = std::result::Result<T, RedditInsightsError>;

/// Errors that can occur during Reddit Insights client operations
///
/// Matching on the enum as a whole handles any SDK failure; matching a single
/// variant branches on the cause. The `Display` output of every variant is its
/// message, so `err.to_string()` is what the server (or transport) reported.
#[derive(Error, Debug)]
pub enum RedditInsightsError {
    /// The server rejected the API key (HTTP 401)
    #[error("{message}")]
    Authentication {
        message: String,
        response: Option<Value>,
    },

    /// Too many requests (HTTP 429)
    #[error("{message}")]
    RateLimit {
        message: String,
        response: Option<Value>,
    },

    /// The server rejected the request parameters (HTTP 400)
    #[error("{message}")]
    Validation {
        message: String,
        response: Option<Value>,
    },

    /// Any other failed HTTP response, or a body that could not be decoded
    #[error("{message}")]
    Api {
        message: String,
        status: u16,
        response: Option<Value>,
    },

    /// No HTTP response was received (network error, timeout, bad request setup)
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl RedditInsightsError {
    pub fn authentication(message: impl Into<String>, response: Option<Value>) -> Self {
        Self::Authentication {
            message: message.into(),
            response,
        }
    }

    pub fn rate_limit(message: impl Into<String>, response: Option<Value>) -> Self {
        Self::RateLimit {
            message: message.into(),
            response,
        }
    }

    pub fn validation(message: impl Into<String>, response: Option<Value>) -> Self {
        Self::Validation {
            message: message.into(),
            response,
        }
    }

    pub fn api(message: impl Into<String>, status: u16, response: Option<Value>) -> Self {
        Self::Api {
            message: message.into(),
            status,
            response,
        }
    }

    /// Wrap a failure that happened before any HTTP response arrived.
    ///
    /// The message is prefixed with `Request failed: `.
    pub fn transport<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport {
            message: format!("Request failed: {}", source),
            source: Some(Box::new(source)),
        }
    }

    /// Transport failure without an underlying error value (e.g. a timeout)
    pub fn transport_message(detail: impl std::fmt::Display) -> Self {
        Self::Transport {
            message: format!("Request failed: {}", detail),
            source: None,
        }
    }

    /// Human-readable message
    pub fn message(&self) -> &str {
        match self {
            Self::Authentication { message, .. }
            | Self::RateLimit { message, .. }
            | Self::Validation { message, .. }
            | Self::Api { message, .. }
            | Self::Transport { message, .. } => message,
        }
    }

    /// HTTP status code, if the error came from an HTTP response
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Authentication { .. } => Some(401),
            Self::RateLimit { .. } => Some(429),
            Self::Validation { .. } => Some(400),
            Self::Api { status, .. } => Some(*status),
            Self::Transport { .. } => None,
        }
    }

    /// Parsed response body, if one was received
    pub fn response(&self) -> Option<&Value> {
        match self {
            Self::Authentication { response, .. }
            | Self::RateLimit { response, .. }
            | Self::Validation { response, .. }
            | Self::Api { response, .. } => response.as_ref(),
            Self::Transport { .. } => None,
        }
    }

    /// Whether repeating the same call later could succeed.
    ///
    /// The client never retries on its own; this is a hint for callers.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimit { .. } | Self::Transport { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            Self::Authentication { .. } | Self::Validation { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fixed_status_codes() {
        assert_eq!(
            RedditInsightsError::authentication("x", None).status_code(),
            Some(401)
        );
        assert_eq!(
            RedditInsightsError::rate_limit("x", None).status_code(),
            Some(429)
        );
        assert_eq!(
            RedditInsightsError::validation("x", None).status_code(),
            Some(400)
        );
        assert_eq!(
            RedditInsightsError::api("x", 503, None).status_code(),
            Some(503)
        );
    }

    #[test]
    fn test_transport_message_prefix() {
        let err = RedditInsightsError::transport_message("operation timed out");
        assert_eq!(err.to_string(), "Request failed: operation timed out");
        assert_eq!(err.status_code(), None);
        assert!(err.response().is_none());
    }

    #[test]
    fn test_transport_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = RedditInsightsError::transport(io);
        assert_eq!(err.message(), "Request failed: refused");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_response_body_attached() {
        let body = json!({"error": "bad key", "hint": "rotate"});
        let err = RedditInsightsError::authentication("bad key", Some(body.clone()));
        assert_eq!(err.response(), Some(&body));
        assert_eq!(err.to_string(), "bad key");
    }

    #[test]
    fn test_retryable() {
        assert!(RedditInsightsError::rate_limit("x", None).is_retryable());
        assert!(RedditInsightsError::api("x", 502, None).is_retryable());
        assert!(!RedditInsightsError::api("x", 404, None).is_retryable());
        assert!(!RedditInsightsError::validation("x", None).is_retryable());
        assert!(!RedditInsightsError::authentication("x", None).is_retryable());
    }
}
