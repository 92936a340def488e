//! Error types for CampusNet AI operations.

use std::fmt;

/// The main error type for AI operations.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// Caller-side precondition violation, rejected before any network call
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Endpoint unreachable or transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Endpoint answered with a non-success status
    #[error("Endpoint returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// No response within the configured bound
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Malformed JSON in a structured response
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Well-formed JSON that does not match the declared shape
    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    /// Provider-specific errors
    #[error("Provider error: {0}")]
    Provider(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The operation already has a call in flight
    #[error("Operation busy: {0}")]
    Busy(String),
}

/// Coarse error taxonomy used for logging and fallback reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    Network,
    Timeout,
    Parse,
    SchemaViolation,
    Busy,
    Other,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::Network => "network",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Parse => "parse",
            ErrorKind::SchemaViolation => "schema_violation",
            ErrorKind::Busy => "busy",
            ErrorKind::Other => "other",
        };
        f.write_str(name)
    }
}

impl AiError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a status error
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a schema violation error
    pub fn schema_violation(msg: impl Into<String>) -> Self {
        Self::SchemaViolation(msg.into())
    }

    /// Create a provider error
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a busy error
    pub fn busy(msg: impl Into<String>) -> Self {
        Self::Busy(msg.into())
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AiError::InvalidInput(_) => ErrorKind::InvalidInput,
            AiError::Network(_) | AiError::Status { .. } | AiError::Provider(_) => {
                ErrorKind::Network
            }
            AiError::Timeout(_) => ErrorKind::Timeout,
            AiError::Parse(_) => ErrorKind::Parse,
            AiError::SchemaViolation(_) => ErrorKind::SchemaViolation,
            AiError::Busy(_) => ErrorKind::Busy,
            AiError::Configuration(_) => ErrorKind::Other,
        }
    }
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else if err.is_decode() {
            Self::Provider(format!("Undecodable response body: {}", err))
        } else {
            Self::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_collapses_transport_failures() {
        assert_eq!(AiError::network("down").kind(), ErrorKind::Network);
        assert_eq!(AiError::status(503, "unavailable").kind(), ErrorKind::Network);
        assert_eq!(AiError::timeout("30s").kind(), ErrorKind::Timeout);
        assert_eq!(AiError::schema_violation("$.x").kind(), ErrorKind::SchemaViolation);
    }

    #[test]
    fn test_parse_error_from_serde() {
        let err: AiError = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ErrorKind::SchemaViolation.to_string(), "schema_violation");
        assert_eq!(AiError::busy("chat").kind().to_string(), "busy");
        assert_eq!(AiError::configuration("no key").kind(), ErrorKind::Other);
    }
}
