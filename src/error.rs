use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for templating service operations
#[derive(Debug, Error)]
pub enum TemplatingError {
    /// Invalid request construction or configuration. Indicates a defect and is never retried.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Token endpoint unreachable or returned no usable token
    #[error("authentication failed: {message}")]
    Authentication {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Network failure while sending a service request
    #[error("transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Final non-200 status after the single allowed retry
    #[error("failed to access templating service with http status: {status}")]
    Service { status: u16, body: String },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TemplatingError {
    /// Create an authentication error without an underlying cause
    pub fn authentication(message: impl Into<String>) -> Self {
        TemplatingError::Authentication {
            message: message.into(),
            source: None,
        }
    }

    /// Create an authentication error wrapping its cause
    pub fn authentication_with(
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        TemplatingError::Authentication {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a transport error wrapping its cause
    pub fn transport(message: impl Into<String>, source: Option<BoxError>) -> Self {
        TemplatingError::Transport {
            message: message.into(),
            source,
        }
    }

    /// Create a service error from the last observed status and body
    pub fn service(status: u16, body: impl Into<String>) -> Self {
        TemplatingError::Service {
            status,
            body: body.into(),
        }
    }

    /// Get the HTTP status code if this is a service error
    pub fn status_code(&self) -> Option<u16> {
        match self {
            TemplatingError::Service { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if the service rejected the call as unauthorized (401)
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, TemplatingError::Service { status: 401, .. })
    }

    /// Check if this error came from the token exchange
    pub fn is_authentication(&self) -> bool {
        matches!(self, TemplatingError::Authentication { .. })
    }
}

/// Result type for templating operations
pub type Result<T> = std::result::Result<T, TemplatingError>;
