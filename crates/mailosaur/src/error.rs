//! Error types for Mailosaur API operations

use std::time::Duration;

/// Result type alias for Mailosaur operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the Mailosaur client
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The resource does not exist or was deleted
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// Search criteria or an address was rejected
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// `wait_for` gave up before a matching email arrived
    #[error("No matching email arrived within {waited:?}")]
    Timeout { waited: Duration },

    /// `wait_for` was cancelled by its token
    #[error("Wait was cancelled")]
    Cancelled,

    /// The API key was rejected
    #[error("Unauthorized: check the API key")]
    Unauthorized,

    /// The service answered with an unexpected status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The request could not be completed
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The response body could not be decoded
    #[error("Failed to decode response: {message}")]
    Decode { message: String },
}

impl Error {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Map a non-success HTTP status to an error.
    ///
    /// `resource` names the request path; `detail` is whatever the service
    /// said in the response body, if anything.
    pub(crate) fn from_status(status: u16, resource: &str, detail: Option<String>) -> Self {
        match status {
            404 => Self::NotFound {
                resource: resource.to_string(),
            },
            400 => Self::Validation {
                message: detail.unwrap_or_else(|| format!("request to {} was rejected", resource)),
            },
            401 | 403 => Self::Unauthorized,
            _ => Self::Http {
                status,
                message: detail.unwrap_or_else(|| format!("request to {} failed", resource)),
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Statuses never arrive here: the agent hands every response back and
/// `check` maps them with the service's detail.
impl From<ureq::Error> for Error {
    fn from(e: ureq::Error) -> Self {
        Self::Transport {
            message: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode {
            message: e.to_string(),
        }
    }
}
