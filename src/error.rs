//! Error types and handling for `TrailPlanner`

use thiserror::Error;

/// Main error type for the `TrailPlanner` engine
///
/// Only failures of primary calls surface through this type. Degraded
/// sub-fetches are recorded on the affected items or report sections instead.
#[derive(Error, Debug)]
pub enum TrailPlannerError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Lookup catalog could not be loaded or parsed
    #[error("Catalog error: {message}")]
    Catalog { message: String },

    /// Upstream network failure or non-success status on a primary call
    #[error("Upstream request failed: {message}")]
    TransientIo {
        message: String,
        status: Option<u16>,
    },

    /// A primary response body did not match its provider schema
    #[error("Unexpected upstream response: {message}")]
    Decode { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// The fetch scope was cancelled or its deadline passed
    #[error("Operation cancelled")]
    Cancelled,

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl TrailPlannerError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new catalog error
    pub fn catalog<S: Into<String>>(message: S) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    /// Create a transient I/O error without an HTTP status
    pub fn transient<S: Into<String>>(message: S) -> Self {
        Self::TransientIo {
            message: message.into(),
            status: None,
        }
    }

    /// Create a transient I/O error for a non-success HTTP status
    pub fn http_status<S: Into<String>>(status: u16, message: S) -> Self {
        Self::TransientIo {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Create a new decode error
    pub fn decode<S: Into<String>>(message: S) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Whether the failure came from the network and may succeed on a later attempt
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientIo { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            Self::Catalog { .. } => {
                "The park lookup tables could not be loaded. Please check the catalog file."
                    .to_string()
            }
            Self::TransientIo { status, .. } => match status {
                Some(401 | 403) => {
                    "An upstream service rejected the request. Please check your API keys."
                        .to_string()
                }
                Some(429) => {
                    "An upstream service is rate limiting requests. Please try again later."
                        .to_string()
                }
                _ => "Unable to reach an upstream service. Please check your internet connection."
                    .to_string(),
            },
            Self::Decode { .. } => {
                "An upstream service returned data in an unexpected format.".to_string()
            }
            Self::Validation { message } => format!("Invalid input: {message}"),
            Self::Cancelled => "The request was cancelled before it completed.".to_string(),
            Self::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<serde_json::Error> for TrailPlannerError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err.to_string())
    }
}
