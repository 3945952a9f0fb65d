//! Messaging client error types.

use std::fmt;

/// Errors from sending messages to the LINE Messaging API.
#[derive(Debug)]
pub enum MessagingError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// API returned an error status code
    ApiError { status: u16, message: String },

    /// Rate limited by the API
    RateLimited,

    /// Invalid channel access token
    Unauthorized,

    /// Client could not be configured
    InvalidConfig(String),
}

impl fmt::Display for MessagingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessagingError::Http(e) => write!(f, "HTTP error: {e}"),
            MessagingError::ApiError { status, message } => {
                write!(f, "API error {status}: {message}")
            }
            MessagingError::RateLimited => write!(f, "rate limited by messaging API"),
            MessagingError::Unauthorized => {
                write!(f, "unauthorized (invalid channel access token)")
            }
            MessagingError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for MessagingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MessagingError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MessagingError {
    fn from(err: reqwest::Error) -> Self {
        MessagingError::Http(err)
    }
}
