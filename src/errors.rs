/*!
 * Error types for the yifysub application.
 *
 * Every fallible operation of the library reports one of the kinds below,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Bad or missing arguments, invalid operator input or configuration
    #[error("Usage error: {0}")]
    Usage(String),

    /// Host unreachable, connection failure or an unexpected HTTP status
    #[error("Network error: {0}")]
    Network(String),

    /// The remote markup no longer matches the expected markers
    #[error("Parse error: {0}")]
    Parse(String),

    /// No search results, or no subtitle in the requested language
    #[error("Not found: {0}")]
    NotFound(String),

    /// Archive or file write failures
    #[error("I/O error: {0}")]
    Io(String),
}

impl AppError {
    /// Operator-facing hint printed under the error, if any
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Network(_) => Some("Please check your internet connection (connection failed)"),
            Self::Usage(_) => Some("Run with --help to see the available options"),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            return Self::Network(format!("server responded with {}", status));
        }
        Self::Network(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<zip::result::ZipError> for AppError {
    fn from(error: zip::result::ZipError) -> Self {
        Self::Io(format!("invalid archive: {}", error))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::Usage(format!("invalid configuration: {}", error))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(error: tokio::task::JoinError) -> Self {
        Self::Io(format!("archive extraction task failed: {}", error))
    }
}
