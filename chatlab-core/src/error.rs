//! Error types for the ChatLab library

use std::error::Error as StdError;
use std::fmt;

/// The main error type for all ChatLab operations
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// Transport-level failure (connection drop, non-2xx, protocol violation)
    ///
    /// `partial` carries any assistant text that had already been streamed
    /// before the failure, so the caller can decide whether to keep it.
    Transport {
        /// Error message
        message: String,
        /// Assistant text accumulated before the failure
        partial: String,
        /// Underlying error if available
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// Serialization/deserialization errors
    Serialization {
        /// Error message
        message: String,
        /// Underlying error if available
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// Configuration errors (missing pricing file, bad credentials)
    Configuration(String),

    /// Validation errors (rejected before any network round-trip)
    Validation(String),
}

impl Error {
    /// Create a transport error with no partial text
    pub fn transport(message: impl Into<String>) -> Self {
        Error::Transport {
            message: message.into(),
            partial: String::new(),
            source: None,
        }
    }

    /// The assistant text streamed before a transport failure, if any
    pub fn partial_text(&self) -> Option<&str> {
        match self {
            Error::Transport { partial, .. } if !partial.is_empty() => Some(partial),
            _ => None,
        }
    }

    /// Attach accumulated text to a transport error, leaving other kinds untouched
    pub fn with_partial(self, text: &str) -> Self {
        match self {
            Error::Transport {
                message, source, ..
            } => Error::Transport {
                message,
                partial: text.to_owned(),
                source,
            },
            other => other,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Transport { message, .. } => write!(f, "Transport error: {}", message),
            Error::Serialization { message, .. } => write!(f, "Serialization error: {}", message),
            Error::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            Error::Validation(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Transport { source, .. } | Error::Serialization { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn StdError + 'static)),
            _ => None,
        }
    }
}

/// Result type alias for ChatLab operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}
