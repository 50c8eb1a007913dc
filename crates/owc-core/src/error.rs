//! Error types for OWC

use thiserror::Error;

/// OWC error type
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing command-line argument. Reported together with
    /// the usage text.
    #[error("{0}")]
    Usage(String),

    #[error("Cannot open options file specified with @")]
    OptionsFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}: No such file")]
    InputNotFound(String),

    #[error("Cannot create {0}")]
    CannotCreate(String),

    #[error("{file}:{line}: Error: {message}")]
    Preprocess {
        file: String,
        line: u32,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a usage error
    pub fn usage(msg: impl Into<String>) -> Self {
        Error::Usage(msg.into())
    }

    /// Whether the usage text should follow the message
    pub fn wants_usage(&self) -> bool {
        matches!(self, Error::Usage(_))
    }
}

/// Result type alias for OWC
pub type Result<T> = std::result::Result<T, Error>;
