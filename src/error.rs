//! Error types for lazy-seq
//!
//! The synchronous pipeline core is infallible: user callbacks are
//! infallible by signature and panics propagate out of terminals unchanged.
//! Errors only arise on the fallible stream surface (chunk sources, HTTP).

use std::fmt;

/// Main error type for stream-backed sequences
#[derive(Debug, Clone, PartialEq)]
pub enum SeqError {
    /// I/O related errors while reading a chunk source
    IO(String),
    /// HTTP transport failure
    Http(String),
    /// Malformed or unsupported URL
    InvalidUrl(String),
}

impl fmt::Display for SeqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeqError::IO(msg) => write!(f, "IO error: {}", msg),
            SeqError::Http(msg) => write!(f, "HTTP error: {}", msg),
            SeqError::InvalidUrl(url) => write!(f, "invalid URL: {}", url),
        }
    }
}

impl std::error::Error for SeqError {}

impl From<std::io::Error> for SeqError {
    fn from(err: std::io::Error) -> Self {
        SeqError::IO(err.to_string())
    }
}

#[cfg(feature = "http")]
impl From<ureq::Error> for SeqError {
    fn from(err: ureq::Error) -> Self {
        SeqError::Http(err.to_string())
    }
}

/// Result type for chunk-source operations
pub type SeqResult<T> = Result<T, SeqError>;
