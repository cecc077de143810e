//! Error types for lrucache

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type alias for lrucache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache construction and metadata lookups
///
/// A missing key is not an error: lookups return `Option::None`.
#[derive(Debug)]
pub enum Error {
    /// Requested capacity was zero
    ZeroCapacity,

    /// Requested bucket count was zero
    ZeroBuckets,

    /// Path is not valid UTF-8 and has no cache key
    NonUtf8Path(PathBuf),

    /// I/O error while reading file metadata
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ZeroCapacity => write!(f, "Cache capacity must be greater than 0"),
            Error::ZeroBuckets => write!(f, "Bucket count must be greater than 0"),
            Error::NonUtf8Path(path) => {
                write!(f, "Path is not valid UTF-8: {}", path.display())
            }
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}
