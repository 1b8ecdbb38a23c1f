//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// A missing or expired key is not an error: lookups return `None`.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Cache was configured with unusable parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Snapshot bytes could not be decoded into cache state
    #[error("Snapshot decode failed: {0}")]
    Decode(String),

    /// A cached value could not be serialized into a snapshot
    #[error("Snapshot encode failed: {0}")]
    Encode(String),

    /// Underlying storage read/write failure
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_messages() {
        let err = CacheError::InvalidConfig("capacity must be at least 1".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: capacity must be at least 1"
        );

        let err = CacheError::Decode("bad magic".to_string());
        assert_eq!(err.to_string(), "Snapshot decode failed: bad magic");
    }

    #[test]
    fn test_io_error_is_transparent() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing file");
        let err: CacheError = io_err.into();

        assert!(matches!(err, CacheError::Io(_)));
        assert_eq!(err.to_string(), "missing file");
    }
}
