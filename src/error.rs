//! Error types for the cache library
//!
//! Provides unified error handling using thiserror. Misses, expiries and
//! evictions are ordinary outcomes and never surface here; only configuration
//! mistakes and trace input problems do.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache library.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Capacity must hold at least one entry
    #[error("Invalid capacity: {0} (must be at least 1)")]
    InvalidCapacity(usize),

    /// TTL must be a non-zero duration
    #[error("Invalid TTL: {0:?} (must be non-zero)")]
    InvalidTtl(std::time::Duration),

    /// A trace line whose key could not be parsed
    #[error("Invalid trace entry on line {line}: {token:?}")]
    InvalidTrace { line: usize, token: String },

    /// Failure reading trace input
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the cache library.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CacheError::InvalidCapacity(0).to_string(),
            "Invalid capacity: 0 (must be at least 1)"
        );
        assert_eq!(
            CacheError::InvalidTtl(Duration::ZERO).to_string(),
            "Invalid TTL: 0ns (must be non-zero)"
        );
        assert_eq!(
            CacheError::InvalidTrace {
                line: 3,
                token: "abc".to_string()
            }
            .to_string(),
            "Invalid trace entry on line 3: \"abc\""
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: CacheError = io.into();
        assert!(matches!(err, CacheError::Io(_)));
    }
}
