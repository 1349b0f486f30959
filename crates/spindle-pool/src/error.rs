//! Pool-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during pool operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PoolError {
    /// The pool was constructed with invalid parameters.
    InvalidConfig {
        /// Human-readable description of the rejected parameter.
        reason: String,
    },
    /// The underlying allocation failed.
    ///
    /// Surfaced directly to the caller: the pool does not retry and has no
    /// degraded mode.
    OutOfMemory {
        /// Number of bytes that could not be allocated.
        requested: usize,
    },
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { reason } => {
                write!(f, "invalid pool configuration: {reason}")
            }
            Self::OutOfMemory { requested } => {
                write!(f, "out of memory: failed to allocate {requested} bytes")
            }
        }
    }
}

impl Error for PoolError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_requested_bytes() {
        let err = PoolError::OutOfMemory { requested: 4096 };
        assert!(err.to_string().contains("4096"));
    }

    #[test]
    fn display_includes_config_reason() {
        let err = PoolError::InvalidConfig {
            reason: "array_len must be > 0".into(),
        };
        assert!(err.to_string().contains("array_len"));
    }
}
