//! Error types for the caching layer.
//!
//! Remote and metadata failures are modeled as explicit error values so
//! the facade can pattern-match on the kind when deciding whether to fall
//! back, instead of using exceptions for normal-path branching.

use std::fmt;

/// Errors that can occur inside the caching layer.
///
/// Only `Config` is ever surfaced to application code, and only at
/// construction time. Everything else is recovered internally: transport
/// failures route the call to the fallback store, deserialization
/// failures read as a miss, metadata failures are logged and swallowed.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The remote backend could not be reached or answered with a
    /// protocol error.
    #[error("Remote transport error: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },

    /// A remote command did not complete within its time budget.
    #[error("Remote command timed out after {seconds}s")]
    Timeout {
        /// The enforced command timeout in seconds.
        seconds: u64,
    },

    /// A stored payload could not be parsed back into an envelope.
    #[error("Stored payload failed to deserialize: {message}")]
    Deserialization {
        /// Description of the parse failure.
        message: String,
    },

    /// A caller-supplied value could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The metadata repository rejected or failed an operation.
    #[error("Metadata repository error: {message}")]
    Metadata {
        /// Description of the metadata failure.
        message: String,
    },

    /// Invalid configuration, e.g. a malformed connection URL.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem.
        message: String,
    },
}

impl CacheError {
    /// Creates a new `Transport` error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a new `Timeout` error.
    #[must_use]
    pub fn timeout(seconds: u64) -> Self {
        Self::Timeout { seconds }
    }

    /// Creates a new `Deserialization` error.
    #[must_use]
    pub fn deserialization(message: impl Into<String>) -> Self {
        Self::Deserialization {
            message: message.into(),
        }
    }

    /// Creates a new `Metadata` error.
    #[must_use]
    pub fn metadata(message: impl Into<String>) -> Self {
        Self::Metadata {
            message: message.into(),
        }
    }

    /// Creates a new `Config` error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a transport-class failure (including
    /// timeouts), i.e. the trigger for the fallback path.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }

    /// Returns `true` if this is a metadata repository failure.
    #[must_use]
    pub fn is_metadata(&self) -> bool {
        matches!(self, Self::Metadata { .. })
    }

    /// Returns `true` if this is a configuration error.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Returns the error category for logging and monitoring.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Transport { .. } | Self::Timeout { .. } => ErrorCategory::Transport,
            Self::Deserialization { .. } | Self::Serialization(_) => ErrorCategory::Serialization,
            Self::Metadata { .. } => ErrorCategory::Metadata,
            Self::Config { .. } => ErrorCategory::Config,
        }
    }
}

/// Categories of cache errors for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Remote transport failure, including timeouts.
    Transport,
    /// Payload serialization or deserialization failure.
    Serialization,
    /// Metadata repository failure.
    Metadata,
    /// Configuration error.
    Config,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => write!(f, "transport"),
            Self::Serialization => write!(f, "serialization"),
            Self::Metadata => write!(f, "metadata"),
            Self::Config => write!(f, "config"),
        }
    }
}

/// Type alias for cache-layer results.
pub type CacheResult<T> = Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CacheError::transport("connection refused");
        assert_eq!(err.to_string(), "Remote transport error: connection refused");

        let err = CacheError::timeout(5);
        assert_eq!(err.to_string(), "Remote command timed out after 5s");

        let err = CacheError::config("malformed URL");
        assert_eq!(err.to_string(), "Configuration error: malformed URL");
    }

    #[test]
    fn test_error_predicates() {
        assert!(CacheError::transport("x").is_transport());
        assert!(CacheError::timeout(5).is_transport());
        assert!(!CacheError::metadata("x").is_transport());

        assert!(CacheError::metadata("x").is_metadata());
        assert!(CacheError::config("x").is_config());
        assert!(!CacheError::config("x").is_transport());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            CacheError::transport("x").category(),
            ErrorCategory::Transport
        );
        assert_eq!(CacheError::timeout(5).category(), ErrorCategory::Transport);
        assert_eq!(
            CacheError::deserialization("x").category(),
            ErrorCategory::Serialization
        );
        assert_eq!(CacheError::metadata("x").category(), ErrorCategory::Metadata);
        assert_eq!(CacheError::config("x").category(), ErrorCategory::Config);
        assert_eq!(ErrorCategory::Transport.to_string(), "transport");
    }
}
