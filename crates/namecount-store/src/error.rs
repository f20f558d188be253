//! Error types for the counter store

use thiserror::Error;

/// Errors that can occur while applying occurrences to the counter document
#[derive(Debug, Error)]
pub enum StoreError {
    /// The blob store could not be read or written (transient infra fault).
    /// The caller should retry the whole batch.
    #[error("counter storage unavailable during {operation}: {source}")]
    StorageUnavailable {
        /// Which half of the cycle failed ("read" or "write")
        operation: &'static str,
        #[source]
        source: opendal::Error,
    },

    /// The stored document does not parse as a name/count mapping.
    /// Never auto-repaired: discarding the blob would lose every prior
    /// count, so this surfaces for operator intervention.
    #[error("corrupt counter document at '{key}': {reason}")]
    CorruptDocument { key: String, reason: String },

    /// Store configuration is missing or inconsistent
    #[error("invalid store configuration: {message}")]
    InvalidConfig { message: String },
}

impl StoreError {
    pub(crate) fn unavailable(operation: &'static str, source: opendal::Error) -> Self {
        Self::StorageUnavailable { operation, source }
    }

    pub(crate) fn corrupt(key: &str, reason: impl std::fmt::Display) -> Self {
        Self::CorruptDocument {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Result type alias for StoreError
pub type Result<T> = std::result::Result<T, StoreError>;
