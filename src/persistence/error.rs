//! Persistence warnings
//!
//! None of these reach the consumer as a `Result`. They are logged and kept
//! on the binding as its last warning.

use crate::platform::StoreError;

/// Non-fatal persistence failure for one key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistError {
    /// Stored entry exists but does not decode as the bound type
    #[error("stored value for `{key}` could not be parsed, using default: {message}")]
    LoadParse { key: String, message: String },

    /// Backing store refused a read or write
    #[error("backing store unavailable for `{key}`: {source}")]
    StoreUnavailable {
        key: String,
        #[source]
        source: StoreError,
    },

    /// In-memory value could not be encoded
    #[error("value for `{key}` could not be serialized: {message}")]
    Serialization { key: String, message: String },
}

impl PersistError {
    /// Storage key the failure belongs to
    pub fn key(&self) -> &str {
        match self {
            PersistError::LoadParse { key, .. }
            | PersistError::StoreUnavailable { key, .. }
            | PersistError::Serialization { key, .. } => key,
        }
    }
}
