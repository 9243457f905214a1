//! Persisted values backed by a key-value store
//!
//! A binding goes through two phases:
//! - construct: value is the default, writes stay in memory
//! - load: stored entry is read once; afterwards every write is persisted
//!
//! Writes made before the load finishes win over the stored entry and are
//! flushed when the load completes. Failures never reach the caller; they
//! are logged and recorded as the binding's last warning.

mod error;
mod value;

pub use error::PersistError;
pub use value::{Load, LoadOutcome, PersistedValue};
