//! Platform abstraction layer
//!
//! Backing stores for persisted preferences:
//! - `LocalStorage`: browser `window.localStorage` (wasm32 only)
//! - `MemoryStore`: in-process map for native builds and tests
//!
//! Stores deal in raw strings. Encoding is the caller's job.

mod memory;
#[cfg(target_arch = "wasm32")]
mod local_storage;

pub use memory::MemoryStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorage;

/// Failure reported by a backing store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Storage is missing, disabled by policy, or threw on access
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// The origin's storage quota is used up
    #[error("storage quota exceeded")]
    QuotaExceeded,
}

/// String-keyed, string-valued durable map scoped to one origin/process.
///
/// Methods take `&self`: the browser store is a shared handle, and bindings
/// hold the store behind an `Rc`.
pub trait BackingStore {
    /// Read the raw entry for `key`. `Ok(None)` means no entry exists.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous entry.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
