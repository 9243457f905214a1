//! Browser LocalStorage backing store

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{DomException, Storage};

use super::{BackingStore, StoreError};

/// `window.localStorage` for the current origin
#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    /// Acquire the origin's LocalStorage.
    ///
    /// Fails when there is no window (workers) or storage is disabled
    /// (private browsing, blocked cookies).
    pub fn open() -> Result<Self, StoreError> {
        let window =
            web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(to_store_error)?
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".to_string()))?;
        Ok(Self { storage })
    }
}

impl BackingStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage.get_item(key).map_err(to_store_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage.set_item(key, value).map_err(to_store_error)
    }
}

/// Map a thrown JS value onto a store error
fn to_store_error(err: JsValue) -> StoreError {
    if let Some(exception) = err.dyn_ref::<DomException>() {
        if exception.name() == "QuotaExceededError" {
            return StoreError::QuotaExceeded;
        }
        return StoreError::Unavailable(exception.message());
    }
    StoreError::Unavailable(format!("{:?}", err))
}
