//! In-memory backing store

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::{BackingStore, StoreError};

/// Shared in-memory store.
///
/// Clones are handles to the same map, so a store can be handed to several
/// bindings and still be inspected afterwards. Every successful `set` is
/// appended to a write history.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: HashMap<String, String>,
    history: Vec<(String, String)>,
    reads_unavailable: bool,
    writes_unavailable: bool,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry as if it had been stored by an earlier session.
    /// Not recorded in the write history.
    pub fn seed(&self, key: &str, raw: &str) {
        self.inner
            .borrow_mut()
            .entries
            .insert(key.to_string(), raw.to_string());
    }

    /// Raw entry for `key`, ignoring any simulated outage
    pub fn entry(&self, key: &str) -> Option<String> {
        self.inner.borrow().entries.get(key).cloned()
    }

    /// Every successful write, oldest first
    pub fn history(&self) -> Vec<(String, String)> {
        self.inner.borrow().history.clone()
    }

    /// Values written under `key`, oldest first
    pub fn writes_to(&self, key: &str) -> Vec<String> {
        self.inner
            .borrow()
            .history
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .collect()
    }

    /// Make reads fail with `StoreError::Unavailable`
    pub fn set_reads_unavailable(&self, unavailable: bool) {
        self.inner.borrow_mut().reads_unavailable = unavailable;
    }

    /// Make writes fail with `StoreError::Unavailable`
    pub fn set_writes_unavailable(&self, unavailable: bool) {
        self.inner.borrow_mut().writes_unavailable = unavailable;
    }
}

impl BackingStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let inner = self.inner.borrow();
        if inner.reads_unavailable {
            return Err(StoreError::Unavailable("reads disabled".to_string()));
        }
        Ok(inner.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.borrow_mut();
        if inner.writes_unavailable {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        inner.entries.insert(key.to_string(), value.to_string());
        inner.history.push((key.to_string(), value.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_entries() {
        let store = MemoryStore::new();
        let other = store.clone();
        other.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap(), Some("1".to_string()));
        assert_eq!(store.history(), vec![("a".to_string(), "1".to_string())]);
    }

    #[test]
    fn test_seed_is_not_a_write() {
        let store = MemoryStore::new();
        store.seed("a", "1");
        assert_eq!(store.entry("a"), Some("1".to_string()));
        assert!(store.history().is_empty());
    }

    #[test]
    fn test_outage_modes() {
        let store = MemoryStore::new();
        store.seed("a", "1");

        store.set_reads_unavailable(true);
        assert!(matches!(store.get("a"), Err(StoreError::Unavailable(_))));
        // Writes still work while reads are down
        store.set("a", "2").unwrap();

        store.set_reads_unavailable(false);
        store.set_writes_unavailable(true);
        assert!(store.set("a", "3").is_err());
        assert_eq!(store.get("a").unwrap(), Some("2".to_string()));
        assert_eq!(store.writes_to("a"), vec!["2".to_string()]);
    }
}
