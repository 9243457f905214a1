//! PersistedValue binding and its load future

use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};
use std::task::{Context, Poll};

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::PersistError;
use crate::platform::BackingStore;

/// How the initial load of a binding ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Stored entry decoded and replaced the default
    Restored,
    /// No stored entry; default stays
    Absent,
    /// Entry unreadable or undecodable; default stays
    Fallback(PersistError),
    /// A write happened before the load; it was kept and flushed
    Superseded,
    /// Binding disposed or dropped before the load ran
    Discarded,
}

struct Binding<T> {
    key: String,
    store: Rc<dyn BackingStore>,
    current: T,
    initialized: bool,
    /// Written before `initialized`; in-memory value is newer than the store
    pending: bool,
    disposed: bool,
    last_warning: Option<PersistError>,
}

impl<T: Serialize + DeserializeOwned> Binding<T> {
    fn finish_load(&mut self) -> LoadOutcome {
        let loaded = match self.store.get(&self.key) {
            Ok(Some(raw)) => serde_json::from_str::<T>(&raw)
                .map(Some)
                .map_err(|err| PersistError::LoadParse {
                    key: self.key.clone(),
                    message: err.to_string(),
                }),
            Ok(None) => Ok(None),
            Err(source) => Err(PersistError::StoreUnavailable {
                key: self.key.clone(),
                source,
            }),
        };
        self.initialized = true;

        if self.pending {
            self.pending = false;
            if let Err(err) = loaded {
                self.warn(err);
            }
            log::info!("`{}` changed before load, keeping in-memory value", self.key);
            self.persist();
            return LoadOutcome::Superseded;
        }

        match loaded {
            Ok(Some(value)) => {
                self.current = value;
                log::info!("Loaded `{}` from storage", self.key);
                LoadOutcome::Restored
            }
            Ok(None) => {
                log::info!("No stored value for `{}`, using default", self.key);
                LoadOutcome::Absent
            }
            Err(err) => {
                self.warn(err.clone());
                LoadOutcome::Fallback(err)
            }
        }
    }

    fn persist(&mut self) {
        let raw = match serde_json::to_string(&self.current) {
            Ok(raw) => raw,
            Err(err) => {
                let key = self.key.clone();
                self.warn(PersistError::Serialization {
                    key,
                    message: err.to_string(),
                });
                return;
            }
        };
        match self.store.set(&self.key, &raw) {
            Ok(()) => log::debug!("Saved `{}`", self.key),
            Err(source) => {
                let key = self.key.clone();
                self.warn(PersistError::StoreUnavailable { key, source });
            }
        }
    }

    fn warn(&mut self, err: PersistError) {
        log::warn!("{}", err);
        self.last_warning = Some(err);
    }
}

/// In-memory value bound to one key of a backing store.
///
/// Handles are cheap clones of the same binding. The binding is
/// single-threaded (`!Send`), matching the browser's event loop.
pub struct PersistedValue<T> {
    inner: Rc<RefCell<Binding<T>>>,
}

impl<T> Clone for PersistedValue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PersistedValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let binding = self.inner.borrow();
        f.debug_struct("PersistedValue")
            .field("key", &binding.key)
            .field("current", &binding.current)
            .field("initialized", &binding.initialized)
            .field("disposed", &binding.disposed)
            .finish()
    }
}

impl<T: Serialize + DeserializeOwned + 'static> PersistedValue<T> {
    /// Bind `key` to `default`.
    ///
    /// The returned future performs the one load attempt for this binding.
    /// It does nothing until polled: spawn it on the host's executor. Until it
    /// completes, `read` returns `default` and writes are not persisted.
    pub fn create(store: Rc<dyn BackingStore>, key: &str, default: T) -> (Self, Load<T>) {
        let inner = Rc::new(RefCell::new(Binding {
            key: key.to_string(),
            store,
            current: default,
            initialized: false,
            pending: false,
            disposed: false,
            last_warning: None,
        }));
        let load = Load {
            binding: Some(Rc::downgrade(&inner)),
        };
        (Self { inner }, load)
    }

    /// Replace the value
    pub fn write(&self, value: T) {
        self.write_with(|_| value);
    }

    /// Replace the value with `update(current)`.
    ///
    /// `update` sees the latest value, including earlier writes that have
    /// not been persisted yet. It must not write to this binding.
    pub fn write_with(&self, update: impl FnOnce(&T) -> T) {
        let next = update(&self.inner.borrow().current);

        let mut binding = self.inner.borrow_mut();
        binding.current = next;
        if binding.disposed {
            log::debug!("`{}` is disposed, not persisting", binding.key);
        } else if binding.initialized {
            binding.persist();
        } else {
            binding.pending = true;
        }
    }
}

impl<T> PersistedValue<T> {
    /// Current value
    pub fn read(&self) -> T
    where
        T: Clone,
    {
        self.inner.borrow().current.clone()
    }

    /// Borrow the current value
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().current)
    }

    pub fn key(&self) -> String {
        self.inner.borrow().key.clone()
    }

    /// Whether the initial load attempt has completed
    pub fn is_initialized(&self) -> bool {
        self.inner.borrow().initialized
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.borrow().disposed
    }

    /// Most recent non-fatal persistence failure
    pub fn last_warning(&self) -> Option<PersistError> {
        self.inner.borrow().last_warning.clone()
    }

    /// Release the binding. Nothing is loaded into or written from it
    /// afterwards, through this or any other handle.
    pub fn dispose(self) {
        let mut binding = self.inner.borrow_mut();
        binding.disposed = true;
        binding.pending = false;
    }
}

/// One-shot load of a binding's stored entry.
///
/// Resolves on its first poll. Holds only a weak reference, so dropping
/// every handle discards the load.
#[must_use = "the binding stays on its default until the load is polled"]
pub struct Load<T> {
    binding: Option<Weak<RefCell<Binding<T>>>>,
}

impl<T> Unpin for Load<T> {}

impl<T: Serialize + DeserializeOwned> Future for Load<T> {
    type Output = LoadOutcome;

    fn poll(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<LoadOutcome> {
        let Some(cell) = self.binding.take().and_then(|weak| weak.upgrade()) else {
            return Poll::Ready(LoadOutcome::Discarded);
        };
        let mut binding = cell.borrow_mut();
        if binding.disposed {
            log::debug!("`{}` disposed before load", binding.key);
            return Poll::Ready(LoadOutcome::Discarded);
        }
        Poll::Ready(binding.finish_load())
    }
}
