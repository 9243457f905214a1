//! Mech Prefs - persisted UI preferences for a mech customizer
//!
//! Core modules:
//! - `persistence`: values bound to storage keys, loaded once, saved on change
//! - `platform`: backing stores (LocalStorage on web, in-memory elsewhere)
//! - `settings`: typed customizer preferences

pub mod persistence;
pub mod platform;
pub mod settings;

pub use persistence::{Load, LoadOutcome, PersistError, PersistedValue};
pub use platform::{BackingStore, MemoryStore, StoreError};
pub use settings::{ArmorDiagramMode, CustomizerPrefs, CustomizerTab, LayoutPrefs};

/// Storage keys
pub mod consts {
    /// Last selected customizer tab
    pub const ACTIVE_TAB_KEY: &str = "customizer:active-tab";
    /// Whether the side panel is expanded
    pub const PANEL_OPEN_KEY: &str = "ui:panel-open";
    /// Layout preferences (armor diagram, card density, sidebar)
    pub const LAYOUT_KEY: &str = "customizer:layout";
}
