//! Customizer preferences
//!
//! Each preference lives under its own storage key so a corrupt or
//! outdated entry only resets that one preference.

use std::future::Future;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::consts::{ACTIVE_TAB_KEY, LAYOUT_KEY, PANEL_OPEN_KEY};
use crate::persistence::{LoadOutcome, PersistedValue};
use crate::platform::BackingStore;

/// Customizer tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CustomizerTab {
    #[default]
    Overview,
    Structure,
    Armor,
    Equipment,
    Criticals,
    Fluff,
    Preview,
}

impl CustomizerTab {
    pub const ALL: [CustomizerTab; 7] = [
        CustomizerTab::Overview,
        CustomizerTab::Structure,
        CustomizerTab::Armor,
        CustomizerTab::Equipment,
        CustomizerTab::Criticals,
        CustomizerTab::Fluff,
        CustomizerTab::Preview,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomizerTab::Overview => "Overview",
            CustomizerTab::Structure => "Structure",
            CustomizerTab::Armor => "Armor",
            CustomizerTab::Equipment => "Equipment",
            CustomizerTab::Criticals => "Criticals",
            CustomizerTab::Fluff => "Fluff",
            CustomizerTab::Preview => "Preview",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "overview" => Some(CustomizerTab::Overview),
            "structure" => Some(CustomizerTab::Structure),
            "armor" | "armour" => Some(CustomizerTab::Armor),
            "equipment" | "equip" => Some(CustomizerTab::Equipment),
            "criticals" | "crits" | "critical" => Some(CustomizerTab::Criticals),
            "fluff" => Some(CustomizerTab::Fluff),
            "preview" => Some(CustomizerTab::Preview),
            _ => None,
        }
    }

    /// Whether the tab edits the unit (as opposed to viewing it)
    pub fn is_editor(&self) -> bool {
        !matches!(self, CustomizerTab::Overview | CustomizerTab::Preview)
    }
}

/// How the armor tab draws locations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ArmorDiagramMode {
    /// Mech silhouette with per-location overlays
    #[default]
    Silhouette,
    /// Grid of location cards
    Schematic,
}

/// Sidebar width bounds (px)
pub const MIN_SIDEBAR_WIDTH: u32 = 200;
pub const MAX_SIDEBAR_WIDTH: u32 = 480;

/// Layout preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutPrefs {
    /// Armor tab rendering
    pub armor_diagram: ArmorDiagramMode,
    /// Dense equipment/component cards
    pub compact_cards: bool,
    /// Warn when armor points or critical slots are left unallocated
    pub show_unallocated_warning: bool,
    /// Sidebar width in px
    pub sidebar_width: u32,
}

impl Default for LayoutPrefs {
    fn default() -> Self {
        Self {
            armor_diagram: ArmorDiagramMode::Silhouette,
            compact_cards: false,
            show_unallocated_warning: true,
            sidebar_width: 280,
        }
    }
}

impl LayoutPrefs {
    /// Copy with the sidebar width clamped to the allowed range
    pub fn with_sidebar_width(mut self, width: u32) -> Self {
        self.sidebar_width = width.clamp(MIN_SIDEBAR_WIDTH, MAX_SIDEBAR_WIDTH);
        self
    }

    /// Sidebar width as stored entries may hold anything
    pub fn effective_sidebar_width(&self) -> u32 {
        self.sidebar_width.clamp(MIN_SIDEBAR_WIDTH, MAX_SIDEBAR_WIDTH)
    }
}

/// Load outcomes for every customizer preference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefsLoad {
    pub active_tab: LoadOutcome,
    pub panel_open: LoadOutcome,
    pub layout: LoadOutcome,
}

/// Customizer preferences bound to a backing store
#[derive(Debug, Clone)]
pub struct CustomizerPrefs {
    pub active_tab: PersistedValue<CustomizerTab>,
    pub panel_open: PersistedValue<bool>,
    pub layout: PersistedValue<LayoutPrefs>,
}

impl CustomizerPrefs {
    /// Bind every preference to `store`.
    ///
    /// The returned future loads all of them; spawn it like any single
    /// binding's load.
    pub fn open(
        store: Rc<dyn BackingStore>,
    ) -> (Self, impl Future<Output = PrefsLoad> + 'static) {
        let (active_tab, tab_load) =
            PersistedValue::create(Rc::clone(&store), ACTIVE_TAB_KEY, CustomizerTab::default());
        let (panel_open, panel_load) =
            PersistedValue::create(Rc::clone(&store), PANEL_OPEN_KEY, false);
        let (layout, layout_load) =
            PersistedValue::create(store, LAYOUT_KEY, LayoutPrefs::default());

        let load = async move {
            PrefsLoad {
                active_tab: tab_load.await,
                panel_open: panel_load.await,
                layout: layout_load.await,
            }
        };

        (
            Self {
                active_tab,
                panel_open,
                layout,
            },
            load,
        )
    }

    /// Switch tabs
    pub fn select_tab(&self, tab: CustomizerTab) {
        self.active_tab.write(tab);
    }

    pub fn toggle_panel(&self) {
        self.panel_open.write_with(|open| !open);
    }

    pub fn set_sidebar_width(&self, width: u32) {
        self.layout
            .write_with(|layout| layout.clone().with_sidebar_width(width));
    }

    /// Release every binding
    pub fn dispose(self) {
        self.active_tab.dispose();
        self.panel_open.dispose();
        self.layout.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;
    use pollster::block_on;

    #[test]
    fn test_tab_names_parse() {
        for tab in CustomizerTab::ALL {
            assert_eq!(CustomizerTab::from_str(tab.as_str()), Some(tab));
        }
        assert_eq!(CustomizerTab::from_str("CRITS"), Some(CustomizerTab::Criticals));
        assert_eq!(CustomizerTab::from_str("armour"), Some(CustomizerTab::Armor));
        assert_eq!(CustomizerTab::from_str("weapons"), None);
        assert!(CustomizerTab::Criticals.is_editor());
        assert!(!CustomizerTab::Preview.is_editor());
    }

    #[test]
    fn test_sidebar_width_clamped() {
        let layout = LayoutPrefs::default();
        assert_eq!(layout.clone().with_sidebar_width(50).sidebar_width, MIN_SIDEBAR_WIDTH);
        assert_eq!(layout.clone().with_sidebar_width(9000).sidebar_width, MAX_SIDEBAR_WIDTH);
        assert_eq!(layout.with_sidebar_width(300).sidebar_width, 300);
    }

    #[test]
    fn test_partial_layout_entry_fills_defaults() {
        let store = MemoryStore::new();
        store.seed(LAYOUT_KEY, r#"{"compact_cards":true,"sidebar_width":10}"#);

        let (prefs, load) = CustomizerPrefs::open(Rc::new(store.clone()));
        let outcome = block_on(load);

        assert_eq!(outcome.layout, LoadOutcome::Restored);
        let layout = prefs.layout.read();
        assert!(layout.compact_cards);
        assert!(layout.show_unallocated_warning);
        assert_eq!(layout.effective_sidebar_width(), MIN_SIDEBAR_WIDTH);
    }

    #[test]
    fn test_prefs_survive_reload() {
        let store = MemoryStore::new();

        let (prefs, load) = CustomizerPrefs::open(Rc::new(store.clone()));
        let outcome = block_on(load);
        assert_eq!(outcome.active_tab, LoadOutcome::Absent);
        assert!(store.history().is_empty());

        prefs.select_tab(CustomizerTab::Criticals);
        prefs.toggle_panel();
        prefs.set_sidebar_width(360);
        prefs.dispose();

        let (reloaded, load) = CustomizerPrefs::open(Rc::new(store.clone()));
        let outcome = block_on(load);
        assert_eq!(
            outcome,
            PrefsLoad {
                active_tab: LoadOutcome::Restored,
                panel_open: LoadOutcome::Restored,
                layout: LoadOutcome::Restored,
            }
        );
        assert_eq!(reloaded.active_tab.read(), CustomizerTab::Criticals);
        assert!(reloaded.panel_open.read());
        assert_eq!(reloaded.layout.read().sidebar_width, 360);
        assert_eq!(store.entry(ACTIVE_TAB_KEY), Some("\"Criticals\"".to_string()));
    }

    #[test]
    fn test_corrupt_tab_only_resets_tab() {
        let store = MemoryStore::new();
        store.seed(ACTIVE_TAB_KEY, "\"Weapons\"");
        store.seed(PANEL_OPEN_KEY, "true");

        let (prefs, load) = CustomizerPrefs::open(Rc::new(store));
        let outcome = block_on(load);

        assert!(matches!(outcome.active_tab, LoadOutcome::Fallback(_)));
        assert_eq!(outcome.panel_open, LoadOutcome::Restored);
        assert_eq!(prefs.active_tab.read(), CustomizerTab::Overview);
        assert!(prefs.panel_open.read());
    }
}
