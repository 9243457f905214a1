//! Mech Prefs entry point
//!
//! On the web, binds the customizer preferences to LocalStorage. Natively,
//! runs the same lifecycle against an in-memory store.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::rc::Rc;

    use mech_prefs::platform::{BackingStore, LocalStorage, MemoryStore};
    use mech_prefs::CustomizerPrefs;

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(err) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("logger init failed: {err}").into());
        }

        log::info!("Mech Prefs starting...");

        // Preferences still work for the session without storage
        let store: Rc<dyn BackingStore> = match LocalStorage::open() {
            Ok(storage) => Rc::new(storage),
            Err(err) => {
                log::warn!("{err}, preferences will not persist");
                Rc::new(MemoryStore::new())
            }
        };

        let (prefs, load) = CustomizerPrefs::open(store);
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = load.await;
            log::info!("Preferences loaded: {:?}", outcome);
            log::info!(
                "Active tab: {}, panel open: {}",
                prefs.active_tab.read().as_str(),
                prefs.panel_open.read()
            );
        });
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    web::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::rc::Rc;

    use mech_prefs::consts::PANEL_OPEN_KEY;
    use mech_prefs::{CustomizerPrefs, CustomizerTab, MemoryStore};

    env_logger::init();
    log::info!("Mech Prefs (native) starting...");

    let store = MemoryStore::new();

    // First session: toggle before the load runs, like a click during startup
    let (prefs, load) = CustomizerPrefs::open(Rc::new(store.clone()));
    prefs.toggle_panel();
    let outcome = pollster::block_on(load);
    log::info!("First session loaded: {:?}", outcome);
    prefs.select_tab(CustomizerTab::Armor);
    prefs.set_sidebar_width(320);
    prefs.dispose();

    // Second session reads back what the first wrote
    let (prefs, load) = CustomizerPrefs::open(Rc::new(store.clone()));
    let outcome = pollster::block_on(load);
    log::info!("Second session loaded: {:?}", outcome);

    println!("active tab:    {}", prefs.active_tab.read().as_str());
    println!("panel open:    {}", prefs.panel_open.read());
    println!("sidebar width: {}", prefs.layout.read().sidebar_width);
    println!("stored panel:  {:?}", store.entry(PANEL_OPEN_KEY));
    println!("writes:        {}", store.history().len());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
