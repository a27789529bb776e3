//! Concrete initializers and the default installer registry.
//!
//! The default registry runs, in this order:
//!
//! 1. [`store`] (context-bound): registers the shared [`StateStore`].
//! 2. [`debug_console`] (context-free): attaches the [`DebugConsole`] to ambient state.
//! 3. [`ui_kit`] (context-bound): registers the [`ComponentLibrary`], reading its
//!    theme from the store set up in step 1.

pub mod debug_console;
pub mod store;
pub mod ui_kit;

pub use debug_console::{ConsoleEntry, ConsoleError, ConsoleLayer, ConsoleSettings, DebugConsole};
pub use store::{StateStore, StoreError, StoreSettings};
pub use ui_kit::{ComponentLibrary, UiKitSettings};

use plinth_config::PlinthConfig;
use plinth_core::Registry;

/// Settings for every default initializer.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub store: StoreSettings,
    pub console: ConsoleSettings,
    pub ui: UiKitSettings,
}

impl Settings {
    /// Settings from an optional config; a missing config gives the defaults.
    #[must_use]
    pub fn from_config(config: Option<&PlinthConfig>) -> Self {
        let store = config
            .and_then(|cfg| cfg.store.as_ref())
            .map_or_else(StoreSettings::default, |store| StoreSettings {
                initial: store.initial_states(),
            });
        Self {
            store,
            console: ConsoleSettings::from_config(config.and_then(|cfg| cfg.debug_console.as_ref())),
            ui: UiKitSettings::from_config(config.and_then(|cfg| cfg.ui.as_ref())),
        }
    }
}

/// The fixed bootstrap order: store, then debug console, then UI kit.
#[must_use]
pub fn default_registry(settings: Settings) -> Registry {
    let Settings {
        store: store_settings,
        console: console_settings,
        ui: ui_settings,
    } = settings;
    Registry::builder()
        .context_bound(store::NAME, move |ctx, _| {
            store::wire(ctx, &store_settings)
        })
        .context_free(debug_console::NAME, move |ambient| {
            debug_console::attach(ambient, console_settings)
        })
        .context_bound(ui_kit::NAME, move |ctx, _| {
            ui_kit::register(ctx, &ui_settings)
        })
        .build()
}
