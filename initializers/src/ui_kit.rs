//! UI component library registration.

use std::collections::BTreeSet;

use plinth_config::UiConfig;
use plinth_core::{AppContext, CapabilityKey, InitializerError, InitializerName};
use plinth_types::Theme;
use serde_json::Value;

use crate::store::{self, StateStore};

pub const NAME: InitializerName = InitializerName::new("ui_kit");
pub const CAPABILITY: CapabilityKey = CapabilityKey::new("ui");

/// Components every library ships with.
pub const BUILTIN_COMPONENTS: &[&str] = &[
    "button", "cell", "form", "icon", "image", "input", "navbar", "popup", "tabbar", "toast",
];

/// Store id and pointer consulted for the theme.
const THEME_STORE: &str = "app";
const THEME_POINTER: &str = "/theme";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentLibrary {
    theme: Theme,
    components: BTreeSet<String>,
}

impl ComponentLibrary {
    #[must_use]
    pub fn new(theme: Theme, extra: &[String]) -> Self {
        let mut components: BTreeSet<String> =
            BUILTIN_COMPONENTS.iter().map(|c| (*c).to_string()).collect();
        for name in extra {
            let name = name.trim();
            if name.is_empty() {
                tracing::warn!("ignoring blank UI component name");
                continue;
            }
            components.insert(name.to_string());
        }
        Self { theme, components }
    }

    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub fn contains(&self, component: &str) -> bool {
        self.components.contains(component)
    }

    /// Component names in sorted order.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiKitSettings {
    pub theme: Option<String>,
    pub components: Vec<String>,
}

impl UiKitSettings {
    #[must_use]
    pub fn from_config(config: Option<&UiConfig>) -> Self {
        config.map_or_else(Self::default, |ui| Self {
            theme: ui.resolved_theme(),
            components: ui.components.clone(),
        })
    }
}

/// Theme from the state store when it has one, else from settings, else the default.
fn resolve_theme(ctx: &AppContext, settings: &UiKitSettings) -> Result<Theme, InitializerError> {
    let from_store = match ctx
        .capability::<StateStore>(store::CAPABILITY)
        .and_then(|store| store.read(THEME_STORE, THEME_POINTER))
    {
        Some(Value::String(raw)) => Some(raw),
        Some(other) => {
            return Err(InitializerError::new(format!(
                "UI theme in store `{THEME_STORE}` must be a string, got {other}"
            )));
        }
        None => None,
    };

    let Some(raw) = from_store.or_else(|| settings.theme.clone()) else {
        return Ok(Theme::default());
    };
    Theme::parse(&raw).map_err(|e| InitializerError::with_source("could not resolve UI theme", e))
}

/// Register the component library into `ctx`.
pub fn register(ctx: &mut AppContext, settings: &UiKitSettings) -> Result<(), InitializerError> {
    let theme = resolve_theme(ctx, settings)?;
    let library = ComponentLibrary::new(theme, &settings.components);
    tracing::debug!(theme = %theme, components = library.len(), "UI kit ready");
    ctx.register(CAPABILITY, library);
    Ok(())
}
