//! Configuration loading for Plinth.
//!
//! The config file is optional. Every section is optional and every field has a
//! default, so a missing file bootstraps exactly like an empty one.
//!
//! ```toml
//! [app]
//! name = "demo"
//!
//! [store.initial.app]
//! theme = "dark"
//!
//! [debug_console]
//! enabled = true
//! capacity = 200
//!
//! [ui]
//! theme = "light"
//! components = ["swiper"]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::Deserialize;
use thiserror::Error;

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "PLINTH_CONFIG";

const DEFAULT_APP_NAME: &str = "plinth";

#[derive(Debug, Default, Deserialize)]
pub struct PlinthConfig {
    pub app: Option<AppConfig>,
    pub store: Option<StoreConfig>,
    pub debug_console: Option<DebugConsoleConfig>,
    pub ui: Option<UiConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

/// A `[store.initial.<id>]` table that cannot be represented as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid initial state for store `{id}`: {reason}")]
pub struct StoreStateError {
    id: String,
    reason: String,
}

impl StoreStateError {
    #[must_use]
    pub fn new(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Display name of the application. Supports `${VAR}` expansion.
    pub name: Option<String>,
}

/// Initial contents of the shared state store.
///
/// Each `[store.initial.<id>]` table becomes one named store.
#[derive(Debug, Default, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub initial: BTreeMap<String, toml::Table>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DebugConsoleConfig {
    /// Attach the debug console. Defaults to on in debug builds only.
    pub enabled: Option<bool>,
    /// Maximum number of retained console entries.
    pub capacity: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UiConfig {
    /// Fallback theme when the state store does not pick one.
    pub theme: Option<String>,
    /// Extra component names registered alongside the built-in set.
    #[serde(default)]
    pub components: Vec<String>,
}

impl PlinthConfig {
    /// Load from `$PLINTH_CONFIG` or `~/.plinth/config.toml`.
    ///
    /// Returns `Ok(None)` when no config file exists.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn app_name(&self) -> String {
        self.app
            .as_ref()
            .and_then(|app| app.name.as_deref())
            .map(expand_env_vars)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_APP_NAME.to_string())
    }
}

impl StoreConfig {
    /// Initial store states converted to JSON, keyed by store id.
    pub fn initial_states(&self) -> Result<BTreeMap<String, serde_json::Value>, StoreStateError> {
        self.initial
            .iter()
            .map(|(id, table)| {
                let value = toml_to_json(&toml::Value::Table(table.clone()))
                    .map_err(|reason| StoreStateError::new(id.clone(), reason))?;
                Ok((id.clone(), value))
            })
            .collect()
    }
}

impl UiConfig {
    #[must_use]
    pub fn resolved_theme(&self) -> Option<String> {
        self.theme
            .as_deref()
            .map(expand_env_vars)
            .filter(|theme| !theme.trim().is_empty())
    }
}

/// Convert a TOML value to a JSON value.
fn toml_to_json(value: &toml::Value) -> Result<serde_json::Value, String> {
    match value {
        toml::Value::String(s) => Ok(serde_json::Value::String(s.clone())),
        toml::Value::Integer(i) => Ok(serde_json::Value::Number((*i).into())),
        toml::Value::Float(f) => {
            let n =
                serde_json::Number::from_f64(*f).ok_or_else(|| format!("Invalid float: {f}"))?;
            Ok(serde_json::Value::Number(n))
        }
        toml::Value::Boolean(b) => Ok(serde_json::Value::Bool(*b)),
        toml::Value::Array(arr) => {
            let json_arr: Result<Vec<_>, _> = arr.iter().map(toml_to_json).collect();
            Ok(serde_json::Value::Array(json_arr?))
        }
        toml::Value::Table(table) => {
            let mut map = serde_json::Map::new();
            for (k, v) in table {
                map.insert(k.clone(), toml_to_json(v)?);
            }
            Ok(serde_json::Value::Object(map))
        }
        toml::Value::Datetime(dt) => Ok(serde_json::Value::String(dt.to_string())),
    }
}

/// Replace `${VAR}` with the value of `VAR` (empty when unset).
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let var = &after[..end];
                if !var.is_empty() {
                    out.push_str(&env::var(var).unwrap_or_default());
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                return out;
            }
        }
    }

    out.push_str(rest);
    out
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    if let Some(explicit) = env::var_os(CONFIG_PATH_ENV).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(explicit));
    }
    dirs::home_dir().map(|home| home.join(".plinth").join("config.toml"))
}
