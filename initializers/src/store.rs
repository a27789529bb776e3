//! Shared state store.
//!
//! A [`StateStore`] is a cloneable handle over named stores, each a JSON
//! object. Every clone sees the same data, so any component holding a handle
//! observes writes made through another.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use plinth_config::StoreStateError;
use plinth_core::{AppContext, CapabilityKey, InitializerError, InitializerName};
use serde_json::{Map, Value};
use thiserror::Error;

pub const NAME: InitializerName = InitializerName::new("store");
pub const CAPABILITY: CapabilityKey = CapabilityKey::new("store");

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("store `{0}` is already defined")]
    Duplicate(String),
    #[error("store `{0}` is not defined")]
    Unknown(String),
    #[error("store `{0}` state must be a JSON object")]
    NotAnObject(String),
    #[error("invalid state path `{path}` in store `{id}`")]
    InvalidPath { id: String, path: String },
}

#[derive(Debug)]
struct Entry {
    initial: Value,
    current: Value,
}

#[derive(Debug, Clone, Default)]
pub struct StateStore {
    stores: Arc<RwLock<BTreeMap<String, Entry>>>,
}

impl StateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define store `id` with `initial` state. The state must be an object.
    pub fn define(&self, id: impl Into<String>, initial: Value) -> Result<(), StoreError> {
        let id = id.into();
        if !initial.is_object() {
            return Err(StoreError::NotAnObject(id));
        }
        let mut stores = self.stores.write().unwrap_or_else(PoisonError::into_inner);
        if stores.contains_key(&id) {
            return Err(StoreError::Duplicate(id));
        }
        stores.insert(
            id,
            Entry {
                current: initial.clone(),
                initial,
            },
        );
        Ok(())
    }

    /// Snapshot of the whole state of `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Value> {
        let stores = self.stores.read().unwrap_or_else(PoisonError::into_inner);
        stores.get(id).map(|entry| entry.current.clone())
    }

    /// Value at JSON pointer `path` inside store `id`.
    #[must_use]
    pub fn read(&self, id: &str, path: &str) -> Option<Value> {
        let stores = self.stores.read().unwrap_or_else(PoisonError::into_inner);
        stores
            .get(id)
            .and_then(|entry| entry.current.pointer(path))
            .cloned()
    }

    /// Write `value` at JSON pointer `path`, creating missing object keys.
    ///
    /// The empty path replaces the whole state, which must stay an object.
    pub fn set(&self, id: &str, path: &str, value: Value) -> Result<(), StoreError> {
        let mut stores = self.stores.write().unwrap_or_else(PoisonError::into_inner);
        let entry = stores
            .get_mut(id)
            .ok_or_else(|| StoreError::Unknown(id.to_string()))?;

        if path.is_empty() {
            if !value.is_object() {
                return Err(StoreError::NotAnObject(id.to_string()));
            }
            entry.current = value;
            return Ok(());
        }

        let invalid = || StoreError::InvalidPath {
            id: id.to_string(),
            path: path.to_string(),
        };
        let Some(rest) = path.strip_prefix('/') else {
            return Err(invalid());
        };
        let segments: Vec<String> = rest.split('/').map(unescape_segment).collect();
        let (last, parents) = segments.split_last().ok_or_else(invalid)?;

        let mut cursor = &mut entry.current;
        for segment in parents {
            cursor = match cursor {
                Value::Object(map) => map
                    .entry(segment.clone())
                    .or_insert_with(|| Value::Object(Map::new())),
                Value::Array(items) => {
                    let index = segment.parse::<usize>().map_err(|_| invalid())?;
                    items.get_mut(index).ok_or_else(invalid)?
                }
                _ => return Err(invalid()),
            };
        }

        match cursor {
            Value::Object(map) => {
                map.insert(last.clone(), value);
                Ok(())
            }
            Value::Array(items) => {
                let index = last.parse::<usize>().map_err(|_| invalid())?;
                let slot = items.get_mut(index).ok_or_else(invalid)?;
                *slot = value;
                Ok(())
            }
            _ => Err(invalid()),
        }
    }

    /// Restore store `id` to its initial state.
    pub fn reset(&self, id: &str) -> Result<(), StoreError> {
        let mut stores = self.stores.write().unwrap_or_else(PoisonError::into_inner);
        let entry = stores
            .get_mut(id)
            .ok_or_else(|| StoreError::Unknown(id.to_string()))?;
        entry.current = entry.initial.clone();
        Ok(())
    }

    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        let stores = self.stores.read().unwrap_or_else(PoisonError::into_inner);
        stores.keys().cloned().collect()
    }

    #[must_use]
    pub fn same_store(&self, other: &StateStore) -> bool {
        Arc::ptr_eq(&self.stores, &other.stores)
    }
}

fn unescape_segment(raw: &str) -> String {
    raw.replace("~1", "/").replace("~0", "~")
}

/// Initial stores to define, or the reason they could not be read from config.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub initial: Result<BTreeMap<String, Value>, StoreStateError>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            initial: Ok(BTreeMap::new()),
        }
    }
}

/// Build a fresh store from `settings` and register it into `ctx`.
pub fn wire(ctx: &mut AppContext, settings: &StoreSettings) -> Result<(), InitializerError> {
    let initial = settings
        .initial
        .as_ref()
        .map_err(|e| InitializerError::with_source("invalid initial store state", e.clone()))?;

    let store = StateStore::new();
    for (id, state) in initial {
        store.define(id.clone(), state.clone()).map_err(|e| {
            InitializerError::with_source(format!("could not define store `{id}`"), e)
        })?;
    }

    tracing::debug!(stores = initial.len(), "state store ready");
    ctx.register(CAPABILITY, store);
    Ok(())
}
