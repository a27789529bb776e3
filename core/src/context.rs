//! The application context that initializers register capabilities into.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use plinth_types::CapabilityKey;

struct CapabilitySlot {
    value: Box<dyn Any>,
    registrations: u32,
}

/// Host application handle passed through bootstrap.
///
/// Capabilities are typed values stored under a [`CapabilityKey`]. Registering
/// an existing key replaces the value; the per-key registration count keeps
/// double registration observable.
pub struct AppContext {
    name: String,
    capabilities: HashMap<CapabilityKey, CapabilitySlot>,
    flags: BTreeMap<String, bool>,
}

impl AppContext {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capabilities: HashMap::new(),
            flags: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register `value` under `key`. Returns `true` if an earlier value was replaced.
    pub fn register<T: Any>(&mut self, key: CapabilityKey, value: T) -> bool {
        match self.capabilities.get_mut(&key) {
            Some(slot) => {
                slot.value = Box::new(value);
                slot.registrations += 1;
                tracing::debug!(capability = %key, registrations = slot.registrations, "capability replaced");
                true
            }
            None => {
                self.capabilities.insert(
                    key,
                    CapabilitySlot {
                        value: Box::new(value),
                        registrations: 1,
                    },
                );
                tracing::debug!(capability = %key, "capability registered");
                false
            }
        }
    }

    /// Typed lookup. `None` if the key is absent or holds a different type.
    #[must_use]
    pub fn capability<T: Any>(&self, key: CapabilityKey) -> Option<&T> {
        self.capabilities
            .get(&key)
            .and_then(|slot| slot.value.downcast_ref::<T>())
    }

    pub fn capability_mut<T: Any>(&mut self, key: CapabilityKey) -> Option<&mut T> {
        self.capabilities
            .get_mut(&key)
            .and_then(|slot| slot.value.downcast_mut::<T>())
    }

    #[must_use]
    pub fn has_capability(&self, key: CapabilityKey) -> bool {
        self.capabilities.contains_key(&key)
    }

    /// How many times `key` has been registered (0 if never).
    #[must_use]
    pub fn registrations(&self, key: CapabilityKey) -> u32 {
        self.capabilities
            .get(&key)
            .map_or(0, |slot| slot.registrations)
    }

    /// Registered keys in sorted order.
    #[must_use]
    pub fn capability_keys(&self) -> Vec<CapabilityKey> {
        let mut keys: Vec<_> = self.capabilities.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    pub fn set_flag(&mut self, name: impl Into<String>, value: bool) {
        self.flags.insert(name.into(), value);
    }

    #[must_use]
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.flags.get(name).copied()
    }
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("name", &self.name)
            .field("capabilities", &self.capability_keys())
            .field("flags", &self.flags)
            .finish()
    }
}
