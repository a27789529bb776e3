//! Process-wide ambient state.
//!
//! Instead of hidden globals, facilities that outlive any one context are held
//! here and passed explicitly to every initializer. Facilities are keyed by
//! their type, so there is at most one of each.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;

struct Facility {
    type_name: &'static str,
    value: Box<dyn Any>,
}

#[derive(Default)]
pub struct Ambient {
    facilities: HashMap<TypeId, Facility>,
}

impl Ambient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `value`, returning the facility of the same type it replaced.
    pub fn provide<T: Any>(&mut self, value: T) -> Option<T> {
        let previous = self.facilities.insert(
            TypeId::of::<T>(),
            Facility {
                type_name: type_name::<T>(),
                value: Box::new(value),
            },
        );
        previous.and_then(|facility| facility.value.downcast::<T>().ok().map(|boxed| *boxed))
    }

    #[must_use]
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.facilities
            .get(&TypeId::of::<T>())
            .and_then(|facility| facility.value.downcast_ref::<T>())
    }

    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.facilities
            .get_mut(&TypeId::of::<T>())
            .and_then(|facility| facility.value.downcast_mut::<T>())
    }

    /// Existing facility of type `T`, or the one built by `make`.
    pub fn get_or_provide_with<T: Any>(&mut self, make: impl FnOnce() -> T) -> &mut T {
        let facility = self
            .facilities
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Facility {
                type_name: type_name::<T>(),
                value: Box::new(make()),
            });
        facility
            .value
            .downcast_mut::<T>()
            .unwrap_or_else(|| unreachable!("facility keyed by TypeId holds that type"))
    }

    #[must_use]
    pub fn contains<T: Any>(&self) -> bool {
        self.facilities.contains_key(&TypeId::of::<T>())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }

    /// Type names of installed facilities, sorted.
    #[must_use]
    pub fn facility_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.facilities.values().map(|f| f.type_name).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for Ambient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ambient")
            .field("facilities", &self.facility_names())
            .finish()
    }
}
