//! The installer registry: an ordered list of initializers.
//!
//! The registry is plain data. Its order can be inspected and checked without
//! running anything; [`crate::install`] is the only thing that executes it.

use std::collections::HashSet;
use std::fmt;

use plinth_types::{InitializerError, InitializerKind, InitializerName, RegistryError};

use crate::{Ambient, AppContext};

type ContextBoundFn = Box<dyn Fn(&mut AppContext, &mut Ambient) -> Result<(), InitializerError>>;
type ContextFreeFn = Box<dyn Fn(&mut Ambient) -> Result<(), InitializerError>>;

/// One unit of startup setup.
pub enum Initializer {
    /// Registers capabilities into the application context.
    ContextBound {
        name: InitializerName,
        run: ContextBoundFn,
    },
    /// Sets up ambient process state only; never sees the context.
    ContextFree {
        name: InitializerName,
        run: ContextFreeFn,
    },
}

impl Initializer {
    pub fn context_bound<F>(name: InitializerName, run: F) -> Self
    where
        F: Fn(&mut AppContext, &mut Ambient) -> Result<(), InitializerError> + 'static,
    {
        Self::ContextBound {
            name,
            run: Box::new(run),
        }
    }

    pub fn context_free<F>(name: InitializerName, run: F) -> Self
    where
        F: Fn(&mut Ambient) -> Result<(), InitializerError> + 'static,
    {
        Self::ContextFree {
            name,
            run: Box::new(run),
        }
    }

    #[must_use]
    pub fn name(&self) -> InitializerName {
        match self {
            Self::ContextBound { name, .. } | Self::ContextFree { name, .. } => *name,
        }
    }

    #[must_use]
    pub fn kind(&self) -> InitializerKind {
        match self {
            Self::ContextBound { .. } => InitializerKind::ContextBound,
            Self::ContextFree { .. } => InitializerKind::ContextFree,
        }
    }

    pub(crate) fn run(
        &self,
        context: &mut AppContext,
        ambient: &mut Ambient,
    ) -> Result<(), InitializerError> {
        match self {
            Self::ContextBound { run, .. } => run(context, ambient),
            Self::ContextFree { run, .. } => run(ambient),
        }
    }
}

impl fmt::Debug for Initializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Initializer")
            .field("name", &self.name())
            .field("kind", &self.kind())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    initializers: Vec<Initializer>,
}

impl Registry {
    #[must_use]
    pub fn new(initializers: Vec<Initializer>) -> Self {
        Self { initializers }
    }

    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.initializers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.initializers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Initializer> {
        self.initializers.iter()
    }

    /// Initializer names in execution order.
    #[must_use]
    pub fn names(&self) -> Vec<InitializerName> {
        self.initializers.iter().map(Initializer::name).collect()
    }

    #[must_use]
    pub fn kinds(&self) -> Vec<InitializerKind> {
        self.initializers.iter().map(Initializer::kind).collect()
    }

    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.initializers
            .iter()
            .position(|init| init.name().as_str() == name)
    }

    /// `true` when both are registered and `earlier` runs strictly before `later`.
    #[must_use]
    pub fn requires_before(&self, earlier: &str, later: &str) -> bool {
        match (self.position(earlier), self.position(later)) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        }
    }

    /// Reject an empty registry or one with repeated names.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.initializers.is_empty() {
            return Err(RegistryError::Empty);
        }
        let mut seen = HashSet::new();
        for init in &self.initializers {
            if !seen.insert(init.name()) {
                return Err(RegistryError::Duplicate(init.name()));
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a Initializer;
    type IntoIter = std::slice::Iter<'a, Initializer>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Appends initializers in call order.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    initializers: Vec<Initializer>,
}

impl RegistryBuilder {
    pub fn push(mut self, initializer: Initializer) -> Self {
        self.initializers.push(initializer);
        self
    }

    pub fn context_bound<F>(self, name: InitializerName, run: F) -> Self
    where
        F: Fn(&mut AppContext, &mut Ambient) -> Result<(), InitializerError> + 'static,
    {
        self.push(Initializer::context_bound(name, run))
    }

    pub fn context_free<F>(self, name: InitializerName, run: F) -> Self
    where
        F: Fn(&mut Ambient) -> Result<(), InitializerError> + 'static,
    {
        self.push(Initializer::context_free(name, run))
    }

    #[must_use]
    pub fn build(self) -> Registry {
        Registry::new(self.initializers)
    }

    pub fn try_build(self) -> Result<Registry, RegistryError> {
        let registry = self.build();
        registry.validate()?;
        Ok(registry)
    }
}
