//! Bootstrap error types.

use std::error::Error as StdError;

use thiserror::Error;

use crate::InitializerName;

type BoxedSource = Box<dyn StdError + Send + Sync + 'static>;

/// Failure raised by a single initializer during its own setup.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct InitializerError {
    message: String,
    #[source]
    source: Option<BoxedSource>,
}

impl InitializerError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn with_source(message: impl Into<String>, source: impl Into<BoxedSource>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failure of `install`: the first initializer that failed, and where it sat in the registry.
///
/// Initializers before `index` have already been applied; none after it ran.
#[derive(Debug, Error)]
#[error("initializer `{name}` at position {index} failed")]
pub struct InstallError {
    name: InitializerName,
    index: usize,
    #[source]
    source: InitializerError,
}

impl InstallError {
    #[must_use]
    pub fn new(name: InitializerName, index: usize, source: InitializerError) -> Self {
        Self {
            name,
            index,
            source,
        }
    }

    #[must_use]
    pub const fn name(&self) -> InitializerName {
        self.name
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn cause(&self) -> &InitializerError {
        &self.source
    }

    #[must_use]
    pub fn into_cause(self) -> InitializerError {
        self.source
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("installer registry must contain at least one initializer")]
    Empty,
    #[error("duplicate initializer name `{0}`")]
    Duplicate(InitializerName),
}
