//! Core domain types for Plinth.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the bootstrap.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod error;
mod theme;

pub use error::{InitializerError, InstallError, RegistryError};
pub use theme::{Theme, ThemeParseError};

use std::fmt;

// ============================================================================
// Compile-time checked names
// ============================================================================

/// Name of an initializer in the installer registry.
///
/// Names are `'static` because the registry is fixed at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InitializerName(&'static str);

impl InitializerName {
    #[must_use]
    pub const fn new(value: &'static str) -> Self {
        assert!(!value.is_empty(), "InitializerName must not be empty");
        Self(value)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for InitializerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl AsRef<str> for InitializerName {
    fn as_ref(&self) -> &str {
        self.0
    }
}

/// Key under which a capability is registered in the application context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CapabilityKey(&'static str);

impl CapabilityKey {
    #[must_use]
    pub const fn new(value: &'static str) -> Self {
        assert!(!value.is_empty(), "CapabilityKey must not be empty");
        Self(value)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for CapabilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

// ============================================================================
// Initializer classification
// ============================================================================

/// Whether an initializer needs the application context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InitializerKind {
    /// Receives the application context and registers capabilities into it.
    ContextBound,
    /// Touches ambient process state only.
    ContextFree,
}

impl InitializerKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            InitializerKind::ContextBound => "context-bound",
            InitializerKind::ContextFree => "context-free",
        }
    }

    #[must_use]
    pub const fn needs_context(self) -> bool {
        matches!(self, InitializerKind::ContextBound)
    }
}

impl fmt::Display for InitializerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
