//! Bootstrap core for Plinth.
//!
//! An application is bootstrapped by running a fixed, ordered [`Registry`] of
//! initializers against one [`AppContext`] and one [`Ambient`], exactly once:
//!
//! ```text
//! host -> AppContext::new + Ambient::new -> install(&registry, ..)
//!                                              |
//!                         for each initializer, in declared order:
//!                           ContextBound -> run(&mut ctx, &mut ambient)
//!                           ContextFree  -> run(&mut ambient)
//!                           first Err    -> return InstallError
//! ```

mod ambient;
mod context;
mod install;
mod registry;

pub use ambient::Ambient;
pub use context::AppContext;
pub use install::install;
pub use registry::{Initializer, Registry, RegistryBuilder};

pub use plinth_types::{
    CapabilityKey, InitializerError, InitializerKind, InitializerName, InstallError,
    RegistryError,
};
