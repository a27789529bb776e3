//! The installer aggregator.

use plinth_types::InstallError;

use crate::{Ambient, AppContext, Registry};

/// Apply every initializer in `registry`, in order, to `context` and `ambient`.
///
/// Runs synchronously and stops at the first failure, which is returned as-is
/// (tagged with the initializer's name and position). Effects of initializers
/// that already ran are not rolled back.
///
/// Nothing here guards against a second call: initializers are not idempotent,
/// so calling this twice applies every effect twice.
pub fn install(
    registry: &Registry,
    context: &mut AppContext,
    ambient: &mut Ambient,
) -> Result<(), InstallError> {
    let _span = tracing::info_span!(
        "install",
        app = context.name(),
        initializers = registry.len()
    )
    .entered();

    for (index, initializer) in registry.iter().enumerate() {
        let name = initializer.name();
        tracing::debug!(index, name = %name, kind = %initializer.kind(), "running initializer");
        initializer
            .run(context, ambient)
            .map_err(|source| InstallError::new(name, index, source))?;
    }

    Ok(())
}
