//! Human-readable summary of a finished bootstrap.

use std::fmt::Write;

use plinth_core::{Ambient, AppContext, Registry};
use plinth_initializers::{ComponentLibrary, DebugConsole, StateStore, store, ui_kit};

pub(crate) fn render(registry: &Registry, context: &AppContext, ambient: &Ambient) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} bootstrapped", context.name());

    out.push_str("\ninitializers:\n");
    for (index, initializer) in registry.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {} ({})",
            index + 1,
            initializer.name(),
            initializer.kind()
        );
    }

    out.push_str("\ncapabilities:\n");
    for key in context.capability_keys() {
        let _ = write!(out, "  {key}");
        if let Some(state) = context.capability::<StateStore>(key)
            && key == store::CAPABILITY
        {
            let _ = write!(out, ": stores [{}]", state.ids().join(", "));
        } else if let Some(library) = context.capability::<ComponentLibrary>(key)
            && key == ui_kit::CAPABILITY
        {
            let _ = write!(
                out,
                ": {} components, {} theme",
                library.len(),
                library.theme()
            );
        }
        out.push('\n');
    }

    out.push_str("\nambient:\n");
    match ambient.get::<DebugConsole>() {
        Some(console) if console.is_attached() => {
            let _ = writeln!(
                out,
                "  debug console: attached, {} entries",
                console.entries().len()
            );
        }
        _ => out.push_str("  debug console: off\n"),
    }

    out
}
