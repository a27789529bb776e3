//! Shared test utilities and fixtures
//!
//! Small initializers with observable effects, used to assemble registries
//! in whatever order a test needs.

#![allow(dead_code)]

use plinth_core::{Ambient, AppContext, InitializerError, InitializerName, Registry};

pub const A: InitializerName = InitializerName::new("a");
pub const B: InitializerName = InitializerName::new("b");
pub const C: InitializerName = InitializerName::new("c");

/// Ambient marker counting how many times `B` ran.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct AmbientMarker(pub u32);

/// `A`: sets `flag_a = true` on the context.
pub fn set_flag_a(ctx: &mut AppContext, _: &mut Ambient) -> Result<(), InitializerError> {
    ctx.set_flag("flag_a", true);
    Ok(())
}

/// `B`: ambient-only side effect.
pub fn mark_ambient(ambient: &mut Ambient) -> Result<(), InitializerError> {
    ambient.get_or_provide_with(AmbientMarker::default).0 += 1;
    Ok(())
}

/// `C`: copies `flag_a` into `flag_c` when it is present.
pub fn copy_flag_a(ctx: &mut AppContext, _: &mut Ambient) -> Result<(), InitializerError> {
    if let Some(value) = ctx.flag("flag_a") {
        ctx.set_flag("flag_c", value);
    }
    Ok(())
}

/// Registry of `A`, `B`, `C` in the order given by `order` (e.g. `"cab"`).
pub fn abc_registry(order: &str) -> Registry {
    order
        .chars()
        .fold(Registry::builder(), |builder, step| match step {
            'a' => builder.context_bound(A, set_flag_a),
            'b' => builder.context_free(B, mark_ambient),
            'c' => builder.context_bound(C, copy_flag_a),
            other => panic!("unknown initializer {other}"),
        })
        .build()
}

/// Write `contents` to a config file inside a fresh temp dir.
pub fn write_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, contents).expect("write config");
    (dir, path)
}
