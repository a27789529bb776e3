//! The first failing initializer stops the bootstrap; nothing is rolled back.

use std::error::Error as _;

use plinth_core::{Ambient, AppContext, InitializerError, Registry, install};
use plinth_initializers::{
    ComponentLibrary, DebugConsole, Settings, StateStore, default_registry, store, ui_kit,
};

use crate::common::{A, B, C, set_flag_a, write_config};

#[test]
fn second_of_three_failing_keeps_first_and_skips_third() {
    let registry = Registry::builder()
        .context_bound(A, set_flag_a)
        .context_free(B, |_| {
            Err(InitializerError::new("inspector refused to attach"))
        })
        .context_bound(C, |ctx, _| {
            ctx.set_flag("flag_c", true);
            Ok(())
        })
        .build();
    let mut ctx = AppContext::new("fail-fast");
    let mut ambient = Ambient::new();

    let err = install(&registry, &mut ctx, &mut ambient).expect_err("B fails");

    assert_eq!(err.name(), B);
    assert_eq!(err.index(), 1);
    assert_eq!(
        err.source().map(ToString::to_string).as_deref(),
        Some("inspector refused to attach")
    );
    assert_eq!(ctx.flag("flag_a"), Some(true));
    assert_eq!(ctx.flag("flag_c"), None);
}

#[test]
fn bad_store_theme_fails_ui_kit_after_store_and_console() {
    let (_dir, path) = write_config(
        r#"
[store.initial.app]
theme = "neon"

[debug_console]
enabled = true
"#,
    );
    let config = plinth_config::PlinthConfig::load_from(&path)
        .expect("load")
        .expect("config present");
    let registry = default_registry(Settings::from_config(Some(&config)));
    let mut ctx = AppContext::new(config.app_name());
    let mut ambient = Ambient::new();

    let err = install(&registry, &mut ctx, &mut ambient).expect_err("ui kit fails");

    assert_eq!(err.name(), ui_kit::NAME);
    assert_eq!(err.index(), 2);
    assert!(ctx.capability::<StateStore>(store::CAPABILITY).is_some());
    assert!(ambient.get::<DebugConsole>().expect("console").is_attached());
    assert!(ctx.capability::<ComponentLibrary>(ui_kit::CAPABILITY).is_none());
}

#[test]
fn zero_console_capacity_stops_before_ui_kit() {
    let (_dir, path) = write_config("[debug_console]\nenabled = true\ncapacity = 0\n");
    let config = plinth_config::PlinthConfig::load_from(&path)
        .expect("load")
        .expect("config present");
    let registry = default_registry(Settings::from_config(Some(&config)));
    let mut ctx = AppContext::new("fail-fast");
    let mut ambient = Ambient::new();

    let err = install(&registry, &mut ctx, &mut ambient).expect_err("console fails");

    assert_eq!(err.name(), plinth_initializers::debug_console::NAME);
    assert!(ctx.has_capability(store::CAPABILITY));
    assert!(!ctx.has_capability(ui_kit::CAPABILITY));
}
