//! End-to-end bootstrap through the default registry.

use plinth_config::PlinthConfig;
use plinth_core::{Ambient, AppContext, install};
use plinth_initializers::{
    ComponentLibrary, ConsoleSettings, DebugConsole, Settings, StateStore, debug_console,
    default_registry, store, ui_kit,
};
use plinth_types::Theme;
use serde_json::json;
use tracing_subscriber::prelude::*;

use crate::common::write_config;

const FULL_CONFIG: &str = r#"
[app]
name = "shop"

[store.initial.app]
theme = "dark"

[store.initial.cart]
items = []

[debug_console]
enabled = true
capacity = 32

[ui]
theme = "light"
components = ["swiper"]
"#;

#[test]
fn config_file_drives_every_initializer() {
    let (_dir, path) = write_config(FULL_CONFIG);
    let config = PlinthConfig::load_from(&path)
        .expect("load")
        .expect("config present");
    let registry = default_registry(Settings::from_config(Some(&config)));
    registry.validate().expect("valid registry");
    let mut ctx = AppContext::new(config.app_name());
    let mut ambient = Ambient::new();

    install(&registry, &mut ctx, &mut ambient).expect("install");

    assert_eq!(ctx.name(), "shop");
    assert_eq!(ctx.capability_keys(), vec![store::CAPABILITY, ui_kit::CAPABILITY]);

    let state = ctx.capability::<StateStore>(store::CAPABILITY).expect("store");
    assert_eq!(state.ids(), vec!["app".to_string(), "cart".to_string()]);
    assert_eq!(state.read("cart", "/items"), Some(json!([])));

    let library = ctx
        .capability::<ComponentLibrary>(ui_kit::CAPABILITY)
        .expect("ui kit");
    assert_eq!(library.theme(), Theme::Dark);
    assert!(library.contains("swiper"));

    assert!(ambient.get::<DebugConsole>().expect("console").is_attached());
}

#[test]
fn store_handle_is_shared_across_components() {
    let registry = default_registry(Settings {
        console: ConsoleSettings {
            enabled: false,
            capacity: 1,
        },
        ..Settings::default()
    });
    let mut ctx = AppContext::new("shared");
    let mut ambient = Ambient::new();
    install(&registry, &mut ctx, &mut ambient).expect("install");

    let handle = ctx
        .capability::<StateStore>(store::CAPABILITY)
        .expect("store")
        .clone();
    handle.define("session", json!({"user": null})).expect("define");
    handle
        .set("session", "/user", json!("ana"))
        .expect("set");

    let seen = ctx.capability::<StateStore>(store::CAPABILITY).expect("store");
    assert_eq!(seen.read("session", "/user"), Some(json!("ana")));
}

#[test]
fn host_console_captures_events_once_attached() {
    let console = DebugConsole::new();
    let subscriber = tracing_subscriber::registry().with(console.layer());

    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("before bootstrap");

        let registry = default_registry(Settings {
            console: ConsoleSettings {
                enabled: true,
                capacity: 64,
            },
            ..Settings::default()
        });
        let mut ctx = AppContext::new("console");
        let mut ambient = Ambient::new();
        ambient.provide(console.clone());

        install(&registry, &mut ctx, &mut ambient).expect("install");
        tracing::info!("after bootstrap");
    });

    let messages: Vec<String> = console.entries().into_iter().map(|e| e.message).collect();
    assert!(!messages.iter().any(|m| m == "before bootstrap"));
    assert!(messages.iter().any(|m| m.starts_with("debug console attached")));
    assert_eq!(messages.last().map(String::as_str), Some("after bootstrap"));
}

#[test]
fn second_default_install_fails_on_console_reattach() {
    let registry = default_registry(Settings {
        console: ConsoleSettings {
            enabled: true,
            capacity: 8,
        },
        ..Settings::default()
    });
    let mut ctx = AppContext::new("twice");
    let mut ambient = Ambient::new();

    install(&registry, &mut ctx, &mut ambient).expect("first install");
    let err = install(&registry, &mut ctx, &mut ambient).expect_err("second install");

    assert_eq!(err.name(), debug_console::NAME);
    // The store initializer already ran again before the failure.
    assert_eq!(ctx.registrations(store::CAPABILITY), 2);
    assert_eq!(ctx.registrations(ui_kit::CAPABILITY), 1);
}

#[test]
fn missing_config_file_bootstraps_with_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = PlinthConfig::load_from(&dir.path().join("none.toml")).expect("load");
    assert!(config.is_none());

    let registry = default_registry(Settings::from_config(config.as_ref()));
    let mut ctx = AppContext::new(PlinthConfig::default().app_name());
    let mut ambient = Ambient::new();
    install(&registry, &mut ctx, &mut ambient).expect("install");

    assert_eq!(ctx.name(), "plinth");
    let library = ctx
        .capability::<ComponentLibrary>(ui_kit::CAPABILITY)
        .expect("ui kit");
    assert_eq!(library.theme(), Theme::Light);
}

#[test]
fn malformed_config_warns_once_and_falls_back_to_defaults() {
    let (_dir, path) = write_config("[app\nname = ");
    let console = DebugConsole::new();
    console.attach(16).expect("attach");
    let subscriber = tracing_subscriber::registry().with(console.layer());

    let config = tracing::subscriber::with_default(subscriber, || {
        PlinthConfig::load_from(&path).ok().flatten()
    });

    assert!(config.is_none());
    let warnings: Vec<_> = console
        .entries()
        .into_iter()
        .filter(|e| e.level == tracing::Level::WARN)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.starts_with("Failed to parse config"));
}
