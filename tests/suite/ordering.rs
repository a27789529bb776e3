//! Declared order is execution order, and later initializers can depend on earlier ones.

use plinth_core::{Ambient, AppContext, install};

use crate::common::{AmbientMarker, abc_registry};

#[test]
fn abc_order_propagates_flag() {
    let registry = abc_registry("abc");
    let mut ctx = AppContext::new("ordering");
    let mut ambient = Ambient::new();

    install(&registry, &mut ctx, &mut ambient).expect("install");

    assert_eq!(ctx.flag("flag_a"), Some(true));
    assert_eq!(ctx.flag("flag_c"), Some(true));
    assert_eq!(ambient.get::<AmbientMarker>(), Some(&AmbientMarker(1)));
}

#[test]
fn cab_order_leaves_flag_c_absent() {
    let registry = abc_registry("cab");
    let mut ctx = AppContext::new("ordering");
    let mut ambient = Ambient::new();

    install(&registry, &mut ctx, &mut ambient).expect("install");

    assert_eq!(ctx.flag("flag_a"), Some(true));
    assert_eq!(ctx.flag("flag_c"), None);
    assert!(!registry.requires_before("a", "c"));
}

#[test]
fn context_free_initializer_never_touches_context() {
    let registry = abc_registry("b");
    let mut ctx = AppContext::new("ordering");
    let mut ambient = Ambient::new();

    install(&registry, &mut ctx, &mut ambient).expect("install");

    assert!(ctx.capability_keys().is_empty());
    assert_eq!(ctx.flag("flag_a"), None);
    assert!(ambient.contains::<AmbientMarker>());
}

#[test]
fn installing_twice_applies_effects_twice() {
    let registry = abc_registry("abc");
    let mut ctx = AppContext::new("ordering");
    let mut ambient = Ambient::new();

    install(&registry, &mut ctx, &mut ambient).expect("first install");
    install(&registry, &mut ctx, &mut ambient).expect("second install");

    assert_eq!(ambient.get::<AmbientMarker>(), Some(&AmbientMarker(2)));
}
