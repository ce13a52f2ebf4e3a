#![forbid(unsafe_code)]

//! Shell wiring: one device store and one sidebar per root, driven by host
//! events.
//!
//! Run:
//!   cargo test -p vista --test shell

use std::rc::Rc;
use std::time::Duration;

use vista::prelude::*;
use vista::{FixedViewport, MemoryStorage, StaticStyleSource, runtime::STORAGE_KEY};
use web_time::Instant;

fn shell_with(
    width: u32,
    storage: Rc<MemoryStorage>,
    config: ShellConfig,
) -> (Rc<FixedViewport>, Shell) {
    let viewport = Rc::new(FixedViewport::new(width));
    let shell = Shell::new(
        viewport.clone(),
        Rc::new(StaticStyleSource::new()),
        storage,
        config,
    )
    .unwrap();
    (viewport, shell)
}

#[test]
fn headless_shell_is_initialized() {
    let shell = Shell::headless(1440).unwrap();
    assert!(shell.is_listening());
    assert!(shell.sidebar().is_initialized());
    assert_eq!(shell.device().current_breakpoint(), Breakpoint::Xxl);
    assert_eq!(shell.sidebar().offset(), LayoutOffset::Active("64px".into()));
}

#[test]
fn sidebar_shares_the_shell_device() {
    let storage = Rc::new(MemoryStorage::new().with_entry(STORAGE_KEY, "true"));
    let (viewport, shell) = shell_with(1280, storage, ShellConfig::default());
    let t = Instant::now();

    viewport.set_width(480);
    shell.on_resize(t);
    assert_eq!(shell.next_deadline(), Some(t + Duration::from_millis(100)));
    assert!(shell.tick(t + Duration::from_millis(100)));

    assert_eq!(shell.device().current_breakpoint(), Breakpoint::Xs);
    assert!(shell.sidebar().is_mobile());
    assert!(!shell.sidebar().is_open());
    assert_eq!(shell.sidebar().device().screen_width(), 480);
}

#[test]
fn configured_timing_is_used() {
    let mut config = ShellConfig::default();
    config.orientation_delay_ms = 300;
    let (viewport, shell) = shell_with(1280, Rc::new(MemoryStorage::new()), config);
    let t = Instant::now();

    viewport.set_width(700);
    shell.on_orientation_change(t);
    assert!(!shell.tick(t + Duration::from_millis(200)));
    assert!(shell.tick(t + Duration::from_millis(300)));
    assert!(shell.sidebar().is_mobile());
}

#[test]
fn teardown_stops_listening() {
    let (viewport, mut shell) =
        shell_with(1280, Rc::new(MemoryStorage::new()), ShellConfig::default());
    let t = Instant::now();
    viewport.set_width(400);
    shell.on_resize(t);

    shell.teardown();
    shell.teardown();
    assert!(!shell.is_listening());
    assert!(!shell.tick(t + Duration::from_secs(1)));
    assert_eq!(shell.device().screen_width(), 1280);
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = ShellConfig::default();
    config.sidebar.storage_key = String::new();
    let err = Shell::new(
        Rc::new(FixedViewport::new(1024)),
        Rc::new(StaticStyleSource::new()),
        Rc::new(MemoryStorage::new()),
        config,
    )
    .unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().contains("storage_key"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn responsive_values_follow_the_device() {
    let (viewport, shell) = shell_with(500, Rc::new(MemoryStorage::new()), ShellConfig::default());
    let columns = Responsive::new(1).at(Breakpoint::Md, 2).at(Breakpoint::Xl, 4);
    assert_eq!(shell.resolve(&columns), 1);

    viewport.set_width(1300);
    shell.device().recompute();
    assert_eq!(shell.resolve(&columns), 4);
}

#[test]
fn widget_errors_convert() {
    let mut wheel = vista::FortuneWheel::with_seed(vec![], 1);
    let err: Error = wheel.spin(None, Instant::now()).unwrap_err().into();
    assert_eq!(err.to_string(), "spin rejected: wheel has no slices");

    let form = vista::ClampForm {
        max_font: vista::widgets::Length::px(1.0),
        ..vista::ClampForm::default()
    };
    let err: Error = form.compute().unwrap_err().into();
    assert_eq!(err.to_string(), "Invalid values");
}

#[cfg(feature = "state-persistence")]
#[test]
fn expansion_survives_a_new_shell() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let open = |path: &std::path::Path| {
        Shell::new(
            Rc::new(FixedViewport::new(1280)),
            Rc::new(StaticStyleSource::new()),
            Rc::new(vista::FileStorage::new(path)),
            ShellConfig::default(),
        )
        .unwrap()
    };

    let first = open(&path);
    assert!(!first.sidebar().is_expanded());
    first.sidebar().toggle_expansion();
    assert!(first.sidebar().is_expanded());
    drop(first);
    assert!(path.exists());

    let second = open(&path);
    assert!(second.sidebar().is_expanded());
    assert_eq!(second.sidebar().offset(), LayoutOffset::Active("280px".into()));
}
