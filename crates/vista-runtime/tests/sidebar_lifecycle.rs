#![forbid(unsafe_code)]

//! End-to-end sidebar behavior driven through the device store's debounced
//! resize path, plus the warnings emitted on degraded inputs.
//!
//! Run:
//!   cargo test -p vista-runtime --test sidebar_lifecycle

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing_subscriber::layer::SubscriberExt;
use vista_layout::{Breakpoint, StaticStyleSource};
use vista_runtime::{
    DeviceStore, FixedViewport, LayoutOffset, MemoryStorage, STORAGE_KEY, ShellConfig,
    SidebarCoordinator,
};
use web_time::Instant;

// ============================================================================
// Test Infrastructure
// ============================================================================

struct Harness {
    viewport: Rc<FixedViewport>,
    storage: Rc<MemoryStorage>,
    device: DeviceStore,
    sidebar: SidebarCoordinator,
    clock: Instant,
}

impl Harness {
    fn new(width: u32, storage: MemoryStorage, config: &ShellConfig) -> Self {
        let viewport = Rc::new(FixedViewport::new(width));
        let style = Rc::new(StaticStyleSource::new());
        let storage = Rc::new(storage);
        let device = DeviceStore::new(viewport.clone(), style.clone(), config.to_device_timing());
        let sidebar = SidebarCoordinator::new(
            device.clone(),
            storage.clone(),
            style,
            config.to_sidebar_config(),
        );
        Self {
            viewport,
            storage,
            device,
            sidebar,
            clock: Instant::now(),
        }
    }

    /// Resize through the debounced listener path and let the timer fire.
    fn drag_to(&mut self, widths: &[u32]) {
        for &w in widths {
            self.viewport.set_width(w);
            self.device.on_resize(self.clock);
            self.clock += Duration::from_millis(16);
        }
        self.clock += Duration::from_millis(200);
        self.device.tick(self.clock);
    }
}

#[derive(Debug, Clone)]
struct Captured {
    level: tracing::Level,
    message: String,
}

struct Capture(Arc<Mutex<Vec<Captured>>>);

struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for Capture {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.0.lock().unwrap().push(Captured {
            level: *event.metadata().level(),
            message: visitor.0,
        });
    }
}

fn capture_events(f: impl FnOnce()) -> Vec<Captured> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(Capture(events.clone()));
    tracing::subscriber::with_default(subscriber, f);
    let out = events.lock().unwrap().clone();
    out
}

fn warnings(events: &[Captured]) -> Vec<&str> {
    events
        .iter()
        .filter(|e| e.level == tracing::Level::WARN)
        .map(|e| e.message.as_str())
        .collect()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn window_drag_across_the_mobile_boundary() {
    let mut h = Harness::new(
        1280,
        MemoryStorage::new().with_entry(STORAGE_KEY, "true"),
        &ShellConfig::default(),
    );
    let _listeners = h.device.attach_listeners();
    h.sidebar.initialize();
    assert_eq!(h.sidebar.offset(), LayoutOffset::Active("280px".into()));

    h.drag_to(&[1100, 900, 700, 640]);
    assert_eq!(h.device.current_breakpoint(), Breakpoint::Sm);
    let state = h.sidebar.snapshot();
    assert!(state.is_mobile);
    assert!(!state.is_open);
    assert!(!state.is_expanded);
    assert_eq!(h.sidebar.offset(), LayoutOffset::Removed);

    h.sidebar.toggle_sidebar();
    assert!(h.sidebar.is_open());
    h.sidebar.close_sidebar();
    assert!(!h.sidebar.is_open());

    h.drag_to(&[800, 1300]);
    let state = h.sidebar.snapshot();
    assert!(!state.is_mobile && state.is_open && state.is_expanded);
    assert_eq!(h.sidebar.offset(), LayoutOffset::Active("280px".into()));
    assert_eq!(h.storage.raw(STORAGE_KEY).as_deref(), Some("true"));
}

#[test]
fn offset_stream_during_desktop_session() {
    let h = Harness::new(1024, MemoryStorage::new(), &ShellConfig::default());
    let offsets = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&offsets);
    let _sub = h
        .sidebar
        .subscribe_offset(move |o| log.borrow_mut().push(o.clone()));

    h.sidebar.initialize();
    h.sidebar.toggle_sidebar();
    h.sidebar.toggle_visibility();
    h.sidebar.handle_before_hide();
    h.sidebar.toggle_visibility();

    let active = |w: &str| LayoutOffset::Active(w.to_string());
    assert_eq!(
        *offsets.borrow(),
        vec![active("64px"), active("280px"), LayoutOffset::Removed, active("280px")]
    );
}

#[test]
fn configured_breakpoint_and_storage_key() {
    let mut config = ShellConfig::default();
    config.sidebar.mobile_breakpoint = Some(Breakpoint::Lg);
    config.sidebar.storage_key = "nav-expanded".into();

    let h = Harness::new(1000, MemoryStorage::new(), &config);
    h.sidebar.initialize();
    assert!(h.sidebar.is_mobile(), "1000 is below lg");
    assert!(!h.device.is_mobile(), "but not below md");

    h.viewport.set_width(1400);
    h.device.recompute();
    h.sidebar.toggle_expansion();
    assert_eq!(h.storage.raw("nav-expanded").as_deref(), Some("true"));
    assert_eq!(h.storage.raw(STORAGE_KEY), None);
}

#[test]
fn teardown_drops_pending_resize() {
    let h = Harness::new(1280, MemoryStorage::new(), &ShellConfig::default());
    let listeners = h.device.attach_listeners();
    h.sidebar.initialize();

    h.viewport.set_width(500);
    h.device.on_resize(h.clock);
    drop(listeners);

    assert!(!h.device.tick(h.clock + Duration::from_secs(1)));
    assert!(!h.sidebar.is_mobile());
}

#[test]
fn dropped_coordinator_stops_reacting() {
    // Stored "true" means a live coordinator would rewrite it on the way back
    // to desktop.
    let h = Harness::new(
        1280,
        MemoryStorage::new().with_entry(STORAGE_KEY, "true"),
        &ShellConfig::default(),
    );
    h.sidebar.initialize();
    let Harness {
        viewport,
        storage,
        device,
        sidebar,
        ..
    } = h;
    drop(sidebar);

    viewport.set_width(500);
    device.recompute();
    viewport.set_width(1280);
    device.recompute();
    assert_eq!(storage.write_count(), 0);
}

// ============================================================================
// Logging
// ============================================================================

#[test]
fn invalid_breakpoint_names_warn() {
    let h = Harness::new(1280, MemoryStorage::new(), &ShellConfig::default());
    let events = capture_events(|| {
        assert!(!h.device.is_at_least("tablet"));
        assert!(!h.device.is_between("xl", "md"));
        assert!(!h.device.is_between("md", "md"));
    });
    let warns = warnings(&events);
    assert_eq!(warns.len(), 3, "{events:?}");
    assert!(warns.iter().all(|m| m.contains("breakpoint")));
}

#[test]
fn unavailable_storage_warns_but_state_changes() {
    let storage = MemoryStorage::new();
    storage.set_available(false);
    let h = Harness::new(1280, storage, &ShellConfig::default());

    let events = capture_events(|| {
        h.sidebar.initialize();
        h.sidebar.toggle_expansion();
    });
    assert!(h.sidebar.is_expanded());
    let warns = warnings(&events);
    assert!(warns.iter().any(|m| m.contains("failed to persist flag")), "{events:?}");
}
