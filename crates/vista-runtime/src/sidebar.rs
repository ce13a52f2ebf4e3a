#![forbid(unsafe_code)]

//! Sidebar state coordinator.
//!
//! One [`SidebarCoordinator`] per application root owns the sidebar's open
//! and expanded flags, the device class it was last laid out for, and the
//! layout offset the rendering layer applies to the main content.
//!
//! # State machine
//!
//! ```text
//!             mobile                          desktop
//!   ┌───────────────────────┐       ┌──────────────────────────────┐
//!   │ closed ⇄ open (full)  │──────▶│ open, expanded from storage  │
//!   │ expanded always false │◀──────│ expanded ⇄ minimized         │
//!   └───────────────────────┘       └──────────────────────────────┘
//! ```
//!
//! Entering mobile closes the sidebar, clears `expanded` (without touching
//! storage) and removes the offset. Entering desktop opens it, restores the
//! persisted `expanded` flag and applies the matching offset.
//!
//! # Invariants
//!
//! 1. On mobile, `is_expanded` is `false` whenever observed from outside.
//! 2. Storage is written only on desktop, only by expansion changes.
//! 3. Watchers are registered exactly once, however many consumers call
//!    [`SidebarCoordinator::initialize`].
//! 4. While open on desktop, the offset equals the cached width for the
//!    current expansion state.
//!
//! # Failure Modes
//!
//! Storage errors are logged by the flag helpers and otherwise ignored; the
//! in-memory state stays authoritative for the session.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, info, info_span};
use vista_layout::{Breakpoint, SidebarWidths, StyleCache, StyleSource, load_sidebar_widths};

use crate::device::DeviceStore;
use crate::reactive::{Observable, Subscription};
use crate::storage::{StorageBackend, load_flag, save_flag};

/// Storage key for the persisted expansion flag.
pub const STORAGE_KEY: &str = "sidebar-expanded";

/// Expanded width used when the theme does not define one.
pub const DEFAULT_EXPANDED_WIDTH: &str = "280px";
/// Minimized width used when the theme does not define one.
pub const DEFAULT_MINIMIZED_WIDTH: &str = "64px";

/// The offset the main content should reserve for the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LayoutOffset {
    /// No offset; content spans the full width.
    #[default]
    Removed,
    /// Offset by this CSS length.
    Active(String),
}

impl LayoutOffset {
    /// The active width, if any.
    #[must_use]
    pub fn width(&self) -> Option<&str> {
        match self {
            Self::Removed => None,
            Self::Active(w) => Some(w),
        }
    }
}

impl fmt::Display for LayoutOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Removed => f.write_str("none"),
            Self::Active(w) => f.write_str(w),
        }
    }
}

/// Point-in-time view of the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidebarState {
    pub is_open: bool,
    pub is_expanded: bool,
    pub is_mobile: bool,
    pub initialized: bool,
}

/// Construction options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarConfig {
    pub storage_key: String,
    /// Tier below which the sidebar uses mobile behavior. `None` follows the
    /// device store's own classification (below `md`).
    pub mobile_breakpoint: Option<Breakpoint>,
    pub fallback_widths: SidebarWidths,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            mobile_breakpoint: None,
            fallback_widths: SidebarWidths {
                expanded: DEFAULT_EXPANDED_WIDTH.to_string(),
                minimized: DEFAULT_MINIMIZED_WIDTH.to_string(),
            },
        }
    }
}

struct SidebarShared {
    device: DeviceStore,
    storage: Rc<dyn StorageBackend>,
    style: Rc<dyn StyleSource>,
    config: SidebarConfig,
    is_open: Observable<bool>,
    is_expanded: Observable<bool>,
    is_mobile: Observable<bool>,
    offset: Observable<LayoutOffset>,
    widths: RefCell<StyleCache<SidebarWidths>>,
    initialized: Cell<bool>,
    watchers: RefCell<Vec<Subscription>>,
}

/// Shared handle to the sidebar state. Clones refer to the same state.
#[derive(Clone)]
pub struct SidebarCoordinator {
    shared: Rc<SidebarShared>,
}

impl fmt::Debug for SidebarCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SidebarCoordinator")
            .field("state", &self.snapshot())
            .field("offset", &self.offset())
            .finish_non_exhaustive()
    }
}

impl SidebarCoordinator {
    /// Create the coordinator. The expansion flag is read from `storage`
    /// immediately; everything else waits for [`initialize`](Self::initialize).
    pub fn new(
        device: DeviceStore,
        storage: Rc<dyn StorageBackend>,
        style: Rc<dyn StyleSource>,
        config: SidebarConfig,
    ) -> Self {
        let expanded = load_flag(&*storage, &config.storage_key);
        let shared = SidebarShared {
            device,
            storage,
            style,
            config,
            is_open: Observable::new(false),
            is_expanded: Observable::new(expanded),
            is_mobile: Observable::new(false),
            offset: Observable::new(LayoutOffset::Removed),
            widths: RefCell::new(StyleCache::new()),
            initialized: Cell::new(false),
            watchers: RefCell::new(Vec::new()),
        };
        Self {
            shared: Rc::new(shared),
        }
    }

    /// Measure the device, lay the sidebar out for it and register the
    /// state watchers. Runs once; later calls do nothing.
    pub fn initialize(&self) {
        let shared = &self.shared;
        if shared.initialized.get() {
            return;
        }
        let _span = info_span!("sidebar_initialize", key = %shared.config.storage_key).entered();
        shared.device.recompute();
        let mobile = shared.classify();
        shared.is_mobile.set(mobile);
        if mobile {
            shared.is_open.set(false);
            shared.is_expanded.set(false);
            shared.offset.set(LayoutOffset::Removed);
        } else {
            shared.is_open.set(true);
            shared.apply_offset(shared.is_expanded.get());
        }
        self.register_watchers();
        shared.initialized.set(true);
        info!(mobile, expanded = shared.is_expanded.get(), "sidebar initialized");
    }

    fn register_watchers(&self) {
        let mut subs = Vec::with_capacity(4);

        let weak = Rc::downgrade(&self.shared);
        subs.push(self.shared.is_expanded.subscribe(move |expanded| {
            with_shared(&weak, |s| s.on_expanded_changed(*expanded));
        }));

        let weak = Rc::downgrade(&self.shared);
        subs.push(self.shared.is_open.subscribe(move |open| {
            with_shared(&weak, |s| s.on_open_changed(*open));
        }));

        let weak = Rc::downgrade(&self.shared);
        subs.push(self.shared.device.subscribe_screen(move |_| {
            with_shared(&weak, |s| s.is_mobile.set(s.classify()));
        }));

        let weak = Rc::downgrade(&self.shared);
        subs.push(self.shared.is_mobile.subscribe(move |mobile| {
            with_shared(&weak, |s| s.on_device_class_changed(*mobile));
        }));

        self.shared.watchers.borrow_mut().extend(subs);
    }

    // --- Operations --------------------------------------------------------

    /// Flip the expansion state. Ignored on mobile.
    pub fn toggle_expansion(&self) {
        self.initialize();
        let shared = &self.shared;
        if shared.is_mobile.get() {
            debug!("expansion toggle ignored on mobile");
            return;
        }
        shared.is_expanded.set(!shared.is_expanded.get());
    }

    /// The primary sidebar button: opens/closes on mobile, expands/minimizes
    /// on desktop.
    pub fn toggle_sidebar(&self) {
        self.initialize();
        if self.shared.is_mobile.get() {
            self.toggle_visibility();
        } else {
            self.toggle_expansion();
        }
    }

    /// Show or hide the sidebar on any device.
    ///
    /// Hiding leaves the offset in place; the rendering layer calls
    /// [`handle_before_hide`](Self::handle_before_hide) when its exit
    /// transition starts.
    pub fn toggle_visibility(&self) {
        self.initialize();
        let open = &self.shared.is_open;
        open.set(!open.get());
    }

    /// Close the sidebar (e.g. after a mobile navigation tap).
    pub fn close_sidebar(&self) {
        self.initialize();
        self.shared.is_open.set(false);
    }

    /// Remove the layout offset ahead of the sidebar's exit transition.
    pub fn handle_before_hide(&self) {
        self.shared.offset.set(LayoutOffset::Removed);
    }

    /// Forget the cached widths. An active offset is re-applied with the
    /// reloaded values.
    pub fn invalidate_width_cache(&self) {
        let shared = &self.shared;
        shared.widths.borrow_mut().invalidate();
        if shared.offset.with(|o| matches!(o, LayoutOffset::Active(_))) {
            shared.apply_offset(shared.is_expanded.get());
        }
    }

    // --- Queries -----------------------------------------------------------

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.shared.is_open.get()
    }

    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.shared.is_expanded.get()
    }

    /// Device class the sidebar is currently laid out for.
    #[must_use]
    pub fn is_mobile(&self) -> bool {
        self.shared.is_mobile.get()
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.shared.initialized.get()
    }

    /// Current layout offset.
    #[must_use]
    pub fn offset(&self) -> LayoutOffset {
        self.shared.offset.get()
    }

    #[must_use]
    pub fn snapshot(&self) -> SidebarState {
        let s = &self.shared;
        SidebarState {
            is_open: s.is_open.get(),
            is_expanded: s.is_expanded.get(),
            is_mobile: s.is_mobile.get(),
            initialized: s.initialized.get(),
        }
    }

    /// The device store this coordinator follows.
    #[must_use]
    pub fn device(&self) -> &DeviceStore {
        &self.shared.device
    }

    #[must_use]
    pub fn config(&self) -> &SidebarConfig {
        &self.shared.config
    }

    // --- Subscriptions -----------------------------------------------------

    pub fn subscribe_open(&self, callback: impl Fn(&bool) + 'static) -> Subscription {
        self.shared.is_open.subscribe(callback)
    }

    pub fn subscribe_expanded(&self, callback: impl Fn(&bool) + 'static) -> Subscription {
        self.shared.is_expanded.subscribe(callback)
    }

    /// Called with every new layout offset.
    pub fn subscribe_offset(&self, callback: impl Fn(&LayoutOffset) + 'static) -> Subscription {
        self.shared.offset.subscribe(callback)
    }
}

fn with_shared(weak: &Weak<SidebarShared>, f: impl FnOnce(&SidebarShared)) {
    if let Some(shared) = weak.upgrade() {
        f(&shared);
    }
}

impl SidebarShared {
    fn classify(&self) -> bool {
        let bp = self.config.mobile_breakpoint.unwrap_or(Breakpoint::Md);
        self.device.is_below_bp(bp)
    }

    fn widths(&self) -> SidebarWidths {
        let style = &self.style;
        let fallback = &self.config.fallback_widths;
        self.widths
            .borrow_mut()
            .get_or_load(|| load_sidebar_widths(&**style, fallback))
    }

    fn apply_offset(&self, expanded: bool) {
        let width = self.widths().for_state(expanded).to_string();
        self.offset.set(LayoutOffset::Active(width));
    }

    fn on_expanded_changed(&self, expanded: bool) {
        if self.is_mobile.get() {
            return;
        }
        save_flag(&*self.storage, &self.config.storage_key, expanded);
        if self.is_open.get() {
            self.apply_offset(expanded);
        }
    }

    fn on_open_changed(&self, open: bool) {
        if open {
            self.apply_offset(self.is_expanded.get());
        }
    }

    fn on_device_class_changed(&self, mobile: bool) {
        info!(mobile, "sidebar device class changed");
        if mobile {
            self.is_open.set(false);
            self.is_expanded.set(false);
            self.offset.set(LayoutOffset::Removed);
        } else {
            self.is_open.set(true);
            self.is_expanded
                .set(load_flag(&*self.storage, &self.config.storage_key));
            self.apply_offset(self.is_expanded.get());
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
