#![forbid(unsafe_code)]

//! Device tracking: viewport width, breakpoint tier and mobile classification.
//!
//! [`DeviceStore`] is the stateful half of the breakpoint provider. It reads
//! the viewport width from a [`Viewport`], resolves thresholds from a
//! [`StyleSource`] (memoized until invalidated) and publishes the result
//! through observables so that other stores can react to tier changes.
//!
//! # Resize handling
//!
//! Hosts forward raw events with the current instant:
//!
//! ```text
//! on_resize(now)             -> resize debouncer re-armed (last call wins)
//! on_orientation_change(now) -> orientation timer re-armed
//! tick(now)                  -> fires due timers, each firing recompute()
//! ```
//!
//! Timers only arm while listeners are attached ([`DeviceStore::attach_listeners`]);
//! [`DeviceStore::teardown`] (or dropping the [`ListenerGuard`]) cancels
//! anything pending so no stale callback mutates state after the owning view
//! is gone.
//!
//! # Invariants
//!
//! 1. The stored width changes only inside `recompute()`.
//! 2. `recompute()` with an unchanged width notifies nobody.
//! 3. `current_breakpoint()` and `is_mobile()` always agree with the stored
//!    width and the cached thresholds.
//! 4. Name-based predicates never panic: an unknown name logs a warning and
//!    answers `false`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, warn};
use vista_core::Debouncer;
use vista_layout::{
    Breakpoint, Breakpoints, Responsive, StyleCache, StyleSource, load_breakpoints,
};
use web_time::Instant;

use crate::reactive::{Observable, Subscription};

/// Default resize debounce window.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(100);
/// Default settle delay after an orientation change.
pub const ORIENTATION_CHANGE_DELAY: Duration = Duration::from_millis(100);

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// Source of the current viewport width.
pub trait Viewport {
    /// Inner width in CSS pixels.
    fn inner_width(&self) -> u32;
}

/// A viewport whose width is set by hand (headless hosts and tests).
#[derive(Debug, Default)]
pub struct FixedViewport {
    width: Cell<u32>,
}

impl FixedViewport {
    #[must_use]
    pub fn new(width: u32) -> Self {
        Self {
            width: Cell::new(width),
        }
    }

    /// Change the width. Nothing is recomputed until the device store is told.
    pub fn set_width(&self, width: u32) {
        self.width.set(width);
    }
}

impl Viewport for FixedViewport {
    fn inner_width(&self) -> u32 {
        self.width.get()
    }
}

// ---------------------------------------------------------------------------
// DeviceStore
// ---------------------------------------------------------------------------

/// Timer settings for a [`DeviceStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceTiming {
    pub resize_debounce: Duration,
    pub orientation_delay: Duration,
}

impl Default for DeviceTiming {
    fn default() -> Self {
        Self {
            resize_debounce: RESIZE_DEBOUNCE,
            orientation_delay: ORIENTATION_CHANGE_DELAY,
        }
    }
}

/// Width plus the thresholds it was classified against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screen {
    pub width: u32,
    pub breakpoints: Breakpoints,
}

#[derive(Debug)]
struct Listeners {
    attached: bool,
    resize: Debouncer,
    orientation: Debouncer,
}

struct DeviceShared {
    viewport: Rc<dyn Viewport>,
    style: Rc<dyn StyleSource>,
    thresholds: RefCell<StyleCache<Breakpoints>>,
    screen: Observable<Screen>,
    breakpoint: Observable<Breakpoint>,
    is_mobile: Observable<bool>,
    listeners: RefCell<Listeners>,
}

/// Shared handle to the device state of one application root.
///
/// Cloning produces another handle to the same store.
#[derive(Clone)]
pub struct DeviceStore {
    shared: Rc<DeviceShared>,
}

impl std::fmt::Debug for DeviceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceStore")
            .field("screen_width", &self.screen_width())
            .field("breakpoint", &self.current_breakpoint())
            .field("is_mobile", &self.is_mobile())
            .finish_non_exhaustive()
    }
}

impl DeviceStore {
    /// Create a store and take an initial measurement.
    pub fn new(
        viewport: Rc<dyn Viewport>,
        style: Rc<dyn StyleSource>,
        timing: DeviceTiming,
    ) -> Self {
        let mut thresholds = StyleCache::new();
        let breakpoints = thresholds.get_or_load(|| load_breakpoints(&*style));
        let width = viewport.inner_width();
        let shared = DeviceShared {
            viewport,
            style,
            thresholds: RefCell::new(thresholds),
            screen: Observable::new(Screen { width, breakpoints }),
            breakpoint: Observable::new(breakpoints.bucket_for(width)),
            is_mobile: Observable::new(breakpoints.is_mobile_width(width)),
            listeners: RefCell::new(Listeners {
                attached: false,
                resize: Debouncer::new(timing.resize_debounce),
                orientation: Debouncer::new(timing.orientation_delay),
            }),
        };
        Self {
            shared: Rc::new(shared),
        }
    }

    /// Re-read the viewport width and update derived state.
    pub fn recompute(&self) {
        let width = self.shared.viewport.inner_width();
        self.publish(width);
    }

    /// Drop the memoized thresholds; the next read reloads them.
    pub fn invalidate_cache(&self) {
        self.shared.thresholds.borrow_mut().invalidate();
    }

    /// Reload thresholds from the style source and reclassify the current
    /// width (for example after a theme switch).
    pub fn update_breakpoints(&self) {
        self.invalidate_cache();
        let width = self.screen_width();
        self.publish(width);
    }

    // Derived flags first: screen subscribers observe a fully updated store.
    fn publish(&self, width: u32) {
        let breakpoints = self.breakpoints();
        let bucket = breakpoints.bucket_for(width);
        self.shared.breakpoint.set(bucket);
        self.shared.is_mobile.set(breakpoints.is_mobile_width(width));

        let before = self.shared.screen.version();
        self.shared.screen.set(Screen { width, breakpoints });
        if self.shared.screen.version() != before {
            debug!(width, breakpoint = %bucket, "device recomputed");
        }
    }

    // --- Queries -----------------------------------------------------------

    /// The thresholds currently in effect.
    #[must_use]
    pub fn breakpoints(&self) -> Breakpoints {
        let style = &self.shared.style;
        self.shared
            .thresholds
            .borrow_mut()
            .get_or_load(|| load_breakpoints(&**style))
    }

    /// Last measured width.
    #[must_use]
    pub fn screen_width(&self) -> u32 {
        self.shared.screen.with(|s| s.width)
    }

    /// Tier of the last measured width.
    #[must_use]
    pub fn current_breakpoint(&self) -> Breakpoint {
        self.shared.breakpoint.get()
    }

    /// Whether the last measured width is below `md`.
    #[must_use]
    pub fn is_mobile(&self) -> bool {
        self.shared.is_mobile.get()
    }

    /// Tier for an arbitrary width under the current thresholds.
    #[must_use]
    pub fn bucket_for(&self, width: u32) -> Breakpoint {
        self.shared.screen.with(|s| s.breakpoints.bucket_for(width))
    }

    /// Resolve a responsive value at the current tier.
    #[must_use]
    pub fn resolve<T: Clone>(&self, value: &Responsive<T>) -> T {
        value.resolve_cloned(self.current_breakpoint())
    }

    /// Current tier is `bp` or wider.
    #[must_use]
    pub fn is_at_least_bp(&self, bp: Breakpoint) -> bool {
        self.current_breakpoint() >= bp
    }

    /// Current width is below the threshold of `bp`.
    #[must_use]
    pub fn is_below_bp(&self, bp: Breakpoint) -> bool {
        self.shared
            .screen
            .with(|s| s.breakpoints.is_below(s.width, bp))
    }

    /// `threshold(low) <= width < threshold(high)`; `false` for inverted ranges.
    #[must_use]
    pub fn is_between_bp(&self, low: Breakpoint, high: Breakpoint) -> bool {
        self.shared
            .screen
            .with(|s| s.breakpoints.is_between(s.width, low, high))
            .unwrap_or(false)
    }

    /// Name-based [`is_at_least_bp`](Self::is_at_least_bp).
    #[must_use]
    pub fn is_at_least(&self, name: &str) -> bool {
        parse_or_warn(name).is_some_and(|bp| self.is_at_least_bp(bp))
    }

    /// Name-based [`is_below_bp`](Self::is_below_bp).
    #[must_use]
    pub fn is_below(&self, name: &str) -> bool {
        parse_or_warn(name).is_some_and(|bp| self.is_below_bp(bp))
    }

    /// Name-based [`is_between_bp`](Self::is_between_bp).
    #[must_use]
    pub fn is_between(&self, low: &str, high: &str) -> bool {
        match (low.parse::<Breakpoint>(), high.parse::<Breakpoint>()) {
            (Ok(low), Ok(high)) if low < high => self.is_between_bp(low, high),
            (Ok(_), Ok(_)) => {
                warn!(low, high, "empty or inverted breakpoint range");
                false
            }
            _ => {
                warn!(low, high, "invalid breakpoint range");
                false
            }
        }
    }

    // --- Subscriptions -----------------------------------------------------

    /// Called whenever the width or the thresholds change.
    pub fn subscribe_screen(&self, callback: impl Fn(&Screen) + 'static) -> Subscription {
        self.shared.screen.subscribe(callback)
    }

    /// Called whenever the tier changes.
    pub fn subscribe_breakpoint(&self, callback: impl Fn(&Breakpoint) + 'static) -> Subscription {
        self.shared.breakpoint.subscribe(callback)
    }

    /// Called whenever the mobile classification flips.
    pub fn subscribe_mobile(&self, callback: impl Fn(&bool) + 'static) -> Subscription {
        self.shared.is_mobile.subscribe(callback)
    }

    // --- Host events -------------------------------------------------------

    /// Start accepting resize/orientation events. Idempotent.
    ///
    /// The returned guard tears the listeners down when dropped; hosts that
    /// manage teardown themselves can `std::mem::forget` it and call
    /// [`teardown`](Self::teardown).
    pub fn attach_listeners(&self) -> ListenerGuard {
        self.shared.listeners.borrow_mut().attached = true;
        ListenerGuard {
            device: self.clone(),
        }
    }

    /// Whether listeners are attached.
    #[must_use]
    pub fn listeners_attached(&self) -> bool {
        self.shared.listeners.borrow().attached
    }

    /// A viewport resize happened at `now`.
    pub fn on_resize(&self, now: Instant) {
        let mut l = self.shared.listeners.borrow_mut();
        if l.attached {
            l.resize.schedule(now);
        }
    }

    /// An orientation change happened at `now`.
    pub fn on_orientation_change(&self, now: Instant) {
        let mut l = self.shared.listeners.borrow_mut();
        if l.attached {
            l.orientation.schedule(now);
        }
    }

    /// Fire due timers. Returns `true` if a recompute ran.
    pub fn tick(&self, now: Instant) -> bool {
        let due = {
            let mut l = self.shared.listeners.borrow_mut();
            // Both timers must be polled so each one is consumed.
            let resize = l.resize.poll(now);
            let orientation = l.orientation.poll(now);
            resize || orientation
        };
        if due {
            self.recompute();
        }
        due
    }

    /// Earliest pending timer deadline, for hosts that schedule wakeups.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        let l = self.shared.listeners.borrow();
        match (l.resize.deadline(), l.orientation.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Detach listeners and cancel pending timers.
    pub fn teardown(&self) {
        let mut l = self.shared.listeners.borrow_mut();
        if l.attached || l.resize.is_pending() || l.orientation.is_pending() {
            debug!("device listeners torn down");
        }
        l.attached = false;
        l.resize.cancel();
        l.orientation.cancel();
    }
}

fn parse_or_warn(name: &str) -> Option<Breakpoint> {
    match name.parse::<Breakpoint>() {
        Ok(bp) => Some(bp),
        Err(err) => {
            warn!(error = %err, "breakpoint query ignored");
            None
        }
    }
}

/// Tears down a [`DeviceStore`]'s listeners on drop.
#[must_use = "dropping the guard detaches the listeners immediately"]
pub struct ListenerGuard {
    device: DeviceStore,
}

impl std::fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerGuard").finish_non_exhaustive()
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.device.teardown();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use vista_layout::StaticStyleSource;

    const MS_50: Duration = Duration::from_millis(50);
    const MS_100: Duration = Duration::from_millis(100);

    fn store(width: u32) -> (Rc<FixedViewport>, DeviceStore) {
        let viewport = Rc::new(FixedViewport::new(width));
        let device = DeviceStore::new(
            viewport.clone(),
            Rc::new(StaticStyleSource::new()),
            DeviceTiming::default(),
        );
        (viewport, device)
    }

    #[test]
    fn initial_measurement() {
        let (_, device) = store(1024);
        assert_eq!(device.screen_width(), 1024);
        assert_eq!(device.current_breakpoint(), Breakpoint::Lg);
        assert!(!device.is_mobile());
    }

    #[test]
    fn recompute_reads_viewport() {
        let (viewport, device) = store(1024);
        viewport.set_width(600);
        assert_eq!(device.screen_width(), 1024, "no implicit recompute");
        device.recompute();
        assert_eq!(device.current_breakpoint(), Breakpoint::Sm);
        assert!(device.is_mobile());
    }

    #[test]
    fn recompute_with_same_width_is_silent() {
        let (_, device) = store(900);
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _sub = device.subscribe_screen(move |_| h.set(h.get() + 1));

        device.recompute();
        device.recompute();
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn name_predicates() {
        let (_, device) = store(800);
        assert!(device.is_at_least("md"));
        assert!(device.is_at_least("xxs"));
        assert!(!device.is_at_least("lg"));
        assert!(device.is_below("lg"));
        assert!(!device.is_below("md"));
        assert!(device.is_between("md", "lg"));
        assert!(!device.is_between("lg", "xl"));
    }

    #[test]
    fn invalid_names_answer_false() {
        let (_, device) = store(800);
        assert!(!device.is_at_least("huge"));
        assert!(!device.is_below("huge"));
        assert!(!device.is_between("md", "huge"));
        assert!(!device.is_between("lg", "md"), "inverted range");
    }

    #[test]
    fn resize_is_debounced() {
        let (viewport, device) = store(1200);
        let _guard = device.attach_listeners();
        let t = Instant::now();

        viewport.set_width(700);
        device.on_resize(t);
        viewport.set_width(600);
        device.on_resize(t + MS_50);

        assert!(!device.tick(t + MS_100), "first deadline was superseded");
        assert_eq!(device.screen_width(), 1200);
        assert!(device.tick(t + MS_50 + MS_100));
        assert_eq!(device.screen_width(), 600);
        assert_eq!(device.next_deadline(), None);
    }

    #[test]
    fn orientation_change_is_delayed() {
        let (viewport, device) = store(1200);
        let _guard = device.attach_listeners();
        let t = Instant::now();

        viewport.set_width(500);
        device.on_orientation_change(t);
        assert_eq!(device.next_deadline(), Some(t + MS_100));
        assert!(!device.tick(t + MS_50));
        assert!(device.tick(t + MS_100));
        assert!(device.is_mobile());
    }

    #[test]
    fn events_ignored_until_attached_and_after_teardown() {
        let (viewport, device) = store(1200);
        let t = Instant::now();
        viewport.set_width(500);

        device.on_resize(t);
        assert!(!device.tick(t + MS_100));

        let guard = device.attach_listeners();
        device.on_resize(t);
        drop(guard);
        assert!(!device.listeners_attached());
        assert!(!device.tick(t + MS_100), "teardown cancels pending timers");
        assert_eq!(device.screen_width(), 1200);
    }

    #[test]
    fn theme_switch_reclassifies() {
        let viewport = Rc::new(FixedViewport::new(800));
        let style = Rc::new(StaticStyleSource::new());
        let device = DeviceStore::new(viewport, style.clone(), DeviceTiming::default());
        assert!(!device.is_mobile());

        style.set("--breakpoint-md", "900px");
        device.recompute();
        assert!(!device.is_mobile(), "thresholds are memoized");

        device.update_breakpoints();
        assert!(device.is_mobile());
        assert_eq!(device.breakpoints().md, 900);
    }

    #[test]
    fn resolve_responsive_value() {
        let (_, device) = store(1300);
        let columns = Responsive::new(1).at(Breakpoint::Md, 2).at(Breakpoint::Xl, 4);
        assert_eq!(device.resolve(&columns), 4);
    }
}
