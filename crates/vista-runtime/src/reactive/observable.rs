#![forbid(unsafe_code)]

//! Observable value wrapper with change notification and version tracking.
//!
//! # Design
//!
//! [`Observable<T>`] wraps a value of type `T` in shared, reference-counted
//! storage (`Rc<RefCell<..>>`). When the value changes (determined by
//! `PartialEq`), all live subscribers are notified synchronously, in
//! registration order.
//!
//! # Failure Modes
//!
//! - **Re-entrant self-set**: calling `set()` on an observable from inside one
//!   of its own subscriber callbacks stores the value and bumps the version,
//!   but does not start a nested notification round (a warning is logged).
//!   This bounds every watcher graph: a watcher that flips its own source
//!   cannot recurse. Setting *other* observables from a callback is fine.
//!   The round that was interrupted keeps delivering the value it started
//!   with, so subscribers registered after the one that re-set the value see
//!   the older value, and no later round announces the stored one. Readers
//!   that must observe the final value call `get()` after the round ends.
//! - **Subscriber leak**: if `Subscription` guards are stored indefinitely
//!   without being dropped, callbacks accumulate. Dead weak references are
//!   pruned lazily during `notify()`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{trace_span, warn};

type CallbackRc<T> = Rc<dyn Fn(&T)>;
type CallbackWeak<T> = Weak<dyn Fn(&T)>;

struct ObservableInner<T> {
    value: T,
    version: u64,
    /// Subscribers stored as weak references. Dead entries are pruned on notify.
    subscribers: Vec<CallbackWeak<T>>,
    /// Set while subscriber callbacks are running.
    notifying: bool,
}

/// A shared, version-tracked value with change notification.
///
/// Cloning an `Observable` creates a new handle to the **same** inner state.
///
/// # Invariants
///
/// 1. `version` increments by exactly 1 on each value-changing mutation.
/// 2. `set(v)` where `v == current` is a no-op (no version bump, no callbacks).
/// 3. Subscribers are notified in registration order.
/// 4. Dead subscribers (dropped [`Subscription`] guards) are pruned lazily.
pub struct Observable<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create a new observable with the given initial value.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value,
                version: 0,
                subscribers: Vec::new(),
                notifying: false,
            })),
        }
    }

    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Access the current value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Set a new value, notifying subscribers if it differs from the current one.
    pub fn set(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value;
            inner.version += 1;
        }
        self.notify();
    }

    /// Modify the value in place; subscribers are notified if it changed.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            let old = inner.value.clone();
            f(&mut inner.value);
            if inner.value != old {
                inner.version += 1;
                true
            } else {
                false
            }
        };
        if changed {
            self.notify();
        }
    }

    /// Subscribe to value changes.
    ///
    /// Returns a [`Subscription`] guard. Dropping the guard unsubscribes the
    /// callback.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: CallbackRc<T> = Rc::new(callback);
        let weak = Rc::downgrade(&strong);
        self.inner.borrow_mut().subscribers.push(weak);
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Current version number.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of registered subscribers (including dead ones not yet pruned).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    fn notify(&self) {
        let (callbacks, value) = {
            let mut inner = self.inner.borrow_mut();
            if inner.notifying {
                warn!(
                    version = inner.version,
                    "observable set from its own subscriber; nested notification suppressed"
                );
                return;
            }
            inner.subscribers.retain(|w| w.strong_count() > 0);
            let callbacks: Vec<CallbackRc<T>> =
                inner.subscribers.iter().filter_map(Weak::upgrade).collect();
            if callbacks.is_empty() {
                return;
            }
            inner.notifying = true;
            (callbacks, inner.value.clone())
        };

        let _span = trace_span!("observable.notify", subscribers = callbacks.len()).entered();
        let _reset = NotifyGuard(self.inner.as_ref());
        for cb in &callbacks {
            cb(&value);
        }
    }
}

/// Clears the `notifying` flag even if a callback panics.
struct NotifyGuard<'a, T>(&'a RefCell<ObservableInner<T>>);

impl<T> Drop for NotifyGuard<'_, T> {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.0.try_borrow_mut() {
            inner.notifying = false;
        }
    }
}

/// RAII guard for a subscriber callback.
///
/// Dropping the `Subscription` drops the strong `Rc` to the callback, so the
/// `Weak` in the observable's subscriber list no longer upgrades.
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn get_set_basic() {
        let obs = Observable::new(42);
        assert_eq!(obs.get(), 42);
        assert_eq!(obs.version(), 0);

        obs.set(99);
        assert_eq!(obs.get(), 99);
        assert_eq!(obs.version(), 1);
    }

    #[test]
    fn no_change_no_version_bump() {
        let obs = Observable::new(42);
        obs.set(42);
        assert_eq!(obs.version(), 0);
    }

    #[test]
    fn with_access() {
        let obs = Observable::new(vec![1, 2, 3]);
        let sum = obs.with(|v| v.iter().sum::<i32>());
        assert_eq!(sum, 6);
    }

    #[test]
    fn update_in_place() {
        let obs = Observable::new(vec![1, 2, 3]);
        obs.update(|v| v.push(4));
        assert_eq!(obs.get(), vec![1, 2, 3, 4]);
        assert_eq!(obs.version(), 1);

        obs.update(|_| {});
        assert_eq!(obs.version(), 1);
    }

    #[test]
    fn subscribers_fire_in_registration_order() {
        let obs = Observable::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));

        let l1 = Rc::clone(&log);
        let _s1 = obs.subscribe(move |v| l1.borrow_mut().push(format!("first:{v}")));
        let l2 = Rc::clone(&log);
        let _s2 = obs.subscribe(move |v| l2.borrow_mut().push(format!("second:{v}")));

        obs.set(7);
        assert_eq!(*log.borrow(), vec!["first:7", "second:7"]);
    }

    #[test]
    fn dropped_subscription_stops_callbacks() {
        let obs = Observable::new(0);
        let hits = Rc::new(Cell::new(0u32));
        let h = Rc::clone(&hits);
        let sub = obs.subscribe(move |_| h.set(h.get() + 1));

        obs.set(1);
        drop(sub);
        obs.set(2);
        assert_eq!(hits.get(), 1);

        obs.set(3);
        assert_eq!(obs.subscriber_count(), 0);
    }

    #[test]
    fn clone_shares_state() {
        let a = Observable::new(1);
        let b = a.clone();
        b.set(5);
        assert_eq!(a.get(), 5);
        assert_eq!(a.version(), 1);
    }

    #[test]
    fn setting_other_observable_from_callback_propagates() {
        let source = Observable::new(0);
        let mirror = Observable::new(0);
        let seen = Rc::new(Cell::new(0));

        let m = mirror.clone();
        let _s1 = source.subscribe(move |v| m.set(*v * 10));
        let seen_clone = Rc::clone(&seen);
        let _s2 = mirror.subscribe(move |v| seen_clone.set(*v));

        source.set(4);
        assert_eq!(mirror.get(), 40);
        assert_eq!(seen.get(), 40);
    }

    #[test]
    fn self_toggle_in_callback_terminates() {
        let flag = Observable::new(false);
        let calls = Rc::new(Cell::new(0u32));

        let f = flag.clone();
        let c = Rc::clone(&calls);
        let _sub = flag.subscribe(move |v| {
            c.set(c.get() + 1);
            f.set(!*v);
        });

        flag.set(true);
        assert_eq!(calls.get(), 1, "nested notification must be suppressed");
        assert!(!flag.get(), "the re-entrant value is still stored");
        assert_eq!(flag.version(), 2);

        // The guard is released afterwards: the next set notifies normally.
        flag.set(true);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn later_subscribers_see_the_round_value_after_a_self_set() {
        let offset = Observable::new(String::from("none"));
        let seen = Rc::new(RefCell::new(Vec::new()));

        let o = offset.clone();
        let _hide = offset.subscribe(move |v| {
            if v != "none" {
                o.set(String::from("none"));
            }
        });
        let log = Rc::clone(&seen);
        let _render = offset.subscribe(move |v: &String| log.borrow_mut().push(v.clone()));

        offset.set(String::from("280px"));
        assert_eq!(*seen.borrow(), vec![String::from("280px")]);
        assert_eq!(offset.get(), "none", "the suppressed value is stored");
        assert_eq!(offset.version(), 2);
    }
}
