#![forbid(unsafe_code)]

//! Reactive primitives: observable values with explicit subscriptions.
//!
//! Every watcher in Vista is an [`Observable::subscribe`] call that returns a
//! [`Subscription`] guard. Delivery is synchronous and ordered by
//! registration; there is no scheduler and no polling.

pub mod observable;

pub use observable::{Observable, Subscription};
