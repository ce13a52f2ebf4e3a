#![forbid(unsafe_code)]

//! Core: geometry, input adapters, timers and logging.
//!
//! # Role in Vista
//! `vista-core` is the input layer. It owns the small value types and the
//! stateful adapters that turn raw host events (pointer movement, element
//! resizes, timer deadlines) into something the runtime and widgets can
//! consume deterministically.
//!
//! # Primary responsibilities
//! - **Size**: observed element dimensions.
//! - **SwipeTracker**: pointer down → move → up sequences as horizontal swipes.
//! - **Debouncer**: "last call wins" deadline tracking with explicit cancel.
//! - **logging**: optional subscriber installation for applications.
//!
//! All time-dependent types take `now` as an argument instead of reading a
//! clock, so every transition can be replayed in tests.

pub mod geometry;
pub mod gesture;
pub mod logging;
pub mod timer;

pub use geometry::Size;
pub use gesture::{PointerEvent, SwipeConfig, SwipeEvent, SwipeState, SwipeTracker};
pub use timer::Debouncer;
