#![forbid(unsafe_code)]

//! Swipe tracking: turns raw pointer sequences into horizontal swipes.
//!
//! [`SwipeTracker`] is a small state machine fed with [`PointerEvent`]s
//! (touch or mouse, the host normalizes both). It reports the live
//! [`SwipeState`] (`is_active`, `horizontal_delta`) and emits
//! [`SwipeEvent`]s at the interesting transitions.
//!
//! # State Machine
//!
//! ```text
//! Idle --Down--> Pressed --Move (distance >= activation)--> Swiping
//!  ^               |                                          |
//!  +-----Up--------+                        Up => End, Cancel => Cancel
//! ```
//!
//! # Invariants
//!
//! 1. `Start` is emitted at most once per pointer-down.
//! 2. `End` and `Cancel` are only emitted after a `Start`, and exactly one of
//!    them closes every started swipe.
//! 3. `horizontal_delta` is `current.x - start.x`: negative when the pointer
//!    moved left.
//! 4. After `reset()` the tracker is idle and `state()` is inactive with zero
//!    delta.
//!
//! # Failure Modes
//!
//! - `Move`/`Up` without a prior `Down` are ignored (the pointer was pressed
//!   outside the tracked element).
//! - A second `Down` while pressed restarts tracking from the new position
//!   without emitting `Cancel` (hosts drop the `Up` on focus changes).

/// A normalized pointer event in element-local CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Primary pointer pressed.
    Down { x: f64, y: f64 },
    /// Pointer moved while pressed (moves while released are not forwarded).
    Move { x: f64, y: f64 },
    /// Primary pointer released.
    Up { x: f64, y: f64 },
    /// The host aborted the interaction (touchcancel, lost capture).
    Cancel,
}

/// Semantic swipe transitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwipeEvent {
    /// Movement crossed the activation distance.
    Start,
    /// Pointer moved during an active swipe.
    Move { horizontal_delta: f64 },
    /// Pointer released during an active swipe.
    End { horizontal_delta: f64 },
    /// Active swipe aborted by the host.
    Cancel,
}

/// Live swipe state, mirroring what a gesture adapter exposes to views.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SwipeState {
    /// Whether a swipe is currently in progress.
    pub is_active: bool,
    /// Horizontal displacement from the press position.
    pub horizontal_delta: f64,
}

/// Swipe recognition thresholds.
#[derive(Debug, Clone)]
pub struct SwipeConfig {
    /// Minimum distance (px, on either axis) before a press becomes a swipe
    /// (default: 10.0).
    pub activation_distance: f64,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            activation_distance: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Press {
    start_x: f64,
    start_y: f64,
    last_x: f64,
    started: bool,
}

/// Stateful swipe recognizer.
#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    config: SwipeConfig,
    press: Option<Press>,
}

impl SwipeTracker {
    /// Create a tracker with the given configuration.
    #[must_use]
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            config,
            press: None,
        }
    }

    /// Process a pointer event, returning the swipe transition it caused.
    ///
    /// A move that activates the swipe returns `Start`; the following moves
    /// return `Move`. Callers that need both on the activating move can read
    /// [`state`](Self::state) right after.
    pub fn process(&mut self, event: PointerEvent) -> Option<SwipeEvent> {
        match event {
            PointerEvent::Down { x, y } => {
                self.press = Some(Press {
                    start_x: x,
                    start_y: y,
                    last_x: x,
                    started: false,
                });
                None
            }
            PointerEvent::Move { x, y } => {
                let activation = self.config.activation_distance;
                let press = self.press.as_mut()?;
                press.last_x = x;
                let dx = x - press.start_x;
                if !press.started {
                    let dy = y - press.start_y;
                    if dx.abs() >= activation || dy.abs() >= activation {
                        press.started = true;
                        return Some(SwipeEvent::Start);
                    }
                    return None;
                }
                Some(SwipeEvent::Move {
                    horizontal_delta: dx,
                })
            }
            PointerEvent::Up { x, .. } => {
                let press = self.press.take()?;
                press.started.then(|| SwipeEvent::End {
                    horizontal_delta: x - press.start_x,
                })
            }
            PointerEvent::Cancel => {
                let press = self.press.take()?;
                press.started.then_some(SwipeEvent::Cancel)
            }
        }
    }

    /// Current swipe state.
    #[must_use]
    pub fn state(&self) -> SwipeState {
        match self.press {
            Some(p) if p.started => SwipeState {
                is_active: true,
                horizontal_delta: p.last_x - p.start_x,
            },
            _ => SwipeState::default(),
        }
    }

    /// Whether a swipe is currently in progress.
    #[inline]
    #[must_use]
    pub fn is_swiping(&self) -> bool {
        self.press.is_some_and(|p| p.started)
    }

    /// Return to idle without emitting anything.
    pub fn reset(&mut self) {
        self.press = None;
    }

    /// Get a reference to the current configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }
}
