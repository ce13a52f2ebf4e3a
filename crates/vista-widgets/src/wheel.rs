#![forbid(unsafe_code)]

//! Fortune wheel spin engine.
//!
//! The wheel decides which slice a spin lands on and the absolute rotation
//! the rendering layer should animate to. A spin is in progress until
//! [`SPIN_DURATION`] plus a short settle buffer has elapsed; the host drives
//! completion by calling [`FortuneWheel::poll`] with the current instant.
//!
//! # Rotation
//!
//! ```text
//! reset  = rotation − rotation mod 360     (drop partial turns)
//! slice  = 360 / N
//! target = reset + 12·360 + (360 − slice·index) + offset
//! ```
//!
//! # Failure Modes
//!
//! A spin requested while another is running is rejected with
//! [`SpinError::AlreadySpinning`]; it is never queued.

use std::fmt;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use web_time::Instant;

/// Length of the spin animation.
pub const SPIN_DURATION: Duration = Duration::from_millis(5000);
/// Extra time after the animation before the result is reported.
pub const SETTLE_BUFFER: Duration = Duration::from_millis(200);
/// Full turns added to every spin.
pub const SPIN_ROTATIONS: u32 = 12;

/// One slice of the wheel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WheelSlice {
    pub id: u64,
    pub label: String,
    /// Eligible for a random spin.
    pub winnable: bool,
    /// The consolation slice used when nothing is winnable.
    pub no_luck: bool,
}

impl WheelSlice {
    #[must_use]
    pub fn new(id: u64, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            winnable: false,
            no_luck: false,
        }
    }

    #[must_use]
    pub fn winnable(mut self, winnable: bool) -> Self {
        self.winnable = winnable;
        self
    }

    #[must_use]
    pub fn no_luck(mut self, no_luck: bool) -> Self {
        self.no_luck = no_luck;
        self
    }
}

/// Reasons a spin cannot start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpinError {
    AlreadySpinning,
    Empty,
    UnknownPrize(u64),
    NoWinnableSlice,
}

impl fmt::Display for SpinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadySpinning => f.write_str("already spinning"),
            Self::Empty => f.write_str("wheel has no slices"),
            Self::UnknownPrize(id) => write!(f, "prize {id} is not on the wheel"),
            Self::NoWinnableSlice => f.write_str("no winnable slice and no no-luck slice"),
        }
    }
}

impl std::error::Error for SpinError {}

/// What a started spin will do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinTicket {
    pub slice_id: u64,
    pub slice_index: usize,
    /// Absolute rotation to animate to, in degrees.
    pub target_rotation: f64,
    /// When [`FortuneWheel::poll`] will report the result.
    pub settles_at: Instant,
}

#[derive(Debug, Clone, Copy)]
struct PendingSpin {
    slice_index: usize,
    deadline: Instant,
}

/// Wheel state and spin logic.
#[derive(Debug, Clone)]
pub struct FortuneWheel {
    slices: Vec<WheelSlice>,
    rotation_deg: f64,
    offset_deg: f64,
    pending: Option<PendingSpin>,
    selected: Option<usize>,
    rng: SmallRng,
}

impl FortuneWheel {
    /// A wheel seeded from the OS.
    #[must_use]
    pub fn new(slices: Vec<WheelSlice>) -> Self {
        Self::with_rng(slices, SmallRng::from_os_rng())
    }

    /// A wheel with reproducible random picks.
    #[must_use]
    pub fn with_seed(slices: Vec<WheelSlice>, seed: u64) -> Self {
        Self::with_rng(slices, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(slices: Vec<WheelSlice>, rng: SmallRng) -> Self {
        Self {
            slices,
            rotation_deg: 0.0,
            offset_deg: 0.0,
            pending: None,
            selected: None,
            rng,
        }
    }

    /// Constant angle added to every target (artwork alignment).
    #[must_use]
    pub fn with_offset(mut self, degrees: f64) -> Self {
        self.offset_deg = degrees;
        self
    }

    #[must_use]
    pub fn slices(&self) -> &[WheelSlice] {
        &self.slices
    }

    /// Replace the slices. Rejected while a spin is running.
    pub fn set_slices(&mut self, slices: Vec<WheelSlice>) -> Result<(), SpinError> {
        if self.pending.is_some() {
            return Err(SpinError::AlreadySpinning);
        }
        self.slices = slices;
        self.selected = None;
        Ok(())
    }

    #[must_use]
    pub fn is_spinning(&self) -> bool {
        self.pending.is_some()
    }

    /// Current absolute rotation in degrees.
    #[must_use]
    pub fn rotation_deg(&self) -> f64 {
        self.rotation_deg
    }

    /// The slice the last completed spin landed on.
    #[must_use]
    pub fn selected(&self) -> Option<&WheelSlice> {
        self.selected.and_then(|i| self.slices.get(i))
    }

    /// Start a spin.
    ///
    /// With `prize`, the wheel lands on the slice with that id. Without one,
    /// it picks uniformly among winnable slices, falling back to a no-luck
    /// slice.
    pub fn spin(&mut self, prize: Option<u64>, now: Instant) -> Result<SpinTicket, SpinError> {
        if self.pending.is_some() {
            return Err(SpinError::AlreadySpinning);
        }
        if self.slices.is_empty() {
            return Err(SpinError::Empty);
        }
        let index = match prize {
            Some(id) => self
                .slices
                .iter()
                .position(|s| s.id == id)
                .ok_or(SpinError::UnknownPrize(id))?,
            None => self.pick_random()?,
        };

        let target = self.target_rotation(index);
        let deadline = now + SPIN_DURATION + SETTLE_BUFFER;
        self.rotation_deg = target;
        self.selected = None;
        self.pending = Some(PendingSpin {
            slice_index: index,
            deadline,
        });

        #[cfg(feature = "tracing")]
        tracing::debug!(slice = self.slices[index].id, target, "wheel spin started");

        Ok(SpinTicket {
            slice_id: self.slices[index].id,
            slice_index: index,
            target_rotation: target,
            settles_at: deadline,
        })
    }

    fn pick_random(&mut self) -> Result<usize, SpinError> {
        let winnable: Vec<usize> = self
            .slices
            .iter()
            .enumerate()
            .filter(|(_, s)| s.winnable)
            .map(|(i, _)| i)
            .collect();
        if !winnable.is_empty() {
            return Ok(winnable[self.rng.random_range(0..winnable.len())]);
        }
        #[cfg(feature = "tracing")]
        tracing::warn!(slices = self.slices.len(), "no winnable slices, trying no-luck slice");
        self.slices
            .iter()
            .position(|s| s.no_luck)
            .ok_or(SpinError::NoWinnableSlice)
    }

    fn target_rotation(&self, index: usize) -> f64 {
        let reset = self.rotation_deg - self.rotation_deg % 360.0;
        let slice_angle = 360.0 / self.slices.len() as f64;
        let prize_angle = 360.0 - slice_angle * index as f64;
        reset + f64::from(SPIN_ROTATIONS) * 360.0 + prize_angle + self.offset_deg
    }

    /// Complete the running spin if its deadline has passed.
    ///
    /// Returns the landed slice exactly once per spin.
    pub fn poll(&mut self, now: Instant) -> Option<&WheelSlice> {
        let pending = self.pending?;
        if now < pending.deadline {
            return None;
        }
        self.pending = None;
        self.selected = Some(pending.slice_index);
        self.slices.get(pending.slice_index)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn slices() -> Vec<WheelSlice> {
        vec![
            WheelSlice::new(10, "Mug").winnable(true),
            WheelSlice::new(11, "Try again").no_luck(true),
            WheelSlice::new(12, "Sticker").winnable(true),
            WheelSlice::new(13, "Grand prize"),
        ]
    }

    #[test]
    fn spin_to_prize_computes_rotation() {
        let mut wheel = FortuneWheel::with_seed(slices(), 7);
        let t = Instant::now();
        let ticket = wheel.spin(Some(12), t).unwrap();
        assert_eq!(ticket.slice_index, 2);
        // 12 turns + (360 - 90 * 2)
        assert_eq!(ticket.target_rotation, 4320.0 + 180.0);
        assert_eq!(wheel.rotation_deg(), 4500.0);
        assert_eq!(ticket.settles_at, t + Duration::from_millis(5200));
    }

    #[test]
    fn next_spin_drops_partial_turns() {
        let mut wheel = FortuneWheel::with_seed(slices(), 7).with_offset(15.0);
        let t = Instant::now();
        wheel.spin(Some(13), t).unwrap();
        assert_eq!(wheel.rotation_deg(), 4320.0 + 90.0 + 15.0);
        wheel.poll(t + Duration::from_secs(6));

        let ticket = wheel.spin(Some(10), t + Duration::from_secs(7)).unwrap();
        assert_eq!(ticket.target_rotation, 4320.0 + 4320.0 + 360.0 + 15.0);
    }

    #[test]
    fn second_spin_is_rejected_while_running() {
        let mut wheel = FortuneWheel::with_seed(slices(), 1);
        let t = Instant::now();
        wheel.spin(None, t).unwrap();
        assert_eq!(wheel.spin(None, t), Err(SpinError::AlreadySpinning));
        assert_eq!(wheel.set_slices(vec![]), Err(SpinError::AlreadySpinning));
    }

    #[test]
    fn poll_reports_once_after_buffer() {
        let mut wheel = FortuneWheel::with_seed(slices(), 1);
        let t = Instant::now();
        wheel.spin(Some(10), t).unwrap();

        assert!(wheel.poll(t + SPIN_DURATION).is_none());
        assert!(wheel.is_spinning());
        assert_eq!(wheel.poll(t + Duration::from_millis(5200)).map(|s| s.id), Some(10));
        assert!(!wheel.is_spinning());
        assert!(wheel.poll(t + Duration::from_secs(10)).is_none());
        assert_eq!(wheel.selected().map(|s| s.label.as_str()), Some("Mug"));
    }

    #[test]
    fn random_spin_only_lands_on_winnable() {
        let mut wheel = FortuneWheel::with_seed(slices(), 42);
        let mut t = Instant::now();
        for _ in 0..50 {
            let ticket = wheel.spin(None, t).unwrap();
            assert!(matches!(ticket.slice_id, 10 | 12));
            t += Duration::from_secs(6);
            assert!(wheel.poll(t).is_some());
        }
    }

    #[test]
    fn falls_back_to_no_luck_then_errors() {
        let mut wheel = FortuneWheel::with_seed(
            vec![WheelSlice::new(1, "A"), WheelSlice::new(2, "Nothing").no_luck(true)],
            3,
        );
        assert_eq!(wheel.spin(None, Instant::now()).unwrap().slice_id, 2);

        let mut wheel = FortuneWheel::with_seed(vec![WheelSlice::new(1, "A")], 3);
        assert_eq!(wheel.spin(None, Instant::now()), Err(SpinError::NoWinnableSlice));
        assert!(!wheel.is_spinning());
    }

    #[test]
    fn empty_and_unknown_prize() {
        let mut wheel = FortuneWheel::with_seed(vec![], 0);
        assert_eq!(wheel.spin(None, Instant::now()), Err(SpinError::Empty));

        let mut wheel = FortuneWheel::with_seed(slices(), 0);
        assert_eq!(wheel.spin(Some(99), Instant::now()), Err(SpinError::UnknownPrize(99)));
        assert_eq!(SpinError::UnknownPrize(99).to_string(), "prize 99 is not on the wheel");
    }
}
