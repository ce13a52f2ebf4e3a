#![forbid(unsafe_code)]

//! Responsive layout primitives.
//!
//! # Breakpoints
//!
//! A [`Breakpoint`] names a responsive tier. [`Breakpoints`] assigns each tier
//! (except `Xxs`, which starts at 0) a minimum viewport width in CSS pixels:
//!
//! | tier  | default range  |
//! |-------|----------------|
//! | `xxs` | 0 – 374        |
//! | `xs`  | 375 – 575      |
//! | `sm`  | 576 – 767      |
//! | `md`  | 768 – 1023     |
//! | `lg`  | 1024 – 1279    |
//! | `xl`  | 1280 – 1439    |
//! | `xxl` | 1440+          |
//!
//! A width is "mobile" when it is below the `md` threshold.
//!
//! # Invariants
//!
//! 1. Thresholds are strictly increasing `xs < sm < md < lg < xl < xxl`.
//!    [`Breakpoints::new`] rejects anything else.
//! 2. [`Breakpoints::bucket_for`] returns exactly one tier for every width and
//!    is monotonically non-decreasing in the width.
//! 3. `bucket_for(w) >= bp` iff `w >= threshold(bp)`.

pub mod responsive;
pub mod style;

pub use responsive::Responsive;
pub use style::{
    SIDEBAR_MINIMIZED_WIDTH_VAR, SIDEBAR_WIDTH_VAR, SidebarWidths, StaticStyleSource, StyleCache,
    StyleSource, breakpoint_var, load_breakpoints, load_sidebar_widths, parse_px,
};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Breakpoint
// ---------------------------------------------------------------------------

/// A named responsive tier, ordered from narrowest to widest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Xxs = 0,
    Xs = 1,
    Sm = 2,
    Md = 3,
    Lg = 4,
    Xl = 5,
    Xxl = 6,
}

impl Breakpoint {
    /// Every tier in ascending order.
    pub const ALL: [Breakpoint; 7] = [
        Breakpoint::Xxs,
        Breakpoint::Xs,
        Breakpoint::Sm,
        Breakpoint::Md,
        Breakpoint::Lg,
        Breakpoint::Xl,
        Breakpoint::Xxl,
    ];

    /// Position in [`ALL`](Self::ALL).
    #[inline]
    #[must_use]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Lowercase name, as used in style variables and configuration.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Breakpoint::Xxs => "xxs",
            Breakpoint::Xs => "xs",
            Breakpoint::Sm => "sm",
            Breakpoint::Md => "md",
            Breakpoint::Lg => "lg",
            Breakpoint::Xl => "xl",
            Breakpoint::Xxl => "xxl",
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Breakpoint {
    type Err = BreakpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Breakpoint::ALL
            .into_iter()
            .find(|bp| bp.name() == s)
            .ok_or_else(|| BreakpointError::UnknownName(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from breakpoint parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BreakpointError {
    /// The name is not one of `xxs`..`xxl`.
    UnknownName(String),
    /// Thresholds are not strictly increasing.
    NotIncreasing {
        lower: Breakpoint,
        upper: Breakpoint,
    },
    /// A range query had its bounds swapped (or empty).
    InvertedRange { low: Breakpoint, high: Breakpoint },
}

impl fmt::Display for BreakpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownName(name) => write!(f, "invalid breakpoint: {name}"),
            Self::NotIncreasing { lower, upper } => {
                write!(f, "breakpoint {upper} must be wider than {lower}")
            }
            Self::InvertedRange { low, high } => {
                write!(f, "invalid breakpoint range: {low} - {high}")
            }
        }
    }
}

impl std::error::Error for BreakpointError {}

// ---------------------------------------------------------------------------
// Breakpoints
// ---------------------------------------------------------------------------

/// Minimum widths for each tier above `Xxs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoints {
    pub xs: u32,
    pub sm: u32,
    pub md: u32,
    pub lg: u32,
    pub xl: u32,
    pub xxl: u32,
}

impl Breakpoints {
    /// Stock thresholds, used whenever the style source has nothing better.
    pub const DEFAULT: Self = Self {
        xs: 375,
        sm: 576,
        md: 768,
        lg: 1024,
        xl: 1280,
        xxl: 1440,
    };

    /// Build a validated set of thresholds.
    pub fn new(
        xs: u32,
        sm: u32,
        md: u32,
        lg: u32,
        xl: u32,
        xxl: u32,
    ) -> Result<Self, BreakpointError> {
        let bps = Self {
            xs,
            sm,
            md,
            lg,
            xl,
            xxl,
        };
        bps.validate()?;
        Ok(bps)
    }

    /// Check the strictly-increasing invariant.
    pub fn validate(&self) -> Result<(), BreakpointError> {
        for pair in Breakpoint::ALL.windows(2) {
            let (lower, upper) = (pair[0], pair[1]);
            if self.threshold(upper) <= self.threshold(lower) {
                return Err(BreakpointError::NotIncreasing { lower, upper });
            }
        }
        Ok(())
    }

    /// Minimum width of `bp` (`Xxs` starts at 0).
    #[must_use]
    pub const fn threshold(&self, bp: Breakpoint) -> u32 {
        match bp {
            Breakpoint::Xxs => 0,
            Breakpoint::Xs => self.xs,
            Breakpoint::Sm => self.sm,
            Breakpoint::Md => self.md,
            Breakpoint::Lg => self.lg,
            Breakpoint::Xl => self.xl,
            Breakpoint::Xxl => self.xxl,
        }
    }

    /// Mutable access to the threshold of a tier; `None` for `Xxs`.
    pub fn threshold_mut(&mut self, bp: Breakpoint) -> Option<&mut u32> {
        match bp {
            Breakpoint::Xxs => None,
            Breakpoint::Xs => Some(&mut self.xs),
            Breakpoint::Sm => Some(&mut self.sm),
            Breakpoint::Md => Some(&mut self.md),
            Breakpoint::Lg => Some(&mut self.lg),
            Breakpoint::Xl => Some(&mut self.xl),
            Breakpoint::Xxl => Some(&mut self.xxl),
        }
    }

    /// The tier containing `width`.
    ///
    /// Scans from `Xxl` down; the first tier whose threshold is `<= width`
    /// wins. Widths below `xs` land in `Xxs`.
    #[must_use]
    pub fn bucket_for(&self, width: u32) -> Breakpoint {
        Breakpoint::ALL
            .into_iter()
            .rev()
            .find(|&bp| width >= self.threshold(bp))
            .unwrap_or(Breakpoint::Xxs)
    }

    /// Whether `width` is narrower than the `md` threshold.
    #[inline]
    #[must_use]
    pub fn is_mobile_width(&self, width: u32) -> bool {
        width < self.md
    }

    /// `width < threshold(bp)`.
    #[inline]
    #[must_use]
    pub fn is_below(&self, width: u32, bp: Breakpoint) -> bool {
        width < self.threshold(bp)
    }

    /// `threshold(low) <= width < threshold(high)`.
    ///
    /// Fails when `low >= high`, since such a range can never match.
    pub fn is_between(
        &self,
        width: u32,
        low: Breakpoint,
        high: Breakpoint,
    ) -> Result<bool, BreakpointError> {
        if low >= high {
            return Err(BreakpointError::InvertedRange { low, high });
        }
        Ok(width >= self.threshold(low) && width < self.threshold(high))
    }
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
