#![forbid(unsafe_code)]

//! Fluid typography: CSS `clamp()` generator.
//!
//! Given a viewport range and a font-size range, produce a declaration whose
//! size grows linearly with the viewport between the two bounds:
//!
//! ```text
//! slope     = (maxFont − minFont) / (maxWidth − minWidth)
//! intercept = minFont − slope · minWidth
//! font-size: clamp(minFont, intercept + slope·100vw, maxFont);
//! ```
//!
//! All inputs are converted to px first (`rem × base`). Output is in rem
//! (4 decimals, trailing zeros trimmed) or px (bounds with 2 decimals,
//! `.00` trimmed; intercept with 4 decimals trimmed).

use std::fmt;

/// Base font size used when the configured one is unusable.
pub const DEFAULT_BASE_FONT_SIZE: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    #[default]
    Px,
    Rem,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Px => "px",
            Self::Rem => "rem",
        })
    }
}

/// A length with its unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    pub value: f64,
    pub unit: Unit,
}

impl Length {
    #[must_use]
    pub const fn px(value: f64) -> Self {
        Self {
            value,
            unit: Unit::Px,
        }
    }

    #[must_use]
    pub const fn rem(value: f64) -> Self {
        Self {
            value,
            unit: Unit::Rem,
        }
    }

    /// Value in px for the given root font size.
    #[must_use]
    pub fn to_px(self, base_font_size: f64) -> f64 {
        match self.unit {
            Unit::Px => self.value,
            Unit::Rem => self.value * base_font_size,
        }
    }
}

/// Generator inputs. Defaults: 375–1440px viewport, 16–48px font, rem output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClampForm {
    pub min_width: Length,
    pub max_width: Length,
    pub min_font: Length,
    pub max_font: Length,
    pub base_font_size: f64,
    pub output_unit: Unit,
}

impl Default for ClampForm {
    fn default() -> Self {
        Self {
            min_width: Length::px(375.0),
            max_width: Length::px(1440.0),
            min_font: Length::px(16.0),
            max_font: Length::px(48.0),
            base_font_size: DEFAULT_BASE_FONT_SIZE,
            output_unit: Unit::Rem,
        }
    }
}

impl ClampForm {
    fn base(&self) -> f64 {
        if self.base_font_size.is_finite() && self.base_font_size > 0.0 {
            self.base_font_size
        } else {
            DEFAULT_BASE_FONT_SIZE
        }
    }

    /// Compute the clamp expression.
    pub fn compute(&self) -> Result<ClampValue, ClampError> {
        let base = self.base();
        let min_w = self.min_width.to_px(base);
        let max_w = self.max_width.to_px(base);
        let min_f = self.min_font.to_px(base);
        let max_f = self.max_font.to_px(base);

        // Negated comparisons also reject NaN.
        if !(min_w < max_w) || !(min_f < max_f) {
            return Err(ClampError::InvalidValues);
        }

        let slope = (max_f - min_f) / (max_w - min_w);
        let intercept = min_f - slope * min_w;
        let vw = trim_fixed(slope * 100.0, 4);

        let (min, preferred, max) = match self.output_unit {
            Unit::Rem => (
                format!("{}rem", trim_fixed(min_f / base, 4)),
                format!("{}rem + {vw}vw", trim_fixed(intercept / base, 4)),
                format!("{}rem", trim_fixed(max_f / base, 4)),
            ),
            Unit::Px => (
                format!("{}px", trim_whole(min_f)),
                format!("{}px + {vw}vw", trim_fixed(intercept, 4)),
                format!("{}px", trim_whole(max_f)),
            ),
        };
        Ok(ClampValue {
            min,
            preferred,
            max,
        })
    }
}

/// `value` with `decimals` places, trailing zeros and a bare dot removed.
fn trim_fixed(value: f64, decimals: usize) -> String {
    let s = format!("{value:.decimals$}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// `value` with 2 places, with `.00` removed.
fn trim_whole(value: f64) -> String {
    let s = format!("{value:.2}");
    match s.strip_suffix(".00") {
        Some(whole) => whole.to_string(),
        None => s,
    }
}

/// The three parts of a `clamp()` expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClampValue {
    pub min: String,
    pub preferred: String,
    pub max: String,
}

impl ClampValue {
    /// `clamp(min, preferred, max)`.
    #[must_use]
    pub fn css(&self) -> String {
        format!("clamp({}, {}, {})", self.min, self.preferred, self.max)
    }

    /// `font-size: clamp(...);`.
    #[must_use]
    pub fn declaration(&self) -> String {
        format!("font-size: {};", self.css())
    }
}

impl fmt::Display for ClampValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.declaration())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClampError {
    /// A minimum is not below its maximum.
    InvalidValues,
}

impl fmt::Display for ClampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValues => f.write_str("Invalid values"),
        }
    }
}

impl std::error::Error for ClampError {}

/// A form plus the last successfully generated declaration.
#[derive(Debug, Clone, Default)]
pub struct ClampGenerator {
    pub form: ClampForm,
    result: Option<String>,
}

impl ClampGenerator {
    #[must_use]
    pub fn new(form: ClampForm) -> Self {
        Self { form, result: None }
    }

    /// Regenerate from the current form. An invalid form clears the result.
    pub fn generate(&mut self) -> Result<&str, ClampError> {
        match self.form.compute() {
            Ok(value) => Ok(self.result.insert(value.declaration()).as_str()),
            Err(err) => {
                self.result = None;
                Err(err)
            }
        }
    }

    /// The declaration ready to copy, if the last generation succeeded.
    #[must_use]
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }
}
