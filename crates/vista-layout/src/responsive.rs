#![forbid(unsafe_code)]

//! Responsive value mapping: apply different values based on breakpoint.
//!
//! [`Responsive<T>`] maps [`Breakpoint`] tiers to values of any type,
//! with inheritance from smaller breakpoints. If no value is set for a
//! given breakpoint, the value from the next smaller breakpoint is used.
//!
//! # Usage
//!
//! ```
//! use vista_layout::{Breakpoint, Responsive};
//!
//! let radius = Responsive::new(20.0)     // xxs: 20%
//!     .at(Breakpoint::Md, 30.0)          // md: 30%
//!     .at(Breakpoint::Xxl, 35.0);        // xxl: 35%
//!
//! assert_eq!(radius.resolve(Breakpoint::Sm), &20.0);
//! assert_eq!(radius.resolve(Breakpoint::Xl), &30.0);
//! ```
//!
//! # Invariants
//!
//! 1. `Xxs` always has a value (the base, set via `new()`).
//! 2. A missing tier inherits from the nearest smaller tier that has a value.
//! 3. `resolve()` never fails.
//! 4. Setting a value at a tier only affects that tier and tiers that
//!    inherit from it.

use super::Breakpoint;

/// A breakpoint-aware value with inheritance from smaller tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Responsive<T> {
    /// Value for `Xxs`, inherited by every tier without an override.
    base: T,
    /// Overrides for `Xs..=Xxl`, indexed by `ordinal - 1`.
    overrides: [Option<T>; 6],
}

impl<T: Clone> Responsive<T> {
    /// Create a responsive value with a base value for `Xxs`.
    #[must_use]
    pub fn new(base: T) -> Self {
        Self {
            base,
            overrides: [None, None, None, None, None, None],
        }
    }

    /// Set the value for a specific breakpoint (builder pattern).
    #[must_use]
    pub fn at(mut self, bp: Breakpoint, value: T) -> Self {
        self.set(bp, value);
        self
    }

    /// Set the value for a specific breakpoint (mutating).
    ///
    /// Setting `Xxs` replaces the base value.
    pub fn set(&mut self, bp: Breakpoint, value: T) {
        match bp.ordinal() {
            0 => self.base = value,
            i => self.overrides[i - 1] = Some(value),
        }
    }

    /// Clear the override for a specific breakpoint, reverting to inheritance.
    ///
    /// Clearing `Xxs` is a no-op (it always has a value).
    pub fn clear(&mut self, bp: Breakpoint) {
        if let Some(i) = bp.ordinal().checked_sub(1) {
            self.overrides[i] = None;
        }
    }

    /// Resolve the value for a given breakpoint.
    #[must_use]
    pub fn resolve(&self, bp: Breakpoint) -> &T {
        self.overrides[..bp.ordinal()]
            .iter()
            .rev()
            .find_map(Option::as_ref)
            .unwrap_or(&self.base)
    }

    /// Resolve and clone the value for a given breakpoint.
    #[must_use]
    pub fn resolve_cloned(&self, bp: Breakpoint) -> T {
        self.resolve(bp).clone()
    }

    /// Whether a specific breakpoint has an explicit (non-inherited) value.
    #[must_use]
    pub fn has_explicit(&self, bp: Breakpoint) -> bool {
        match bp.ordinal() {
            0 => true,
            i => self.overrides[i - 1].is_some(),
        }
    }

    /// All explicitly set breakpoints and their values, ascending.
    pub fn explicit_values(&self) -> impl Iterator<Item = (Breakpoint, &T)> {
        std::iter::once((Breakpoint::Xxs, &self.base)).chain(
            Breakpoint::ALL[1..]
                .iter()
                .zip(self.overrides.iter())
                .filter_map(|(&bp, v)| v.as_ref().map(|val| (bp, val))),
        )
    }

    /// Map the values to a new type.
    #[must_use]
    pub fn map<U: Clone>(&self, f: impl Fn(&T) -> U) -> Responsive<U> {
        Responsive {
            base: f(&self.base),
            overrides: std::array::from_fn(|i| self.overrides[i].as_ref().map(&f)),
        }
    }
}

impl<T: Clone + Default> Default for Responsive<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + std::fmt::Display> std::fmt::Display for Responsive<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Responsive(")?;
        let mut first = true;
        for (bp, val) in self.explicit_values() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", bp, val)?;
            first = false;
        }
        write!(f, ")")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_value_at_all_breakpoints() {
        let r = Responsive::new(42);
        for bp in Breakpoint::ALL {
            assert_eq!(r.resolve(bp), &42);
        }
    }

    #[test]
    fn override_inherits_upward() {
        let r = Responsive::new(1).at(Breakpoint::Md, 2);

        assert_eq!(r.resolve(Breakpoint::Xxs), &1);
        assert_eq!(r.resolve(Breakpoint::Sm), &1);
        assert_eq!(r.resolve(Breakpoint::Md), &2);
        assert_eq!(r.resolve(Breakpoint::Lg), &2);
        assert_eq!(r.resolve(Breakpoint::Xxl), &2);
    }

    #[test]
    fn nearest_smaller_override_wins() {
        let r = Responsive::new(0)
            .at(Breakpoint::Xs, 1)
            .at(Breakpoint::Lg, 4)
            .at(Breakpoint::Xxl, 6);

        assert_eq!(r.resolve(Breakpoint::Sm), &1);
        assert_eq!(r.resolve(Breakpoint::Md), &1);
        assert_eq!(r.resolve(Breakpoint::Xl), &4);
        assert_eq!(r.resolve(Breakpoint::Xxl), &6);
    }

    #[test]
    fn set_xxs_replaces_base() {
        let mut r = Responsive::new(0);
        r.set(Breakpoint::Xxs, 9);
        assert_eq!(r.resolve(Breakpoint::Xl), &9);
    }

    #[test]
    fn clear_reverts_to_inheritance() {
        let mut r = Responsive::new(1).at(Breakpoint::Md, 2);
        r.clear(Breakpoint::Md);
        assert_eq!(r.resolve(Breakpoint::Md), &1);

        r.clear(Breakpoint::Xxs);
        assert_eq!(r.resolve(Breakpoint::Xxs), &1);
    }

    #[test]
    fn explicit_values_and_display() {
        let r = Responsive::new(0).at(Breakpoint::Md, 2).at(Breakpoint::Xxl, 4);
        let explicit: Vec<_> = r.explicit_values().collect();
        assert_eq!(
            explicit,
            vec![
                (Breakpoint::Xxs, &0),
                (Breakpoint::Md, &2),
                (Breakpoint::Xxl, &4)
            ]
        );
        assert!(r.has_explicit(Breakpoint::Xxs));
        assert!(!r.has_explicit(Breakpoint::Lg));
        assert_eq!(r.to_string(), "Responsive(xxs=0, md=2, xxl=4)");
    }

    #[test]
    fn map_values() {
        let r = Responsive::new(10).at(Breakpoint::Lg, 20);
        let doubled = r.map(|v| v * 2);
        assert_eq!(doubled.resolve(Breakpoint::Xs), &20);
        assert_eq!(doubled.resolve(Breakpoint::Xl), &40);
        assert_eq!(doubled.resolve_cloned(Breakpoint::Lg), 40);
    }
}
