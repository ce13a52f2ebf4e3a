#![forbid(unsafe_code)]

//! Style sources: named values supplied by the active theme.
//!
//! The rendering layer owns the theme; Vista only needs a handful of named
//! values from it (breakpoint thresholds and sidebar widths). A
//! [`StyleSource`] answers lookups by variable name, using the same names a
//! stylesheet would (`--breakpoint-md`, `--sidebar-width`, ...).
//!
//! Reading a style source can be comparatively expensive (on the web it
//! forces a style recalculation), so derived values are memoized in a
//! [`StyleCache`] and only reloaded after an explicit `invalidate()`, for
//! example on a theme switch.

use std::cell::RefCell;

use rustc_hash::FxHashMap;
use tracing::warn;

use crate::{Breakpoint, Breakpoints};

/// Variable holding the expanded sidebar width.
pub const SIDEBAR_WIDTH_VAR: &str = "--sidebar-width";
/// Variable holding the minimized sidebar width.
pub const SIDEBAR_MINIMIZED_WIDTH_VAR: &str = "--sidebar-minimized-width";

/// Name of the variable holding the threshold for `bp`.
#[must_use]
pub fn breakpoint_var(bp: Breakpoint) -> String {
    format!("--breakpoint-{}", bp.name())
}

/// A provider of named style values.
pub trait StyleSource {
    /// Raw value of `name`, or `None` if the theme does not define it.
    fn value(&self, name: &str) -> Option<String>;
}

impl<S: StyleSource + ?Sized> StyleSource for &S {
    fn value(&self, name: &str) -> Option<String> {
        (**self).value(name)
    }
}

impl<S: StyleSource + ?Sized> StyleSource for std::rc::Rc<S> {
    fn value(&self, name: &str) -> Option<String> {
        (**self).value(name)
    }
}

/// An in-memory style source.
///
/// Values can be changed after construction (through `&self`) to model a
/// runtime theme switch.
#[derive(Debug, Default)]
pub struct StaticStyleSource {
    vars: RefCell<FxHashMap<String, String>>,
}

impl StaticStyleSource {
    /// An empty source: every lookup misses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable (builder pattern).
    #[must_use]
    pub fn with(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Define or replace a variable.
    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.borrow_mut().insert(name.into(), value.into());
    }

    /// Remove a variable.
    pub fn remove(&self, name: &str) {
        self.vars.borrow_mut().remove(name);
    }
}

impl StyleSource for StaticStyleSource {
    fn value(&self, name: &str) -> Option<String> {
        self.vars.borrow().get(name).cloned()
    }
}

/// Parse a pixel length the way `parseInt` does: leading whitespace, then
/// leading digits; any suffix (`px`) is ignored.
///
/// Returns `None` for values with no leading digits, negative values, and
/// zero (a zero threshold is treated as "not set").
#[must_use]
pub fn parse_px(raw: &str) -> Option<u32> {
    let trimmed = raw.trim_start();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    match digits[..end].parse::<u32>() {
        Ok(0) | Err(_) => None,
        Ok(v) => Some(v),
    }
}

/// Load breakpoint thresholds from `source`.
///
/// Each tier falls back to its default independently. If the combined
/// result violates the ordering invariant the whole set falls back to
/// [`Breakpoints::DEFAULT`] and a warning is logged.
pub fn load_breakpoints(source: &dyn StyleSource) -> Breakpoints {
    let mut loaded = Breakpoints::DEFAULT;
    for bp in &Breakpoint::ALL[1..] {
        let parsed = source.value(&breakpoint_var(*bp)).as_deref().and_then(parse_px);
        if let (Some(v), Some(slot)) = (parsed, loaded.threshold_mut(*bp)) {
            *slot = v;
        }
    }
    match loaded.validate() {
        Ok(()) => loaded,
        Err(err) => {
            warn!(error = %err, "failed to load breakpoints from style source, using defaults");
            Breakpoints::DEFAULT
        }
    }
}

/// Expanded and minimized sidebar widths, as CSS lengths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarWidths {
    pub expanded: String,
    pub minimized: String,
}

impl SidebarWidths {
    /// The width for the given expansion state.
    #[must_use]
    pub fn for_state(&self, expanded: bool) -> &str {
        if expanded {
            &self.expanded
        } else {
            &self.minimized
        }
    }
}

/// Load sidebar widths from `source`, trimming whitespace; blank or missing
/// values take the matching field of `fallback`.
pub fn load_sidebar_widths(source: &dyn StyleSource, fallback: &SidebarWidths) -> SidebarWidths {
    let read = |name: &str, default: &str| {
        source
            .value(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default.to_string())
    };
    SidebarWidths {
        expanded: read(SIDEBAR_WIDTH_VAR, &fallback.expanded),
        minimized: read(SIDEBAR_MINIMIZED_WIDTH_VAR, &fallback.minimized),
    }
}

/// A memoized value derived from a style source.
#[derive(Debug, Clone, Default)]
pub struct StyleCache<T> {
    value: Option<T>,
    loads: u64,
}

impl<T: Clone> StyleCache<T> {
    /// An empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            value: None,
            loads: 0,
        }
    }

    /// The cached value, running `load` first if the cache is empty.
    pub fn get_or_load(&mut self, load: impl FnOnce() -> T) -> T {
        if let Some(v) = &self.value {
            return v.clone();
        }
        let v = load();
        self.loads += 1;
        self.value = Some(v.clone());
        v
    }

    /// Drop the cached value; the next read reloads.
    pub fn invalidate(&mut self) {
        self.value = None;
    }

    /// Whether a value is cached.
    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.value.is_some()
    }

    /// How many times the loader has run.
    #[must_use]
    pub fn load_count(&self) -> u64 {
        self.loads
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fallback() -> SidebarWidths {
        SidebarWidths {
            expanded: "280px".into(),
            minimized: "64px".into(),
        }
    }

    #[test]
    fn parse_px_follows_leading_integer_rules() {
        assert_eq!(parse_px("768px"), Some(768));
        assert_eq!(parse_px("  1024"), Some(1024));
        assert_eq!(parse_px("+12rem"), Some(12));
        assert_eq!(parse_px("12.5px"), Some(12));
        assert_eq!(parse_px(""), None);
        assert_eq!(parse_px("px"), None);
        assert_eq!(parse_px("-5px"), None);
        assert_eq!(parse_px("0"), None);
    }

    #[test]
    fn breakpoints_fall_back_per_tier() {
        let src = StaticStyleSource::new()
            .with("--breakpoint-md", "800px")
            .with("--breakpoint-lg", "garbage");
        let bps = load_breakpoints(&src);
        assert_eq!(bps.md, 800);
        assert_eq!(bps.lg, Breakpoints::DEFAULT.lg);
        assert_eq!(bps.xs, Breakpoints::DEFAULT.xs);
    }

    #[test]
    fn inconsistent_breakpoints_use_defaults() {
        let src = StaticStyleSource::new().with("--breakpoint-sm", "2000px");
        assert_eq!(load_breakpoints(&src), Breakpoints::DEFAULT);
    }

    #[test]
    fn sidebar_widths_are_trimmed_with_fallback() {
        let src = StaticStyleSource::new()
            .with(SIDEBAR_WIDTH_VAR, "  300px ")
            .with(SIDEBAR_MINIMIZED_WIDTH_VAR, "   ");
        let widths = load_sidebar_widths(&src, &fallback());
        assert_eq!(widths.expanded, "300px");
        assert_eq!(widths.minimized, "64px");
        assert_eq!(widths.for_state(true), "300px");
        assert_eq!(widths.for_state(false), "64px");
    }

    #[test]
    fn cache_loads_once_until_invalidated() {
        let src = StaticStyleSource::new().with("--breakpoint-md", "700");
        let mut cache = StyleCache::new();

        assert_eq!(cache.get_or_load(|| load_breakpoints(&src)).md, 700);
        src.set("--breakpoint-md", "900");
        assert_eq!(cache.get_or_load(|| load_breakpoints(&src)).md, 700);
        assert_eq!(cache.load_count(), 1);

        cache.invalidate();
        assert!(!cache.is_cached());
        assert_eq!(cache.get_or_load(|| load_breakpoints(&src)).md, 900);
        assert_eq!(cache.load_count(), 2);
    }

    #[test]
    fn rc_source_delegates() {
        let src = std::rc::Rc::new(StaticStyleSource::new().with("a", "b"));
        assert_eq!(src.value("a").as_deref(), Some("b"));
        src.remove("a");
        assert_eq!(src.value("a"), None);
    }
}
