#![forbid(unsafe_code)]

//! 3D carousel geometry engine.
//!
//! Slides sit on a virtual circle viewed from the front. For each slide the
//! engine computes where it lands relative to the active slide: horizontal
//! offset, depth, scale, opacity, rotation, stacking order and blur. The
//! rendering layer turns a [`SlideGeometry`] into its own styling primitive
//! (on the web, [`SlideGeometry::transform`] is a ready CSS transform).
//!
//! # Geometry
//!
//! With `N` slides and active index `a` (fractional while dragging):
//!
//! ```text
//! Δ        = 2π·i/N − 2π·a/N, normalized into (−π, π]
//! x        = sin(Δ) · radius
//! z        = (1 − |Δ|/V) · radius/3
//! scale    = max(maxScale − |Δ|/V · (maxScale − minScale), minScale)
//! opacity  = max(maxOpacity − |Δ|/V · (maxOpacity − minOpacity), minOpacity)
//! rotateY  = clamp(Δ/V · maxRotation, ±maxRotation)
//! z-index  = round(50 − |Δ|·8)
//! blur     = (1 − opacity) · 0.5 · containerWidth/100
//! ```
//!
//! where `V` is the maximum visible angle.
//!
//! # Invariants
//!
//! 1. `active_index() < slide_count()` whenever `slide_count() > 0`.
//! 2. Navigation wraps in both directions and is a no-op with no slides.
//! 3. With no observed container, sizes fall back to static values.

use std::f64::consts::{PI, TAU};

use vista_core::{PointerEvent, Size, SwipeConfig, SwipeEvent, SwipeTracker};

/// Multiplier applied to a percentage when no container width is known.
const FALLBACK_PX_PER_PERCENT: f64 = 10.0;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// How a length is derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sizing {
    /// Fixed pixel value.
    Static(f64),
    /// Percentage of the container width; `p · 10` px without a container.
    Percent(f64),
}

impl Sizing {
    /// Resolve against an optional container.
    #[must_use]
    pub fn resolve(self, container: Option<Size>) -> f64 {
        match self {
            Self::Static(px) => px,
            Self::Percent(p) => match container {
                Some(size) if size.has_width() => size.percent_of_width(p),
                _ => p * FALLBACK_PX_PER_PERCENT,
            },
        }
    }
}

/// Minimum horizontal travel for a swipe to navigate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwipeThreshold {
    /// Percentage of the container width.
    Percent(f64),
    /// Absolute pixels.
    Pixels(f64),
}

impl SwipeThreshold {
    #[must_use]
    pub fn resolve(self, container: Option<Size>) -> f64 {
        match self {
            Self::Percent(p) => Sizing::Percent(p).resolve(container),
            Self::Pixels(px) => px,
        }
    }
}

/// Carousel parameters. Defaults reproduce the stock carousel.
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselConfig {
    pub radius: Sizing,
    pub slide_size: Sizing,
    /// Angle (radians) at which scale and opacity bottom out.
    pub max_visible_angle: f64,
    pub max_scale: f64,
    pub min_scale: f64,
    pub max_opacity: f64,
    pub min_opacity: f64,
    /// Maximum Y rotation in degrees.
    pub max_rotation: f64,
    pub swipe_threshold: SwipeThreshold,
    /// Follow the pointer with a fractional index during a drag.
    pub continuous_drag: bool,
    /// When set, scale is multiplied by `container_width / reference`.
    pub scale_reference_width: Option<f64>,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            radius: Sizing::Percent(30.0),
            slide_size: Sizing::Percent(25.0),
            max_visible_angle: PI / 1.8,
            max_scale: 1.0,
            min_scale: 0.4,
            max_opacity: 1.0,
            min_opacity: 0.2,
            max_rotation: 30.0,
            swipe_threshold: SwipeThreshold::Percent(10.0),
            continuous_drag: false,
            scale_reference_width: None,
        }
    }
}

impl CarouselConfig {
    #[must_use]
    pub fn radius(mut self, radius: Sizing) -> Self {
        self.radius = radius;
        self
    }

    #[must_use]
    pub fn slide_size(mut self, size: Sizing) -> Self {
        self.slide_size = size;
        self
    }

    #[must_use]
    pub fn max_rotation(mut self, degrees: f64) -> Self {
        self.max_rotation = degrees;
        self
    }

    #[must_use]
    pub fn swipe_threshold(mut self, threshold: SwipeThreshold) -> Self {
        self.swipe_threshold = threshold;
        self
    }

    #[must_use]
    pub fn continuous_drag(mut self, enabled: bool) -> Self {
        self.continuous_drag = enabled;
        self
    }

    #[must_use]
    pub fn scale_reference_width(mut self, width: Option<f64>) -> Self {
        self.scale_reference_width = width;
        self
    }
}

// ---------------------------------------------------------------------------
// Pure geometry
// ---------------------------------------------------------------------------

/// Container-dependent values shared by every slide of one layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedLayout {
    pub radius: f64,
    pub slide_size: f64,
    /// Blur multiplier: container width / 100, or 1 without a container.
    pub effect_scale: f64,
    /// Extra scale multiplier from `scale_reference_width`.
    pub scale_multiplier: f64,
}

impl ResolvedLayout {
    /// Resolve `config` against an optional container.
    #[must_use]
    pub fn resolve(config: &CarouselConfig, container: Option<Size>) -> Self {
        let width = container.filter(Size::has_width).map(|s| s.width);
        let scale_multiplier = match (config.scale_reference_width, width) {
            (Some(reference), Some(w)) if reference > 0.0 => w / reference,
            _ => 1.0,
        };
        Self {
            radius: config.radius.resolve(container),
            slide_size: config.slide_size.resolve(container),
            effect_scale: width.map_or(1.0, |w| w / 100.0),
            scale_multiplier,
        }
    }
}

/// Where one slide is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideGeometry {
    /// Signed angular distance from the active slide, in `(-π, π]`.
    pub angle_diff: f64,
    pub translate_x: f64,
    pub translate_z: f64,
    pub scale: f64,
    /// Degrees.
    pub rotation_y: f64,
    pub opacity: f64,
    pub z_index: i32,
    /// Blur radius in px.
    pub blur: f64,
    pub width: f64,
    pub height: f64,
}

impl SlideGeometry {
    /// CSS transform string.
    #[must_use]
    pub fn transform(&self) -> String {
        format!(
            "translateX({}px) translateZ({}px) scale({}) rotateY({}deg)",
            self.translate_x, self.translate_z, self.scale, self.rotation_y
        )
    }

    /// CSS filter string.
    #[must_use]
    pub fn filter(&self) -> String {
        format!("blur({}px)", self.blur)
    }
}

/// Normalize an angle into `(-π, π]` by whole turns.
///
/// Angles beyond one turn are first reduced with a remainder; the final
/// adjustment is a subtraction/addition so that exactly `π` stays `π` and
/// exactly `-π` becomes `π`. Runs in constant time for any finite input.
#[must_use]
pub fn normalize_angle(mut angle: f64) -> f64 {
    if !angle.is_finite() {
        return angle;
    }
    if angle.abs() > TAU {
        angle %= TAU;
    }
    while angle > PI {
        angle -= TAU;
    }
    while angle <= -PI {
        angle += TAU;
    }
    angle
}

/// Geometry of slide `index` when `active` (possibly fractional) is centered.
///
/// Returns `None` when there are no slides.
#[must_use]
pub fn slide_geometry(
    index: usize,
    active: f64,
    total: usize,
    config: &CarouselConfig,
    layout: &ResolvedLayout,
) -> Option<SlideGeometry> {
    if total == 0 {
        return None;
    }
    let n = total as f64;
    let active_angle = (TAU * active) / n;
    let current_angle = (TAU * index as f64) / n;
    let angle_diff = normalize_angle(current_angle - active_angle);

    let falloff = angle_diff.abs() / config.max_visible_angle;
    let radius = layout.radius;

    let scale = (config.max_scale - falloff * (config.max_scale - config.min_scale))
        .max(config.min_scale)
        * layout.scale_multiplier;
    let opacity = (config.max_opacity - falloff * (config.max_opacity - config.min_opacity))
        .max(config.min_opacity);
    let rotation_y = (angle_diff / config.max_visible_angle * config.max_rotation)
        .clamp(-config.max_rotation, config.max_rotation);

    Some(SlideGeometry {
        angle_diff,
        translate_x: angle_diff.sin() * radius,
        translate_z: (1.0 - falloff) * (radius / 3.0),
        scale,
        rotation_y,
        opacity,
        z_index: (50.0 - angle_diff.abs() * 8.0).round() as i32,
        blur: (1.0 - opacity) * 0.5 * layout.effect_scale,
        width: layout.slide_size,
        height: layout.slide_size,
    })
}

// ---------------------------------------------------------------------------
// Carousel3d
// ---------------------------------------------------------------------------

/// Stateful carousel: active index, container size and swipe handling.
#[derive(Debug, Clone)]
pub struct Carousel3d {
    config: CarouselConfig,
    slide_count: usize,
    active_index: usize,
    container: Option<Size>,
    swipe: SwipeTracker,
    drag_delta: f64,
}

impl Carousel3d {
    #[must_use]
    pub fn new(config: CarouselConfig, slide_count: usize) -> Self {
        Self {
            config,
            slide_count,
            active_index: 0,
            container: None,
            swipe: SwipeTracker::new(SwipeConfig::default()),
            drag_delta: 0.0,
        }
    }

    /// Use a custom swipe recognizer configuration.
    #[must_use]
    pub fn with_swipe_config(mut self, swipe: SwipeConfig) -> Self {
        self.swipe = SwipeTracker::new(swipe);
        self
    }

    #[must_use]
    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    #[must_use]
    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// Replace the slide count; the active index is clamped to the new range.
    pub fn set_slide_count(&mut self, count: usize) {
        self.slide_count = count;
        self.active_index = self.active_index.min(count.saturating_sub(1));
    }

    /// Latest observed container size.
    pub fn set_container(&mut self, size: Size) {
        self.container = Some(size);
    }

    /// Forget the container (element unmounted).
    pub fn clear_container(&mut self) {
        self.container = None;
    }

    #[must_use]
    pub fn container(&self) -> Option<Size> {
        self.container
    }

    // --- Navigation --------------------------------------------------------

    pub fn next(&mut self) {
        if self.slide_count > 0 {
            self.active_index = (self.active_index + 1) % self.slide_count;
        }
    }

    pub fn prev(&mut self) {
        if self.slide_count > 0 {
            self.active_index = (self.active_index + self.slide_count - 1) % self.slide_count;
        }
    }

    /// Jump to `index`, wrapped into range.
    pub fn go_to(&mut self, index: usize) {
        if self.slide_count > 0 {
            self.active_index = index % self.slide_count;
        }
    }

    // --- Geometry ----------------------------------------------------------

    #[must_use]
    pub fn layout(&self) -> ResolvedLayout {
        ResolvedLayout::resolve(&self.config, self.container)
    }

    /// Swipe threshold in pixels for the current container.
    #[must_use]
    pub fn swipe_threshold_px(&self) -> f64 {
        self.config.swipe_threshold.resolve(self.container)
    }

    /// Active index including the live drag offset in continuous mode.
    #[must_use]
    pub fn effective_index(&self) -> f64 {
        self.active_index as f64 + self.drag_offset()
    }

    fn drag_offset(&self) -> f64 {
        let threshold = self.swipe_threshold_px();
        if !self.config.continuous_drag || threshold <= 0.0 {
            return 0.0;
        }
        -self.drag_delta / threshold
    }

    /// Geometry for one slide; `None` with no slides.
    #[must_use]
    pub fn slide_geometry(&self, index: usize) -> Option<SlideGeometry> {
        slide_geometry(
            index,
            self.effective_index(),
            self.slide_count,
            &self.config,
            &self.layout(),
        )
    }

    /// Geometry for every slide in index order.
    #[must_use]
    pub fn geometries(&self) -> Vec<SlideGeometry> {
        let layout = self.layout();
        let active = self.effective_index();
        (0..self.slide_count)
            .filter_map(|i| slide_geometry(i, active, self.slide_count, &self.config, &layout))
            .collect()
    }

    // --- Input -------------------------------------------------------------

    #[must_use]
    pub fn is_swiping(&self) -> bool {
        self.swipe.is_swiping()
    }

    /// Feed a raw pointer event. Returns the new active index if it changed.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<usize> {
        let swipe = self.swipe.process(event)?;
        let changed = self.handle_swipe(swipe);
        if matches!(swipe, SwipeEvent::Start) {
            // The activating move already carries displacement.
            self.drag_delta = self.swipe.state().horizontal_delta;
        }
        changed
    }

    /// Apply a recognized swipe event. Returns the new active index if it
    /// changed.
    pub fn handle_swipe(&mut self, event: SwipeEvent) -> Option<usize> {
        match event {
            SwipeEvent::Start | SwipeEvent::Cancel => {
                self.drag_delta = 0.0;
                None
            }
            SwipeEvent::Move { horizontal_delta } => {
                self.drag_delta = horizontal_delta;
                None
            }
            SwipeEvent::End { horizontal_delta } => {
                self.drag_delta = 0.0;
                self.settle(horizontal_delta)
            }
        }
    }

    fn settle(&mut self, delta: f64) -> Option<usize> {
        if self.slide_count == 0 {
            return None;
        }
        let before = self.active_index;
        let threshold = self.swipe_threshold_px();

        if self.config.continuous_drag && threshold > 0.0 {
            let target = self.active_index as f64 - delta / threshold;
            let rounded = (target + 0.5).floor() as i64;
            self.active_index = rounded.rem_euclid(self.slide_count as i64) as usize;
        } else if delta.abs() > threshold {
            if delta < 0.0 {
                self.next();
            } else {
                self.prev();
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            delta,
            threshold,
            from = before,
            to = self.active_index,
            "carousel swipe settled"
        );

        (self.active_index != before).then_some(self.active_index)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
