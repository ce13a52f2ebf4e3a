#![forbid(unsafe_code)]

//! Headless widget engines for Vista.
//!
//! Each engine owns its state and math and leaves drawing to the rendering
//! layer:
//!
//! - [`Carousel3d`] - slides on a virtual circle, driven by navigation and swipes
//! - [`FortuneWheel`] - spin target selection and completion timing
//! - [`ClampGenerator`] - fluid `font-size: clamp(...)` declarations

pub mod carousel;
pub mod clamp;
pub mod wheel;

pub use carousel::{
    Carousel3d, CarouselConfig, ResolvedLayout, Sizing, SlideGeometry, SwipeThreshold,
    normalize_angle, slide_geometry,
};
pub use clamp::{ClampError, ClampForm, ClampGenerator, ClampValue, Length, Unit};
pub use wheel::{FortuneWheel, SPIN_DURATION, SpinError, SpinTicket, WheelSlice};
