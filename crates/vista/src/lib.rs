#![forbid(unsafe_code)]

//! Vista public facade crate.
//!
//! Re-exports the common types of the internal crates, offers a prelude, and
//! provides [`Shell`], the application root that owns one [`DeviceStore`] and
//! one [`SidebarCoordinator`].

use std::fmt;
use std::rc::Rc;

use tracing::info;
use web_time::Instant;

// --- Core re-exports -------------------------------------------------------

pub use vista_core::logging::{LogFormat, init_logging};
pub use vista_core::{
    Debouncer, PointerEvent, Size, SwipeConfig, SwipeEvent, SwipeState, SwipeTracker,
};

// --- Layout re-exports -----------------------------------------------------

pub use vista_layout::{
    Breakpoint, BreakpointError, Breakpoints, Responsive, SidebarWidths, StaticStyleSource,
    StyleSource,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "state-persistence")]
pub use vista_runtime::FileStorage;
pub use vista_runtime::{
    DeviceStore, DeviceTiming, FixedViewport, LayoutOffset, ListenerGuard, MemoryStorage,
    Observable, ShellConfig, ShellConfigError, SidebarConfig, SidebarCoordinator, SidebarState,
    StorageBackend, StorageError, Subscription, Viewport,
};

// --- Widget re-exports -----------------------------------------------------

pub use vista_widgets::{
    Carousel3d, CarouselConfig, ClampError, ClampForm, ClampGenerator, FortuneWheel,
    Sizing, SlideGeometry, SpinError, SwipeThreshold, WheelSlice,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Vista apps.
#[derive(Debug)]
pub enum Error {
    Config(ShellConfigError),
    Storage(StorageError),
    Breakpoint(BreakpointError),
    Spin(SpinError),
    Clamp(ClampError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "configuration: {err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Breakpoint(err) => write!(f, "{err}"),
            Self::Spin(err) => write!(f, "spin rejected: {err}"),
            Self::Clamp(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Breakpoint(err) => Some(err),
            Self::Spin(err) => Some(err),
            Self::Clamp(err) => Some(err),
        }
    }
}

impl From<ShellConfigError> for Error {
    fn from(err: ShellConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

impl From<BreakpointError> for Error {
    fn from(err: BreakpointError) -> Self {
        Self::Breakpoint(err)
    }
}

impl From<SpinError> for Error {
    fn from(err: SpinError) -> Self {
        Self::Spin(err)
    }
}

impl From<ClampError> for Error {
    fn from(err: ClampError) -> Self {
        Self::Clamp(err)
    }
}

/// Standard result type for Vista APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Shell ------------------------------------------------------------------

/// The application root.
///
/// Owns the device store and the sidebar coordinator for one application,
/// keeps the resize listeners attached while it lives, and forwards host
/// events to them. Consumers receive cheap clones of the stores.
pub struct Shell {
    config: ShellConfig,
    device: DeviceStore,
    sidebar: SidebarCoordinator,
    listeners: Option<ListenerGuard>,
}

impl fmt::Debug for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shell")
            .field("device", &self.device)
            .field("sidebar", &self.sidebar)
            .field("listening", &self.listeners.is_some())
            .finish()
    }
}

impl Shell {
    /// Build and initialize a shell. The configuration is validated first.
    pub fn new(
        viewport: Rc<dyn Viewport>,
        style: Rc<dyn StyleSource>,
        storage: Rc<dyn StorageBackend>,
        config: ShellConfig,
    ) -> Result<Self> {
        let config = config.validated()?;
        let device = DeviceStore::new(viewport, Rc::clone(&style), config.to_device_timing());
        let sidebar =
            SidebarCoordinator::new(device.clone(), storage, style, config.to_sidebar_config());
        let listeners = device.attach_listeners();
        sidebar.initialize();
        info!(
            width = device.screen_width(),
            breakpoint = %device.current_breakpoint(),
            "shell started"
        );
        Ok(Self {
            config,
            device,
            sidebar,
            listeners: Some(listeners),
        })
    }

    /// A shell over a fixed-width viewport, empty theme and in-memory
    /// storage, with default configuration.
    pub fn headless(width: u32) -> Result<Self> {
        Self::new(
            Rc::new(FixedViewport::new(width)),
            Rc::new(StaticStyleSource::new()),
            Rc::new(MemoryStorage::new()),
            ShellConfig::default(),
        )
    }

    #[must_use]
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    #[must_use]
    pub fn device(&self) -> &DeviceStore {
        &self.device
    }

    #[must_use]
    pub fn sidebar(&self) -> &SidebarCoordinator {
        &self.sidebar
    }

    /// Resolve a responsive value at the current breakpoint.
    #[must_use]
    pub fn resolve<T: Clone>(&self, value: &Responsive<T>) -> T {
        self.device.resolve(value)
    }

    /// Forward a viewport resize.
    pub fn on_resize(&self, now: Instant) {
        self.device.on_resize(now);
    }

    /// Forward an orientation change.
    pub fn on_orientation_change(&self, now: Instant) {
        self.device.on_orientation_change(now);
    }

    /// Fire due timers. Returns `true` if the device was re-measured.
    pub fn tick(&self, now: Instant) -> bool {
        self.device.tick(now)
    }

    /// When the host should call [`tick`](Self::tick) next.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.device.next_deadline()
    }

    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.listeners.is_some()
    }

    /// Detach listeners and cancel pending timers. Idempotent.
    pub fn teardown(&mut self) {
        if self.listeners.take().is_some() {
            info!("shell torn down");
        }
    }
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Breakpoint, Carousel3d, CarouselConfig, DeviceStore, Error, LayoutOffset, Responsive,
        Result, Shell, ShellConfig, SidebarCoordinator, Size,
    };

    pub use crate::{core, layout, runtime, widgets};
}

pub use vista_core as core;
pub use vista_layout as layout;
pub use vista_runtime as runtime;
pub use vista_widgets as widgets;
