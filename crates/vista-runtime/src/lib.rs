#![forbid(unsafe_code)]

//! Vista Runtime
//!
//! Application-wide state for a Vista shell: the device store, the sidebar
//! coordinator, and the plumbing they share.
//!
//! # Key Components
//!
//! - [`Observable`] - Shared value with synchronous change notification
//! - [`DeviceStore`] - Viewport width, breakpoint tier and mobile flag
//! - [`SidebarCoordinator`] - Sidebar open/expanded state and layout offset
//! - [`StorageBackend`] - Key/value persistence for state that outlives a session
//! - [`ShellConfig`] - Tunables loadable from TOML or JSON
//!
//! # How it fits in the system
//! The runtime sits between `vista-core` (host events, timers) and the
//! rendering layer. Hosts forward resize events and ticks; the rendering
//! layer subscribes to the observables and applies what they publish.
//! Everything here is single-threaded (`Rc`, `RefCell`), matching a UI
//! thread.

pub mod config;
pub mod device;
pub mod reactive;
pub mod sidebar;
pub mod storage;

pub use config::{ShellConfig, ShellConfigError, SidebarSection};
pub use device::{
    DeviceStore, DeviceTiming, FixedViewport, ListenerGuard, ORIENTATION_CHANGE_DELAY,
    RESIZE_DEBOUNCE, Screen, Viewport,
};
pub use reactive::{Observable, Subscription};
pub use sidebar::{LayoutOffset, STORAGE_KEY, SidebarConfig, SidebarCoordinator, SidebarState};
#[cfg(feature = "state-persistence")]
pub use storage::FileStorage;
pub use storage::{
    MemoryStorage, StorageBackend, StorageError, StorageResult, load_flag, load_json, save_flag,
    save_json,
};
