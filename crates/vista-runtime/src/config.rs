#![forbid(unsafe_code)]

//! Shell configuration as data.
//!
//! [`ShellConfig`] gathers the tunables of the application root (resize
//! timing, sidebar storage key, mobile breakpoint, fallback widths) so that
//! a deployment can change them without a rebuild.
//!
//! # Loading
//!
//! ```toml
//! # vista.toml
//! resize_debounce_ms = 150
//!
//! [sidebar]
//! mobile_breakpoint = "lg"
//! expanded_width = "300px"
//! ```
//!
//! ```rust,ignore
//! let config = ShellConfig::from_toml_file("vista.toml")?.validated()?;
//! ```
//!
//! # Defaults
//!
//! Every field defaults to the built-in constants, so
//! `ShellConfig::default()` behaves exactly like an unconfigured shell.

#[cfg(feature = "config")]
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use vista_layout::{Breakpoint, SidebarWidths};

use crate::device::DeviceTiming;
use crate::sidebar::{DEFAULT_EXPANDED_WIDTH, DEFAULT_MINIMIZED_WIDTH, STORAGE_KEY, SidebarConfig};

/// Longest accepted debounce/settle delay.
pub const MAX_DELAY_MS: u64 = 5_000;

// ---------------------------------------------------------------------------
// ShellConfig
// ---------------------------------------------------------------------------

/// Top-level configuration for a Vista shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Resize debounce window in milliseconds.
    pub resize_debounce_ms: u64,
    /// Delay after an orientation change before re-measuring.
    pub orientation_delay_ms: u64,
    /// Sidebar parameters.
    pub sidebar: SidebarSection,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            resize_debounce_ms: 100,
            orientation_delay_ms: 100,
            sidebar: SidebarSection::default(),
        }
    }
}

/// The `[sidebar]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SidebarSection {
    pub storage_key: String,
    /// Tier below which the sidebar behaves as on mobile. Absent means `md`.
    pub mobile_breakpoint: Option<Breakpoint>,
    /// Expanded width when the theme does not define `--sidebar-width`.
    pub expanded_width: String,
    /// Minimized width when the theme does not define
    /// `--sidebar-minimized-width`.
    pub minimized_width: String,
}

impl Default for SidebarSection {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            mobile_breakpoint: None,
            expanded_width: DEFAULT_EXPANDED_WIDTH.to_string(),
            minimized_width: DEFAULT_MINIMIZED_WIDTH.to_string(),
        }
    }
}

impl ShellConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ShellConfigError> {
        toml::from_str(s).map_err(ShellConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ShellConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ShellConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ShellConfigError> {
        serde_json::from_str(s).map_err(ShellConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ShellConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ShellConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters.
    ///
    /// Returns a list of problems; an empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (name, value) in [
            ("resize_debounce_ms", self.resize_debounce_ms),
            ("orientation_delay_ms", self.orientation_delay_ms),
        ] {
            if value > MAX_DELAY_MS {
                errors.push(format!("{name} must be <= {MAX_DELAY_MS}, got {value}"));
            }
        }

        let sidebar = &self.sidebar;
        if sidebar.storage_key.trim().is_empty() {
            errors.push("sidebar.storage_key must not be empty".into());
        }
        if sidebar.mobile_breakpoint == Some(Breakpoint::Xxs) {
            errors.push("sidebar.mobile_breakpoint must be above xxs".into());
        }
        if sidebar.expanded_width.trim().is_empty() {
            errors.push("sidebar.expanded_width must not be empty".into());
        }
        if sidebar.minimized_width.trim().is_empty() {
            errors.push("sidebar.minimized_width must not be empty".into());
        }

        errors
    }

    /// `self` if valid, otherwise every problem at once.
    pub fn validated(self) -> Result<Self, ShellConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ShellConfigError::Validation(errors))
        }
    }

    /// Timer settings for the device store.
    #[must_use]
    pub fn to_device_timing(&self) -> DeviceTiming {
        DeviceTiming {
            resize_debounce: Duration::from_millis(self.resize_debounce_ms),
            orientation_delay: Duration::from_millis(self.orientation_delay_ms),
        }
    }

    /// Construction options for the sidebar coordinator.
    #[must_use]
    pub fn to_sidebar_config(&self) -> SidebarConfig {
        SidebarConfig {
            storage_key: self.sidebar.storage_key.clone(),
            mobile_breakpoint: self.sidebar.mobile_breakpoint,
            fallback_widths: SidebarWidths {
                expanded: self.sidebar.expanded_width.clone(),
                minimized: self.sidebar.minimized_width.clone(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from loading or validating a [`ShellConfig`].
#[derive(Debug)]
pub enum ShellConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ShellConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => write!(f, "validation errors: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ShellConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
