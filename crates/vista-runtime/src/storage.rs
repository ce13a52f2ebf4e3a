#![forbid(unsafe_code)]

//! Key/value persistence for UI state that must survive reloads.
//!
//! # Design
//!
//! A [`StorageBackend`] stores strings under string keys, like a browser's
//! `localStorage`. Values are JSON-encoded by the typed helpers
//! ([`load_json`] / [`save_json`]), so a persisted `true` is the string
//! `"true"`.
//!
//! Backends:
//! - [`MemoryStorage`]: in-process map; can be switched to "unavailable" to
//!   model storage that throws (private browsing, quota exceeded).
//! - [`FileStorage`] (feature `state-persistence`): a JSON object on disk,
//!   written atomically (temp file, then rename).
//!
//! # Failure Modes
//!
//! Backends report failures as [`StorageError`]. The flag helpers
//! ([`load_flag`] / [`save_flag`]) sit at the boundary: they log a warning
//! and fall back to `false` / drop the write, never propagating the error.

use std::cell::{Cell, RefCell};
use std::fmt;

use rustc_hash::FxHashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors reported by storage backends and the JSON codec.
#[derive(Debug)]
pub enum StorageError {
    /// The backend cannot be used at all right now.
    Unavailable(String),
    /// Filesystem failure.
    Io(std::io::Error),
    /// A value could not be encoded.
    Serialization(String),
    /// A stored value could not be decoded.
    Corrupt { key: String, detail: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(why) => write!(f, "storage unavailable: {why}"),
            Self::Io(e) => write!(f, "storage I/O error: {e}"),
            Self::Serialization(e) => write!(f, "failed to encode value: {e}"),
            Self::Corrupt { key, detail } => write!(f, "corrupt value for {key:?}: {detail}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

// ---------------------------------------------------------------------------
// Backend trait
// ---------------------------------------------------------------------------

/// A synchronous string key/value store.
///
/// Methods take `&self`: backends are shared between consumers on the UI
/// thread and use interior mutability.
pub trait StorageBackend {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// The raw value under `key`, or `None` if absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete `key`. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

// ---------------------------------------------------------------------------
// Typed helpers
// ---------------------------------------------------------------------------

/// Decode the JSON value under `key`.
pub fn load_json<T: DeserializeOwned>(
    backend: &dyn StorageBackend,
    key: &str,
) -> StorageResult<Option<T>> {
    let Some(raw) = backend.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| StorageError::Corrupt {
            key: key.to_string(),
            detail: e.to_string(),
        })
}

/// Encode `value` as JSON under `key`.
pub fn save_json<T: Serialize + ?Sized>(
    backend: &dyn StorageBackend,
    key: &str,
    value: &T,
) -> StorageResult<()> {
    let raw = serde_json::to_string(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
    backend.set(key, &raw)
}

/// Load a persisted boolean. Absent, corrupt or unreadable values yield
/// `false`; failures are logged, never returned.
pub fn load_flag(backend: &dyn StorageBackend, key: &str) -> bool {
    match load_json::<bool>(backend, key) {
        Ok(value) => value.unwrap_or(false),
        Err(err) => {
            warn!(
                key,
                backend = backend.name(),
                error = %err,
                "failed to load persisted flag, using false"
            );
            false
        }
    }
}

/// Persist a boolean. Failures are logged and dropped.
pub fn save_flag(backend: &dyn StorageBackend, key: &str, value: bool) {
    match save_json(backend, key, &value) {
        Ok(()) => debug!(key, value, "persisted flag"),
        Err(err) => {
            warn!(key, backend = backend.name(), error = %err, "failed to persist flag");
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryStorage
// ---------------------------------------------------------------------------

/// In-process storage.
#[derive(Debug)]
pub struct MemoryStorage {
    entries: RefCell<FxHashMap<String, String>>,
    available: Cell<bool>,
    writes: Cell<u64>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self {
            entries: RefCell::default(),
            available: Cell::new(true),
            writes: Cell::new(0),
        }
    }
}

impl MemoryStorage {
    /// Empty, available storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with one raw entry (builder pattern).
    #[must_use]
    pub fn with_entry(self, key: impl Into<String>, raw: impl Into<String>) -> Self {
        self.entries.borrow_mut().insert(key.into(), raw.into());
        self
    }

    /// Make every operation fail with [`StorageError::Unavailable`] (or succeed
    /// again).
    pub fn set_available(&self, available: bool) {
        self.available.set(available);
    }

    /// Raw stored string for `key`, bypassing availability.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    /// Number of successful `set` calls.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.writes.get()
    }

    fn check(&self) -> StorageResult<()> {
        if self.available.get() {
            Ok(())
        } else {
            Err(StorageError::Unavailable("memory storage disabled".into()))
        }
    }
}

impl StorageBackend for MemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.check()?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.check()?;
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.check()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileStorage
// ---------------------------------------------------------------------------

#[cfg(feature = "state-persistence")]
pub use file::FileStorage;

#[cfg(feature = "state-persistence")]
mod file {
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};

    use super::{StorageBackend, StorageError, StorageResult};

    /// Storage backed by a JSON object file (`{"key": "raw value", ...}`).
    ///
    /// Every operation reads the file; writes go to `<path>.tmp` and are
    /// renamed over the original. A missing file is an empty store.
    #[derive(Debug, Clone)]
    pub struct FileStorage {
        path: PathBuf,
    }

    impl FileStorage {
        /// Storage at `path`. The parent directory must exist.
        #[must_use]
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        /// The backing file path.
        #[must_use]
        pub fn path(&self) -> &Path {
            &self.path
        }

        fn read_map(&self) -> StorageResult<BTreeMap<String, String>> {
            if !self.path.exists() {
                return Ok(BTreeMap::new());
            }
            let contents = std::fs::read_to_string(&self.path)?;
            serde_json::from_str(&contents).map_err(|e| StorageError::Corrupt {
                key: self.path.display().to_string(),
                detail: e.to_string(),
            })
        }

        fn write_map(&self, map: &BTreeMap<String, String>) -> StorageResult<()> {
            let json = serde_json::to_string_pretty(map)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            let temp = self.path.with_extension("json.tmp");
            std::fs::write(&temp, json)?;
            std::fs::rename(&temp, &self.path)?;
            Ok(())
        }
    }

    impl StorageBackend for FileStorage {
        fn name(&self) -> &str {
            "file"
        }

        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            Ok(self.read_map()?.remove(key))
        }

        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            let mut map = self.read_map()?;
            map.insert(key.to_string(), value.to_string());
            self.write_map(&map)
        }

        fn remove(&self, key: &str) -> StorageResult<()> {
            let mut map = self.read_map()?;
            if map.remove(key).is_some() {
                self.write_map(&map)?;
            }
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
