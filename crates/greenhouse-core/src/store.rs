//! Saved window positions and their on-disk JSON document.
//!
//! The document is loaded once at startup and rewritten in full after
//! every saved or removed window. Records are keyed by the window handle
//! at the time they were saved; handles change across restarts, so keys
//! are re-pointed at live windows by [`PositionStore::relink`] after the
//! identity matcher finds them again.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::NormalizedGeometry;
use crate::identity::WindowIdentity;
use crate::WindowHandle;

/// User-facing settings stored alongside the positions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run at login and restore every saved window on startup.
    pub start_with_windows: bool,
}

/// A saved window: who it is and where it goes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub info: WindowIdentity,
    pub position: NormalizedGeometry,
}

/// Handle string to record. A `BTreeMap` keeps serialization stable.
pub type SavedPositionSet = BTreeMap<String, WindowRecord>;

/// The complete persisted document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub settings: Settings,
    pub windows: SavedPositionSet,
}

/// Formats a handle the way record keys store it.
pub fn handle_key(hwnd: WindowHandle) -> String {
    hwnd.to_string()
}

/// Parses a window handle from decimal or `0x`-prefixed hex.
pub fn parse_handle(s: &str) -> Result<WindowHandle> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|_| Error::InvalidHandle(s.to_string()))
}

/// Reads the document, treating a missing or malformed file as empty.
pub fn load(path: &Path) -> Document {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return Document::default(),
    };

    match serde_json::from_str(&content) {
        Ok(document) => document,
        Err(e) => {
            log::warn!("ignoring unreadable {}: {e}", path.display());
            Document::default()
        }
    }
}

/// Writes the document to a sibling temp file, then renames it over
/// `path` so a crash never leaves a truncated file behind.
pub fn save(path: &Path, document: &Document) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(document)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Owns the saved-position document and keeps it in sync with disk.
#[derive(Debug)]
pub struct PositionStore {
    path: PathBuf,
    document: Document,
}

impl PositionStore {
    /// Loads the store from `path`. Never fails.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let document = load(&path);
        log::info!(
            "loaded {} saved window positions from {}",
            document.windows.len(),
            path.display()
        );
        Self { path, document }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &Settings {
        &self.document.settings
    }

    pub fn records(&self) -> &SavedPositionSet {
        &self.document.windows
    }

    pub fn len(&self) -> usize {
        self.document.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document.windows.is_empty()
    }

    pub fn get(&self, hwnd: WindowHandle) -> Option<&WindowRecord> {
        self.document.windows.get(&handle_key(hwnd))
    }

    pub fn geometry(&self, hwnd: WindowHandle) -> Option<NormalizedGeometry> {
        self.get(hwnd).map(|record| record.position)
    }

    /// Returns every record key that parses as a handle.
    pub fn handles(&self) -> Vec<WindowHandle> {
        self.document
            .windows
            .keys()
            .filter_map(|key| match parse_handle(key) {
                Ok(hwnd) => Some(hwnd),
                Err(_) => {
                    log::warn!("skipping saved record with bad key {key:?}");
                    None
                }
            })
            .collect()
    }

    /// Inserts or replaces the record for `hwnd` and writes the document.
    pub fn record_save(
        &mut self,
        hwnd: WindowHandle,
        info: WindowIdentity,
        position: NormalizedGeometry,
    ) -> Result<()> {
        self.document
            .windows
            .insert(handle_key(hwnd), WindowRecord { info, position });
        log::info!("saved position for window 0x{hwnd:X}");
        self.save()
    }

    /// Deletes the record for `hwnd` and writes the document.
    ///
    /// Returns whether a record existed.
    pub fn record_remove(&mut self, hwnd: WindowHandle) -> Result<bool> {
        let removed = self.document.windows.remove(&handle_key(hwnd)).is_some();
        if removed {
            log::info!("removed saved position for window 0x{hwnd:X}");
        }
        self.save()?;
        Ok(removed)
    }

    /// Re-keys the record stored under `old_key` to the live `hwnd`.
    ///
    /// In-memory only. Refuses to overwrite a different record that is
    /// already keyed by `hwnd`.
    pub fn relink(&mut self, old_key: &str, hwnd: WindowHandle) -> bool {
        let new_key = handle_key(hwnd);
        if new_key == old_key {
            return true;
        }
        if self.document.windows.contains_key(&new_key) {
            return false;
        }
        match self.document.windows.remove(old_key) {
            Some(record) => {
                self.document.windows.insert(new_key, record);
                true
            }
            None => false,
        }
    }

    /// Records the scale factor observed after a restore.
    ///
    /// In-memory only: bulk restores must not rewrite the file while
    /// other windows are still being moved.
    pub fn update_scale(&mut self, hwnd: WindowHandle, scale: f64) -> bool {
        match self.document.windows.get_mut(&handle_key(hwnd)) {
            Some(record) => {
                record.position.dpi_scale = scale;
                true
            }
            None => false,
        }
    }

    pub fn set_start_with_windows(&mut self, enabled: bool) -> Result<()> {
        self.document.settings.start_with_windows = enabled;
        self.save()
    }

    /// Writes the whole document to disk.
    pub fn save(&self) -> Result<()> {
        save(&self.path, &self.document)
    }
}
