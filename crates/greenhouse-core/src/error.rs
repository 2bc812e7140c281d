use std::fmt;

use thiserror::Error;

use crate::WindowHandle;

/// Errors raised by Greenhouse operations.
///
/// Most of these never reach the user: OS lookups degrade to defaults and
/// batch operations log and skip. Only explicit saves and CLI input errors
/// surface as hard failures.
#[derive(Debug, Error)]
pub enum Error {
    /// The window was closed between enumeration and use.
    #[error("window 0x{0:X} no longer exists")]
    WindowGone(WindowHandle),

    /// An OS query failed or returned nothing useful.
    #[error("{0}")]
    Unavailable(String),

    /// The window's title, class, or owning process could not be read.
    #[error("window 0x{0:X} could not be identified")]
    Unidentifiable(WindowHandle),

    /// There is no saved geometry for the window.
    #[error("no saved position for window 0x{0:X}")]
    NotSaved(WindowHandle),

    /// A window handle string could not be parsed.
    #[error("invalid window handle: {0:?}")]
    InvalidHandle(String),

    /// The home directory could not be determined.
    #[error("home directory not found")]
    NoHomeDir,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Builds an [`Error::Unavailable`] from anything displayable.
    pub fn unavailable(detail: impl fmt::Display) -> Self {
        Self::Unavailable(detail.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Outcome of a lookup that is allowed to fall back to a safe default.
///
/// `Fallback` carries the default that was substituted, so callers can
/// log the degradation without handling an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<T> {
    /// The OS answered.
    Value(T),
    /// The OS query failed and the default was used.
    Fallback(T),
}

impl<T> Resolved<T> {
    /// Returns the contained value regardless of how it was obtained.
    pub fn get(self) -> T {
        match self {
            Self::Value(v) | Self::Fallback(v) => v,
        }
    }

    /// Returns whether the default was substituted.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}
