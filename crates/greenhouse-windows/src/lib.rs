//! Win32 implementation of the Greenhouse platform traits.
//!
//! Everything here is Windows-only; on other targets the crate is empty.
#![cfg(windows)]

/// HKCU Run-key registration.
pub mod autostart;

/// Ctrl+C notification over a channel.
pub mod ctrl_c;

/// `Desktop` and `MonitorCounter` implementations.
pub mod desktop;

/// Per-monitor DPI awareness.
pub mod dpi;

/// Win32 window enumeration.
pub mod enumerate;

/// Monitor lookup, DPI and counting.
pub mod monitor;

/// Layered highlight overlay windows.
pub mod overlay;

/// Owning-process metadata.
pub mod process;

/// Window type wrapping a Win32 `HWND`.
pub mod window;

mod win32;

pub use desktop::{Win32Desktop, Win32MonitorCounter};
pub use overlay::{OverlayWindow, Win32OverlayBackend};
pub use window::Window;
