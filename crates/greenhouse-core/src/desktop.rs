//! Traits the platform layer implements.
//!
//! The core never talks to the OS directly. `greenhouse-windows` provides
//! Win32 implementations; tests use scripted fakes.

use crate::error::Result;
use crate::{MonitorHandle, Rect, WindowHandle};

/// Metadata about the process that owns a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    /// Executable file name, e.g. `notepad.exe`.
    pub name: String,
    /// Absolute executable path.
    pub path: String,
}

/// Window, monitor, and process queries plus window placement.
pub trait Desktop {
    /// Returns every top-level window in OS enumeration order, unfiltered.
    fn top_level_windows(&self) -> Result<Vec<WindowHandle>>;

    /// Returns whether the handle still names an existing window.
    fn is_window(&self, hwnd: WindowHandle) -> bool;

    fn is_visible(&self, hwnd: WindowHandle) -> bool;

    fn is_minimized(&self, hwnd: WindowHandle) -> bool;

    fn title(&self, hwnd: WindowHandle) -> Result<String>;

    fn class_name(&self, hwnd: WindowHandle) -> Result<String>;

    /// Returns the executable name and path of the owning process.
    fn process_info(&self, hwnd: WindowHandle) -> Result<ProcessInfo>;

    /// Returns the window's outer rectangle in device pixels.
    fn window_rect(&self, hwnd: WindowHandle) -> Result<Rect>;

    /// Moves and resizes the window in a single call.
    fn move_window(&self, hwnd: WindowHandle, rect: &Rect) -> Result<()>;

    /// Returns the monitor that contains most of the window.
    fn monitor_from_window(&self, hwnd: WindowHandle) -> Result<MonitorHandle>;

    /// Returns the monitor under a virtual-desktop point.
    fn monitor_from_point(&self, x: i32, y: i32) -> Result<MonitorHandle>;

    /// Returns the effective DPI of the window's monitor.
    fn dpi_for_window(&self, hwnd: WindowHandle) -> Result<u32>;

    /// Returns the effective DPI of a monitor.
    fn dpi_for_monitor(&self, monitor: MonitorHandle) -> Result<u32>;
}

/// Counts active display devices.
///
/// Kept separate from [`Desktop`] because the topology monitor calls it
/// from its own thread.
pub trait MonitorCounter: Send + 'static {
    fn monitor_count(&self) -> Result<usize>;
}

/// Creates highlight overlay surfaces.
pub trait OverlayBackend {
    type Surface: OverlaySurface;

    /// Creates a hidden, click-through, topmost surface at `rect`.
    fn create(&self, rect: &Rect) -> Result<Self::Surface>;
}

/// A live overlay window. Dropping it destroys the underlying window.
pub trait OverlaySurface {
    /// Positions, sizes, and shows the surface without activating it.
    fn place(&self, rect: &Rect) -> Result<()>;

    fn hide(&self);

    /// Returns the monitor the surface currently resolves to.
    fn monitor(&self) -> Result<MonitorHandle>;
}
