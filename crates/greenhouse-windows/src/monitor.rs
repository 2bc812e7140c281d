use greenhouse_core::{Error, MonitorHandle, Result, WindowHandle};
use windows::Win32::Foundation::POINT;
use windows::Win32::Graphics::Gdi::{MONITOR_DEFAULTTONEAREST, MonitorFromPoint, MonitorFromWindow};
use windows::Win32::UI::HiDpi::{GetDpiForMonitor, GetDpiForWindow, MDT_EFFECTIVE_DPI};
use windows::Win32::UI::WindowsAndMessaging::{GetSystemMetrics, SM_CMONITORS};

use crate::win32::{self, monitor_handle, os_error};

/// Returns the monitor that contains most of the window.
pub fn monitor_from_window(hwnd: WindowHandle) -> Result<MonitorHandle> {
    // SAFETY: MonitorFromWindow is a pure query; a stale HWND yields the
    // nearest monitor or null.
    let monitor = unsafe { MonitorFromWindow(win32::hwnd(hwnd), MONITOR_DEFAULTTONEAREST) };
    monitor_handle(monitor).ok_or(Error::WindowGone(hwnd))
}

/// Returns the monitor under a virtual-desktop point, or the nearest one.
pub fn monitor_from_point(x: i32, y: i32) -> Result<MonitorHandle> {
    // SAFETY: MonitorFromPoint is a pure query.
    let monitor = unsafe { MonitorFromPoint(POINT { x, y }, MONITOR_DEFAULTTONEAREST) };
    monitor_handle(monitor).ok_or_else(|| Error::unavailable(format!("no monitor near ({x}, {y})")))
}

/// Effective DPI of the window's monitor, as the window sees it.
pub fn dpi_for_window(hwnd: WindowHandle) -> Result<u32> {
    // SAFETY: GetDpiForWindow returns 0 for an invalid HWND.
    match unsafe { GetDpiForWindow(win32::hwnd(hwnd)) } {
        0 => Err(Error::WindowGone(hwnd)),
        dpi => Ok(dpi),
    }
}

/// Effective DPI of a monitor.
pub fn dpi_for_monitor(monitor: MonitorHandle) -> Result<u32> {
    let (mut dpi_x, mut dpi_y) = (0u32, 0u32);
    // SAFETY: GetDpiForMonitor writes into two u32s we own.
    unsafe {
        GetDpiForMonitor(
            win32::hmonitor(monitor),
            MDT_EFFECTIVE_DPI,
            &mut dpi_x,
            &mut dpi_y,
        )
    }
    .map_err(os_error)?;
    Ok(dpi_x)
}

/// Number of display monitors on the desktop.
pub fn monitor_count() -> Result<usize> {
    // SAFETY: GetSystemMetrics is a pure query.
    let count = unsafe { GetSystemMetrics(SM_CMONITORS) };
    usize::try_from(count).map_err(|_| Error::unavailable("negative monitor count"))
}
