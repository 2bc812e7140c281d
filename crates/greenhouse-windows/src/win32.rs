use greenhouse_core::{Error, MonitorHandle, WindowHandle};
use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Gdi::HMONITOR;

/// Wraps a Win32 error in the core error type.
pub(crate) fn os_error(e: windows::core::Error) -> Error {
    Error::unavailable(e)
}

pub(crate) fn hwnd(handle: WindowHandle) -> HWND {
    HWND(handle as *mut _)
}

pub(crate) fn hmonitor(handle: MonitorHandle) -> HMONITOR {
    HMONITOR(handle as *mut _)
}

pub(crate) fn monitor_handle(monitor: HMONITOR) -> Option<MonitorHandle> {
    (!monitor.is_invalid()).then_some(monitor.0 as usize)
}

/// Null-terminated UTF-16 copy of `s`.
pub(crate) fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}
