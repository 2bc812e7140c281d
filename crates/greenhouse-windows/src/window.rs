use greenhouse_core::{Rect, Result, WindowHandle};
use windows::Win32::Foundation::{HWND, RECT};
use windows::Win32::UI::WindowsAndMessaging::{
    GetWindowRect, GetWindowTextLengthW, GetWindowTextW, IsIconic, IsWindow, IsWindowVisible,
    MoveWindow, RealGetWindowClassW,
};

use crate::win32::{self, os_error};

/// A window on the Windows platform, wrapping a Win32 `HWND`.
///
/// `HWND` is an opaque handle: a number that identifies a window to the OS.
/// This struct holds that handle and queries the OS lazily for metadata.
#[derive(Debug, Clone, Copy)]
pub struct Window {
    hwnd: HWND,
}

impl Window {
    pub fn new(hwnd: HWND) -> Self {
        Self { hwnd }
    }

    /// Creates a `Window` from a raw handle value.
    pub fn from_raw(handle: WindowHandle) -> Self {
        Self {
            hwnd: win32::hwnd(handle),
        }
    }

    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }

    pub fn handle(&self) -> WindowHandle {
        self.hwnd.0 as usize
    }

    /// Returns whether the handle still names an existing window.
    pub fn exists(&self) -> bool {
        // SAFETY: IsWindow accepts any value, including stale handles.
        unsafe { IsWindow(Some(self.hwnd)).as_bool() }
    }

    pub fn is_visible(&self) -> bool {
        // SAFETY: IsWindowVisible is a simple query that returns a BOOL.
        unsafe { IsWindowVisible(self.hwnd).as_bool() }
    }

    pub fn is_minimized(&self) -> bool {
        // SAFETY: IsIconic is a simple query that returns a BOOL.
        unsafe { IsIconic(self.hwnd).as_bool() }
    }

    pub fn title(&self) -> Result<String> {
        // SAFETY: GetWindowTextLengthW and GetWindowTextW read window text
        // into a buffer we own and size.
        unsafe {
            let length = GetWindowTextLengthW(self.hwnd);
            if length <= 0 {
                return Ok(String::new());
            }

            // +1 for the null terminator that Windows requires
            let mut buffer = vec![0u16; (length + 1) as usize];
            let copied = GetWindowTextW(self.hwnd, &mut buffer).max(0);
            Ok(String::from_utf16_lossy(&buffer[..copied as usize]))
        }
    }

    pub fn class(&self) -> Result<String> {
        // SAFETY: RealGetWindowClassW reads the window class name.
        // 256 is the maximum class name length in Win32.
        unsafe {
            let mut buffer = [0u16; 256];
            let length = RealGetWindowClassW(self.hwnd, &mut buffer) as usize;
            Ok(String::from_utf16_lossy(&buffer[..length.min(buffer.len())]))
        }
    }

    /// Returns the outer window rectangle, invisible resize borders
    /// included, so that it round-trips through [`Window::set_rect`].
    pub fn rect(&self) -> Result<Rect> {
        let mut rc = RECT::default();
        // SAFETY: GetWindowRect fills a RECT we own.
        unsafe { GetWindowRect(self.hwnd, &mut rc) }.map_err(os_error)?;
        Ok(Rect::from_edges(rc.left, rc.top, rc.right, rc.bottom))
    }

    /// Moves and resizes the window in one call and repaints it.
    pub fn set_rect(&self, rect: &Rect) -> Result<()> {
        log::debug!(
            "move 0x{:X} to ({},{} {}x{})",
            self.handle(),
            rect.x,
            rect.y,
            rect.width,
            rect.height
        );
        // SAFETY: MoveWindow with a valid HWND is safe; a stale handle
        // makes it fail, which is reported.
        unsafe { MoveWindow(self.hwnd, rect.x, rect.y, rect.width, rect.height, true) }
            .map_err(os_error)
    }
}
