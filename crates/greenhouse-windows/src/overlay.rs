//! Highlight overlays drawn as layered, click-through popup windows.
//!
//! The fill is pushed with `UpdateLayeredWindow`, so the overlay needs no
//! message pump on the creating thread.

use std::mem;
use std::sync::Once;

use greenhouse_core::config::{Color, HighlightConfig};
use greenhouse_core::{Error, MonitorHandle, OverlayBackend, OverlaySurface, Rect, Result};
use windows::Win32::Foundation::{COLORREF, HWND, LPARAM, LRESULT, POINT, SIZE, WPARAM};
use windows::Win32::Graphics::Gdi::{
    AC_SRC_ALPHA, AC_SRC_OVER, BI_RGB, BITMAPINFO, BITMAPINFOHEADER, BLENDFUNCTION,
    CreateCompatibleDC, CreateDIBSection, DIB_RGB_COLORS, DeleteDC, DeleteObject, GetDC, HBITMAP,
    HDC, HGDIOBJ, MONITOR_DEFAULTTONEAREST, MonitorFromWindow, ReleaseDC, SelectObject,
};
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, HWND_TOPMOST, RegisterClassW, SW_HIDE,
    SWP_NOACTIVATE, SWP_SHOWWINDOW, SetWindowPos, ShowWindow, ULW_ALPHA, UpdateLayeredWindow,
    WNDCLASSW, WS_EX_LAYERED, WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW, WS_EX_TOPMOST,
    WS_EX_TRANSPARENT, WS_POPUP,
};
use windows::core::{PCWSTR, w};

use crate::win32::{monitor_handle, os_error};

const CLASS_NAME: PCWSTR = w!("GreenhouseOverlay");

static REGISTER_CLASS: Once = Once::new();

fn ensure_class_registered() {
    REGISTER_CLASS.call_once(|| {
        let wc = WNDCLASSW {
            lpfnWndProc: Some(overlay_wnd_proc),
            lpszClassName: CLASS_NAME,
            ..Default::default()
        };
        // SAFETY: the class struct points at static data only.
        if unsafe { RegisterClassW(&wc) } == 0 {
            log::error!("failed to register overlay window class");
        }
    });
}

unsafe extern "system" fn overlay_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
}

/// Creates overlay windows with a fixed fill colour and opacity.
#[derive(Debug, Clone, Copy)]
pub struct Win32OverlayBackend {
    color: Color,
    alpha: u8,
}

impl Win32OverlayBackend {
    pub fn new(color: Color, alpha: u8) -> Self {
        Self { color, alpha }
    }

    pub fn from_config(config: &HighlightConfig) -> Self {
        Self::new(config.rgb(), config.alpha)
    }
}

impl OverlayBackend for Win32OverlayBackend {
    type Surface = OverlayWindow;

    fn create(&self, rect: &Rect) -> Result<OverlayWindow> {
        OverlayWindow::new(rect, self.color, self.alpha)
    }
}

/// A transparent, topmost, click-through window. Destroyed on drop.
pub struct OverlayWindow {
    hwnd: HWND,
    color: Color,
    alpha: u8,
}

impl OverlayWindow {
    /// Creates a hidden overlay window at `rect`.
    pub fn new(rect: &Rect, color: Color, alpha: u8) -> Result<Self> {
        ensure_class_registered();

        let ex = WS_EX_LAYERED
            | WS_EX_TOOLWINDOW
            | WS_EX_TOPMOST
            | WS_EX_TRANSPARENT
            | WS_EX_NOACTIVATE;
        // SAFETY: the class is registered above; no parent, menu or
        // creation data is passed.
        let hwnd = unsafe {
            CreateWindowExW(
                ex,
                CLASS_NAME,
                PCWSTR::null(),
                WS_POPUP,
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                None,
                None,
                None,
                None,
            )
        }
        .map_err(os_error)?;

        Ok(Self { hwnd, color, alpha })
    }

    /// Fills the overlay with its colour over `rect`.
    fn render(&self, rect: &Rect) -> Result<()> {
        let (w, h) = (rect.width, rect.height);
        if w <= 0 || h <= 0 {
            return Ok(());
        }

        let screen = ScreenDc::get()?;
        let memory = MemoryDc::compatible_with(&screen)?;

        let bmi = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: w,
                biHeight: -h, // top-down
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut bits = std::ptr::null_mut();
        // SAFETY: bmi describes a 32bpp top-down DIB; `bits` receives the
        // pixel pointer owned by the bitmap.
        let bitmap =
            unsafe { CreateDIBSection(Some(memory.0), &bmi, DIB_RGB_COLORS, &mut bits, None, 0) }
                .map(Bitmap)
                .map_err(os_error)?;
        if bits.is_null() {
            return Err(Error::unavailable("CreateDIBSection returned no pixels"));
        }
        let _selected = Selection::select(&memory, &bitmap);

        let pixel = 0xFF00_0000
            | (u32::from(self.color.r) << 16)
            | (u32::from(self.color.g) << 8)
            | u32::from(self.color.b);
        // SAFETY: `bits` is non-null (checked above) and points to `w * h`
        // pixels allocated by CreateDIBSection, alive while `bitmap` is.
        let buf = unsafe { std::slice::from_raw_parts_mut(bits.cast::<u32>(), (w * h) as usize) };
        buf.fill(pixel);

        let dst = POINT {
            x: rect.x,
            y: rect.y,
        };
        let size = SIZE { cx: w, cy: h };
        let src = POINT::default();
        let blend = BLENDFUNCTION {
            BlendOp: AC_SRC_OVER as u8,
            SourceConstantAlpha: self.alpha,
            AlphaFormat: AC_SRC_ALPHA as u8,
            ..Default::default()
        };

        // SAFETY: every pointer refers to a local that outlives the call.
        unsafe {
            UpdateLayeredWindow(
                self.hwnd,
                Some(screen.0),
                Some(&dst),
                Some(&size),
                Some(memory.0),
                Some(&src),
                COLORREF(0),
                Some(&blend),
                ULW_ALPHA,
            )
        }
        .map_err(os_error)
    }
}

impl OverlaySurface for OverlayWindow {
    fn place(&self, rect: &Rect) -> Result<()> {
        // SAFETY: self.hwnd is owned by this struct and alive until drop.
        unsafe {
            SetWindowPos(
                self.hwnd,
                Some(HWND_TOPMOST),
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                SWP_NOACTIVATE | SWP_SHOWWINDOW,
            )
        }
        .map_err(os_error)?;
        self.render(rect)
    }

    fn hide(&self) {
        // SAFETY: self.hwnd is owned by this struct and alive until drop.
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_HIDE);
        }
    }

    fn monitor(&self) -> Result<MonitorHandle> {
        // SAFETY: MonitorFromWindow is a pure query.
        let monitor = unsafe { MonitorFromWindow(self.hwnd, MONITOR_DEFAULTTONEAREST) };
        monitor_handle(monitor).ok_or_else(|| Error::unavailable("overlay has no monitor"))
    }
}

impl Drop for OverlayWindow {
    fn drop(&mut self) {
        // SAFETY: the window was created by this struct and is destroyed
        // exactly once.
        if unsafe { DestroyWindow(self.hwnd) }.is_err() {
            log::debug!("overlay 0x{:X} was already destroyed", self.hwnd.0 as usize);
        }
    }
}

/// The screen device context, released on drop.
struct ScreenDc(HDC);

impl ScreenDc {
    fn get() -> Result<Self> {
        // SAFETY: GetDC(None) returns the screen DC or null.
        let dc = unsafe { GetDC(None) };
        if dc.is_invalid() {
            return Err(Error::unavailable("GetDC failed"));
        }
        Ok(Self(dc))
    }
}

impl Drop for ScreenDc {
    fn drop(&mut self) {
        // SAFETY: the DC came from GetDC(None).
        unsafe {
            ReleaseDC(None, self.0);
        }
    }
}

/// A memory device context, deleted on drop.
struct MemoryDc(HDC);

impl MemoryDc {
    fn compatible_with(screen: &ScreenDc) -> Result<Self> {
        // SAFETY: screen.0 is a live DC.
        let dc = unsafe { CreateCompatibleDC(Some(screen.0)) };
        if dc.is_invalid() {
            return Err(Error::unavailable("CreateCompatibleDC failed"));
        }
        Ok(Self(dc))
    }
}

impl Drop for MemoryDc {
    fn drop(&mut self) {
        // SAFETY: the DC came from CreateCompatibleDC.
        unsafe {
            let _ = DeleteDC(self.0);
        }
    }
}

/// A GDI bitmap, deleted on drop.
struct Bitmap(HBITMAP);

impl Drop for Bitmap {
    fn drop(&mut self) {
        // SAFETY: the bitmap is deselected before this runs (see
        // `Selection`), so it can be deleted.
        unsafe {
            let _ = DeleteObject(self.0.into());
        }
    }
}

/// Keeps a bitmap selected into a DC; restores the previous object on
/// drop.
struct Selection {
    dc: HDC,
    previous: HGDIOBJ,
}

impl Selection {
    fn select(dc: &MemoryDc, bitmap: &Bitmap) -> Self {
        // SAFETY: both handles are live for the lifetime of the guards.
        let previous = unsafe { SelectObject(dc.0, bitmap.0.into()) };
        Self { dc: dc.0, previous }
    }
}

impl Drop for Selection {
    fn drop(&mut self) {
        // SAFETY: restores the object that was selected before.
        unsafe {
            SelectObject(self.dc, self.previous);
        }
    }
}
