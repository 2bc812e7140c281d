use greenhouse_core::{Result, WindowHandle};
use windows::Win32::Foundation::{HWND, LPARAM};
use windows::Win32::UI::WindowsAndMessaging::EnumWindows;
use windows::core::BOOL;

use crate::win32::os_error;

/// Returns every top-level window handle in `EnumWindows` order.
///
/// No filtering happens here; the core decides which windows are
/// interesting.
pub fn top_level_windows() -> Result<Vec<WindowHandle>> {
    let mut handles: Vec<WindowHandle> = Vec::new();

    // SAFETY: EnumWindows calls our callback for each top-level window.
    // We pass a pointer to our Vec as LPARAM (user data). The callback
    // casts it back to &mut Vec<WindowHandle>. EnumWindows runs
    // synchronously, so the Vec outlives the call.
    unsafe {
        EnumWindows(
            Some(enum_window_callback),
            LPARAM(&mut handles as *mut _ as isize),
        )
        .map_err(os_error)?;
    }

    Ok(handles)
}

/// Callback invoked by `EnumWindows` for each top-level window.
///
/// Win32 can't call Rust closures directly, so the collecting `Vec` rides
/// along in the pointer-sized `LPARAM`.
unsafe extern "system" fn enum_window_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
    // SAFETY: lparam is a pointer to our Vec, cast from top_level_windows().
    let handles = unsafe { &mut *(lparam.0 as *mut Vec<WindowHandle>) };
    handles.push(hwnd.0 as usize);

    BOOL(1) // TRUE: continue enumerating
}
