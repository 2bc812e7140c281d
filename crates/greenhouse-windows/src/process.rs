use std::path::Path;

use greenhouse_core::{Error, ProcessInfo, Result, WindowHandle};
use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::System::Threading::{
    OpenProcess, PROCESS_NAME_WIN32, PROCESS_QUERY_LIMITED_INFORMATION,
    QueryFullProcessImageNameW,
};
use windows::Win32::UI::WindowsAndMessaging::GetWindowThreadProcessId;
use windows::core::PWSTR;

use crate::win32::{self, os_error};

/// Closes a process handle when dropped.
struct ProcessHandle(HANDLE);

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        // SAFETY: the handle came from OpenProcess and is closed once.
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

/// Returns the executable name and full path of the window's process.
pub fn process_info(hwnd: WindowHandle) -> Result<ProcessInfo> {
    let pid = window_pid(hwnd)?;
    let path = image_path(pid)?;
    let name = Path::new(&path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.clone());
    Ok(ProcessInfo { name, path })
}

fn window_pid(hwnd: WindowHandle) -> Result<u32> {
    let mut pid = 0u32;
    // SAFETY: GetWindowThreadProcessId writes the PID into a u32 we own.
    let thread = unsafe { GetWindowThreadProcessId(win32::hwnd(hwnd), Some(&mut pid)) };
    if thread == 0 || pid == 0 {
        return Err(Error::WindowGone(hwnd));
    }
    Ok(pid)
}

fn image_path(pid: u32) -> Result<String> {
    // SAFETY: PROCESS_QUERY_LIMITED_INFORMATION is the least-privilege
    // right that allows reading the image name, including for elevated
    // processes owned by the same user.
    let handle = unsafe { OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid) }
        .map(ProcessHandle)
        .map_err(os_error)?;

    let mut buffer = [0u16; 1024];
    let mut size = buffer.len() as u32;
    // SAFETY: the buffer and its length are ours; size is updated to the
    // number of characters written.
    unsafe {
        QueryFullProcessImageNameW(
            handle.0,
            PROCESS_NAME_WIN32,
            PWSTR(buffer.as_mut_ptr()),
            &mut size,
        )
    }
    .map_err(os_error)?;

    Ok(String::from_utf16_lossy(&buffer[..size as usize]))
}
