//! Ctrl+C notification using `SetConsoleCtrlHandler`.

use std::sync::OnceLock;
use std::sync::mpsc::Sender;

use greenhouse_core::{Error, Result};
use windows::Win32::System::Console::{CTRL_BREAK_EVENT, CTRL_C_EVENT, SetConsoleCtrlHandler};
use windows::core::BOOL;

use crate::win32::os_error;

/// Written once by `set_handler`, read by the callback.
static SENDER: OnceLock<Sender<()>> = OnceLock::new();

/// Registers a console handler that sends `()` on Ctrl+C or Ctrl+Break.
///
/// Only one handler can be registered per process.
pub fn set_handler(tx: Sender<()>) -> Result<()> {
    SENDER
        .set(tx)
        .map_err(|_| Error::unavailable("Ctrl+C handler already registered"))?;
    // SAFETY: `handler` is a plain function that only touches SENDER.
    unsafe { SetConsoleCtrlHandler(Some(handler), true) }.map_err(os_error)
}

unsafe extern "system" fn handler(ctrl_type: u32) -> BOOL {
    if (ctrl_type == CTRL_C_EVENT || ctrl_type == CTRL_BREAK_EVENT)
        && let Some(tx) = SENDER.get()
    {
        let _ = tx.send(());
        return BOOL(1);
    }
    BOOL(0)
}
