//! Windows autostart registration via the HKCU Run registry key.
//!
//! Writes a `Greenhouse` value under
//! `HKEY_CURRENT_USER\Software\Microsoft\Windows\CurrentVersion\Run`
//! so that `greenhouse watch` runs on user logon. No elevation is
//! required since HKCU is per-user.

use greenhouse_core::{Error, Result};
use windows::Win32::Foundation::ERROR_FILE_NOT_FOUND;
use windows::Win32::System::Registry::{
    HKEY, HKEY_CURRENT_USER, KEY_QUERY_VALUE, KEY_SET_VALUE, REG_SAM_FLAGS, REG_SZ, RegCloseKey,
    RegDeleteValueW, RegOpenKeyExW, RegQueryValueExW, RegSetValueExW,
};
use windows::core::PCWSTR;

use crate::win32::to_wide;

const RUN_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Run";
const VALUE_NAME: &str = "Greenhouse";

/// An open registry key, closed on drop.
struct RunKey(HKEY);

impl RunKey {
    /// Opens the HKCU Run key with the given access rights.
    fn open(access: REG_SAM_FLAGS) -> Result<Self> {
        let wide_key = to_wide(RUN_KEY);
        let mut key = HKEY::default();
        // SAFETY: RegOpenKeyExW is a standard Win32 registry API. We pass
        // valid pointers and close the key on drop.
        let status = unsafe {
            RegOpenKeyExW(
                HKEY_CURRENT_USER,
                PCWSTR(wide_key.as_ptr()),
                None,
                access,
                &mut key,
            )
        };
        if status.is_err() {
            return Err(Error::unavailable(format!(
                "could not open registry key: {status:?}"
            )));
        }
        Ok(Self(key))
    }
}

impl Drop for RunKey {
    fn drop(&mut self) {
        // SAFETY: RegCloseKey is safe to call on any valid HKEY.
        let _ = unsafe { RegCloseKey(self.0) };
    }
}

/// Registers `greenhouse watch` to start on Windows logon.
pub fn enable() -> Result<()> {
    let value = exe_command()?;
    let key = RunKey::open(KEY_SET_VALUE)?;
    set_string_value(&key, &value)?;
    log::info!("registered autostart: {value}");
    Ok(())
}

/// Removes the autostart entry. Succeeds if it did not exist.
pub fn disable() -> Result<()> {
    let key = RunKey::open(KEY_SET_VALUE)?;
    delete_value(&key)?;
    log::info!("removed autostart entry");
    Ok(())
}

/// Checks whether the autostart entry exists.
pub fn is_enabled() -> bool {
    let Ok(key) = RunKey::open(KEY_QUERY_VALUE) else {
        return false;
    };
    let wide_name = to_wide(VALUE_NAME);
    // SAFETY: RegQueryValueExW with no data buffer just checks existence.
    let status =
        unsafe { RegQueryValueExW(key.0, PCWSTR(wide_name.as_ptr()), None, None, None, None) };
    status.is_ok()
}

/// Returns `"<exe_path>" watch` for the registry value.
fn exe_command() -> Result<String> {
    let exe = std::env::current_exe()?;
    Ok(format!("\"{}\" watch", exe.display()))
}

fn set_string_value(key: &RunKey, value: &str) -> Result<()> {
    let wide_name = to_wide(VALUE_NAME);
    let wide_value = to_wide(value);
    // SAFETY: reinterpreting a &[u16] as &[u8] is safe; the layout is
    // contiguous and we compute the correct byte length.
    let bytes: &[u8] =
        unsafe { std::slice::from_raw_parts(wide_value.as_ptr().cast(), wide_value.len() * 2) };
    // SAFETY: RegSetValueExW is a standard Win32 registry API. We pass the
    // correct byte length for the wide-string value.
    let status =
        unsafe { RegSetValueExW(key.0, PCWSTR(wide_name.as_ptr()), None, REG_SZ, Some(bytes)) };
    if status.is_err() {
        return Err(Error::unavailable(format!(
            "could not write registry value: {status:?}"
        )));
    }
    Ok(())
}

fn delete_value(key: &RunKey) -> Result<()> {
    let wide_name = to_wide(VALUE_NAME);
    // SAFETY: RegDeleteValueW is a standard Win32 registry API.
    let status = unsafe { RegDeleteValueW(key.0, PCWSTR(wide_name.as_ptr())) };
    if status.is_err() && status != ERROR_FILE_NOT_FOUND {
        return Err(Error::unavailable(format!(
            "could not delete registry value: {status:?}"
        )));
    }
    Ok(())
}
