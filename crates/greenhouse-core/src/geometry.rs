//! DPI-independent window geometry.
//!
//! Rectangles are stored as if the window sat on a 96 DPI monitor. The
//! stored values are the device-pixel values divided by the scale factor
//! at capture time; restoring multiplies by whatever scale factor the
//! destination monitor has *now*. Both directions truncate toward zero,
//! so a round trip can lose a pixel when the values don't divide evenly.

use serde::{Deserialize, Serialize};

use crate::desktop::Desktop;
use crate::error::Resolved;
use crate::{Rect, WindowHandle};

/// DPI of a monitor at 100% scaling.
pub const REFERENCE_DPI: u32 = 96;

/// Scale factor used whenever the real one can't be determined.
pub const FALLBACK_SCALE: f64 = 1.0;

/// A window rectangle normalized to [`REFERENCE_DPI`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedGeometry {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
    /// Scale factor in effect when the geometry was last observed.
    ///
    /// Informational: restores always query the live monitor instead.
    pub dpi_scale: f64,
}

/// Converts a device-pixel rectangle to normalized units.
pub fn normalize(rect: &Rect, scale: f64) -> NormalizedGeometry {
    let scale = sanitize(scale);
    NormalizedGeometry {
        left: divide(rect.x, scale),
        top: divide(rect.y, scale),
        width: divide(rect.width, scale),
        height: divide(rect.height, scale),
        dpi_scale: scale,
    }
}

/// Converts normalized geometry back to device pixels for `scale`.
pub fn denormalize(geometry: &NormalizedGeometry, scale: f64) -> Rect {
    let scale = sanitize(scale);
    Rect::new(
        multiply(geometry.left, scale),
        multiply(geometry.top, scale),
        multiply(geometry.width, scale),
        multiply(geometry.height, scale),
    )
}

/// Converts a raw DPI value to a scale factor relative to 96 DPI.
///
/// Returns `None` for a zero DPI, which Win32 uses to signal failure.
pub fn scale_from_dpi(dpi: u32) -> Option<f64> {
    (dpi > 0).then(|| f64::from(dpi) / f64::from(REFERENCE_DPI))
}

/// Resolves the scale factor of the monitor that owns `hwnd`.
///
/// Never fails: any error yields [`FALLBACK_SCALE`].
pub fn scale_for_window(desktop: &dyn Desktop, hwnd: WindowHandle) -> Resolved<f64> {
    match desktop.dpi_for_window(hwnd).map(scale_from_dpi) {
        Ok(Some(scale)) => Resolved::Value(scale),
        Ok(None) => {
            log::debug!("DPI query for window 0x{hwnd:X} returned 0, using 1.0");
            Resolved::Fallback(FALLBACK_SCALE)
        }
        Err(e) => {
            log::debug!("DPI query for window 0x{hwnd:X} failed ({e}), using 1.0");
            Resolved::Fallback(FALLBACK_SCALE)
        }
    }
}

/// Resolves the scale factor of the monitor under a screen point.
///
/// Used before a window exists at the location. Never fails.
pub fn scale_for_point(desktop: &dyn Desktop, x: i32, y: i32) -> Resolved<f64> {
    let dpi = desktop
        .monitor_from_point(x, y)
        .and_then(|monitor| desktop.dpi_for_monitor(monitor));
    match dpi.map(scale_from_dpi) {
        Ok(Some(scale)) => Resolved::Value(scale),
        Ok(None) | Err(_) => {
            log::debug!("DPI query for point ({x}, {y}) failed, using 1.0");
            Resolved::Fallback(FALLBACK_SCALE)
        }
    }
}

/// Guards against zero, negative, or non-finite scale factors.
fn sanitize(scale: f64) -> f64 {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        FALLBACK_SCALE
    }
}

fn divide(value: i32, scale: f64) -> i32 {
    // `as` truncates toward zero, which is the storage contract.
    (f64::from(value) / scale) as i32
}

fn multiply(value: i32, scale: f64) -> i32 {
    (f64::from(value) * scale) as i32
}
