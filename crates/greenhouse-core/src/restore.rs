//! Moving windows back to their saved geometry.
//!
//! A window that has to cross to another monitor is moved twice: once
//! using the DPI of the monitor it is leaving, which lands it on the
//! destination, and again after a short pause using the DPI the window
//! reports once it is actually there. A single move with the wrong DPI
//! is off by the ratio of the two scale factors.

use std::thread;
use std::time::Duration;

use crate::desktop::Desktop;
use crate::error::{Error, Result};
use crate::geometry::{denormalize, scale_for_window};
use crate::store::PositionStore;
use crate::{Rect, WindowHandle};

/// What a successful restore did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RestoreOutcome {
    /// Source and destination monitor were the same: one move.
    SameMonitor { rect: Rect, scale: f64 },
    /// The window changed monitors: a provisional and a corrective move.
    CrossMonitor {
        provisional: Rect,
        rect: Rect,
        scale: f64,
    },
}

impl RestoreOutcome {
    /// Number of move/resize calls issued.
    pub fn moves(&self) -> usize {
        match self {
            Self::SameMonitor { .. } => 1,
            Self::CrossMonitor { .. } => 2,
        }
    }
}

/// Result of restoring every saved window.
#[derive(Debug, Default)]
pub struct RestoreReport {
    pub restored: Vec<(WindowHandle, RestoreOutcome)>,
    pub skipped: Vec<(WindowHandle, Error)>,
}

/// Moves `hwnd` back to its saved geometry.
///
/// Fails with [`Error::NotSaved`] when nothing is stored for the window
/// and [`Error::WindowGone`] when the handle is stale. On success the
/// observed scale factor is written into the in-memory record only.
pub fn restore(
    desktop: &dyn Desktop,
    store: &mut PositionStore,
    hwnd: WindowHandle,
    settle: Duration,
) -> Result<RestoreOutcome> {
    let geometry = store.geometry(hwnd).ok_or(Error::NotSaved(hwnd))?;
    if !desktop.is_window(hwnd) {
        return Err(Error::WindowGone(hwnd));
    }

    // Where the window's top-left was when saved, in device pixels.
    let target = denormalize(&geometry, geometry.dpi_scale);
    let source_monitor = desktop.monitor_from_window(hwnd);
    let target_monitor = desktop.monitor_from_point(target.x, target.y);
    let crosses = match (source_monitor, target_monitor) {
        (Ok(from), Ok(to)) => from != to,
        // Without both answers, a single move is the safe choice.
        _ => false,
    };

    let outcome = if crosses {
        let source_scale = scale_for_window(desktop, hwnd).get();
        let provisional = denormalize(&geometry, source_scale);
        desktop.move_window(hwnd, &provisional)?;

        thread::sleep(settle);

        let scale = scale_for_window(desktop, hwnd).get();
        let rect = denormalize(&geometry, scale);
        desktop.move_window(hwnd, &rect)?;
        log::info!(
            "restored 0x{hwnd:X} across monitors: {provisional:?} @ {source_scale} -> {rect:?} @ {scale}"
        );
        RestoreOutcome::CrossMonitor {
            provisional,
            rect,
            scale,
        }
    } else {
        let scale = scale_for_window(desktop, hwnd).get();
        let rect = denormalize(&geometry, scale);
        desktop.move_window(hwnd, &rect)?;
        log::info!("restored 0x{hwnd:X} to {rect:?} @ {scale}");
        RestoreOutcome::SameMonitor { rect, scale }
    };

    let scale = match outcome {
        RestoreOutcome::SameMonitor { scale, .. } | RestoreOutcome::CrossMonitor { scale, .. } => {
            scale
        }
    };
    store.update_scale(hwnd, scale);
    Ok(outcome)
}

/// Restores every saved window in key order.
///
/// A failure for one window is logged and recorded in the report; the
/// remaining windows are still attempted.
pub fn restore_all(
    desktop: &dyn Desktop,
    store: &mut PositionStore,
    settle: Duration,
) -> RestoreReport {
    let mut report = RestoreReport::default();
    for hwnd in store.handles() {
        match restore(desktop, store, hwnd, settle) {
            Ok(outcome) => report.restored.push((hwnd, outcome)),
            Err(e) => {
                log::debug!("skipping restore of 0x{hwnd:X}: {e}");
                report.skipped.push((hwnd, e));
            }
        }
    }
    log::info!(
        "restored {} windows, skipped {}",
        report.restored.len(),
        report.skipped.len()
    );
    report
}
