use greenhouse_core::{RestoreOutcome, WindowHandle};

pub fn execute(hwnd: WindowHandle) {
    let mut wm = super::open_linked();
    match wm.restore_window_position(hwnd) {
        Ok(outcome) => println!("Restored 0x{hwnd:X}: {}", describe(&outcome)),
        Err(e) => super::fail(e),
    }
}

pub fn describe(outcome: &RestoreOutcome) -> String {
    match outcome {
        RestoreOutcome::SameMonitor { rect, scale } => format!(
            "({}, {}) {}x{} @ {scale:.2}",
            rect.x, rect.y, rect.width, rect.height
        ),
        RestoreOutcome::CrossMonitor { rect, scale, .. } => format!(
            "({}, {}) {}x{} @ {scale:.2}, moved across monitors",
            rect.x, rect.y, rect.width, rect.height
        ),
    }
}
