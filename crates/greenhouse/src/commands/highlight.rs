use std::thread;
use std::time::{Duration, Instant};

use greenhouse_core::{Desktop, WindowHandle};

pub fn execute(hwnd: WindowHandle, seconds: u64) {
    let mut wm = super::open();
    if !wm.desktop().is_window(hwnd) {
        super::fail(format!("window 0x{hwnd:X} does not exist"));
    }

    wm.set_highlight(hwnd, true);
    while let Some(due) = wm.next_highlight_due() {
        thread::sleep(due.saturating_duration_since(Instant::now()));
        wm.apply_due_highlights(Instant::now());
    }
    if !wm.is_highlighted(hwnd) {
        super::fail(format!("could not highlight 0x{hwnd:X}"));
    }

    println!("Highlighting 0x{hwnd:X} for {seconds}s.");
    thread::sleep(Duration::from_secs(seconds));
    wm.clear_highlights();
}
