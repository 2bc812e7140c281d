use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::WindowHandle;

/// Collapses rapid highlight toggles per window.
///
/// Each request replaces any pending one for the same window and pushes
/// its deadline out by the debounce window. Only the last requested state
/// is ever handed out, so dragging a selection across a list does not
/// create and destroy an overlay for every row it passes.
#[derive(Debug)]
pub struct HighlightDebouncer {
    window: Duration,
    pending: HashMap<WindowHandle, Pending>,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    on: bool,
    due: Instant,
}

impl HighlightDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: HashMap::new(),
        }
    }

    /// Schedules `on` for `hwnd`, superseding any earlier request.
    pub fn request(&mut self, hwnd: WindowHandle, on: bool, now: Instant) {
        let due = now + self.window;
        self.pending.insert(hwnd, Pending { on, due });
    }

    /// Removes and returns every request whose deadline has passed,
    /// ordered by window handle.
    pub fn take_due(&mut self, now: Instant) -> Vec<(WindowHandle, bool)> {
        let mut due: Vec<_> = self
            .pending
            .iter()
            .filter(|(_, p)| p.due <= now)
            .map(|(&hwnd, p)| (hwnd, p.on))
            .collect();
        for (hwnd, _) in &due {
            self.pending.remove(hwnd);
        }
        due.sort_unstable_by_key(|&(hwnd, _)| hwnd);
        due
    }

    /// Earliest pending deadline, for sizing the caller's wait.
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.due).min()
    }

    pub fn is_pending(&self, hwnd: WindowHandle) -> bool {
        self.pending.contains_key(&hwnd)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
