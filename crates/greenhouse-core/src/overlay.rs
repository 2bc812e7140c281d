//! Highlight overlays that sit on top of selected windows.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::desktop::{Desktop, OverlayBackend, OverlaySurface};
use crate::error::Result;
use crate::WindowHandle;

/// An overlay bound to one target window.
struct Overlay<S> {
    surface: S,
    visible: bool,
}

/// Owns at most one overlay per target window.
///
/// Overlays are destroyed by dropping them: removing a mapping or
/// dropping the manager releases every underlying window.
pub struct OverlayManager<B: OverlayBackend> {
    backend: B,
    overlays: HashMap<WindowHandle, Overlay<B::Surface>>,
}

impl<B: OverlayBackend> OverlayManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            overlays: HashMap::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Shows or hides the overlay for `hwnd`.
    ///
    /// Showing creates the overlay on first use and otherwise re-fits it
    /// to the window's current rectangle. Hiding keeps the overlay around
    /// so it can be shown again cheaply. Failures drop the overlay and are
    /// only logged.
    pub fn set_highlight(&mut self, desktop: &dyn Desktop, hwnd: WindowHandle, on: bool) {
        if !desktop.is_window(hwnd) {
            if self.overlays.remove(&hwnd).is_some() {
                log::debug!("dropped overlay for closed window 0x{hwnd:X}");
            }
            return;
        }

        if !on {
            if let Some(overlay) = self.overlays.get_mut(&hwnd) {
                overlay.surface.hide();
                overlay.visible = false;
            }
            return;
        }

        if let Err(e) = self.show(desktop, hwnd) {
            log::warn!("failed to highlight window 0x{hwnd:X}: {e}");
            self.overlays.remove(&hwnd);
        }
    }

    fn show(&mut self, desktop: &dyn Desktop, hwnd: WindowHandle) -> Result<()> {
        let rect = desktop.window_rect(hwnd)?;
        let monitor = desktop.monitor_from_window(hwnd)?;

        let overlay = match self.overlays.entry(hwnd) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let surface = self.backend.create(&rect)?;
                log::info!("created overlay for window 0x{hwnd:X} at {rect:?}");
                entry.insert(Overlay {
                    surface,
                    visible: false,
                })
            }
        };

        overlay.surface.place(&rect)?;
        // Some display-affinity rules leave a fresh topmost window on the
        // primary monitor; a second placement sticks.
        if overlay.surface.monitor().is_ok_and(|m| m != monitor) {
            log::warn!("overlay for 0x{hwnd:X} landed on the wrong monitor, placing again");
            overlay.surface.place(&rect)?;
        }
        overlay.visible = true;
        Ok(())
    }

    pub fn is_highlighted(&self, hwnd: WindowHandle) -> bool {
        self.overlays.get(&hwnd).is_some_and(|o| o.visible)
    }

    /// Target windows whose overlay is currently shown, sorted.
    pub fn highlighted(&self) -> Vec<WindowHandle> {
        let mut handles: Vec<_> = self
            .overlays
            .iter()
            .filter(|(_, o)| o.visible)
            .map(|(&hwnd, _)| hwnd)
            .collect();
        handles.sort_unstable();
        handles
    }

    /// Number of overlays alive, shown or hidden.
    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    /// Destroys every overlay.
    pub fn clear_all(&mut self) {
        if !self.overlays.is_empty() {
            log::debug!("destroying {} overlays", self.overlays.len());
        }
        self.overlays.clear();
    }
}
