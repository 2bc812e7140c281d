//! The long-lived object a front end talks to.
//!
//! `WindowManager` owns the position store, the overlays, the highlight
//! debouncer and the topology thread handle. It runs on the thread that
//! owns the windows; the topology thread only ever talks to it through the
//! event channel returned by [`WindowManager::start_topology_monitor`].

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::time::Instant;

use crate::config::Config;
use crate::debounce::HighlightDebouncer;
use crate::desktop::{Desktop, MonitorCounter, OverlayBackend};
use crate::error::{Error, Result};
use crate::geometry::{NormalizedGeometry, normalize, scale_for_window};
use crate::matcher::{self, WindowSummary};
use crate::overlay::OverlayManager;
use crate::restore::{self, RestoreOutcome, RestoreReport};
use crate::store::{PositionStore, WindowRecord, parse_handle};
use crate::topology::{TopologyEvent, TopologyMonitor};
use crate::WindowHandle;

/// A saved record and whether its key names a live window right now.
#[derive(Debug, Clone)]
pub struct SavedWindow {
    pub key: String,
    pub record: WindowRecord,
    pub running: bool,
}

/// What happened during [`WindowManager::startup`].
#[derive(Debug, Default)]
pub struct StartupReport {
    pub relinked: Vec<WindowHandle>,
    /// Present when the user asked for saved windows to be restored at
    /// startup.
    pub restored: Option<RestoreReport>,
}

pub struct WindowManager<D: Desktop, B: OverlayBackend> {
    desktop: D,
    store: PositionStore,
    overlays: OverlayManager<B>,
    debouncer: HighlightDebouncer,
    config: Config,
    saved_count: Arc<AtomicUsize>,
    topology: Option<TopologyMonitor>,
}

impl<D: Desktop, B: OverlayBackend> WindowManager<D, B> {
    pub fn new(desktop: D, backend: B, store: PositionStore, config: Config) -> Self {
        log::info!(
            "loaded {} saved windows from {}",
            store.len(),
            store.path().display()
        );
        let saved_count = Arc::new(AtomicUsize::new(store.len()));
        Self {
            desktop,
            store,
            overlays: OverlayManager::new(backend),
            debouncer: HighlightDebouncer::new(config.highlight.debounce()),
            config,
            saved_count,
            topology: None,
        }
    }

    pub fn desktop(&self) -> &D {
        &self.desktop
    }

    pub fn store(&self) -> &PositionStore {
        &self.store
    }

    pub fn overlays(&self) -> &OverlayManager<B> {
        &self.overlays
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Relinks saved records to live windows and, when enabled, restores
    /// every saved window once.
    pub fn startup(&mut self) -> StartupReport {
        let relinked = self.relink_saved_windows();
        let restored = self
            .store
            .settings()
            .start_with_windows
            .then(|| self.restore_all());
        StartupReport { relinked, restored }
    }

    /// Resolves every saved record through its identity and re-keys
    /// matches under the live handle. Unmatched records keep their key.
    pub fn relink_saved_windows(&mut self) -> Vec<WindowHandle> {
        self.relink_where(|_, _| true)
    }

    /// Relinks records whose key no longer names a live window but whose
    /// identity matches one that has (re)appeared.
    ///
    /// Restores the relinked windows when `restore_returning_windows` is
    /// set; otherwise the caller decides what to do with them.
    pub fn scan_for_returning_windows(&mut self) -> Vec<WindowHandle> {
        let returned = self.relink_where(|desktop, key| {
            parse_handle(key).map_or(true, |hwnd| !desktop.is_window(hwnd))
        });

        if self.config.restore.restore_returning_windows {
            for &hwnd in &returned {
                if let Err(e) = self.restore_window_position(hwnd) {
                    log::warn!("failed to restore returning window 0x{hwnd:X}: {e}");
                }
            }
        }
        returned
    }

    fn relink_where(&mut self, wanted: impl Fn(&dyn Desktop, &str) -> bool) -> Vec<WindowHandle> {
        let tie_break = self.config.matching.tie_break;
        let candidates: Vec<(String, WindowRecord)> = self
            .store
            .records()
            .iter()
            .filter(|(key, _)| wanted(&self.desktop, key))
            .map(|(key, record)| (key.clone(), record.clone()))
            .collect();

        let mut linked = Vec::new();
        for (key, record) in candidates {
            let Some(hwnd) = matcher::find_matching_window(&self.desktop, &record.info, tie_break)
            else {
                log::debug!("no live window for saved {:?} ({key})", record.info.title);
                continue;
            };
            if self.store.relink(&key, hwnd) {
                log::info!("relinked saved {:?} from {key} to 0x{hwnd:X}", record.info.title);
                linked.push(hwnd);
            } else {
                log::debug!("0x{hwnd:X} already holds another record, {key} left as is");
            }
        }
        linked
    }

    /// Every visible, non-minimized, titled window.
    pub fn enumerate_interesting_windows(&self) -> Vec<WindowSummary> {
        matcher::interesting_windows(&self.desktop)
    }

    /// Saved records in key order, flagged with whether they are running.
    pub fn saved_windows(&self) -> Vec<SavedWindow> {
        self.store
            .records()
            .iter()
            .map(|(key, record)| SavedWindow {
                key: key.clone(),
                record: record.clone(),
                running: parse_handle(key).is_ok_and(|hwnd| self.desktop.is_window(hwnd)),
            })
            .collect()
    }

    /// Captures the current geometry and identity of `hwnd` and persists
    /// them.
    pub fn save_window_position(&mut self, hwnd: WindowHandle) -> Result<NormalizedGeometry> {
        if !self.desktop.is_window(hwnd) {
            return Err(Error::WindowGone(hwnd));
        }
        let rect = self.desktop.window_rect(hwnd)?;
        let scale = scale_for_window(&self.desktop, hwnd);
        if scale.is_fallback() {
            log::warn!("no DPI for 0x{hwnd:X}, saving at scale 1.0");
        }
        let info = matcher::identify(&self.desktop, hwnd)?;
        let position = normalize(&rect, scale.get());

        self.store.record_save(hwnd, info, position)?;
        self.sync_saved_count();
        Ok(position)
    }

    /// Deletes the saved record for `hwnd`. Returns whether one existed.
    pub fn forget_window(&mut self, hwnd: WindowHandle) -> Result<bool> {
        let removed = self.store.record_remove(hwnd)?;
        self.sync_saved_count();
        Ok(removed)
    }

    pub fn restore_window_position(&mut self, hwnd: WindowHandle) -> Result<RestoreOutcome> {
        restore::restore(
            &self.desktop,
            &mut self.store,
            hwnd,
            self.config.restore.settle(),
        )
    }

    /// Restores every saved window, then rebuilds the overlays of the
    /// windows that were highlighted, since their rectangles moved.
    pub fn restore_all(&mut self) -> RestoreReport {
        let report = restore::restore_all(&self.desktop, &mut self.store, self.config.restore.settle());

        let highlighted = self.overlays.highlighted();
        self.overlays.clear_all();
        for hwnd in highlighted {
            self.overlays.set_highlight(&self.desktop, hwnd, true);
        }
        report
    }

    /// Requests a highlight change, applied once the debounce window
    /// passes without another request for the same window.
    pub fn set_highlight(&mut self, hwnd: WindowHandle, on: bool) {
        self.request_highlight(hwnd, on, Instant::now());
    }

    pub fn request_highlight(&mut self, hwnd: WindowHandle, on: bool, now: Instant) {
        self.debouncer.request(hwnd, on, now);
    }

    /// Applies every highlight request that is due. Returns how many.
    pub fn apply_due_highlights(&mut self, now: Instant) -> usize {
        let due = self.debouncer.take_due(now);
        for &(hwnd, on) in &due {
            self.overlays.set_highlight(&self.desktop, hwnd, on);
        }
        due.len()
    }

    /// When the next pending highlight request becomes due.
    pub fn next_highlight_due(&self) -> Option<Instant> {
        self.debouncer.next_due()
    }

    pub fn is_highlighted(&self, hwnd: WindowHandle) -> bool {
        self.overlays.is_highlighted(hwnd)
    }

    /// Drops pending requests and destroys every overlay.
    pub fn clear_highlights(&mut self) {
        self.debouncer.clear();
        self.overlays.clear_all();
    }

    /// Starts polling the monitor count on a background thread.
    ///
    /// The returned receiver yields an event for each 1 → 2 transition
    /// that happens while at least one position is saved. A running
    /// monitor is stopped first.
    pub fn start_topology_monitor<C: MonitorCounter>(&mut self, counter: C) -> Receiver<TopologyEvent> {
        self.stop_topology_monitor();

        let (tx, rx) = mpsc::channel();
        let saved = self.saved_count.clone();
        self.topology = Some(TopologyMonitor::start(
            counter,
            self.config.topology.poll_interval(),
            self.config.topology.stop_timeout(),
            move || saved.load(Ordering::Relaxed) > 0,
            tx,
        ));
        rx
    }

    /// Stops the polling thread. Returns `false` if it had to be detached.
    pub fn stop_topology_monitor(&mut self) -> bool {
        match self.topology.take() {
            Some(mut monitor) => monitor.stop(),
            None => true,
        }
    }

    pub fn is_topology_monitor_running(&self) -> bool {
        self.topology.as_ref().is_some_and(TopologyMonitor::is_running)
    }

    /// Reacts to an event received from the topology channel.
    pub fn handle_topology_event(&mut self, event: TopologyEvent) -> RestoreReport {
        match event {
            TopologyEvent::MonitorsReconnected => {
                log::info!("monitors reconnected, restoring saved windows");
                self.restore_all()
            }
        }
    }

    /// Flips the start-with-Windows setting and persists it.
    pub fn set_start_with_windows(&mut self, enabled: bool) -> Result<()> {
        self.store.set_start_with_windows(enabled)
    }

    /// Writes the store, including scale factors refreshed by restores.
    pub fn save(&self) -> Result<()> {
        self.store.save()
    }

    /// Stops the topology thread and destroys every overlay.
    pub fn shutdown(&mut self) {
        self.stop_topology_monitor();
        self.clear_highlights();
    }

    fn sync_saved_count(&self) {
        self.saved_count.store(self.store.len(), Ordering::Relaxed);
    }
}

impl<D: Desktop, B: OverlayBackend> Drop for WindowManager<D, B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::Rect;
    use crate::identity::WindowIdentity;
    use crate::testing::{
        FakeDesktop, FakeOverlayBackend, FakeWindow, OverlayCall, ScriptedCounter, single_monitor,
    };

    type Manager = WindowManager<FakeDesktop, FakeOverlayBackend>;

    fn notepad(hwnd: WindowHandle, rect: Rect) -> FakeWindow {
        FakeWindow::new(hwnd, "notes.txt - Notepad", rect)
            .class("Notepad")
            .process("notepad.exe", r"C:\Windows\notepad.exe")
    }

    fn manager(dir: &tempfile::TempDir, desktop: FakeDesktop) -> Manager {
        let mut config = Config::default();
        config.restore.settle_ms = 0;
        config.topology.poll_interval_ms = 1;
        let backend = FakeOverlayBackend::new(desktop.monitor_areas());
        let store = PositionStore::open(dir.path().join("saved_positions.json"));
        WindowManager::new(desktop, backend, store, config)
    }

    #[test]
    fn save_then_restore_returns_window_to_saved_rect() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let mut wm = manager(&dir, single_monitor(vec![notepad(5, Rect::new(100, 100, 800, 600))]));
        wm.save_window_position(5).unwrap();
        wm.desktop().close(5);
        wm.desktop().open(notepad(5, Rect::new(700, 300, 400, 300)));

        // Act
        let outcome = wm.restore_window_position(5).unwrap();

        // Assert
        assert_eq!(outcome.moves(), 1);
        assert_eq!(wm.desktop().rect_of(5), Some(Rect::new(100, 100, 800, 600)));
    }

    #[test]
    fn saving_a_closed_window_stores_nothing() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let mut wm = manager(&dir, single_monitor(vec![]));

        // Act
        let result = wm.save_window_position(5);

        // Assert
        assert!(matches!(result, Err(Error::WindowGone(5))));
        assert!(wm.store().is_empty());
    }

    #[test]
    fn saving_an_unidentifiable_window_fails() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let mut wm = manager(
            &dir,
            single_monitor(vec![FakeWindow::new(5, "Orphan", Rect::new(0, 0, 10, 10))]),
        );

        // Act
        let result = wm.save_window_position(5);

        // Assert
        assert!(matches!(result, Err(Error::Unidentifiable(5))));
        assert!(wm.store().is_empty());
    }

    #[test]
    fn startup_relinks_records_saved_under_old_handles() {
        // Arrange: a record from a previous session under handle 111.
        let dir = tempfile::tempdir().unwrap();
        let mut previous = PositionStore::open(dir.path().join("saved_positions.json"));
        let info = WindowIdentity {
            title: "notes.txt - Notepad".into(),
            process_name: "notepad.exe".into(),
            process_path: r"C:\Windows\notepad.exe".into(),
            class_name: "Notepad".into(),
        };
        previous
            .record_save(111, info, normalize(&Rect::new(10, 20, 300, 200), 1.0))
            .unwrap();
        let mut wm = manager(&dir, single_monitor(vec![notepad(42, Rect::new(0, 0, 640, 480))]));

        // Act
        let report = wm.startup();

        // Assert
        assert_eq!(report.relinked, vec![42]);
        assert!(report.restored.is_none());
        assert!(wm.store().get(42).is_some());
        assert!(wm.store().get(111).is_none());
        assert!(wm.desktop().moves().is_empty());
    }

    #[test]
    fn startup_restores_when_start_with_windows_is_set() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        {
            let mut wm = manager(&dir, single_monitor(vec![notepad(5, Rect::new(50, 50, 500, 400))]));
            wm.save_window_position(5).unwrap();
            wm.set_start_with_windows(true).unwrap();
        }
        let mut wm = manager(&dir, single_monitor(vec![notepad(9, Rect::new(600, 400, 300, 300))]));

        // Act
        let report = wm.startup();

        // Assert
        let restored = report.restored.unwrap();
        assert_eq!(restored.restored.len(), 1);
        assert_eq!(wm.desktop().rect_of(9), Some(Rect::new(50, 50, 500, 400)));
    }

    #[test]
    fn returning_window_is_relinked_by_the_scan() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let mut wm = manager(&dir, single_monitor(vec![notepad(5, Rect::new(0, 0, 640, 480))]));
        wm.save_window_position(5).unwrap();
        wm.desktop().close(5);
        assert!(wm.scan_for_returning_windows().is_empty());

        // Act
        wm.desktop().open(notepad(9, Rect::new(0, 0, 200, 200)));
        let returned = wm.scan_for_returning_windows();

        // Assert
        assert_eq!(returned, vec![9]);
        assert!(wm.saved_windows().iter().all(|w| w.running));
        assert!(wm.desktop().moves().is_empty());
    }

    #[test]
    fn saved_windows_reports_running_state() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let mut wm = manager(
            &dir,
            single_monitor(vec![
                notepad(5, Rect::new(0, 0, 640, 480)),
                notepad(6, Rect::new(0, 0, 640, 480)).class("Other"),
            ]),
        );
        wm.save_window_position(5).unwrap();
        wm.save_window_position(6).unwrap();
        wm.desktop().close(6);

        // Act
        let saved = wm.saved_windows();

        // Assert
        let running: Vec<_> = saved.iter().map(|w| (w.key.as_str(), w.running)).collect();
        assert_eq!(running, vec![("5", true), ("6", false)]);
    }

    #[test]
    fn forget_removes_the_record_from_disk() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let mut wm = manager(&dir, single_monitor(vec![notepad(5, Rect::new(0, 0, 640, 480))]));
        wm.save_window_position(5).unwrap();

        // Act
        let removed = wm.forget_window(5).unwrap();

        // Assert
        assert!(removed);
        assert!(!wm.forget_window(5).unwrap());
        assert!(crate::store::load(wm.store().path()).windows.is_empty());
    }

    #[test]
    fn select_then_deselect_inside_debounce_window_touches_no_overlay() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let mut wm = manager(&dir, single_monitor(vec![notepad(5, Rect::new(0, 0, 640, 480))]));
        let start = Instant::now();

        // Act
        wm.request_highlight(5, true, start);
        wm.request_highlight(5, false, start + Duration::from_millis(50));
        let early = wm.apply_due_highlights(start + Duration::from_millis(200));
        let late = wm.apply_due_highlights(start + Duration::from_millis(250));

        // Assert
        assert_eq!((early, late), (0, 1));
        assert!(!wm.is_highlighted(5));
        assert!(wm.overlays().backend().calls().is_empty());
    }

    #[test]
    fn rapid_selects_create_a_single_overlay() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let mut wm = manager(&dir, single_monitor(vec![notepad(5, Rect::new(0, 0, 640, 480))]));
        let start = Instant::now();

        // Act
        for i in 0..5 {
            wm.request_highlight(5, true, start + Duration::from_millis(i * 10));
        }
        wm.apply_due_highlights(start + Duration::from_secs(1));

        // Assert
        assert!(wm.is_highlighted(5));
        assert_eq!(
            wm.overlays().backend().calls(),
            vec![
                OverlayCall::Create(1, Rect::new(0, 0, 640, 480)),
                OverlayCall::Place(1, Rect::new(0, 0, 640, 480)),
            ]
        );
    }

    #[test]
    fn restore_all_rebuilds_highlighted_overlays() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let mut wm = manager(&dir, single_monitor(vec![notepad(5, Rect::new(100, 100, 640, 480))]));
        wm.save_window_position(5).unwrap();
        wm.request_highlight(5, true, Instant::now());
        wm.apply_due_highlights(Instant::now() + Duration::from_secs(1));

        // Act
        let report = wm.restore_all();

        // Assert
        assert_eq!(report.restored.len(), 1);
        let calls = wm.overlays().backend().calls();
        assert!(calls.contains(&OverlayCall::Destroy(1)));
        assert!(calls.contains(&OverlayCall::Create(2, Rect::new(100, 100, 640, 480))));
        assert!(wm.is_highlighted(5));
    }

    #[test]
    fn reconnect_event_requires_a_saved_position() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let mut wm = manager(&dir, single_monitor(vec![notepad(5, Rect::new(0, 0, 640, 480))]));

        // Act: nothing saved yet.
        let rx = wm.start_topology_monitor(ScriptedCounter::new(&[1, 2]));
        let without = rx.iter().count();
        wm.save_window_position(5).unwrap();
        let rx = wm.start_topology_monitor(ScriptedCounter::new(&[1, 2]));
        let with: Vec<_> = rx.iter().collect();

        // Assert
        assert_eq!(without, 0);
        assert_eq!(with, vec![TopologyEvent::MonitorsReconnected]);
        assert!(wm.stop_topology_monitor());
    }

    #[test]
    fn reconnect_event_restores_saved_windows() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let mut wm = manager(&dir, single_monitor(vec![notepad(5, Rect::new(0, 0, 640, 480))]));
        wm.save_window_position(5).unwrap();

        // Act
        let report = wm.handle_topology_event(TopologyEvent::MonitorsReconnected);

        // Assert
        assert_eq!(report.restored.len(), 1);
        assert_eq!(wm.desktop().moves(), vec![(5, Rect::new(0, 0, 640, 480))]);
    }

    #[test]
    fn shutdown_destroys_overlays() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let mut wm = manager(&dir, single_monitor(vec![notepad(5, Rect::new(0, 0, 640, 480))]));
        wm.request_highlight(5, true, Instant::now());
        wm.apply_due_highlights(Instant::now() + Duration::from_secs(1));

        // Act
        wm.shutdown();

        // Assert
        assert!(wm.overlays().is_empty());
        assert_eq!(wm.overlays().backend().calls().last(), Some(&OverlayCall::Destroy(1)));
    }
}
