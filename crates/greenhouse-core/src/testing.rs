//! Scripted fakes for the platform traits.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Mutex;

use crate::desktop::{Desktop, MonitorCounter, OverlayBackend, OverlaySurface, ProcessInfo};
use crate::error::{Error, Result};
use crate::{MonitorHandle, Rect, WindowHandle};

#[derive(Debug, Clone)]
pub struct FakeMonitor {
    pub area: Rect,
    pub dpi: u32,
}

impl FakeMonitor {
    pub fn new(area: Rect, dpi: u32) -> Self {
        Self { area, dpi }
    }
}

#[derive(Debug, Clone)]
pub struct FakeWindow {
    pub hwnd: WindowHandle,
    pub title: String,
    pub class: String,
    pub process: Option<ProcessInfo>,
    pub rect: Rect,
    pub visible: bool,
    pub minimized: bool,
}

impl FakeWindow {
    pub fn new(hwnd: WindowHandle, title: &str, rect: Rect) -> Self {
        Self {
            hwnd,
            title: title.into(),
            class: String::new(),
            process: None,
            rect,
            visible: true,
            minimized: false,
        }
    }

    pub fn class(mut self, class: &str) -> Self {
        self.class = class.into();
        self
    }

    pub fn process(mut self, name: &str, path: &str) -> Self {
        self.process = Some(ProcessInfo {
            name: name.into(),
            path: path.into(),
        });
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn minimized(mut self) -> Self {
        self.minimized = true;
        self
    }
}

/// An in-memory desktop. Monitor handles are `index + 1`.
///
/// A window belongs to the monitor containing its center, like the
/// "largest intersection" rule Win32 applies for ordinary layouts.
pub struct FakeDesktop {
    monitors: Vec<FakeMonitor>,
    windows: RefCell<Vec<FakeWindow>>,
    moves: RefCell<Vec<(WindowHandle, Rect)>>,
}

pub fn single_monitor(windows: Vec<FakeWindow>) -> FakeDesktop {
    FakeDesktop::new(vec![FakeMonitor::new(Rect::new(0, 0, 1920, 1080), 96)]).with(windows)
}

impl FakeDesktop {
    pub fn new(monitors: Vec<FakeMonitor>) -> Self {
        Self {
            monitors,
            windows: RefCell::new(Vec::new()),
            moves: RefCell::new(Vec::new()),
        }
    }

    pub fn with(self, windows: Vec<FakeWindow>) -> Self {
        *self.windows.borrow_mut() = windows;
        self
    }

    pub fn open(&self, window: FakeWindow) {
        self.windows.borrow_mut().push(window);
    }

    pub fn close(&self, hwnd: WindowHandle) {
        self.windows.borrow_mut().retain(|w| w.hwnd != hwnd);
    }

    /// Every `move_window` call so far, in order.
    pub fn moves(&self) -> Vec<(WindowHandle, Rect)> {
        self.moves.borrow().clone()
    }

    pub fn rect_of(&self, hwnd: WindowHandle) -> Option<Rect> {
        self.window(hwnd).ok().map(|w| w.rect)
    }

    pub fn monitor_areas(&self) -> Vec<Rect> {
        self.monitors.iter().map(|m| m.area).collect()
    }

    fn window(&self, hwnd: WindowHandle) -> Result<FakeWindow> {
        self.windows
            .borrow()
            .iter()
            .find(|w| w.hwnd == hwnd)
            .cloned()
            .ok_or(Error::WindowGone(hwnd))
    }

    fn monitor_index(&self, x: i32, y: i32) -> Result<usize> {
        monitor_at(&self.monitor_areas(), x, y)
    }
}

fn monitor_at(areas: &[Rect], x: i32, y: i32) -> Result<usize> {
    areas
        .iter()
        .position(|area| area.contains(x, y))
        .ok_or_else(|| Error::unavailable(format!("no monitor at ({x}, {y})")))
}

fn center(rect: &Rect) -> (i32, i32) {
    (rect.x + rect.width / 2, rect.y + rect.height / 2)
}

impl Desktop for FakeDesktop {
    fn top_level_windows(&self) -> Result<Vec<WindowHandle>> {
        Ok(self.windows.borrow().iter().map(|w| w.hwnd).collect())
    }

    fn is_window(&self, hwnd: WindowHandle) -> bool {
        self.window(hwnd).is_ok()
    }

    fn is_visible(&self, hwnd: WindowHandle) -> bool {
        self.window(hwnd).is_ok_and(|w| w.visible)
    }

    fn is_minimized(&self, hwnd: WindowHandle) -> bool {
        self.window(hwnd).is_ok_and(|w| w.minimized)
    }

    fn title(&self, hwnd: WindowHandle) -> Result<String> {
        Ok(self.window(hwnd)?.title)
    }

    fn class_name(&self, hwnd: WindowHandle) -> Result<String> {
        Ok(self.window(hwnd)?.class)
    }

    fn process_info(&self, hwnd: WindowHandle) -> Result<ProcessInfo> {
        self.window(hwnd)?
            .process
            .ok_or_else(|| Error::unavailable("access denied"))
    }

    fn window_rect(&self, hwnd: WindowHandle) -> Result<Rect> {
        Ok(self.window(hwnd)?.rect)
    }

    fn move_window(&self, hwnd: WindowHandle, rect: &Rect) -> Result<()> {
        let mut windows = self.windows.borrow_mut();
        let window = windows
            .iter_mut()
            .find(|w| w.hwnd == hwnd)
            .ok_or(Error::WindowGone(hwnd))?;
        window.rect = *rect;
        self.moves.borrow_mut().push((hwnd, *rect));
        Ok(())
    }

    fn monitor_from_window(&self, hwnd: WindowHandle) -> Result<MonitorHandle> {
        let (x, y) = center(&self.window(hwnd)?.rect);
        Ok(self.monitor_index(x, y)? + 1)
    }

    fn monitor_from_point(&self, x: i32, y: i32) -> Result<MonitorHandle> {
        Ok(self.monitor_index(x, y)? + 1)
    }

    fn dpi_for_window(&self, hwnd: WindowHandle) -> Result<u32> {
        let monitor = self.monitor_from_window(hwnd)?;
        self.dpi_for_monitor(monitor)
    }

    fn dpi_for_monitor(&self, monitor: MonitorHandle) -> Result<u32> {
        monitor
            .checked_sub(1)
            .and_then(|i| self.monitors.get(i))
            .map(|m| m.dpi)
            .ok_or_else(|| Error::unavailable("bad monitor handle"))
    }
}

/// Replays a fixed list of monitor counts, then fails.
pub struct ScriptedCounter {
    counts: Mutex<VecDeque<usize>>,
}

impl ScriptedCounter {
    pub fn new(counts: &[usize]) -> Self {
        Self {
            counts: Mutex::new(counts.iter().copied().collect()),
        }
    }
}

impl MonitorCounter for ScriptedCounter {
    fn monitor_count(&self) -> Result<usize> {
        self.counts
            .lock()
            .map_err(|_| Error::unavailable("poisoned"))?
            .pop_front()
            .ok_or_else(|| Error::unavailable("script exhausted"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OverlayCall {
    Create(usize, Rect),
    Place(usize, Rect),
    Hide(usize),
    Destroy(usize),
}

/// Records every overlay operation in a shared log.
#[derive(Default)]
pub struct FakeOverlayBackend {
    pub calls: Rc<RefCell<Vec<OverlayCall>>>,
    monitor_areas: Vec<Rect>,
    next_id: Cell<usize>,
    fail_create: Cell<bool>,
    /// Number of upcoming `monitor()` answers that report a bogus monitor.
    misplaced_answers: Rc<Cell<usize>>,
}

impl FakeOverlayBackend {
    pub fn new(monitor_areas: Vec<Rect>) -> Self {
        Self {
            monitor_areas,
            ..Self::default()
        }
    }

    pub fn fail_create(&self, fail: bool) {
        self.fail_create.set(fail);
    }

    pub fn misplace_next(&self, answers: usize) {
        self.misplaced_answers.set(answers);
    }

    pub fn calls(&self) -> Vec<OverlayCall> {
        self.calls.borrow().clone()
    }
}

pub struct FakeSurface {
    id: usize,
    calls: Rc<RefCell<Vec<OverlayCall>>>,
    monitor_areas: Vec<Rect>,
    placed: Cell<Option<Rect>>,
    misplaced_answers: Rc<Cell<usize>>,
}

impl OverlayBackend for FakeOverlayBackend {
    type Surface = FakeSurface;

    fn create(&self, rect: &Rect) -> Result<FakeSurface> {
        if self.fail_create.get() {
            return Err(Error::unavailable("CreateWindowExW failed"));
        }
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.calls.borrow_mut().push(OverlayCall::Create(id, *rect));
        Ok(FakeSurface {
            id,
            calls: Rc::clone(&self.calls),
            monitor_areas: self.monitor_areas.clone(),
            placed: Cell::new(None),
            misplaced_answers: Rc::clone(&self.misplaced_answers),
        })
    }
}

impl OverlaySurface for FakeSurface {
    fn place(&self, rect: &Rect) -> Result<()> {
        self.placed.set(Some(*rect));
        self.calls.borrow_mut().push(OverlayCall::Place(self.id, *rect));
        Ok(())
    }

    fn hide(&self) {
        self.calls.borrow_mut().push(OverlayCall::Hide(self.id));
    }

    fn monitor(&self) -> Result<MonitorHandle> {
        let remaining = self.misplaced_answers.get();
        if remaining > 0 {
            self.misplaced_answers.set(remaining - 1);
            return Ok(usize::MAX);
        }
        let rect = self
            .placed
            .get()
            .ok_or_else(|| Error::unavailable("not placed"))?;
        let (x, y) = center(&rect);
        Ok(monitor_at(&self.monitor_areas, x, y)? + 1)
    }
}

impl Drop for FakeSurface {
    fn drop(&mut self) {
        self.calls.borrow_mut().push(OverlayCall::Destroy(self.id));
    }
}
