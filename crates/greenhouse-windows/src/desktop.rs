use greenhouse_core::{
    Desktop, MonitorCounter, MonitorHandle, ProcessInfo, Rect, Result, WindowHandle,
};

use crate::window::Window;
use crate::{enumerate, monitor, process};

/// The live Win32 desktop.
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32Desktop;

impl Desktop for Win32Desktop {
    fn top_level_windows(&self) -> Result<Vec<WindowHandle>> {
        enumerate::top_level_windows()
    }

    fn is_window(&self, hwnd: WindowHandle) -> bool {
        Window::from_raw(hwnd).exists()
    }

    fn is_visible(&self, hwnd: WindowHandle) -> bool {
        Window::from_raw(hwnd).is_visible()
    }

    fn is_minimized(&self, hwnd: WindowHandle) -> bool {
        Window::from_raw(hwnd).is_minimized()
    }

    fn title(&self, hwnd: WindowHandle) -> Result<String> {
        Window::from_raw(hwnd).title()
    }

    fn class_name(&self, hwnd: WindowHandle) -> Result<String> {
        Window::from_raw(hwnd).class()
    }

    fn process_info(&self, hwnd: WindowHandle) -> Result<ProcessInfo> {
        process::process_info(hwnd)
    }

    fn window_rect(&self, hwnd: WindowHandle) -> Result<Rect> {
        Window::from_raw(hwnd).rect()
    }

    fn move_window(&self, hwnd: WindowHandle, rect: &Rect) -> Result<()> {
        Window::from_raw(hwnd).set_rect(rect)
    }

    fn monitor_from_window(&self, hwnd: WindowHandle) -> Result<MonitorHandle> {
        monitor::monitor_from_window(hwnd)
    }

    fn monitor_from_point(&self, x: i32, y: i32) -> Result<MonitorHandle> {
        monitor::monitor_from_point(x, y)
    }

    fn dpi_for_window(&self, hwnd: WindowHandle) -> Result<u32> {
        monitor::dpi_for_window(hwnd)
    }

    fn dpi_for_monitor(&self, monitor: MonitorHandle) -> Result<u32> {
        monitor::dpi_for_monitor(monitor)
    }
}

/// Counts monitors from the topology polling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32MonitorCounter;

impl MonitorCounter for Win32MonitorCounter {
    fn monitor_count(&self) -> Result<usize> {
        monitor::monitor_count()
    }
}
