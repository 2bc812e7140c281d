//! Re-finding saved windows among the currently open ones.

use serde::{Deserialize, Serialize};

use crate::desktop::Desktop;
use crate::error::{Error, Result};
use crate::identity::WindowIdentity;
use crate::WindowHandle;

/// How to choose between several live windows with the same identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// Take whichever window the OS enumerates first.
    #[default]
    First,
    /// Take the numerically lowest handle, stable across enumerations.
    LowestHandle,
}

/// A window worth showing to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSummary {
    pub hwnd: WindowHandle,
    pub title: String,
    pub process_name: String,
}

/// Returns whether a window is worth tracking: visible, not minimized,
/// and titled. Any failed query counts as "not interesting".
pub fn is_interesting(desktop: &dyn Desktop, hwnd: WindowHandle) -> bool {
    if !desktop.is_visible(hwnd) || desktop.is_minimized(hwnd) {
        return false;
    }
    desktop.title(hwnd).is_ok_and(|t| !t.is_empty())
}

/// Builds the current identity descriptor for a window.
pub fn identify(desktop: &dyn Desktop, hwnd: WindowHandle) -> Result<WindowIdentity> {
    let unidentifiable = |_| Error::Unidentifiable(hwnd);
    let title = desktop.title(hwnd).map_err(unidentifiable)?;
    let class_name = desktop.class_name(hwnd).map_err(unidentifiable)?;
    let process = desktop.process_info(hwnd).map_err(unidentifiable)?;
    Ok(WindowIdentity {
        title,
        process_name: process.name,
        process_path: process.path,
        class_name,
    })
}

/// Lists interesting windows in enumeration order.
pub fn interesting_windows(desktop: &dyn Desktop) -> Vec<WindowSummary> {
    let handles = match desktop.top_level_windows() {
        Ok(handles) => handles,
        Err(e) => {
            log::warn!("window enumeration failed: {e}");
            return Vec::new();
        }
    };

    handles
        .into_iter()
        .filter(|&hwnd| is_interesting(desktop, hwnd))
        .map(|hwnd| WindowSummary {
            hwnd,
            title: desktop.title(hwnd).unwrap_or_default(),
            process_name: desktop
                .process_info(hwnd)
                .map_or_else(|_| "Unknown".into(), |p| p.name),
        })
        .collect()
}

/// Finds the live window whose identity matches `target` exactly.
///
/// Windows that are not interesting or can't be identified are skipped
/// silently. With [`TieBreak::First`] the result depends on the OS
/// enumeration order when several windows share an identity.
pub fn find_matching_window(
    desktop: &dyn Desktop,
    target: &WindowIdentity,
    tie_break: TieBreak,
) -> Option<WindowHandle> {
    let handles = desktop.top_level_windows().ok()?;
    let mut matches = handles.into_iter().filter(|&hwnd| {
        is_interesting(desktop, hwnd)
            && identify(desktop, hwnd).is_ok_and(|current| current.matches(target))
    });

    match tie_break {
        TieBreak::First => matches.next(),
        TieBreak::LowestHandle => matches.min(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rect;
    use crate::testing::{FakeDesktop, FakeWindow, single_monitor};

    fn editor(hwnd: WindowHandle, title: &str) -> FakeWindow {
        FakeWindow::new(hwnd, title, Rect::new(0, 0, 800, 600))
            .class("Notepad")
            .process("notepad.exe", r"C:\Windows\notepad.exe")
    }

    #[test]
    fn hidden_minimized_and_untitled_windows_are_not_interesting() {
        // Arrange
        let desktop = single_monitor(vec![
            editor(1, "visible"),
            editor(2, "hidden").hidden(),
            editor(3, "minimized").minimized(),
            editor(4, ""),
        ]);

        // Act
        let windows = interesting_windows(&desktop);

        // Assert
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].hwnd, 1);
        assert_eq!(windows[0].process_name, "notepad.exe");
    }

    #[test]
    fn windows_differing_only_by_title_never_cross_match() {
        // Arrange
        let desktop = single_monitor(vec![editor(10, "notes.txt"), editor(20, "todo.txt")]);
        let notes = identify(&desktop, 10).unwrap();
        let todo = identify(&desktop, 20).unwrap();

        // Act / Assert
        assert_eq!(find_matching_window(&desktop, &notes, TieBreak::First), Some(10));
        assert_eq!(find_matching_window(&desktop, &todo, TieBreak::First), Some(20));
    }

    #[test]
    fn first_tie_break_follows_enumeration_order() {
        // Arrange
        let desktop = single_monitor(vec![editor(30, "same"), editor(10, "same")]);
        let target = identify(&desktop, 10).unwrap();

        // Act / Assert
        assert_eq!(find_matching_window(&desktop, &target, TieBreak::First), Some(30));
        assert_eq!(
            find_matching_window(&desktop, &target, TieBreak::LowestHandle),
            Some(10)
        );
    }

    #[test]
    fn window_with_unreadable_process_is_skipped() {
        // Arrange
        let desktop = single_monitor(vec![
            FakeWindow::new(5, "elevated", Rect::new(0, 0, 10, 10)).class("Notepad"),
            editor(6, "elevated"),
        ]);
        let target = identify(&desktop, 6).unwrap();

        // Act
        let found = find_matching_window(&desktop, &target, TieBreak::First);

        // Assert
        assert_eq!(found, Some(6));
        assert!(matches!(identify(&desktop, 5), Err(Error::Unidentifiable(5))));
    }

    #[test]
    fn minimized_match_is_not_found() {
        // Arrange
        let desktop = single_monitor(vec![editor(7, "report.docx").minimized()]);
        let target = WindowIdentity {
            title: "report.docx".into(),
            process_name: "notepad.exe".into(),
            process_path: r"C:\Windows\notepad.exe".into(),
            class_name: "Notepad".into(),
        };

        // Assert
        assert_eq!(find_matching_window(&desktop, &target, TieBreak::First), None);
    }
}
