use serde::{Deserialize, Serialize};

/// Describes a window well enough to find it again after a restart.
///
/// Window handles are reassigned every time a window is created, so saved
/// positions are re-linked by comparing these fields instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowIdentity {
    pub title: String,
    pub process_name: String,
    pub process_path: String,
    pub class_name: String,
}

impl WindowIdentity {
    /// Returns whether `other` describes the same window.
    ///
    /// Path, class, and title must match exactly; the process name is
    /// derived from the path and not compared. There is no fuzzy matching:
    /// a renamed window simply stays unlinked.
    pub fn matches(&self, other: &Self) -> bool {
        self.process_path == other.process_path
            && self.class_name == other.class_name
            && self.title == other.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(title: &str) -> WindowIdentity {
        WindowIdentity {
            title: title.into(),
            process_name: "code.exe".into(),
            process_path: r"C:\Apps\Code\code.exe".into(),
            class_name: "Chrome_WidgetWin_1".into(),
        }
    }

    #[test]
    fn identical_descriptors_match() {
        // Assert
        assert!(identity("main.rs - greenhouse").matches(&identity("main.rs - greenhouse")));
    }

    #[test]
    fn title_difference_prevents_match() {
        // Assert
        assert!(!identity("main.rs - greenhouse").matches(&identity("lib.rs - greenhouse")));
    }

    #[test]
    fn path_comparison_is_case_sensitive() {
        // Arrange
        let mut other = identity("a");
        other.process_path = r"c:\apps\code\code.exe".into();

        // Assert
        assert!(!identity("a").matches(&other));
    }

    #[test]
    fn process_name_is_not_compared() {
        // Arrange
        let mut other = identity("a");
        other.process_name = "Code.exe".into();

        // Assert
        assert!(identity("a").matches(&other));
    }
}
