use tracing::error;
use url::Url;

use super::HistoryProvider;

/// A [`HistoryProvider`] that stores all information in memory.
///
/// Serves as the default provider outside a browser, and as a deterministic
/// stand-in for tests.
pub struct MemoryHistory {
    current: Url,
    past: Vec<String>,
    future: Vec<String>,
}

impl MemoryHistory {
    /// Create a [`MemoryHistory`] starting at `path` instead of `/`.
    ///
    /// Hosts use this to initialize routing from the location the
    /// application was opened at.
    ///
    /// ```rust
    /// # use waypost_router::history::{HistoryProvider, MemoryHistory};
    /// let history = MemoryHistory::with_initial_path("/stocks");
    /// assert_eq!(history.current_path(), "/stocks");
    /// ```
    #[must_use]
    pub fn with_initial_path(path: &str) -> Self {
        let mut history = Self::default();
        history.replace(path.to_string());
        history
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self {
            current: Url::parse("waypost://index.html/").unwrap(),
            past: Default::default(),
            future: Default::default(),
        }
    }
}

impl HistoryProvider for MemoryHistory {
    fn current_path(&self) -> String {
        self.current.path().to_string()
    }

    fn can_go_back(&self) -> bool {
        !self.past.is_empty()
    }

    fn can_go_forward(&self) -> bool {
        !self.future.is_empty()
    }

    fn go_back(&mut self) {
        if self.can_go_back() {
            self.future.push(self.current.to_string());
            self.current = Url::parse(&self.past.pop().unwrap()).unwrap();

            // past urls are always valid, they came from the url struct itself
        }
    }

    fn go_forward(&mut self) {
        if self.can_go_forward() {
            self.past.push(self.current.to_string());
            self.current = Url::parse(&self.future.pop().unwrap()).unwrap();

            // future urls are always valid, they came from the url struct itself
        }
    }

    fn push(&mut self, path: String) {
        if path.starts_with("//") {
            error!(r#"cannot navigate to paths starting with "//", path: {path}"#);
            return;
        }

        let previous_path = self.current.to_string();

        if let Ok(url) = self.current.join(&path) {
            self.past.push(previous_path);
            self.current = url;
            self.future.clear();
        }
    }

    fn replace(&mut self, path: String) {
        if path.starts_with("//") {
            error!(r#"cannot navigate to paths starting with "//", path: {path}"#);
            return;
        }

        if let Ok(url) = self.current.join(&path) {
            self.current = url;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_root() {
        let history = MemoryHistory::default();

        assert_eq!(history.current_path(), "/");
        assert!(!history.can_go_back());
        assert!(!history.can_go_forward());
    }

    #[test]
    fn push_moves_and_records_past() {
        let mut history = MemoryHistory::default();
        history.push(String::from("/stocks"));

        assert_eq!(history.current_path(), "/stocks");
        assert!(history.can_go_back());
    }

    #[test]
    fn back_and_forward_round_trip() {
        let mut history = MemoryHistory::default();
        history.push(String::from("/stocks"));

        history.go_back();
        assert_eq!(history.current_path(), "/");
        assert!(history.can_go_forward());

        history.go_forward();
        assert_eq!(history.current_path(), "/stocks");
        assert!(!history.can_go_forward());
    }

    #[test]
    fn push_clears_future() {
        let mut history = MemoryHistory::default();
        history.push(String::from("/stocks"));
        history.go_back();
        history.push(String::from("/news"));

        assert!(!history.can_go_forward());
        assert_eq!(history.current_path(), "/news");
    }

    #[test]
    fn replace_leaves_history_untouched() {
        let mut history = MemoryHistory::default();
        history.replace(String::from("/login"));

        assert_eq!(history.current_path(), "/login");
        assert!(!history.can_go_back());
    }

    #[test]
    fn protocol_relative_paths_are_rejected() {
        let mut history = MemoryHistory::default();
        history.push(String::from("//evil.example"));

        assert_eq!(history.current_path(), "/");
    }
}
