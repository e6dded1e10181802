//! History Integration
//!
//! The router relies on a [`HistoryProvider`] to store the current URL, and
//! possibly a history (i.e. a browsers back button) and future (i.e. a
//! browsers forward button).
//!
//! To integrate the router with any kind of history (most importantly the
//! browser's, via its `popstate` event), implement the [`HistoryProvider`]
//! trait. The router comes with a default in-memory implementation.

use std::sync::Arc;

mod memory;
pub use memory::*;

/// An integration with some kind of navigation history.
///
/// The described behaviors are designed to mimic a web browser, which most
/// users should already know. Implementations may deviate, but should
/// document how.
pub trait HistoryProvider {
    /// Get the path of the current URL.
    ///
    /// **Must start** with `/`, and must not contain query or fragment.
    ///
    /// ```rust
    /// # use waypost_router::history::{HistoryProvider, MemoryHistory};
    /// let mut history = MemoryHistory::default();
    /// assert_eq!(history.current_path(), "/");
    ///
    /// history.push(String::from("/stocks"));
    /// assert_eq!(history.current_path(), "/stocks");
    /// ```
    #[must_use]
    fn current_path(&self) -> String;

    /// Check whether there is a previous page to navigate back to.
    ///
    /// If a [`HistoryProvider`] cannot know this, it should return [`true`].
    #[must_use]
    fn can_go_back(&self) -> bool {
        true
    }

    /// Go back to a previous page.
    ///
    /// If a [`HistoryProvider`] cannot go to a previous page, it should do
    /// nothing. This method might be called even if `can_go_back` returns
    /// [`false`].
    fn go_back(&mut self);

    /// Check whether there is a future page to navigate forward to.
    ///
    /// If a [`HistoryProvider`] cannot know this, it should return [`true`].
    #[must_use]
    fn can_go_forward(&self) -> bool {
        true
    }

    /// Go forward to a future page.
    ///
    /// If a [`HistoryProvider`] cannot go to a future page, it should do
    /// nothing. This method might be called even if `can_go_forward` returns
    /// [`false`].
    fn go_forward(&mut self);

    /// Go to another page.
    ///
    /// This should do three things:
    /// 1. Merge the current URL with the `path` parameter.
    /// 2. Add the previous URL to the navigation history.
    /// 3. Clear the navigation future.
    fn push(&mut self, path: String);

    /// Replace the current page with another one.
    ///
    /// This should merge the current URL with the `path` parameter. In
    /// contrast to `push`, the navigation history and future should stay
    /// untouched. Guard redirects use this, so the page a viewer was denied
    /// never becomes a history entry.
    fn replace(&mut self, path: String);

    /// Whether the provider can navigate to an external URL.
    #[must_use]
    fn can_external(&self) -> bool {
        false
    }

    /// Navigate to an external URL.
    ///
    /// Only called when `can_external` returns [`true`].
    #[allow(unused_variables)]
    fn external(&mut self, url: String) {}

    /// Provide the [`HistoryProvider`] with an update callback.
    ///
    /// Some [`HistoryProvider`]s receive URL updates from outside the router,
    /// e.g. a browser's back/forward buttons. When such an update arrives,
    /// the provider should call `callback`, which will cause the router to
    /// re-run its routing.
    #[allow(unused_variables)]
    fn updater(&mut self, callback: Arc<dyn Fn()>) {}
}
