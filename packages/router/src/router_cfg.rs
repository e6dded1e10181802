use std::sync::Arc;

use crate::guard::AuthCheck;
use crate::history::HistoryProvider;

/// Global configuration options for the router.
///
/// This implements [`Default`] and follows the builder pattern, so you can
/// use it like this:
///
/// ```rust
/// # use waypost_router::RouterConfig;
/// let cfg = RouterConfig::default()
///     .auth(|| false)
///     .login_target("/login")
///     .home_target("/");
/// ```
pub struct RouterConfig {
    pub(crate) history: Option<Box<dyn HistoryProvider>>,
    pub(crate) is_logged_in: AuthCheck,
    pub(crate) login_target: String,
    pub(crate) home_target: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            history: None,
            is_logged_in: Arc::new(|| false),
            login_target: String::from("/login"),
            home_target: String::from("/"),
        }
    }
}

impl RouterConfig {
    /// The [`HistoryProvider`] the router should use.
    ///
    /// Defaults to [`MemoryHistory`](crate::history::MemoryHistory).
    #[must_use]
    pub fn history(self, history: impl HistoryProvider + 'static) -> Self {
        Self {
            history: Some(Box::new(history)),
            ..self
        }
    }

    /// The authentication capability guards are evaluated against.
    ///
    /// The callback is read once per navigation pass; see
    /// [`GuardEvaluator`](crate::guard::GuardEvaluator).
    ///
    /// Defaults to treating every session as logged out.
    #[must_use]
    pub fn auth(self, is_logged_in: impl Fn() -> bool + 'static) -> Self {
        Self {
            is_logged_in: Arc::new(is_logged_in),
            ..self
        }
    }

    /// Where a logged-out viewer of a secured route is redirected.
    ///
    /// Defaults to `/login`.
    #[must_use]
    pub fn login_target(self, target: impl Into<String>) -> Self {
        Self {
            login_target: target.into(),
            ..self
        }
    }

    /// Where a logged-in viewer of a public-only route is redirected.
    ///
    /// Defaults to `/`.
    #[must_use]
    pub fn home_target(self, target: impl Into<String>) -> Self {
        Self {
            home_target: target.into(),
            ..self
        }
    }
}
