//! The current routing information.

use thiserror::Error;

use crate::loader::LoadError;
use crate::navigation::NavigationTarget;
use crate::params::Parameters;
use crate::route_definition::{RouteId, ViewOutput};

/// Where the current navigation pass stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadStatus {
    /// No navigation has been processed yet.
    #[default]
    Idle,
    /// The matched route's module is being fetched.
    Loading,
    /// The matched route rendered; [`RouterState::view`] is current.
    Ready,
    /// The navigation failed; [`RouterState::last_error`] says why and the
    /// previously rendered view is retained.
    Failed,
}

/// A runtime navigation failure, surfaced through
/// [`RouterState::last_error`].
///
/// None of these corrupt the router's state: the previously rendered view
/// stays in place and later navigations proceed normally.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RouterError {
    /// No route matched and the table has no catch-all.
    ///
    /// A correctly built table ends in a catch-all, making this a
    /// programming defect rather than a user-facing condition.
    #[error("no route matched `{path}` and the route table has no catch-all")]
    NoMatch {
        /// The path that failed to resolve.
        path: String,
    },
    /// A guard redirect landed on a route whose guard redirects again.
    ///
    /// Redirects are bounded to one hop per navigation; needing a second is a
    /// route-table configuration error, not something to retry.
    #[error("guard redirect to `{to}` requires a further redirect; check the guards of `{to}`")]
    RedirectLoop {
        /// The redirect target whose guard did not allow it.
        to: String,
    },
    /// The matched route's module failed to load.
    ///
    /// Retried on the next navigation to the route.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// An external target was pushed but the history provider cannot leave
    /// the application.
    #[error("the history provider cannot navigate to the external URL `{url}`")]
    ExternalNavigation {
        /// The external URL.
        url: String,
    },
}

/// The current routing information.
///
/// A single instance exists per router, shared with the host through
/// [`RouterHandle`](crate::RouterHandle); only the router's service mutates
/// it. Hosts read it after every update notification.
#[derive(Debug, Default)]
pub struct RouterState {
    /// The current path.
    pub path: String,

    /// The currently active route, if a navigation pass has completed.
    pub route: Option<RouteId>,

    /// The parameters extracted from the current path.
    pub parameters: Parameters,

    /// What the host should render.
    ///
    /// Retains the previous value while a load is in flight or failed, so a
    /// broken navigation never blanks a working view.
    pub view: Option<ViewOutput>,

    /// Where the latest navigation pass stands.
    pub load_status: LoadStatus,

    /// The failure of the latest navigation pass, if any.
    pub last_error: Option<RouterError>,

    /// The authentication reading the latest pass was evaluated against.
    ///
    /// Taken once per navigation and frozen for the remainder of the pass,
    /// so every guard of one navigation sees the same value.
    pub auth_snapshot: bool,

    /// Whether there is a prior path to go back to.
    ///
    /// This might be [`true`] even if there isn't.
    pub can_go_back: bool,

    /// Whether there is a later path to go forward to.
    ///
    /// This might be [`true`] even if there isn't.
    pub can_go_forward: bool,

    /// Whether the history provider can navigate to external URLs.
    pub can_external: bool,
}

impl RouterState {
    /// Checks if the provided `target` is currently active.
    ///
    /// Useful for highlighting the current page in navigation menus.
    ///
    /// # [`Path`](NavigationTarget::Path)
    /// If `exact` is [`true`], the current path must match the `target` path
    /// exactly. If `exact` is [`false`] and the `target` path is absolute
    /// (starts with `/`), the current path must start with the `target`
    /// path. Otherwise, the last segment of the current path must match the
    /// `target` path.
    ///
    /// # [`External`](NavigationTarget::External)
    /// Always [`false`].
    #[must_use]
    pub fn is_active(&self, target: &NavigationTarget, exact: bool) -> bool {
        match target {
            NavigationTarget::Path(path) => {
                if exact {
                    return &self.path == path;
                }

                // absolute path
                if path.starts_with('/') {
                    return self.path.starts_with(path);
                }

                // relative path
                if let Some(segment) = self.path.split('/').next_back() {
                    return segment == path;
                }

                false
            }
            NavigationTarget::External(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> RouterState {
        RouterState {
            path: String::from("/stock/MSFT/3400"),
            ..Default::default()
        }
    }

    #[test]
    fn is_active_external() {
        let state = state();

        let target = NavigationTarget::External(String::from("https://example.com"));
        assert!(!state.is_active(&target, false));
        assert!(!state.is_active(&target, true));
    }

    #[test]
    fn is_active_path_absolute() {
        let state = state();

        assert!(state.is_active(&"/stock".into(), false));
        assert!(state.is_active(&"/stock/MSFT".into(), false));
        assert!(!state.is_active(&"/news".into(), false));
    }

    #[test]
    fn is_active_path_exact() {
        let state = state();

        assert!(state.is_active(&"/stock/MSFT/3400".into(), true));
        assert!(!state.is_active(&"/stock/MSFT".into(), true));
    }

    #[test]
    fn is_active_path_relative() {
        let state = state();

        assert!(state.is_active(&"3400".into(), false));
        assert!(!state.is_active(&"MSFT".into(), false));
    }
}
