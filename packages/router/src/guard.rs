//! Authorization checks applied before a route activates.

use std::sync::Arc;

use crate::route_definition::RouteDefinition;

/// The authentication capability injected into the router.
///
/// The router never inspects credentials; it only asks whether a session is
/// currently authenticated. Supply it via
/// [`RouterConfig::auth`](crate::RouterConfig::auth).
pub type AuthCheck = Arc<dyn Fn() -> bool>;

/// The decision a guard takes for a matched route.
///
/// Redirects are not errors. They are deterministic control flow: evaluating
/// the same route against the same frozen authentication reading always
/// yields the same decision, so there is nothing to retry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// The viewer may see the route.
    Allow,
    /// The route requires a session; send the viewer to the login target.
    RedirectToLogin,
    /// The route is for logged-out viewers only; send the viewer home.
    RedirectToHome,
}

/// Evaluates route guards against the injected authentication capability.
///
/// Authentication state can change asynchronously (e.g. a logout completing
/// mid-navigation), so a navigation pass takes a single [`snapshot`] and
/// evaluates every guard of that pass, including the redirect target's,
/// against the frozen reading.
///
/// [`snapshot`]: GuardEvaluator::snapshot
pub struct GuardEvaluator {
    is_logged_in: AuthCheck,
}

impl GuardEvaluator {
    /// Create an evaluator around the injected capability.
    #[must_use]
    pub fn new(is_logged_in: AuthCheck) -> Self {
        Self { is_logged_in }
    }

    /// Read the authentication state once.
    #[must_use]
    pub fn snapshot(&self) -> bool {
        (self.is_logged_in)()
    }

    /// Decide whether `route` may activate under the frozen reading
    /// `logged_in`.
    #[must_use]
    pub fn evaluate(&self, route: &RouteDefinition, logged_in: bool) -> GuardDecision {
        if route.is_secured() && !logged_in {
            return GuardDecision::RedirectToLogin;
        }

        if route.is_public_only() && logged_in {
            return GuardDecision::RedirectToHome;
        }

        GuardDecision::Allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route_definition::{Route, RouteTable};

    fn evaluator() -> GuardEvaluator {
        GuardEvaluator::new(Arc::new(|| true))
    }

    fn table() -> RouteTable {
        RouteTable::build([
            Route::element("/stocks", "pm-stocks").secured(),
            Route::element("/login", "pm-login").public_only(),
            Route::element("/news", "pm-news"),
        ])
        .unwrap()
    }

    #[test]
    fn secured_route_needs_session() {
        let table = table();
        let evaluator = evaluator();
        let route = table.route(table.resolve("/stocks").unwrap().route);

        assert_eq!(evaluator.evaluate(route, true), GuardDecision::Allow);
        assert_eq!(evaluator.evaluate(route, false), GuardDecision::RedirectToLogin);
    }

    #[test]
    fn public_only_route_rejects_session() {
        let table = table();
        let evaluator = evaluator();
        let route = table.route(table.resolve("/login").unwrap().route);

        assert_eq!(evaluator.evaluate(route, true), GuardDecision::RedirectToHome);
        assert_eq!(evaluator.evaluate(route, false), GuardDecision::Allow);
    }

    #[test]
    fn unguarded_route_always_allows() {
        let table = table();
        let evaluator = evaluator();
        let route = table.route(table.resolve("/news").unwrap().route);

        assert_eq!(evaluator.evaluate(route, true), GuardDecision::Allow);
        assert_eq!(evaluator.evaluate(route, false), GuardDecision::Allow);
    }

    #[test]
    fn same_frozen_reading_yields_same_decision() {
        let table = table();
        let evaluator = evaluator();
        let route = table.route(table.resolve("/stocks").unwrap().route);

        let first = evaluator.evaluate(route, false);
        let second = evaluator.evaluate(route, false);
        assert_eq!(first, second);
    }
}
