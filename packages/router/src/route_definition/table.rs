use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::warn;

use super::pattern::split_path;
use super::{PatternError, Route, RouteDefinition};
use crate::params::Parameters;

/// An error found while building a [`RouteTable`].
///
/// Like [`PatternError`], this is a configuration defect that should abort
/// application startup.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A route's path pattern failed to compile.
    #[error(transparent)]
    Pattern(#[from] PatternError),
    /// Two routes declared the identical all-literal pattern.
    ///
    /// The second declaration can never match and is certainly a mistake.
    /// Overlapping parameter or wildcard routes are not rejected; they
    /// legitimately rely on declaration order.
    #[error("duplicate literal route `{path}`; the second definition is unreachable")]
    DuplicateRoute {
        /// The normalized literal path declared twice.
        path: String,
    },
}

/// Identifies a route within its [`RouteTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RouteId(usize);

/// The outcome of resolving a URL against a [`RouteTable`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchResult {
    /// The matched route.
    pub route: RouteId,
    /// The extracted parameters, in declaration order.
    pub params: Parameters,
}

/// An ordered collection of compiled routes.
///
/// Resolution is first-match-wins in declaration order, which makes the order
/// of overlapping routes load-bearing: declare specific routes before the
/// patterns that shadow them, and the catch-all `"*"` last.
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<RouteDefinition>,
}

impl RouteTable {
    /// Compile an ordered sequence of routes into a table.
    ///
    /// Fails if a pattern doesn't compile or if two routes declare the same
    /// all-literal pattern. Detection is deliberately limited to exact
    /// literal duplicates; whether overlapping dynamic routes are reachable
    /// depends on their order, which the table preserves.
    ///
    /// # Example
    /// ```rust
    /// # use waypost_router::route_definition::{Route, RouteTable};
    /// let table = RouteTable::build([
    ///     Route::element("/stocks", "pm-stocks"),
    ///     Route::element("/stock/:type/:day", "pm-stock-detail"),
    ///     Route::element("*", "pm-not-found"),
    /// ])
    /// .unwrap();
    ///
    /// assert!(table.has_catch_all());
    /// ```
    pub fn build(routes: impl IntoIterator<Item = Route>) -> Result<Self, ConfigError> {
        let mut compiled = Vec::new();
        let mut literals = FxHashSet::default();

        for route in routes {
            let definition = RouteDefinition::compile(route)?;

            if let Some(path) = definition.pattern().literal_key() {
                if !literals.insert(path.clone()) {
                    return Err(ConfigError::DuplicateRoute { path });
                }
            }

            compiled.push(definition);
        }

        let table = Self { routes: compiled };
        if !table.has_catch_all() {
            warn!("route table has no catch-all; unmatched navigations will fail");
        }

        Ok(table)
    }

    /// Find the first route matching `url`, in declaration order.
    ///
    /// The query string and fragment are not part of matching and are
    /// stripped before the path is split.
    ///
    /// Returns [`None`] only if nothing matched and the table has no
    /// catch-all.
    #[must_use]
    pub fn resolve(&self, url: &str) -> Option<MatchResult> {
        let path = match url.find(['?', '#']) {
            Some(idx) => &url[..idx],
            None => url,
        };
        let tokens = split_path(path);

        self.routes.iter().enumerate().find_map(|(idx, definition)| {
            definition.pattern().matches(&tokens).map(|params| MatchResult {
                route: RouteId(idx),
                params,
            })
        })
    }

    /// Get a route by its id.
    ///
    /// # Panic
    /// If `id` did not come from this table.
    #[must_use]
    pub fn route(&self, id: RouteId) -> &RouteDefinition {
        &self.routes[id.0]
    }

    /// The compiled routes, in declaration order.
    #[must_use]
    pub fn routes(&self) -> &[RouteDefinition] {
        &self.routes
    }

    /// Whether the table ends in total coverage.
    #[must_use]
    pub fn has_catch_all(&self) -> bool {
        self.routes
            .iter()
            .any(|definition| definition.pattern().is_catch_all())
    }
}
