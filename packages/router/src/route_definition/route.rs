use std::fmt::Debug;
use std::sync::Arc;

use futures_util::future::LocalBoxFuture;
use tracing::error;

use super::{PatternError, RouteContent, RoutePattern, ViewOutput};
use crate::loader::{LoadResult, RouteLoader};
use crate::params::Parameters;

/// A single route, before the [`RouteTable`](super::RouteTable) compiles it.
///
/// Routes are created via [`Route::element`] or [`Route::render`] and
/// configured through the builder methods.
///
/// # Example
/// ```rust
/// # use waypost_router::route_definition::Route;
/// Route::element("/stocks", "pm-stocks").secured();
/// Route::element("/login", "pm-login").public_only();
/// Route::element("*", "pm-not-found");
/// ```
pub struct Route {
    pub(crate) path: String,
    pub(crate) content: RouteContent,
    pub(crate) loader: Option<RouteLoader>,
    pub(crate) secured: bool,
    pub(crate) public_only: bool,
}

impl Route {
    /// Create a route that mounts the element registered under `tag`.
    pub fn element(path: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: RouteContent::Element(tag.into()),
            loader: None,
            secured: false,
            public_only: false,
        }
    }

    /// Create a route with a custom render function.
    ///
    /// The function receives the parameters extracted from the path and
    /// produces the [`ViewOutput`] directly, bypassing the element mapping.
    pub fn render(
        path: impl Into<String>,
        render: impl Fn(&Parameters) -> ViewOutput + 'static,
    ) -> Self {
        Self {
            path: path.into(),
            content: RouteContent::Custom(Arc::new(render)),
            loader: None,
            secured: false,
            public_only: false,
        }
    }

    /// Attach a loader that fetches the route's module on demand.
    ///
    /// The loader is invoked at most once per session: concurrent navigations
    /// share the in-flight load and a successful load is cached. A failed
    /// load is retried on the next navigation to the route.
    ///
    /// # Panic
    /// If a loader was already set, but only in debug builds.
    #[must_use]
    pub fn loader(mut self, loader: impl Fn() -> LocalBoxFuture<'static, LoadResult> + 'static) -> Self {
        if self.loader.is_some() {
            error!(path = %self.path, "loader already set, later prevails");
            #[cfg(debug_assertions)]
            panic!(r#"loader already set for route "{path}""#, path = self.path);
        }

        self.loader = Some(Arc::new(loader));
        self
    }

    /// Require an authenticated session.
    ///
    /// Navigating here while logged out redirects to the login target.
    #[must_use]
    pub fn secured(mut self) -> Self {
        self.secured = true;
        self
    }

    /// Require an unauthenticated session (e.g. the login page).
    ///
    /// Navigating here while logged in redirects to the home target.
    #[must_use]
    pub fn public_only(mut self) -> Self {
        self.public_only = true;
        self
    }
}

impl Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("content", &self.content)
            .field("secured", &self.secured)
            .field("public_only", &self.public_only)
            .finish_non_exhaustive()
    }
}

/// A compiled entry of the [`RouteTable`](super::RouteTable).
///
/// Created once when the table is built, immutable afterwards.
pub struct RouteDefinition {
    pattern: RoutePattern,
    content: RouteContent,
    loader: Option<RouteLoader>,
    secured: bool,
    public_only: bool,
}

impl RouteDefinition {
    pub(crate) fn compile(route: Route) -> Result<Self, PatternError> {
        Ok(Self {
            pattern: RoutePattern::compile(&route.path)?,
            content: route.content,
            loader: route.loader,
            secured: route.secured,
            public_only: route.public_only,
        })
    }

    /// The compiled path pattern.
    #[must_use]
    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    /// The route's content.
    #[must_use]
    pub fn content(&self) -> &RouteContent {
        &self.content
    }

    pub(crate) fn loader(&self) -> Option<&RouteLoader> {
        self.loader.as_ref()
    }

    /// Whether the route requires an authenticated session.
    #[must_use]
    pub fn is_secured(&self) -> bool {
        self.secured
    }

    /// Whether the route requires an unauthenticated session.
    #[must_use]
    pub fn is_public_only(&self) -> bool {
        self.public_only
    }
}

impl Debug for RouteDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteDefinition")
            .field("pattern", &self.pattern)
            .field("content", &self.content)
            .field("secured", &self.secured)
            .field("public_only", &self.public_only)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic = "loader already set"]
    fn second_loader_panics_in_debug() {
        use futures_util::FutureExt;

        let _ = Route::element("/stocks", "pm-stocks")
            .loader(|| async { Ok(()) }.boxed_local())
            .loader(|| async { Ok(()) }.boxed_local());
    }

    #[test]
    fn compile_rejects_bad_patterns() {
        assert!(RouteDefinition::compile(Route::element("/a/:?b/c", "pm-a")).is_err());
    }
}
