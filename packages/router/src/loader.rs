//! On-demand loading of route modules.
//!
//! Routes may declare a loader, the equivalent of fetching a code module
//! before the route's view can be mounted. The [`LoaderCache`] guarantees the
//! loader runs at most once per session: concurrent navigations to the same
//! route share the in-flight load, and a completed load never runs again.
//! Failures are not cached: a route whose load failed is retried on the next
//! navigation to it, so a transient network error cannot permanently block a
//! route.

use std::sync::Arc;

use futures_util::future::{LocalBoxFuture, Shared};
use futures_util::FutureExt;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::route_definition::{RouteDefinition, RouteId};

/// A module load failure, surfaced to the host for display.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("module load failed: {message}")]
pub struct LoadError {
    /// What went wrong, in host terms.
    pub message: String,
}

impl LoadError {
    /// Create a load error from a host-side failure description.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The outcome of a single load attempt.
pub type LoadResult = Result<(), LoadError>;

/// A route's module loader.
///
/// Invoked at most once per session absent failure; see [`LoaderCache`].
pub type RouteLoader = Arc<dyn Fn() -> LocalBoxFuture<'static, LoadResult>>;

/// An in-flight load, shared between all navigations awaiting it.
pub(crate) type SharedLoad = Shared<LocalBoxFuture<'static, LoadResult>>;

/// What a navigation pass has to do before its view can be mounted.
pub(crate) enum EnsureLoad {
    /// The module is resident; proceed to rendering.
    Ready,
    /// Await the contained load first.
    Pending(SharedLoad),
}

enum LoadState {
    InFlight(SharedLoad),
    Loaded,
    Errored,
}

/// Tracks the load state of every route with a loader.
///
/// Routes without an entry have never been attempted.
#[derive(Default)]
pub(crate) struct LoaderCache {
    entries: FxHashMap<RouteId, LoadState>,
}

impl LoaderCache {
    pub(crate) fn new() -> Self {
        Default::default()
    }

    /// Ensure the module for `route` is resident or being fetched.
    ///
    /// Starts the loader only when no attempt is outstanding and no attempt
    /// has succeeded. The returned future is shared: polling it from several
    /// navigations does not duplicate the fetch.
    pub(crate) fn ensure_loaded(&mut self, id: RouteId, route: &RouteDefinition) -> EnsureLoad {
        let Some(loader) = route.loader() else {
            return EnsureLoad::Ready;
        };

        match self.entries.get(&id) {
            Some(LoadState::Loaded) => EnsureLoad::Ready,
            Some(LoadState::InFlight(load)) => EnsureLoad::Pending(load.clone()),
            Some(LoadState::Errored) | None => {
                let load = loader().shared();
                self.entries.insert(id, LoadState::InFlight(load.clone()));
                EnsureLoad::Pending(load)
            }
        }
    }

    /// Record the outcome of a load.
    ///
    /// Called for every completed load, including those of superseded
    /// navigations: staleness discards rendering, not the fetched module.
    /// Several navigations may report the same shared load, so settling is
    /// idempotent.
    pub(crate) fn finish(&mut self, id: RouteId, result: &LoadResult) {
        let state = match result {
            Ok(()) => LoadState::Loaded,
            Err(_) => LoadState::Errored,
        };
        self.entries.insert(id, state);
    }
}
