//! The core of the router.

use std::sync::{Arc, RwLock, RwLockReadGuard, Weak};

use futures_channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures_util::future::LocalBoxFuture;
use futures_util::stream::FuturesUnordered;
use futures_util::{select_biased, FutureExt, StreamExt};
use tracing::{error, trace};

use crate::guard::{GuardDecision, GuardEvaluator};
use crate::history::{HistoryProvider, MemoryHistory};
use crate::loader::{EnsureLoad, LoadResult, LoaderCache};
use crate::navigation::NavigationTarget;
use crate::params::Parameters;
use crate::route_definition::{RouteId, RouteTable};
use crate::router_cfg::RouterConfig;
use crate::state::{LoadStatus, RouterError, RouterState};

/// A set of messages that the [`RouterService`] can handle.
pub(crate) enum RouterMessage {
    /// Go back a step in the navigation history.
    GoBack,

    /// Go a step forward in the navigation history.
    GoForward,

    /// Push a new history item.
    Push(NavigationTarget),

    /// Replace the current history item with a new one.
    Replace(NavigationTarget),

    /// Subscribe the contained callback to router updates.
    Subscribe(Arc<dyn Fn()>),

    /// Tell the router to update the current state.
    Update,
}

/// A route module load awaited by a navigation pass.
struct PendingLoad {
    generation: u64,
    route: RouteId,
    params: Parameters,
    path: String,
    result: LoadResult,
}

enum Event {
    Message(Option<RouterMessage>),
    Loaded(PendingLoad),
}

/// The core of the router.
///
/// This combines the [route table](crate::route_definition), a
/// [`HistoryProvider`] and the [guards](crate::guard) to decide, for every
/// navigation, which view to activate, whether the viewer may see it, and how
/// its module is obtained. Each navigation trigger runs one pass:
/// resolve the URL, evaluate the matched route's guard against a single
/// frozen authentication reading, ensure the route's module is loaded, and
/// render.
///
/// The service is driven by messages sent through its [`RouterHandle`] and by
/// the history provider's foreign-navigation callback. Run it on the host's
/// (single-threaded) executor:
///
/// ```rust
/// # use futures::executor::LocalPool;
/// # use futures::task::LocalSpawnExt;
/// # use waypost_router::prelude::*;
/// # let table = RouteTable::build([Route::element("*", "pm-not-found")]).unwrap();
/// let (mut service, _handle) = RouterService::new(table, RouterConfig::default());
///
/// let mut pool = LocalPool::new();
/// pool.spawner()
///     .spawn_local(async move { service.run().await })
///     .unwrap();
/// pool.run_until_stalled();
/// ```
///
/// A navigation arriving while a previous pass is still loading supersedes
/// it: the stale pass's module is still cached once fetched, but its
/// rendering is discarded (last navigation wins).
pub struct RouterService {
    table: RouteTable,
    history: Box<dyn HistoryProvider>,
    guard: GuardEvaluator,
    cache: LoaderCache,
    login_target: String,
    home_target: String,
    state: Arc<RwLock<RouterState>>,
    subscribers: Vec<Weak<dyn Fn()>>,
    rx: UnboundedReceiver<RouterMessage>,
    pending: FuturesUnordered<LocalBoxFuture<'static, PendingLoad>>,
    generation: u64,
}

impl RouterService {
    /// Create a new [`RouterService`].
    ///
    /// The returned [`RouterService`] and [`RouterHandle`] are linked with
    /// each other: messages sent through the handle are processed by the
    /// service's [`run`](RouterService::run) loop.
    #[must_use]
    pub fn new(table: RouteTable, cfg: RouterConfig) -> (Self, RouterHandle) {
        let (tx, rx) = unbounded();
        let state = Arc::new(RwLock::new(RouterState::default()));

        let mut history = cfg
            .history
            .unwrap_or_else(|| Box::new(MemoryHistory::default()));
        let updater_tx = tx.clone();
        history.updater(Arc::new(move || {
            updater_tx.unbounded_send(RouterMessage::Update).ok();
        }));

        let handle = RouterHandle {
            tx,
            state: state.clone(),
        };

        (
            Self {
                table,
                history,
                guard: GuardEvaluator::new(cfg.is_logged_in),
                cache: LoaderCache::new(),
                login_target: cfg.login_target,
                home_target: cfg.home_target,
                state,
                subscribers: Vec::new(),
                rx,
                pending: FuturesUnordered::new(),
                generation: 0,
            },
            handle,
        )
    }

    /// The routers event loop.
    ///
    /// Performs the initial routing from the history provider's current
    /// location, then reacts to navigation messages and completed module
    /// loads for the rest of the session.
    pub async fn run(&mut self) {
        // initial routing; state starts at the current browser location
        self.handle_navigation();

        loop {
            let event = select_biased! {
                msg = self.rx.next() => Event::Message(msg),
                load = self.pending.select_next_some() => Event::Loaded(load),
            };

            match event {
                Event::Message(Some(msg)) => self.handle_message(msg),
                Event::Message(None) => break,
                Event::Loaded(load) => self.finish_load(load),
            }
        }
    }

    fn handle_message(&mut self, msg: RouterMessage) {
        match msg {
            RouterMessage::GoBack => {
                self.history.go_back();
                self.handle_navigation();
            }
            RouterMessage::GoForward => {
                self.history.go_forward();
                self.handle_navigation();
            }
            RouterMessage::Push(target) => match target {
                NavigationTarget::Path(path) => {
                    self.history.push(path);
                    self.handle_navigation();
                }
                NavigationTarget::External(url) => self.external(url),
            },
            RouterMessage::Replace(target) => match target {
                NavigationTarget::Path(path) => {
                    self.history.replace(path);
                    self.handle_navigation();
                }
                NavigationTarget::External(url) => self.external(url),
            },
            RouterMessage::Subscribe(subscriber) => {
                self.subscribers.push(Arc::downgrade(&subscriber));
                // bring the new subscriber up to date
                (subscriber)();
            }
            RouterMessage::Update => self.handle_navigation(),
        }
    }

    /// Run one navigation pass against the history provider's current
    /// location.
    fn handle_navigation(&mut self) {
        self.generation = self.generation.wrapping_add(1);

        // one authentication reading, frozen for the whole pass
        let logged_in = self.guard.snapshot();
        self.state.write().unwrap().auth_snapshot = logged_in;

        let mut path = self.history.current_path();
        let mut redirected = false;

        let matched = loop {
            let Some(matched) = self.table.resolve(&path) else {
                error!(%path, "no route matched and the table has no catch-all");
                self.fail(RouterError::NoMatch { path });
                return;
            };

            let target = match self.guard.evaluate(self.table.route(matched.route), logged_in) {
                GuardDecision::Allow => break matched,
                GuardDecision::RedirectToLogin => self.login_target.clone(),
                GuardDecision::RedirectToHome => self.home_target.clone(),
            };

            // redirects are bounded to one hop per pass; a second hop means
            // the redirect targets guard each other
            if redirected {
                error!(at = %path, "guard redirect chain exceeds one hop");
                self.fail(RouterError::RedirectLoop { to: path });
                return;
            }
            redirected = true;

            trace!(from = %path, to = %target, "guard redirect");
            self.history.replace(target.clone());
            path = target;
        };

        match self
            .cache
            .ensure_loaded(matched.route, self.table.route(matched.route))
        {
            EnsureLoad::Ready => self.apply(matched.route, matched.params, path),
            EnsureLoad::Pending(load) => {
                {
                    let mut state = self.state.write().unwrap();
                    state.load_status = LoadStatus::Loading;
                    state.last_error = None;
                }

                let generation = self.generation;
                let route = matched.route;
                let params = matched.params;
                self.pending.push(
                    async move {
                        PendingLoad {
                            generation,
                            route,
                            params,
                            path,
                            result: load.await,
                        }
                    }
                    .boxed_local(),
                );

                self.update_subscribers();
            }
        }
    }

    fn finish_load(&mut self, load: PendingLoad) {
        // the fetched module is kept even when the pass is stale
        self.cache.finish(load.route, &load.result);

        if load.generation != self.generation {
            trace!(path = %load.path, "discarding superseded navigation");
            return;
        }

        match load.result {
            Ok(()) => self.apply(load.route, load.params, load.path),
            Err(err) => {
                error!(path = %load.path, "route module failed to load: {err}");
                self.fail(RouterError::Load(err));
            }
        }
    }

    /// Make the matched route the current one and notify subscribers.
    ///
    /// This is the single externally observable effect of a navigation pass.
    fn apply(&mut self, route: RouteId, params: Parameters, path: String) {
        let view = self.table.route(route).content().render(&params);

        {
            let mut state = self.state.write().unwrap();
            state.path = path;
            state.route = Some(route);
            state.parameters = params;
            state.view = Some(view);
            state.load_status = LoadStatus::Ready;
            state.last_error = None;
            state.can_go_back = self.history.can_go_back();
            state.can_go_forward = self.history.can_go_forward();
            state.can_external = self.history.can_external();
        }

        self.update_subscribers();
    }

    /// Surface a navigation failure, leaving the current view untouched.
    fn fail(&mut self, error: RouterError) {
        {
            let mut state = self.state.write().unwrap();
            state.load_status = LoadStatus::Failed;
            state.last_error = Some(error);
            state.can_go_back = self.history.can_go_back();
            state.can_go_forward = self.history.can_go_forward();
        }

        self.update_subscribers();
    }

    fn external(&mut self, url: String) {
        if self.history.can_external() {
            self.history.external(url);
        } else {
            error!(%url, "history provider cannot navigate to external URLs");
            self.fail(RouterError::ExternalNavigation { url });
        }
    }

    /// Trigger an update of all subscribed callbacks.
    ///
    /// Also sorts out the subscribers that have been dropped since the last
    /// update.
    fn update_subscribers(&mut self) {
        self.subscribers.retain(|subscriber| {
            if let Some(subscriber) = subscriber.upgrade() {
                (subscriber)();
                true
            } else {
                false
            }
        });
    }
}

/// A handle to drive and observe a [`RouterService`].
///
/// Handles are cheap to clone.
#[derive(Clone)]
pub struct RouterHandle {
    tx: UnboundedSender<RouterMessage>,
    state: Arc<RwLock<RouterState>>,
}

impl RouterHandle {
    /// Navigate to `target`, pushing a new history entry.
    pub fn push(&self, target: impl Into<NavigationTarget>) {
        self.tx
            .unbounded_send(RouterMessage::Push(target.into()))
            .ok();
    }

    /// Navigate to `target`, replacing the current history entry.
    pub fn replace(&self, target: impl Into<NavigationTarget>) {
        self.tx
            .unbounded_send(RouterMessage::Replace(target.into()))
            .ok();
    }

    /// Go back a step in the navigation history.
    pub fn go_back(&self) {
        self.tx.unbounded_send(RouterMessage::GoBack).ok();
    }

    /// Go a step forward in the navigation history.
    pub fn go_forward(&self) {
        self.tx.unbounded_send(RouterMessage::GoForward).ok();
    }

    /// Re-run routing against the current location.
    ///
    /// Call this after the authentication state changed (e.g. a logout), so
    /// the guards are re-evaluated.
    pub fn update(&self) {
        self.tx.unbounded_send(RouterMessage::Update).ok();
    }

    /// Subscribe to router updates.
    ///
    /// The callback is invoked once immediately and after every state
    /// change. The router holds the callback weakly: keep the [`Arc`] alive
    /// for as long as the subscription should last.
    pub fn subscribe(&self, subscriber: Arc<dyn Fn()>) {
        self.tx
            .unbounded_send(RouterMessage::Subscribe(subscriber))
            .ok();
    }

    /// Read the current routing information.
    #[must_use]
    pub fn read(&self) -> RwLockReadGuard<'_, RouterState> {
        self.state.read().unwrap()
    }
}
