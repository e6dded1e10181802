//! Wires the route table of a small app shell (stocks, files, trading, news
//! behind a login) and walks through a few navigations.
//!
//! Run with `cargo run --example demo`.

use std::cell::Cell;
use std::rc::Rc;

use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;
use futures::FutureExt;

use waypost_router::prelude::*;

fn report(label: &str, handle: &RouterHandle) {
    let state = handle.read();
    println!(
        "{label:<24} path={:<18} status={:?} view={:?}",
        state.path, state.load_status, state.view
    );
}

fn main() {
    let logged_in = Rc::new(Cell::new(false));

    let table = RouteTable::build([
        Route::element("/", "pm-home"),
        Route::element("/login", "pm-login").public_only(),
        Route::element("/reset-password/:?passwordResetToken", "pm-reset-password").public_only(),
        Route::element("/stocks", "pm-stocks")
            .secured()
            .loader(|| async { Ok(()) }.boxed_local()),
        Route::element("/stock/:type/:day", "pm-stock-detail").secured(),
        Route::element("/files", "pm-files").secured(),
        Route::element("/trade/:stockId/:?againstRate", "pm-trading").secured(),
        Route::element("/news", "pm-news"),
        Route::element("*", "pm-not-found"),
    ])
    .expect("route table is valid");

    let auth = logged_in.clone();
    let cfg = RouterConfig::default().auth(move || auth.get());
    let (mut service, handle) = RouterService::new(table, cfg);

    let mut pool = LocalPool::new();
    pool.spawner()
        .spawn_local(async move { service.run().await })
        .unwrap();

    pool.run_until_stalled();
    report("initial", &handle);

    // secured page while logged out: lands on the login page
    handle.push("/stocks");
    pool.run_until_stalled();
    report("stocks, logged out", &handle);

    // log in and re-run routing: the login page is public-only now
    logged_in.set(true);
    handle.update();
    pool.run_until_stalled();
    report("after login", &handle);

    handle.push("/stocks");
    pool.run_until_stalled();
    report("stocks, logged in", &handle);

    handle.push("/trade/MSFT/1.25");
    pool.run_until_stalled();
    report("trade with rate", &handle);

    handle.push("/some/unknown/page");
    pool.run_until_stalled();
    report("unknown page", &handle);

    handle.go_back();
    pool.run_until_stalled();
    report("back", &handle);
}
