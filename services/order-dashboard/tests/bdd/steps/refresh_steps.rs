//! BDD step definitions for fetching and automatic refresh

use std::sync::Arc;
use std::time::Duration;

use cucumber::{given, then, when};
use serde_json::{json, Value};
use tokio::sync::Notify;

use order_dashboard::controller::RefreshOutcome;
use order_dashboard::state::LoadPhase;

use crate::world::{DashboardWorld, ScriptedOrderSource};

fn orders_from_ids(ids: &str) -> Vec<Value> {
    ids.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            json!({
                "_id": id,
                "phone": "923001234567",
                "purchaseMethod": "HOME_DELIVERY",
                "pricing": { "total": 10 },
            })
        })
        .collect()
}

// --- Given steps ---

#[given(expr = "the order API returns orders {string}")]
fn api_returns_orders(world: &mut DashboardWorld, ids: String) {
    world.install_source(ScriptedOrderSource::new(vec![Ok(orders_from_ids(&ids))]));
}

#[given(expr = "the order API returns orders {string} and then orders {string}")]
fn api_returns_then_returns(world: &mut DashboardWorld, first: String, second: String) {
    world.install_source(ScriptedOrderSource::new(vec![
        Ok(orders_from_ids(&first)),
        Ok(orders_from_ids(&second)),
    ]));
}

#[given(expr = "the order API returns orders {string} and then fails with {string}")]
fn api_returns_then_fails(world: &mut DashboardWorld, ids: String, message: String) {
    world.install_source(ScriptedOrderSource::new(vec![
        Ok(orders_from_ids(&ids)),
        Err(message),
    ]));
}

#[given(expr = "the order API fails with {string}")]
fn api_fails(world: &mut DashboardWorld, message: String) {
    world.install_source(ScriptedOrderSource::new(vec![Err(message)]));
}

#[given("the order API returns the declared orders")]
fn api_returns_declared(world: &mut DashboardWorld) {
    let orders = world.raw_orders.clone();
    world.install_source(ScriptedOrderSource::new(vec![Ok(orders)]));
}

#[given(expr = "the order API is slow and returns orders {string}")]
fn api_is_slow(world: &mut DashboardWorld, ids: String) {
    let gate = Arc::new(Notify::new());
    world.install_source(ScriptedOrderSource::gated(
        vec![Ok(orders_from_ids(&ids))],
        Arc::clone(&gate),
    ));
    world.gate = Some(gate);
}

#[given("the dashboard has refreshed")]
async fn dashboard_has_refreshed(world: &mut DashboardWorld) {
    world.last_outcome = Some(world.controller().refresh().await);
}

// --- When steps ---

#[when("the dashboard refreshes")]
async fn dashboard_refreshes(world: &mut DashboardWorld) {
    world.last_outcome = Some(world.controller().refresh().await);
}

#[when("a refresh starts")]
async fn refresh_starts(world: &mut DashboardWorld) {
    let controller = world.controller();
    let source = world.source();
    let handle = tokio::spawn(async move { controller.refresh().await });
    source.started.notified().await;
    world.pending_refresh = Some(handle);
}

#[when("the refresh completes")]
async fn refresh_completes(world: &mut DashboardWorld) {
    world.gate.as_ref().expect("order API is not slow").notify_one();
    let handle = world.pending_refresh.take().expect("no refresh in flight");
    world.last_outcome = Some(handle.await.expect("refresh task panicked"));
}

#[when(expr = "automatic refresh starts every {int} milliseconds")]
fn auto_refresh_starts(world: &mut DashboardWorld, millis: u64) {
    let handle = world
        .controller()
        .start_auto_refresh(Duration::from_millis(millis));
    world.auto_refresh = Some(handle);
}

#[when(expr = "{int} milliseconds pass")]
async fn milliseconds_pass(_world: &mut DashboardWorld, millis: u64) {
    tokio::time::sleep(Duration::from_millis(millis)).await;
}

#[when("automatic refresh is shut down")]
async fn auto_refresh_shut_down(world: &mut DashboardWorld) {
    let handle = world.auto_refresh.take().expect("automatic refresh not started");
    handle.shutdown().await;
    world.calls_at_cancel = Some(world.source().calls());
}

// --- Then steps ---

#[then(expr = "the dashboard should show {int} order(s)")]
async fn dashboard_shows_orders(world: &mut DashboardWorld, expected: usize) {
    let snapshot = world.controller().snapshot().await;
    assert_eq!(snapshot.orders.len(), expected);
    assert_eq!(snapshot.stats.total_orders, expected);
}

#[then(expr = "the refresh outcome should be {string}")]
fn refresh_outcome(world: &mut DashboardWorld, expected: String) {
    let outcome = world.last_outcome.as_ref().expect("no refresh outcome");
    let actual = match outcome {
        RefreshOutcome::Updated { .. } => "updated",
        RefreshOutcome::Failed { .. } => "failed",
    };
    assert_eq!(actual, expected, "unexpected outcome {:?}", outcome);
}

#[then(expr = "the last failure should mention {string}")]
async fn last_failure_mentions(world: &mut DashboardWorld, expected: String) {
    let snapshot = world.controller().snapshot().await;
    let failure = snapshot.last_failure.expect("no failure recorded");
    assert!(
        failure.message.contains(&expected),
        "Expected failure to mention '{}', got '{}'",
        expected,
        failure.message
    );
}

#[then(expr = "the load phase should be {string}")]
async fn load_phase(world: &mut DashboardWorld, expected: String) {
    let phase = world.controller().snapshot().await.phase;
    let expected = match expected.as_str() {
        "not loaded" => LoadPhase::NotLoaded,
        "loaded" => LoadPhase::Loaded,
        "refreshing" => LoadPhase::Refreshing,
        other => panic!("Unknown load phase: {}", other),
    };
    assert_eq!(phase, expected);
}

#[then("the dashboard should be loading")]
async fn dashboard_loading(world: &mut DashboardWorld) {
    assert!(world.controller().snapshot().await.loading);
}

#[then("the dashboard should not be loading")]
async fn dashboard_not_loading(world: &mut DashboardWorld) {
    assert!(!world.controller().snapshot().await.loading);
}

#[then("the loading spinner should be shown")]
async fn spinner_shown(world: &mut DashboardWorld) {
    assert!(world.controller().snapshot().await.show_spinner);
}

#[then("the loading spinner should not be shown")]
async fn spinner_not_shown(world: &mut DashboardWorld) {
    assert!(!world.controller().snapshot().await.show_spinner);
}

#[then(expr = "the order API should have been called at least {int} times")]
fn called_at_least(world: &mut DashboardWorld, expected: usize) {
    let calls = world.source().calls();
    assert!(
        calls >= expected,
        "Expected at least {} fetches, got {}",
        expected,
        calls
    );
}

#[then("no fetch should have happened after shutdown")]
fn no_fetch_after_shutdown(world: &mut DashboardWorld) {
    let at_cancel = world.calls_at_cancel.expect("automatic refresh not shut down");
    assert_eq!(world.source().calls(), at_cancel);
}
