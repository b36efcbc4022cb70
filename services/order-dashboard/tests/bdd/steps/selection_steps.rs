//! BDD step definitions for order selection and view mode

use cucumber::{given, then, when};

use order_dashboard::state::ViewMode;
use order_dashboard::DashboardError;

use crate::world::DashboardWorld;

fn parse_view_mode(s: &str) -> ViewMode {
    s.parse()
        .unwrap_or_else(|e| panic!("invalid view mode '{}': {}", s, e))
}

#[given(expr = "order {string} is selected")]
async fn order_is_selected(world: &mut DashboardWorld, id: String) {
    world
        .controller()
        .select_order(Some(&id))
        .await
        .expect("selection failed");
}

#[when(expr = "order {string} is selected")]
async fn select_order(world: &mut DashboardWorld, id: String) {
    world.selection_result = Some(world.controller().select_order(Some(&id)).await);
}

#[when("the selection is cleared")]
async fn clear_selection(world: &mut DashboardWorld) {
    world.selection_result = Some(world.controller().select_order(None).await);
}

#[when(expr = "the view mode is set to {string}")]
async fn set_view_mode(world: &mut DashboardWorld, mode: String) {
    world
        .controller()
        .set_view_mode(parse_view_mode(&mode))
        .await;
}

#[then(expr = "the selected order should be {string}")]
async fn selected_order_is(world: &mut DashboardWorld, expected: String) {
    let snapshot = world.controller().snapshot().await;
    let selected = snapshot.selected.expect("no order selected");
    assert_eq!(selected.order.id, expected);
}

#[then("no order should be selected")]
async fn no_order_selected(world: &mut DashboardWorld) {
    assert!(world.controller().snapshot().await.selected.is_none());
}

#[then("the selection should be rejected as an unknown order")]
fn selection_rejected(world: &mut DashboardWorld) {
    let result = world.selection_result.as_ref().expect("nothing selected");
    assert!(
        matches!(result, Err(DashboardError::UnknownOrder(_))),
        "Expected UnknownOrder, got {:?}",
        result
    );
}

#[then(expr = "the view mode should be {string}")]
async fn view_mode_is(world: &mut DashboardWorld, expected: String) {
    let snapshot = world.controller().snapshot().await;
    assert_eq!(snapshot.view_mode, parse_view_mode(&expected));
}
