//! BDD step definitions for the dashboard JSON API

use axum::body::Body;
use axum::http::{header, Request};
use cucumber::{then, when};
use tower::ServiceExt;

use order_dashboard::dashboard::build_router;

use crate::world::DashboardWorld;

async fn send(world: &mut DashboardWorld, method: &str, path: &str, body: Option<String>) {
    let app = build_router(world.controller());
    let builder = Request::builder().method(method).uri(path);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    world.response_status = Some(response.status().as_u16());
    world.response_location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    world.response_body = Some(String::from_utf8(body.to_vec()).unwrap());
}

#[when(expr = "the client sends GET {word}")]
async fn client_gets(world: &mut DashboardWorld, path: String) {
    send(world, "GET", &path, None).await;
}

#[when(expr = "the client sends POST {word}")]
async fn client_posts(world: &mut DashboardWorld, path: String) {
    send(world, "POST", &path, None).await;
}

#[when(expr = "the client sends DELETE {word}")]
async fn client_deletes(world: &mut DashboardWorld, path: String) {
    send(world, "DELETE", &path, None).await;
}

#[when(expr = "the client sends PUT {word} with body {string}")]
async fn client_puts(world: &mut DashboardWorld, path: String, body: String) {
    send(world, "PUT", &path, Some(body)).await;
}

#[then(expr = "the response status should be {int}")]
fn response_status(world: &mut DashboardWorld, expected: u16) {
    assert_eq!(
        world.response_status,
        Some(expected),
        "Unexpected status; body: {:?}",
        world.response_body
    );
}

#[then(expr = "the response should redirect to {string}")]
fn response_redirects(world: &mut DashboardWorld, expected: String) {
    assert_eq!(world.response_status, Some(303));
    assert_eq!(world.response_location.as_deref(), Some(expected.as_str()));
}

#[then(expr = "the JSON value at {string} should be {string}")]
fn json_value_is(world: &mut DashboardWorld, pointer: String, expected: String) {
    let body = world.response_body.as_ref().expect("no response body");
    let json: serde_json::Value = serde_json::from_str(body).expect("response is not JSON");
    let value = json
        .pointer(&pointer)
        .unwrap_or_else(|| panic!("no value at '{}' in {}", pointer, body));
    let actual = match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    assert_eq!(actual, expected, "value at '{}'", pointer);
}
