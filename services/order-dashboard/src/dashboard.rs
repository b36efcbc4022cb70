//! JSON API serving the dashboard view state to the presentation layer

use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};

use crate::contact::contact_link;
use crate::controller::DashboardController;
use crate::state::ViewMode;

/// Body of `PUT /api/selection`
#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub id: String,
}

/// Body of `PUT /api/view-mode`
#[derive(Debug, Deserialize)]
pub struct ViewModeRequest {
    pub mode: ViewMode,
}

/// Build the dashboard axum router
pub fn build_router(controller: DashboardController) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/view", get(view_handler))
        .route("/api/orders", get(orders_handler))
        .route("/api/orders/{id}", get(order_handler))
        .route("/api/orders/{id}/contact", get(contact_handler))
        .route("/api/stats", get(stats_handler))
        .route("/api/refresh", post(refresh_handler))
        .route(
            "/api/selection",
            get(get_selection_handler)
                .put(select_handler)
                .delete(clear_selection_handler),
        )
        .route("/api/view-mode", put(view_mode_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(controller)
}

async fn view_handler(State(controller): State<DashboardController>) -> impl IntoResponse {
    Json(controller.snapshot().await)
}

async fn orders_handler(State(controller): State<DashboardController>) -> impl IntoResponse {
    let state = controller.state();
    let orders = state.read().await.orders().to_vec();
    Json(orders)
}

async fn order_handler(
    State(controller): State<DashboardController>,
    Path(id): Path<String>,
) -> Response {
    let state = controller.state();
    let state = state.read().await;
    match state.order(&id) {
        Some(order) => Json(order.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn contact_handler(
    State(controller): State<DashboardController>,
    Path(id): Path<String>,
) -> Response {
    let state = controller.state();
    let state = state.read().await;
    match state.order(&id) {
        Some(order) => {
            let link = contact_link(&state.display().contact_link_base, &order.phone);
            tracing::debug!("Contact link for order '{}': {}", id, link);
            match HeaderValue::from_str(&link) {
                Ok(location) => {
                    (StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response()
                }
                Err(_) => {
                    tracing::debug!(
                        "Contact link for order '{}' is not a valid header value",
                        id
                    );
                    StatusCode::UNPROCESSABLE_ENTITY.into_response()
                }
            }
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn stats_handler(State(controller): State<DashboardController>) -> impl IntoResponse {
    let state = controller.state();
    let stats = state.read().await.stats().clone();
    Json(stats)
}

async fn refresh_handler(State(controller): State<DashboardController>) -> impl IntoResponse {
    Json(controller.refresh().await)
}

async fn get_selection_handler(
    State(controller): State<DashboardController>,
) -> impl IntoResponse {
    let state = controller.state();
    let selected = state.read().await.selected_detail();
    Json(selected)
}

async fn select_handler(
    State(controller): State<DashboardController>,
    Json(request): Json<SelectionRequest>,
) -> StatusCode {
    match controller.select_order(Some(&request.id)).await {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(e) => {
            tracing::debug!("Selection rejected: {}", e);
            StatusCode::NOT_FOUND
        }
    }
}

async fn clear_selection_handler(State(controller): State<DashboardController>) -> StatusCode {
    match controller.select_order(None).await {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(e) => {
            tracing::warn!("Clearing selection failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

async fn view_mode_handler(
    State(controller): State<DashboardController>,
    Json(request): Json<ViewModeRequest>,
) -> StatusCode {
    controller.set_view_mode(request.mode).await;
    StatusCode::NO_CONTENT
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}
