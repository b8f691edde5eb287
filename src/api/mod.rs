pub mod admin;
pub mod health;
pub mod send;

use axum::http::HeaderMap;
use axum::Router;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};

use crate::models::Identity;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_routes())
        .merge(health::health_routes())
        .with_state(state)
}

/// API v1 routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(send::send_routes())
        .nest("/admin", admin::admin_routes())
}

/// Identity carried by the `Authorization: Bearer` header, if any.
fn identify(state: &AppState, headers: &HeaderMap) -> Option<Identity> {
    let bearer = headers.typed_get::<Authorization<Bearer>>();
    state.auth.identify(bearer.as_ref().map(|auth| auth.token()))
}
