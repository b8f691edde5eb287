use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};

use super::{identify, API_KEY_HEADER};
use crate::error::{AppError, Result};
use crate::models::{SendEmailRequest, SendEmailResponse};
use crate::state::AppState;

/// Send routes
pub fn send_routes() -> Router<AppState> {
    Router::new().route("/send-email", post(send_email))
}

/// POST /api/v1/send-email - Validate, rate-limit and send one HTML email
///
/// The body is decoded only after the caller has been authenticated and admitted.
async fn send_email(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: std::result::Result<Json<SendEmailRequest>, JsonRejection>,
) -> Result<Json<SendEmailResponse>> {
    let identity = identify(&state, &headers);
    let api_key = headers.get(API_KEY_HEADER).map(|value| value.as_bytes());

    let settings = state.pipeline.admit(identity.as_ref(), api_key).await?;

    let Json(request) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let receipt = state.pipeline.send(&settings, &request).await?;

    Ok(Json(SendEmailResponse::success(receipt.message())))
}
