//! Billing checkout handler.

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub user_id: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
}

/// Create a hosted checkout session for a creator upgrade and return
/// the redirect URL.
pub async fn create_checkout(
    State(state): State<AppState>,
    Json(payload): Json<CheckoutRequest>,
) -> ApiResult<Json<CheckoutResponse>> {
    let (user_id, email) = match (payload.user_id, payload.email) {
        (Some(u), Some(e)) if !u.trim().is_empty() && !e.trim().is_empty() => (u, e),
        _ => return Err(ApiError::BadRequest("Missing required fields".to_string())),
    };

    let customer_id = state.billing.ensure_customer(&user_id, &email).await?;
    let url = state
        .billing
        .create_checkout_session(&customer_id, &user_id)
        .await?;

    tracing::info!(user = %user_id, "checkout session created");
    Ok(Json(CheckoutResponse { url }))
}
