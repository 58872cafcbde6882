use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::checkout::{CheckoutRequest, Receipt},
    error::AppResult,
    extract::AppJson,
    response::ApiResponse,
    services::checkout_service,
    session::CartSession,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(checkout))
}

#[utoipa::path(
    post,
    path = "/api/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Receipt; the cart is emptied", body = ApiResponse<Receipt>),
        (status = 400, description = "Invalid customer details or empty cart"),
    ),
    security(("session_id" = [])),
    tag = "Checkout"
)]
pub async fn checkout(
    State(state): State<AppState>,
    session: CartSession,
    AppJson(payload): AppJson<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<Receipt>>> {
    Ok(Json(
        checkout_service::checkout(&state, &session, payload).await?,
    ))
}
