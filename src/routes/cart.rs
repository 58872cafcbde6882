use axum::{
    Json, Router,
    extract::State,
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartView, RemovedCartItem, UpdateCartItemRequest},
    error::AppResult,
    extract::{AppJson, AppPath},
    models::CartItem,
    response::ApiResponse,
    services::cart_service,
    session::CartSession,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_cart).post(add_to_cart))
        .route("/{id}", put(update_cart_item).delete(remove_cart_item))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart lines with totals", body = ApiResponse<CartView>),
        (status = 500, description = "Store unavailable or inconsistent cart"),
    ),
    security(("session_id" = [])),
    tag = "Cart"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    session: CartSession,
) -> AppResult<Json<ApiResponse<CartView>>> {
    Ok(Json(cart_service::get_cart(&state, &session).await?))
}

#[utoipa::path(
    post,
    path = "/api/cart",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Added, or quantity incremented", body = ApiResponse<CartItem>),
        (status = 400, description = "Malformed body or non-positive quantity"),
        (status = 404, description = "Product not found"),
    ),
    security(("session_id" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    session: CartSession,
    AppJson(payload): AppJson<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartItem>>> {
    Ok(Json(cart_service::add_to_cart(&state, &session, payload).await?))
}

#[utoipa::path(
    put,
    path = "/api/cart/{id}",
    params(
        ("id" = Uuid, Path, description = "Cart item ID")
    ),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Updated item, or no data when the quantity removed it", body = ApiResponse<CartItem>),
        (status = 400, description = "Malformed id or body"),
        (status = 404, description = "Cart item not found"),
    ),
    security(("session_id" = [])),
    tag = "Cart"
)]
pub async fn update_cart_item(
    State(state): State<AppState>,
    session: CartSession,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateCartItemRequest>,
) -> AppResult<Json<ApiResponse<CartItem>>> {
    Ok(Json(
        cart_service::update_cart_item(&state, &session, id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{id}",
    params(
        ("id" = Uuid, Path, description = "Cart item ID")
    ),
    responses(
        (status = 200, description = "Removed; also returned when the item did not exist", body = ApiResponse<RemovedCartItem>),
        (status = 400, description = "Malformed id"),
    ),
    security(("session_id" = [])),
    tag = "Cart"
)]
pub async fn remove_cart_item(
    State(state): State<AppState>,
    session: CartSession,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<RemovedCartItem>>> {
    Ok(Json(
        cart_service::remove_cart_item(&state, &session, id).await?,
    ))
}
