use axum::{Router, middleware, routing::get};

use crate::{session::attach_session, state::AppState};

pub mod cart;
pub mod checkout;
pub mod doc;
pub mod health;
pub mod products;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/products", products::router())
        .nest("/cart", cart::router())
        .nest("/checkout", checkout::router())
        .route("/health", get(health::health_check))
        .layer(middleware::from_fn(attach_session))
}
