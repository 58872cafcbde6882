#![allow(dead_code)]

use std::collections::HashMap;

use storefront_api::{
    db::{create_orm_conn, run_migrations},
    models::Product,
    pricing::DEFAULT_TAX_RATE,
    seed::ensure_catalog,
    services::product_service,
    session::CartSession,
    state::AppState,
};

pub const HEADPHONES: &str = "Wireless Bluetooth Headphones";
pub const WATER_BOTTLE: &str = "Stainless Steel Water Bottle";
pub const MUG_SET: &str = "Ceramic Coffee Mug Set";

/// Fresh, migrated and seeded in-memory database per test.
pub async fn seeded_state() -> anyhow::Result<AppState> {
    let orm = create_orm_conn("sqlite::memory:").await?;
    run_migrations(&orm).await?;
    ensure_catalog(&orm).await?;
    Ok(AppState::new(orm, DEFAULT_TAX_RATE))
}

pub async fn catalog(state: &AppState) -> anyhow::Result<HashMap<String, Product>> {
    let products = product_service::list_products(state)
        .await?
        .data
        .expect("product list")
        .items;
    Ok(products.into_iter().map(|p| (p.name.clone(), p)).collect())
}

pub fn session(name: &str) -> CartSession {
    CartSession::parse(name).expect("valid session id")
}
