use chrono::Utc;
use sea_orm::{EntityTrait, PaginatorTrait, Set};
use uuid::Uuid;

use crate::{
    db::OrmConn,
    entity::products::{ActiveModel as ProductActive, Entity as Products},
    error::AppResult,
};

/// (name, price in cents, description, image, category)
pub const CATALOG: [(&str, i64, &str, &str, &str); 6] = [
    (
        "Wireless Bluetooth Headphones",
        7999,
        "High-quality wireless headphones with noise cancellation",
        "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=300&h=300&fit=crop",
        "Electronics",
    ),
    (
        "Smart Fitness Watch",
        19999,
        "Track your fitness and health metrics",
        "https://images.unsplash.com/photo-1523275335684-37898b6baf30?w=300&h=300&fit=crop",
        "Electronics",
    ),
    (
        "Organic Cotton T-Shirt",
        2999,
        "Comfortable and sustainable cotton t-shirt",
        "https://images.unsplash.com/photo-1521572163474-6864f9cf17ab?w=300&h=300&fit=crop",
        "Clothing",
    ),
    (
        "Stainless Steel Water Bottle",
        2499,
        "Keep your drinks hot or cold for hours",
        "https://images.unsplash.com/photo-1602143407151-7111542de6e8?w=300&h=300&fit=crop",
        "Accessories",
    ),
    (
        "Laptop Backpack",
        5999,
        "Durable backpack with laptop compartment",
        "https://images.unsplash.com/photo-1553062407-98eeb64c6a62?w=300&h=300&fit=crop",
        "Accessories",
    ),
    (
        "Ceramic Coffee Mug Set",
        3499,
        "Set of 4 beautiful ceramic mugs",
        "https://images.unsplash.com/photo-1544787219-7f47ccb76574?w=300&h=300&fit=crop",
        "Home",
    ),
];

/// Inserts [`CATALOG`] when the products table is empty. Returns how many rows were
/// inserted, which is zero on every run after the first.
pub async fn ensure_catalog(conn: &OrmConn) -> AppResult<u64> {
    let existing = Products::find().count(conn).await?;
    if existing > 0 {
        tracing::debug!(existing, "catalog already seeded");
        return Ok(0);
    }

    let now = Utc::now();
    let rows = CATALOG
        .iter()
        .map(|(name, price_cents, description, image, category)| ProductActive {
            id: Set(Uuid::new_v4()),
            name: Set((*name).to_owned()),
            price_cents: Set(*price_cents),
            description: Set((*description).to_owned()),
            image: Set((*image).to_owned()),
            category: Set((*category).to_owned()),
            created_at: Set(now.into()),
        });

    let inserted = Products::insert_many(rows)
        .exec_without_returning(conn)
        .await?;
    tracing::info!(inserted, "sample products added to catalog");
    Ok(inserted)
}
