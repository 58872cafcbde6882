use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::CartItem;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    /// Defaults to 1.
    pub quantity: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    /// Zero or less removes the item.
    pub quantity: i32,
}

/// The cart with server-computed money fields.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItem>,
    /// Sum of price times quantity, rounded to cents.
    pub total: Decimal,
    pub tax: Decimal,
    pub grand_total: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RemovedCartItem {
    pub id: Uuid,
}
