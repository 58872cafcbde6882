use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, TransactionTrait};

use crate::{
    dto::checkout::{CheckoutRequest, Customer, Receipt, ReceiptLine},
    entity::cart_items::{Column as CartCol, Entity as CartItems},
    error::{AppError, AppResult},
    pricing::{Totals, line_subtotal},
    response::{ApiResponse, Meta},
    services::cart_service::load_cart_items,
    session::CartSession,
    state::AppState,
};

const ORDER_ID_PREFIX: &str = "ORD-";

pub async fn checkout(
    state: &AppState,
    session: &CartSession,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<Receipt>> {
    let customer = validate_customer(payload)?;

    let txn = state.orm.begin().await?;

    let items = load_cart_items(&txn, session).await?;
    if items.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    let totals = Totals::from_lines(
        items.iter().map(|item| (item.product.price, item.quantity)),
        state.tax_rate,
    );

    // Only the lines that were priced; anything added meanwhile stays in the cart.
    let ids: Vec<_> = items.iter().map(|item| item.id).collect();
    CartItems::delete_many()
        .filter(CartCol::SessionId.eq(session.as_str()))
        .filter(CartCol::Id.is_in(ids))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    let now = Utc::now();
    let lines = items
        .into_iter()
        .map(|item| ReceiptLine {
            subtotal: line_subtotal(item.product.price, item.quantity),
            price: item.product.price,
            quantity: item.quantity,
            product: item.product.name,
        })
        .collect();

    let receipt = Receipt {
        order_id: order_id_at(now),
        customer,
        items: lines,
        total: totals.subtotal,
        tax: totals.tax,
        grand_total: totals.grand_total,
        timestamp: now,
    };

    tracing::info!(
        session = %session,
        order_id = %receipt.order_id,
        grand_total = %receipt.grand_total,
        "checkout completed"
    );

    Ok(ApiResponse::success("Checkout success", receipt, Some(Meta::empty())))
}

pub fn order_id_at(at: DateTime<Utc>) -> String {
    format!("{ORDER_ID_PREFIX}{}", at.timestamp_millis())
}

fn validate_customer(payload: CheckoutRequest) -> AppResult<Customer> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }

    let email = payload.email.trim();
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !well_formed {
        return Err(AppError::BadRequest("email is not valid".into()));
    }

    let address = payload
        .address
        .map(|a| a.trim().to_owned())
        .filter(|a| !a.is_empty());

    Ok(Customer {
        name: name.to_owned(),
        email: email.to_owned(),
        address,
    })
}
