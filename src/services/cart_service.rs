use chrono::Utc;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartView, RemovedCartItem, UpdateCartItemRequest},
    entity::{
        cart_items::{
            ActiveModel as CartActive, Column as CartCol, Entity as CartItems,
            Model as CartModel,
        },
        products::{Entity as Products, Model as ProductModel},
    },
    error::{AppError, AppResult},
    models::CartItem,
    pricing::Totals,
    response::{ApiResponse, Meta},
    services::product_service::product_from_entity,
    session::CartSession,
    state::AppState,
};

pub async fn get_cart(
    state: &AppState,
    session: &CartSession,
) -> AppResult<ApiResponse<CartView>> {
    let items = load_cart_items(&state.orm, session).await?;
    let totals = Totals::from_lines(
        items.iter().map(|item| (item.product.price, item.quantity)),
        state.tax_rate,
    );

    let meta = Meta::count(items.len());
    let view = CartView {
        items,
        total: totals.subtotal,
        tax: totals.tax,
        grand_total: totals.grand_total,
    };
    Ok(ApiResponse::success("Cart", view, Some(meta)))
}

pub async fn add_to_cart(
    state: &AppState,
    session: &CartSession,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartItem>> {
    let quantity = payload.quantity.unwrap_or(1);
    if quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let product = Products::find_by_id(payload.product_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Product"))?;

    let line = CartActive {
        id: Set(Uuid::new_v4()),
        session_id: Set(session.as_str().to_owned()),
        product_id: Set(product.id),
        quantity: Set(quantity),
        added_at: Set(Utc::now().into()),
    };

    // Single statement so concurrent adds of the same product cannot lose an increment.
    // The conflict update is skipped when the sum would not fit the quantity column.
    let written = CartItems::insert(line)
        .on_conflict(
            OnConflict::columns([CartCol::SessionId, CartCol::ProductId])
                .value(
                    CartCol::Quantity,
                    Expr::col((CartItems, CartCol::Quantity)).add(quantity),
                )
                .action_and_where(
                    Expr::col((CartItems, CartCol::Quantity)).lte(i32::MAX - quantity),
                )
                .to_owned(),
        )
        .exec_without_returning(&state.orm)
        .await?;
    if written == 0 {
        return Err(AppError::BadRequest(format!(
            "quantity would exceed {} for this product",
            i32::MAX
        )));
    }

    let stored = CartItems::find()
        .filter(CartCol::SessionId.eq(session.as_str()))
        .filter(CartCol::ProductId.eq(product.id))
        .one(&state.orm)
        .await?
        .ok_or_else(|| {
            AppError::Integrity(format!(
                "cart line for product {} vanished after upsert",
                product.id
            ))
        })?;

    tracing::info!(
        session = %session,
        product_id = %product.id,
        added = quantity,
        quantity = stored.quantity,
        "added to cart"
    );

    Ok(ApiResponse::success(
        "Added to cart",
        cart_item_from_entity(stored, product),
        Some(Meta::empty()),
    ))
}

pub async fn update_cart_item(
    state: &AppState,
    session: &CartSession,
    id: Uuid,
    payload: UpdateCartItemRequest,
) -> AppResult<ApiResponse<CartItem>> {
    if payload.quantity <= 0 {
        delete_line(&state.orm, session, id).await?;
        return Ok(ApiResponse::message_only("Item removed from cart"));
    }

    let result = CartItems::update_many()
        .col_expr(CartCol::Quantity, Expr::value(payload.quantity))
        .filter(CartCol::Id.eq(id))
        .filter(CartCol::SessionId.eq(session.as_str()))
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Cart item"));
    }

    // A concurrent delete between the update and this read is still a 404.
    let (updated, product) = CartItems::find_by_id(id)
        .filter(CartCol::SessionId.eq(session.as_str()))
        .find_also_related(Products)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Cart item"))?;
    let product = product.ok_or_else(|| missing_product(&updated))?;

    tracing::info!(
        session = %session,
        cart_item_id = %id,
        quantity = updated.quantity,
        "cart item updated"
    );

    Ok(ApiResponse::success(
        "Cart item updated",
        cart_item_from_entity(updated, product),
        Some(Meta::empty()),
    ))
}

pub async fn remove_cart_item(
    state: &AppState,
    session: &CartSession,
    id: Uuid,
) -> AppResult<ApiResponse<RemovedCartItem>> {
    delete_line(&state.orm, session, id).await?;
    Ok(ApiResponse::success(
        "Item removed from cart",
        RemovedCartItem { id },
        Some(Meta::empty()),
    ))
}

/// Every line in the session's cart, oldest first, with products resolved.
///
/// A line whose product no longer exists is reported as an integrity error rather than
/// dropped, so totals are never computed over a partial cart.
pub async fn load_cart_items<C>(conn: &C, session: &CartSession) -> AppResult<Vec<CartItem>>
where
    C: ConnectionTrait,
{
    CartItems::find()
        .filter(CartCol::SessionId.eq(session.as_str()))
        .order_by_asc(CartCol::AddedAt)
        .order_by_asc(CartCol::Id)
        .find_also_related(Products)
        .all(conn)
        .await?
        .into_iter()
        .map(|(line, product)| match product {
            Some(product) => Ok(cart_item_from_entity(line, product)),
            None => Err(missing_product(&line)),
        })
        .collect()
}

async fn delete_line<C>(conn: &C, session: &CartSession, id: Uuid) -> AppResult<()>
where
    C: ConnectionTrait,
{
    let result = CartItems::delete_many()
        .filter(CartCol::Id.eq(id))
        .filter(CartCol::SessionId.eq(session.as_str()))
        .exec(conn)
        .await?;
    tracing::info!(
        session = %session,
        cart_item_id = %id,
        removed = result.rows_affected,
        "cart item removed"
    );
    Ok(())
}

fn missing_product(line: &CartModel) -> AppError {
    AppError::Integrity(format!(
        "cart item {} references missing product {}",
        line.id, line.product_id
    ))
}

fn cart_item_from_entity(line: CartModel, product: ProductModel) -> CartItem {
    CartItem {
        id: line.id,
        product: product_from_entity(product),
        quantity: line.quantity,
        added_at: line.added_at.with_timezone(&Utc),
    }
}
