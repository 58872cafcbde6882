mod common;

use std::time::Duration;

use rust_decimal::Decimal;
use storefront_api::{
    dto::{cart::AddToCartRequest, checkout::CheckoutRequest},
    error::AppError,
    pricing::round_money,
    services::{cart_service, checkout_service},
    session::CartSession,
    state::AppState,
};
use uuid::Uuid;

use common::{HEADPHONES, MUG_SET, WATER_BOTTLE, catalog, seeded_state, session};

fn customer() -> CheckoutRequest {
    CheckoutRequest {
        name: "Ada Lovelace".into(),
        email: "ada@example.com".into(),
        address: Some("12 Analytical Row".into()),
    }
}

async fn add(
    state: &AppState,
    cart: &CartSession,
    product_id: Uuid,
    quantity: i32,
) -> anyhow::Result<()> {
    cart_service::add_to_cart(
        state,
        cart,
        AddToCartRequest {
            product_id,
            quantity: Some(quantity),
        },
    )
    .await?;
    Ok(())
}

#[tokio::test]
async fn checkout_builds_receipt_and_empties_the_cart() -> anyhow::Result<()> {
    let state = seeded_state().await?;
    let cart = session("checkout");
    let products = catalog(&state).await?;
    add(&state, &cart, products[HEADPHONES].id, 1).await?;
    add(&state, &cart, products[WATER_BOTTLE].id, 3).await?;

    let receipt = checkout_service::checkout(&state, &cart, customer())
        .await?
        .data
        .unwrap();

    assert!(receipt.order_id.starts_with("ORD-"));
    assert_eq!(receipt.customer.name, "Ada Lovelace");
    assert_eq!(receipt.customer.email, "ada@example.com");
    assert_eq!(receipt.customer.address.as_deref(), Some("12 Analytical Row"));

    assert_eq!(receipt.items.len(), 2);
    let bottles = receipt
        .items
        .iter()
        .find(|line| line.product == WATER_BOTTLE)
        .expect("water bottle line");
    assert_eq!(bottles.quantity, 3);
    assert_eq!(bottles.price, Decimal::new(2499, 2));
    assert_eq!(bottles.subtotal, Decimal::new(7497, 2));

    assert_eq!(receipt.total, Decimal::new(15496, 2));
    assert_eq!(receipt.tax, Decimal::new(1240, 2));
    assert_eq!(
        receipt.grand_total,
        round_money(receipt.total * Decimal::new(108, 2))
    );

    let view = cart_service::get_cart(&state, &cart).await?.data.unwrap();
    assert!(view.items.is_empty());
    assert_eq!(view.total, Decimal::ZERO);
    Ok(())
}

#[tokio::test]
async fn receipt_totals_match_the_cart_view() -> anyhow::Result<()> {
    let state = seeded_state().await?;
    let cart = session("agree");
    let products = catalog(&state).await?;
    add(&state, &cart, products[MUG_SET].id, 7).await?;
    add(&state, &cart, products[HEADPHONES].id, 2).await?;

    let view = cart_service::get_cart(&state, &cart).await?.data.unwrap();
    let receipt = checkout_service::checkout(&state, &cart, customer())
        .await?
        .data
        .unwrap();

    assert_eq!(receipt.total, view.total);
    assert_eq!(receipt.tax, view.tax);
    assert_eq!(receipt.grand_total, view.grand_total);
    Ok(())
}

#[tokio::test]
async fn checkout_of_an_empty_cart_is_rejected() -> anyhow::Result<()> {
    let state = seeded_state().await?;
    let result = checkout_service::checkout(&state, &session("nothing"), customer()).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
    Ok(())
}

#[tokio::test]
async fn invalid_customer_leaves_the_cart_untouched() -> anyhow::Result<()> {
    let state = seeded_state().await?;
    let cart = session("invalid");
    let products = catalog(&state).await?;
    add(&state, &cart, products[HEADPHONES].id, 1).await?;

    let mut request = customer();
    request.email = "not-an-email".into();
    let result = checkout_service::checkout(&state, &cart, request).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let view = cart_service::get_cart(&state, &cart).await?.data.unwrap();
    assert_eq!(view.items.len(), 1);
    Ok(())
}

#[tokio::test]
async fn checkout_only_clears_the_callers_cart() -> anyhow::Result<()> {
    let state = seeded_state().await?;
    let mine = session("mine");
    let theirs = session("theirs");
    let products = catalog(&state).await?;
    add(&state, &mine, products[HEADPHONES].id, 1).await?;
    add(&state, &theirs, products[MUG_SET].id, 2).await?;

    checkout_service::checkout(&state, &mine, customer()).await?;

    let view = cart_service::get_cart(&state, &theirs).await?.data.unwrap();
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items[0].quantity, 2);
    Ok(())
}

#[tokio::test]
async fn order_ids_are_unique_across_checkouts() -> anyhow::Result<()> {
    let state = seeded_state().await?;
    let cart = session("repeat");
    let headphones = catalog(&state).await?[HEADPHONES].id;

    add(&state, &cart, headphones, 1).await?;
    let first = checkout_service::checkout(&state, &cart, customer())
        .await?
        .data
        .unwrap();

    std::thread::sleep(Duration::from_millis(5));

    add(&state, &cart, headphones, 1).await?;
    let second = checkout_service::checkout(&state, &cart, customer())
        .await?
        .data
        .unwrap();

    assert_ne!(first.order_id, second.order_id);
    assert!(second.timestamp > first.timestamp);
    Ok(())
}
