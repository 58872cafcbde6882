mod common;

use std::path::Path;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use storefront_api::app::build_app;
use tower::ServiceExt;

use common::{HEADPHONES, WATER_BOTTLE, seeded_state};

async fn app() -> anyhow::Result<Router> {
    let state = seeded_state().await?;
    let static_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("static");
    Ok(build_app(state, &static_dir))
}

struct Reply {
    status: StatusCode,
    session: Option<String>,
    body: Value,
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    session: Option<&str>,
    body: Option<Value>,
) -> anyhow::Result<Reply> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(session) = session {
        builder = builder.header("session-id", session);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let session = response
        .headers()
        .get("x-session-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok(Reply {
        status,
        session,
        body,
    })
}

async fn product_id(app: &Router, name: &str) -> anyhow::Result<String> {
    let reply = send(app, "GET", "/api/products", None, None).await?;
    let id = reply.body["data"]
        .as_array()
        .and_then(|items| items.iter().find(|p| p["name"] == name))
        .and_then(|p| p["id"].as_str())
        .map(str::to_owned)
        .expect("seeded product");
    Ok(id)
}

fn close_to(value: &Value, expected: f64) -> bool {
    value
        .as_f64()
        .is_some_and(|actual| (actual - expected).abs() < 1e-9)
}

#[tokio::test]
async fn products_are_listed_in_the_envelope() -> anyhow::Result<()> {
    let app = app().await?;
    let reply = send(&app, "GET", "/api/products", None, None).await?;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["message"], "Products");
    assert_eq!(reply.body["data"].as_array().map(Vec::len), Some(6));
    assert_eq!(reply.body["meta"]["total"], 6);
    let headphones = reply.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["name"] == HEADPHONES)
        .unwrap();
    assert!(close_to(&headphones["price"], 79.99));
    Ok(())
}

#[tokio::test]
async fn minted_session_is_echoed_and_reusable() -> anyhow::Result<()> {
    let app = app().await?;
    let headphones = product_id(&app, HEADPHONES).await?;

    let added = send(&app, "POST", "/api/cart", None, Some(json!({ "productId": headphones }))).await?;
    assert_eq!(added.status, StatusCode::OK);
    assert_eq!(added.body["data"]["quantity"], 1);
    assert_eq!(added.body["data"]["product"]["name"], HEADPHONES);
    let session = added.session.expect("minted session id");

    let cart = send(&app, "GET", "/api/cart", Some(&session), None).await?;
    assert_eq!(cart.session.as_deref(), Some(session.as_str()));
    assert_eq!(cart.body["data"]["items"].as_array().map(Vec::len), Some(1));

    let other = send(&app, "GET", "/api/cart", Some("someone-else"), None).await?;
    assert_eq!(other.body["data"]["items"].as_array().map(Vec::len), Some(0));
    Ok(())
}

#[tokio::test]
async fn cart_lifecycle_over_http() -> anyhow::Result<()> {
    let app = app().await?;
    let session = Some("http-lifecycle");
    let headphones = product_id(&app, HEADPHONES).await?;
    let bottle = product_id(&app, WATER_BOTTLE).await?;

    send(&app, "POST", "/api/cart", session, Some(json!({ "productId": headphones, "quantity": 1 }))).await?;
    let added = send(&app, "POST", "/api/cart", session, Some(json!({ "productId": bottle, "quantity": 3 }))).await?;
    let bottle_line = added.body["data"]["id"].as_str().unwrap().to_owned();

    let cart = send(&app, "GET", "/api/cart", session, None).await?;
    assert!(close_to(&cart.body["data"]["total"], 154.96));
    assert!(close_to(&cart.body["data"]["tax"], 12.40));
    assert!(close_to(&cart.body["data"]["grandTotal"], 167.36));

    let updated = send(
        &app,
        "PUT",
        &format!("/api/cart/{bottle_line}"),
        session,
        Some(json!({ "quantity": 0 })),
    )
    .await?;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["message"], "Item removed from cart");
    assert!(updated.body["data"].is_null());

    let removed = send(&app, "DELETE", &format!("/api/cart/{bottle_line}"), session, None).await?;
    assert_eq!(removed.status, StatusCode::OK);

    let receipt = send(
        &app,
        "POST",
        "/api/checkout",
        session,
        Some(json!({ "name": "Ada", "email": "ada@example.com" })),
    )
    .await?;
    assert_eq!(receipt.status, StatusCode::OK);
    let data = &receipt.body["data"];
    assert!(data["orderId"].as_str().unwrap().starts_with("ORD-"));
    assert!(close_to(&data["total"], 79.99));
    assert!(close_to(&data["grandTotal"], 86.39));
    assert_eq!(data["items"][0]["product"], HEADPHONES);

    let cart = send(&app, "GET", "/api/cart", session, None).await?;
    assert_eq!(cart.body["data"]["items"].as_array().map(Vec::len), Some(0));
    assert!(close_to(&cart.body["data"]["total"], 0.0));
    Ok(())
}

#[tokio::test]
async fn unknown_product_is_a_404() -> anyhow::Result<()> {
    let app = app().await?;
    let reply = send(
        &app,
        "POST",
        "/api/cart",
        Some("http-404"),
        Some(json!({ "productId": uuid::Uuid::new_v4() })),
    )
    .await?;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["data"]["error"], "Product not found");
    Ok(())
}

#[tokio::test]
async fn malformed_bodies_are_400s() -> anyhow::Result<()> {
    let app = app().await?;

    let reply = send(&app, "POST", "/api/cart", Some("http-400"), Some(json!({ "quantity": 2 }))).await?;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(reply.body["message"].as_str().unwrap().starts_with("Bad Request"));

    let reply = send(
        &app,
        "PUT",
        &format!("/api/cart/{}", uuid::Uuid::new_v4()),
        Some("http-400"),
        Some(json!({ "quantity": "lots" })),
    )
    .await?;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn malformed_ids_get_the_json_error_body() -> anyhow::Result<()> {
    let app = app().await?;
    let requests = [
        ("GET", "/api/products/not-a-uuid", None),
        ("DELETE", "/api/cart/not-a-uuid", None),
        ("PUT", "/api/cart/not-a-uuid", Some(json!({ "quantity": 1 }))),
    ];

    for (method, uri, body) in requests {
        let reply = send(&app, method, uri, Some("http-bad-id"), body).await?;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST, "{method} {uri}");
        assert!(reply.body["message"].as_str().unwrap().starts_with("Bad Request"));
        assert!(reply.body["data"]["error"].is_string());
    }
    Ok(())
}

#[tokio::test]
async fn invalid_session_header_is_rejected() -> anyhow::Result<()> {
    let app = app().await?;
    let reply = send(&app, "GET", "/api/cart", Some("not a valid id!"), None).await?;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn health_is_served_at_root_and_under_api() -> anyhow::Result<()> {
    let app = app().await?;
    for uri in ["/health", "/api/health"] {
        let reply = send(&app, "GET", uri, None, None).await?;
        assert_eq!(reply.status, StatusCode::OK, "{uri}");
        assert_eq!(reply.body["data"]["status"], "OK");
        assert_eq!(reply.body["data"]["database"], "Connected");
        assert!(reply.body["data"]["timestamp"].is_string());
    }
    Ok(())
}

#[tokio::test]
async fn unknown_paths_get_a_json_404() -> anyhow::Result<()> {
    let app = app().await?;
    let reply = send(&app, "GET", "/api/nothing-here", None, None).await?;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["data"]["path"], "/api/nothing-here");
    Ok(())
}

#[tokio::test]
async fn storefront_page_is_served_at_root() -> anyhow::Result<()> {
    let app = app().await?;
    let request = Request::builder().uri("/").body(Body::empty())?;
    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    assert!(String::from_utf8_lossy(&bytes).contains("<title>Storefront</title>"));
    Ok(())
}

#[tokio::test]
async fn single_product_lookup() -> anyhow::Result<()> {
    let app = app().await?;
    let id = product_id(&app, WATER_BOTTLE).await?;

    let found = send(&app, "GET", &format!("/api/products/{id}"), None, None).await?;
    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.body["data"]["name"], WATER_BOTTLE);
    assert!(close_to(&found.body["data"]["price"], 24.99));

    let missing = send(
        &app,
        "GET",
        &format!("/api/products/{}", uuid::Uuid::new_v4()),
        None,
        None,
    )
    .await?;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    Ok(())
}
