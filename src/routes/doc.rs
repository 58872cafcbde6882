use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        cart::{AddToCartRequest, CartView, RemovedCartItem, UpdateCartItemRequest},
        checkout::{CheckoutRequest, Customer, Receipt, ReceiptLine},
        products::ProductList,
    },
    models::{CartItem, Product},
    response::{ApiResponse, Meta},
    routes::{cart, checkout, health, products},
};

struct SessionAddon;

impl Modify for SessionAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "session_id",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "session-id",
                "Cart session; minted and echoed in x-session-id when omitted",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::get_product,
        cart::get_cart,
        cart::add_to_cart,
        cart::update_cart_item,
        cart::remove_cart_item,
        checkout::checkout
    ),
    components(
        schemas(
            Product,
            CartItem,
            ProductList,
            AddToCartRequest,
            UpdateCartItemRequest,
            CartView,
            RemovedCartItem,
            CheckoutRequest,
            Customer,
            ReceiptLine,
            Receipt,
            health::HealthData,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<CartView>,
            ApiResponse<CartItem>,
            ApiResponse<Receipt>
        )
    ),
    modifiers(&SessionAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Cart", description = "Session cart endpoints"),
        (name = "Checkout", description = "Checkout endpoint"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
