//! services/api/src/web/mod.rs
//!
//! The Axum handler modules and the master definition for the OpenAPI
//! specification.

pub mod auth;
pub mod catalog;
pub mod payment;
pub mod state;

pub use auth::{login_handler, register_handler, verify_handler};
pub use catalog::{
    add_product_handler, list_products_handler, remove_product_handler, update_product_handler,
};
pub use payment::{checkout_handler, verify_payment_handler};

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register_handler,
        auth::login_handler,
        auth::verify_handler,
        catalog::list_products_handler,
        catalog::add_product_handler,
        catalog::update_product_handler,
        catalog::remove_product_handler,
        payment::checkout_handler,
        payment::verify_payment_handler,
    ),
    components(
        schemas(
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::VerifyRequest,
            auth::UserResponse,
            auth::AuthResponse,
            catalog::ProductResponse,
            catalog::CreateProductResponse,
            payment::CheckoutRequest,
            payment::CheckoutCustomer,
            payment::CheckoutResponse,
            payment::VerifyPaymentRequest,
            payment::VerifyPaymentResponse,
            payment::OrderView,
        )
    ),
    tags(
        (name = "PDF SHALA API", description = "Storefront API for buying and downloading pdf documents.")
    )
)]
pub struct ApiDoc;
