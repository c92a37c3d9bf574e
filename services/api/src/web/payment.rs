//! services/api/src/web/payment.rs
//!
//! Payment endpoints: create an order with the external processor and verify
//! its status afterwards. The processor is the source of truth; a
//! client-supplied "success" flag is never trusted.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use pdf_shala_core::domain::Customer;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;

use crate::adapters::cashfree::generate_order_id;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutCustomer {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub mobile_number: String,
}

#[derive(Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub amount: f64,
    pub user: CheckoutCustomer,
}

#[derive(Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub success: bool,
    pub order_id: String,
    pub payment_session_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct VerifyPaymentRequest {
    pub order_id: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct OrderView {
    pub order_id: String,
    pub order_status: String,
    pub order_amount: f64,
}

#[derive(Serialize, ToSchema)]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub order: OrderView,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /payment/checkout - Create a processor order for the given amount.
///
/// The server generates a fresh pseudo-random order id and submits it with
/// the amount and the customer identity. A failed request is reported to the
/// caller, never retried.
#[utoipa::path(
    post,
    path = "/payment/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Order created", body = CheckoutResponse),
        (status = 500, description = "Processor or network error")
    )
)]
pub async fn checkout_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CheckoutRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let customer = Customer {
        id: "CUST_123456789".to_string(),
        name: req.user.username,
        email: req.user.email,
        phone: req.user.mobile_number,
    };

    let order_id = generate_order_id();
    let session = state
        .gateway
        .create_order(&order_id, req.amount, &customer)
        .await
        .map_err(|e| {
            error!("Order creation error: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create order".to_string(),
            )
        })?;

    Ok((
        StatusCode::OK,
        Json(CheckoutResponse {
            success: true,
            order_id: session.order_id,
            payment_session_id: session.payment_session_id,
        }),
    ))
}

/// POST /payment/verify - Re-fetch the order status from the processor.
///
/// `success` is true only when the processor reports the order as paid; any
/// other status leaves the purchase incomplete.
#[utoipa::path(
    post,
    path = "/payment/verify",
    request_body = VerifyPaymentRequest,
    responses(
        (status = 200, description = "Order state as reported by the processor", body = VerifyPaymentResponse),
        (status = 400, description = "Missing order_id"),
        (status = 500, description = "Processor or network error")
    )
)]
pub async fn verify_payment_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VerifyPaymentRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let order_id = req
        .order_id
        .filter(|id| !id.trim().is_empty())
        .ok_or((StatusCode::BAD_REQUEST, "Missing order_id".to_string()))?;

    let order = state.gateway.fetch_order(&order_id).await.map_err(|e| {
        error!("Payment verification error: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Verification failed".to_string(),
        )
    })?;

    Ok((
        StatusCode::OK,
        Json(VerifyPaymentResponse {
            success: order.status.is_paid(),
            order: OrderView {
                order_id: order.order_id,
                order_status: order.status.as_str().to_string(),
                order_amount: order.amount,
            },
        }),
    ))
}
