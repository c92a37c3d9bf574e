//! services/api/src/adapters/cashfree.rs
//!
//! This module contains the adapter for the Cashfree payment gateway. It
//! implements the `PaymentGateway` port from the `core` crate against the
//! processor's REST API (order creation and order fetch).

use async_trait::async_trait;
use pdf_shala_core::domain::{Customer, OrderStatus, PaymentOrder, PaymentSession};
use pdf_shala_core::ports::{PaymentGateway, PortError, PortResult};
use rand::RngCore;
use serde::{Deserialize, Serialize};

const API_VERSION: &str = "2023-08-01";
const ORDER_CURRENCY: &str = "INR";

/// Generates a fresh pseudo-random order id: 16 random bytes, hex-encoded
/// and truncated to 20 characters.
pub fn generate_order_id() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    let mut hex = String::with_capacity(32);
    for b in bytes {
        hex.push_str(&format!("{:02x}", b));
    }
    hex.truncate(20);
    hex
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `PaymentGateway` port using the Cashfree
/// sandbox/production REST API.
#[derive(Clone)]
pub struct CashfreeGateway {
    http: reqwest::Client,
    base_url: String,
    app_id: String,
    secret_key: String,
}

impl CashfreeGateway {
    /// Creates a new `CashfreeGateway`.
    pub fn new(base_url: String, app_id: String, secret_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            app_id,
            secret_key,
        }
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("x-client-id", &self.app_id)
            .header("x-client-secret", &self.secret_key)
            .header("x-api-version", API_VERSION)
    }
}

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Serialize)]
struct CreateOrderRequest<'a> {
    order_id: &'a str,
    order_amount: f64,
    order_currency: &'a str,
    customer_details: CustomerDetails<'a>,
}

#[derive(Serialize)]
struct CustomerDetails<'a> {
    customer_id: &'a str,
    customer_email: &'a str,
    customer_phone: &'a str,
    customer_name: &'a str,
}

#[derive(Deserialize)]
struct CreateOrderResponse {
    order_id: String,
    payment_session_id: String,
}

#[derive(Deserialize)]
struct FetchOrderResponse {
    order_id: String,
    order_status: String,
    order_amount: f64,
}

//=========================================================================================
// `PaymentGateway` Trait Implementation
//=========================================================================================

#[async_trait]
impl PaymentGateway for CashfreeGateway {
    async fn create_order(
        &self,
        order_id: &str,
        amount: f64,
        customer: &Customer,
    ) -> PortResult<PaymentSession> {
        let request = CreateOrderRequest {
            order_id,
            order_amount: amount,
            order_currency: ORDER_CURRENCY,
            customer_details: CustomerDetails {
                customer_id: &customer.id,
                customer_email: &customer.email,
                customer_phone: &customer.phone,
                customer_name: &customer.name,
            },
        };

        let response = self
            .authed(self.http.post(format!("{}/orders", self.base_url)))
            .json(&request)
            .send()
            .await
            .map_err(|e| PortError::PaymentInit(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PortError::PaymentInit(format!(
                "processor returned {}: {}",
                status, body
            )));
        }

        let body: CreateOrderResponse = response
            .json()
            .await
            .map_err(|e| PortError::PaymentInit(e.to_string()))?;

        Ok(PaymentSession {
            order_id: body.order_id,
            payment_session_id: body.payment_session_id,
        })
    }

    async fn fetch_order(&self, order_id: &str) -> PortResult<PaymentOrder> {
        let response = self
            .authed(
                self.http
                    .get(format!("{}/orders/{}", self.base_url, order_id)),
            )
            .send()
            .await
            .map_err(|e| PortError::PaymentVerification(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PortError::PaymentVerification(format!(
                "processor returned {}: {}",
                status, body
            )));
        }

        let body: FetchOrderResponse = response
            .json()
            .await
            .map_err(|e| PortError::PaymentVerification(e.to_string()))?;

        Ok(PaymentOrder {
            order_id: body.order_id,
            status: OrderStatus::from_processor(&body.order_status),
            amount: body.order_amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_ids_are_twenty_hex_chars() {
        let id = generate_order_id();
        assert_eq!(id.len(), 20);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn order_ids_are_unique_enough() {
        assert_ne!(generate_order_id(), generate_order_id());
    }

    #[test]
    fn processor_statuses_map_onto_order_status() {
        assert!(OrderStatus::from_processor("PAID").is_paid());
        assert!(!OrderStatus::from_processor("ACTIVE").is_paid());
        assert!(!OrderStatus::from_processor("EXPIRED").is_paid());
        assert!(!OrderStatus::from_processor("whatever").is_paid());
    }
}
