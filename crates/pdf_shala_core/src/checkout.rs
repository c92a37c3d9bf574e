//! crates/pdf_shala_core/src/checkout.rs
//!
//! Checkout orchestration against the external payment processor.
//!
//! The flow is two server-side calls around the processor's hosted checkout
//! UI: create an order for the cart's grand total, then re-fetch the order
//! status as the source of truth before the purchase is completed. A
//! client-supplied "success" flag is never trusted.

use chrono::NaiveDate;

use crate::cart::{Cart, LibraryItem};
use crate::domain::{Customer, PaymentSession};
use crate::ports::{PaymentGateway, PortError, PortResult};

/// Orchestrates a single checkout against the processor port.
pub struct CheckoutFlow<'a> {
    gateway: &'a dyn PaymentGateway,
}

impl<'a> CheckoutFlow<'a> {
    pub fn new(gateway: &'a dyn PaymentGateway) -> Self {
        Self { gateway }
    }

    /// Requests a payment session for the cart's grand total. The caller
    /// supplies a freshly generated order id; a failed request is reported,
    /// not retried.
    pub async fn begin(
        &self,
        cart: &Cart,
        customer: &Customer,
        order_id: &str,
    ) -> PortResult<PaymentSession> {
        if cart.is_empty() {
            return Err(PortError::Validation("Your cart is empty".to_string()));
        }
        self.gateway
            .create_order(order_id, cart.grand_total(), customer)
            .await
    }

    /// Re-fetches the order from the processor and, only on a confirmed
    /// paid status, converts the cart's lines into library items and empties
    /// it. Any other status leaves the cart untouched (no partial purchase).
    pub async fn confirm(
        &self,
        cart: &mut Cart,
        order_id: &str,
        date: NaiveDate,
    ) -> PortResult<Vec<LibraryItem>> {
        let order = self.gateway.fetch_order(order_id).await?;
        if !order.status.is_paid() {
            return Err(PortError::PaymentVerification(format!(
                "order {} has status {}",
                order.order_id,
                order.status.as_str()
            )));
        }
        Ok(cart.complete_purchase(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartLine;
    use crate::domain::{OrderStatus, PaymentOrder};
    use async_trait::async_trait;
    use uuid::Uuid;

    /// A scripted gateway standing in for the processor.
    struct ScriptedGateway {
        create_fails: bool,
        fetch_status: OrderStatus,
    }

    #[async_trait]
    impl PaymentGateway for ScriptedGateway {
        async fn create_order(
            &self,
            order_id: &str,
            amount: f64,
            _customer: &Customer,
        ) -> PortResult<PaymentSession> {
            if self.create_fails {
                return Err(PortError::PaymentInit("connection refused".to_string()));
            }
            Ok(PaymentSession {
                order_id: order_id.to_string(),
                payment_session_id: format!("session-{}-{}", order_id, amount),
            })
        }

        async fn fetch_order(&self, order_id: &str) -> PortResult<PaymentOrder> {
            Ok(PaymentOrder {
                order_id: order_id.to_string(),
                status: self.fetch_status,
                amount: 0.0,
            })
        }
    }

    fn populated_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_line(CartLine {
            product_id: Uuid::new_v4(),
            title: "JavaScript Essentials".to_string(),
            price: 399.0,
            image: "js-essentials.png".to_string(),
            qty: 1,
        });
        cart
    }

    fn customer() -> Customer {
        Customer {
            id: "CUST_123456789".to_string(),
            name: "Asha".to_string(),
            email: "a@b.com".to_string(),
            phone: "9999999999".to_string(),
        }
    }

    #[tokio::test]
    async fn begin_rejects_an_empty_cart() {
        let gateway = ScriptedGateway {
            create_fails: false,
            fetch_status: OrderStatus::Active,
        };
        let flow = CheckoutFlow::new(&gateway);
        let err = flow
            .begin(&Cart::new(), &customer(), "ord1")
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Validation(_)));
    }

    #[tokio::test]
    async fn begin_surfaces_processor_failure_as_payment_init() {
        let gateway = ScriptedGateway {
            create_fails: true,
            fetch_status: OrderStatus::Active,
        };
        let flow = CheckoutFlow::new(&gateway);
        let err = flow
            .begin(&populated_cart(), &customer(), "ord1")
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::PaymentInit(_)));
    }

    #[tokio::test]
    async fn paid_order_completes_the_purchase() {
        let gateway = ScriptedGateway {
            create_fails: false,
            fetch_status: OrderStatus::Paid,
        };
        let flow = CheckoutFlow::new(&gateway);
        let mut cart = populated_cart();
        let date = NaiveDate::from_ymd_opt(2026, 8, 23).unwrap();

        let library = flow.confirm(&mut cart, "ord1", date).await.unwrap();

        assert_eq!(library.len(), 1);
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn unpaid_order_leaves_the_cart_untouched() {
        let gateway = ScriptedGateway {
            create_fails: false,
            fetch_status: OrderStatus::Active,
        };
        let flow = CheckoutFlow::new(&gateway);
        let mut cart = populated_cart();
        let date = NaiveDate::from_ymd_opt(2026, 8, 23).unwrap();

        let err = flow.confirm(&mut cart, "ord1", date).await.unwrap_err();

        assert!(matches!(err, PortError::PaymentVerification(_)));
        assert_eq!(cart.lines().len(), 1);
    }
}
