//! crates/pdf_shala_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use uuid::Uuid;

/// Represents a registered account, as exposed to the rest of the app.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub last_name: String,
    pub email: String,
    pub mobile_number: String,
    pub is_admin: bool,
}

// Only used internally for login/verify - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// The fields supplied at registration time, before a password hash exists.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub last_name: String,
    pub email: String,
    pub mobile_number: String,
}

/// A catalog entry. Invariant: a persisted product always references an
/// image filename and a pdf filename that exist in the content store.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    pub image: String,
    pub pdf: String,
    pub rating: f64,
    pub reviews: i32,
    pub downloads: i32,
}

/// The customer identity submitted to the payment processor with an order.
#[derive(Debug, Clone)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Returned by the processor when an order is created. The session id is
/// handed to the processor's hosted checkout UI by the client.
#[derive(Debug, Clone)]
pub struct PaymentSession {
    pub order_id: String,
    pub payment_session_id: String,
}

/// An order as reported back by the payment processor. The processor is the
/// source of truth for its status.
#[derive(Debug, Clone)]
pub struct PaymentOrder {
    pub order_id: String,
    pub status: OrderStatus,
    pub amount: f64,
}

/// Processor-side order states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Active,
    Paid,
    Expired,
    Terminated,
    Unknown,
}

impl OrderStatus {
    /// Only a processor-confirmed `Paid` completes a purchase.
    pub fn is_paid(&self) -> bool {
        matches!(self, OrderStatus::Paid)
    }

    /// Parses the processor's status string. Anything unrecognized maps to
    /// `Unknown`, which is never treated as paid.
    pub fn from_processor(s: &str) -> Self {
        match s {
            "ACTIVE" => OrderStatus::Active,
            "PAID" => OrderStatus::Paid,
            "EXPIRED" => OrderStatus::Expired,
            "TERMINATED" | "TERMINATION_REQUESTED" => OrderStatus::Terminated,
            _ => OrderStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Active => "ACTIVE",
            OrderStatus::Paid => "PAID",
            OrderStatus::Expired => "EXPIRED",
            OrderStatus::Terminated => "TERMINATED",
            OrderStatus::Unknown => "UNKNOWN",
        }
    }
}
