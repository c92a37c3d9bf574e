//! crates/pdf_shala_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of specific external implementations like databases,
//! the filesystem, or the payment processor.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Customer, NewUser, PaymentOrder, PaymentSession, Product, User, UserCredentials};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g.,
/// database, file store, payment processor).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Payment order creation failed: {0}")]
    PaymentInit(String),
    #[error("Payment verification failed: {0}")]
    PaymentVerification(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- User Management ---
    async fn create_user(&self, new_user: NewUser, password_hash: &str) -> PortResult<User>;

    /// Returns `NotFound` when no user matches the email.
    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    // --- Catalog Management ---
    /// Returns the full collection; the catalog has no pagination.
    async fn list_products(&self) -> PortResult<Vec<Product>>;

    async fn get_product(&self, id: Uuid) -> PortResult<Product>;

    async fn create_product(
        &self,
        title: &str,
        price: f64,
        image: &str,
        pdf: &str,
    ) -> PortResult<Product>;

    async fn update_product(
        &self,
        id: Uuid,
        title: &str,
        price: f64,
        image: &str,
        pdf: &str,
    ) -> PortResult<Product>;

    /// Deletes the row and returns it, so callers can clean up the backing
    /// files afterwards. Returns `NotFound` if the id does not resolve.
    async fn delete_product(&self, id: Uuid) -> PortResult<Product>;
}

/// The content store holding uploaded images and pdfs. Filenames are the only
/// linkage between database rows and files.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Stores the bytes under a collision-free name derived from
    /// `original_name` and returns the stored filename.
    async fn save(&self, original_name: &str, bytes: &[u8]) -> PortResult<String>;

    /// Removes a stored file. Returns `NotFound` if it is already gone.
    async fn remove(&self, stored_name: &str) -> PortResult<()>;
}

/// The external payment processor (black-box collaborator).
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates an order with the processor and returns the hosted-checkout
    /// session handle. Fails with `PaymentInit` on any processor or network
    /// error; never retried automatically.
    async fn create_order(
        &self,
        order_id: &str,
        amount: f64,
        customer: &Customer,
    ) -> PortResult<PaymentSession>;

    /// Re-fetches the authoritative order state from the processor.
    async fn fetch_order(&self, order_id: &str) -> PortResult<PaymentOrder>;
}
