//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use pdf_shala_core::ports::{DatabaseService, FileStore, PaymentGateway};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all
/// handlers. Each request is handled independently and statelessly; there is
/// no server-side session object.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub files: Arc<dyn FileStore>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub config: Arc<Config>,
}
