//! HTTP boundary
//!
//! Thin axum mapping from JSON requests onto [`ProductRegistry`]. Response
//! bodies use camelCase field names.

pub mod dto;
pub mod errors;
pub mod routes;

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::ledger::Ledger;
use crate::registry::ProductRegistry;

pub fn router<L: Ledger + 'static>(registry: Arc<ProductRegistry<L>>) -> Router {
    Router::new()
        .route("/api/health", get(routes::health::<L>))
        .route(
            "/api/products",
            get(routes::list_products::<L>).post(routes::register_product::<L>),
        )
        .route("/api/products/:nfc_id", get(routes::fetch_product::<L>))
        .route("/api/products/:nfc_id/verify", get(routes::verify_product::<L>))
        .with_state(registry)
}
