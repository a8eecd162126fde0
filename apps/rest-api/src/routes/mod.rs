//! HTTP route handlers.
//!
//! ```text
//! POST /api/sales              process a sale, returns the invoice
//! POST /api/sales/cart         price a cart without committing it
//! GET  /api/sales              filtered listing with pagination
//! GET  /api/sales/{id}         one sale with lines and invoice
//! GET  /api/products/search    POS product search
//! GET  /health                 liveness + database check
//! ```

pub mod products;
pub mod sales;

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::AppState;

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/sales", post(sales::create_sale).get(sales::list_sales))
        .route("/api/sales/cart", post(sales::preview_cart))
        .route("/api/sales/{id}", get(sales::get_sale))
        .route("/api/products/search", get(products::search_products))
        .route("/health", get(health_handler))
        .with_state(state)
}

async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database_ok = state.db.health_check().await;
    Json(json!({
        "status": if database_ok { "ok" } else { "degraded" },
        "database": database_ok,
    }))
}
