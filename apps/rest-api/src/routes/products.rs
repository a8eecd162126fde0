//! Product search endpoint for the POS screen.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use kirana_core::validation::validate_search_query;
use kirana_core::{CoreError, Product};
use kirana_db::ProductSearchFilter;

use crate::error::ApiError;
use crate::AppState;

/// Query parameters for product search. All optional; a bare request
/// returns the first page of active products.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSearchQuery {
    /// Free-text query against name/brand/model.
    pub q: Option<String>,
    /// Exact barcode (scanner input); overrides the other filters.
    pub barcode: Option<String>,
    pub category: Option<String>,
    /// Only products with stock on hand.
    #[serde(default)]
    pub in_stock: bool,
    pub limit: Option<u32>,
}

/// A search hit: the product plus its derived low-stock flag, so the
/// POS screen can highlight items that need reordering.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductHit {
    #[serde(flatten)]
    pub product: Product,
    pub low_stock: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSearchResponse {
    pub products: Vec<ProductHit>,
}

/// `GET /api/products/search`
pub async fn search_products(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProductSearchQuery>,
) -> Result<Json<ProductSearchResponse>, ApiError> {
    let text = match query.q.as_deref() {
        Some(q) => Some(validate_search_query(q).map_err(CoreError::from)?),
        None => None,
    };

    let filter = ProductSearchFilter {
        query: text,
        barcode: query.barcode,
        category: query.category,
        in_stock: query.in_stock,
        limit: query.limit.unwrap_or(0),
    };

    let products = state
        .db
        .products()
        .search(&filter)
        .await?
        .into_iter()
        .map(|product| ProductHit {
            low_stock: product.is_low_stock(),
            product,
        })
        .collect();

    Ok(Json(ProductSearchResponse { products }))
}
