//! Sale endpoints: creation, retrieval, listing.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use kirana_core::invoice::compose;
use kirana_core::{CartPreview, Invoice, PaymentMode, Sale, SaleLine, SaleRequest};
use kirana_db::SaleListFilter;

use crate::error::ApiError;
use crate::AppState;

/// Response for a created or fetched sale: the persisted record, its
/// lines and the composed invoice document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleResponse {
    pub sale: Sale,
    pub lines: Vec<SaleLine>,
    pub invoice: Invoice,
}

/// `POST /api/sales`
///
/// Processes the sale atomically and returns 201 with the invoice.
pub async fn create_sale(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SaleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let processed = state.db.sales().process_sale(&request).await?;

    info!(
        invoice = %processed.sale.invoice_number,
        total_paise = processed.sale.total_paise,
        "Sale created"
    );

    let invoice = compose(&processed.sale, &processed.lines, &state.company);

    Ok((
        StatusCode::CREATED,
        Json(SaleResponse {
            sale: processed.sale,
            lines: processed.lines,
            invoice,
        }),
    ))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPreviewResponse {
    pub cart: CartPreview,
}

/// `POST /api/sales/cart`
///
/// Prices the cart against current stock without persisting anything;
/// the POS screen polls this while the cart is assembled.
pub async fn preview_cart(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SaleRequest>,
) -> Result<Json<CartPreviewResponse>, ApiError> {
    let cart = state.db.sales().preview(&request).await?;
    Ok(Json(CartPreviewResponse { cart }))
}

/// `GET /api/sales/{id}`
pub async fn get_sale(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SaleResponse>, ApiError> {
    let processed = state
        .db
        .sales()
        .get_with_lines(&id)
        .await?
        .ok_or_else(|| ApiError::sale_not_found(&id))?;

    let invoice = compose(&processed.sale, &processed.lines, &state.company);

    Ok(Json(SaleResponse {
        sale: processed.sale,
        lines: processed.lines,
        invoice,
    }))
}

/// Query parameters for the sale listing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleListQuery {
    /// RFC 3339 instant; sales created at or after it.
    pub start_date: Option<DateTime<Utc>>,
    /// RFC 3339 instant; sales created strictly before it.
    pub end_date: Option<DateTime<Utc>>,
    pub payment_mode: Option<PaymentMode>,
    pub min_total_paise: Option<i64>,
    pub max_total_paise: Option<i64>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total_count: i64,
    pub total_pages: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleListResponse {
    pub sales: Vec<Sale>,
    pub pagination: Pagination,
}

/// `GET /api/sales`
pub async fn list_sales(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SaleListQuery>,
) -> Result<Json<SaleListResponse>, ApiError> {
    let filter = SaleListFilter {
        start_date: query.start_date,
        end_date: query.end_date,
        payment_mode: query.payment_mode,
        min_total_paise: query.min_total_paise,
        max_total_paise: query.max_total_paise,
        page: query.page.unwrap_or(1),
        page_size: query.page_size.unwrap_or(0),
    };

    let page = state.db.sales().list(&filter).await?;

    let total_pages = if page.total_count == 0 {
        0
    } else {
        (page.total_count + page.page_size as i64 - 1) / page.page_size as i64
    };

    Ok(Json(SaleListResponse {
        sales: page.sales,
        pagination: Pagination {
            page: page.page,
            page_size: page.page_size,
            total_count: page.total_count,
            total_pages,
        },
    }))
}
