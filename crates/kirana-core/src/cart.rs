//! # Cart Preview
//!
//! Prices a prospective sale without committing it: the counter screen
//! shows live totals and GST while the cart is still being assembled.
//!
//! [`preview`] runs the same validation, stock check and tax math as the
//! sale transactor, but deducts nothing and claims no invoice number.
//! The caller supplies the current product rows; this module stays pure.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::gst::{scale_for_discount, split_inclusive, GstBreakdown};
use crate::money::Money;
use crate::types::{Product, SaleRequest};
use crate::validation::validate_sale_request;

/// One priced cart line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,
    pub name: String,
    pub hsn_code: String,
    pub quantity: i64,
    /// On-hand stock at preview time, so the screen can warn early.
    pub available_quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
    pub gst_rate_bps: u32,
    pub gst: GstBreakdown,
}

/// The priced cart: per-line detail plus bill-level totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPreview {
    pub lines: Vec<CartLine>,
    pub subtotal: Money,
    pub discount: Money,
    /// Amount that would be charged: `max(0, subtotal - discount)`.
    pub total: Money,
    /// GST that would be recorded, post-discount scaling.
    pub gst_total: Money,
}

/// Prices a sale request against current product rows.
///
/// `products` must be aligned with `request.lines` (one row per line, in
/// order); the repository resolves ids to rows before calling. Fails
/// with the same errors the transactor would: validation problems or
/// insufficient stock. The preview is advisory only; stock can change
/// before the sale is actually processed.
pub fn preview(request: &SaleRequest, products: &[Product]) -> CoreResult<CartPreview> {
    validate_sale_request(request)?;
    debug_assert_eq!(request.lines.len(), products.len());

    let mut subtotal = Money::zero();
    let mut gst_accumulated = Money::zero();
    let mut lines = Vec::with_capacity(request.lines.len());

    for (line_req, product) in request.lines.iter().zip(products) {
        if product.quantity < line_req.quantity {
            return Err(CoreError::InsufficientStock {
                name: product.name.clone(),
                available: product.quantity,
                requested: line_req.quantity,
            });
        }

        let line_total = product.price().multiply_quantity(line_req.quantity);
        let gst = split_inclusive(line_total, product.gst_rate(), request.inter_state);

        subtotal += line_total;
        gst_accumulated += gst.total;

        lines.push(CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            hsn_code: product.hsn_code().to_string(),
            quantity: line_req.quantity,
            available_quantity: product.quantity,
            unit_price: product.price(),
            line_total,
            gst_rate_bps: product.gst_rate_bps,
            gst,
        });
    }

    let discount = Money::from_paise(request.discount_paise);
    let total = subtotal.sub_floor_zero(discount);
    let gst_total = scale_for_discount(gst_accumulated, total, subtotal);

    Ok(CartPreview {
        lines,
        subtotal,
        discount,
        total,
        gst_total,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
