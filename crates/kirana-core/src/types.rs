//! # Domain Types
//!
//! Core domain types for the shop: products, sales, sale lines and the
//! requests that create them.
//!
//! ## Snapshot Pattern
//! A `SaleLine` freezes the product's name, price and GST rate at the
//! moment of sale. Later catalog edits never change what a past invoice
//! says the customer paid.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::{HSN_CODE_ACCESSORIES, HSN_CODE_MOBILE, MOBILE_PHONE_CATEGORY};

// =============================================================================
// GST Rate
// =============================================================================

/// GST rate represented in basis points (bps).
///
/// 1 basis point = 0.01% = 1/10000; 1800 bps = 18% (standard rate for
/// mobile phones and accessories).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GstRate(u32);

impl GstRate {
    /// Creates a GST rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        GstRate(bps)
    }

    /// Creates a GST rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        GstRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero GST rate.
    #[inline]
    pub const fn zero() -> Self {
        GstRate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for GstRate {
    fn default() -> Self {
        GstRate::zero()
    }
}

// =============================================================================
// Payment Mode
// =============================================================================

/// How the customer paid.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMode {
    /// Physical cash.
    Cash,
    /// UPI transfer (PhonePe, GPay, etc.).
    Upi,
    /// Card on external terminal.
    Card,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product available for sale.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on the POS screen and invoice.
    pub name: String,

    /// Brand (e.g. "Samsung").
    pub brand: String,

    /// Model (e.g. "Galaxy M34").
    pub model: String,

    /// Category; drives the HSN code on invoices.
    pub category: String,

    /// Unit selling price in paise, GST-inclusive.
    pub price_paise: i64,

    /// GST rate in basis points (1800 = 18%).
    pub gst_rate_bps: u32,

    /// On-hand quantity. Never negative at rest between transactions.
    pub quantity: i64,

    /// Quantity at or below which the product counts as low stock.
    pub low_stock_threshold: i64,

    /// Barcode (EAN-13 etc.), if labelled.
    pub barcode: Option<String>,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_paise(self.price_paise)
    }

    /// Returns the GST rate.
    #[inline]
    pub fn gst_rate(&self) -> GstRate {
        GstRate::from_bps(self.gst_rate_bps)
    }

    /// Whether on-hand quantity has fallen to the reorder threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.low_stock_threshold
    }

    /// HSN code for this product's invoice line.
    #[inline]
    pub fn hsn_code(&self) -> &'static str {
        hsn_code_for_category(&self.category)
    }
}

/// Fixed two-value HSN lookup: mobile phones versus everything else.
pub fn hsn_code_for_category(category: &str) -> &'static str {
    if category == MOBILE_PHONE_CATEGORY {
        HSN_CODE_MOBILE
    } else {
        HSN_CODE_ACCESSORIES
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A completed sale. Immutable once persisted.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,

    /// GST invoice number, claimed atomically at creation time and never
    /// recomputed (format `KM/2024-25/0001`).
    pub invoice_number: String,

    pub payment_mode: PaymentMode,

    /// Sum of line totals before discount, in paise.
    pub subtotal_paise: i64,

    /// Flat discount applied to the whole bill, in paise.
    pub discount_paise: i64,

    /// Amount actually charged: `max(0, subtotal - discount)`.
    pub total_paise: i64,

    /// GST recorded for the sale, post-discount scaling.
    pub gst_paise: i64,

    /// Whether this was an inter-state supply (IGST instead of CGST+SGST).
    pub inter_state: bool,

    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub customer_gstin: Option<String>,

    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_paise(self.subtotal_paise)
    }

    #[inline]
    pub fn discount(&self) -> Money {
        Money::from_paise(self.discount_paise)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_paise(self.total_paise)
    }

    #[inline]
    pub fn gst(&self) -> Money {
        Money::from_paise(self.gst_paise)
    }
}

// =============================================================================
// Sale Line
// =============================================================================

/// A line item in a sale, snapshotting product data at sale time.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,

    /// Product name at time of sale (frozen).
    pub name_snapshot: String,
    /// Brand at time of sale (frozen).
    pub brand_snapshot: String,
    /// Model at time of sale (frozen).
    pub model_snapshot: String,
    /// Category at time of sale; drives the invoice HSN code.
    pub category_snapshot: String,

    /// Quantity sold.
    pub quantity: i64,

    /// Unit price in paise at time of sale (frozen).
    pub unit_price_paise: i64,

    /// GST rate in bps at time of sale (frozen).
    pub gst_rate_bps: u32,

    /// Line total: `unit_price × quantity`.
    pub line_total_paise: i64,

    pub created_at: DateTime<Utc>,
}

impl SaleLine {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_paise(self.unit_price_paise)
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_paise(self.line_total_paise)
    }

    #[inline]
    pub fn gst_rate(&self) -> GstRate {
        GstRate::from_bps(self.gst_rate_bps)
    }

    #[inline]
    pub fn hsn_code(&self) -> &'static str {
        hsn_code_for_category(&self.category_snapshot)
    }
}

// =============================================================================
// Sale Request
// =============================================================================

/// Customer details captured at the counter; every field optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gstin: Option<String>,
}

/// One requested line of a sale: which product, how many.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineRequest {
    pub product_id: String,
    pub quantity: i64,
}

/// The full request processed by the sale transactor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequest {
    /// Ordered line items; processed in input order.
    pub lines: Vec<SaleLineRequest>,

    pub payment_mode: PaymentMode,

    /// Flat discount in paise (absolute currency, not a percentage).
    #[serde(default)]
    pub discount_paise: i64,

    /// Inter-state supply flag; decides IGST vs CGST+SGST.
    #[serde(default)]
    pub inter_state: bool,

    #[serde(default)]
    pub customer: Option<CustomerInfo>,

    #[serde(default)]
    pub notes: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
