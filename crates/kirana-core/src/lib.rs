//! # kirana-core: Pure Business Logic for Kirana POS
//!
//! The heart of the system: GST math, invoice composition and sale
//! validation as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Kirana POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   REST API (axum)                               │   │
//! │  │    POST /api/sales, GET /api/sales, /api/products/search        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kirana-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │   types   │  │ money/gst │  │  invoice  │  │ validation│   │   │
//! │  │   │  Product  │  │   Money   │  │  FY, num  │  │   rules   │   │   │
//! │  │   │   Sale    │  │ GST split │  │  composer │  │   checks  │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  kirana-db (Database Layer)                     │   │
//! │  │          SQLite queries, migrations, sale transaction           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output, every time
//! 2. **No I/O**: database, network and file access are FORBIDDEN here
//! 3. **Integer Money**: all monetary values are paise (i64), never floats
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod gst;
pub mod invoice;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::CartPreview;
pub use error::{CoreError, CoreResult, ValidationError};
pub use gst::GstBreakdown;
pub use invoice::{CompanyInfo, FinancialYear, Invoice};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Prefix on every invoice number (`KM/2024-25/0001`).
pub const INVOICE_PREFIX: &str = "KM";

/// First month of the Indian financial year (April).
pub const FINANCIAL_YEAR_START_MONTH: u32 = 4;

/// HSN code for mobile phones.
pub const HSN_CODE_MOBILE: &str = "85171200";

/// HSN code for mobile accessories (everything that is not a phone).
pub const HSN_CODE_ACCESSORIES: &str = "85444900";

/// Category string that selects the mobile-phone HSN code.
pub const MOBILE_PHONE_CATEGORY: &str = "Mobile Phone";

/// Maximum line items in a single sale.
///
/// Prevents runaway requests; a counter sale never legitimately needs
/// more than this.
pub const MAX_SALE_LINES: usize = 100;

/// Maximum quantity of a single line.
///
/// Guards against typos (1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
