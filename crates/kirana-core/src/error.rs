//! # Error Types
//!
//! Domain-specific error types for kirana-core.
//!
//! ## Error Hierarchy
//! ```text
//! kirana-core (this file)
//! ├── CoreError        - business rule violations
//! └── ValidationError  - request shape failures (pre-work)
//!
//! kirana-db
//! └── DbError          - database operation failures
//!
//! rest-api
//! └── ApiError         - what HTTP clients see (serialized)
//! ```
//!
//! ## Design Principles
//! 1. `thiserror` derive macros, never manual impls
//! 2. Context in messages (product name, quantities, ids)
//! 3. Errors are enum variants, never bare strings

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations detected while processing a sale.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Referenced product does not exist (or was soft-deleted).
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Referenced sale does not exist.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Requested quantity exceeds on-hand stock. The message names the
    /// product and both quantities so the counter staff can act on it.
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// Request shape validation failed before any work began.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Malformed or missing request fields, surfaced before any mutation.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g. not a UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
