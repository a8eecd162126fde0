//! # Validation Module
//!
//! Request validation that runs before the sale transactor touches the
//! database. Everything here rejects malformed input up front; the
//! database constraints are the second line of defence.

use crate::error::ValidationError;
use crate::types::SaleRequest;
use crate::{MAX_LINE_QUANTITY, MAX_SALE_LINES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Sale Request
// =============================================================================

/// Validates the shape of a sale request before any work begins.
///
/// Checks, in order: at least one line, line count bound, per-line
/// product id format and quantity bounds, non-negative discount. Stock
/// and existence checks belong to the transactor, which sees current
/// data inside the transaction.
pub fn validate_sale_request(request: &SaleRequest) -> ValidationResult<()> {
    if request.lines.is_empty() {
        return Err(ValidationError::Required {
            field: "lines".to_string(),
        });
    }

    if request.lines.len() > MAX_SALE_LINES {
        return Err(ValidationError::OutOfRange {
            field: "lines".to_string(),
            min: 1,
            max: MAX_SALE_LINES as i64,
        });
    }

    for line in &request.lines {
        validate_uuid("productId", &line.product_id)?;
        validate_quantity(line.quantity)?;
    }

    if request.discount_paise < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "discountPaise".to_string(),
        });
    }

    if let Some(notes) = &request.notes {
        if notes.len() > 1000 {
            return Err(ValidationError::TooLong {
                field: "notes".to_string(),
                max: 1000,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a line quantity: positive and within the per-line cap.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a product name for catalog writes.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a price in paise. Zero is allowed (free items).
pub fn validate_price_paise(paise: i64) -> ValidationResult<()> {
    if paise < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a GST rate in basis points (0% to 100%).
pub fn validate_gst_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "gstRate".to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

/// Validates a free-text search query. Empty is fine (lists everything).
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Validates a UUID-format identifier.
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PaymentMode, SaleLineRequest};

    fn valid_request() -> SaleRequest {
        SaleRequest {
            lines: vec![SaleLineRequest {
                product_id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
                quantity: 2,
            }],
            payment_mode: PaymentMode::Cash,
            discount_paise: 0,
            inter_state: false,
            customer: None,
            notes: None,
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(validate_sale_request(&valid_request()).is_ok());
    }

    #[test]
    fn test_empty_lines_rejected() {
        let mut req = valid_request();
        req.lines.clear();
        assert!(matches!(
            validate_sale_request(&req),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_bad_product_id_rejected() {
        let mut req = valid_request();
        req.lines[0].product_id = "not-a-uuid".to_string();
        assert!(matches!(
            validate_sale_request(&req),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut req = valid_request();
        req.lines[0].quantity = 0;
        assert!(matches!(
            validate_sale_request(&req),
            Err(ValidationError::MustBePositive { .. })
        ));
    }

    #[test]
    fn test_negative_discount_rejected() {
        let mut req = valid_request();
        req.discount_paise = -100;
        assert!(matches!(
            validate_sale_request(&req),
            Err(ValidationError::MustNotBeNegative { .. })
        ));
    }

    #[test]
    fn test_validate_quantity_bounds() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_LINE_QUANTITY).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_LINE_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Galaxy M34 5G").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_price_paise() {
        assert!(validate_price_paise(0).is_ok());
        assert!(validate_price_paise(100_000).is_ok());
        assert!(validate_price_paise(-1).is_err());
    }

    #[test]
    fn test_validate_gst_rate_bps() {
        assert!(validate_gst_rate_bps(0).is_ok());
        assert!(validate_gst_rate_bps(1800).is_ok());
        assert!(validate_gst_rate_bps(10_000).is_ok());
        assert!(validate_gst_rate_bps(10_001).is_err());
    }

    #[test]
    fn test_validate_search_query_trims() {
        assert_eq!(validate_search_query("  galaxy  ").unwrap(), "galaxy");
        assert!(validate_search_query(&"q".repeat(200)).is_err());
    }
}
