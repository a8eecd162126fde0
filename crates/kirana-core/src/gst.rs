//! # GST Calculator
//!
//! Splits tax-inclusive amounts into taxable value and CGST/SGST/IGST.
//!
//! ## How Indian GST Splits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Tax-inclusive price ₹2000.00 at 18% GST                                │
//! │                                                                         │
//! │  taxable  = 2000.00 / 1.18      = ₹1694.92                              │
//! │  totalGst = 2000.00 - 1694.92   = ₹305.08                               │
//! │                                                                         │
//! │  Intra-state:  CGST ₹152.54 + SGST ₹152.54  (half each)                 │
//! │  Inter-state:  IGST ₹305.08                 (all integrated)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All math is integer paise with round-half-up division; the taxable
//! value is the rounded quantity and `total` is derived by subtraction,
//! so `taxable + total == amount` holds exactly for every input.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::GstRate;

// =============================================================================
// GST Breakdown
// =============================================================================

/// The tax split for a single tax-inclusive amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GstBreakdown {
    /// Base amount before tax (taxable value on the invoice).
    pub taxable: Money,
    /// Central GST (intra-state only).
    pub cgst: Money,
    /// State GST (intra-state only).
    pub sgst: Money,
    /// Integrated GST (inter-state only).
    pub igst: Money,
    /// Total GST: always `amount - taxable`.
    pub total: Money,
}

impl GstBreakdown {
    /// A breakdown with every field zero (used for zero-rated amounts).
    pub const fn zero() -> Self {
        GstBreakdown {
            taxable: Money::zero(),
            cgst: Money::zero(),
            sgst: Money::zero(),
            igst: Money::zero(),
            total: Money::zero(),
        }
    }
}

// =============================================================================
// Calculation
// =============================================================================

/// Splits a tax-inclusive amount into taxable value and GST components.
///
/// - `taxable = amount / (1 + rate)`, rounded half-up to the paise
/// - `total = amount - taxable` (exact by construction)
/// - inter-state: everything to IGST; intra-state: halved into CGST/SGST
///
/// A zero rate yields `taxable == amount` and zero tax. Pure function,
/// no error conditions.
///
/// ```rust
/// use kirana_core::gst::split_inclusive;
/// use kirana_core::money::Money;
/// use kirana_core::types::GstRate;
///
/// let split = split_inclusive(Money::from_paise(200_000), GstRate::from_bps(1800), false);
/// assert_eq!(split.taxable.paise(), 169_492); // ₹1694.92
/// assert_eq!(split.total.paise(), 30_508);    // ₹305.08
/// assert_eq!(split.cgst.paise(), 15_254);     // ₹152.54
/// ```
pub fn split_inclusive(amount: Money, rate: GstRate, inter_state: bool) -> GstBreakdown {
    let divisor = 10_000i128 + rate.bps() as i128;
    let taxable = Money::from_paise(div_round_half_up(amount.paise() as i128 * 10_000, divisor));
    let total = amount - taxable;

    if inter_state {
        GstBreakdown {
            taxable,
            cgst: Money::zero(),
            sgst: Money::zero(),
            igst: total,
            total,
        }
    } else {
        let half = Money::from_paise(div_round_half_up(total.paise() as i128, 2));
        GstBreakdown {
            taxable,
            cgst: half,
            sgst: half,
            igst: Money::zero(),
            total,
        }
    }
}

/// Scales accumulated GST for a flat discount applied after the fact.
///
/// The sale records `discounted / gross` of the originally computed tax,
/// mirroring how the discount reduces the bill proportionally across all
/// lines. When `gross` is zero the ratio is undefined and the GST passes
/// through unchanged.
///
/// Note: with mixed GST rates across lines the scaled figure no longer
/// ties to any single line's rate. Accepted tax treatment for this
/// system; see DESIGN notes.
pub fn scale_for_discount(total_gst: Money, discounted: Money, gross: Money) -> Money {
    if gross.is_zero() {
        return total_gst;
    }

    Money::from_paise(div_round_half_up(
        total_gst.paise() as i128 * discounted.paise() as i128,
        gross.paise() as i128,
    ))
}

/// Integer division rounding half away from zero (round-half-up for the
/// non-negative values used here).
fn div_round_half_up(numerator: i128, divisor: i128) -> i64 {
    debug_assert!(divisor > 0);
    ((2 * numerator + divisor) / (2 * divisor)) as i64
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intra_state_split_reference_scenario() {
        // ₹2000.00 at 18% intra-state: the canonical mobile-shop line
        let split = split_inclusive(Money::from_paise(200_000), GstRate::from_bps(1800), false);

        assert_eq!(split.taxable.paise(), 169_492);
        assert_eq!(split.total.paise(), 30_508);
        assert_eq!(split.cgst.paise(), 15_254);
        assert_eq!(split.sgst.paise(), 15_254);
        assert_eq!(split.igst.paise(), 0);
    }

    #[test]
    fn test_inter_state_assigns_all_to_igst() {
        let split = split_inclusive(Money::from_paise(200_000), GstRate::from_bps(1800), true);

        assert_eq!(split.taxable.paise(), 169_492);
        assert_eq!(split.igst.paise(), 30_508);
        assert_eq!(split.cgst.paise(), 0);
        assert_eq!(split.sgst.paise(), 0);
        assert_eq!(split.total, split.igst);
    }

    #[test]
    fn test_zero_rate_yields_no_tax() {
        let amount = Money::from_paise(123_456);
        let split = split_inclusive(amount, GstRate::zero(), false);

        assert_eq!(split.taxable, amount);
        assert_eq!(split.total, Money::zero());
        assert_eq!(split.cgst, Money::zero());
        assert_eq!(split.sgst, Money::zero());
        assert_eq!(split.igst, Money::zero());
    }

    #[test]
    fn test_taxable_plus_gst_equals_amount() {
        // Exact by construction, across awkward amounts and rates
        for paise in [1, 99, 101, 333, 100_000, 199_999, 987_654_321] {
            for bps in [0u32, 500, 1200, 1800, 2800] {
                let amount = Money::from_paise(paise);
                let split = split_inclusive(amount, GstRate::from_bps(bps), false);
                assert_eq!(split.taxable + split.total, amount);
            }
        }
    }

    #[test]
    fn test_halves_within_rounding_tolerance() {
        // An odd total splits into halves that overshoot by at most 1 paisa
        for paise in [1001, 3333, 54_321] {
            let split = split_inclusive(Money::from_paise(paise), GstRate::from_bps(1800), false);
            let recombined = split.cgst + split.sgst;
            assert!((recombined.paise() - split.total.paise()).abs() <= 1);
        }
    }

    #[test]
    fn test_discount_scaling() {
        // ₹10000 gross with ₹1000 discount scales GST by 0.9
        let gst = Money::from_paise(152_542);
        let scaled = scale_for_discount(
            gst,
            Money::from_paise(900_000),
            Money::from_paise(1_000_000),
        );
        assert_eq!(scaled.paise(), 137_288); // round(152542 * 0.9)
    }

    #[test]
    fn test_discount_scaling_zero_gross() {
        // Zero-total carts must not divide by zero
        let scaled = scale_for_discount(Money::zero(), Money::zero(), Money::zero());
        assert_eq!(scaled, Money::zero());
    }

    #[test]
    fn test_div_round_half_up() {
        assert_eq!(div_round_half_up(5, 2), 3); // 2.5 rounds up
        assert_eq!(div_round_half_up(4, 2), 2);
        assert_eq!(div_round_half_up(7, 3), 2); // 2.33 rounds down
        assert_eq!(div_round_half_up(8, 3), 3); // 2.67 rounds up
    }
}
