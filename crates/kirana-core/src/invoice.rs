//! # Invoice Module
//!
//! Financial-year invoice numbering and the GST invoice composer.
//!
//! ## Invoice Numbers
//! ```text
//! KM/2024-25/0001
//! ▲    ▲      ▲
//! │    │      └── per-financial-year sequence, zero-padded to 4
//! │    └── financial year label (April 2024 – March 2025)
//! └── invoice prefix
//! ```
//!
//! The sequence itself is claimed by the database inside the sale
//! transaction (an atomic per-year counter); this module owns the pure
//! parts: the financial-year window math and the formatting.
//!
//! ## Invoice Composition
//! [`compose`] is a pure transformation of a persisted sale and its line
//! snapshots into a structured GST invoice document. It has no side
//! effects and returns an identical document every time it is called for
//! the same sale, because the invoice number is stored on the sale at
//! creation rather than recomputed on read.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::gst::{self, GstBreakdown};
use crate::money::Money;
use crate::types::{Sale, SaleLine};
use crate::{FINANCIAL_YEAR_START_MONTH, INVOICE_PREFIX};

// =============================================================================
// Financial Year
// =============================================================================

/// An Indian financial year: April 1 of the start year through March 31
/// of the following year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FinancialYear {
    start_year: i32,
}

impl FinancialYear {
    /// The financial year containing the given instant.
    pub fn containing(at: DateTime<Utc>) -> Self {
        let start_year = if at.month() >= FINANCIAL_YEAR_START_MONTH {
            at.year()
        } else {
            at.year() - 1
        };
        FinancialYear { start_year }
    }

    /// Calendar year in which this financial year starts.
    #[inline]
    pub const fn start_year(&self) -> i32 {
        self.start_year
    }

    /// Label used in invoice numbers and as the sequence key: `2024-25`.
    pub fn label(&self) -> String {
        format!("{}-{:02}", self.start_year, (self.start_year + 1) % 100)
    }

    /// Half-open UTC window `[April 1 start, April 1 start+1)`.
    pub fn window(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = Utc
            .with_ymd_and_hms(self.start_year, FINANCIAL_YEAR_START_MONTH, 1, 0, 0, 0)
            .unwrap();
        let end = Utc
            .with_ymd_and_hms(self.start_year + 1, FINANCIAL_YEAR_START_MONTH, 1, 0, 0, 0)
            .unwrap();
        (start, end)
    }
}

/// Formats an invoice number from a financial year and claimed sequence.
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use kirana_core::invoice::{format_invoice_number, FinancialYear};
///
/// let fy = FinancialYear::containing(Utc.with_ymd_and_hms(2024, 7, 15, 10, 0, 0).unwrap());
/// assert_eq!(format_invoice_number(fy, 1), "KM/2024-25/0001");
/// ```
pub fn format_invoice_number(fy: FinancialYear, sequence: i64) -> String {
    format!("{}/{}/{:04}", INVOICE_PREFIX, fy.label(), sequence)
}

// =============================================================================
// Invoice Document
// =============================================================================

/// Seller details printed in the invoice header.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    pub name: String,
    pub address: String,
    pub gstin: String,
    pub phone: String,
    pub email: String,
    /// Two-digit GST state code of the place of business.
    pub state_code: String,
    /// State name used as place of supply for intra-state sales.
    pub state_name: String,
}

/// Buyer block; name defaults to "Walk-in Customer" when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerBlock {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub gstin: String,
}

/// One invoice line with its tax detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    /// "Brand Name - Model".
    pub description: String,
    pub hsn_code: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
    pub gst_rate_bps: u32,
    pub taxable_value: Money,
    pub cgst: Money,
    pub sgst: Money,
    pub igst: Money,
}

/// Consolidated tax totals across all lines.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedGst {
    pub total_cgst: Money,
    pub total_sgst: Money,
    pub total_igst: Money,
    pub total_gst: Money,
}

/// Financial summary block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    pub subtotal: Money,
    pub discount: Money,
    /// Grand total minus recorded GST.
    pub taxable_amount: Money,
    pub grand_total: Money,
    pub payment_mode: String,
}

/// GST compliance metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GstDetails {
    pub inter_state: bool,
    pub place_of_supply: String,
    pub reverse_charge: String,
}

/// The rendered GST invoice. Derived and non-persisted: regenerable at
/// any time from the sale record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub invoice_number: String,
    /// ISO date (YYYY-MM-DD) of the sale.
    pub invoice_date: String,
    /// Time of the sale (HH:MM:SS, UTC).
    pub invoice_time: String,
    pub company: CompanyInfo,
    pub customer: CustomerBlock,
    pub items: Vec<InvoiceLine>,
    pub gst: ConsolidatedGst,
    pub summary: InvoiceSummary,
    pub notes: String,
    pub terms_and_conditions: Vec<String>,
    pub gst_details: GstDetails,
}

/// Static terms printed at the foot of every invoice.
const TERMS_AND_CONDITIONS: [&str; 3] = [
    "Goods once sold will not be taken back or exchanged",
    "All disputes are subject to the seller's local jurisdiction only",
    "Warranty as per manufacturer terms and conditions",
];

// =============================================================================
// Composer
// =============================================================================

/// Composes the invoice document for a persisted sale.
///
/// Per-line tax is recomputed from the frozen price/rate snapshots, so
/// the invoice is reproducible without storing the breakdown. No stock
/// or persistence side effects.
pub fn compose(sale: &Sale, lines: &[SaleLine], company: &CompanyInfo) -> Invoice {
    let mut consolidated = ConsolidatedGst::default();

    let items: Vec<InvoiceLine> = lines
        .iter()
        .map(|line| {
            let breakdown: GstBreakdown =
                gst::split_inclusive(line.line_total(), line.gst_rate(), sale.inter_state);

            consolidated.total_cgst += breakdown.cgst;
            consolidated.total_sgst += breakdown.sgst;
            consolidated.total_igst += breakdown.igst;
            consolidated.total_gst += breakdown.total;

            InvoiceLine {
                description: format!(
                    "{} {} - {}",
                    line.brand_snapshot, line.name_snapshot, line.model_snapshot
                ),
                hsn_code: line.hsn_code().to_string(),
                quantity: line.quantity,
                unit_price: line.unit_price(),
                line_total: line.line_total(),
                gst_rate_bps: line.gst_rate_bps,
                taxable_value: breakdown.taxable,
                cgst: breakdown.cgst,
                sgst: breakdown.sgst,
                igst: breakdown.igst,
            }
        })
        .collect();

    let customer = sale.customer_name.clone().map_or_else(
        || CustomerBlock {
            name: "Walk-in Customer".to_string(),
            phone: String::new(),
            address: String::new(),
            gstin: String::new(),
        },
        |name| CustomerBlock {
            name,
            phone: sale.customer_phone.clone().unwrap_or_default(),
            address: sale.customer_address.clone().unwrap_or_default(),
            gstin: sale.customer_gstin.clone().unwrap_or_default(),
        },
    );

    let place_of_supply = if sale.inter_state {
        // The customer's state is not captured for counter sales
        sale.customer_address
            .clone()
            .unwrap_or_else(|| "Other State".to_string())
    } else {
        company.state_name.clone()
    };

    Invoice {
        invoice_number: sale.invoice_number.clone(),
        invoice_date: sale.created_at.format("%Y-%m-%d").to_string(),
        invoice_time: sale.created_at.format("%H:%M:%S").to_string(),
        company: company.clone(),
        customer,
        items,
        gst: consolidated,
        summary: InvoiceSummary {
            subtotal: sale.subtotal(),
            discount: sale.discount(),
            taxable_amount: sale.total() - sale.gst(),
            grand_total: sale.total(),
            payment_mode: format!("{:?}", sale.payment_mode).to_lowercase(),
        },
        notes: sale.notes.clone().unwrap_or_default(),
        terms_and_conditions: TERMS_AND_CONDITIONS.iter().map(|t| t.to_string()).collect(),
        gst_details: GstDetails {
            inter_state: sale.inter_state,
            place_of_supply,
            reverse_charge: "No".to_string(),
        },
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentMode;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_financial_year_boundaries() {
        // July 2024 belongs to FY 2024-25
        assert_eq!(FinancialYear::containing(at(2024, 7, 15)).label(), "2024-25");
        // February 2025 still belongs to FY 2024-25
        assert_eq!(FinancialYear::containing(at(2025, 2, 1)).label(), "2024-25");
        // March 31 is the last day of the old year
        assert_eq!(FinancialYear::containing(at(2025, 3, 31)).label(), "2024-25");
        // April 1 rolls over
        assert_eq!(FinancialYear::containing(at(2025, 4, 1)).label(), "2025-26");
    }

    #[test]
    fn test_financial_year_window() {
        let fy = FinancialYear::containing(at(2024, 7, 15));
        let (start, end) = fy.window();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_invoice_number_format() {
        let fy = FinancialYear::containing(at(2024, 7, 15));
        assert_eq!(format_invoice_number(fy, 1), "KM/2024-25/0001");
        assert_eq!(format_invoice_number(fy, 42), "KM/2024-25/0042");
        assert_eq!(format_invoice_number(fy, 12345), "KM/2024-25/12345");
    }

    #[test]
    fn test_century_rollover_label() {
        let fy = FinancialYear::containing(at(2099, 6, 1));
        assert_eq!(fy.label(), "2099-00");
    }

    fn sample_sale() -> Sale {
        Sale {
            id: "s1".to_string(),
            invoice_number: "KM/2024-25/0007".to_string(),
            payment_mode: PaymentMode::Cash,
            subtotal_paise: 200_000,
            discount_paise: 0,
            total_paise: 200_000,
            gst_paise: 30_508,
            inter_state: false,
            customer_name: None,
            customer_phone: None,
            customer_address: None,
            customer_gstin: None,
            notes: None,
            created_at: at(2024, 7, 15),
        }
    }

    fn sample_lines() -> Vec<SaleLine> {
        vec![SaleLine {
            id: "l1".to_string(),
            sale_id: "s1".to_string(),
            product_id: "p1".to_string(),
            name_snapshot: "Galaxy M34".to_string(),
            brand_snapshot: "Samsung".to_string(),
            model_snapshot: "M34 5G".to_string(),
            category_snapshot: "Mobile Phone".to_string(),
            quantity: 2,
            unit_price_paise: 100_000,
            gst_rate_bps: 1800,
            line_total_paise: 200_000,
            created_at: at(2024, 7, 15),
        }]
    }

    fn sample_company() -> CompanyInfo {
        CompanyInfo {
            name: "Kirana Mobiles".to_string(),
            address: "12 Market Road".to_string(),
            gstin: "33AAAAA0000A1Z5".to_string(),
            phone: "+91-9000000000".to_string(),
            email: "shop@example.com".to_string(),
            state_code: "33".to_string(),
            state_name: "Tamil Nadu".to_string(),
        }
    }

    #[test]
    fn test_compose_walk_in_customer_default() {
        let invoice = compose(&sample_sale(), &sample_lines(), &sample_company());
        assert_eq!(invoice.customer.name, "Walk-in Customer");
        assert_eq!(invoice.invoice_number, "KM/2024-25/0007");
        assert_eq!(invoice.invoice_date, "2024-07-15");
    }

    #[test]
    fn test_compose_line_detail_and_totals() {
        let invoice = compose(&sample_sale(), &sample_lines(), &sample_company());

        assert_eq!(invoice.items.len(), 1);
        let line = &invoice.items[0];
        assert_eq!(line.description, "Samsung Galaxy M34 - M34 5G");
        assert_eq!(line.hsn_code, crate::HSN_CODE_MOBILE);
        assert_eq!(line.taxable_value.paise(), 169_492);
        assert_eq!(line.cgst.paise(), 15_254);
        assert_eq!(line.sgst.paise(), 15_254);
        assert_eq!(line.igst.paise(), 0);

        assert_eq!(invoice.gst.total_gst.paise(), 30_508);
        assert_eq!(invoice.summary.grand_total.paise(), 200_000);
        assert_eq!(invoice.summary.taxable_amount.paise(), 169_492);
        assert_eq!(invoice.gst_details.place_of_supply, "Tamil Nadu");
    }

    #[test]
    fn test_compose_inter_state_uses_igst() {
        let mut sale = sample_sale();
        sale.inter_state = true;
        let invoice = compose(&sale, &sample_lines(), &sample_company());

        assert_eq!(invoice.gst.total_igst.paise(), 30_508);
        assert_eq!(invoice.gst.total_cgst.paise(), 0);
        assert_eq!(invoice.gst.total_sgst.paise(), 0);
    }

    #[test]
    fn test_invoice_serde_round_trip() {
        // The document must survive JSON in both directions; clients
        // archive invoices and may post them back for reprinting.
        let invoice = compose(&sample_sale(), &sample_lines(), &sample_company());

        let json = serde_json::to_string(&invoice).unwrap();
        let restored: Invoice = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.invoice_number, invoice.invoice_number);
        assert_eq!(restored.gst_details.reverse_charge, "No");
        assert_eq!(
            restored.terms_and_conditions,
            invoice.terms_and_conditions
        );
    }

    #[test]
    fn test_compose_is_repeatable() {
        let sale = sample_sale();
        let lines = sample_lines();
        let company = sample_company();

        let a = compose(&sale, &lines, &company);
        let b = compose(&sale, &lines, &company);
        assert_eq!(a.invoice_number, b.invoice_number);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
