//! # Sale Repository
//!
//! The transactional sale processor plus retrieval and filtered listing.
//!
//! ## The Sale Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  process_sale: one all-or-nothing unit                                  │
//! │                                                                         │
//! │  validate request (pure, before any I/O)                                │
//! │  BEGIN                                                                  │
//! │    claim next invoice sequence for the financial year (upsert)          │
//! │    for each line:                                                       │
//! │      load product, check active + stock                                 │
//! │      UPDATE quantity = quantity - n WHERE quantity >= n  (conditional)  │
//! │      accumulate subtotal + GST from the inclusive split                 │
//! │    apply flat discount, scale GST proportionally                        │
//! │    INSERT sale + lines (snapshots frozen)                               │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Any failure rolls the whole transaction back: no stock moves, no
//! invoice sequence is consumed (the upsert is inside the transaction),
//! no partial sale rows survive.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use kirana_core::cart;
use kirana_core::gst::{scale_for_discount, split_inclusive};
use kirana_core::invoice::{format_invoice_number, FinancialYear};
use kirana_core::validation::validate_sale_request;
use kirana_core::{CartPreview, CoreError, Money, PaymentMode, Product, Sale, SaleLine, SaleRequest};

// =============================================================================
// Errors
// =============================================================================

/// Errors from the sale transaction: either a business rule violation
/// (bad request, missing product, oversell) or an infrastructure failure.
/// The REST layer maps the two sides to different status codes.
#[derive(Debug, Error)]
pub enum SaleTxError {
    #[error(transparent)]
    Domain(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<sqlx::Error> for SaleTxError {
    fn from(err: sqlx::Error) -> Self {
        SaleTxError::Db(DbError::from(err))
    }
}

// =============================================================================
// Results and Filters
// =============================================================================

/// A committed sale together with its lines, as returned to the caller
/// for invoice composition.
#[derive(Debug, Clone)]
pub struct ProcessedSale {
    pub sale: Sale,
    pub lines: Vec<SaleLine>,
}

/// Filters for the sale listing endpoint. All optional and combinable.
#[derive(Debug, Clone, Default)]
pub struct SaleListFilter {
    /// Include sales created at or after this instant.
    pub start_date: Option<chrono::DateTime<Utc>>,
    /// Include sales created strictly before this instant.
    pub end_date: Option<chrono::DateTime<Utc>>,
    pub payment_mode: Option<PaymentMode>,
    /// Minimum charged total, in paise.
    pub min_total_paise: Option<i64>,
    /// Maximum charged total, in paise.
    pub max_total_paise: Option<i64>,
    /// 1-based page number; 0 is treated as 1.
    pub page: u32,
    /// Page size; 0 falls back to 50, capped at 100.
    pub page_size: u32,
}

impl SaleListFilter {
    fn effective_page(&self) -> u32 {
        self.page.max(1)
    }

    fn effective_page_size(&self) -> u32 {
        match self.page_size {
            0 => 50,
            n => n.min(100),
        }
    }
}

/// One page of the sale listing, newest first.
#[derive(Debug, Clone)]
pub struct SaleListPage {
    pub sales: Vec<Sale>,
    /// Total matches across all pages.
    pub total_count: i64,
    pub page: u32,
    pub page_size: u32,
}

// =============================================================================
// Repository
// =============================================================================

const SALE_COLUMNS: &str = "id, invoice_number, payment_mode, subtotal_paise, discount_paise, \
     total_paise, gst_paise, inter_state, customer_name, customer_phone, \
     customer_address, customer_gstin, notes, created_at";

const SALE_LINE_COLUMNS: &str = "id, sale_id, product_id, name_snapshot, brand_snapshot, \
     model_snapshot, category_snapshot, quantity, unit_price_paise, \
     gst_rate_bps, line_total_paise, created_at";

/// Repository for sale processing and retrieval.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Processes a sale atomically: claims the invoice number, deducts
    /// stock, computes totals and persists the sale with its lines.
    ///
    /// Lines are processed in input order; the first failing line aborts
    /// the whole sale.
    pub async fn process_sale(&self, request: &SaleRequest) -> Result<ProcessedSale, SaleTxError> {
        validate_sale_request(request).map_err(CoreError::from)?;

        let now = Utc::now();
        let fy = FinancialYear::containing(now);
        let sale_id = Uuid::new_v4().to_string();

        let mut tx = self.pool.begin().await?;

        // Claim the next invoice sequence for this financial year.
        // Upsert + RETURNING makes the claim atomic: concurrent sales
        // serialize on this row and each gets a distinct number.
        let sequence: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO invoice_sequences (financial_year, last_seq)
            VALUES (?1, 1)
            ON CONFLICT(financial_year) DO UPDATE SET last_seq = last_seq + 1
            RETURNING last_seq
            "#,
        )
        .bind(fy.label())
        .fetch_one(&mut *tx)
        .await?;

        let invoice_number = format_invoice_number(fy, sequence);

        let mut subtotal = Money::zero();
        let mut gst_total = Money::zero();
        let mut lines: Vec<SaleLine> = Vec::with_capacity(request.lines.len());

        for line_req in &request.lines {
            let product = sqlx::query_as::<_, Product>(
                "SELECT id, name, brand, model, category, price_paise, gst_rate_bps, \
                 quantity, low_stock_threshold, barcode, is_active, created_at, updated_at \
                 FROM products WHERE id = ?1 AND is_active = 1",
            )
                .bind(&line_req.product_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| CoreError::ProductNotFound(line_req.product_id.clone()))?;

            if product.quantity < line_req.quantity {
                return Err(CoreError::InsufficientStock {
                    name: product.name,
                    available: product.quantity,
                    requested: line_req.quantity,
                }
                .into());
            }

            // Conditional decrement; the guard makes the check race-safe
            // even against a concurrent transaction that slipped between
            // the read above and this write.
            let updated = sqlx::query(
                r#"
                UPDATE products
                SET quantity = quantity - ?2, updated_at = ?3
                WHERE id = ?1 AND quantity >= ?2
                "#,
            )
            .bind(&product.id)
            .bind(line_req.quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                return Err(CoreError::InsufficientStock {
                    name: product.name,
                    available: product.quantity,
                    requested: line_req.quantity,
                }
                .into());
            }

            let line_total = product.price().multiply_quantity(line_req.quantity);
            let split = split_inclusive(line_total, product.gst_rate(), request.inter_state);

            subtotal += line_total;
            gst_total += split.total;

            lines.push(SaleLine {
                id: Uuid::new_v4().to_string(),
                sale_id: sale_id.clone(),
                product_id: product.id.clone(),
                name_snapshot: product.name.clone(),
                brand_snapshot: product.brand.clone(),
                model_snapshot: product.model.clone(),
                category_snapshot: product.category.clone(),
                quantity: line_req.quantity,
                unit_price_paise: product.price_paise,
                gst_rate_bps: product.gst_rate_bps,
                line_total_paise: line_total.paise(),
                created_at: now,
            });
        }

        let discount = Money::from_paise(request.discount_paise);
        let total = subtotal.sub_floor_zero(discount);
        let gst_recorded = scale_for_discount(gst_total, total, subtotal);

        let customer = request.customer.clone().unwrap_or_default();

        let sale = Sale {
            id: sale_id.clone(),
            invoice_number: invoice_number.clone(),
            payment_mode: request.payment_mode,
            subtotal_paise: subtotal.paise(),
            discount_paise: discount.paise(),
            total_paise: total.paise(),
            gst_paise: gst_recorded.paise(),
            inter_state: request.inter_state,
            customer_name: customer.name,
            customer_phone: customer.phone,
            customer_address: customer.address,
            customer_gstin: customer.gstin,
            notes: request.notes.clone(),
            created_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, invoice_number, payment_mode, subtotal_paise, discount_paise,
                total_paise, gst_paise, inter_state,
                customer_name, customer_phone, customer_address, customer_gstin,
                notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.invoice_number)
        .bind(sale.payment_mode)
        .bind(sale.subtotal_paise)
        .bind(sale.discount_paise)
        .bind(sale.total_paise)
        .bind(sale.gst_paise)
        .bind(sale.inter_state)
        .bind(&sale.customer_name)
        .bind(&sale.customer_phone)
        .bind(&sale.customer_address)
        .bind(&sale.customer_gstin)
        .bind(&sale.notes)
        .bind(sale.created_at)
        .execute(&mut *tx)
        .await?;

        for line in &lines {
            sqlx::query(
                r#"
                INSERT INTO sale_lines (
                    id, sale_id, product_id,
                    name_snapshot, brand_snapshot, model_snapshot, category_snapshot,
                    quantity, unit_price_paise, gst_rate_bps, line_total_paise,
                    created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                "#,
            )
            .bind(&line.id)
            .bind(&line.sale_id)
            .bind(&line.product_id)
            .bind(&line.name_snapshot)
            .bind(&line.brand_snapshot)
            .bind(&line.model_snapshot)
            .bind(&line.category_snapshot)
            .bind(line.quantity)
            .bind(line.unit_price_paise)
            .bind(line.gst_rate_bps)
            .bind(line.line_total_paise)
            .bind(line.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            invoice = %invoice_number,
            lines = lines.len(),
            total_paise = sale.total_paise,
            "Sale committed"
        );

        Ok(ProcessedSale { sale, lines })
    }

    /// Prices a prospective sale without committing anything: no stock
    /// movement, no invoice number, no rows written.
    ///
    /// Runs the same validation and stock check as [`Self::process_sale`]
    /// against current product rows, so the counter screen sees the exact
    /// totals a subsequent sale would record (stock permitting).
    pub async fn preview(&self, request: &SaleRequest) -> Result<CartPreview, SaleTxError> {
        validate_sale_request(request).map_err(CoreError::from)?;

        let mut products = Vec::with_capacity(request.lines.len());
        for line_req in &request.lines {
            let product = sqlx::query_as::<_, Product>(
                "SELECT id, name, brand, model, category, price_paise, gst_rate_bps, \
                 quantity, low_stock_threshold, barcode, is_active, created_at, updated_at \
                 FROM products WHERE id = ?1 AND is_active = 1",
            )
            .bind(&line_req.product_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(line_req.product_id.clone()))?;

            products.push(product);
        }

        let cart = cart::preview(request, &products).map_err(SaleTxError::Domain)?;

        debug!(
            lines = cart.lines.len(),
            total_paise = cart.total.paise(),
            "Cart previewed"
        );

        Ok(cart)
    }

    /// Gets a sale by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1");
        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Gets the line items for a sale, in insertion order.
    pub async fn get_lines(&self, sale_id: &str) -> DbResult<Vec<SaleLine>> {
        let sql = format!(
            "SELECT {SALE_LINE_COLUMNS} FROM sale_lines WHERE sale_id = ?1 ORDER BY rowid"
        );
        let lines = sqlx::query_as::<_, SaleLine>(&sql)
            .bind(sale_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(lines)
    }

    /// Gets a sale with its lines, or None if the sale doesn't exist.
    pub async fn get_with_lines(&self, id: &str) -> DbResult<Option<ProcessedSale>> {
        let Some(sale) = self.get_by_id(id).await? else {
            return Ok(None);
        };
        let lines = self.get_lines(id).await?;
        Ok(Some(ProcessedSale { sale, lines }))
    }

    /// Lists sales newest-first with optional filters and pagination.
    pub async fn list(&self, filter: &SaleListFilter) -> DbResult<SaleListPage> {
        let page = filter.effective_page();
        let page_size = filter.effective_page_size();
        let offset = (page as i64 - 1) * page_size as i64;

        let mut count_qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM sales WHERE 1=1");
        push_sale_filters(&mut count_qb, filter);
        let total_count: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {SALE_COLUMNS} FROM sales WHERE 1=1"));
        push_sale_filters(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC LIMIT ");
        qb.push_bind(page_size as i64);
        qb.push(" OFFSET ");
        qb.push_bind(offset);

        let sales = qb.build_query_as::<Sale>().fetch_all(&self.pool).await?;

        debug!(
            count = sales.len(),
            total = total_count,
            page,
            "Sale listing returned"
        );

        Ok(SaleListPage {
            sales,
            total_count,
            page,
            page_size,
        })
    }
}

fn push_sale_filters(qb: &mut QueryBuilder<'_, Sqlite>, filter: &SaleListFilter) {
    if let Some(start) = filter.start_date {
        qb.push(" AND created_at >= ");
        qb.push_bind(start);
    }
    if let Some(end) = filter.end_date {
        qb.push(" AND created_at < ");
        qb.push_bind(end);
    }
    if let Some(mode) = filter.payment_mode {
        qb.push(" AND payment_mode = ");
        qb.push_bind(mode);
    }
    if let Some(min) = filter.min_total_paise {
        qb.push(" AND total_paise >= ");
        qb.push_bind(min);
    }
    if let Some(max) = filter.max_total_paise {
        qb.push(" AND total_paise <= ");
        qb.push_bind(max);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::generate_product_id;
    use kirana_core::SaleLineRequest;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database, name: &str, price_paise: i64, quantity: i64) -> Product {
        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            name: name.to_string(),
            brand: "Samsung".to_string(),
            model: "Galaxy M34".to_string(),
            category: "Mobile Phone".to_string(),
            price_paise,
            gst_rate_bps: 1800,
            quantity,
            low_stock_threshold: 2,
            barcode: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();
        product
    }

    fn request_for(product: &Product, quantity: i64) -> SaleRequest {
        SaleRequest {
            lines: vec![SaleLineRequest {
                product_id: product.id.clone(),
                quantity,
            }],
            payment_mode: PaymentMode::Cash,
            discount_paise: 0,
            inter_state: false,
            customer: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_sale_reference_scenario() {
        // 2 units of a ₹1000.00 phone at 18%: subtotal ₹2000.00,
        // GST ₹305.08, stock 5 → 3, first invoice of the year
        let db = test_db().await;
        let product = seed_product(&db, "Galaxy M34", 100_000, 5).await;

        let result = db
            .sales()
            .process_sale(&request_for(&product, 2))
            .await
            .unwrap();

        assert_eq!(result.sale.subtotal_paise, 200_000);
        assert_eq!(result.sale.total_paise, 200_000);
        assert_eq!(result.sale.gst_paise, 30_508);
        assert_eq!(result.lines.len(), 1);
        assert_eq!(result.lines[0].line_total_paise, 200_000);
        assert_eq!(result.lines[0].name_snapshot, "Galaxy M34");

        let fy = FinancialYear::containing(result.sale.created_at);
        assert_eq!(
            result.sale.invoice_number,
            format!("KM/{}/0001", fy.label())
        );

        let remaining = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(remaining.quantity, 3);
    }

    #[tokio::test]
    async fn test_oversell_rejected_stock_unchanged() {
        let db = test_db().await;
        let product = seed_product(&db, "Galaxy M34", 100_000, 5).await;

        let err = db
            .sales()
            .process_sale(&request_for(&product, 6))
            .await
            .unwrap_err();

        match err {
            SaleTxError::Domain(CoreError::InsufficientStock {
                name,
                available,
                requested,
            }) => {
                assert_eq!(name, "Galaxy M34");
                assert_eq!(available, 5);
                assert_eq!(requested, 6);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        let unchanged = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(unchanged.quantity, 5);
    }

    #[tokio::test]
    async fn test_failed_line_rolls_back_earlier_lines() {
        let db = test_db().await;
        let ok = seed_product(&db, "Galaxy M34", 100_000, 5).await;
        let scarce = seed_product(&db, "Redmi 13C", 80_000, 1).await;

        let request = SaleRequest {
            lines: vec![
                SaleLineRequest {
                    product_id: ok.id.clone(),
                    quantity: 2,
                },
                SaleLineRequest {
                    product_id: scarce.id.clone(),
                    quantity: 3,
                },
            ],
            payment_mode: PaymentMode::Upi,
            discount_paise: 0,
            inter_state: false,
            customer: None,
            notes: None,
        };

        assert!(db.sales().process_sale(&request).await.is_err());

        // Line 1's decrement must have been rolled back
        let p1 = db.products().get_by_id(&ok.id).await.unwrap().unwrap();
        assert_eq!(p1.quantity, 5);

        // And no sale rows survive
        let page = db.sales().list(&SaleListFilter::default()).await.unwrap();
        assert_eq!(page.total_count, 0);

        // The aborted attempt must not consume an invoice number either
        let retry = db.sales().process_sale(&request_for(&ok, 1)).await.unwrap();
        assert!(retry.sale.invoice_number.ends_with("/0001"));
    }

    #[tokio::test]
    async fn test_unknown_product_rejected() {
        let db = test_db().await;

        let request = SaleRequest {
            lines: vec![SaleLineRequest {
                product_id: Uuid::new_v4().to_string(),
                quantity: 1,
            }],
            payment_mode: PaymentMode::Cash,
            discount_paise: 0,
            inter_state: false,
            customer: None,
            notes: None,
        };

        let err = db.sales().process_sale(&request).await.unwrap_err();
        assert!(matches!(
            err,
            SaleTxError::Domain(CoreError::ProductNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_discount_scales_gst_proportionally() {
        // ₹10000 gross, ₹1000 discount: GST scales by 0.9
        let db = test_db().await;
        let product = seed_product(&db, "Galaxy M34", 100_000, 20).await;

        let mut request = request_for(&product, 10);
        request.discount_paise = 100_000;

        let result = db.sales().process_sale(&request).await.unwrap();

        assert_eq!(result.sale.subtotal_paise, 1_000_000);
        assert_eq!(result.sale.total_paise, 900_000);
        // Undiscounted GST on ₹10000 is ₹1525.42
        assert_eq!(result.sale.gst_paise, 137_288); // round(152542 * 0.9)
    }

    #[tokio::test]
    async fn test_discount_exceeding_subtotal_floors_at_zero() {
        let db = test_db().await;
        let product = seed_product(&db, "Galaxy M34", 100_000, 5).await;

        let mut request = request_for(&product, 1);
        request.discount_paise = 500_000;

        let result = db.sales().process_sale(&request).await.unwrap();
        assert_eq!(result.sale.total_paise, 0);
        assert_eq!(result.sale.gst_paise, 0);
    }

    #[tokio::test]
    async fn test_preview_prices_without_side_effects() {
        let db = test_db().await;
        let product = seed_product(&db, "Galaxy M34", 100_000, 5).await;

        let cart = db.sales().preview(&request_for(&product, 2)).await.unwrap();
        assert_eq!(cart.subtotal.paise(), 200_000);
        assert_eq!(cart.gst_total.paise(), 30_508);
        assert_eq!(cart.lines[0].available_quantity, 5);

        // Preview must not move stock
        let unchanged = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(unchanged.quantity, 5);

        // ...nor consume an invoice number: the first real sale is 0001
        let sale = db.sales().process_sale(&request_for(&product, 1)).await.unwrap();
        assert!(sale.sale.invoice_number.ends_with("/0001"));
    }

    #[tokio::test]
    async fn test_preview_rejects_oversell() {
        let db = test_db().await;
        let product = seed_product(&db, "Galaxy M34", 100_000, 5).await;

        let err = db.sales().preview(&request_for(&product, 6)).await.unwrap_err();
        assert!(matches!(
            err,
            SaleTxError::Domain(CoreError::InsufficientStock { .. })
        ));
    }

    #[tokio::test]
    async fn test_invoice_sequence_increments() {
        let db = test_db().await;
        let product = seed_product(&db, "Galaxy M34", 100_000, 10).await;

        let first = db.sales().process_sale(&request_for(&product, 1)).await.unwrap();
        let second = db.sales().process_sale(&request_for(&product, 1)).await.unwrap();

        assert!(first.sale.invoice_number.ends_with("/0001"));
        assert!(second.sale.invoice_number.ends_with("/0002"));
    }

    #[tokio::test]
    async fn test_empty_lines_rejected_before_any_io() {
        let db = test_db().await;

        let request = SaleRequest {
            lines: vec![],
            payment_mode: PaymentMode::Cash,
            discount_paise: 0,
            inter_state: false,
            customer: None,
            notes: None,
        };

        let err = db.sales().process_sale(&request).await.unwrap_err();
        assert!(matches!(
            err,
            SaleTxError::Domain(CoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_inter_state_sale_records_same_gst_total() {
        let db = test_db().await;
        let product = seed_product(&db, "Galaxy M34", 100_000, 5).await;

        let mut request = request_for(&product, 2);
        request.inter_state = true;

        let result = db.sales().process_sale(&request).await.unwrap();
        assert!(result.sale.inter_state);
        assert_eq!(result.sale.gst_paise, 30_508);
    }

    #[tokio::test]
    async fn test_get_with_lines_roundtrip() {
        let db = test_db().await;
        let product = seed_product(&db, "Galaxy M34", 100_000, 5).await;

        let created = db.sales().process_sale(&request_for(&product, 2)).await.unwrap();

        let fetched = db
            .sales()
            .get_with_lines(&created.sale.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.sale.invoice_number, created.sale.invoice_number);
        assert_eq!(fetched.lines.len(), 1);
        assert_eq!(fetched.lines[0].quantity, 2);

        assert!(db.sales().get_with_lines("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters_and_pagination() {
        let db = test_db().await;
        let product = seed_product(&db, "Galaxy M34", 100_000, 50).await;

        for i in 0..3 {
            let mut request = request_for(&product, i + 1);
            request.payment_mode = if i == 0 {
                PaymentMode::Cash
            } else {
                PaymentMode::Upi
            };
            db.sales().process_sale(&request).await.unwrap();
        }

        let upi_only = db
            .sales()
            .list(&SaleListFilter {
                payment_mode: Some(PaymentMode::Upi),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(upi_only.total_count, 2);

        // min total ₹2000.00 excludes the single-unit sale
        let big = db
            .sales()
            .list(&SaleListFilter {
                min_total_paise: Some(200_000),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(big.total_count, 2);

        let page = db
            .sales()
            .list(&SaleListFilter {
                page: 2,
                page_size: 2,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total_count, 3);
        assert_eq!(page.sales.len(), 1);
    }

    #[tokio::test]
    async fn test_conditional_decrement_refuses_overshoot() {
        // The UPDATE guard is the last line of defence: even when a
        // stale read said there was stock, a decrement past zero must
        // touch no rows.
        let db = test_db().await;
        let product = seed_product(&db, "Galaxy M34", 100_000, 5).await;

        let result = sqlx::query(
            "UPDATE products SET quantity = quantity - ?2 WHERE id = ?1 AND quantity >= ?2",
        )
        .bind(&product.id)
        .bind(6i64)
        .execute(db.pool())
        .await
        .unwrap();

        assert_eq!(result.rows_affected(), 0);
        let unchanged = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(unchanged.quantity, 5);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_sales_never_oversell() {
        // File-backed database so sales run on separate connections and
        // genuinely contend for the write lock.
        let path = std::env::temp_dir().join(format!("kirana-test-{}.db", Uuid::new_v4()));
        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        let product = seed_product(&db, "Galaxy M34", 100_000, 5).await;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let sales = db.sales();
            let request = request_for(&product, 1);
            handles.push(tokio::spawn(
                async move { sales.process_sale(&request).await },
            ));
        }

        let mut committed = Vec::new();
        let mut rejected = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(processed) => committed.push(processed.sale.invoice_number),
                Err(SaleTxError::Domain(CoreError::InsufficientStock { .. })) => rejected += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        // Exactly the available stock sells, never more
        assert_eq!(committed.len(), 5);
        assert_eq!(rejected, 3);

        let drained = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(drained.quantity, 0);

        // Every committed sale got a distinct invoice number
        let mut numbers = committed.clone();
        numbers.sort();
        numbers.dedup();
        assert_eq!(numbers.len(), committed.len());

        db.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }

    #[tokio::test]
    async fn test_customer_details_persisted() {
        let db = test_db().await;
        let product = seed_product(&db, "Galaxy M34", 100_000, 5).await;

        let mut request = request_for(&product, 1);
        request.customer = Some(kirana_core::CustomerInfo {
            name: Some("Ravi Kumar".to_string()),
            phone: Some("9876543210".to_string()),
            address: None,
            gstin: None,
        });

        let result = db.sales().process_sale(&request).await.unwrap();
        let fetched = db
            .sales()
            .get_by_id(&result.sale.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.customer_name.as_deref(), Some("Ravi Kumar"));
        assert_eq!(fetched.customer_phone.as_deref(), Some("9876543210"));
    }
}
