//! # Product Repository
//!
//! Catalog database operations: POS search, point lookups, CRUD and
//! stock adjustments.
//!
//! Stock is only ever *decremented* by the sale transaction in
//! [`super::sale`], and only through a conditional update that refuses
//! to go below zero. This repository exposes the complementary
//! operations: restocking deltas and catalog edits.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use kirana_core::Product;

/// Columns selected for every product row.
const PRODUCT_COLUMNS: &str = "id, name, brand, model, category, price_paise, gst_rate_bps, \
     quantity, low_stock_threshold, barcode, is_active, created_at, updated_at";

/// Search criteria for the POS product lookup.
///
/// A barcode, when present, wins over everything else (scanner input is
/// exact). Otherwise the free-text query matches name, brand and model.
#[derive(Debug, Clone, Default)]
pub struct ProductSearchFilter {
    /// Free-text match against name/brand/model.
    pub query: Option<String>,
    /// Exact barcode match (scanner path).
    pub barcode: Option<String>,
    /// Restrict to one category.
    pub category: Option<String>,
    /// Only products with quantity > 0.
    pub in_stock: bool,
    /// Maximum results; 0 falls back to the default of 20.
    pub limit: u32,
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Gets an active product by its barcode.
    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        let sql =
            format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE barcode = ?1 AND is_active = 1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(barcode)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Searches the catalog for the sale screen.
    ///
    /// Ordered by quantity descending then name, so sellable items
    /// surface first.
    pub async fn search(&self, filter: &ProductSearchFilter) -> DbResult<Vec<Product>> {
        // Scanner path: exact barcode match, one result at most
        if let Some(barcode) = &filter.barcode {
            debug!(barcode = %barcode, "Product lookup by barcode");
            return Ok(self.get_by_barcode(barcode).await?.into_iter().collect());
        }

        let limit = if filter.limit == 0 { 20 } else { filter.limit };

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_active = 1"
        ));

        if let Some(query) = filter.query.as_deref().filter(|q| !q.trim().is_empty()) {
            let pattern = format!("%{}%", query.trim());
            qb.push(" AND (name LIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR brand LIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR model LIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }

        if let Some(category) = &filter.category {
            qb.push(" AND category = ");
            qb.push_bind(category.clone());
        }

        if filter.in_stock {
            qb.push(" AND quantity > 0");
        }

        qb.push(" ORDER BY quantity DESC, name ASC LIMIT ");
        qb.push_bind(limit as i64);

        let products = qb.build_query_as::<Product>().fetch_all(&self.pool).await?;

        debug!(count = products.len(), "Product search returned");
        Ok(products)
    }

    /// Inserts a new product. The id should be generated beforehand via
    /// [`generate_product_id`].
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, brand, model, category,
                price_paise, gst_rate_bps, quantity, low_stock_threshold,
                barcode, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.brand)
        .bind(&product.model)
        .bind(&product.category)
        .bind(product.price_paise)
        .bind(product.gst_rate_bps)
        .bind(product.quantity)
        .bind(product.low_stock_threshold)
        .bind(&product.barcode)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing product's catalog fields.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                brand = ?3,
                model = ?4,
                category = ?5,
                price_paise = ?6,
                gst_rate_bps = ?7,
                quantity = ?8,
                low_stock_threshold = ?9,
                barcode = ?10,
                is_active = ?11,
                updated_at = ?12
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.brand)
        .bind(&product.model)
        .bind(&product.category)
        .bind(product.price_paise)
        .bind(product.gst_rate_bps)
        .bind(product.quantity)
        .bind(product.low_stock_threshold)
        .bind(&product.barcode)
        .bind(product.is_active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Adjusts stock by a delta (positive for restocking).
    ///
    /// The WHERE guard keeps the result non-negative; a correction that
    /// would overshoot below zero is rejected rather than clamped.
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> DbResult<()> {
        debug!(id = %id, delta = %delta, "Adjusting stock");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET quantity = quantity + ?2, updated_at = ?3
            WHERE id = ?1 AND quantity + ?2 >= 0
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Soft-deletes a product. Historical sale lines still reference it.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting product");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET is_active = 0, updated_at = ?2 WHERE id = ?1",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts active products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
