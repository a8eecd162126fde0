//! # kirana-db: Database Layer for Kirana POS
//!
//! SQLite persistence for the shop: catalog storage, the atomic sale
//! transaction and filtered retrieval.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Kirana POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   REST API (axum)                               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kirana-db (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────────┐  ┌─────────────────────────┐  │   │
//! │  │   │   pool   │  │  migrations  │  │       repository        │  │   │
//! │  │   │ Database │  │   embedded   │  │  products │ sales (tx)  │  │   │
//! │  │   └──────────┘  └──────────────┘  └─────────────────────────┘  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                      SQLite (WAL mode)                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Business rules live in `kirana-core`; this crate only decides how
//! they hit the disk. The one place the two meet is the sale transaction
//! in [`repository::sale`], which wraps the pure GST math in an
//! all-or-nothing SQLite transaction.

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::product::{generate_product_id, ProductRepository, ProductSearchFilter};
pub use repository::sale::{
    ProcessedSale, SaleListFilter, SaleListPage, SaleRepository, SaleTxError,
};
