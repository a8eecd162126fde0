//! # Repository Layer
//!
//! One repository per aggregate:
//!
//! - [`product::ProductRepository`] - catalog CRUD, POS search, stock
//! - [`sale::SaleRepository`] - the transactional sale processor plus
//!   retrieval and filtered listing

pub mod product;
pub mod sale;

pub use product::ProductRepository;
pub use sale::SaleRepository;
