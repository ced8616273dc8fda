//! Database abstraction layer.
//!
//! This module provides database access functionality:
//! - Connection pool management
//! - Query execution behind the [`SqlExecutor`] trait
//! - Dialect-specific catalog SQL
//! - Row to JSON conversion

pub mod dialect;
pub mod executor;
pub mod pool;
pub mod types;

pub use dialect::CatalogQuery;
pub use executor::{QueryExecutor, Row, SqlExecutor};
pub use pool::DbPool;
