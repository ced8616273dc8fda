//! Data models for the Schema MCP Server.
//!
//! This module re-exports all model types used throughout the application.

pub mod connection;
pub mod schema;

// Re-export commonly used types
pub use connection::{DatabaseType, mask_connection_string};
pub use schema::{
    ColumnDescriptor, ConnectionSet, ConnectionSummary, ForeignKeyEdge, OperationResult,
    table_name_from_row,
};
