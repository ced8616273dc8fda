//! MCP tool implementations.
//!
//! This module contains all schema tool handlers:
//! - `ddl`: `create_table`, `alter_table`, `drop_table`
//! - `schema`: `list_tables`, `describe_table`
//! - `connections`: `find_table_connections`
//! - `response`: success envelope shared by every tool

pub mod connections;
pub mod ddl;
pub mod response;
pub mod schema;

pub use connections::{ConnectionToolHandler, FindTableConnectionsInput, classify_connections};
pub use ddl::{AlterTableInput, CreateTableInput, DdlToolHandler, DropTableInput};
pub use response::success_response;
pub use schema::{DescribeTableInput, SchemaToolHandler};
