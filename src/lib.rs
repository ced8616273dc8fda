//! Schema MCP Server Library
//!
//! This library provides MCP (Model Context Protocol) tools for AI assistants
//! to create, alter, drop and inspect tables in SQL databases
//! (SQLite, PostgreSQL, MySQL), and to map the foreign keys between them.

pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::DbError;
pub use mcp::SchemaService;
