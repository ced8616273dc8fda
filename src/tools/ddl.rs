//! Schema mutation tools.
//!
//! This module implements the `create_table`, `alter_table` and `drop_table`
//! MCP tools. Statements are gated by a leading-keyword check only and then
//! sent to the database verbatim.

use crate::db::SqlExecutor;
use crate::error::{DbError, DbResult};
use crate::models::OperationResult;
use crate::tools::schema::ensure_tables_exist;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Input for the create_table tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateTableInput {
    /// CREATE TABLE statement to execute
    pub query: String,
}

/// Input for the alter_table tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AlterTableInput {
    /// ALTER TABLE statement to execute
    pub query: String,
}

/// Input for the drop_table tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DropTableInput {
    /// Name of the table to drop
    #[serde(rename = "tableName", alias = "table_name")]
    pub table_name: String,
    /// Must be true for the table to be dropped. Default: false
    #[serde(default)]
    pub confirm: bool,
}

pub const DROP_CONFIRMATION_REQUIRED: &str =
    "Safety confirmation required. Set confirm=true to proceed with dropping the table.";

/// True when the trimmed statement starts with `prefix`, ignoring case.
fn has_statement_prefix(query: &str, prefix: &str) -> bool {
    query.trim().to_lowercase().starts_with(prefix)
}

pub struct DdlToolHandler {
    executor: Arc<dyn SqlExecutor>,
}

impl DdlToolHandler {
    pub fn new(executor: Arc<dyn SqlExecutor>) -> Self {
        Self { executor }
    }

    pub async fn create_table(&self, input: CreateTableInput) -> DbResult<OperationResult> {
        self.run_statement(&input.query, "create table", "CREATE TABLE")
            .await
            .map_err(|e| e.context("SQL Error"))?;

        info!("Table created");
        Ok(OperationResult::succeeded("Table created successfully"))
    }

    pub async fn alter_table(&self, input: AlterTableInput) -> DbResult<OperationResult> {
        self.run_statement(&input.query, "alter table", "ALTER TABLE")
            .await
            .map_err(|e| e.context("SQL Error"))?;

        info!("Table altered");
        Ok(OperationResult::succeeded("Table altered successfully"))
    }

    pub async fn drop_table(&self, input: DropTableInput) -> DbResult<OperationResult> {
        self.drop(&input.table_name, input.confirm)
            .await
            .map_err(|e| e.context("Error dropping table"))
    }

    async fn run_statement(&self, query: &str, prefix: &str, keyword: &str) -> DbResult<()> {
        if !has_statement_prefix(query, prefix) {
            return Err(DbError::validation(format!(
                "Only {} statements are allowed",
                keyword
            )));
        }
        self.executor.execute(query).await?;
        Ok(())
    }

    async fn drop(&self, table_name: &str, confirm: bool) -> DbResult<OperationResult> {
        if table_name.is_empty() {
            return Err(DbError::validation("Table name is required"));
        }

        if !confirm {
            warn!(table = %table_name, "Drop requested without confirmation; skipped");
            return Ok(OperationResult::skipped(DROP_CONFIRMATION_REQUIRED));
        }

        let executor = self.executor.as_ref();
        ensure_tables_exist(executor, &[table_name.to_string()]).await?;

        let sql = format!(
            "DROP TABLE {}",
            executor.database_type().quote_identifier(table_name)
        );
        executor.execute(&sql).await?;

        info!(table = %table_name, "Table dropped");
        Ok(OperationResult::succeeded(format!(
            "Table '{}' dropped successfully",
            table_name
        )))
    }
}
