//! Schema introspection tools.
//!
//! This module implements the `list_tables` and `describe_table` MCP tools,
//! plus the table-existence check shared with the DDL and connection tools.

use crate::db::{CatalogQuery, SqlExecutor};
use crate::error::{DbError, DbResult};
use crate::models::{ColumnDescriptor, table_name_from_row};
use schemars::JsonSchema;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

/// Input for the describe_table tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DescribeTableInput {
    /// Name of the table to describe
    #[serde(rename = "tableName", alias = "table_name")]
    pub table_name: String,
}

/// Run a catalog query through the executor.
pub(crate) async fn fetch_catalog(
    executor: &dyn SqlExecutor,
    query: &CatalogQuery,
) -> DbResult<Vec<crate::db::Row>> {
    executor.fetch_all(&query.sql, &query.params).await
}

/// Every base table in the current schema, in catalog order.
pub(crate) async fn existing_tables(executor: &dyn SqlExecutor) -> DbResult<Vec<String>> {
    let query = executor.database_type().list_tables_query();
    fetch_catalog(executor, &query)
        .await?
        .iter()
        .map(table_name_from_row)
        .collect()
}

/// Fail with `NotFound` naming every requested table missing from the catalog.
pub(crate) async fn ensure_tables_exist(
    executor: &dyn SqlExecutor,
    tables: &[String],
) -> DbResult<()> {
    let existing: HashSet<String> = existing_tables(executor).await?.into_iter().collect();
    let missing: Vec<String> = tables
        .iter()
        .filter(|t| !existing.contains(*t))
        .cloned()
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DbError::tables_not_found(missing))
    }
}

pub struct SchemaToolHandler {
    executor: Arc<dyn SqlExecutor>,
}

impl SchemaToolHandler {
    pub fn new(executor: Arc<dyn SqlExecutor>) -> Self {
        Self { executor }
    }

    pub async fn list_tables(&self) -> DbResult<Vec<String>> {
        let tables = existing_tables(self.executor.as_ref())
            .await
            .map_err(|e| e.context("Error listing tables"))?;

        info!(count = tables.len(), "Listed tables");
        Ok(tables)
    }

    pub async fn describe_table(&self, input: DescribeTableInput) -> DbResult<Vec<ColumnDescriptor>> {
        self.describe(&input.table_name)
            .await
            .map_err(|e| e.context("Error describing table"))
    }

    async fn describe(&self, table_name: &str) -> DbResult<Vec<ColumnDescriptor>> {
        if table_name.is_empty() {
            return Err(DbError::validation("Table name is required"));
        }

        let executor = self.executor.as_ref();
        ensure_tables_exist(executor, &[table_name.to_string()]).await?;

        let query = executor.database_type().describe_table_query(table_name);
        let columns = fetch_catalog(executor, &query)
            .await?
            .iter()
            .map(ColumnDescriptor::from_row)
            .collect::<DbResult<Vec<_>>>()?;

        info!(
            table = %table_name,
            columns = columns.len(),
            "Described table"
        );
        Ok(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_input_accepts_both_spellings() {
        let input: DescribeTableInput =
            serde_json::from_str(r#"{ "tableName": "orders" }"#).unwrap();
        assert_eq!(input.table_name, "orders");

        let input: DescribeTableInput =
            serde_json::from_str(r#"{ "table_name": "users" }"#).unwrap();
        assert_eq!(input.table_name, "users");
    }
}
