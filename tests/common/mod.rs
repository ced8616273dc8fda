//! Shared test fixtures: a recording in-memory executor and a scratch SQLite database.

#![allow(dead_code)]

use async_trait::async_trait;
use schema_mcp_server::config::DatabaseConfig;
use schema_mcp_server::db::{DbPool, QueryExecutor, Row, SqlExecutor};
use schema_mcp_server::error::{DbError, DbResult};
use schema_mcp_server::models::DatabaseType;
use serde_json::Value as JsonValue;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Executor that answers catalog queries from canned rows and records every call.
pub struct RecordingExecutor {
    db_type: DatabaseType,
    tables: Vec<String>,
    connection_rows: Vec<Row>,
    describe_rows: Vec<Row>,
    fail_fetch: Option<String>,
    fail_execute: Option<String>,
    pub fetched: Mutex<Vec<(String, Vec<String>)>>,
    pub executed: Mutex<Vec<String>>,
}

impl RecordingExecutor {
    pub fn mysql(tables: &[&str]) -> Self {
        Self {
            db_type: DatabaseType::MySQL,
            tables: tables.iter().map(|t| t.to_string()).collect(),
            connection_rows: Vec::new(),
            describe_rows: Vec::new(),
            fail_fetch: None,
            fail_execute: None,
            fetched: Mutex::new(Vec::new()),
            executed: Mutex::new(Vec::new()),
        }
    }

    pub fn with_connection_rows(mut self, rows: Vec<JsonValue>) -> Self {
        self.connection_rows = rows.into_iter().map(row).collect();
        self
    }

    pub fn with_describe_rows(mut self, rows: Vec<JsonValue>) -> Self {
        self.describe_rows = rows.into_iter().map(row).collect();
        self
    }

    pub fn failing_fetch(mut self, message: &str) -> Self {
        self.fail_fetch = Some(message.to_string());
        self
    }

    pub fn failing_execute(mut self, message: &str) -> Self {
        self.fail_execute = Some(message.to_string());
        self
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub fn fetched(&self) -> Vec<(String, Vec<String>)> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl SqlExecutor for RecordingExecutor {
    fn database_type(&self) -> DatabaseType {
        self.db_type
    }

    async fn fetch_all(&self, sql: &str, params: &[String]) -> DbResult<Vec<Row>> {
        self.fetched
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));

        if let Some(message) = &self.fail_fetch {
            return Err(DbError::execution(message.clone(), None, "check the database"));
        }

        if sql == self.db_type.list_tables_query().sql {
            // MySQL may upper-case labels; exercise the case-insensitive lookup.
            return Ok(self
                .tables
                .iter()
                .map(|t| row(serde_json::json!({ "NAME": t })))
                .collect());
        }
        if sql.contains("referenced_table_name") {
            return Ok(self.connection_rows.clone());
        }
        Ok(self.describe_rows.clone())
    }

    async fn execute(&self, sql: &str) -> DbResult<u64> {
        if let Some(message) = &self.fail_execute {
            return Err(DbError::execution(
                message.clone(),
                Some("42000".to_string()),
                "check the statement",
            ));
        }
        self.executed.lock().unwrap().push(sql.to_string());
        Ok(0)
    }
}

pub fn row(value: JsonValue) -> Row {
    match value {
        JsonValue::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// A MySQL-style foreign key row, labels upper-cased.
pub fn fk_row(table: &str, column: &str, referenced: &str, constraint: &str) -> JsonValue {
    serde_json::json!({
        "TABLE_NAME": table,
        "COLUMN_NAME": column,
        "REFERENCED_TABLE_NAME": referenced,
        "REFERENCED_COLUMN_NAME": "id",
        "CONSTRAINT_NAME": constraint,
    })
}

pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// A fresh SQLite database in a temp directory. Keep the `TempDir` alive for the test.
pub async fn sqlite_executor() -> (TempDir, Arc<QueryExecutor>) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("schema.db").display());
    let config = DatabaseConfig::parse(&url).unwrap();
    let pool = DbPool::connect(&config, Duration::from_secs(5))
        .await
        .unwrap();
    (dir, Arc::new(QueryExecutor::new(pool, Duration::from_secs(5))))
}

/// users, orders -> users, categories, products -> categories.
pub async fn seed_shop(executor: &QueryExecutor) {
    for sql in [
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL)",
        "CREATE TABLE orders (id INTEGER PRIMARY KEY, user_id INTEGER REFERENCES users(id))",
        "CREATE TABLE categories (id INTEGER PRIMARY KEY, label TEXT)",
        "CREATE TABLE products (id INTEGER PRIMARY KEY, category_id INTEGER REFERENCES categories(id))",
    ] {
        executor.execute(sql).await.unwrap();
    }
}
