//! Integration tests for list_tables and describe_table.
//!
//! Tests verify that:
//! - Table listings are ordered and skip internal SQLite tables
//! - Column descriptors coerce catalog flags into booleans
//! - Missing tables and empty names are rejected before describing

mod common;

use common::{RecordingExecutor, sqlite_executor};
use schema_mcp_server::DbError;
use schema_mcp_server::db::SqlExecutor;
use schema_mcp_server::tools::schema::{DescribeTableInput, SchemaToolHandler};
use serde_json::json;
use std::sync::Arc;

fn describe(table: &str) -> DescribeTableInput {
    DescribeTableInput {
        table_name: table.to_string(),
    }
}

#[tokio::test]
async fn test_sqlite_list_tables_ordered_without_internal_tables() {
    let (_dir, executor) = sqlite_executor().await;
    for sql in [
        "CREATE TABLE zebra (id INTEGER PRIMARY KEY AUTOINCREMENT)",
        "CREATE TABLE apple (id INTEGER)",
        "CREATE VIEW apple_view AS SELECT * FROM apple",
    ] {
        executor.execute(sql).await.unwrap();
    }
    let handler = SchemaToolHandler::new(executor);

    // AUTOINCREMENT creates sqlite_sequence; views are not tables
    let tables = handler.list_tables().await.unwrap();
    assert_eq!(tables, vec!["apple".to_string(), "zebra".to_string()]);
}

#[tokio::test]
async fn test_sqlite_describe_table() {
    let (_dir, executor) = sqlite_executor().await;
    executor
        .execute(
            "CREATE TABLE accounts (
                id INTEGER PRIMARY KEY,
                email TEXT NOT NULL,
                status TEXT DEFAULT 'active',
                balance REAL
            )",
        )
        .await
        .unwrap();
    let handler = SchemaToolHandler::new(executor);

    let columns = handler.describe_table(describe("accounts")).await.unwrap();
    assert_eq!(columns.len(), 4);

    assert_eq!(columns[0].name, "id");
    assert_eq!(columns[0].data_type, "INTEGER");
    assert!(columns[0].primary_key);

    assert_eq!(columns[1].name, "email");
    assert!(columns[1].notnull);
    assert!(!columns[1].primary_key);
    assert!(columns[1].default_value.is_none());

    assert_eq!(columns[2].default_value, Some(json!("'active'")));
    assert!(!columns[2].notnull);

    assert_eq!(columns[3].data_type, "REAL");
}

#[tokio::test]
async fn test_sqlite_describe_missing_table() {
    let (_dir, executor) = sqlite_executor().await;
    let handler = SchemaToolHandler::new(executor);

    let err = handler.describe_table(describe("ghost")).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }));
    assert_eq!(
        err.to_string(),
        "Error describing table: Table 'ghost' does not exist"
    );
}

#[tokio::test]
async fn test_describe_empty_name_runs_no_query() {
    let executor = Arc::new(RecordingExecutor::mysql(&["t"]));
    let handler = SchemaToolHandler::new(executor.clone());

    let err = handler.describe_table(describe("")).await.unwrap_err();
    assert!(matches!(err, DbError::Validation { .. }));
    assert_eq!(err.to_string(), "Error describing table: Table name is required");
    assert!(executor.fetched().is_empty());
}

#[tokio::test]
async fn test_describe_coerces_mysql_flags() {
    let executor = Arc::new(RecordingExecutor::mysql(&["users"]).with_describe_rows(vec![
        json!({ "name": "id", "type": "int", "notnull": 1, "dflt_value": null, "pk": 1 }),
        json!({ "name": "nickname", "type": "varchar(30)", "notnull": 0, "dflt_value": "anon", "pk": 0 }),
    ]));
    let handler = SchemaToolHandler::new(executor.clone());

    let columns = handler.describe_table(describe("users")).await.unwrap();
    assert!(columns[0].notnull && columns[0].primary_key);
    assert!(!columns[1].notnull && !columns[1].primary_key);
    assert_eq!(columns[1].data_type, "varchar(30)");
    assert_eq!(columns[1].default_value, Some(json!("anon")));

    // Existence check, then the describe query bound to the table name
    let fetched = executor.fetched();
    assert_eq!(fetched.len(), 2);
    assert_eq!(fetched[1].1, vec!["users".to_string()]);
}

#[tokio::test]
async fn test_describe_serializes_wire_shape() {
    let executor = Arc::new(RecordingExecutor::mysql(&["users"]).with_describe_rows(vec![
        json!({ "name": "id", "type": "int", "notnull": 1, "dflt_value": null, "pk": 1 }),
    ]));
    let handler = SchemaToolHandler::new(executor);

    let columns = handler.describe_table(describe("users")).await.unwrap();
    assert_eq!(
        serde_json::to_value(&columns).unwrap(),
        json!([{
            "name": "id",
            "type": "int",
            "notnull": true,
            "default_value": null,
            "primary_key": true
        }])
    );
}

#[tokio::test]
async fn test_list_tables_failure_is_wrapped() {
    let executor = Arc::new(RecordingExecutor::mysql(&[]).failing_fetch("connection reset"));
    let handler = SchemaToolHandler::new(executor);

    let err = handler.list_tables().await.unwrap_err();
    assert_eq!(err.to_string(), "Error listing tables: connection reset");
}

#[tokio::test]
async fn test_sqlite_tables_starting_with_sqlite_are_listed() {
    let (_dir, executor) = sqlite_executor().await;
    for sql in [
        "CREATE TABLE sqlite3_backups (id INTEGER PRIMARY KEY, taken_at TEXT)",
        "CREATE TABLE sqliteusers (id INTEGER PRIMARY KEY)",
        "CREATE TABLE counters (id INTEGER PRIMARY KEY AUTOINCREMENT)",
    ] {
        executor.execute(sql).await.unwrap();
    }
    let handler = SchemaToolHandler::new(executor);

    // sqlite_sequence stays hidden; user tables sharing the prefix do not
    let tables = handler.list_tables().await.unwrap();
    assert_eq!(
        tables,
        vec![
            "counters".to_string(),
            "sqlite3_backups".to_string(),
            "sqliteusers".to_string()
        ]
    );

    let columns = handler
        .describe_table(describe("sqlite3_backups"))
        .await
        .unwrap();
    assert_eq!(columns.len(), 2);
    assert_eq!(columns[1].name, "taken_at");
}
