//! Query execution engine.
//!
//! Handlers never touch a pool directly. They go through [`SqlExecutor`],
//! which runs SQL and hands back dialect-neutral JSON rows. [`QueryExecutor`]
//! is the pool-backed implementation; tests substitute their own.
//!
//! # Architecture
//!
//! The executor uses database-specific implementations organized in submodules:
//! - `mysql`: MySQL-specific fetch and execute
//! - `postgres`: PostgreSQL-specific fetch and execute
//! - `sqlite`: SQLite-specific fetch and execute
//!
//! Each submodule provides identical functionality adapted to the driver.

use crate::db::pool::DbPool;
use crate::db::types::RowToJson;
use crate::error::{DbError, DbResult};
use crate::models::DatabaseType;
use async_trait::async_trait;
use futures_util::TryStreamExt;
use serde_json::Value as JsonValue;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::debug;

/// One result row: column name to JSON value.
pub type Row = serde_json::Map<String, JsonValue>;

/// Runs SQL against the configured database.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Dialect used to build catalog queries for this executor.
    fn database_type(&self) -> DatabaseType;

    /// Run a query and return every row. Parameters bind as strings, in order.
    async fn fetch_all(&self, sql: &str, params: &[String]) -> DbResult<Vec<Row>>;

    /// Run a statement verbatim and return the affected row count.
    async fn execute(&self, sql: &str) -> DbResult<u64>;
}

/// Pool-backed [`SqlExecutor`] with a per-statement timeout.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    pool: DbPool,
    timeout: Duration,
}

impl QueryExecutor {
    pub fn new(pool: DbPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl SqlExecutor for QueryExecutor {
    fn database_type(&self) -> DatabaseType {
        self.pool.db_type()
    }

    async fn fetch_all(&self, sql: &str, params: &[String]) -> DbResult<Vec<Row>> {
        let start = Instant::now();
        debug!(
            sql = %sql,
            params = params.len(),
            timeout_secs = self.timeout.as_secs(),
            "Executing query"
        );

        let rows = match &self.pool {
            DbPool::MySql(p) => mysql::fetch_rows(p, sql, params, self.timeout).await?,
            DbPool::Postgres(p) => postgres::fetch_rows(p, sql, params, self.timeout).await?,
            DbPool::SQLite(p) => sqlite::fetch_rows(p, sql, params, self.timeout).await?,
        };

        debug!(
            rows = rows.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Query complete"
        );
        Ok(rows)
    }

    async fn execute(&self, sql: &str) -> DbResult<u64> {
        debug!(
            sql = %sql,
            timeout_secs = self.timeout.as_secs(),
            "Executing statement"
        );

        match &self.pool {
            DbPool::MySql(p) => mysql::execute(p, sql, self.timeout).await,
            DbPool::Postgres(p) => postgres::execute(p, sql, self.timeout).await,
            DbPool::SQLite(p) => sqlite::execute(p, sql, self.timeout).await,
        }
    }
}

fn timeout_error(operation: &str, timeout: Duration) -> DbError {
    DbError::timeout(operation, timeout.as_secs() as u32)
}

fn to_json_rows<R: RowToJson>(rows: Vec<R>) -> Vec<Row> {
    rows.iter().map(RowToJson::to_json_map).collect()
}

// The three modules below are deliberately parallel; only the driver types differ.

mod mysql {
    use super::*;
    use sqlx::MySqlPool;

    pub async fn fetch_rows(
        pool: &MySqlPool,
        sql: &str,
        params: &[String],
        query_timeout: Duration,
    ) -> DbResult<Vec<Row>> {
        // When params is empty, use raw SQL to avoid prepared statement issues
        let rows_future = async {
            if params.is_empty() {
                use sqlx::Executor;
                pool.fetch(sql).try_collect::<Vec<_>>().await
            } else {
                let mut query = sqlx::query(sql);
                for param in params {
                    query = query.bind(param.as_str());
                }
                query.fetch(pool).try_collect::<Vec<_>>().await
            }
        };

        match timeout(query_timeout, rows_future).await {
            Ok(Ok(rows)) => Ok(to_json_rows(rows)),
            Ok(Err(e)) => Err(DbError::from(e)),
            Err(_) => Err(timeout_error("query execution", query_timeout)),
        }
    }

    pub async fn execute(pool: &MySqlPool, sql: &str, query_timeout: Duration) -> DbResult<u64> {
        // DDL is sent as raw SQL; not every statement can be prepared.
        use sqlx::Executor;
        match timeout(query_timeout, pool.execute(sql)).await {
            Ok(Ok(r)) => Ok(r.rows_affected()),
            Ok(Err(e)) => Err(DbError::from(e)),
            Err(_) => Err(timeout_error("statement execution", query_timeout)),
        }
    }
}

mod postgres {
    use super::*;
    use sqlx::PgPool;

    pub async fn fetch_rows(
        pool: &PgPool,
        sql: &str,
        params: &[String],
        query_timeout: Duration,
    ) -> DbResult<Vec<Row>> {
        let rows_future = async {
            if params.is_empty() {
                use sqlx::Executor;
                pool.fetch(sql).try_collect::<Vec<_>>().await
            } else {
                let mut query = sqlx::query(sql);
                for param in params {
                    query = query.bind(param.as_str());
                }
                query.fetch(pool).try_collect::<Vec<_>>().await
            }
        };

        match timeout(query_timeout, rows_future).await {
            Ok(Ok(rows)) => Ok(to_json_rows(rows)),
            Ok(Err(e)) => Err(DbError::from(e)),
            Err(_) => Err(timeout_error("query execution", query_timeout)),
        }
    }

    pub async fn execute(pool: &PgPool, sql: &str, query_timeout: Duration) -> DbResult<u64> {
        use sqlx::Executor;
        match timeout(query_timeout, pool.execute(sql)).await {
            Ok(Ok(r)) => Ok(r.rows_affected()),
            Ok(Err(e)) => Err(DbError::from(e)),
            Err(_) => Err(timeout_error("statement execution", query_timeout)),
        }
    }
}

mod sqlite {
    use super::*;
    use sqlx::SqlitePool;

    pub async fn fetch_rows(
        pool: &SqlitePool,
        sql: &str,
        params: &[String],
        query_timeout: Duration,
    ) -> DbResult<Vec<Row>> {
        let rows_future = async {
            if params.is_empty() {
                use sqlx::Executor;
                pool.fetch(sql).try_collect::<Vec<_>>().await
            } else {
                let mut query = sqlx::query(sql);
                for param in params {
                    query = query.bind(param.as_str());
                }
                query.fetch(pool).try_collect::<Vec<_>>().await
            }
        };

        match timeout(query_timeout, rows_future).await {
            Ok(Ok(rows)) => Ok(to_json_rows(rows)),
            Ok(Err(e)) => Err(DbError::from(e)),
            Err(_) => Err(timeout_error("query execution", query_timeout)),
        }
    }

    pub async fn execute(pool: &SqlitePool, sql: &str, query_timeout: Duration) -> DbResult<u64> {
        use sqlx::Executor;
        match timeout(query_timeout, pool.execute(sql)).await {
            Ok(Ok(r)) => Ok(r.rows_affected()),
            Ok(Err(e)) => Err(DbError::from(e)),
            Err(_) => Err(timeout_error("statement execution", query_timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;

    async fn sqlite_executor() -> (tempfile::TempDir, QueryExecutor) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("exec.db").display());
        let config = DatabaseConfig::parse(&url).unwrap();
        let pool = DbPool::connect(&config, Duration::from_secs(5))
            .await
            .unwrap();
        (dir, QueryExecutor::new(pool, Duration::from_secs(5)))
    }

    #[tokio::test]
    async fn test_execute_and_fetch_sqlite() {
        let (_dir, executor) = sqlite_executor().await;
        assert_eq!(executor.database_type(), DatabaseType::SQLite);

        executor
            .execute("CREATE TABLE items (id INTEGER PRIMARY KEY, label TEXT, price REAL, raw BLOB)")
            .await
            .unwrap();
        executor
            .execute("INSERT INTO items VALUES (1, 'pen', 1.5, x'6869'), (2, NULL, NULL, NULL)")
            .await
            .unwrap();

        let rows = executor
            .fetch_all("SELECT * FROM items ORDER BY id", &[])
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id"], 1);
        assert_eq!(rows[0]["label"], "pen");
        assert_eq!(rows[0]["price"], 1.5);
        assert_eq!(rows[0]["raw"], "hi");
        assert_eq!(rows[1]["label"], JsonValue::Null);
    }

    #[tokio::test]
    async fn test_fetch_binds_string_params() {
        let (_dir, executor) = sqlite_executor().await;
        executor
            .execute("CREATE TABLE t (name TEXT)")
            .await
            .unwrap();
        executor
            .execute("INSERT INTO t VALUES ('a'), ('b'), ('c')")
            .await
            .unwrap();

        let rows = executor
            .fetch_all(
                "SELECT name FROM t WHERE name IN (?, ?) ORDER BY name",
                &["c".to_string(), "a".to_string()],
            )
            .await
            .unwrap();
        let names: Vec<_> = rows.iter().map(|r| r["name"].clone()).collect();
        assert_eq!(names, vec![JsonValue::from("a"), JsonValue::from("c")]);
    }

    #[tokio::test]
    async fn test_execute_reports_database_errors() {
        let (_dir, executor) = sqlite_executor().await;
        let err = executor.execute("CREATE TABLE (").await.unwrap_err();
        assert!(matches!(err, DbError::Execution { .. }));
    }
}
