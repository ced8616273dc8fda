//! Foreign-key connection discovery.
//!
//! This module implements the `find_table_connections` MCP tool. Given a set
//! of tables, it fetches every foreign-key edge with at least one endpoint in
//! the set and partitions the edges by direction:
//!
//! | declaring table | referenced table | category               |
//! |-----------------|------------------|------------------------|
//! | in set          | in set           | `internal_connections` |
//! | in set          | outside          | `external_referenced`  |
//! | outside         | in set           | `external_references`  |
//!
//! Every edge lands in exactly one category, so the three counts always sum
//! to `total_connections_found`.

use crate::db::SqlExecutor;
use crate::error::{DbError, DbResult};
use crate::models::{ConnectionSet, ConnectionSummary, ForeignKeyEdge};
use crate::tools::schema::{ensure_tables_exist, fetch_catalog};
use schemars::JsonSchema;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

/// Input for the find_table_connections tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FindTableConnectionsInput {
    /// Tables whose foreign-key connections should be found
    #[serde(rename = "tableNames", alias = "table_names", default)]
    pub table_names: Vec<String>,
}

/// Partition `edges` relative to `requested`.
///
/// Fails with an internal error if an edge touches none of the requested
/// tables, which means the catalog query did not filter as expected.
pub fn classify_connections(
    requested: &[String],
    edges: Vec<ForeignKeyEdge>,
) -> DbResult<ConnectionSet> {
    let members: HashSet<&str> = requested.iter().map(String::as_str).collect();
    let total_connections_found = edges.len();

    let mut internal_connections = Vec::new();
    let mut external_referenced = Vec::new();
    let mut external_references = Vec::new();

    for edge in edges {
        let from_inside = members.contains(edge.table_name.as_str());
        let to_inside = members.contains(edge.referenced_table_name.as_str());
        match (from_inside, to_inside) {
            (true, true) => internal_connections.push(edge),
            (true, false) => external_referenced.push(edge),
            (false, true) => external_references.push(edge),
            (false, false) => {
                return Err(DbError::internal(format!(
                    "Foreign key '{}' ({} -> {}) touches none of the requested tables",
                    edge.constraint_name, edge.table_name, edge.referenced_table_name
                )));
            }
        }
    }

    let summary = ConnectionSummary {
        internal_connections: internal_connections.len(),
        external_referenced: external_referenced.len(),
        external_references: external_references.len(),
    };

    Ok(ConnectionSet {
        requested_tables: requested.to_vec(),
        total_connections_found,
        internal_connections,
        external_referenced,
        external_references,
        summary,
    })
}

pub struct ConnectionToolHandler {
    executor: Arc<dyn SqlExecutor>,
}

impl ConnectionToolHandler {
    pub fn new(executor: Arc<dyn SqlExecutor>) -> Self {
        Self { executor }
    }

    pub async fn find_table_connections(
        &self,
        input: FindTableConnectionsInput,
    ) -> DbResult<ConnectionSet> {
        self.find(&input.table_names)
            .await
            .map_err(|e| e.context("Error finding table connections"))
    }

    async fn find(&self, tables: &[String]) -> DbResult<ConnectionSet> {
        if tables.is_empty() {
            return Err(DbError::validation("At least one table name is required"));
        }

        let executor = self.executor.as_ref();
        ensure_tables_exist(executor, tables).await?;

        let query = executor.database_type().table_connections_query(tables);
        let edges = fetch_catalog(executor, &query)
            .await?
            .iter()
            .map(ForeignKeyEdge::from_row)
            .collect::<DbResult<Vec<_>>>()?;

        let set = classify_connections(tables, edges)?;

        info!(
            tables = tables.len(),
            total = set.total_connections_found,
            internal = set.summary.internal_connections,
            external_referenced = set.summary.external_referenced,
            external_references = set.summary.external_references,
            "Found table connections"
        );
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(from: &str, column: &str, to: &str) -> ForeignKeyEdge {
        ForeignKeyEdge {
            table_name: from.to_string(),
            column_name: column.to_string(),
            referenced_table_name: to.to_string(),
            referenced_column_name: "id".to_string(),
            constraint_name: format!("fk_{}_{}", from, to),
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_classify_orders_users_products() {
        let requested = names(&["orders", "users", "products"]);
        let edges = vec![
            edge("orders", "user_id", "users"),
            edge("products", "category_id", "categories"),
        ];

        let set = classify_connections(&requested, edges).unwrap();
        assert_eq!(set.requested_tables, requested);
        assert_eq!(set.total_connections_found, 2);
        assert_eq!(set.internal_connections, vec![edge("orders", "user_id", "users")]);
        assert_eq!(
            set.external_referenced,
            vec![edge("products", "category_id", "categories")]
        );
        assert!(set.external_references.is_empty());
        assert_eq!(set.summary.internal_connections, 1);
        assert_eq!(set.summary.external_referenced, 1);
        assert_eq!(set.summary.external_references, 0);
    }

    #[test]
    fn test_classify_inbound_edge() {
        let requested = names(&["users"]);
        let set = classify_connections(&requested, vec![edge("orders", "user_id", "users")])
            .unwrap();
        assert_eq!(set.external_references.len(), 1);
        assert!(set.internal_connections.is_empty());
        assert!(set.external_referenced.is_empty());
    }

    #[test]
    fn test_classify_self_reference_is_internal() {
        let requested = names(&["employees"]);
        let set = classify_connections(
            &requested,
            vec![edge("employees", "manager_id", "employees")],
        )
        .unwrap();
        assert_eq!(set.summary.internal_connections, 1);
    }

    #[test]
    fn test_classify_counts_always_sum_to_total() {
        let requested = names(&["a", "b"]);
        let edges = vec![
            edge("a", "b_id", "b"),
            edge("b", "a_id", "a"),
            edge("a", "x_id", "x"),
            edge("y", "a_id", "a"),
            edge("z", "b_id", "b"),
        ];
        let set = classify_connections(&requested, edges).unwrap();
        let s = set.summary;
        assert_eq!(
            s.internal_connections + s.external_referenced + s.external_references,
            set.total_connections_found
        );
        assert_eq!((s.internal_connections, s.external_referenced, s.external_references), (2, 1, 2));
    }

    #[test]
    fn test_classify_no_edges() {
        let requested = names(&["lonely"]);
        let set = classify_connections(&requested, Vec::new()).unwrap();
        assert_eq!(set.total_connections_found, 0);
        assert_eq!(set.summary, ConnectionSummary::default());
    }

    #[test]
    fn test_classify_keeps_duplicate_requested_names() {
        let requested = names(&["users", "users"]);
        let set = classify_connections(&requested, Vec::new()).unwrap();
        assert_eq!(set.requested_tables, requested);
    }

    #[test]
    fn test_classify_rejects_unrelated_edge() {
        let requested = names(&["users"]);
        let err = classify_connections(&requested, vec![edge("a", "b_id", "b")]).unwrap_err();
        assert!(matches!(err, DbError::Internal { .. }));
    }

    #[test]
    fn test_input_accepts_both_spellings() {
        let input: FindTableConnectionsInput =
            serde_json::from_str(r#"{ "tableNames": ["a", "b"] }"#).unwrap();
        assert_eq!(input.table_names, names(&["a", "b"]));

        let input: FindTableConnectionsInput =
            serde_json::from_str(r#"{ "table_names": ["c"] }"#).unwrap();
        assert_eq!(input.table_names, names(&["c"]));

        let input: FindTableConnectionsInput = serde_json::from_str("{}").unwrap();
        assert!(input.table_names.is_empty());
    }
}
