//! Schema-related data models.
//!
//! Catalog queries come back as loosely typed rows. Each type here owns the
//! conversion from such a row so that classification and response shaping
//! only ever see checked, strongly typed values.

use crate::db::Row;
use crate::error::{DbError, DbResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Outcome of a schema mutation (`create_table`, `alter_table`, `drop_table`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OperationResult {
    pub success: bool,
    pub message: String,
}

impl OperationResult {
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// A soft failure: nothing was executed and nothing went wrong.
    pub fn skipped(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// One column of a described table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnDescriptor {
    pub name: String,
    /// Dialect-native type, e.g. `INTEGER`, `varchar(255)`, `character varying`
    #[serde(rename = "type")]
    pub data_type: String,
    pub notnull: bool,
    pub default_value: Option<JsonValue>,
    pub primary_key: bool,
}

impl ColumnDescriptor {
    /// Build from a describe-table row with `name, type, notnull, dflt_value, pk` columns.
    pub fn from_row(row: &Row) -> DbResult<Self> {
        let default_value = match lookup(row, "dflt_value") {
            None | Some(JsonValue::Null) => None,
            Some(v) => Some(v.clone()),
        };

        Ok(Self {
            name: required_string(row, "name")?,
            data_type: required_string(row, "type")?,
            notnull: flag(row, "notnull"),
            default_value,
            primary_key: flag(row, "pk"),
        })
    }
}

/// One foreign-key constraint column found in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ForeignKeyEdge {
    /// Table declaring the constraint
    pub table_name: String,
    pub column_name: String,
    pub referenced_table_name: String,
    pub referenced_column_name: String,
    pub constraint_name: String,
}

impl ForeignKeyEdge {
    pub fn from_row(row: &Row) -> DbResult<Self> {
        Ok(Self {
            table_name: required_string(row, "table_name")?,
            column_name: required_string(row, "column_name")?,
            referenced_table_name: required_string(row, "referenced_table_name")?,
            referenced_column_name: required_string(row, "referenced_column_name")?,
            constraint_name: required_string(row, "constraint_name")?,
        })
    }
}

/// Per-category counts of a [`ConnectionSet`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ConnectionSummary {
    pub internal_connections: usize,
    pub external_referenced: usize,
    pub external_references: usize,
}

/// Foreign-key edges touching a set of tables, partitioned by direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ConnectionSet {
    /// Echo of the input, in input order, duplicates kept
    pub requested_tables: Vec<String>,
    pub total_connections_found: usize,
    /// Both endpoints are requested tables
    pub internal_connections: Vec<ForeignKeyEdge>,
    /// A requested table points at an outside table
    pub external_referenced: Vec<ForeignKeyEdge>,
    /// An outside table points at a requested table
    pub external_references: Vec<ForeignKeyEdge>,
    pub summary: ConnectionSummary,
}

/// Extract the `name` column from a list-tables row.
pub fn table_name_from_row(row: &Row) -> DbResult<String> {
    required_string(row, "name")
}

/// Look up a column, falling back to a case-insensitive match.
///
/// Some catalogs upper-case result labels (MySQL `information_schema` under
/// certain server modes), so aliases are not guaranteed to come back verbatim.
fn lookup<'a>(row: &'a Row, key: &str) -> Option<&'a JsonValue> {
    row.get(key).or_else(|| {
        row.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    })
}

fn scalar_to_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn required_string(row: &Row, key: &str) -> DbResult<String> {
    lookup(row, key)
        .and_then(scalar_to_string)
        .ok_or_else(|| DbError::internal(format!("Catalog row is missing column '{}'", key)))
}

/// Coerce a catalog flag (0/1, true/false, "YES"/"NO") into a strict boolean.
fn flag(row: &Row, key: &str) -> bool {
    match lookup(row, key) {
        Some(JsonValue::Bool(b)) => *b,
        Some(JsonValue::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(JsonValue::String(s)) => {
            let s = s.trim();
            s == "1" || s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("yes")
        }
        _ => false,
    }
}
