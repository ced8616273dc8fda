//! Error types for the Schema MCP Server.
//!
//! Every tool failure is one of a small number of kinds. Handlers prefix the
//! message with their own context via [`DbError::context`] while keeping the
//! kind intact, so callers can still tell a missing table from a bad argument.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    /// Malformed or missing input (empty name, wrong statement prefix, empty table list).
    #[error("{message}")]
    Validation { message: String },

    /// One or more referenced tables do not exist.
    #[error("{message}")]
    NotFound { message: String, tables: Vec<String> },

    /// The database rejected or failed to run a statement.
    #[error("{message}")]
    Execution {
        message: String,
        /// e.g., "42S02" for unknown table
        sql_state: Option<String>,
        suggestion: String,
    },

    #[error("Connection failed: {message}")]
    Connection { message: String, suggestion: String },

    #[error("Timeout: {operation} exceeded {elapsed_secs}s")]
    Timeout {
        operation: String,
        elapsed_secs: u32,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DbError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not-found error naming every missing table.
    pub fn tables_not_found(tables: Vec<String>) -> Self {
        let message = if tables.len() == 1 {
            format!("Table '{}' does not exist", tables[0])
        } else {
            format!("Tables not found: {}", tables.join(", "))
        };
        Self::NotFound { message, tables }
    }

    /// Create an execution error with optional SQL state.
    pub fn execution(
        message: impl Into<String>,
        sql_state: Option<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Execution {
            message: message.into(),
            sql_state,
            suggestion: suggestion.into(),
        }
    }

    /// Create a connection error with a helpful suggestion.
    pub fn connection(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(operation: impl Into<String>, elapsed_secs: u32) -> Self {
        Self::Timeout {
            operation: operation.into(),
            elapsed_secs,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Prefix the error message with `prefix: `, keeping the error kind.
    pub fn context(self, prefix: &str) -> Self {
        let wrap = |message: String| format!("{}: {}", prefix, message);
        match self {
            Self::Validation { message } => Self::Validation {
                message: wrap(message),
            },
            Self::NotFound { message, tables } => Self::NotFound {
                message: wrap(message),
                tables,
            },
            Self::Execution {
                message,
                sql_state,
                suggestion,
            } => Self::Execution {
                message: wrap(message),
                sql_state,
                suggestion,
            },
            Self::Connection {
                message,
                suggestion,
            } => Self::Connection {
                message: wrap(message),
                suggestion,
            },
            Self::Internal { message } => Self::Internal {
                message: wrap(message),
            },
            // Timeouts carry no free-form message; fold them into an execution error.
            timeout @ Self::Timeout { .. } => Self::Execution {
                message: wrap(timeout.to_string()),
                sql_state: None,
                suggestion: "Consider increasing --query-timeout".to_string(),
            },
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Connection { suggestion, .. } => Some(suggestion),
            Self::Execution { suggestion, .. } => Some(suggestion),
            _ => None,
        }
    }
}

/// Convert sqlx errors to DbError.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => DbError::connection(
                msg.to_string(),
                "Check the connection string format and credentials",
            ),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                DbError::execution(
                    db_err.message(),
                    code,
                    "Check the SQL syntax and referenced objects",
                )
            }
            sqlx::Error::PoolTimedOut => DbError::connection(
                "Timed out acquiring a connection from the pool",
                "Increase --connect-timeout or the acquire_timeout / max_connections pool options",
            ),
            sqlx::Error::PoolClosed => {
                DbError::connection("Connection pool is closed", "Restart the server")
            }
            sqlx::Error::Io(io_err) => DbError::connection(
                format!("I/O error: {}", io_err),
                "Check network connectivity and database server status",
            ),
            sqlx::Error::Tls(tls_err) => DbError::connection(
                format!("TLS error: {}", tls_err),
                "Verify TLS configuration and certificates",
            ),
            sqlx::Error::Protocol(msg) => DbError::connection(
                format!("Protocol error: {}", msg),
                "Check database server compatibility",
            ),
            sqlx::Error::ColumnDecode { index, source } => {
                DbError::internal(format!("Failed to decode column {}: {}", index, source))
            }
            sqlx::Error::Decode(source) => DbError::internal(format!("Decode error: {}", source)),
            sqlx::Error::WorkerCrashed => DbError::internal("Database worker crashed"),
            other => DbError::execution(
                other.to_string(),
                None,
                "Check the SQL statement and database state",
            ),
        }
    }
}

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Build suggestion data as JSON value.
fn suggestion_data(suggestion: Option<&str>) -> Option<serde_json::Value> {
    suggestion.map(|s| serde_json::json!({ "suggestion": s }))
}

/// Convert DbError to MCP ErrorData for semantic error categorization.
impl From<DbError> for rmcp::ErrorData {
    fn from(err: DbError) -> Self {
        match &err {
            DbError::Validation { .. } => rmcp::ErrorData::invalid_params(err.to_string(), None),

            DbError::NotFound { tables, .. } => rmcp::ErrorData::resource_not_found(
                err.to_string(),
                Some(serde_json::json!({
                    "tables": tables,
                    "suggestion": "Call list_tables to see the available tables",
                })),
            ),

            DbError::Execution {
                message,
                sql_state,
                suggestion,
            } => {
                let msg = match sql_state {
                    Some(code) => format!("{} (SQLSTATE: {})", message, code),
                    None => message.clone(),
                };
                rmcp::ErrorData::internal_error(msg, suggestion_data(Some(suggestion)))
            }

            DbError::Timeout { .. } => rmcp::ErrorData::internal_error(
                err.to_string(),
                suggestion_data(Some("Consider increasing --query-timeout")),
            ),

            DbError::Connection { .. } | DbError::Internal { .. } => {
                rmcp::ErrorData::internal_error(err.to_string(), suggestion_data(err.suggestion()))
            }
        }
    }
}
