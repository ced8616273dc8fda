//! MCP service implementation using rmcp.
//!
//! This module defines the SchemaService struct with all schema tools
//! exposed via the MCP protocol using the rmcp framework's macros.

use crate::db::SqlExecutor;
use crate::tools::connections::{ConnectionToolHandler, FindTableConnectionsInput};
use crate::tools::ddl::{AlterTableInput, CreateTableInput, DdlToolHandler, DropTableInput};
use crate::tools::response::success_response;
use crate::tools::schema::{DescribeTableInput, SchemaToolHandler};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct SchemaService {
    /// Shared executor for all database operations
    executor: Arc<dyn SqlExecutor>,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

impl SchemaService {
    /// Create a new SchemaService over the given executor.
    pub fn new(executor: Arc<dyn SqlExecutor>) -> Self {
        Self {
            executor,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl SchemaService {
    #[tool(
        description = "Create a new table.\nThe query must start with CREATE TABLE and is executed as-is."
    )]
    async fn create_table(
        &self,
        Parameters(input): Parameters<CreateTableInput>,
    ) -> Result<CallToolResult, McpError> {
        let handler = DdlToolHandler::new(self.executor.clone());
        let result = handler.create_table(input).await?;
        success_response(&result)
    }

    #[tool(
        description = "Alter an existing table.\nThe query must start with ALTER TABLE and is executed as-is."
    )]
    async fn alter_table(
        &self,
        Parameters(input): Parameters<AlterTableInput>,
    ) -> Result<CallToolResult, McpError> {
        let handler = DdlToolHandler::new(self.executor.clone());
        let result = handler.alter_table(input).await?;
        success_response(&result)
    }

    #[tool(
        description = "Drop a table.\nRequires confirm=true; without it nothing is dropped and success is false.\nFails if the table does not exist."
    )]
    async fn drop_table(
        &self,
        Parameters(input): Parameters<DropTableInput>,
    ) -> Result<CallToolResult, McpError> {
        let handler = DdlToolHandler::new(self.executor.clone());
        let result = handler.drop_table(input).await?;
        success_response(&result)
    }

    #[tool(description = "List all tables in the current database, ordered by name.")]
    async fn list_tables(&self) -> Result<CallToolResult, McpError> {
        let handler = SchemaToolHandler::new(self.executor.clone());
        let tables = handler.list_tables().await?;
        success_response(&tables)
    }

    #[tool(
        description = "Describe the columns of a table.\nReturns name, type, notnull, default_value and primary_key for each column."
    )]
    async fn describe_table(
        &self,
        Parameters(input): Parameters<DescribeTableInput>,
    ) -> Result<CallToolResult, McpError> {
        let handler = SchemaToolHandler::new(self.executor.clone());
        let columns = handler.describe_table(input).await?;
        success_response(&columns)
    }

    #[tool(
        description = "Find foreign-key connections for a set of tables.\nEdges are grouped as internal_connections (both tables in the set), external_referenced (a listed table references an outside table) and external_references (an outside table references a listed table)."
    )]
    async fn find_table_connections(
        &self,
        Parameters(input): Parameters<FindTableConnectionsInput>,
    ) -> Result<CallToolResult, McpError> {
        let handler = ConnectionToolHandler::new(self.executor.clone());
        let set = handler.find_table_connections(input).await?;
        success_response(&set)
    }
}

#[tool_handler]
impl ServerHandler for SchemaService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "schema-mcp-server".to_owned(),
                title: Some("Schema MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(format!(
                "Schema tools for a {} database.\n\
                \n\
                ## Workflow\n\
                1. Call `list_tables` to see existing tables\n\
                2. Use `describe_table` and `find_table_connections` to inspect structure\n\
                3. Use `create_table` / `alter_table` with full DDL statements\n\
                4. `drop_table` only acts when `confirm` is true\n\
                \n\
                ## Notes\n\
                - Statements are checked by their leading keywords only\n\
                - Table names are case-sensitive and must match `list_tables` output",
                self.executor.database_type()
            )),
        }
    }
}
