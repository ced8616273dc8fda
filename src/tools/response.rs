//! Success envelope shared by every tool.
//!
//! Payloads are not always JSON objects (`list_tables` returns a bare array),
//! so results travel as pretty-printed JSON text content rather than
//! structured output.

use rmcp::ErrorData as McpError;
use rmcp::model::{CallToolResult, Content};
use serde::Serialize;

/// Wrap a payload in a successful tool result without altering its content.
pub fn success_response<T: Serialize>(payload: &T) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(payload).map_err(|e| {
        McpError::internal_error(format!("Failed to serialize response: {}", e), None)
    })?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}
