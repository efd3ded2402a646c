//! MCP Server implementation
//!
//! The main server struct that couples MCP protocol handling to the tool
//! registry. Requests and responses travel as line-delimited JSON-RPC 2.0
//! over stdin/stdout; logs go to stderr so they never interleave with the
//! protocol stream.

use std::io::{BufRead, Write};

use serde_json::{Value, json};

use crate::protocol::{
    InitializeResult, JsonRpcRequest, JsonRpcResponse, ServerCapabilities, ServerInfo,
    ToolCallParams, ToolsCapability,
};
use crate::registry::ToolRegistry;
use crate::tools::ToolResult;
use crate::{Error, Result};

/// MCP protocol revision this server implements.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// MCP server for the weather tools
///
/// Holds a fully-registered [`ToolRegistry`] and answers `initialize`,
/// `tools/list`, and `tools/call`. Tool failures surface as successful
/// JSON-RPC responses carrying `is_error: true` results, so a bad call never
/// terminates the serving loop.
pub struct WeatherMcpServer {
    registry: ToolRegistry,
    initialized: bool,
}

impl WeatherMcpServer {
    /// Create a server around a registry built at startup.
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            initialized: false,
        }
    }

    /// Run the server, processing MCP messages over stdin/stdout until EOF.
    pub async fn run(&mut self) -> Result<()> {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();

        tracing::info!(
            tools = self.registry.len(),
            "MCP server ready, listening on stdio"
        );

        for line in stdin.lock().lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }

            tracing::debug!(request = %line, "Received message");

            match self.handle_message(&line) {
                Ok(response) if !response.is_empty() => {
                    writeln!(stdout, "{}", response)?;
                    stdout.flush()?;
                }
                Ok(_) => {} // No response needed (notifications)
                Err(e) => {
                    let error_response =
                        JsonRpcResponse::error(None, -32603, format!("Internal error: {}", e));
                    let json_str = serde_json::to_string(&error_response)?;
                    writeln!(stdout, "{}", json_str)?;
                    stdout.flush()?;
                }
            }
        }

        tracing::info!("Client closed stdin, shutting down");
        Ok(())
    }

    /// Handle a single MCP message.
    ///
    /// Returns the JSON-RPC response as a string, or an empty string for
    /// notifications.
    pub fn handle_message(&mut self, message: &str) -> Result<String> {
        let request: JsonRpcRequest = serde_json::from_str(message)?;

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id)?,
            "initialized" => return Ok(String::new()),
            "notifications/initialized" => return Ok(String::new()),
            "tools/list" => self.handle_tools_list(request.id)?,
            "tools/call" => self.handle_tools_call(request.id, request.params)?,
            _ => JsonRpcResponse::error(
                request.id,
                -32601,
                format!("Method not found: {}", request.method),
            ),
        };

        serde_json::to_string(&response).map_err(Error::from)
    }

    /// Handle the initialize request: report capabilities and server info.
    fn handle_initialize(&mut self, id: Option<Value>) -> Result<JsonRpcResponse> {
        self.initialized = true;

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
            },
            server_info: ServerInfo {
                name: "weather-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }

    /// Handle tools/list: publish the registry's descriptors in order.
    fn handle_tools_list(&self, id: Option<Value>) -> Result<JsonRpcResponse> {
        let tools: Vec<Value> = self
            .registry
            .list()
            .iter()
            .map(|t| {
                json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect();

        Ok(JsonRpcResponse::success(id, json!({ "tools": tools })))
    }

    /// Handle tools/call: dispatch through the registry.
    fn handle_tools_call(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        let tool_params: ToolCallParams = serde_json::from_value(params)?;

        let outcome = self
            .registry
            .invoke(&tool_params.name, &tool_params.arguments);

        let tool_result = if outcome.ok {
            let data = outcome.data.unwrap_or(Value::Null);
            ToolResult::text(serde_json::to_string_pretty(&data)?)
        } else {
            ToolResult::error(outcome.error.unwrap_or_else(|| "tool failed".to_string()))
        };

        Ok(JsonRpcResponse::success(
            id,
            serde_json::to_value(tool_result)?,
        ))
    }

    /// Check if a client has initialized the session.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The registry backing this server.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }
}
