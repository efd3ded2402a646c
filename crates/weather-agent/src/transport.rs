//! Transport to the tool server
//!
//! [`ToolTransport`] is the sole wire contract the bridge depends on: list
//! the published descriptors, call a tool by name, get back an ok/data/error
//! payload. Two implementations are provided: an in-process call into a
//! [`ToolRegistry`] and a stdio subprocess speaking line-delimited JSON-RPC
//! to the real server binary.

use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use weather_mcp::{ToolDescriptor, ToolRegistry};

use crate::error::{Error, Result};

/// MCP protocol revision this client speaks.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// Response payload of one tool call, as seen by the bridge.
#[derive(Debug, Clone)]
pub struct CallReply {
    pub ok: bool,
    pub data: Option<Value>,
    pub error: Option<String>,
}

/// Connection to a tool server: discovery plus invocation.
#[async_trait]
pub trait ToolTransport: Send + Sync {
    /// The descriptors the server currently publishes, in its order.
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>>;

    /// Invoke a tool by name with an argument object.
    async fn call_tool(&self, name: &str, arguments: Value) -> Result<CallReply>;
}

/// In-process transport calling straight into a shared registry.
///
/// Useful for tests and for embedding the server in the same process; the
/// registry is read-only after startup so no locking is needed.
#[derive(Debug, Clone)]
pub struct RegistryTransport {
    registry: Arc<ToolRegistry>,
}

impl RegistryTransport {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl ToolTransport for RegistryTransport {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>> {
        Ok(self.registry.list())
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> Result<CallReply> {
        let outcome = self.registry.invoke(name, &arguments);
        Ok(CallReply {
            ok: outcome.ok,
            data: outcome.data,
            error: outcome.error,
        })
    }
}

/// State behind the stdio transport's mutex: the child's pipes plus the
/// JSON-RPC id counter. Requests are strictly sequential.
struct StdioSession {
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    next_id: i64,
    // Held so the child is killed when the transport is dropped.
    _child: Child,
}

/// Transport that spawns the tool server as a subprocess and speaks
/// line-delimited JSON-RPC 2.0 over its stdin/stdout.
///
/// The MCP `initialize` handshake runs during [`StdioTransport::spawn`]; the
/// child inherits stderr so its logs stay visible, and is killed on drop.
pub struct StdioTransport {
    session: Mutex<StdioSession>,
}

impl std::fmt::Debug for StdioTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StdioTransport").finish_non_exhaustive()
    }
}

impl StdioTransport {
    /// Spawn the server process and perform the initialize handshake.
    pub async fn spawn(command: &str, args: &[String]) -> Result<Self> {
        tracing::debug!(command, ?args, "Spawning tool server");

        let mut child = Command::new(command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Transport("server stdin not captured".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .map(BufReader::new)
            .ok_or_else(|| Error::Transport("server stdout not captured".to_string()))?;

        let transport = Self {
            session: Mutex::new(StdioSession {
                stdin,
                stdout,
                next_id: 1,
                _child: child,
            }),
        };

        transport.initialize().await?;
        Ok(transport)
    }

    /// MCP handshake: `initialize` request then `initialized` notification.
    async fn initialize(&self) -> Result<()> {
        let result = self
            .request(
                "initialize",
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {},
                    "clientInfo": {
                        "name": env!("CARGO_PKG_NAME"),
                        "version": env!("CARGO_PKG_VERSION"),
                    }
                }),
            )
            .await?;

        let server_name = result
            .pointer("/serverInfo/name")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        tracing::info!(server = server_name, "Connected to MCP tool server");

        self.notify("notifications/initialized").await?;
        Ok(())
    }

    /// Issue one request and wait for the response with the matching id.
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let mut session = self.session.lock().await;

        let id = session.next_id;
        session.next_id += 1;

        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        let mut line = serde_json::to_string(&request)?;
        line.push('\n');
        session.stdin.write_all(line.as_bytes()).await?;
        session.stdin.flush().await?;

        loop {
            let mut response_line = String::new();
            let read = session.stdout.read_line(&mut response_line).await?;
            if read == 0 {
                return Err(Error::Transport(
                    "server closed its stdout before responding".to_string(),
                ));
            }
            let trimmed = response_line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let response: Value = serde_json::from_str(trimmed)
                .map_err(|e| Error::Protocol(format!("invalid JSON from server: {}", e)))?;

            // Skip anything that is not the answer to this request.
            if response.get("id") != Some(&json!(id)) {
                tracing::debug!(line = trimmed, "Skipping unmatched server message");
                continue;
            }

            if let Some(error) = response.get("error") {
                let message = error
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown server error");
                return Err(Error::Protocol(message.to_string()));
            }

            return Ok(response.get("result").cloned().unwrap_or(Value::Null));
        }
    }

    /// Send a notification (no id, no response expected).
    async fn notify(&self, method: &str) -> Result<()> {
        let mut session = self.session.lock().await;
        let notification = json!({
            "jsonrpc": "2.0",
            "method": method,
        });
        let mut line = serde_json::to_string(&notification)?;
        line.push('\n');
        session.stdin.write_all(line.as_bytes()).await?;
        session.stdin.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl ToolTransport for StdioTransport {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>> {
        let result = self.request("tools/list", json!({})).await?;

        let tools = result
            .get("tools")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::Protocol("tools/list result missing 'tools'".to_string()))?;

        tools
            .iter()
            .map(|tool| {
                let name = tool
                    .get("name")
                    .and_then(Value::as_str)
                    .ok_or_else(|| Error::Protocol("tool entry missing 'name'".to_string()))?;
                let description = tool
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                let input_schema = tool
                    .get("inputSchema")
                    .cloned()
                    .unwrap_or_else(|| json!({"type": "object", "properties": {}}));
                Ok(ToolDescriptor::new(name, description, input_schema))
            })
            .collect()
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> Result<CallReply> {
        let result = self
            .request("tools/call", json!({"name": name, "arguments": arguments}))
            .await?;

        let is_error = result
            .get("is_error")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        // Concatenate the text blocks of the MCP result content.
        let text = result
            .get("content")
            .and_then(Value::as_array)
            .map(|blocks| {
                blocks
                    .iter()
                    .filter_map(|block| block.get("text").and_then(Value::as_str))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default();

        if is_error {
            Ok(CallReply {
                ok: false,
                data: None,
                error: Some(text),
            })
        } else {
            Ok(CallReply {
                ok: true,
                data: Some(Value::String(text)),
                error: None,
            })
        }
    }
}
