//! Agent client for the weather MCP server
//!
//! This crate turns whatever tools an MCP server happens to publish into
//! adapters an LLM agent can call, with zero per-tool code. It has four
//! layers:
//!
//! ```text
//! [ WeatherAgent (conversation loop) ]
//!        |
//! [ BoundTool adapters (bridge) ]          [ LlmProvider (Anthropic) ]
//!        |
//! [ ToolTransport (in-process or stdio subprocess) ]
//!        |
//! [ weather-mcp server ]
//! ```
//!
//! The bridge is the interesting part: [`bridge::build_all`] derives a
//! parameter contract from each published JSON schema and binds each
//! adapter's tool name by value, so adapter N always invokes its own tool no
//! matter how many descriptors the loop walked. Discovery runs once per
//! session; rebuilding the adapters is a pure function of the descriptor
//! list.

pub mod agent;
pub mod bridge;
pub mod error;
pub mod llm;
pub mod transport;

pub use agent::WeatherAgent;
pub use bridge::{BoundTool, ParamKind, ParamSpec, build, build_all};
pub use error::{Error, Result};
pub use llm::{
    AnthropicProvider, ChatRequest, ChatTurn, ContentPart, LlmError, LlmProvider, Message, Role,
    StopReason, ToolDefinition,
};
pub use transport::{CallReply, RegistryTransport, StdioTransport, ToolTransport};
