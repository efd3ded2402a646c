//! MCP Server for the weather assistant
//!
//! This crate exposes the mock weather dataset via the Model Context Protocol
//! (MCP), so that any MCP-speaking agent client can discover and call the
//! weather tools without hard-coding them.
//!
//! # Architecture
//!
//! The crate is a thin protocol facade over an explicit tool registry:
//!
//! ```text
//! [ MCP Client (agent) ]
//!        | (JSON-RPC over stdio)
//!        v
//! [ weather-mcp (MCP Server) ]
//!        | (ToolRegistry dispatch)
//!        v
//! [ weather-data (Mock Dataset) ]
//! ```
//!
//! Tools are registered with explicit `register` calls at startup; there is
//! no attribute magic or global scan. The registry maps each tool name to its
//! descriptor and handler; dispatch always yields a payload (success or
//! error), never a raised fault, so a single failing call cannot take down
//! the serving loop.
//!
//! # Tools
//!
//! - `get_current_weather` - current conditions for a city
//! - `get_forecast` - 5-day forecast for a city
//! - `list_available_cities` - cities with data (takes no arguments)

pub mod error;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod tools;

pub use error::{Error, Result};
pub use registry::{InvokeOutcome, ToolDescriptor, ToolHandler, ToolRegistry};
pub use server::WeatherMcpServer;
pub use tools::{ToolContent, ToolResult, register_weather_tools, weather_tool_descriptors};
