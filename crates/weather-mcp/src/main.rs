//! Weather MCP Server
//!
//! A Model Context Protocol server that exposes mock weather data to agent
//! clients.
//!
//! # Usage
//!
//! ```bash
//! weather-mcp
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Control log verbosity (default: `weather_mcp=info`)
//!
//! # Protocol
//!
//! The server communicates via JSON-RPC 2.0 over stdio:
//! - Requests/responses go through stdout
//! - Logs go to stderr (to avoid interfering with the protocol)

use std::sync::Arc;

use clap::Parser;
use weather_data::WeatherStore;
use weather_mcp::{ToolRegistry, WeatherMcpServer, register_weather_tools};

/// MCP server exposing mock weather data
#[derive(Parser)]
#[command(name = "weather-mcp")]
#[command(about = "MCP server exposing mock weather data")]
#[command(version)]
struct Args {}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging to stderr (stdout is reserved for MCP protocol)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("weather_mcp=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let _args = Args::parse();

    tracing::info!("Starting weather-mcp server");

    // Dataset and registry are built once at startup; a duplicate tool name
    // is a configuration defect and aborts here.
    let store = Arc::new(WeatherStore::with_builtin_cities());
    let mut registry = ToolRegistry::new();
    register_weather_tools(&mut registry, store)?;

    let mut server = WeatherMcpServer::new(registry);
    server.run().await?;

    Ok(())
}
