//! Weather Assistant CLI
//!
//! Chat with a language model that answers weather questions by calling
//! tools on the weather MCP server. The server is spawned as a subprocess
//! and spoken to over stdio; the model is reached through the Anthropic
//! Messages API.
//!
//! # Usage
//!
//! ```bash
//! export ANTHROPIC_API_KEY='your-api-key-here'
//! weather            # interactive chat
//! weather demo       # scripted example queries
//! ```

mod chat;
mod error;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use weather_agent::{AnthropicProvider, StdioTransport, WeatherAgent};

use error::Result;

/// LLM weather assistant backed by an MCP tool server
#[derive(Parser)]
#[command(name = "weather")]
#[command(about = "LLM weather assistant backed by an MCP tool server")]
#[command(version)]
struct Cli {
    /// Claude model to use
    #[arg(long, env = "CLAUDE_MODEL")]
    model: Option<String>,

    /// Command used to spawn the MCP tool server
    #[arg(long, default_value = "weather-mcp")]
    server_cmd: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat (the default)
    Chat,
    /// Run the scripted example queries
    Demo,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they never mix with chat output.
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    let provider = Arc::new(AnthropicProvider::from_env(cli.model.clone())?);
    println!("{} Using model: {}", "✓".green(), provider.model());

    let transport = Arc::new(StdioTransport::spawn(&cli.server_cmd, &[]).await?);
    println!("{} Connected to MCP weather service", "✓".green());

    let agent = WeatherAgent::connect(provider, transport).await?;
    println!(
        "{} Loaded {} tools from MCP server",
        "✓".green(),
        agent.tool_count()
    );

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => chat::run_interactive(&agent).await,
        Commands::Demo => chat::run_demo(&agent).await,
    }
}
