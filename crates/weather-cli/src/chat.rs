//! Interactive chat loop and scripted demo mode

use std::io::{BufRead, Write};

use colored::Colorize;
use weather_agent::WeatherAgent;

use crate::error::Result;

/// The example queries run by `weather demo`.
const DEMO_QUERIES: [&str; 4] = [
    "What's the weather in Tokyo?",
    "Give me a 5-day forecast for Paris",
    "Compare the weather in New York and London",
    "Which city has the best weather right now?",
];

/// Run the interactive chat loop until the user quits or stdin closes.
pub async fn run_interactive(agent: &WeatherAgent) -> Result<()> {
    println!();
    println!("{}", "=".repeat(60));
    println!("{}", "Weather Assistant (powered by MCP)".green().bold());
    println!("{}", "=".repeat(60));
    println!("\nType 'quit' or 'exit' to close the app.\n");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    loop {
        print!("\n{} ", "You:".cyan().bold());
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // stdin closed
            println!("\nGoodbye!");
            break;
        }
        let input = line.trim();

        if matches!(input.to_lowercase().as_str(), "quit" | "exit" | "q") {
            println!("\nGoodbye!");
            break;
        }
        if input.is_empty() {
            continue;
        }

        match agent.ask(input).await {
            Ok(answer) => {
                println!("\n{} {}", "Assistant:".green().bold(), answer);
            }
            Err(e) => {
                // One failed turn should not end the session.
                eprintln!("\n{}: {}", "error".red().bold(), e);
            }
        }
    }

    Ok(())
}

/// Run the scripted example queries in sequence.
pub async fn run_demo(agent: &WeatherAgent) -> Result<()> {
    println!();
    println!("{}", "=".repeat(60));
    println!("{}", "Running Example Queries".green().bold());
    println!("{}", "=".repeat(60));

    for (i, query) in DEMO_QUERIES.iter().enumerate() {
        println!("\n--- Example {} ---", i + 1);
        println!("{} {}", "Query:".cyan().bold(), query);

        let answer = agent.ask(query).await?;
        println!("\n{}\n{}", "Response:".green().bold(), answer);
        println!("{}", "-".repeat(60));
    }

    Ok(())
}
