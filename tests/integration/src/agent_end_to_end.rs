//! End-to-end tests over the real stdio transport
//!
//! The agent side runs in-process with a scripted model; the tool side is
//! the actual `weather-mcp` binary spawned as a subprocess, so the whole
//! discovery → bridge → JSON-RPC → registry → dataset path is exercised.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use assert_cmd::cargo::cargo_bin;
use async_trait::async_trait;
use serde_json::json;
use weather_agent::{
    ChatRequest, ChatTurn, ContentPart, LlmError, LlmProvider, StdioTransport, StopReason,
    ToolTransport, WeatherAgent, build_all,
};

/// Provider replaying a fixed script; answers "done" once the script runs out.
struct ScriptedProvider {
    turns: Mutex<VecDeque<ChatTurn>>,
}

impl ScriptedProvider {
    fn new(turns: Vec<ChatTurn>) -> Self {
        Self {
            turns: Mutex::new(turns.into()),
        }
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn chat(&self, _request: ChatRequest<'_>) -> Result<ChatTurn, LlmError> {
        Ok(self
            .turns
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| text_turn("done")))
    }
}

fn text_turn(text: &str) -> ChatTurn {
    ChatTurn {
        content: vec![ContentPart::Text {
            text: text.to_string(),
        }],
        stop_reason: Some(StopReason::EndTurn),
    }
}

fn tool_turn(name: &str, input: serde_json::Value) -> ChatTurn {
    ChatTurn {
        content: vec![ContentPart::ToolUse {
            id: "toolu_e2e".to_string(),
            name: name.to_string(),
            input,
        }],
        stop_reason: Some(StopReason::ToolUse),
    }
}

async fn spawn_transport() -> Arc<StdioTransport> {
    let bin = cargo_bin("weather-mcp");
    Arc::new(
        StdioTransport::spawn(bin.to_str().expect("binary path is UTF-8"), &[])
            .await
            .expect("spawn weather-mcp"),
    )
}

#[tokio::test]
async fn discovery_over_stdio_finds_all_tools() {
    let transport = spawn_transport().await;
    let descriptors = transport.list_tools().await.unwrap();

    let names: Vec<&str> = descriptors.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["get_current_weather", "get_forecast", "list_available_cities"]
    );
}

#[tokio::test]
async fn stdio_call_round_trips_success_and_error_payloads() {
    let transport = spawn_transport().await;

    let reply = transport
        .call_tool("get_current_weather", json!({"city": "tokyo"}))
        .await
        .unwrap();
    assert!(reply.ok);
    let text = match reply.data.unwrap() {
        serde_json::Value::String(s) => s,
        other => panic!("expected text payload, got {other}"),
    };
    assert!(text.contains("Tokyo"));
    assert!(text.contains("68"));

    let reply = transport
        .call_tool("get_current_weather", json!({"city": "atlantis"}))
        .await
        .unwrap();
    assert!(!reply.ok);
    assert!(
        reply
            .error
            .unwrap()
            .contains("Weather data not available for 'atlantis'")
    );
}

#[tokio::test]
async fn adapters_built_over_stdio_invoke_their_own_tools() {
    let transport = spawn_transport().await;
    let transport: Arc<dyn ToolTransport> = transport;
    let descriptors = transport.list_tools().await.unwrap();
    let adapters = build_all(descriptors, &transport);
    assert_eq!(adapters.len(), 3);

    // The nullary tool works with an empty argument map.
    let cities = adapters[2].invoke(json!({})).await;
    assert!(cities.contains("New York"));
    assert!(cities.contains("Sydney"));

    // The city lookups each reach their own endpoint.
    let current = adapters[0].invoke(json!({"city": "sydney"})).await;
    assert!(current.contains("\"temperature\": 78"));
    let forecast = adapters[1].invoke(json!({"city": "sydney"})).await;
    assert!(forecast.contains("Monday"));
}

#[tokio::test]
async fn agent_answers_with_real_server_and_scripted_model() {
    let transport = spawn_transport().await;
    let provider = Arc::new(ScriptedProvider::new(vec![
        tool_turn("get_current_weather", json!({"city": "tokyo"})),
        text_turn("Tokyo is 68°F and sunny right now."),
    ]));

    let agent = WeatherAgent::connect(provider, transport).await.unwrap();
    assert_eq!(agent.tool_count(), 3);

    let answer = agent.ask("What's the weather in Tokyo?").await.unwrap();
    assert_eq!(answer, "Tokyo is 68°F and sunny right now.");
}

#[tokio::test]
async fn agent_survives_unknown_city_over_stdio() {
    let transport = spawn_transport().await;
    let provider = Arc::new(ScriptedProvider::new(vec![
        tool_turn("get_current_weather", json!({"city": "atlantis"})),
        text_turn("I don't have data for Atlantis, sorry."),
    ]));

    let agent = WeatherAgent::connect(provider, transport).await.unwrap();
    let answer = agent.ask("How's Atlantis today?").await.unwrap();
    assert_eq!(answer, "I don't have data for Atlantis, sorry.");
}
