//! The weather conversation agent
//!
//! Connects a [`ToolTransport`], discovers the published tools exactly once,
//! and runs the per-question conversation loop: the model may request any
//! number of tool invocations before producing its final answer, up to a
//! round cap that guards against runaway loops.

use std::sync::Arc;

use crate::bridge::{self, BoundTool};
use crate::error::Result;
use crate::llm::{ChatRequest, ContentPart, LlmProvider, Message, ToolDefinition};
use crate::transport::ToolTransport;

/// Ceiling on model/tool round trips for one question.
const MAX_TOOL_ROUNDS: usize = 10;

/// Returned when the model is still requesting tools at the round cap.
const GIVE_UP_MESSAGE: &str = "Sorry, I couldn't process your request. Please try again.";

const SYSTEM_PROMPT: &str = "You are a helpful weather assistant. You have access to weather data
for various cities through the available tools. When users ask about weather, use the
appropriate tools to fetch the information and provide clear, conversational responses.

Available cities: New York, London, Tokyo, Paris, Sydney

If a user asks about a city not in the list, politely inform them and suggest available cities.";

/// A connected, tool-equipped conversational agent.
///
/// The adapter set is built once at connect time and is exactly the image of
/// whatever descriptors the server published; zero tools is as valid as
/// fifty.
pub struct WeatherAgent {
    provider: Arc<dyn LlmProvider>,
    tools: Vec<BoundTool>,
    definitions: Vec<ToolDefinition>,
}

impl std::fmt::Debug for WeatherAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherAgent")
            .field("tools", &self.tool_names())
            .finish_non_exhaustive()
    }
}

impl WeatherAgent {
    /// Discover the server's tools and build the adapter set.
    pub async fn connect(
        provider: Arc<dyn LlmProvider>,
        transport: Arc<dyn ToolTransport>,
    ) -> Result<Self> {
        let descriptors = transport.list_tools().await?;
        tracing::info!(count = descriptors.len(), "Loaded tools from MCP server");

        let tools = bridge::build_all(descriptors, &transport);
        let definitions = tools
            .iter()
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.input_schema().clone(),
            })
            .collect();

        Ok(Self {
            provider,
            tools,
            definitions,
        })
    }

    /// Names of the discovered tools, in publication order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(BoundTool::name).collect()
    }

    /// Number of discovered tools.
    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    /// Ask the agent a weather-related question.
    ///
    /// Runs the conversation loop: model turn, then any requested tool
    /// invocations, then back to the model, until a turn arrives with no
    /// tool calls or the round cap is hit.
    pub async fn ask(&self, question: &str) -> Result<String> {
        let mut messages = vec![Message::user(question)];

        for round in 0..MAX_TOOL_ROUNDS {
            let turn = self
                .provider
                .chat(ChatRequest {
                    system: SYSTEM_PROMPT,
                    messages: &messages,
                    tools: &self.definitions,
                })
                .await?;

            let tool_calls: Vec<(String, String, serde_json::Value)> = turn
                .content
                .iter()
                .filter_map(|part| match part {
                    ContentPart::ToolUse { id, name, input } => {
                        Some((id.clone(), name.clone(), input.clone()))
                    }
                    _ => None,
                })
                .collect();

            messages.push(Message::assistant(turn.content.clone()));

            if tool_calls.is_empty() {
                return Ok(turn.text());
            }

            let mut results = Vec::with_capacity(tool_calls.len());
            for (id, name, input) in tool_calls {
                tracing::debug!(round, tool = %name, "Model requested tool");
                let text = match self.tools.iter().find(|tool| tool.name() == name) {
                    Some(tool) => tool.invoke(input).await,
                    None => format!("Tool {} not found", name),
                };
                results.push(ContentPart::ToolResult {
                    tool_use_id: id,
                    content: text,
                    is_error: None,
                });
            }
            messages.push(Message::tool_results(results));
        }

        tracing::warn!("Round cap reached without a final answer");
        Ok(GIVE_UP_MESSAGE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;
    use weather_data::WeatherStore;
    use weather_mcp::{ToolRegistry, register_weather_tools};

    use super::*;
    use crate::llm::{ChatTurn, LlmError, Role, StopReason};
    use crate::transport::RegistryTransport;

    /// Provider that replays a fixed script of turns and records every
    /// request's message history.
    struct ScriptedProvider {
        turns: Mutex<VecDeque<ChatTurn>>,
        seen: Mutex<Vec<Vec<Message>>>,
    }

    impl ScriptedProvider {
        fn new(turns: Vec<ChatTurn>) -> Self {
            Self {
                turns: Mutex::new(turns.into()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<Vec<Message>> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn chat(&self, request: ChatRequest<'_>) -> std::result::Result<ChatTurn, LlmError> {
            self.seen.lock().unwrap().push(request.messages.to_vec());
            // Once the script runs out, keep repeating the last-configured
            // behavior: an endless tool requester for loop-cap tests.
            Ok(self.turns.lock().unwrap().pop_front().unwrap_or(ChatTurn {
                content: vec![ContentPart::ToolUse {
                    id: "toolu_loop".to_string(),
                    name: "get_current_weather".to_string(),
                    input: json!({"city": "tokyo"}),
                }],
                stop_reason: Some(StopReason::ToolUse),
            }))
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

    fn tool_turn(id: &str, name: &str, input: serde_json::Value) -> ChatTurn {
        ChatTurn {
            content: vec![ContentPart::ToolUse {
                id: id.to_string(),
                name: name.to_string(),
                input,
            }],
            stop_reason: Some(StopReason::ToolUse),
        }
    }

    fn weather_transport() -> Arc<dyn ToolTransport> {
        let mut registry = ToolRegistry::new();
        let store = Arc::new(WeatherStore::with_builtin_cities());
        register_weather_tools(&mut registry, store).unwrap();
        Arc::new(RegistryTransport::new(Arc::new(registry)))
    }

    async fn connect(provider: Arc<ScriptedProvider>) -> WeatherAgent {
        WeatherAgent::connect(provider, weather_transport())
            .await
            .unwrap()
    }

    /// The tool-result block delivered in the request following a tool turn.
    fn tool_result_text(requests: &[Vec<Message>], request_idx: usize) -> String {
        let messages = &requests[request_idx];
        let last = messages.last().unwrap();
        assert_eq!(last.role, Role::User);
        match &last.content[0] {
            ContentPart::ToolResult {
                content,
                tool_use_id,
                ..
            } => {
                assert!(tool_use_id.starts_with("toolu"));
                content.clone()
            }
            other => panic!("expected tool result block, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn discovery_builds_one_adapter_per_descriptor() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let agent = connect(provider).await;
        assert_eq!(agent.tool_count(), 3);
        assert_eq!(
            agent.tool_names(),
            vec!["get_current_weather", "get_forecast", "list_available_cities"]
        );
    }

    #[tokio::test]
    async fn answer_without_tool_calls_is_returned_directly() {
        let provider = Arc::new(ScriptedProvider::new(vec![text_turn(
            "I can tell you about New York, London, Tokyo, Paris, and Sydney.",
        )]));
        let agent = connect(provider.clone()).await;

        let answer = agent.ask("Which cities do you know?").await.unwrap();
        assert!(answer.contains("Tokyo"));
        assert_eq!(provider.requests().len(), 1);
    }

    #[tokio::test]
    async fn tool_round_trip_feeds_result_back_to_model() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            tool_turn("toolu_1", "get_current_weather", json!({"city": "tokyo"})),
            text_turn("It's 68°F and sunny in Tokyo."),
        ]));
        let agent = connect(provider.clone()).await;

        let answer = agent.ask("What's the weather in Tokyo?").await.unwrap();
        assert_eq!(answer, "It's 68°F and sunny in Tokyo.");

        let requests = provider.requests();
        assert_eq!(requests.len(), 2);
        let result = tool_result_text(&requests, 1);
        assert!(result.contains("Tokyo"));
        assert!(result.contains("68"));
        assert!(result.contains("Fahrenheit"));
    }

    #[tokio::test]
    async fn unknown_city_error_surfaces_as_tool_result_text() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            tool_turn("toolu_1", "get_current_weather", json!({"city": "atlantis"})),
            text_turn("I don't have data for Atlantis."),
        ]));
        let agent = connect(provider.clone()).await;

        let answer = agent.ask("How's Atlantis?").await.unwrap();
        assert_eq!(answer, "I don't have data for Atlantis.");

        let result = tool_result_text(&provider.requests(), 1);
        assert!(result.contains("Weather data not available for 'atlantis'"));
    }

    #[tokio::test]
    async fn model_requesting_unknown_tool_gets_not_found_text() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            tool_turn("toolu_1", "get_humidity_map", json!({})),
            text_turn("That capability isn't available."),
        ]));
        let agent = connect(provider.clone()).await;

        let answer = agent.ask("Show me the humidity map").await.unwrap();
        assert_eq!(answer, "That capability isn't available.");

        let result = tool_result_text(&provider.requests(), 1);
        assert_eq!(result, "Tool get_humidity_map not found");
    }

    #[tokio::test]
    async fn endless_tool_requests_hit_the_round_cap() {
        // Empty script: the provider requests a tool on every turn.
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let agent = connect(provider.clone()).await;

        let answer = agent.ask("Loop forever").await.unwrap();
        assert_eq!(answer, GIVE_UP_MESSAGE);
        assert_eq!(provider.requests().len(), MAX_TOOL_ROUNDS);
    }

    #[tokio::test]
    async fn missing_argument_from_model_becomes_tool_result_text() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            tool_turn("toolu_1", "get_forecast", json!({})),
            text_turn("I need a city name."),
        ]));
        let agent = connect(provider.clone()).await;

        let answer = agent.ask("Forecast please").await.unwrap();
        assert_eq!(answer, "I need a city name.");

        let result = tool_result_text(&provider.requests(), 1);
        assert!(result.contains("missing required argument 'city'"));
    }
}
