//! Weather tool definitions and handlers
//!
//! The wire-level [`ToolResult`]/[`ToolContent`] types used by `tools/call`
//! responses, plus the three weather tools and their registration.
//!
//! Handlers are plain closures over a shared [`WeatherStore`]; they return
//! structured JSON (not free text) so the adapter layer on the client side
//! stays machine-parseable.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use weather_data::WeatherStore;

use crate::error::{Error, Result};
use crate::registry::{ToolDescriptor, ToolHandler, ToolRegistry};

/// Result from a tool invocation, as carried on the MCP wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

/// Content types for tool results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

impl ToolResult {
    /// Create a successful text result
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: content.into(),
            }],
            is_error: None,
        }
    }

    /// Create an error result
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: Some(true),
        }
    }
}

/// Descriptors for the three weather tools, in publication order.
pub fn weather_tool_descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "get_current_weather",
            "Get the current weather for a specific city. Returns temperature, \
             condition, humidity, and wind speed.",
            json!({
                "type": "object",
                "properties": {
                    "city": {
                        "type": "string",
                        "description": "The city name (e.g., 'New York', 'London', 'Tokyo')"
                    }
                },
                "required": ["city"]
            }),
        ),
        ToolDescriptor::new(
            "get_forecast",
            "Get a 5-day weather forecast for a specific city.",
            json!({
                "type": "object",
                "properties": {
                    "city": {
                        "type": "string",
                        "description": "The city name (e.g., 'New York', 'London', 'Tokyo')"
                    }
                },
                "required": ["city"]
            }),
        ),
        ToolDescriptor::new(
            "list_available_cities",
            "List all cities with available weather data.",
            json!({
                "type": "object",
                "properties": {}
            }),
        ),
    ]
}

/// Register the weather tools against a shared store.
///
/// Called once at startup; a duplicate name here is a configuration defect
/// and the error should abort the server.
pub fn register_weather_tools(registry: &mut ToolRegistry, store: Arc<WeatherStore>) -> Result<()> {
    let current_store = store.clone();
    let forecast_store = store.clone();

    // Handler order must match the descriptor publication order above.
    let handlers: Vec<ToolHandler> = vec![
        Arc::new(move |args: &Map<String, Value>| {
            let city = require_city(args)?;
            let report = current_store.current_conditions(city)?;
            Ok(serde_json::to_value(report)?)
        }),
        Arc::new(move |args: &Map<String, Value>| {
            let city = require_city(args)?;
            let report = forecast_store.forecast(city)?;
            Ok(serde_json::to_value(report)?)
        }),
        Arc::new(move |_args: &Map<String, Value>| {
            Ok(json!({
                "available_cities": store.city_names()
            }))
        }),
    ];

    for (descriptor, handler) in weather_tool_descriptors().into_iter().zip(handlers) {
        registry.register(descriptor, handler)?;
    }

    Ok(())
}

/// Pull the required `city` string argument out of a call's argument map.
fn require_city(args: &Map<String, Value>) -> Result<&str> {
    args.get("city")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::InvalidArguments {
            message: "missing required parameter: city".to_string(),
        })
}
