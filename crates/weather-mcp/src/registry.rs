//! Tool registry and dispatcher
//!
//! The registry is the authoritative list of tools the server publishes. Each
//! entry pairs an immutable [`ToolDescriptor`] with the handler that executes
//! it. Registration happens once at startup via explicit [`register`] calls;
//! a duplicate name is a configuration defect and fails registration.
//!
//! Dispatch is total: [`invoke`] always yields an [`InvokeOutcome`] payload.
//! Unknown names and handler failures become error payloads rather than
//! raised faults, so one bad call cannot take down the serving loop.
//!
//! [`register`]: ToolRegistry::register
//! [`invoke`]: ToolRegistry::invoke

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Static tool metadata as published to clients.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    /// Unique, stable tool identifier
    pub name: String,
    /// Human/LLM-readable description
    pub description: String,
    /// JSON Schema object describing the tool's arguments
    pub input_schema: Value,
}

impl ToolDescriptor {
    pub fn new(name: &str, description: &str, input_schema: Value) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
        }
    }
}

/// Handler function paired 1:1 with a descriptor by name.
///
/// Handlers receive the caller's argument map (untyped at this layer) and
/// signal failure by returning `Err`; dispatch converts that into an error
/// payload.
pub type ToolHandler = Arc<dyn Fn(&Map<String, Value>) -> Result<Value> + Send + Sync>;

/// Result payload of a dispatch. Exactly one of `data`/`error` is set.
#[derive(Debug, Clone)]
pub struct InvokeOutcome {
    pub ok: bool,
    pub data: Option<Value>,
    pub error: Option<String>,
}

impl InvokeOutcome {
    pub fn success(data: Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Process-wide collection of (descriptor, handler) pairs, keyed by name.
///
/// `list()` reports descriptors in registration order, stable across calls.
#[derive(Default)]
pub struct ToolRegistry {
    entries: Vec<(ToolDescriptor, ToolHandler)>,
    index: HashMap<String, usize>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.index.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one tool. Fails with [`Error::DuplicateTool`] if the name is
    /// already present.
    pub fn register(&mut self, descriptor: ToolDescriptor, handler: ToolHandler) -> Result<()> {
        if self.index.contains_key(&descriptor.name) {
            return Err(Error::DuplicateTool(descriptor.name));
        }
        self.index
            .insert(descriptor.name.clone(), self.entries.len());
        self.entries.push((descriptor, handler));
        Ok(())
    }

    /// Descriptors in registration order.
    pub fn list(&self) -> Vec<ToolDescriptor> {
        self.entries
            .iter()
            .map(|(descriptor, _)| descriptor.clone())
            .collect()
    }

    /// Check if a tool exists.
    pub fn has_tool(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Dispatch a named invocation to its handler.
    ///
    /// Always returns a payload: unknown names and handler failures become
    /// `{ok: false, error}` outcomes, never raised errors.
    pub fn invoke(&self, name: &str, arguments: &Value) -> InvokeOutcome {
        let Some(&slot) = self.index.get(name) else {
            tracing::debug!(tool = name, "Dispatch miss");
            return InvokeOutcome::failure(Error::UnknownTool(name.to_string()).to_string());
        };

        let args = match arguments {
            Value::Object(map) => map.clone(),
            Value::Null => Map::new(),
            other => {
                return InvokeOutcome::failure(format!(
                    "invalid arguments: expected a JSON object, got {}",
                    json_type_name(other)
                ));
            }
        };

        let (descriptor, handler) = &self.entries[slot];
        match handler(&args) {
            Ok(data) => {
                tracing::debug!(tool = %descriptor.name, "Tool call succeeded");
                InvokeOutcome::success(data)
            }
            Err(e) => {
                tracing::debug!(tool = %descriptor.name, error = %e, "Tool call failed");
                InvokeOutcome::failure(e.to_string())
            }
        }
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
