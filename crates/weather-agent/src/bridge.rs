//! Dynamic tool bridging
//!
//! Builds a locally callable [`BoundTool`] adapter from every descriptor a
//! tool server publishes, without any per-tool code. The factory derives a
//! typed parameter contract from the descriptor's JSON schema and binds the
//! tool name by value into each adapter, so adapter N always invokes its own
//! tool no matter how many descriptors were walked to build it.
//!
//! Invocation never raises across the tool boundary: missing arguments,
//! error payloads, and transport failures all come back as text the model
//! can reason about.

use std::sync::Arc;

use serde_json::{Map, Value};
use weather_mcp::ToolDescriptor;

use crate::error::{Error, Result};
use crate::transport::ToolTransport;

/// Value type of one tool parameter, mapped from the schema's declared
/// primitive type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
}

impl ParamKind {
    /// Map a JSON-Schema type name to a parameter kind.
    fn parse(parameter: &str, type_name: &str) -> Result<Self> {
        match type_name {
            "string" => Ok(ParamKind::String),
            "number" => Ok(ParamKind::Number),
            "integer" => Ok(ParamKind::Integer),
            "boolean" => Ok(ParamKind::Boolean),
            "array" => Ok(ParamKind::Array),
            "object" => Ok(ParamKind::Object),
            other => Err(Error::UnsupportedSchemaType {
                parameter: parameter.to_string(),
                type_name: other.to_string(),
            }),
        }
    }
}

/// One entry of an adapter's derived parameter contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
    pub description: String,
    pub required: bool,
}

/// A locally callable stand-in for one remote tool.
///
/// The tool name is an immutable per-adapter field, captured by value at
/// build time; invoking this adapter can only ever reach the tool it was
/// built for.
pub struct BoundTool {
    name: String,
    description: String,
    input_schema: Value,
    params: Vec<ParamSpec>,
    transport: Arc<dyn ToolTransport>,
}

impl std::fmt::Debug for BoundTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundTool")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl BoundTool {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The raw schema as published, for forwarding to an LLM provider.
    pub fn input_schema(&self) -> &Value {
        &self.input_schema
    }

    /// The derived parameter contract: required parameters first, in the
    /// schema's `required`-array order, then optional ones.
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Invoke the bound tool with concrete argument values.
    ///
    /// Never returns an error: validation failures, error payloads, and
    /// transport faults are all rendered as text so the calling agent can
    /// fold them into its reasoning instead of crashing the turn.
    pub async fn invoke(&self, arguments: Value) -> String {
        match self.try_invoke(arguments).await {
            Ok(text) => text,
            Err(e) => e.to_string(),
        }
    }

    async fn try_invoke(&self, arguments: Value) -> Result<String> {
        let args = match arguments {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(Error::InvalidArguments {
                    got: json_type_name(&other).to_string(),
                });
            }
        };

        // Required parameters are checked in declaration order; the first
        // missing one is reported.
        for param in self.params.iter().filter(|p| p.required) {
            if !args.contains_key(&param.name) {
                return Err(Error::MissingArgument {
                    tool: self.name.clone(),
                    parameter: param.name.clone(),
                });
            }
        }

        let args_display = Value::Object(args.clone());
        tracing::debug!(tool = %self.name, args = %args_display, "Invoking tool");
        let reply = self
            .transport
            .call_tool(&self.name, Value::Object(args))
            .await?;

        if reply.ok {
            Ok(render_payload(reply.data.unwrap_or(Value::Null)))
        } else {
            Ok(reply
                .error
                .unwrap_or_else(|| "tool call failed".to_string()))
        }
    }
}

/// Build one adapter from a descriptor.
///
/// The schema's declared parameter types are mapped into [`ParamKind`]s; a
/// type with no mapping degrades to a string-like parameter (logged at warn
/// level) rather than rejecting the whole tool, so one malformed property
/// cannot disable an otherwise-usable tool. A schema with zero properties
/// yields an adapter taking no parameters.
pub fn build(descriptor: ToolDescriptor, transport: Arc<dyn ToolTransport>) -> BoundTool {
    let params = derive_params(&descriptor);
    BoundTool {
        name: descriptor.name,
        description: descriptor.description,
        input_schema: descriptor.input_schema,
        params,
        transport,
    }
}

/// Build adapters for every descriptor, preserving input order.
///
/// Pure function of the descriptor list: calling it twice yields two
/// independently usable, equivalent adapter sets. An empty list yields an
/// empty set.
pub fn build_all(
    descriptors: Vec<ToolDescriptor>,
    transport: &Arc<dyn ToolTransport>,
) -> Vec<BoundTool> {
    descriptors
        .into_iter()
        .map(|descriptor| build(descriptor, Arc::clone(transport)))
        .collect()
}

/// Derive the parameter contract from a descriptor's input schema.
fn derive_params(descriptor: &ToolDescriptor) -> Vec<ParamSpec> {
    let schema = &descriptor.input_schema;
    let empty = Map::new();
    let properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let mut params = Vec::with_capacity(properties.len());

    // Required parameters first, in `required`-array order.
    for &name in &required {
        if let Some(property) = properties.get(name) {
            params.push(param_spec(&descriptor.name, name, property, true));
        }
    }
    for (name, property) in properties {
        if !required.contains(&name.as_str()) {
            params.push(param_spec(&descriptor.name, name, property, false));
        }
    }

    params
}

fn param_spec(tool: &str, name: &str, property: &Value, required: bool) -> ParamSpec {
    let type_name = property
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("string");

    let kind = match ParamKind::parse(name, type_name) {
        Ok(kind) => kind,
        Err(e) => {
            // Lenient fallback: treat the parameter as string-like instead of
            // disabling the tool.
            tracing::warn!(tool, parameter = name, error = %e, "Falling back to string parameter");
            ParamKind::String
        }
    };

    ParamSpec {
        name: name.to_string(),
        kind,
        description: property
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        required,
    }
}

/// Render a success payload as plain text for the agent framework.
fn render_payload(data: Value) -> String {
    match data {
        Value::String(text) => text,
        other => serde_json::to_string_pretty(&other).unwrap_or_else(|_| other.to_string()),
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
