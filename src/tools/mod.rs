mod catalog;
mod horoscope;

pub use catalog::{ProductPriceTool, StockPriceTool};
pub use horoscope::{HOROSCOPE_FALLBACK, HoroscopeTool, horoscope_for};

use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Number,
    Integer,
    Boolean,
}

impl ParamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolParameter {
    pub name: String,
    pub kind: ParamKind,
    pub description: String,
    pub required: bool,
}

/// Static metadata advertised to the model for one tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn required(
        mut self,
        name: impl Into<String>,
        kind: ParamKind,
        description: impl Into<String>,
    ) -> Self {
        self.parameters.push(ToolParameter {
            name: name.into(),
            kind,
            description: description.into(),
            required: true,
        });
        self
    }

    /// JSON-schema object describing the parameters.
    pub fn parameters_schema(&self) -> Value {
        let mut properties = Map::new();
        for param in &self.parameters {
            properties.insert(
                param.name.clone(),
                json!({
                    "type": param.kind.as_str(),
                    "description": param.description,
                }),
            );
        }
        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|param| param.required)
            .map(|param| param.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub content: String,
}

impl ToolOutput {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Failure raised by a tool implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvocationError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("unknown tool '{0}'")]
    UnknownTool(String),
    #[error("tool '{tool}' failed: {source}")]
    Execution {
        tool: String,
        source: InvocationError,
    },
    #[error("tool '{0}' is already registered")]
    DuplicateTool(String),
}

pub type ToolFuture<'a> = Pin<Box<dyn Future<Output = Result<ToolOutput, InvocationError>> + 'a>>;

pub trait Tool {
    fn descriptor(&self) -> ToolDescriptor;
    fn invoke<'a>(&'a self, arguments: &'a Value) -> ToolFuture<'a>;
}

pub(crate) fn require_string<'a>(
    arguments: &'a Value,
    key: &str,
) -> Result<&'a str, InvocationError> {
    match arguments.get(key) {
        Some(Value::String(value)) => Ok(value.as_str()),
        Some(other) => Err(InvocationError::InvalidArguments(format!(
            "key {key} must be string, got {other}"
        ))),
        None => Err(InvocationError::InvalidArguments(format!(
            "missing key: {key}"
        ))),
    }
}

struct RegisteredTool {
    descriptor: ToolDescriptor,
    tool: Box<dyn Tool>,
}

/// Tools keyed by name, kept in registration order.
#[derive(Default)]
pub struct ToolRegistry {
    entries: Vec<RegisteredTool>,
    by_name: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtin_tools() -> Result<Self, ToolError> {
        let mut registry = Self::new();
        registry.register(HoroscopeTool)?;
        registry.register(ProductPriceTool)?;
        registry.register(StockPriceTool)?;
        Ok(registry)
    }

    pub fn register(&mut self, tool: impl Tool + 'static) -> Result<(), ToolError> {
        let descriptor = tool.descriptor();
        if self.by_name.contains_key(&descriptor.name) {
            warn!(tool_name = %descriptor.name, "rejected duplicate tool registration");
            return Err(ToolError::DuplicateTool(descriptor.name));
        }

        debug!(tool_name = %descriptor.name, "registered tool");
        self.by_name
            .insert(descriptor.name.clone(), self.entries.len());
        self.entries.push(RegisteredTool {
            descriptor,
            tool: Box::new(tool),
        });
        Ok(())
    }

    pub fn describe_all(&self) -> Vec<ToolDescriptor> {
        self.entries
            .iter()
            .map(|entry| entry.descriptor.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub async fn dispatch(&self, name: &str, arguments: &Value) -> Result<ToolOutput, ToolError> {
        let Some(&index) = self.by_name.get(name) else {
            return Err(ToolError::UnknownTool(name.to_string()));
        };

        debug!(tool_name = %name, "dispatching tool");
        self.entries[index]
            .tool
            .invoke(arguments)
            .await
            .map_err(|source| ToolError::Execution {
                tool: name.to_string(),
                source,
            })
    }
}
