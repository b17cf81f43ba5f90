use serde_json::Value;

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    /// Decodes the JSON-encoded argument string providers send. Text that is
    /// not valid JSON is kept as a string value so dispatch can reject it.
    pub fn from_encoded_arguments(
        id: impl Into<String>,
        name: impl Into<String>,
        encoded: &str,
    ) -> Self {
        let arguments = serde_json::from_str(encoded)
            .unwrap_or_else(|_| Value::String(encoded.to_string()));
        Self::new(id, name, arguments)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEntry {
    User { text: String },
    ToolCallRequest(ToolCall),
    ToolResult { call_id: String, output: String },
    Assistant { text: String },
}

impl HistoryEntry {
    pub fn user(text: impl Into<String>) -> Self {
        Self::User { text: text.into() }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::Assistant { text: text.into() }
    }

    pub fn tool_result(call_id: impl Into<String>, output: impl Into<String>) -> Self {
        Self::ToolResult {
            call_id: call_id.into(),
            output: output.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::User { .. } => "user",
            Self::ToolCallRequest(_) => "tool_call",
            Self::ToolResult { .. } => "tool_result",
            Self::Assistant { .. } => "assistant",
        }
    }
}

/// Ordered entries replayed to the model on every call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationHistory {
    entries: Vec<HistoryEntry>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn tool_results(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|entry| match entry {
            HistoryEntry::ToolResult { call_id, output } => Some((call_id.as_str(), output.as_str())),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseItem {
    Text(String),
    ToolCall(ToolCall),
}

/// One reply from the tool-calling provider, items in the order produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelResponse {
    pub id: String,
    pub items: Vec<ResponseItem>,
}

impl ModelResponse {
    pub fn text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            items: vec![ResponseItem::Text(text.into())],
        }
    }

    pub fn tool_calls(&self) -> impl Iterator<Item = &ToolCall> {
        self.items.iter().filter_map(|item| match item {
            ResponseItem::ToolCall(call) => Some(call),
            ResponseItem::Text(_) => None,
        })
    }

    pub fn has_tool_calls(&self) -> bool {
        self.tool_calls().next().is_some()
    }

    pub fn first_text(&self) -> Option<&str> {
        self.items.iter().find_map(|item| match item {
            ResponseItem::Text(text) => Some(text.as_str()),
            ResponseItem::ToolCall(_) => None,
        })
    }
}
