use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::http_errors::model_api_request_error;
use super::{ProviderError, endpoint_url, read_success_body};
use crate::config::{Config, ConfigError};
use crate::model::{ConversationHistory, HistoryEntry, ModelResponse, ResponseItem, ToolCall};
use crate::tools::ToolDescriptor;

const BASE_URL_VAR: &str = "OPENAI_BASE_URL";

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: Vec<InputItem<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<FunctionTool<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    instructions: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum InputItem<'a> {
    Message {
        role: &'static str,
        content: &'a str,
    },
    FunctionCall {
        call_id: &'a str,
        name: &'a str,
        arguments: String,
    },
    FunctionCallOutput {
        call_id: &'a str,
        output: &'a str,
    },
}

#[derive(Debug, Serialize)]
struct FunctionTool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'a str,
    description: &'a str,
    parameters: Value,
}

#[derive(Debug, Deserialize)]
struct ResponsesResponse {
    id: String,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OutputItem {
    Message {
        #[serde(default)]
        content: Vec<OutputContent>,
    },
    FunctionCall {
        call_id: String,
        name: String,
        arguments: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OutputContent {
    OutputText {
        text: String,
    },
    #[serde(other)]
    Other,
}

fn to_input_items(history: &ConversationHistory) -> Vec<InputItem<'_>> {
    history
        .entries()
        .iter()
        .map(|entry| match entry {
            HistoryEntry::User { text } => InputItem::Message {
                role: "user",
                content: text,
            },
            HistoryEntry::Assistant { text } => InputItem::Message {
                role: "assistant",
                content: text,
            },
            HistoryEntry::ToolCallRequest(call) => InputItem::FunctionCall {
                call_id: &call.id,
                name: &call.name,
                arguments: call.arguments.to_string(),
            },
            HistoryEntry::ToolResult { call_id, output } => InputItem::FunctionCallOutput {
                call_id: call_id.as_str(),
                output: output.as_str(),
            },
        })
        .collect()
}

fn to_function_tools(tools: &[ToolDescriptor]) -> Vec<FunctionTool<'_>> {
    tools
        .iter()
        .map(|tool| FunctionTool {
            kind: "function",
            name: &tool.name,
            description: &tool.description,
            parameters: tool.parameters_schema(),
        })
        .collect()
}

fn into_model_response(parsed: ResponsesResponse) -> ModelResponse {
    let mut items = Vec::new();
    for item in parsed.output {
        match item {
            OutputItem::Message { content } => {
                items.extend(content.into_iter().filter_map(|part| match part {
                    OutputContent::OutputText { text } => Some(ResponseItem::Text(text)),
                    OutputContent::Other => None,
                }));
            }
            OutputItem::FunctionCall {
                call_id,
                name,
                arguments,
            } => items.push(ResponseItem::ToolCall(ToolCall::from_encoded_arguments(
                call_id, name, &arguments,
            ))),
            OutputItem::Other => {}
        }
    }

    ModelResponse {
        id: parsed.id,
        items,
    }
}

/// Client for the Responses endpoint used by the tool-calling agent.
#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    api_key: String,
    model: String,
    api_url: String,
    timeout_secs: u64,
}

impl OpenAiClient {
    /// Fails before any network traffic when `OPENAI_API_KEY` is missing.
    pub fn new(http: Client, cfg: &Config) -> Result<Self, ConfigError> {
        let api_key = cfg.require_openai_key()?.to_string();
        Ok(Self {
            http,
            api_key,
            model: cfg.openai_model.clone(),
            api_url: endpoint_url(&cfg.openai_base_url, "responses"),
            timeout_secs: cfg.model_timeout_secs,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn respond(
        &self,
        history: &ConversationHistory,
        tools: &[ToolDescriptor],
        instructions: Option<&str>,
    ) -> Result<ModelResponse, ProviderError> {
        let body = ResponsesRequest {
            model: &self.model,
            input: to_input_items(history),
            tools: to_function_tools(tools),
            instructions,
        };
        debug!(
            api_url = %self.api_url,
            model = %self.model,
            history_len = history.len(),
            tool_count = tools.len(),
            "sending responses request"
        );

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                warn!(
                    api_url = %self.api_url,
                    model = %self.model,
                    error = %err,
                    "responses request failed"
                );
                model_api_request_error(err, &self.api_url, BASE_URL_VAR, self.timeout_secs)
            })?;

        let text = read_success_body(
            response,
            &self.api_url,
            "openai",
            BASE_URL_VAR,
            self.timeout_secs,
        )
        .await?;
        let parsed: ResponsesResponse =
            serde_json::from_str(&text).map_err(|err| ProviderError::ResponseFormat {
                api_url: self.api_url.clone(),
                reason: err.to_string(),
            })?;
        let response = into_model_response(parsed);
        debug!(
            response_id = %response.id,
            item_count = response.items.len(),
            "received responses reply"
        );
        Ok(response)
    }
}
