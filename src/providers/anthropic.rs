use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::http_errors::model_api_request_error;
use super::{ProviderError, endpoint_url, read_success_body};
use crate::config::{Config, ConfigError};

const BASE_URL_VAR: &str = "ANTHROPIC_BASE_URL";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u64,
    messages: [UserMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    id: String,
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

/// Reply to a single-turn chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub id: String,
    pub segments: Vec<String>,
}

impl ChatReply {
    pub fn first_text(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }
}

impl From<MessagesResponse> for ChatReply {
    fn from(parsed: MessagesResponse) -> Self {
        let segments = parsed
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .collect();
        Self {
            id: parsed.id,
            segments,
        }
    }
}

#[derive(Clone)]
pub struct AnthropicClient {
    http: Client,
    api_key: String,
    model: String,
    max_tokens: u64,
    api_url: String,
    timeout_secs: u64,
}

impl AnthropicClient {
    pub fn new(http: Client, cfg: &Config) -> Result<Self, ConfigError> {
        let api_key = cfg.require_anthropic_key()?.to_string();
        Ok(Self {
            http,
            api_key,
            model: cfg.anthropic_model.clone(),
            max_tokens: cfg.anthropic_max_tokens,
            api_url: endpoint_url(&cfg.anthropic_base_url, "messages"),
            timeout_secs: cfg.model_timeout_secs,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn send(&self, prompt: &str) -> Result<ChatReply, ProviderError> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: [UserMessage {
                role: "user",
                content: prompt,
            }],
        };
        debug!(
            api_url = %self.api_url,
            model = %self.model,
            prompt_len = prompt.len(),
            "sending messages request"
        );

        let response = self
            .http
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                warn!(
                    api_url = %self.api_url,
                    model = %self.model,
                    error = %err,
                    "messages request failed"
                );
                model_api_request_error(err, &self.api_url, BASE_URL_VAR, self.timeout_secs)
            })?;

        let text = read_success_body(
            response,
            &self.api_url,
            "anthropic",
            BASE_URL_VAR,
            self.timeout_secs,
        )
        .await?;
        let parsed: MessagesResponse =
            serde_json::from_str(&text).map_err(|err| ProviderError::ResponseFormat {
                api_url: self.api_url.clone(),
                reason: err.to_string(),
            })?;
        let reply = ChatReply::from(parsed);
        debug!(
            response_id = %reply.id,
            segment_count = reply.segments.len(),
            "received messages reply"
        );
        Ok(reply)
    }
}
