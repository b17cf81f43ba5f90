use std::env;

use thiserror::Error;

const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1-mini";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-latest";
const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
const DEFAULT_ANTHROPIC_MAX_TOKENS: u64 = 1024;
const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 60;
const DEFAULT_TOOL_MAX_RETRIES: u32 = 2;
const MAX_TOOL_RETRIES: u32 = 10;
const DEFAULT_FINAL_INSTRUCTIONS: &str = "Respond naturally using the tool outputs provided.";

pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const ANTHROPIC_API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} is not set. Export it or add it to a .env file.")]
    MissingSecret { var: &'static str },
}

#[derive(Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub anthropic_base_url: String,
    pub anthropic_max_tokens: u64,
    pub model_timeout_secs: u64,
    pub tool_max_retries: u32,
    pub final_instructions: String,
}

// Keys stay out of Debug output so the struct can be logged.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("openai_model", &self.openai_model)
            .field("openai_base_url", &self.openai_base_url)
            .field("anthropic_api_key", &redact(&self.anthropic_api_key))
            .field("anthropic_model", &self.anthropic_model)
            .field("anthropic_base_url", &self.anthropic_base_url)
            .field("anthropic_max_tokens", &self.anthropic_max_tokens)
            .field("model_timeout_secs", &self.model_timeout_secs)
            .field("tool_max_retries", &self.tool_max_retries)
            .field("final_instructions", &self.final_instructions)
            .finish()
    }
}

fn redact(secret: &Option<String>) -> &'static str {
    match secret {
        Some(_) => "<set>",
        None => "<missing>",
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_env_with(|key| env::var(key).ok())
    }

    pub fn from_env_with(mut get_var: impl FnMut(&str) -> Option<String>) -> Self {
        Self {
            openai_api_key: parse_secret(get_var(OPENAI_API_KEY_VAR).as_deref()),
            openai_model: parse_text(get_var("OPENAI_MODEL").as_deref(), DEFAULT_OPENAI_MODEL),
            openai_base_url: parse_text(
                get_var("OPENAI_BASE_URL").as_deref(),
                DEFAULT_OPENAI_BASE_URL,
            ),
            anthropic_api_key: parse_secret(get_var(ANTHROPIC_API_KEY_VAR).as_deref()),
            anthropic_model: parse_text(
                get_var("ANTHROPIC_MODEL").as_deref(),
                DEFAULT_ANTHROPIC_MODEL,
            ),
            anthropic_base_url: parse_text(
                get_var("ANTHROPIC_BASE_URL").as_deref(),
                DEFAULT_ANTHROPIC_BASE_URL,
            ),
            anthropic_max_tokens: parse_positive_u64(
                get_var("ANTHROPIC_MAX_TOKENS").as_deref(),
                DEFAULT_ANTHROPIC_MAX_TOKENS,
            ),
            model_timeout_secs: parse_positive_u64(
                get_var("MODEL_TIMEOUT_SECS").as_deref(),
                DEFAULT_MODEL_TIMEOUT_SECS,
            ),
            tool_max_retries: parse_tool_max_retries(get_var("TOOL_MAX_RETRIES").as_deref()),
            final_instructions: parse_text(
                get_var("FINAL_INSTRUCTIONS").as_deref(),
                DEFAULT_FINAL_INSTRUCTIONS,
            ),
        }
    }

    pub fn require_openai_key(&self) -> Result<&str, ConfigError> {
        self.openai_api_key
            .as_deref()
            .ok_or(ConfigError::MissingSecret {
                var: OPENAI_API_KEY_VAR,
            })
    }

    pub fn require_anthropic_key(&self) -> Result<&str, ConfigError> {
        self.anthropic_api_key
            .as_deref()
            .ok_or(ConfigError::MissingSecret {
                var: ANTHROPIC_API_KEY_VAR,
            })
    }
}

fn parse_secret(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn parse_text(raw: Option<&str>, default: &str) -> String {
    parse_secret(raw).unwrap_or_else(|| default.to_string())
}

fn parse_positive_u64(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

/// Zero is a valid setting and disables retries. Larger values are clamped
/// to [`MAX_TOOL_RETRIES`].
fn parse_tool_max_retries(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .map(|value| value.min(MAX_TOOL_RETRIES))
        .unwrap_or(DEFAULT_TOOL_MAX_RETRIES)
}
