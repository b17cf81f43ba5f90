pub mod agent;
pub mod config;
pub mod logging;
pub mod model;
pub mod model_gateway;
pub mod providers;
pub mod report;
pub mod tools;

use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use std::env;
use std::time::Duration;
use tracing::info;

use agent::{Agent, AgentSettings};
use config::Config;
use providers::anthropic::AnthropicClient;
use providers::openai::OpenAiClient;
use tools::ToolRegistry;

pub const DEFAULT_AGENT_PROMPT: &str = "What is my horoscope? I am an Aquarius.";
pub const DEFAULT_CHAT_PROMPT: &str = "Hello! In one sentence, what can you help me with?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Agent(String),
    Chat(String),
}

impl Command {
    /// `[agent|chat] [prompt...]`; anything else is an agent prompt.
    pub fn from_args(args: &[String]) -> Self {
        let (is_chat, rest) = match args.first().map(String::as_str) {
            Some("chat") => (true, &args[1..]),
            Some("agent") => (false, &args[1..]),
            _ => (false, args),
        };
        let prompt = rest.join(" ");
        let prompt = prompt.trim();

        match (is_chat, prompt.is_empty()) {
            (true, true) => Self::Chat(DEFAULT_CHAT_PROMPT.to_string()),
            (true, false) => Self::Chat(prompt.to_string()),
            (false, true) => Self::Agent(DEFAULT_AGENT_PROMPT.to_string()),
            (false, false) => Self::Agent(prompt.to_string()),
        }
    }
}

pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let _log_guard = logging::init();

    let cfg = Config::from_env();
    info!(
        openai_model = %cfg.openai_model,
        anthropic_model = %cfg.anthropic_model,
        openai_key_set = cfg.openai_api_key.is_some(),
        anthropic_key_set = cfg.anthropic_api_key.is_some(),
        model_timeout_secs = cfg.model_timeout_secs,
        tool_max_retries = cfg.tool_max_retries,
        "loaded runtime configuration"
    );

    let client = Client::builder()
        .timeout(Duration::from_secs(cfg.model_timeout_secs))
        .build()
        .context("Failed to initialize HTTP client")?;

    let args: Vec<String> = env::args().skip(1).collect();
    match Command::from_args(&args) {
        Command::Agent(prompt) => run_agent(client, &cfg, &prompt).await,
        Command::Chat(prompt) => run_chat(client, &cfg, &prompt).await,
    }
}

async fn run_agent(client: Client, cfg: &Config, prompt: &str) -> Result<()> {
    let gateway = OpenAiClient::new(client, cfg)?;
    let registry = ToolRegistry::with_builtin_tools().context("Failed to register tools")?;
    info!(model = %gateway.model(), tool_count = registry.len(), "starting tool-calling agent");

    let mut agent = Agent::new(gateway, registry, AgentSettings::from_config(cfg));
    let reply = agent.run(prompt).await?;
    println!("{}", report::render_answer(&reply.answer, &reply.response_id));
    Ok(())
}

async fn run_chat(client: Client, cfg: &Config, prompt: &str) -> Result<()> {
    let chat = AnthropicClient::new(client, cfg)?;
    info!(model = %chat.model(), "starting single-turn chat");

    let reply = chat.send(prompt).await?;
    let text = reply
        .first_text()
        .ok_or_else(|| anyhow!("Chat response '{}' contained no text", reply.id))?;
    println!("{}", report::render_answer(text, &reply.id));
    Ok(())
}
