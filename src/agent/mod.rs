use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::model::{ConversationHistory, HistoryEntry, ModelResponse, ResponseItem, ToolCall};
use crate::model_gateway::{ModelGateway, ModelRequest};
use crate::providers::ProviderError;
use crate::tools::{InvocationError, ToolError, ToolRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    Idle,
    AwaitingFirstResponse,
    ExecutingTools,
    AwaitingFinalResponse,
    Done,
}

impl AgentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingFirstResponse => "awaiting_first_response",
            Self::ExecutingTools => "executing_tools",
            Self::AwaitingFinalResponse => "awaiting_final_response",
            Self::Done => "done",
        }
    }
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("model response '{response_id}' contained no text")]
    MissingText { response_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSettings {
    /// Sent with the synthesis call that follows tool execution.
    pub final_instructions: String,
    /// Extra attempts for a tool whose implementation failed. Rejected
    /// arguments are never retried.
    pub tool_max_retries: u32,
}

impl AgentSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            final_instructions: cfg.final_instructions.clone(),
            tool_max_retries: cfg.tool_max_retries,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentReply {
    pub answer: String,
    pub response_id: String,
    pub history: ConversationHistory,
}

/// Runs one reason, act, synthesize exchange per call to [`Agent::run`].
///
/// The first model call sees every registered tool. Each requested call is
/// dispatched in order and answered with exactly one tool result, and a second
/// call without tools produces the answer. Tool failures are folded into the
/// conversation as `ERROR: ...` results; provider failures end the run.
pub struct Agent<G> {
    gateway: G,
    registry: ToolRegistry,
    settings: AgentSettings,
    state: AgentState,
}

impl<G: ModelGateway> Agent<G> {
    pub fn new(gateway: G, registry: ToolRegistry, settings: AgentSettings) -> Self {
        Self {
            gateway,
            registry,
            settings,
            state: AgentState::Idle,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Phase reached by the latest run. A failed run stays in the phase that failed.
    pub fn state(&self) -> AgentState {
        self.state
    }

    pub async fn run(&mut self, user_text: &str) -> Result<AgentReply, AgentError> {
        self.transition(AgentState::Idle);
        let mut history = ConversationHistory::new();
        history.push(HistoryEntry::user(user_text));
        info!(prompt_len = user_text.len(), "starting agent run");

        self.transition(AgentState::AwaitingFirstResponse);
        let tools = self.registry.describe_all();
        let first = self
            .gateway
            .respond(ModelRequest {
                history: &history,
                tools: &tools,
                instructions: None,
            })
            .await?;

        if !first.has_tool_calls() {
            debug!(response_id = %first.id, "model answered without tools");
            return self.finish(history, &first);
        }

        for item in &first.items {
            history.push(match item {
                ResponseItem::Text(text) => HistoryEntry::assistant(text.clone()),
                ResponseItem::ToolCall(call) => HistoryEntry::ToolCallRequest(call.clone()),
            });
        }

        self.transition(AgentState::ExecutingTools);
        for call in first.tool_calls() {
            let output = self.execute_tool(call).await;
            history.push(HistoryEntry::tool_result(call.id.clone(), output));
        }

        self.transition(AgentState::AwaitingFinalResponse);
        let last = self
            .gateway
            .respond(ModelRequest {
                history: &history,
                tools: &[],
                instructions: Some(self.settings.final_instructions.as_str()),
            })
            .await?;
        if last.has_tool_calls() {
            warn!(
                response_id = %last.id,
                "ignoring tool calls in final response; only one round of tool use is supported"
            );
        }

        self.finish(history, &last)
    }

    fn finish(
        &mut self,
        mut history: ConversationHistory,
        response: &ModelResponse,
    ) -> Result<AgentReply, AgentError> {
        let answer = response
            .first_text()
            .ok_or_else(|| AgentError::MissingText {
                response_id: response.id.clone(),
            })?
            .to_string();
        history.push(HistoryEntry::assistant(answer.clone()));
        self.transition(AgentState::Done);
        info!(
            response_id = %response.id,
            history_len = history.len(),
            "agent run finished"
        );

        Ok(AgentReply {
            answer,
            response_id: response.id.clone(),
            history,
        })
    }

    async fn execute_tool(&self, call: &ToolCall) -> String {
        info!(tool_name = %call.name, call_id = %call.id, "model requested tool");
        let mut retries = 0;
        loop {
            match self.registry.dispatch(&call.name, &call.arguments).await {
                Ok(output) => return output.content,
                Err(
                    err @ ToolError::Execution {
                        source: InvocationError::Failed(_),
                        ..
                    },
                ) if retries < self.settings.tool_max_retries =>
                {
                    retries += 1;
                    warn!(
                        tool_name = %call.name,
                        attempt = retries,
                        max_retries = self.settings.tool_max_retries,
                        error = %err,
                        "retrying failed tool"
                    );
                }
                Err(err) => {
                    warn!(tool_name = %call.name, error = %err, "tool call failed");
                    return format!("ERROR: {err}");
                }
            }
        }
    }

    fn transition(&mut self, next: AgentState) {
        debug!(from = self.state.as_str(), to = next.as_str(), "agent state change");
        self.state = next;
    }
}
