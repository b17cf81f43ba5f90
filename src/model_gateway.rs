use std::future::Future;
use std::pin::Pin;

use crate::model::{ConversationHistory, ModelResponse};
use crate::providers::ProviderError;
use crate::providers::openai::OpenAiClient;
use crate::tools::ToolDescriptor;

/// Everything the model sees on one call.
#[derive(Debug, Clone, Copy)]
pub struct ModelRequest<'a> {
    pub history: &'a ConversationHistory,
    /// Empty when the call must not offer tools.
    pub tools: &'a [ToolDescriptor],
    pub instructions: Option<&'a str>,
}

pub type ModelGatewayFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ModelResponse, ProviderError>> + 'a>>;

/// Transport behind the agent. Swapping this out leaves the agent's
/// two-call contract unchanged.
pub trait ModelGateway {
    fn respond<'a>(&'a self, request: ModelRequest<'a>) -> ModelGatewayFuture<'a>;
}

impl ModelGateway for OpenAiClient {
    fn respond<'a>(&'a self, request: ModelRequest<'a>) -> ModelGatewayFuture<'a> {
        Box::pin(async move {
            OpenAiClient::respond(self, request.history, request.tools, request.instructions)
                .await
        })
    }
}
