pub mod anthropic;
mod http_errors;
pub mod openai;
#[cfg(test)]
pub(crate) mod test_server;

use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to a hosted model. None of these are retried.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error(
        "Model request timed out after {timeout_secs}s while calling '{api_url}'. \
         Increase MODEL_TIMEOUT_SECS or check model responsiveness."
    )]
    Timeout { api_url: String, timeout_secs: u64 },

    #[error(
        "Connection refused by model API at '{api_url}'. \
         Ensure the provider is reachable and {base_url_var} is correct."
    )]
    ConnectionRefused {
        api_url: String,
        base_url_var: &'static str,
    },

    #[error(
        "Failed to connect to model API at '{api_url}'. \
         Check {base_url_var} and network connectivity."
    )]
    Connect {
        api_url: String,
        base_url_var: &'static str,
    },

    #[error("Failed to call model API at '{api_url}': {source}")]
    Request {
        api_url: String,
        source: reqwest::Error,
    },

    #[error("Model request to '{api_url}' failed with status {status}: {body}")]
    Status {
        api_url: String,
        status: StatusCode,
        body: String,
    },

    #[error("Unexpected response format from '{api_url}': {reason}")]
    ResponseFormat { api_url: String, reason: String },
}

fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

/// Reads the body of a finished request, turning non-2xx statuses into
/// [`ProviderError::Status`]. A failed read on a 2xx response is mapped like
/// a failed send.
async fn read_success_body(
    response: reqwest::Response,
    api_url: &str,
    provider: &'static str,
    base_url_var: &'static str,
    timeout_secs: u64,
) -> Result<String, ProviderError> {
    let status = response.status();

    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read response body>".to_string());
        tracing::warn!(
            provider,
            api_url = %api_url,
            status = %status,
            response_body_len = body.len(),
            "provider returned non-success status"
        );
        return Err(ProviderError::Status {
            api_url: api_url.to_string(),
            status,
            body,
        });
    }

    response.text().await.map_err(|err| {
        tracing::warn!(
            provider,
            api_url = %api_url,
            error = %err,
            "failed to read provider response body"
        );
        http_errors::model_api_request_error(err, api_url, base_url_var, timeout_secs)
    })
}
