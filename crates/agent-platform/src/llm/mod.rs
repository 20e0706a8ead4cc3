//! LLM adapters implementing [`LlmPort`] over HTTP.

pub mod anthropic;
pub mod openai_compat;

use std::time::Duration;

use agent_core::ports::LlmPort;
use agent_types::{
    AgentError, Result,
    config::{LlmConfig, LlmProvider},
};

pub use anthropic::AnthropicProvider;
pub use openai_compat::OpenAiCompatProvider;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Build the adapter for the configured provider.
pub fn create_provider(config: LlmConfig) -> Result<Box<dyn LlmPort>> {
    let client = http_client()?;
    Ok(match config.provider {
        LlmProvider::Anthropic => Box::new(AnthropicProvider::new(config, client)),
        LlmProvider::OpenAI => Box::new(OpenAiCompatProvider::new(config, client)),
    })
}

fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| AgentError::Network(format!("failed to build HTTP client: {}", e)))
}

/// Turn a non-success HTTP response into an LLM error carrying the body.
async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    Err(AgentError::Llm(format!("HTTP {}: {}", status, text)))
}
