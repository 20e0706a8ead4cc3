//! Anthropic Messages API adapter.
//!
//! The conversation model already uses the Messages API content-block
//! shape, so history is sent as-is. Response blocks other than `text` and
//! `tool_use` (thinking, server tools, ...) are dropped.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use agent_core::ports::*;
use agent_types::{
    AgentError, Result,
    config::LlmConfig,
    message::{ContentBlock, Message},
};

use super::error_for_status;

pub const API_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    config: LlmConfig,
    base_url: String,
    client: reqwest::Client,
}

impl AnthropicProvider {
    pub fn new(config: LlmConfig, client: reqwest::Client) -> Self {
        let base_url = config.base_url();
        Self {
            config,
            base_url,
            client,
        }
    }

    pub(crate) fn build_request_body(req: &ChatRequest) -> Result<Value> {
        let mut body = json!({
            "model": req.model,
            "max_tokens": req.max_tokens,
            "messages": serde_json::to_value(&req.messages)?,
        });

        if let Some(system) = req.system.as_deref().filter(|s| !s.is_empty()) {
            body["system"] = json!(system);
        }

        if !req.tools.is_empty() {
            body["tools"] = serde_json::to_value(&req.tools)?;
        }

        Ok(body)
    }
}

#[async_trait(?Send)]
impl LlmPort for AnthropicProvider {
    async fn chat_completion(&self, req: ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/v1/messages", self.base_url);
        let body = Self::build_request_body(&req)?;

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::Network(e.to_string()))?;

        let data: ApiResponse = error_for_status(response)
            .await?
            .json()
            .await
            .map_err(|e| AgentError::Llm(e.to_string()))?;

        Ok(parse_response(data))
    }
}

// ─── API response types ──────────────────────────────────────

#[derive(Deserialize)]
pub(crate) struct ApiResponse {
    #[serde(default)]
    content: Vec<Value>,
    #[serde(default)]
    stop_reason: Option<String>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Deserialize)]
struct ApiUsage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

pub(crate) fn parse_response(data: ApiResponse) -> ChatResponse {
    let content = data
        .content
        .into_iter()
        .filter_map(|block| match serde_json::from_value::<ContentBlock>(block.clone()) {
            Ok(b @ (ContentBlock::Text { .. } | ContentBlock::ToolUse { .. })) => Some(b),
            _ => {
                log::debug!("dropping response block of type {}", block["type"]);
                None
            }
        })
        .collect();

    ChatResponse {
        message: Message::assistant_blocks(content),
        usage: data.usage.map(|u| TokenUsage {
            input_tokens: u.input_tokens,
            output_tokens: u.output_tokens,
        }),
        stop_reason: data.stop_reason,
    }
}
