//! OpenAI-compatible LLM adapter.
//!
//! Works with OpenAI, DeepSeek, Groq, Together and any provider speaking the
//! chat completions API. Content blocks are mapped onto that format:
//! `tool_use` blocks become assistant `tool_calls`, and each `tool_result`
//! block becomes a `tool` role message.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use agent_core::ports::*;
use agent_types::{
    AgentError, Result,
    config::LlmConfig,
    message::{ContentBlock, Message, Role},
};

use super::error_for_status;

/// Provider that speaks the OpenAI chat completions protocol.
pub struct OpenAiCompatProvider {
    config: LlmConfig,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    pub fn new(config: LlmConfig, client: reqwest::Client) -> Self {
        let base_url = config.base_url();
        Self {
            config,
            base_url,
            client,
        }
    }

    pub(crate) fn build_request_body(req: &ChatRequest) -> Value {
        let mut messages = Vec::new();
        if let Some(system) = req.system.as_deref().filter(|s| !s.is_empty()) {
            messages.push(json!({ "role": "system", "content": system }));
        }
        for message in &req.messages {
            messages.extend(message_to_json(message));
        }

        let mut body = json!({
            "model": req.model,
            "messages": messages,
            "max_tokens": req.max_tokens,
        });

        if !req.tools.is_empty() {
            let tools: Vec<Value> = req
                .tools
                .iter()
                .map(|t| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": t.name,
                            "description": t.description,
                            "parameters": t.input_schema,
                        }
                    })
                })
                .collect();
            body["tools"] = json!(tools);
        }

        body
    }
}

#[async_trait(?Send)]
impl LlmPort for OpenAiCompatProvider {
    async fn chat_completion(&self, req: ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = Self::build_request_body(&req);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::Network(e.to_string()))?;

        let data: ApiResponse = error_for_status(response)
            .await?
            .json()
            .await
            .map_err(|e| AgentError::Llm(e.to_string()))?;

        parse_response(data)
    }
}

// ─── API response types ──────────────────────────────────────

#[derive(Deserialize)]
pub(crate) struct ApiResponse {
    choices: Vec<ApiChoice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Deserialize)]
struct ApiChoice {
    message: ApiMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<ApiToolCall>,
}

#[derive(Deserialize)]
struct ApiToolCall {
    id: String,
    function: ApiFunction,
}

#[derive(Deserialize)]
struct ApiFunction {
    name: String,
    arguments: String,
}

#[derive(Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

pub(crate) fn parse_response(data: ApiResponse) -> Result<ChatResponse> {
    let choice = data
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AgentError::Llm("No choices in response".to_string()))?;

    let mut content = Vec::new();
    if let Some(text) = choice.message.content.filter(|t| !t.is_empty()) {
        content.push(ContentBlock::Text { text });
    }
    for call in choice.message.tool_calls {
        // Unparseable arguments reach the tool as a string and fail there
        let input = serde_json::from_str(&call.function.arguments)
            .unwrap_or(Value::String(call.function.arguments));
        content.push(ContentBlock::ToolUse {
            id: call.id,
            name: call.function.name,
            input,
        });
    }

    Ok(ChatResponse {
        message: Message::assistant_blocks(content),
        usage: data.usage.map(|u| TokenUsage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        }),
        stop_reason: choice.finish_reason,
    })
}

// ─── Serialization helpers ───────────────────────────────────

/// One history message as zero or more chat completion messages.
fn message_to_json(msg: &Message) -> Vec<Value> {
    let mut out = Vec::new();
    let text = msg.text();

    match msg.role {
        Role::Assistant => {
            let calls: Vec<Value> = msg
                .tool_calls()
                .into_iter()
                .map(|tc| {
                    json!({
                        "id": tc.id,
                        "type": "function",
                        "function": {
                            "name": tc.name,
                            "arguments": tc.input.to_string(),
                        }
                    })
                })
                .collect();

            let mut obj = json!({
                "role": "assistant",
                "content": if text.is_empty() { Value::Null } else { json!(text) },
            });
            if !calls.is_empty() {
                obj["tool_calls"] = json!(calls);
            }
            out.push(obj);
        }
        Role::User => {
            for block in &msg.content {
                if let ContentBlock::ToolResult {
                    tool_use_id,
                    content,
                    ..
                } = block
                {
                    out.push(json!({
                        "role": "tool",
                        "tool_call_id": tool_use_id,
                        "content": content,
                    }));
                }
            }
            // A blank prompt is still a user turn; only a pure tool-result
            // message maps to tool messages alone
            if out.is_empty() || !text.is_empty() {
                out.push(json!({ "role": "user", "content": text }));
            }
        }
    }

    out
}
