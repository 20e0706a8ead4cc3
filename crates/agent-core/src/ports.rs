//! Port traits — the hexagonal architecture boundary.
//!
//! These traits are defined here in `agent-core` (pure Rust).
//! Implementations live in `agent-platform` (native adapters) and
//! `agent-cli` (terminal). The core only depends on these traits.
//!
//! Everything runs on one thread, so the async traits are `?Send`.

use async_trait::async_trait;
use agent_types::{
    Result, ToolError,
    event::AgentEvent,
    message::Message,
    tool::{CommandResult, ToolDefinition},
};

// ─── LLM Port ────────────────────────────────────────────────

/// Request to send to an LLM
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub max_tokens: u32,
    pub system: Option<String>,
    pub messages: Vec<Message>,
    pub tools: Vec<ToolDefinition>,
}

/// Complete response from an LLM
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// Always an assistant-role message
    pub message: Message,
    pub usage: Option<TokenUsage>,
    pub stop_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

#[async_trait(?Send)]
pub trait LlmPort {
    /// One synchronous round trip; retries are the caller's business.
    async fn chat_completion(&self, req: ChatRequest) -> Result<ChatResponse>;
}

// ─── Shell Port ──────────────────────────────────────────────

#[async_trait(?Send)]
pub trait ShellPort {
    /// Run `command` in the platform shell and wait at most `timeout_secs`.
    ///
    /// A non-zero exit is `Ok`; launching failures and deadline expiry are
    /// the only errors.
    async fn execute(
        &self,
        command: &str,
        timeout_secs: u64,
    ) -> std::result::Result<CommandResult, ToolError>;
}

// ─── User Input Port ─────────────────────────────────────────

#[async_trait(?Send)]
pub trait UserInput {
    /// Next line typed by the user, or `None` once the input is closed.
    async fn read_line(&mut self) -> Result<Option<String>>;
}

// ─── Event Sink ──────────────────────────────────────────────

/// Receives runtime events as they happen (terminal transcript, recorders).
pub trait EventSink {
    fn emit(&self, event: &AgentEvent);
}
