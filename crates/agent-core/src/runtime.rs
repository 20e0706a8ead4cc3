//! Agent runtime — the conversation loop.
//!
//! States and transitions:
//! 1. `AwaitingUserInput`: read a line; end of input ends the run.
//! 2. `AwaitingModelResponse`: send history + tool declarations to the LLM
//!    and append its answer. No tool calls → back to 1.
//! 3. `DispatchingTools`: run the requested calls one by one, append all
//!    results as a single user message → back to 2 without prompting.
//!
//! A failed model call is fatal. Tool failures are not: they travel back to
//! the model as error-flagged results.

use agent_types::{
    Result,
    config::AgentConfig,
    event::AgentEvent,
    message::{ContentBlock, Message, ToolCall},
    tool::ToolOutcome,
};
use crate::event_bus::EventBus;
use crate::ports::*;
use crate::tools::ToolRegistry;

/// The agent runtime state
pub struct AgentRuntime {
    pub config: AgentConfig,
    /// Conversation history, owned here and only appended between steps
    pub messages: Vec<Message>,
    pub event_bus: EventBus,
    pub tools: ToolRegistry,
    pub state: AgentState,
    turn_counter: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentState {
    AwaitingUserInput,
    AwaitingModelResponse,
    DispatchingTools { pending: usize },
    /// The model call failed; the run is over
    Failed(String),
}

impl AgentRuntime {
    pub fn new(config: AgentConfig, tools: ToolRegistry, event_bus: EventBus) -> Self {
        Self {
            config,
            messages: Vec::new(),
            event_bus,
            tools,
            state: AgentState::AwaitingUserInput,
            turn_counter: 0,
        }
    }

    /// Drive the conversation until the input closes or the model fails.
    pub async fn run(&mut self, input: &mut dyn UserInput, llm: &dyn LlmPort) -> Result<()> {
        loop {
            self.state = AgentState::AwaitingUserInput;
            let Some(line) = input.read_line().await? else {
                log::info!("input closed after {} turns", self.turn_counter);
                return Ok(());
            };
            self.run_turn(&line, llm).await?;
        }
    }

    /// Run one user message through model calls and tool dispatch until the
    /// model answers without requesting tools.
    pub async fn run_turn(&mut self, user_input: &str, llm: &dyn LlmPort) -> Result<()> {
        self.turn_counter += 1;
        let turn_id = self.turn_counter;
        self.event_bus.emit(AgentEvent::TurnStart { turn_id });

        self.messages.push(Message::user(user_input));
        self.state = AgentState::AwaitingModelResponse;

        loop {
            let response = self.request_completion(llm).await?;
            let assistant_msg = response.message;

            for block in &assistant_msg.content {
                if let ContentBlock::Text { text } = block {
                    if !text.is_empty() {
                        self.event_bus.emit(AgentEvent::AssistantText { text: text.clone() });
                    }
                }
            }

            let tool_calls = assistant_msg.tool_calls();
            self.messages.push(assistant_msg);

            if tool_calls.is_empty() {
                self.state = AgentState::AwaitingUserInput;
                self.event_bus.emit(AgentEvent::TurnEnd { turn_id });
                return Ok(());
            }

            self.state = AgentState::DispatchingTools {
                pending: tool_calls.len(),
            };
            let mut outcomes = Vec::with_capacity(tool_calls.len());
            for (i, call) in tool_calls.iter().enumerate() {
                outcomes.push(self.dispatch(call).await);
                self.state = AgentState::DispatchingTools {
                    pending: tool_calls.len() - i - 1,
                };
            }

            self.messages.push(Message::tool_results(outcomes));
            self.state = AgentState::AwaitingModelResponse;
        }
    }

    async fn request_completion(&mut self, llm: &dyn LlmPort) -> Result<ChatResponse> {
        let req = ChatRequest {
            model: self.config.llm.model.clone(),
            max_tokens: self.config.llm.max_tokens,
            system: self.config.system_prompt.clone(),
            messages: self.messages.clone(),
            tools: self.tools.definitions(),
        };

        let response = llm.chat_completion(req).await.map_err(|e| {
            self.state = AgentState::Failed(e.to_string());
            self.event_bus.emit(AgentEvent::Error {
                message: e.to_string(),
            });
            e
        })?;

        if let Some(usage) = &response.usage {
            log::debug!(
                "model usage: {} input / {} output tokens (stop: {:?})",
                usage.input_tokens,
                usage.output_tokens,
                response.stop_reason
            );
        }
        Ok(response)
    }

    /// Execute a single tool call and return its outcome
    async fn dispatch(&self, call: &ToolCall) -> ToolOutcome {
        self.event_bus.emit(AgentEvent::ToolExecStart {
            call_id: call.id.clone(),
            tool_name: call.name.clone(),
            input: call.input.clone(),
        });

        let outcome = self.tools.execute_call(call).await;

        if self.config.debug {
            self.event_bus.emit(AgentEvent::ToolExecEnd {
                call_id: outcome.call_id.clone(),
                output: outcome.content.clone(),
                is_error: outcome.is_error,
            });
        }
        outcome
    }

    /// Forget the conversation
    pub fn reset(&mut self) {
        self.messages.clear();
        self.state = AgentState::AwaitingUserInput;
        self.turn_counter = 0;
    }
}
