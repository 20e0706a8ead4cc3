use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Events emitted by the agent runtime.
/// The terminal transcript subscribes to these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AgentEvent {
    /// Agent started processing a user message
    TurnStart { turn_id: u64 },

    /// A text block produced by the model
    AssistantText { text: String },

    /// A tool call is about to execute
    ToolExecStart { call_id: String, tool_name: String, input: Value },

    /// Tool execution finished (verbose mode only)
    ToolExecEnd { call_id: String, output: String, is_error: bool },

    /// The model answered without requesting tools
    TurnEnd { turn_id: u64 },

    /// A fatal error occurred
    Error { message: String },
}
