//! Operator transcript: renders runtime events as coloured terminal lines.

use agent_core::ports::EventSink;
use agent_types::event::AgentEvent;

pub const USER: &str = "\u{1b}[94m";
pub const ASSISTANT: &str = "\u{1b}[93m";
pub const TOOL: &str = "\u{1b}[92m";
pub const DEBUG: &str = "\u{1b}[96m";
pub const RESET: &str = "\u{1b}[0m";

pub fn prompt() -> String {
    format!("{}You{}: ", USER, RESET)
}

/// The transcript line for an event, if it has one.
pub fn render(event: &AgentEvent) -> Option<String> {
    match event {
        AgentEvent::AssistantText { text } => Some(format!("{}Assistant{}: {}", ASSISTANT, RESET, text)),
        AgentEvent::ToolExecStart { tool_name, input, .. } => {
            Some(format!("{}tool{}: {}({})", TOOL, RESET, tool_name, input))
        }
        AgentEvent::ToolExecEnd { output, is_error, .. } => {
            let label = if *is_error { "Tool error" } else { "Tool response" };
            Some(format!("{}debug{}: {}: {}", DEBUG, RESET, label, output))
        }
        // Fatal; the caller reports it when the run ends
        AgentEvent::Error { .. } => None,
        AgentEvent::TurnStart { .. } | AgentEvent::TurnEnd { .. } => None,
    }
}

/// Writes rendered events to stdout.
pub struct TerminalTranscript;

impl EventSink for TerminalTranscript {
    fn emit(&self, event: &AgentEvent) {
        if let Some(line) = render(event) {
            println!("{}", line);
        }
    }
}
