use thiserror::Error;

/// Errors that end an agent run or abort startup.
#[derive(Error, Debug, Clone)]
pub enum AgentError {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),
}

impl From<serde_json::Error> for AgentError {
    fn from(e: serde_json::Error) -> Self {
        AgentError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for AgentError {
    fn from(e: std::io::Error) -> Self {
        AgentError::Io(e.to_string())
    }
}

/// Failure of a single tool invocation.
///
/// These never end the conversation; the runtime hands the message back to
/// the model as an error-flagged tool result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("tool not found")]
    NotFound,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{path}: {message}")]
    Fs { path: String, message: String },

    #[error("old_str and new_str must be different")]
    NoOpEdit,

    #[error("old_str not found in file")]
    NoMatch,

    #[error("pattern cannot be empty")]
    EmptyPattern,

    #[error("invalid regular expression: {0}")]
    InvalidPattern(String),

    #[error("missing required parameter: {0}")]
    MissingParameter(String),

    #[error("invalid command template: {0}")]
    Template(String),

    #[error("command cannot be empty")]
    EmptyCommand,

    #[error("failed to execute command: {0}")]
    Launch(String),

    #[error("command timed out after {0} seconds")]
    Timeout(u64),
}

impl ToolError {
    pub fn fs(path: impl Into<String>, err: impl std::fmt::Display) -> Self {
        ToolError::Fs {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(e: serde_json::Error) -> Self {
        ToolError::InvalidInput(e.to_string())
    }
}
