use std::rc::Rc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use agent_core::{
    exec::{clamp_timeout, run_command, DEFAULT_TIMEOUT_SECS, MAX_TIMEOUT_SECS},
    ports::ShellPort,
    tools::{parse_input, Tool},
};
use agent_types::{
    ToolError,
    tool::{InputSchema, ToolDefinition},
};

/// Runs an arbitrary shell command with a bounded wall-clock time.
pub struct ExecuteTool {
    definition: ToolDefinition,
    shell: Rc<dyn ShellPort>,
}

#[derive(Deserialize)]
struct ExecuteInput {
    #[serde(default)]
    command: String,
    #[serde(default)]
    timeout: Option<i64>,
}

impl ExecuteTool {
    pub fn new(shell: Rc<dyn ShellPort>) -> Self {
        Self {
            definition: ToolDefinition {
                name: "execute".to_string(),
                description: format!(
                    "Execute a shell command (bash on Unix-like systems, cmd on Windows) and \
                     return its stdout, stderr and exit code as JSON. The timeout defaults to \
                     {} seconds and is capped at {} seconds.",
                    DEFAULT_TIMEOUT_SECS, MAX_TIMEOUT_SECS
                ),
                input_schema: InputSchema::object()
                    .property("command", "string", "The shell command to execute.", true)
                    .property(
                        "timeout",
                        "integer",
                        &format!(
                            "Optional timeout in seconds. Default {}, maximum {}.",
                            DEFAULT_TIMEOUT_SECS, MAX_TIMEOUT_SECS
                        ),
                        false,
                    ),
            },
            shell,
        }
    }
}

#[async_trait(?Send)]
impl Tool for ExecuteTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn call(&self, input: Value) -> Result<String, ToolError> {
        let input: ExecuteInput = parse_input(input)?;
        let timeout = clamp_timeout(input.timeout);
        log::info!("execute ({}s): {}", timeout, input.command);
        run_command(self.shell.as_ref(), &input.command, timeout).await
    }
}
