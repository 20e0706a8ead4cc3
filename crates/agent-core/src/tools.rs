//! Tool trait and tool registry.
//!
//! Every tool, native or configuration-driven, is a `Tool`: given the raw
//! JSON input of a call it produces text or a `ToolError`. The registry owns
//! the tools for the lifetime of the process and turns every call into a
//! `ToolOutcome` the model can read, so no tool failure escapes dispatch.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use agent_types::{
    AgentError, Result, ToolError,
    message::ToolCall,
    tool::{ToolDefinition, ToolOutcome},
};

#[async_trait(?Send)]
pub trait Tool {
    fn definition(&self) -> &ToolDefinition;

    async fn call(&self, input: Value) -> std::result::Result<String, ToolError>;

    fn name(&self) -> &str {
        &self.definition().name
    }
}

/// Registry of available tools, in registration order
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
    by_name: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool. A name that is already taken is rejected and the earlier
    /// registration stays in place.
    pub fn register(&mut self, tool: Box<dyn Tool>) -> Result<()> {
        let name = tool.name().to_string();
        if self.by_name.contains_key(&name) {
            return Err(AgentError::DuplicateTool(name));
        }
        self.by_name.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    pub fn register_all(&mut self, tools: impl IntoIterator<Item = Box<dyn Tool>>) -> Result<()> {
        for tool in tools {
            self.register(tool)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.by_name.get(name).map(|&i| self.tools[i].as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Declarations sent to the model
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition().clone()).collect()
    }

    /// Look up `name` and run it with `input`.
    pub async fn dispatch(&self, name: &str, input: Value) -> std::result::Result<String, ToolError> {
        let tool = self.get(name).ok_or(ToolError::NotFound)?;
        tool.call(input).await
    }

    /// Dispatch a model tool call, folding any failure into an error result.
    pub async fn execute_call(&self, call: &ToolCall) -> ToolOutcome {
        log::info!("dispatching tool {}({})", call.name, call.input);
        match self.dispatch(&call.name, call.input.clone()).await {
            Ok(output) => ToolOutcome::success(&call.id, output),
            Err(e) => {
                log::debug!("tool {} failed: {}", call.name, e);
                ToolOutcome::error(&call.id, e.to_string())
            }
        }
    }
}

/// Deserialize a tool's raw input into its typed form.
pub fn parse_input<T: DeserializeOwned>(input: Value) -> std::result::Result<T, ToolError> {
    serde_json::from_value(input).map_err(ToolError::from)
}
