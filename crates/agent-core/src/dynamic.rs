//! Tools declared in a JSON configuration file and backed by shell commands.
//!
//! Each declaration becomes a [`CommandTemplateTool`]: call parameters are
//! bound to the declared parameters, substituted into the command template
//! and the result runs through the same shell machinery as `execute`.
//!
//! Parameter values are spliced into the command line verbatim. No quoting
//! or escaping is applied; whatever the model sends reaches the shell.

use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};

use agent_types::{
    AgentError, Result, ToolError,
    config::{DynamicTool, ToolParameter},
    tool::{InputSchema, ToolDefinition},
};
use crate::exec::{clamp_timeout, run_command};
use crate::ports::ShellPort;
use crate::tools::{Tool, ToolRegistry};

// ─── Command templates ───────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A command line with `{{name}}` placeholders (`{{.name}}` and inner
/// whitespace are accepted too).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    segments: Vec<Segment>,
}

impl CommandTemplate {
    pub fn parse(source: &str) -> std::result::Result<Self, ToolError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(open) = rest.find("{{") {
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let after_open = &rest[open + 2..];
            let close = after_open.find("}}").ok_or_else(|| {
                ToolError::Template(format!("unclosed placeholder at byte {}", offset + open))
            })?;

            let expr = after_open[..close].trim();
            let name = expr.strip_prefix('.').unwrap_or(expr).trim();
            if !is_param_name(name) {
                return Err(ToolError::Template(format!(
                    "unsupported placeholder `{{{{{}}}}}`",
                    expr
                )));
            }
            segments.push(Segment::Param(name.to_string()));

            let consumed = open + 2 + close + 2;
            offset += consumed;
            rest = &rest[consumed..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self { segments })
    }

    /// Parameter names referenced by the template, in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Substitute bound values. Unbound placeholders render as empty text.
    pub fn render(&self, values: &HashMap<String, String>) -> String {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Literal(text) => text.as_str(),
                Segment::Param(name) => values.get(name).map(String::as_str).unwrap_or(""),
            })
            .collect()
    }
}

fn is_param_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Parse a declaration's template and check that every placeholder names a
/// declared parameter.
fn compile_template(decl: &DynamicTool) -> std::result::Result<CommandTemplate, ToolError> {
    let template = CommandTemplate::parse(&decl.command)?;
    if let Some(unknown) = template
        .placeholders()
        .find(|name| !decl.parameters.iter().any(|p| p.name == *name))
    {
        return Err(ToolError::Template(format!(
            "placeholder `{}` is not a declared parameter",
            unknown
        )));
    }
    Ok(template)
}

// ─── Template-command tool ───────────────────────────────────

/// Tool synthesized from a configuration declaration.
pub struct CommandTemplateTool {
    definition: ToolDefinition,
    parameters: Vec<ToolParameter>,
    /// A broken template is kept so every call reports it
    template: std::result::Result<CommandTemplate, ToolError>,
    timeout_secs: u64,
    shell: Rc<dyn ShellPort>,
}

impl CommandTemplateTool {
    pub fn new(mut decl: DynamicTool, shell: Rc<dyn ShellPort>) -> Self {
        let template = compile_template(&decl);
        if let Err(e) = &template {
            log::warn!("dynamic tool {}: {}; calls will fail", decl.name, e);
        }

        let tool_name = decl.name.as_str();
        decl.parameters.retain(|p| {
            let named = !p.name.trim().is_empty();
            if !named {
                log::warn!("dynamic tool {}: dropping parameter without a name", tool_name);
            }
            named
        });

        // Every parameter is a string: dynamic tools have no richer schema
        let input_schema = decl.parameters.iter().fold(InputSchema::object(), |schema, p| {
            schema.property(&p.name, "string", &p.description, p.required && p.default.is_empty())
        });

        Self {
            definition: ToolDefinition {
                name: decl.name,
                description: decl.description,
                input_schema,
            },
            parameters: decl.parameters,
            template,
            timeout_secs: clamp_timeout(Some(decl.timeout)),
            shell,
        }
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// Resolve each declared parameter: supplied value, else non-empty
    /// default, else an error when required, else left unbound.
    fn bind(&self, params: &Map<String, Value>) -> std::result::Result<HashMap<String, String>, ToolError> {
        let mut values = HashMap::new();
        for param in &self.parameters {
            match params.get(&param.name).filter(|v| !v.is_null()) {
                Some(value) => {
                    values.insert(param.name.clone(), value_to_text(value));
                }
                None if !param.default.is_empty() => {
                    values.insert(param.name.clone(), param.default.clone());
                }
                None if param.required => {
                    return Err(ToolError::MissingParameter(param.name.clone()));
                }
                None => {}
            }
        }
        Ok(values)
    }

    /// The command line a call would run, without running it.
    pub fn render_command(&self, input: Value) -> std::result::Result<String, ToolError> {
        let params = match input {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(ToolError::InvalidInput(format!(
                    "expected an object of parameters, got {}",
                    other
                )))
            }
        };
        let template = self.template.as_ref().map_err(|e| e.clone())?;
        let values = self.bind(&params)?;
        Ok(template.render(&values))
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait(?Send)]
impl Tool for CommandTemplateTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn call(&self, input: Value) -> std::result::Result<String, ToolError> {
        let command = self.render_command(input)?;
        run_command(self.shell.as_ref(), &command, self.timeout_secs).await
    }
}

// ─── Loading ─────────────────────────────────────────────────

/// Tools document. Entries stay raw so each one is checked on its own.
#[derive(Deserialize)]
struct ToolsDocument {
    #[serde(default)]
    tools: Vec<Value>,
}

/// Build tools from a configuration document's text.
///
/// Only a document that is not valid JSON fails as a whole. A declaration
/// that does not fit the schema, or has no name, is skipped with a warning.
pub fn parse_dynamic_tools(json: &str, shell: Rc<dyn ShellPort>) -> Result<Vec<CommandTemplateTool>> {
    let document: ToolsDocument = serde_json::from_str(json)
        .map_err(|e| AgentError::Config(format!("failed to parse tools config: {}", e)))?;

    let mut tools = Vec::with_capacity(document.tools.len());
    for (index, entry) in document.tools.into_iter().enumerate() {
        let decl: DynamicTool = match serde_json::from_value(entry) {
            Ok(decl) => decl,
            Err(e) => {
                log::warn!("skipping dynamic tool #{}: {}", index, e);
                continue;
            }
        };
        if decl.name.trim().is_empty() {
            log::warn!("skipping dynamic tool #{} without a name", index);
            continue;
        }
        tools.push(CommandTemplateTool::new(decl, shell.clone()));
    }
    Ok(tools)
}

/// Read and build tools from a configuration file.
///
/// An unreadable or malformed file is an error for the caller to report;
/// it should not stop the agent.
pub fn load_dynamic_tools(path: &Path, shell: Rc<dyn ShellPort>) -> Result<Vec<CommandTemplateTool>> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        AgentError::Config(format!("failed to read tools config {}: {}", path.display(), e))
    })?;
    parse_dynamic_tools(&json, shell)
}

/// Register dynamic tools, skipping any whose name is already taken.
/// Returns the number registered.
pub fn register_dynamic_tools(registry: &mut ToolRegistry, tools: Vec<CommandTemplateTool>) -> usize {
    let mut registered = 0;
    for tool in tools {
        match registry.register(Box::new(tool)) {
            Ok(()) => registered += 1,
            Err(e) => log::warn!("skipping dynamic tool: {}", e),
        }
    }
    registered
}
