use std::path::Path;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use agent_core::tools::{parse_input, Tool};
use agent_types::{
    ToolError,
    tool::{InputSchema, ToolDefinition},
};

use super::{filtered_walk, relative, walk_root, FilterOptions};

pub const NO_MATCHES: &str = "No matches found.";

/// Regex search over file contents.
pub struct GrepTool {
    definition: ToolDefinition,
}

#[derive(Deserialize)]
struct GrepInput {
    #[serde(default)]
    pattern: String,
    #[serde(default)]
    path: Option<String>,
    #[serde(flatten)]
    options: FilterOptions,
}

/// One matching line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrepMatch {
    pub file: String,
    /// 1-based
    pub line: usize,
    pub content: String,
}

impl GrepTool {
    pub fn new() -> Self {
        let schema = InputSchema::object()
            .property(
                "pattern",
                "string",
                "Regular expression to search for.",
                true,
            )
            .property(
                "path",
                "string",
                "Optional relative path to search in. Defaults to the current directory.",
                false,
            );
        Self {
            definition: ToolDefinition {
                name: "grep".to_string(),
                description: "Search files for lines matching a regular expression. Returns the \
                              file, line number and content of every match. The .git directory, \
                              hidden entries and common dependency or build directories are \
                              skipped unless include_git, include_hidden and exclude say otherwise."
                    .to_string(),
                input_schema: FilterOptions::schema(schema, "the search"),
            },
        }
    }
}

impl Default for GrepTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl Tool for GrepTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn call(&self, input: Value) -> Result<String, ToolError> {
        let input: GrepInput = parse_input(input)?;
        if input.pattern.is_empty() {
            return Err(ToolError::EmptyPattern);
        }
        let regex = Regex::new(&input.pattern).map_err(|e| ToolError::InvalidPattern(e.to_string()))?;

        let root_str = walk_root(input.path.as_deref());
        let root = Path::new(root_str);
        tokio::fs::metadata(root)
            .await
            .map_err(|e| ToolError::fs(root_str, e))?;
        let filter = input.options.into_filter();

        let mut matches = Vec::new();
        // Entries that cannot be walked or read are skipped
        for entry in filtered_walk(root, &filter).filter_map(|e| e.ok()) {
            if entry.depth() == 0 || entry.file_type().is_dir() {
                continue;
            }
            let Ok(data) = tokio::fs::read(entry.path()).await else {
                continue;
            };
            // Binary
            if data.first() == Some(&0) {
                continue;
            }

            let file = relative(root, &entry).to_string_lossy().into_owned();
            let text = String::from_utf8_lossy(&data);
            for (i, line) in text.lines().enumerate() {
                if regex.is_match(line) {
                    matches.push(GrepMatch {
                        file: file.clone(),
                        line: i + 1,
                        content: line.to_string(),
                    });
                }
            }
        }

        log::debug!("grep {:?} in {}: {} matches", input.pattern, root_str, matches.len());
        if matches.is_empty() {
            return Ok(NO_MATCHES.to_string());
        }
        Ok(serde_json::to_string_pretty(&matches)?)
    }
}
