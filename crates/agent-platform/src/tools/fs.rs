use std::io::ErrorKind;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use agent_core::tools::{parse_input, Tool};
use agent_types::{
    ToolError,
    tool::{InputSchema, ToolDefinition},
};

use super::{filtered_walk, relative, walk_root, FilterOptions};

// ─── read_file ───────────────────────────────────────────────

pub struct ReadFileTool {
    definition: ToolDefinition,
}

#[derive(Deserialize)]
struct ReadFileInput {
    path: String,
}

impl ReadFileTool {
    pub fn new() -> Self {
        Self {
            definition: ToolDefinition {
                name: "read_file".to_string(),
                description: "Read the contents of a file at a relative path. \
                              Use it to look inside a file; it does not work on directories."
                    .to_string(),
                input_schema: InputSchema::object().property(
                    "path",
                    "string",
                    "Relative path of a file in the working directory.",
                    true,
                ),
            },
        }
    }
}

impl Default for ReadFileTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl Tool for ReadFileTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn call(&self, input: Value) -> Result<String, ToolError> {
        let input: ReadFileInput = parse_input(input)?;
        let bytes = tokio::fs::read(&input.path)
            .await
            .map_err(|e| ToolError::fs(&input.path, e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

// ─── list_files ──────────────────────────────────────────────

pub struct ListFilesTool {
    definition: ToolDefinition,
}

#[derive(Deserialize)]
struct ListFilesInput {
    #[serde(default)]
    path: Option<String>,
    #[serde(flatten)]
    options: FilterOptions,
}

impl ListFilesTool {
    pub fn new() -> Self {
        let schema = InputSchema::object().property(
            "path",
            "string",
            "Optional relative path to list from. Defaults to the current directory.",
            false,
        );
        Self {
            definition: ToolDefinition {
                name: "list_files".to_string(),
                description: "List files and directories recursively under a path \
                              (the current directory when omitted). Directories end with '/'. \
                              The .git directory, hidden entries and common dependency or build \
                              directories such as node_modules are left out unless the \
                              include_git, include_hidden and exclude options say otherwise."
                    .to_string(),
                input_schema: FilterOptions::schema(schema, "the listing"),
            },
        }
    }
}

impl Default for ListFilesTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl Tool for ListFilesTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn call(&self, input: Value) -> Result<String, ToolError> {
        let input: ListFilesInput = parse_input(input)?;
        let root_str = walk_root(input.path.as_deref());
        let root = Path::new(root_str);
        let filter = input.options.into_filter();

        let mut files = Vec::new();
        for entry in filtered_walk(root, &filter) {
            let entry = entry.map_err(|e| ToolError::fs(root_str, e))?;
            if entry.depth() == 0 {
                continue;
            }
            let rel = relative(root, &entry).to_string_lossy().into_owned();
            if entry.file_type().is_dir() {
                files.push(format!("{}/", rel));
            } else {
                files.push(rel);
            }
        }

        log::debug!("list_files {}: {} entries", root_str, files.len());
        Ok(serde_json::to_string(&files)?)
    }
}

// ─── edit_file ───────────────────────────────────────────────

pub struct EditFileTool {
    definition: ToolDefinition,
}

#[derive(Deserialize)]
struct EditFileInput {
    path: String,
    #[serde(default)]
    old_str: String,
    #[serde(default)]
    new_str: String,
}

impl EditFileTool {
    pub fn new() -> Self {
        Self {
            definition: ToolDefinition {
                name: "edit_file".to_string(),
                description: "Edit a text file by replacing every occurrence of 'old_str' with \
                              'new_str'. 'old_str' and 'new_str' must differ. If the file does \
                              not exist and 'old_str' is empty, the file is created with \
                              'new_str' as its content."
                    .to_string(),
                input_schema: InputSchema::object()
                    .property("path", "string", "Path of the file to edit.", true)
                    .property(
                        "old_str",
                        "string",
                        "Exact text to search for. Empty only when creating a new file.",
                        true,
                    )
                    .property("new_str", "string", "Replacement text.", true),
            },
        }
    }
}

impl Default for EditFileTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl Tool for EditFileTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn call(&self, input: Value) -> Result<String, ToolError> {
        let input: EditFileInput = parse_input(input)?;
        if input.path.is_empty() {
            return Err(ToolError::InvalidInput("path cannot be empty".to_string()));
        }
        if input.old_str == input.new_str {
            return Err(ToolError::NoOpEdit);
        }

        let content = match tokio::fs::read_to_string(&input.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound && input.old_str.is_empty() => {
                return create_file(&input.path, &input.new_str).await;
            }
            Err(e) => return Err(ToolError::fs(&input.path, e)),
        };

        if input.old_str.is_empty() {
            return Err(ToolError::InvalidInput(
                "old_str cannot be empty when editing an existing file".to_string(),
            ));
        }
        if !content.contains(&input.old_str) {
            return Err(ToolError::NoMatch);
        }

        let updated = content.replace(&input.old_str, &input.new_str);
        tokio::fs::write(&input.path, updated)
            .await
            .map_err(|e| ToolError::fs(&input.path, e))?;
        Ok("OK".to_string())
    }
}

async fn create_file(path: &str, content: &str) -> Result<String, ToolError> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ToolError::fs(parent.to_string_lossy(), format!("failed to create directory: {}", e)))?;
        }
    }
    tokio::fs::write(path, content)
        .await
        .map_err(|e| ToolError::fs(path, format!("failed to create file: {}", e)))?;

    log::info!("created {}", path);
    Ok(format!("Successfully created file {}", path))
}
