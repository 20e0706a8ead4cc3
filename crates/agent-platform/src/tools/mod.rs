//! Built-in tools backed by the local filesystem and the process shell.
//!
//! File paths are taken as given, so relative paths resolve against the
//! agent's working directory. Traversing tools (`list_files`, `grep`) share
//! [`PathFilter`] and report paths relative to the traversal root.

mod execute;
mod fs;
mod search;

use std::path::Path;
use std::rc::Rc;

use serde::Deserialize;
use walkdir::{DirEntry, WalkDir};

use agent_core::{PathFilter, Tool, ports::ShellPort};
use agent_types::tool::InputSchema;

pub use execute::ExecuteTool;
pub use fs::{EditFileTool, ListFilesTool, ReadFileTool};
pub use search::{GrepMatch, GrepTool, NO_MATCHES};

/// The five native tools, in the order they are declared to the model.
pub fn builtin_tools(shell: Rc<dyn ShellPort>) -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(ReadFileTool::new()),
        Box::new(ListFilesTool::new()),
        Box::new(EditFileTool::new()),
        Box::new(GrepTool::new()),
        Box::new(ExecuteTool::new(shell)),
    ]
}

/// Traversal options accepted by `list_files` and `grep`.
#[derive(Debug, Default, Deserialize)]
struct FilterOptions {
    #[serde(default)]
    include_git: bool,
    #[serde(default)]
    include_hidden: bool,
    #[serde(default)]
    exclude: Option<Vec<String>>,
}

impl FilterOptions {
    fn into_filter(self) -> PathFilter {
        PathFilter::from_options(self.include_git, self.include_hidden, self.exclude)
    }

    /// Schema properties for the options, appended to a tool's schema.
    fn schema(schema: InputSchema, target: &str) -> InputSchema {
        schema
            .property(
                "include_git",
                "boolean",
                &format!("Include the .git directory in {}. Defaults to false.", target),
                false,
            )
            .property(
                "include_hidden",
                "boolean",
                &format!(
                    "Include hidden files and directories (names starting with '.') in {}. Defaults to false.",
                    target
                ),
                false,
            )
            .string_list(
                "exclude",
                "Directory or file names to leave out. Replaces the default list \
                 (node_modules, vendor, dist, build, .venv, __pycache__).",
            )
    }
}

/// Root of a traversal; a missing or empty path means the working directory.
fn walk_root(path: Option<&str>) -> &str {
    match path {
        Some(p) if !p.is_empty() => p,
        _ => ".",
    }
}

/// Path of `entry` relative to the traversal root.
fn relative<'a>(root: &Path, entry: &'a DirEntry) -> &'a Path {
    entry.path().strip_prefix(root).unwrap_or(entry.path())
}

/// Lexically ordered walk under `root` that never descends into directories
/// the filter rejects. The root itself is yielded first at depth 0.
fn filtered_walk<'a>(
    root: &'a Path,
    filter: &'a PathFilter,
) -> impl Iterator<Item = walkdir::Result<DirEntry>> + 'a {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| {
            entry.depth() == 0
                || filter.should_include(relative(root, entry), entry.file_type().is_dir())
        })
}
