//! Which filesystem entries a traversal visits and reports.

use std::path::{Component, Path};

/// Directory names excluded unless the caller supplies its own list.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "node_modules",
    "vendor",
    "dist",
    "build",
    ".venv",
    "__pycache__",
];

/// Filter over paths relative to the traversal root.
///
/// Decisions depend only on the path and the three settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathFilter {
    pub include_git: bool,
    pub include_hidden: bool,
    pub excludes: Vec<String>,
}

impl Default for PathFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl PathFilter {
    pub fn new() -> Self {
        Self {
            include_git: false,
            include_hidden: false,
            excludes: DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Filter built from tool options. A supplied exclude list replaces the
    /// defaults, so `Some(vec![])` turns all name exclusions off.
    pub fn from_options(include_git: bool, include_hidden: bool, exclude: Option<Vec<String>>) -> Self {
        let mut filter = Self::new();
        filter.include_git = include_git;
        filter.include_hidden = include_hidden;
        if let Some(exclude) = exclude {
            filter.excludes = exclude;
        }
        filter
    }

    /// Whether an entry belongs in the results.
    pub fn should_include(&self, path: &Path, _is_dir: bool) -> bool {
        self.admits(path)
    }

    /// Whether the traversal must not descend into this directory.
    pub fn should_skip_dir(&self, path: &Path) -> bool {
        !self.admits(path)
    }

    fn admits(&self, path: &Path) -> bool {
        let segments: Vec<String> = path
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        // The traversal root itself
        let Some(base) = segments.last() else {
            return true;
        };

        if !self.include_git && segments.iter().any(|s| s == ".git") {
            return false;
        }

        if !self.include_hidden && base.starts_with('.') {
            return false;
        }

        !self
            .excludes
            .iter()
            .any(|exclude| segments.iter().any(|s| s == exclude))
    }
}
