use serde::{Deserialize, Serialize};

/// Top-level agent configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub llm: LlmConfig,
    pub system_prompt: Option<String>,
    /// Echo tool results to the operator transcript
    pub debug: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub api_key: String,
    pub api_base: Option<String>,
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Anthropic,
            model: LlmProvider::Anthropic.default_model().to_string(),
            api_key: String::new(),
            api_base: None,
            max_tokens: 1024,
        }
    }
}

impl LlmConfig {
    pub fn base_url(&self) -> String {
        self.api_base
            .clone()
            .unwrap_or_else(|| self.provider.default_base_url().to_string())
            .trim_end_matches('/')
            .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    Anthropic,
    OpenAI,
}

impl LlmProvider {
    pub fn default_base_url(&self) -> &str {
        match self {
            LlmProvider::Anthropic => "https://api.anthropic.com",
            LlmProvider::OpenAI => "https://api.openai.com",
        }
    }

    pub fn default_model(&self) -> &str {
        match self {
            LlmProvider::Anthropic => "claude-3-7-sonnet-latest",
            LlmProvider::OpenAI => "gpt-4o",
        }
    }

    /// Environment variable holding the credential
    pub fn api_key_env(&self) -> &str {
        match self {
            LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
            LlmProvider::OpenAI => "OPENAI_API_KEY",
        }
    }

    pub fn label(&self) -> &str {
        match self {
            LlmProvider::Anthropic => "Anthropic",
            LlmProvider::OpenAI => "OpenAI",
        }
    }
}

// ─── Dynamic tool configuration ─────────────────────────────

/// One entry of a tools document:
/// `{"tools": [{"name", "description", "command", "timeout", "parameters": [...]}]}`
///
/// Missing fields take their zero values so a sloppy entry still loads;
/// a blank command fails when the tool is called.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamicTool {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Shell command with `{{param}}` placeholders
    #[serde(default)]
    pub command: String,
    /// Seconds; zero or negative selects the default
    #[serde(default)]
    pub timeout: i64,
    #[serde(default)]
    pub parameters: Vec<ToolParameter>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    /// Empty means no default
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default: String,
}
