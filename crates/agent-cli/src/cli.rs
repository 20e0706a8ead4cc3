//! Command-line arguments and their mapping onto `AgentConfig`.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use agent_types::{
    AgentError, Result,
    config::{AgentConfig, LlmConfig, LlmProvider},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    /// Anthropic Messages API
    Anthropic,
    /// Any OpenAI-compatible chat completions endpoint
    Openai,
}

impl From<ProviderArg> for LlmProvider {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Anthropic => LlmProvider::Anthropic,
            ProviderArg::Openai => LlmProvider::OpenAI,
        }
    }
}

/// CLI arguments for the agent
#[derive(Parser, Debug)]
#[command(name = "agent", version)]
#[command(about = "Chat with a language model that can read, search and edit files and run commands")]
pub struct Cli {
    /// JSON file declaring additional command-backed tools
    #[arg(long, value_name = "PATH", default_value = "tools_config.json")]
    pub tools_config: PathBuf,

    /// Model backend
    #[arg(long, value_enum, default_value_t = ProviderArg::Anthropic)]
    pub provider: ProviderArg,

    /// Model name (defaults to the provider's default model)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Maximum tokens per model response
    #[arg(long, default_value_t = 1024)]
    pub max_tokens: u32,

    /// Override the provider's API base URL
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// API key (defaults to ANTHROPIC_API_KEY or OPENAI_API_KEY)
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// System prompt sent with every request
    #[arg(long, value_name = "PROMPT")]
    pub system: Option<String>,

    /// Print tool responses to the terminal (also enabled by DEBUG=1)
    #[arg(long)]
    pub debug: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Build the agent configuration. `env` looks up environment variables;
    /// a missing API key is fatal.
    pub fn to_config(&self, env: impl Fn(&str) -> Option<String>) -> Result<AgentConfig> {
        let provider = LlmProvider::from(self.provider);

        let api_key = self
            .api_key
            .clone()
            .or_else(|| env(provider.api_key_env()))
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                AgentError::Config(format!(
                    "no API key for {}: set {} or pass --api-key",
                    provider.label(),
                    provider.api_key_env()
                ))
            })?;

        let debug = self.debug || env("DEBUG").as_deref() == Some("1");

        Ok(AgentConfig {
            llm: LlmConfig {
                provider,
                model: self
                    .model
                    .clone()
                    .unwrap_or_else(|| provider.default_model().to_string()),
                api_key,
                api_base: self.api_base.clone(),
                max_tokens: self.max_tokens,
            },
            system_prompt: self.system.clone(),
            debug,
        })
    }

    /// Log level from `-v`; without it `RUST_LOG` applies, else `warn`.
    pub fn log_level(&self) -> Option<&'static str> {
        match self.verbose {
            0 => None,
            1 => Some("info"),
            2 => Some("debug"),
            _ => Some("trace"),
        }
    }
}
