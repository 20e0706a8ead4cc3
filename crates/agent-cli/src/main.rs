//! Agent CLI — composition root.
//!
//! Wires the native adapters (process shell, filesystem tools, HTTP model
//! client, stdin, terminal transcript) into the agent runtime.

mod cli;
mod input;
mod transcript;


use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use agent_core::dynamic::{load_dynamic_tools, register_dynamic_tools};
use agent_core::event_bus::EventBus;
use agent_core::ports::ShellPort;
use agent_core::{AgentRuntime, ToolRegistry};
use agent_platform::llm::create_provider;
use agent_platform::{builtin_tools, ProcessShell};
use agent_types::Result;

use cli::Cli;
use input::StdinInput;
use transcript::TerminalTranscript;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let filter = match cli.log_level() {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.to_config(|name| std::env::var(name).ok())?;
    log::info!(
        "starting agent with {} model {}",
        config.llm.provider.label(),
        config.llm.model
    );
    if config.debug {
        println!("Debug mode enabled. Tool responses will be printed to the terminal.");
    }

    // === Tools ===
    let shell: Rc<dyn ShellPort> = Rc::new(ProcessShell::new());
    let mut tools = ToolRegistry::new();
    tools.register_all(builtin_tools(shell.clone()))?;

    match load_dynamic_tools(&cli.tools_config, shell) {
        Ok(dynamic) => {
            let count = register_dynamic_tools(&mut tools, dynamic);
            println!("Loaded {} dynamic tools from {}", count, cli.tools_config.display());
        }
        Err(e) => println!("Warning: Failed to load dynamic tools: {}", e),
    }

    // === Runtime ===
    let llm = create_provider(config.llm.clone())?;
    let event_bus = EventBus::new();
    event_bus.subscribe(Rc::new(TerminalTranscript));

    println!("Chat with {} (use 'ctrl-c' to quit)", config.llm.model);
    let mut runtime = AgentRuntime::new(config, tools, event_bus);
    let mut input = StdinInput::new();
    runtime.run(&mut input, llm.as_ref()).await
}
