pub mod shell;
pub mod tools;
pub mod llm;

#[cfg(test)]
mod tests;

pub use shell::ProcessShell;
pub use tools::builtin_tools;
