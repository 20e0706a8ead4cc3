pub mod ports;
pub mod path_filter;
pub mod exec;
pub mod tools;
pub mod dynamic;
pub mod event_bus;
pub mod runtime;


pub use path_filter::PathFilter;
pub use tools::{Tool, ToolRegistry};
pub use runtime::{AgentRuntime, AgentState};
