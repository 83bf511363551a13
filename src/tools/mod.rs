pub mod builtins;
mod registry;

pub use registry::{format_tools_for_llm, LocalTool, ToolContext, ToolFuture, ToolHandler, ToolRegistry};

/// Tag carried by every tool this participant advertises to the model.
pub const COMMANDER_TAG: &str = "commander";
