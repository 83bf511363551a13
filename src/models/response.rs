use serde::{Deserialize, Serialize};

/// A tool call as requested by the model. `parameters` is the raw, possibly malformed, argument string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallPart {
    pub name: String,
    pub call_id: String,
    pub parameters: String,
}

/// One fragment of a streamed model response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePart {
    Text(String),
    ToolCall(ToolCallPart),
}
