pub mod conversation;
mod surface;

pub use conversation::{build_conversation, DEFAULT_SYSTEM_PROMPT};
pub(crate) use surface::record_markdown;
pub use surface::{BufferSurface, ChatSurface};

/// A single request routed to the participant.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub prompt: String,
}

impl ChatRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}
