use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ModelConfig {
    /// Family the chat model is selected by, e.g. `gpt-4o`.
    #[serde(default)]
    pub family: Option<String>,
    /// Explicit endpoint model id; defaults to `openai/<family>`.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub system_prompt: Option<String>,
}
