pub const DEFAULT_API_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

pub const DEFAULT_MODEL_FAMILY: &str = "gpt-4o";

pub fn default_max_rounds() -> u32 {
    10
}

pub fn default_stream_timeout() -> u64 {
    30
}
