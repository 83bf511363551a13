use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommanderError {
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("No chat model available for family '{family}': {reason}")]
    ModelUnavailable { family: String, reason: String },

    #[error("Tool error: {0}")]
    ToolError(String),

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Settings error: {0}")]
    SettingsError(String),

    #[error("Invalid conversation: {0}")]
    InvalidConversation(String),

    #[error("Tool calling did not finish within {max_rounds} rounds")]
    RoundLimitExceeded { max_rounds: u32 },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Request timeout")]
    Timeout,

    #[error("Request cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for CommanderError {
    fn from(err: anyhow::Error) -> Self {
        CommanderError::ConfigError(format!("{:#}", err))
    }
}

impl From<String> for CommanderError {
    fn from(msg: String) -> Self {
        CommanderError::Other(msg)
    }
}

impl From<&str> for CommanderError {
    fn from(msg: &str) -> Self {
        CommanderError::Other(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CommanderError>;
