use serde::{Deserialize, Serialize};

/// A segment of a rendered response. Only markdown is replayed to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ResponseTurnPart {
    Markdown(String),
    Progress(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "turn", rename_all = "snake_case")]
pub enum HistoryTurn {
    Request { prompt: String },
    Response { parts: Vec<ResponseTurnPart> },
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Session {
    pub session_id: String,
    pub last_updated: chrono::DateTime<chrono::Local>,
    pub turns: Vec<HistoryTurn>,
}
