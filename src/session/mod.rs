mod filesystem;
mod storage;

pub use filesystem::{FilesystemSessionStore, SESSION_EXPIRY_MINUTES};
pub use storage::SessionStore;

use crate::models::{HistoryTurn, ResponseTurnPart, Session};
use chrono::Local;
use uuid::Uuid;

pub const MAX_CONVERSATION_PAIRS: usize = 3; // Keep last 3 exchanges (6 turns)

/// Keep only the last N request/response exchanges.
pub fn trim_conversation_history(turns: &mut Vec<HistoryTurn>) {
    let keep_count = MAX_CONVERSATION_PAIRS * 2;
    if turns.len() > keep_count {
        turns.drain(..turns.len() - keep_count);
    }
    // Never start the replay halfway through an exchange.
    while matches!(turns.first(), Some(HistoryTurn::Response { .. })) {
        turns.remove(0);
    }
}

pub fn create_new_session() -> Session {
    Session {
        session_id: Uuid::new_v4().to_string(),
        last_updated: Local::now(),
        turns: vec![],
    }
}

/// Appends a finished exchange and bumps the timestamp.
pub fn record_exchange(session: &mut Session, prompt: &str, parts: Vec<ResponseTurnPart>) {
    session.turns.push(HistoryTurn::Request {
        prompt: prompt.to_string(),
    });
    session.turns.push(HistoryTurn::Response { parts });
    trim_conversation_history(&mut session.turns);
    session.last_updated = Local::now();
}
