use crate::error::Result;
use crate::models::Session;

/// Trait for session storage backends
pub trait SessionStore: Send + Sync {
    /// Most recent session that has not expired.
    fn find_recent_session(&self) -> Result<Option<Session>>;

    /// Most recent session regardless of age.
    fn find_latest_session(&self) -> Result<Option<Session>>;

    fn save_session(&self, session: &Session) -> Result<()>;

    fn clear_all_sessions(&self) -> Result<()>;
}
