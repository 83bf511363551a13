use super::storage::SessionStore;
use crate::error::{CommanderError, Result};
use crate::models::Session;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

pub const SESSION_EXPIRY_MINUTES: i64 = 30;

/// Stores each session as `session-<id>.json` in one directory.
pub struct FilesystemSessionStore {
    dir: PathBuf,
}

impl FilesystemSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `~/.cache/commander`
    pub fn default_location() -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            CommanderError::SessionError("could not determine home directory".to_string())
        })?;
        Ok(Self::new(home.join(".cache").join("commander")))
    }

    fn is_session_file(path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == "json")
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("session-"))
    }

    /// Readable sessions, most recently updated first. Unreadable files are skipped.
    fn sessions_by_recency(&self) -> Result<Vec<(PathBuf, Session)>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut sessions: Vec<(PathBuf, Session)> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| Self::is_session_file(path))
            .filter_map(|path| {
                let content = fs::read_to_string(&path).ok()?;
                match serde_json::from_str::<Session>(&content) {
                    Ok(session) => Some((path, session)),
                    Err(e) => {
                        tracing::debug!(path = %path.display(), error = %e, "Skipping unreadable session file");
                        None
                    }
                }
            })
            .collect();

        sessions.sort_by(|a, b| b.1.last_updated.cmp(&a.1.last_updated));
        Ok(sessions)
    }
}

impl SessionStore for FilesystemSessionStore {
    fn find_recent_session(&self) -> Result<Option<Session>> {
        let now = Local::now();

        if let Some((path, session)) = self.sessions_by_recency()?.into_iter().next() {
            let age_minutes = now.signed_duration_since(session.last_updated).num_minutes();
            if age_minutes.abs() < SESSION_EXPIRY_MINUTES {
                return Ok(Some(session));
            }
            tracing::debug!(session = %session.session_id, age_minutes, "Removing expired session");
            let _ = fs::remove_file(path);
        }

        Ok(None)
    }

    fn find_latest_session(&self) -> Result<Option<Session>> {
        Ok(self
            .sessions_by_recency()?
            .into_iter()
            .next()
            .map(|(_, session)| session))
    }

    fn save_session(&self, session: &Session) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let session_file = self.dir.join(format!("session-{}.json", session.session_id));
        let content = serde_json::to_string_pretty(session)?;
        fs::write(session_file, content)?;
        Ok(())
    }

    fn clear_all_sessions(&self) -> Result<()> {
        if !self.dir.exists() {
            return Ok(());
        }
        for entry in fs::read_dir(&self.dir)?.filter_map(|e| e.ok()) {
            let path = entry.path();
            if Self::is_session_file(&path) {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}
