use chrono::Local;
use commander::models::{HistoryTurn, ResponseTurnPart, Session};
use commander::session::{FilesystemSessionStore, SessionStore};
use std::fs;
use tempfile::TempDir;

fn create_test_session(id: &str, age_minutes: i64) -> Session {
    Session {
        session_id: id.to_string(),
        last_updated: Local::now() - chrono::Duration::minutes(age_minutes),
        turns: vec![
            HistoryTurn::Request {
                prompt: "bigger font".to_string(),
            },
            HistoryTurn::Response {
                parts: vec![
                    ResponseTurnPart::Progress("Calling tool: updateSetting...".to_string()),
                    ResponseTurnPart::Markdown("Done.".to_string()),
                ],
            },
        ],
    }
}

#[test]
fn test_save_and_find_recent_session() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemSessionStore::new(temp_dir.path().join("commander"));

    let session = create_test_session("test-123", 0);
    store.save_session(&session).unwrap();

    let found = store.find_recent_session().unwrap().unwrap();
    assert_eq!(found.session_id, "test-123");
    assert_eq!(found.turns, session.turns);
}

#[test]
fn test_find_recent_session_expired() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemSessionStore::new(temp_dir.path());

    store.save_session(&create_test_session("expired-123", 60)).unwrap();

    assert!(store.find_latest_session().unwrap().is_some());
    assert!(store.find_recent_session().unwrap().is_none());
    // Expired sessions are removed once seen.
    assert!(store.find_latest_session().unwrap().is_none());
}

#[test]
fn test_most_recent_wins() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemSessionStore::new(temp_dir.path());

    store.save_session(&create_test_session("older", 10)).unwrap();
    store.save_session(&create_test_session("newer", 1)).unwrap();

    let found = store.find_recent_session().unwrap().unwrap();
    assert_eq!(found.session_id, "newer");
}

#[test]
fn test_unreadable_files_are_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemSessionStore::new(temp_dir.path());

    fs::write(temp_dir.path().join("session-broken.json"), "{ nope").unwrap();
    store.save_session(&create_test_session("ok", 0)).unwrap();

    let found = store.find_recent_session().unwrap().unwrap();
    assert_eq!(found.session_id, "ok");
}

#[test]
fn test_clear_all_sessions() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemSessionStore::new(temp_dir.path());
    let unrelated = temp_dir.path().join("notes.txt");
    fs::write(&unrelated, "keep me").unwrap();

    store.save_session(&create_test_session("s1", 0)).unwrap();
    store.save_session(&create_test_session("s2", 0)).unwrap();
    store.clear_all_sessions().unwrap();

    assert!(store.find_latest_session().unwrap().is_none());
    assert!(unrelated.exists());
}

#[test]
fn test_missing_directory_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemSessionStore::new(temp_dir.path().join("does-not-exist"));

    assert!(store.find_recent_session().unwrap().is_none());
    store.clear_all_sessions().unwrap();
}
