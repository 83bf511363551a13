use super::SettingsStore;
use crate::error::{CommanderError, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Settings persisted as a flat JSON object, e.g. `{"editor.fontSize": 14}`.
pub struct FileSettingsStore {
    path: PathBuf,
    values: Mutex<Map<String, Value>>,
}

impl FileSettingsStore {
    /// Opens the store, treating a missing file as empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                Map::new()
            } else {
                match serde_json::from_str::<Value>(&contents)? {
                    Value::Object(map) => map,
                    _ => {
                        return Err(CommanderError::SettingsError(format!(
                            "{} does not contain a JSON object",
                            path.display()
                        )))
                    }
                }
            }
        } else {
            Map::new()
        };

        tracing::debug!(path = %path.display(), keys = values.len(), "Loaded settings file");

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// `~/.config/commander/settings.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("commander").join("settings.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

fn poisoned() -> CommanderError {
    CommanderError::SettingsError("settings lock poisoned".to_string())
}

impl SettingsStore for FileSettingsStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let values = self.values.lock().map_err(|_| poisoned())?;
        Ok(values.get(key).cloned())
    }

    fn update(&self, key: &str, value: Value) -> Result<()> {
        let mut values = self.values.lock().map_err(|_| poisoned())?;
        let mut updated = values.clone();
        updated.insert(key.to_string(), value);
        // Only a persisted update becomes visible.
        self.persist(&updated)?;
        *values = updated;
        tracing::debug!(key, path = %self.path.display(), "Updated setting");
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let values = self.values.lock().map_err(|_| poisoned())?;
        Ok(values.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_update_persists_to_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("settings.json");

        let store = FileSettingsStore::open(&path).unwrap();
        store.update("editor.fontSize", json!(16)).unwrap();

        let reopened = FileSettingsStore::open(&path).unwrap();
        assert_eq!(reopened.get("editor.fontSize").unwrap(), Some(json!(16)));
    }

    #[test]
    fn test_failed_write_leaves_value_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let parent = temp_dir.path().join("sub");
        let path = parent.join("settings.json");
        let store = FileSettingsStore::open(&path).unwrap();

        // A plain file where the directory should be makes every write fail.
        fs::write(&parent, "not a directory").unwrap();

        assert!(store.update("editor.fontSize", json!(40)).is_err());
        assert_eq!(store.get("editor.fontSize").unwrap(), None);
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_open_rejects_non_object() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, "[1, 2]").unwrap();

        assert!(FileSettingsStore::open(&path).is_err());
    }

    #[test]
    fn test_open_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, "").unwrap();

        let store = FileSettingsStore::open(&path).unwrap();
        assert!(store.keys().unwrap().is_empty());
    }
}
