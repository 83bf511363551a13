mod catalog;
mod file;

pub use catalog::{builtin_catalog, SettingDefinition};
pub use file::FileSettingsStore;

use crate::error::{CommanderError, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Key/value configuration store. Updates apply at global (user) scope.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>>;

    fn update(&self, key: &str, value: Value) -> Result<()>;

    /// Keys with an explicitly stored value.
    fn keys(&self) -> Result<Vec<String>>;
}

#[derive(Default)]
pub struct MemorySettingsStore {
    values: RwLock<BTreeMap<String, Value>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<I, K>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            values: RwLock::new(values.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        }
    }
}

fn poisoned() -> CommanderError {
    CommanderError::SettingsError("settings lock poisoned".to_string())
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let values = self.values.read().map_err(|_| poisoned())?;
        Ok(values.get(key).cloned())
    }

    fn update(&self, key: &str, value: Value) -> Result<()> {
        let mut values = self.values.write().map_err(|_| poisoned())?;
        values.insert(key.to_string(), value);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let values = self.values.read().map_err(|_| poisoned())?;
        Ok(values.keys().cloned().collect())
    }
}
