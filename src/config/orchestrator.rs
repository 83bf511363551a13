use serde::{Deserialize, Serialize};

use crate::config::defaults::default_max_rounds;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrchestratorConfig {
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_rounds: default_max_rounds(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SettingsConfig {
    /// Settings file; `${VAR}` references are expanded.
    #[serde(default)]
    pub path: Option<String>,
}
