mod api;
mod defaults;
mod model;
mod orchestrator;
mod validation;

use crate::chat::DEFAULT_SYSTEM_PROMPT;
use crate::cli::Args;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub use api::ApiConfig;
pub use defaults::{default_max_rounds, default_stream_timeout, DEFAULT_API_ENDPOINT, DEFAULT_MODEL_FAMILY};
pub use model::ModelConfig;
pub use orchestrator::{OrchestratorConfig, SettingsConfig};
pub use validation::{expand_with, normalize_endpoint};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub verbose: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_endpoint: String,
    pub model_family: String,
    pub model_id: Option<String>,
    pub system_prompt: String,
    pub stream_timeout: u64,
    pub verbose: bool,
    pub max_rounds: u32,
    pub settings_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            model_family: DEFAULT_MODEL_FAMILY.to_string(),
            model_id: None,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            stream_timeout: default_stream_timeout(),
            verbose: false,
            max_rounds: default_max_rounds(),
            settings_path: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self> {
        let file_config = FileConfig::load()?;
        Ok(Self::resolve(args, &file_config, |name| env::var(name).ok()))
    }

    /// Precedence: CLI args > environment > config file > defaults.
    pub fn resolve(args: &Args, file: &FileConfig, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = lookup("OPENROUTER_API_KEY").filter(|k| !k.is_empty());

        let api_endpoint = args
            .api_endpoint
            .clone()
            .or_else(|| lookup("COMMANDER_API_ENDPOINT"))
            .or_else(|| file.api.endpoint.clone())
            .map(|endpoint| normalize_endpoint(&endpoint))
            .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string());

        let model_family = args
            .model_family
            .clone()
            .or_else(|| lookup("COMMANDER_MODEL_FAMILY"))
            .or_else(|| file.model.family.clone())
            .unwrap_or_else(|| DEFAULT_MODEL_FAMILY.to_string());

        let model_id = lookup("COMMANDER_MODEL").or_else(|| file.model.id.clone());

        let system_prompt = lookup("COMMANDER_SYSTEM_PROMPT")
            .or_else(|| file.model.system_prompt.clone())
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

        let stream_timeout = lookup("COMMANDER_STREAM_TIMEOUT")
            .and_then(|s| s.parse::<u64>().ok())
            .or(file.api.stream_timeout)
            .unwrap_or_else(default_stream_timeout);

        let verbose = args.verbose
            || lookup("COMMANDER_VERBOSE")
                .map(|v| parse_flag(&v))
                .or(file.session.verbose)
                .unwrap_or(false);

        let max_rounds = args
            .max_rounds
            .or_else(|| lookup("COMMANDER_MAX_ROUNDS").and_then(|s| s.parse::<u32>().ok()))
            .unwrap_or(file.orchestrator.max_rounds);

        let settings_path = args.settings_file.clone().or_else(|| {
            lookup("COMMANDER_SETTINGS_FILE")
                .or_else(|| file.settings.path.clone())
                .map(|p| PathBuf::from(expand_with(&p, &lookup)))
        });

        Config {
            api_key,
            api_endpoint,
            model_family,
            model_id,
            system_prompt,
            stream_timeout,
            verbose,
            max_rounds,
            settings_path,
        }
    }
}

impl FileConfig {
    pub fn load() -> Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(FileConfig::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );

        let config = if is_yaml {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))?
        } else {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))?
        };

        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".commander.yaml"),
            PathBuf::from(".commander.yml"),
            PathBuf::from(".commander.json"),
        ];

        if let Some(home_dir) = dirs::home_dir() {
            let config_dir = home_dir.join(".config").join("commander");
            paths.push(config_dir.join("commander.yaml"));
            paths.push(config_dir.join("commander.yml"));
            paths.push(config_dir.join("commander.json"));
        }

        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_without_any_source() {
        let config = Config::resolve(&Args::default(), &FileConfig::default(), env_from(&[]));
        assert_eq!(config.api_key, None);
        assert_eq!(config.api_endpoint, DEFAULT_API_ENDPOINT);
        assert_eq!(config.model_family, "gpt-4o");
        assert_eq!(config.max_rounds, 10);
        assert_eq!(config.stream_timeout, 30);
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
        assert!(!config.verbose);
        assert!(config.settings_path.is_none());
    }

    #[test]
    fn test_precedence_args_env_file() {
        let file: FileConfig = serde_yaml::from_str(
            "api:\n  endpoint: http://file-host/v1\n  stream_timeout: 5\nmodel:\n  family: file-family\norchestrator:\n  max_rounds: 3\n",
        )
        .unwrap();
        let env = env_from(&[
            ("COMMANDER_API_ENDPOINT", "http://env-host/v1"),
            ("COMMANDER_MODEL_FAMILY", "env-family"),
            ("OPENROUTER_API_KEY", "sk-test"),
        ]);
        let args = Args {
            max_rounds: Some(7),
            ..Args::default()
        };

        let config = Config::resolve(&args, &file, env);
        assert_eq!(config.api_endpoint, "http://env-host/v1/chat/completions");
        assert_eq!(config.model_family, "env-family");
        assert_eq!(config.max_rounds, 7);
        assert_eq!(config.stream_timeout, 5);
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_settings_path_expands_env() {
        let file: FileConfig =
            serde_json::from_str(r#"{"settings": {"path": "${HOME}/settings.json"}}"#).unwrap();
        let config = Config::resolve(&Args::default(), &file, env_from(&[("HOME", "/home/ada")]));
        assert_eq!(
            config.settings_path,
            Some(PathBuf::from("/home/ada/settings.json"))
        );
    }

    #[test]
    fn test_verbose_flag_from_env() {
        let config = Config::resolve(
            &Args::default(),
            &FileConfig::default(),
            env_from(&[("COMMANDER_VERBOSE", "YES")]),
        );
        assert!(config.verbose);
    }

    #[test]
    fn test_load_from_yaml_and_bad_json() {
        let temp_dir = TempDir::new().unwrap();
        let yaml = temp_dir.path().join("commander.yaml");
        fs::write(&yaml, "model:\n  system_prompt: Be brief.\n").unwrap();
        let config = FileConfig::load_from(&yaml).unwrap();
        assert_eq!(config.model.system_prompt.as_deref(), Some("Be brief."));
        assert_eq!(config.orchestrator.max_rounds, 10);

        let json = temp_dir.path().join("commander.json");
        fs::write(&json, "{ not json").unwrap();
        let err = FileConfig::load_from(&json).unwrap_err();
        assert!(err.to_string().contains("Failed to parse JSON config file"));
    }
}
