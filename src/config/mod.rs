// Generator configuration
//
// Settings live in ~/.clove/config.toml; every field is optional and falls
// back to its default. The API key normally comes from the environment.

use crate::agents::gemini::{DEFAULT_API_BASE, DEFAULT_PROBE_PROMPT};
use crate::agents::GenerationParams;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variables consulted for the API key, in order
pub const API_KEY_ENV_VARS: [&str; 2] = ["GOOGLE_API_KEY", "GEMINI_API_KEY"];

pub fn default_models() -> Vec<String> {
    vec![
        "gemini-2.0-flash".to_string(),
        "gemini-2.5-pro-preview-05-06".to_string(),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Candidate models, most preferred first
    pub models: Vec<String>,
    /// Deadline for the generation request
    pub timeout_secs: u64,
    /// Transport timeout for every HTTP request, probes included
    pub http_timeout_secs: u64,
    pub api_base_url: String,
    pub probe_prompt: String,
    pub generation: GenerationParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            models: default_models(),
            timeout_secs: 30,
            http_timeout_secs: 60,
            api_base_url: DEFAULT_API_BASE.to_string(),
            probe_prompt: DEFAULT_PROBE_PROMPT.to_string(),
            generation: GenerationParams::default(),
            api_key: None,
        }
    }
}

impl GeneratorConfig {
    /// Get the config file path (~/.clove/config.toml)
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".clove").join("config.toml"))
    }

    /// Load from the default location, defaults when the file is absent
    pub fn load() -> Result<Self> {
        let path =
            Self::get_config_path().ok_or_else(|| anyhow!("Could not determine home directory"))?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("[config] No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: GeneratorConfig = toml::from_str(&contents)
            .map_err(|e| anyhow!("Failed to parse config file '{}': {}", path.display(), e))?;

        log::info!("[config] Loaded {}", path.display());
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Resolves the API key: explicit value, then environment, then config file
    pub fn resolve_api_key(&self, explicit: Option<&str>) -> Option<String> {
        self.resolve_api_key_with(explicit, |name| std::env::var(name).ok())
    }

    pub fn resolve_api_key_with(
        &self,
        explicit: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Option<String> {
        explicit
            .map(str::to_string)
            .into_iter()
            .chain(API_KEY_ENV_VARS.iter().filter_map(|name| lookup(*name)))
            .chain(self.api_key.clone())
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
    }
}

/// Values given on the command line that replace file settings
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub models: Option<Vec<String>>,
    pub timeout_secs: Option<u64>,
    pub api_base_url: Option<String>,
}

/// Merge config values with command-line overrides
pub fn merge_config(file_config: &GeneratorConfig, overrides: &ConfigOverrides) -> GeneratorConfig {
    GeneratorConfig {
        models: overrides
            .models
            .clone()
            .filter(|models| !models.is_empty())
            .unwrap_or_else(|| file_config.models.clone()),
        timeout_secs: overrides.timeout_secs.unwrap_or(file_config.timeout_secs),
        api_base_url: overrides
            .api_base_url
            .clone()
            .unwrap_or_else(|| file_config.api_base_url.clone()),
        ..file_config.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.models, default_models());
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.generation.max_output_tokens, 8192);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = GeneratorConfig::load_from(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn test_load_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "models = [\"gemini-1.5-flash\"]\ntimeout_secs = 45\n\n[generation]\ntemperature = 0.2\n",
        )
        .unwrap();

        let config = GeneratorConfig::load_from(&path).unwrap();
        assert_eq!(config.models, vec!["gemini-1.5-flash"]);
        assert_eq!(config.timeout_secs, 45);
        assert!((config.generation.temperature - 0.2).abs() < 1e-6);
        assert_eq!(config.generation.top_k, 40);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE);
    }

    #[test]
    fn test_load_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "models = 3").unwrap();
        assert!(GeneratorConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_api_key_resolution_order() {
        let mut config = GeneratorConfig::default();
        config.api_key = Some("from-file".to_string());

        let env = |name: &str| (name == "GEMINI_API_KEY").then(|| "from-env".to_string());
        let no_env = |_: &str| None;

        assert_eq!(
            config.resolve_api_key_with(Some("explicit"), env),
            Some("explicit".to_string())
        );
        assert_eq!(config.resolve_api_key_with(None, env), Some("from-env".to_string()));
        assert_eq!(config.resolve_api_key_with(Some("  "), no_env), Some("from-file".to_string()));

        config.api_key = None;
        assert_eq!(config.resolve_api_key_with(None, no_env), None);
    }

    #[test]
    fn test_merge_config_overrides() {
        let file_config = GeneratorConfig::default();
        let overrides = ConfigOverrides {
            models: Some(vec!["m".to_string()]),
            timeout_secs: Some(5),
            api_base_url: None,
        };

        let merged = merge_config(&file_config, &overrides);
        assert_eq!(merged.models, vec!["m"]);
        assert_eq!(merged.timeout_secs, 5);
        assert_eq!(merged.api_base_url, file_config.api_base_url);

        let empty = ConfigOverrides {
            models: Some(Vec::new()),
            ..Default::default()
        };
        assert_eq!(merge_config(&file_config, &empty).models, default_models());
    }
}
