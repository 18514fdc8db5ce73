use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::provider::ProviderId;

pub const DEFAULT_PREFERRED_MODEL: &str = "gemini-2.5-flash";

/// Models tried after the preferred one, in this order.
pub const DEFAULT_FALLBACK_MODELS: &[&str] = &[
    "gemini-2.5-flash",
    "gemini-2.0-flash",
    "gemini-flash-latest",
    "gemini-pro-latest",
    "gemini-2.5-pro",
    "gemini-2.0-pro-exp",
    "gemini-1.5-flash-latest",
    "gemini-1.5-flash",
    "gemini-1.5-pro",
];

/// Configuration for a single provider (e.g., API key).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
}

/// How the bilingual generator talks to the model backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    pub preferred_model: String,
    pub fallback_models: Vec<String>,
    /// Per-attempt deadline; worst case is this times the number of models.
    pub request_timeout_secs: u64,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            preferred_model: DEFAULT_PREFERRED_MODEL.to_string(),
            fallback_models: DEFAULT_FALLBACK_MODELS.iter().map(|m| m.to_string()).collect(),
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherSettings {
    pub request_timeout_secs: u64,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self { request_timeout_secs: 15 }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// SQLite history file; defaults to the platform data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,

    /// Example TOML:
    /// [providers.gemini]
    /// api_key = "..."
    pub providers: HashMap<String, ProviderConfig>,

    pub generator: GeneratorSettings,

    pub weather: WeatherSettings,
}

impl Config {
    /// Load config from disk (or defaults on first run), then apply
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;
        cfg.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Overlay GEMINI_API_KEY, GEMINI_MODEL, OWM_API_KEY and MAYA_DB_PATH.
    /// Empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| var(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("GEMINI_API_KEY") {
            self.upsert_provider_api_key(ProviderId::Gemini, key);
        }
        if let Some(key) = non_empty("OWM_API_KEY") {
            self.upsert_provider_api_key(ProviderId::OpenWeather, key);
        }
        if let Some(model) = non_empty("GEMINI_MODEL") {
            self.generator.preferred_model = model;
        }
        if let Some(path) = non_empty("MAYA_DB_PATH") {
            self.database_path = Some(PathBuf::from(path));
        }
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "maya", "maya")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Configured history database, or `history.db` in the data directory.
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::project_dirs()?.data_dir().join("history.db")),
        }
    }

    /// Set or replace a provider API key.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers.insert(provider_id.as_str().to_string(), ProviderConfig { api_key });
    }

    /// Returns API key for a provider, if present and non-blank.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.providers
            .get(provider_id.as_str())
            .map(|cfg| cfg.api_key.as_str())
            .filter(|key| !key.trim().is_empty())
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        self.provider_api_key(provider_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_cover_generator_settings() {
        let cfg = Config::default();

        assert_eq!(cfg.generator.preferred_model, "gemini-2.5-flash");
        assert_eq!(cfg.generator.fallback_models.len(), DEFAULT_FALLBACK_MODELS.len());
        assert_eq!(cfg.generator.request_timeout_secs, 30);
        assert_eq!(cfg.weather.request_timeout_secs, 15);
        assert!(!cfg.is_provider_configured(ProviderId::Gemini));
    }

    #[test]
    fn set_api_key_for_provider() {
        let mut cfg = Config::default();

        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "OPEN_KEY".into());

        let key = cfg.provider_api_key(ProviderId::OpenWeather);
        assert_eq!(key, Some("OPEN_KEY"));
        assert!(cfg.is_provider_configured(ProviderId::OpenWeather));
        assert!(!cfg.is_provider_configured(ProviderId::Gemini));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::Gemini, "  ".into());

        assert!(!cfg.is_provider_configured(ProviderId::Gemini));
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::Gemini, "FROM_FILE".into());

        cfg.apply_env_overrides(env(&[
            ("GEMINI_API_KEY", "FROM_ENV"),
            ("GEMINI_MODEL", "gemini-1.5-pro"),
            ("OWM_API_KEY", "OWM"),
            ("MAYA_DB_PATH", "/tmp/maya.db"),
        ]));

        assert_eq!(cfg.provider_api_key(ProviderId::Gemini), Some("FROM_ENV"));
        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("OWM"));
        assert_eq!(cfg.generator.preferred_model, "gemini-1.5-pro");
        assert_eq!(cfg.database_path().unwrap(), PathBuf::from("/tmp/maya.db"));
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut cfg = Config::default();
        cfg.apply_env_overrides(env(&[("GEMINI_API_KEY", ""), ("GEMINI_MODEL", " ")]));

        assert!(!cfg.is_provider_configured(ProviderId::Gemini));
        assert_eq!(cfg.generator.preferred_model, DEFAULT_PREFERRED_MODEL);
    }

    #[test]
    fn save_then_load_keeps_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::Gemini, "KEY".into());
        cfg.generator.preferred_model = "gemini-2.0-flash".into();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.provider_api_key(ProviderId::Gemini), Some("KEY"));
        assert_eq!(loaded.generator, cfg.generator);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[generator]\npreferred_model = \"gemini-1.5-flash\"\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.generator.preferred_model, "gemini-1.5-flash");
        assert_eq!(cfg.generator.request_timeout_secs, 30);
        assert!(cfg.providers.is_empty());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert!(cfg.providers.is_empty());
    }
}
