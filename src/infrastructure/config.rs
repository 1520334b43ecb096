// src/infrastructure/config.rs
use crate::constants::{
    APP_DIR, CONFIG_FILE, DEFAULT_NOTES_TABLE, ENV_SUPABASE_ANON_KEY, ENV_SUPABASE_URL,
    SESSION_FILE,
};
use crate::domain::{DomainError, Theme};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// TOML configuration for the notes client
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub supabase: SupabaseConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SupabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub anon_key: String,
    #[serde(default = "default_table")]
    pub table: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct SessionConfig {
    /// Empty means `<data_dir>/supanotes/session.json`
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct Defaults {
    #[serde(default)]
    pub theme: Theme,
}

fn default_table() -> String {
    DEFAULT_NOTES_TABLE.to_string()
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            table: default_table(),
        }
    }
}

impl Config {
    /// Platform config location, e.g. `~/.config/supanotes/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().context("Could not find config directory")?;
        Ok(dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load configuration from TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content).context("Failed to parse TOML config")?;

        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file does not exist
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            debug!(path = %path.as_ref().display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        std::fs::write(path.as_ref(), toml_string).context("Failed to write config file")?;

        Ok(())
    }

    /// Create default configuration file at path
    pub fn create_default(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }

    /// Apply `SUPABASE_URL` / `SUPABASE_ANON_KEY` from the given lookup
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_SUPABASE_URL).filter(|v| !v.is_empty()) {
            self.supabase.url = url;
        }
        if let Some(key) = lookup(ENV_SUPABASE_ANON_KEY).filter(|v| !v.is_empty()) {
            self.supabase.anon_key = key;
        }
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.supabase.url.trim().is_empty() {
            return Err(DomainError::Config(format!(
                "supabase.url is not set (config file or {})",
                ENV_SUPABASE_URL
            )));
        }
        if self.supabase.anon_key.trim().is_empty() {
            return Err(DomainError::Config(format!(
                "supabase.anon_key is not set (config file or {})",
                ENV_SUPABASE_ANON_KEY
            )));
        }
        Ok(())
    }

    /// Where the auth session is stored between runs
    pub fn session_path(&self) -> Result<PathBuf> {
        if !self.session.path.is_empty() {
            return Ok(PathBuf::from(&self.session.path));
        }
        let dir = dirs::data_dir().context("Could not find data directory")?;
        Ok(dir.join(APP_DIR).join(SESSION_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn given_no_file_when_creating_default_then_creates_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested/config.toml");

        let config = Config::create_default(&config_path).unwrap();

        assert_eq!(config.supabase.table, "notes");
        assert_eq!(config.defaults.theme, Theme::Vanilla);
        assert!(config_path.exists());
    }

    #[test]
    fn given_config_when_saving_then_writes_toml_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        Config::default().save(&config_path).unwrap();

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[supabase]"));
        assert!(content.contains("[session]"));
        assert!(content.contains("[defaults]"));
        assert!(content.contains(r#"theme = "vanilla""#));
    }

    #[test]
    fn given_toml_file_when_loading_then_reads_values() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("load_test.toml");
        let toml_content = r#"
[supabase]
url = "https://abc.supabase.co"
anon_key = "anon"
table = "my_notes"

[session]
path = "/tmp/session.json"

[defaults]
theme = "chocolate"
"#;
        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load(&config_path).unwrap();

        assert_eq!(config.supabase.url, "https://abc.supabase.co");
        assert_eq!(config.supabase.anon_key, "anon");
        assert_eq!(config.supabase.table, "my_notes");
        assert_eq!(config.session_path().unwrap(), PathBuf::from("/tmp/session.json"));
        assert_eq!(config.defaults.theme, Theme::Chocolate);
    }

    #[test]
    fn given_partial_toml_when_loading_then_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("partial.toml");
        fs::write(&config_path, "[supabase]\nurl = \"https://abc.supabase.co\"\n").unwrap();

        let config = Config::load(&config_path).unwrap();

        assert_eq!(config.supabase.url, "https://abc.supabase.co");
        assert_eq!(config.supabase.anon_key, "");
        assert_eq!(config.supabase.table, "notes");
        assert_eq!(config.defaults.theme, Theme::Vanilla);
    }

    #[test]
    fn given_unknown_theme_in_toml_when_loading_then_falls_back_to_vanilla() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("theme.toml");
        fs::write(&config_path, "[defaults]\ntheme = \"neon\"\n").unwrap();

        let config = Config::load(&config_path).unwrap();

        assert_eq!(config.defaults.theme, Theme::Vanilla);
    }

    #[test]
    fn given_nonexistent_file_when_loading_then_returns_error() {
        assert!(Config::load("/nonexistent/path/config.toml").is_err());
    }

    #[test]
    fn given_nonexistent_file_when_loading_or_default_then_returns_defaults() {
        let config = Config::load_or_default("/nonexistent/path/config.toml").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn given_env_values_when_overriding_then_env_wins_over_file() {
        let env: HashMap<&str, &str> = [
            ("SUPABASE_URL", "https://env.supabase.co"),
            ("SUPABASE_ANON_KEY", ""),
        ]
        .into_iter()
        .collect();
        let mut config = Config::default();
        config.supabase.anon_key = "file-key".to_string();

        let config = config.with_env_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.supabase.url, "https://env.supabase.co");
        assert_eq!(config.supabase.anon_key, "file-key");
    }

    #[test]
    fn given_missing_url_when_validating_then_reports_config_error() {
        let result = Config::default().validate();
        assert!(matches!(result, Err(DomainError::Config(msg)) if msg.contains("supabase.url")));
    }

    #[test]
    fn given_url_and_key_when_validating_then_succeeds() {
        let mut config = Config::default();
        config.supabase.url = "https://abc.supabase.co".to_string();
        config.supabase.anon_key = "anon".to_string();

        assert!(config.validate().is_ok());
    }
}
