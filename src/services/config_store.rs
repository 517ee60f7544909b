// Configuration Storage Service
// Handles config file read/write and version backup

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::services::analysis::{AnalyzerSettings, JitterSource, SeededJitter, ThreadJitter};

const MAX_BACKUPS: usize = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),
}

fn io_err<'a>(action: &'static str, path: &'a Path) -> impl FnOnce(std::io::Error) -> ConfigError + 'a {
    move |source| ConfigError::Io {
        action,
        path: path.to_path_buf(),
        source,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub review_source: ReviewSourceConfig,
    #[serde(default)]
    pub demo: DemoConfig,
    #[serde(default)]
    pub api_keys: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    #[serde(default = "default_min_review_chars")]
    pub min_review_chars: usize,
    #[serde(default = "default_max_reviews")]
    pub max_reviews: usize,
    #[serde(default = "default_quick_sample")]
    pub quick_sample: usize,
    #[serde(default = "default_jitter_bound")]
    pub jitter_bound: f64,
    /// Fixed seed for reproducible heuristic jitter.
    #[serde(default)]
    pub jitter_seed: Option<u64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_review_chars: default_min_review_chars(),
            max_reviews: default_max_reviews(),
            quick_sample: default_quick_sample(),
            jitter_bound: default_jitter_bound(),
            jitter_seed: None,
        }
    }
}

impl AnalysisConfig {
    pub fn analyzer_settings(&self) -> AnalyzerSettings {
        AnalyzerSettings {
            min_review_chars: self.min_review_chars,
            max_reviews: self.max_reviews,
            quick_sample: self.quick_sample,
            jitter_bound: self.jitter_bound.max(0.0),
        }
    }

    pub fn jitter_source(&self) -> Arc<dyn JitterSource> {
        match self.jitter_seed {
            Some(seed) => Arc::new(SeededJitter::new(seed)),
            None => Arc::new(ThreadJitter),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSourceConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ReviewSourceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            base_url: None,
            country: default_country(),
            max_pages: default_max_pages(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoConfig {
    #[serde(default = "default_demo_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_demo_window_hours")]
    pub window_hours: i64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_demo_attempts(),
            window_hours: default_demo_window_hours(),
        }
    }
}

fn default_min_review_chars() -> usize { 5 }
fn default_max_reviews() -> usize { 100 }
fn default_quick_sample() -> usize { 50 }
fn default_jitter_bound() -> f64 { 0.2 }
fn default_host() -> String { "real-time-amazon-data.p.rapidapi.com".to_string() }
fn default_country() -> String { "US".to_string() }
fn default_max_pages() -> u32 { 3 }
fn default_max_retries() -> u32 { 3 }
fn default_retry_delay_ms() -> u64 { 2000 }
fn default_timeout_secs() -> u64 { 30 }
fn default_demo_attempts() -> u32 { 3 }
fn default_demo_window_hours() -> i64 { 24 }

pub struct ConfigStore {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join("config.json");
        Self { config_dir, config_file }
    }

    /// Get default config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("revai"))
    }

    /// Store at the default location, if the platform has one.
    pub fn open_default() -> Option<Self> {
        Self::default_config_dir().map(Self::new)
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Ensure config directory exists
    pub fn ensure_dir(&self) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.config_dir).map_err(io_err("create", &self.config_dir))
    }

    /// Load configuration from file; a missing file yields the defaults.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.config_file.exists() {
            return Ok(AppConfig::default());
        }

        let content =
            fs::read_to_string(&self.config_file).map_err(io_err("read", &self.config_file))?;

        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Save configuration to file
    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        self.ensure_dir()?;

        if self.config_file.exists() {
            self.create_backup()?;
        }

        let content = serde_json::to_string_pretty(config).map_err(ConfigError::Serialize)?;

        fs::write(&self.config_file, content).map_err(io_err("write", &self.config_file))
    }

    fn create_backup(&self) -> Result<(), ConfigError> {
        let backup_dir = self.config_dir.join("backups");
        fs::create_dir_all(&backup_dir).map_err(io_err("create", &backup_dir))?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S%3f");
        let backup_file = backup_dir.join(format!("config_{}.json", timestamp));

        fs::copy(&self.config_file, &backup_file).map_err(io_err("back up", &backup_file))?;

        self.cleanup_old_backups(&backup_dir, MAX_BACKUPS)
    }

    /// Remove old backups, keeping only the most recent N
    fn cleanup_old_backups(&self, backup_dir: &Path, keep: usize) -> Result<(), ConfigError> {
        let mut entries: Vec<_> = fs::read_dir(backup_dir)
            .map_err(io_err("read", backup_dir))?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
            .collect();

        if entries.len() <= keep {
            return Ok(());
        }

        // Oldest first; names embed the timestamp so they sort chronologically.
        entries.sort_by_key(|e| e.file_name());

        for entry in entries.iter().take(entries.len() - keep) {
            let _ = fs::remove_file(entry.path());
        }

        Ok(())
    }

    pub fn get_api_key(&self, name: &str) -> Result<Option<String>, ConfigError> {
        let config = self.load()?;
        Ok(config.api_keys.get(name).cloned())
    }

    pub fn set_api_key(&self, name: &str, key: &str) -> Result<(), ConfigError> {
        let mut config = self.load()?;
        config.api_keys.insert(name.to_string(), key.to_string());
        self.save(&config)
    }

    pub fn delete_api_key(&self, name: &str) -> Result<(), ConfigError> {
        let mut config = self.load()?;
        config.api_keys.remove(name);
        self.save(&config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.analysis.min_review_chars, 5);
        assert_eq!(config.analysis.max_reviews, 100);
        assert_eq!(config.review_source.max_pages, 3);
        assert_eq!(config.demo.max_attempts, 3);
        assert_eq!(config.demo.window_hours, 24);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let parsed: AppConfig =
            serde_json::from_str(r#"{"version":"1.0.0","analysis":{"jitterSeed":9}}"#).unwrap();
        assert_eq!(parsed.version, "1.0.0");
        assert_eq!(parsed.analysis.jitter_seed, Some(9));
        assert_eq!(parsed.analysis.quick_sample, 50);
        assert_eq!(parsed.review_source.country, "US");
    }

    #[test]
    fn test_analyzer_settings_from_config() {
        let config = AnalysisConfig {
            jitter_bound: -1.0,
            ..AnalysisConfig::default()
        };
        let settings = config.analyzer_settings();
        assert_eq!(settings.jitter_bound, 0.0);
        assert_eq!(settings.min_review_chars, 5);
    }

    #[test]
    fn test_save_load_and_backup_rotation() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("revai"));
        assert!(store.load().unwrap().api_keys.is_empty());

        store.set_api_key("rapidapi", "secret").unwrap();
        assert_eq!(store.get_api_key("rapidapi").unwrap().as_deref(), Some("secret"));

        for i in 0..(MAX_BACKUPS + 3) {
            store.set_api_key("rapidapi", &format!("secret-{i}")).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(2));
        }
        let backups = fs::read_dir(dir.path().join("revai").join("backups")).unwrap().count();
        assert!(backups <= MAX_BACKUPS);

        store.delete_api_key("rapidapi").unwrap();
        assert_eq!(store.get_api_key("rapidapi").unwrap(), None);
    }

    #[test]
    fn test_io_failure_reports_action_and_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let store = ConfigStore::new(blocker.join("revai"));
        match store.save(&AppConfig::default()) {
            Err(ConfigError::Io { action, path, .. }) => {
                assert_eq!(action, "create");
                assert_eq!(path, blocker.join("revai"));
            }
            other => panic!("expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_corrupt_config_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().to_path_buf());
        fs::write(store.config_file(), "{not json").unwrap();
        assert!(matches!(store.load(), Err(ConfigError::Parse(_))));
    }
}
