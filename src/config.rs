use std::fs;

use serde::{Deserialize, Serialize};

use crate::crypto::{encode_b64, random_salt, DEFAULT_PBKDF2_ITERATIONS};
use crate::errors::ConfigError;
use crate::storage::{write_text_file, StoragePaths};

const DEFAULT_EXPORT_ROW_LIMIT: usize = 50_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub kdf_iterations: u32,
    /// Key material for the store file. Generated on first run.
    pub store_secret: String,
    pub seed_sample_roster: bool,
    pub dark_mode: bool,
    pub log_filter: String,
    pub export_row_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            kdf_iterations: DEFAULT_PBKDF2_ITERATIONS,
            store_secret: String::new(),
            seed_sample_roster: true,
            dark_mode: false,
            log_filter: "warn".to_string(),
            export_row_limit: DEFAULT_EXPORT_ROW_LIMIT,
        }
    }
}

impl AppConfig {
    /// Reads the config file, filling and persisting anything first-run
    /// needs. A missing file yields defaults; a malformed one is an error.
    pub fn load_or_init(paths: &StoragePaths) -> Result<Self, ConfigError> {
        let path = paths.config_file();
        let mut config = if path.exists() {
            let raw = fs::read_to_string(path.as_path())?;
            serde_json::from_str::<AppConfig>(raw.as_str())?
        } else {
            AppConfig::default()
        };

        let mut dirty = !path.exists();
        if config.store_secret.trim().is_empty() {
            config.store_secret = encode_b64(&[random_salt(), random_salt()].concat());
            dirty = true;
        }
        if config.kdf_iterations == 0 {
            config.kdf_iterations = DEFAULT_PBKDF2_ITERATIONS;
            dirty = true;
        }
        if dirty {
            config.save(paths)?;
            tracing::debug!(path = %path.display(), "wrote app config");
        }
        Ok(config)
    }

    pub fn save(&self, paths: &StoragePaths) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        write_text_file(paths.config_file().as_path(), content.as_str())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn first_run_generates_and_keeps_a_secret() {
        let dir = TempDir::new().unwrap();
        let paths = StoragePaths::new(dir.path()).unwrap();

        let first = AppConfig::load_or_init(&paths).unwrap();
        assert!(!first.store_secret.is_empty());
        assert_eq!(first.kdf_iterations, DEFAULT_PBKDF2_ITERATIONS);

        let second = AppConfig::load_or_init(&paths).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn partial_file_takes_defaults_for_missing_keys() {
        let dir = TempDir::new().unwrap();
        let paths = StoragePaths::new(dir.path()).unwrap();
        fs::write(paths.config_file(), r#"{ "dark_mode": true, "kdf_iterations": 0 }"#).unwrap();

        let config = AppConfig::load_or_init(&paths).unwrap();
        assert!(config.dark_mode);
        assert!(config.seed_sample_roster);
        assert_eq!(config.kdf_iterations, DEFAULT_PBKDF2_ITERATIONS);
        assert_eq!(config.export_row_limit, 50_000);
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let paths = StoragePaths::new(dir.path()).unwrap();
        fs::write(paths.config_file(), "{ not json").unwrap();
        assert!(matches!(
            AppConfig::load_or_init(&paths),
            Err(ConfigError::Json(_))
        ));
    }
}
