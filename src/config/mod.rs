use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::core::{
    errors::LedgerError,
    generator::{GenerationLimits, DEFAULT_MAX_INSTALLMENTS, DEFAULT_RECURRENCE_OCCURRENCES},
    services::UnlinkedPaymentPolicy,
    utils::{ensure_dir, write_atomic, PathResolver},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    /// Rows produced by a recurring entry when no count is given, and the most it may ask for.
    pub recurrence_occurrences: u32,
    pub max_installments: u32,
    pub unlinked_payment: UnlinkedPaymentPolicy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_opened_ledger: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            recurrence_occurrences: DEFAULT_RECURRENCE_OCCURRENCES,
            max_installments: DEFAULT_MAX_INSTALLMENTS,
            unlinked_payment: UnlinkedPaymentPolicy::default(),
            last_opened_ledger: None,
        }
    }
}

impl Config {
    pub fn limits(&self) -> GenerationLimits {
        GenerationLimits {
            recurrence_occurrences: self.recurrence_occurrences,
            max_installments: self.max_installments,
        }
    }

    fn validate(&self) -> Result<(), LedgerError> {
        if self.recurrence_occurrences == 0 {
            return Err(LedgerError::Config(
                "recurrence_occurrences must be at least 1".into(),
            ));
        }
        if self.max_installments < 2 {
            return Err(LedgerError::Config(
                "max_installments must be at least 2".into(),
            ));
        }
        Ok(())
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, LedgerError> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, LedgerError> {
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    /// Reads the config file, or defaults when none was written yet.
    pub fn load(&self) -> Result<Config, LedgerError> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data).map_err(|err| {
            LedgerError::Config(format!("{}: {}", self.path.display(), err))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), LedgerError> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();

        let config = manager.load().unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.limits(), GenerationLimits::default());
        assert_eq!(config.unlinked_payment, UnlinkedPaymentPolicy::Reject);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(
            manager.path(),
            r#"{ "currency": "EUR", "unlinked_payment": "Warn" }"#,
        )
        .unwrap();

        let config = manager.load().unwrap();

        assert_eq!(config.currency, "EUR");
        assert_eq!(config.unlinked_payment, UnlinkedPaymentPolicy::Warn);
        assert_eq!(config.recurrence_occurrences, 12);
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = Config {
            recurrence_occurrences: 24,
            last_opened_ledger: Some("household".into()),
            ..Config::default()
        };

        manager.save(&config).unwrap();

        assert_eq!(manager.load().unwrap(), config);
        assert!(manager.path().ends_with("config/config.json"));
    }

    #[test]
    fn malformed_file_is_config_error() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), "{ not json").unwrap();

        assert!(matches!(manager.load(), Err(LedgerError::Config(_))));
    }

    #[test]
    fn zero_occurrences_rejected_on_save() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = Config {
            recurrence_occurrences: 0,
            ..Config::default()
        };
        assert!(matches!(manager.save(&config), Err(LedgerError::Config(_))));
    }
}
