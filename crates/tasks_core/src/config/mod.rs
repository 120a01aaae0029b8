use crate::codec::EXPORT_FILE_NAME;
use crate::error::AppError;
use crate::storage::{DEFAULT_SLOT_KEY, store_dir};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "CUTE_TASKS_CONFIG_PATH";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the slot file.
    #[serde(default)]
    pub store_dir: Option<PathBuf>,
    #[serde(default)]
    pub slot_key: Option<String>,
    /// File name used by `export` when no path is given.
    #[serde(default)]
    pub export_file: Option<String>,
}

impl Config {
    pub fn slot_key(&self) -> &str {
        self.slot_key.as_deref().unwrap_or(DEFAULT_SLOT_KEY)
    }

    pub fn export_file(&self) -> &str {
        self.export_file.as_deref().unwrap_or(EXPORT_FILE_NAME)
    }

    pub fn store_dir(&self) -> Result<PathBuf, AppError> {
        match &self.store_dir {
            Some(dir) => Ok(dir.clone()),
            None => store_dir(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub store_dir: Option<PathBuf>,
    pub slot_key: Option<String>,
    pub export_file: Option<String>,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("cute_tasks")
            .join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("cute_tasks")
            .join(CONFIG_FILE_NAME))
    }
}

pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let config: Config = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;
    validate(&config).map_err(|err| {
        AppError::invalid_data(format!("{}: {}", path.display(), err.message()))
    })?;
    Ok(config)
}

/// Rejects values that cannot name a slot file or an export file.
pub fn validate(config: &Config) -> Result<(), AppError> {
    if let Some(key) = config.slot_key.as_deref() {
        validate_slot_key(key)?;
    }
    if let Some(name) = config.export_file.as_deref()
        && name.trim().is_empty()
    {
        return Err(AppError::invalid_data("export_file cannot be empty"));
    }
    Ok(())
}

pub fn validate_slot_key(key: &str) -> Result<(), AppError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');
    if valid {
        Ok(())
    } else {
        Err(AppError::invalid_data(format!(
            "slot_key '{key}' may only contain letters, digits, '_' and '-'"
        )))
    }
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Config {
    let mut merged = base.clone();
    if let Some(dir) = overrides.store_dir.as_ref() {
        merged.store_dir = Some(dir.clone());
    }
    if let Some(key) = overrides.slot_key.as_ref() {
        merged.slot_key = Some(key.clone());
    }
    if let Some(name) = overrides.export_file.as_ref() {
        merged.export_file = Some(name.clone());
    }
    merged
}
