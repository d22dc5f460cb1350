// src/config/file.rs

use crate::{
    config::ExternalConfig,
    constants,
    error::{AppError, AppResult},
};
use anyhow::{Context, anyhow};
use log::{debug, info};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub(super) fn get_config_path() -> AppResult<PathBuf> {
    let path = dirs::home_dir()
        .ok_or_else(|| AppError::Other(anyhow!("could not determine the home directory")))?
        .join(constants::CONFIG_DIR_NAME)
        .join(constants::CONFIG_FILE_NAME);
    Ok(path)
}

/// Loads the optional JSON settings file; a missing file means defaults.
pub(crate) fn load_external_config() -> AppResult<ExternalConfig> {
    let config_path = get_config_path()?;
    if config_path.is_file() {
        load_from(&config_path)
    } else {
        info!("no config file at {:?}, using built-in defaults", config_path);
        Ok(ExternalConfig::default())
    }
}

pub(crate) fn load_from(config_path: &Path) -> AppResult<ExternalConfig> {
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("failed to read config file '{}'", config_path.display()))?;
    let config = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file '{}'", config_path.display()))?;
    debug!("loaded config file {:?}", config_path);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "site": { "base_url": "http://localhost:8080" }, "network": { "max_retries": 2 } }"#,
        )
        .unwrap();

        let config = load_from(&path).unwrap();
        assert_eq!(config.site.base_url, "http://localhost:8080");
        assert_eq!(config.network.max_retries, Some(2));
        assert_eq!(config.network.timeout_secs, None);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(load_from(&path).is_err());
    }
}
