//! Configuration file migrations: detect and repair config files written
//! by older releases that predate some of the current fields.

use super::Config;
use crate::errors::{AppError, AppResult};
use serde_yaml::Value;
use std::fs;

const REQUIRED_FIELDS: [&str; 4] = [
    "database",
    "resolver_mode",
    "default_duration_minutes",
    "default_horizon_days",
];

/// Field names the current release expects but the file does not carry.
pub fn missing_fields() -> AppResult<Vec<String>> {
    let path = Config::config_file();
    if !path.exists() {
        return Err(AppError::Config(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let content = fs::read_to_string(&path)?;
    let yaml: Value =
        serde_yaml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))?;

    let map = yaml
        .as_mapping()
        .ok_or_else(|| AppError::Config("Configuration file is not a mapping".into()))?;

    let mut missing = Vec::new();
    for field in REQUIRED_FIELDS {
        let key = Value::String(field.to_string());
        if !map.contains_key(&key) {
            missing.push(field.to_string());
        }
    }

    Ok(missing)
}

/// Merge defaults into the config file for any missing field.
/// Returns true when the file was rewritten.
pub fn run_config_migration() -> AppResult<bool> {
    let missing = missing_fields()?;
    if missing.is_empty() {
        return Ok(false);
    }

    // Serde fills the gaps with defaults on load; saving writes them out.
    let cfg = Config::load();
    cfg.save().map_err(|_| AppError::ConfigSave)?;

    Ok(true)
}
