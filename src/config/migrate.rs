//! Configuration file upgrades: find keys missing from an older file and
//! write their defaults without touching the values already set.

use super::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Keys a complete configuration file carries.
fn expected_keys() -> AppResult<Mapping> {
    let defaults = serde_yaml::to_value(Config::default())?;
    match defaults {
        Value::Mapping(m) => Ok(m),
        _ => Err(AppError::Config("default configuration is not a mapping".into())),
    }
}

fn parse_mapping(content: &str) -> AppResult<Mapping> {
    if content.trim().is_empty() {
        return Ok(Mapping::new());
    }
    match serde_yaml::from_str::<Value>(content)? {
        Value::Mapping(m) => Ok(m),
        Value::Null => Ok(Mapping::new()),
        _ => Err(AppError::Config("configuration file is not a mapping".into())),
    }
}

/// Names of the keys absent from `content`.
pub fn missing_keys(content: &str) -> AppResult<Vec<String>> {
    let current = parse_mapping(content)?;
    let mut out = Vec::new();

    for (k, _) in expected_keys()? {
        if !current.contains_key(&k)
            && let Some(name) = k.as_str()
        {
            out.push(name.to_string());
        }
    }
    Ok(out)
}

/// Append defaults for the missing keys. Returns the upgraded YAML and the
/// keys that were added.
pub fn fill_missing(content: &str) -> AppResult<(String, Vec<String>)> {
    let mut current = parse_mapping(content)?;
    let mut added = Vec::new();

    for (k, v) in expected_keys()? {
        if !current.contains_key(&k) {
            if let Some(name) = k.as_str() {
                added.push(name.to_string());
            }
            current.insert(k, v);
        }
    }

    Ok((serde_yaml::to_string(&Value::Mapping(current))?, added))
}

/// Check the file at `path` and report what is missing.
pub fn check_file(path: &Path) -> AppResult<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
    let missing = missing_keys(&content)?;

    if missing.is_empty() {
        success("Configuration file is complete.");
    } else {
        info(format!("Missing keys: {}", missing.join(", ")));
    }
    Ok(missing)
}

/// Rewrite the file at `path` with the missing keys filled in.
pub fn migrate_file(path: &Path) -> AppResult<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
    let (upgraded, added) = fill_missing(&content)?;

    if added.is_empty() {
        info("Configuration already up to date.");
        return Ok(added);
    }

    fs::write(path, upgraded).map_err(|_| AppError::ConfigSave)?;
    success(format!("Added keys: {}", added.join(", ")));
    Ok(added)
}
