use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use crate::utils::path::resolve_under;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

pub mod migrate;

pub const APP_DIR: &str = "rdoselog";
pub const CONFIG_FILE: &str = "rdoselog.conf";
pub const DB_FILE: &str = "rdoselog.sqlite";
pub const PRESCRIPTION_FILE: &str = "prescription.yaml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_prescription")]
    pub prescription: String,
    /// Reconcile the prescription before every command.
    #[serde(default = "default_true")]
    pub auto_sync: bool,
    #[serde(default = "default_true")]
    pub show_prescription_notes: bool,
    #[serde(default = "default_note_wrap_width")]
    pub note_wrap_width: usize,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_prescription() -> String {
    Config::prescription_file().to_string_lossy().to_string()
}
fn default_true() -> bool {
    true
}
fn default_note_wrap_width() -> usize {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            prescription: default_prescription(),
            auto_sync: true,
            show_prescription_notes: true,
            note_wrap_width: default_note_wrap_width(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join(APP_DIR)
        } else {
            let home = dirs::home_dir()
                .or_else(|| env::var("HOME").ok().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("."));
            home.join(format!(".{APP_DIR}"))
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join(CONFIG_FILE)
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join(DB_FILE)
    }

    /// Default location of the prescription document
    pub fn prescription_file() -> PathBuf {
        Self::config_dir().join(PRESCRIPTION_FILE)
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        // an empty file deserializes to unit, not to a mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| AppError::Config(format!("invalid configuration file: {e}")))
    }

    pub fn save(&self) -> AppResult<()> {
        fs::create_dir_all(Self::config_dir())?;
        let yaml = serde_yaml::to_string(self).map_err(|_| AppError::ConfigSave)?;
        let mut file = fs::File::create(Self::config_file()).map_err(|_| AppError::ConfigSave)?;
        file.write_all(yaml.as_bytes())?;
        Ok(())
    }

    /// Database path with `~` expanded and relative paths anchored in the
    /// config dir.
    pub fn database_path(&self) -> PathBuf {
        resolve_under(&Self::config_dir(), &self.database)
    }

    pub fn prescription_path(&self) -> PathBuf {
        resolve_under(&Self::config_dir(), &self.prescription)
    }

    /// Initialize configuration and database files
    pub fn init_all(
        custom_db: Option<String>,
        custom_prescription: Option<String>,
        is_test: bool,
    ) -> AppResult<Self> {
        let dir = Self::config_dir();

        let mut config = if is_test {
            Self::default()
        } else {
            fs::create_dir_all(&dir)?;
            Self::load()?
        };

        if let Some(name) = custom_db {
            config.database = resolve_under(&dir, &name).to_string_lossy().to_string();
        }
        if let Some(name) = custom_prescription {
            config.prescription = resolve_under(&dir, &name).to_string_lossy().to_string();
        }

        // Write config file
        if !is_test {
            config.save()?;
            success(format!("Config file: {}", Self::config_file().display()));
        }

        // Create empty DB file if not exists
        let db_path = config.database_path();
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        success(format!("Database:    {}", db_path.display()));

        Ok(config)
    }
}
