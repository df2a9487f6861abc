use crate::ui::messages::warning;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

pub mod migrate; // use submodule at src/config/migrate.rs

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_resolver_mode")]
    pub resolver_mode: String,
    #[serde(default = "default_duration_minutes")]
    pub default_duration_minutes: i32,
    #[serde(default = "default_horizon_days")]
    pub default_horizon_days: u64,
}

fn default_resolver_mode() -> String {
    "virtual".to_string()
}
fn default_duration_minutes() -> i32 {
    60
}
fn default_horizon_days() -> u64 {
    7
}

impl Default for Config {
    fn default() -> Self {
        let db_path = Self::database_file();
        Self {
            database: db_path.to_string_lossy().to_string(),
            resolver_mode: default_resolver_mode(),
            default_duration_minutes: default_duration_minutes(),
            default_horizon_days: default_horizon_days(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rsessionbook")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".rsessionbook")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rsessionbook.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rsessionbook.sqlite")
    }

    /// Load configuration from file, or return defaults if not found.
    /// An unreadable file falls back to defaults (repairable via
    /// `config --migrate`) instead of aborting the whole command.
    pub fn load() -> Self {
        let path = Self::config_file();

        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match serde_yaml::from_str(&content) {
                    Ok(cfg) => cfg,
                    Err(e) => {
                        warning(format!("Failed to parse configuration file: {}", e));
                        Config::default()
                    }
                },
                Err(e) => {
                    warning(format!("Failed to read configuration file: {}", e));
                    Config::default()
                }
            }
        } else {
            Config::default()
        }
    }

    /// Write the configuration file.
    pub fn save(&self) -> io::Result<()> {
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let mut file = fs::File::create(Self::config_file())?;
        file.write_all(yaml.as_bytes())?;
        Ok(())
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> io::Result<()> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_name {
            let p = std::path::Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            Self::database_file()
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            config.save()?;
            println!("Config file: {:?}", Self::config_file());
        }

        // Create empty DB file if not exists
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        println!("Database:    {:?}", db_path);

        Ok(())
    }
}
