use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

pub static CONFIG: OnceCell<Config> = OnceCell::new();

const ENV_PREFIX: &str = "SOCDASH_";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoggingConfig {
    pub soc_dashboard: String,
    pub r2d2: String,
}

impl LoggingConfig {
    const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
    const APP_LEVEL: &str = "info";
    const R2D2_LEVEL: &str = "warn";

    fn default() -> Self {
        LoggingConfig {
            soc_dashboard: Self::APP_LEVEL.to_string(),
            r2d2: Self::R2D2_LEVEL.to_string(),
        }
    }

    fn ensure_valid(&mut self) {
        self.soc_dashboard = Self::valid_level("soc_dashboard", &self.soc_dashboard, Self::APP_LEVEL);
        self.r2d2 = Self::valid_level("r2d2", &self.r2d2, Self::R2D2_LEVEL);
    }

    fn valid_level(module: &str, level: &str, default: &str) -> String {
        let normalized = level.trim().to_ascii_lowercase();
        if Self::LOG_LEVELS.contains(&normalized.as_str()) {
            normalized
        } else {
            eprintln!(
                "Config error: {} log level of '{}' is invalid - using default of '{}'",
                module, level, default
            );
            default.to_owned()
        }
    }

    /// flexi_logger spec string, e.g. "soc_dashboard=info, r2d2=warn"
    pub fn log_spec(&self) -> String {
        format!("soc_dashboard={}, r2d2={}", self.soc_dashboard, self.r2d2)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_owned(),
            port: 8080,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    /// Directory holding the store's logical databases. Empty means unset.
    pub uri: String,
    pub name: String,
    pub pool_size: u32,
}

impl DatabaseConfig {
    const DEFAULT_NAME: &str = "soc_dashboard";
    const DEFAULT_POOL_SIZE: u32 = 4;

    fn ensure_valid(&mut self) {
        self.uri = self.uri.trim().to_owned();

        let name = self.name.trim();
        if name.is_empty() {
            eprintln!(
                "Config error: database name is blank - using default of '{}'",
                Self::DEFAULT_NAME
            );
            self.name = Self::DEFAULT_NAME.to_owned();
        } else {
            self.name = name.to_owned();
        }

        if self.pool_size == 0 {
            self.pool_size = 1;
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            uri: String::new(),
            name: Self::DEFAULT_NAME.to_owned(),
            pool_size: Self::DEFAULT_POOL_SIZE,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct DashboardConfig {
    /// Replaces the built-in MITRE technique name table
    pub technique_catalog: Option<PathBuf>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    pub logging: LoggingConfig,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

impl Config {
    fn default() -> Self {
        Config {
            logging: LoggingConfig::default(),
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            dashboard: DashboardConfig::default(),
        }
    }

    /// Loads the configuration from a TOML file located in the app's data directory,
    /// then applies `SOCDASH_` environment overrides. If the file is missing or fails
    /// to parse, defaults are used. Writes the default config to disk if no file exists.
    pub fn load_config(project_dirs: &ProjectDirs) -> Self {
        let config_path = project_dirs.data_local_dir().join("config.toml");
        let default_config = Config::default();

        if !config_path.exists() {
            if let Some(parent) = config_path.parent() {
                if let Err(e) = fs::create_dir_all(parent) {
                    eprintln!(
                        "Failed to create configuration directory {}: {}",
                        parent.display(),
                        e
                    );
                }
            }
            match toml::to_string_pretty(&default_config) {
                Ok(toml_string) => {
                    if let Err(e) = fs::write(&config_path, toml_string) {
                        eprintln!(
                            "Failed to write default config to {}: {}",
                            config_path.display(),
                            e
                        );
                    }
                }
                Err(_) => eprintln!("Failed to serialize default config."),
            }
        }

        let figment = Self::figment(default_config.clone()).merge(Toml::file(&config_path));
        let figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let mut config = figment.extract().unwrap_or_else(|err| {
            eprintln!(
                "Could not load config file {}: {}. Using default configuration.",
                config_path.display(),
                err
            );
            default_config
        });

        config.ensure_valid();

        config
    }

    fn figment(defaults: Config) -> Figment {
        Figment::from(Serialized::defaults(defaults))
    }

    fn ensure_valid(&mut self) {
        self.logging.ensure_valid();
        self.database.ensure_valid();
    }

    pub fn project_dirs() -> Result<ProjectDirs, DashboardError> {
        ProjectDirs::from("", "", "soc-dashboard").ok_or_else(|| {
            DashboardError::ConfigError("Could not determine project directories".to_string())
        })
    }

    pub fn get() -> Result<&'static Config, DashboardError> {
        CONFIG
            .get()
            .ok_or_else(|| DashboardError::ConfigError("Configuration not loaded".to_string()))
    }

    pub fn get_server_host() -> String {
        CONFIG
            .get()
            .map(|c| c.server.host.clone())
            .unwrap_or_else(|| ServerConfig::default().host)
    }

    pub fn get_server_port() -> u16 {
        CONFIG
            .get()
            .map(|c| c.server.port)
            .unwrap_or_else(|| ServerConfig::default().port)
    }
}
