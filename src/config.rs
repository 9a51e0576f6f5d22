//! Application configuration.
//!
//! Values are resolved with priority: config.toml > environment (.env) > default.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::paths;
use crate::srs::DEFAULT_HISTORY_CAPACITY;

// ==================== Defaults ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Server port
pub const SERVER_PORT: u16 = 3000;

/// Maximum number of items returned by the due-items query
pub const DUE_PAGE_SIZE: usize = 20;

/// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "config.toml";

// ==================== config.toml ====================

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    server: Option<ServerSection>,
    database: Option<DatabaseSection>,
    srs: Option<SrsSection>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSection {
    addr: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabaseSection {
    path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SrsSection {
    due_page_size: Option<usize>,
    history_capacity: Option<usize>,
}

// ==================== Resolved configuration ====================

/// Tunables used by the review handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SrsSettings {
    pub due_page_size: usize,
    pub history_capacity: usize,
}

impl Default for SrsSettings {
    fn default() -> Self {
        Self {
            due_page_size: DUE_PAGE_SIZE,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub server_port: u16,
    pub database_path: PathBuf,
    pub srs: SrsSettings,
}

impl Config {
    /// Load configuration from `config.toml`, then `.env`/environment, then defaults
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();
        Self::load_from(Path::new(CONFIG_FILE), |key| std::env::var(key).ok())
    }

    /// Resolve configuration from a config file path and an environment lookup
    pub fn load_from(config_path: &Path, env: impl Fn(&str) -> Option<String>) -> Self {
        let file = read_file_config(config_path);
        let server = file.server.unwrap_or_default();
        let database = file.database.unwrap_or_default();
        let srs = file.srs.unwrap_or_default();

        let server_addr = server
            .addr
            .or_else(|| env("HOST"))
            .unwrap_or_else(|| SERVER_ADDR.to_string());

        let server_port = server
            .port
            .or_else(|| env("PORT").and_then(|v| v.parse().ok()))
            .unwrap_or(SERVER_PORT);

        let database_path = match database.path {
            Some(path) => {
                tracing::info!("Using database from {}: {}", config_path.display(), path);
                PathBuf::from(path)
            }
            None => match env("DATABASE_PATH") {
                Some(path) => {
                    tracing::info!("Using database from DATABASE_PATH env: {}", path);
                    PathBuf::from(path)
                }
                None => {
                    let default = PathBuf::from(paths::db_path());
                    tracing::info!("Using default database path: {}", default.display());
                    default
                }
            },
        };

        let due_page_size = srs
            .due_page_size
            .or_else(|| env("DUE_PAGE_SIZE").and_then(|v| v.parse().ok()))
            .filter(|size| *size > 0)
            .unwrap_or(DUE_PAGE_SIZE);

        let history_capacity = srs
            .history_capacity
            .or_else(|| env("HISTORY_CAPACITY").and_then(|v| v.parse().ok()))
            .unwrap_or(DEFAULT_HISTORY_CAPACITY);

        Self {
            server_addr,
            server_port,
            database_path,
            srs: SrsSettings {
                due_page_size,
                history_capacity,
            },
        }
    }

    /// Get the full server bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_addr, self.server_port)
    }
}

fn read_file_config(path: &Path) -> FileConfig {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return FileConfig::default();
    };
    match toml::from_str::<FileConfig>(&contents) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring invalid {}: {}", path.display(), e);
            FileConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from(&temp.path().join("missing.toml"), env_from(&[]));

        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
        assert_eq!(config.srs, SrsSettings::default());
        assert!(config.database_path.ends_with("learnsynth.db"));
    }

    #[test]
    fn test_env_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        let env = env_from(&[
            ("PORT", "8080"),
            ("DATABASE_PATH", "/tmp/reviews.db"),
            ("DUE_PAGE_SIZE", "5"),
        ]);
        let config = Config::load_from(&temp.path().join("missing.toml"), env);

        assert_eq!(config.server_port, 8080);
        assert_eq!(config.database_path, PathBuf::from("/tmp/reviews.db"));
        assert_eq!(config.srs.due_page_size, 5);
    }

    #[test]
    fn test_file_takes_priority_over_env() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            [server]
            port = 4000

            [database]
            path = "data/from-file.db"

            [srs]
            history_capacity = 5
            "#,
        )
        .unwrap();

        let config = Config::load_from(&path, env_from(&[("PORT", "8080")]));

        assert_eq!(config.server_port, 4000);
        assert_eq!(config.database_path, PathBuf::from("data/from-file.db"));
        assert_eq!(config.srs.history_capacity, 5);
        assert_eq!(config.srs.due_page_size, DUE_PAGE_SIZE);
    }

    #[test]
    fn test_zero_page_size_falls_back() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from(
            &temp.path().join("missing.toml"),
            env_from(&[("DUE_PAGE_SIZE", "0")]),
        );
        assert_eq!(config.srs.due_page_size, DUE_PAGE_SIZE);
    }
}
