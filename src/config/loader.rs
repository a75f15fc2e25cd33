use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::ServerConfig;
use crate::error::{Error, Result};

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "probcalc.toml";

pub const ENV_HOST: &str = "PROBCALC_HOST";
pub const ENV_PORT: &str = "PROBCALC_PORT";
pub const ENV_DATABASE: &str = "PROBCALC_DATABASE";
pub const ENV_STATIC_DIR: &str = "PROBCALC_STATIC_DIR";
pub const ENV_CHAPTER: &str = "PROBCALC_CHAPTER";

/// Load the server config: defaults, then the config file, then environment.
///
/// An explicit `path` must exist. Without one, `probcalc.toml` in the working
/// directory is used when present.
pub fn load_server_config(path: Option<&Path>) -> Result<ServerConfig> {
    let mut config = match resolve_config_path(path)? {
        Some(path) => {
            let content = std::fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read {}: {}", path.display(), e))
            })?;
            debug!("Loaded configuration from {}", path.display());
            ServerConfig::from_toml_str(&content)?
        }
        None => ServerConfig::default(),
    };

    config.merge_env_vars();
    Ok(config)
}

fn resolve_config_path(path: Option<&Path>) -> Result<Option<PathBuf>> {
    match path {
        Some(path) if path.is_file() => Ok(Some(path.to_path_buf())),
        Some(path) => Err(Error::Config(format!(
            "Config file {} does not exist",
            path.display()
        ))),
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
            Ok(fallback.is_file().then_some(fallback))
        }
    }
}

impl ServerConfig {
    pub fn merge_env_vars(&mut self) {
        self.merge_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`, keyed by the `PROBCALC_*` variable names
    pub fn merge_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST) {
            self.host = host;
        }

        if let Some(port) = lookup(ENV_PORT) {
            match port.parse::<u16>() {
                Ok(value) => self.port = value,
                Err(_) => warn!("Ignoring invalid {}={}", ENV_PORT, port),
            }
        }

        if let Some(database) = lookup(ENV_DATABASE) {
            self.database_path = PathBuf::from(database);
        }

        // An empty value turns static file serving off
        if let Some(static_dir) = lookup(ENV_STATIC_DIR) {
            self.static_dir = (!static_dir.is_empty()).then(|| PathBuf::from(static_dir));
        }

        if let Some(chapter) = lookup(ENV_CHAPTER) {
            self.chapter = chapter;
        }
    }
}
