use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Settings for the HTTP server and its audit log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 3000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// SQLite file holding the audit log
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Directory served for any path outside the API; `None` disables it
    #[serde(default = "default_static_dir")]
    pub static_dir: Option<PathBuf>,

    /// Label stored in the `chapter` column of every record
    #[serde(default = "default_chapter")]
    pub chapter: String,

    /// Records returned by the history endpoint when no limit is given
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,

    /// Upper bound for a client-supplied history limit
    #[serde(default = "default_max_history_limit")]
    pub max_history_limit: u32,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_database_path() -> PathBuf {
    PathBuf::from("history.db")
}

fn default_static_dir() -> Option<PathBuf> {
    Some(PathBuf::from("public"))
}

fn default_chapter() -> String {
    "Chapter 1".to_string()
}

fn default_history_limit() -> u32 {
    20
}

fn default_max_history_limit() -> u32 {
    100
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_path: default_database_path(),
            static_dir: default_static_dir(),
            chapter: default_chapter(),
            history_limit: default_history_limit(),
            max_history_limit: default_max_history_limit(),
        }
    }
}

impl ServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_history_limit == 0 {
            return Err(Error::Config(
                "max_history_limit must be at least 1".to_string(),
            ));
        }
        if self.history_limit == 0 || self.history_limit > self.max_history_limit {
            return Err(Error::Config(format!(
                "history_limit must be between 1 and {}, got {}",
                self.max_history_limit, self.history_limit
            )));
        }
        if self.chapter.trim().is_empty() {
            return Err(Error::Config("chapter must not be empty".to_string()));
        }
        Ok(())
    }
}
