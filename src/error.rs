use thiserror::Error;

use crate::probability::{FormulaError, StorageError};

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Formula error: {0}")]
    Formula(#[from] FormulaError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl Error {
    /// Process exit code for a fatal error of this kind
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) | Error::Toml(_) => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
