//! Configuration for the probcalc server
//!
//! Precedence, lowest first: built-in defaults, `probcalc.toml` (or the file
//! passed with `--config`), `PROBCALC_*` environment variables, CLI flags.

pub mod loader;
pub mod server_config;

pub use loader::{load_server_config, DEFAULT_CONFIG_FILE};
pub use server_config::ServerConfig;
