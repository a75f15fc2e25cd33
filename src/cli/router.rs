//! Command routing and execution
//!
//! This module handles routing CLI commands to their respective implementations.

use anyhow::Result;

use crate::app::runtime;
use crate::cli::args::{Commands, ServeArgs};
use crate::config::load_server_config;

/// Execute a CLI command based on the parsed arguments
pub async fn execute_command(command: Option<Commands>) -> Result<()> {
    match command.unwrap_or_else(|| Commands::Serve(ServeArgs::default())) {
        Commands::Serve(args) => {
            let mut config = load_server_config(args.config.as_deref())?;
            args.apply(&mut config);
            runtime::serve(config).await
        }
        Commands::History {
            config,
            database,
            limit,
        } => {
            let mut config = load_server_config(config.as_deref())?;
            if let Some(database) = database {
                config.database_path = database;
            }
            let limit = limit.unwrap_or(config.history_limit);
            runtime::print_history(&config, limit).await
        }
    }
}
