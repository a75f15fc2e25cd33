//! CLI argument structures
//!
//! This module defines all command-line interface structures used by probcalc.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ServerConfig;

/// Probability calculator API with an audit trail
#[derive(Parser)]
#[command(name = "probcalc")]
#[command(about = "probcalc - Probability formulas over HTTP with a durable audit log", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server (default command)
    #[command(name = "serve")]
    Serve(ServeArgs),

    /// Print the most recent audit records as JSON
    #[command(name = "history")]
    History {
        /// Path to configuration file
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,

        /// SQLite audit database
        #[arg(long)]
        database: Option<PathBuf>,

        /// Number of records to print (default: configured history limit)
        #[arg(short = 'n', long)]
        limit: Option<u32>,
    },
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// SQLite audit database
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// Directory of static files served outside /api
    #[arg(long, conflicts_with = "no_static")]
    pub static_dir: Option<PathBuf>,

    /// Do not serve static files
    #[arg(long)]
    pub no_static: bool,
}

impl ServeArgs {
    /// Apply flags on top of a loaded config
    pub fn apply(&self, config: &mut ServerConfig) {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(database) = &self.database {
            config.database_path = database.clone();
        }
        if let Some(static_dir) = &self.static_dir {
            config.static_dir = Some(static_dir.clone());
        }
        if self.no_static {
            config.static_dir = None;
        }
    }
}
