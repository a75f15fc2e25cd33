//! # probcalc
//!
//! Elementary probability formulas served over HTTP, with every successful
//! computation appended to a SQLite audit log.
//!
//! ## Usage
//!
//! ```bash
//! probcalc serve [--port 3000] [--database history.db]
//! probcalc history [-n 20]
//! ```
//!
//! ## Modules
//!
//! - `app` - Logging setup, fatal error handling, runtime entry points
//! - `cli` - Argument parsing and command routing
//! - `config` - Layered server configuration (defaults, TOML, environment)
//! - `error` - Crate-level error type
//! - `probability` - Formula evaluator, audit recorder, and the REST API
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod probability;
