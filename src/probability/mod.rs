//! Probability calculator with an audit trail
//!
//! Each request is validated and evaluated by a pure formula evaluator; a
//! successful result is appended to a SQLite audit log in the background while
//! the response goes straight back to the client.

pub mod api_server;
pub mod evaluator;
pub mod models;
pub mod persistence;

pub use api_server::ProbabilityApiServer;
pub use evaluator::{evaluate, validate, FormulaError};
pub use models::*;
pub use persistence::{AuditRecorder, StorageError};
