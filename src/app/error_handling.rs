//! Error handling utilities
//!
//! This module provides centralized error handling for the application.

use tracing::error;

/// Handle fatal errors and exit with appropriate status code
///
/// - Configuration errors exit with 2, everything else with 1
/// - `verbose >= 1` also prints the full error chain
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    error!("Fatal error: {}", error);
    eprintln!("Error: {error}");

    if verbose >= 1 {
        eprintln!("\nError chain:");
        for (i, cause) in error.chain().enumerate() {
            eprintln!("  {}: {}", i, cause);
        }
    }

    std::process::exit(exit_code(&error))
}

pub fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<crate::error::Error>()
        .map_or(1, crate::error::Error::exit_code)
}
