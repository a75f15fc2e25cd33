//! Application configuration
//!
//! This module handles process-wide settings that are known before any
//! subcommand runs.

/// Environment variable holding an explicit tracing filter
pub const LOG_FILTER_ENV: &str = "PROBCALC_LOG";

/// Application configuration structure
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Verbosity level for logging
    pub verbose: u8,
    /// Explicit filter directive, overrides `verbose` when set
    pub log_filter: Option<String>,
}

impl AppConfig {
    /// Create a new application configuration
    pub fn new(verbose: u8) -> Self {
        Self {
            verbose,
            log_filter: std::env::var(LOG_FILTER_ENV)
                .ok()
                .filter(|filter| !filter.trim().is_empty()),
        }
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    /// Get the log level string based on verbosity
    pub fn log_level(&self) -> &str {
        if let Some(filter) = &self.log_filter {
            return filter;
        }

        match self.verbose {
            0 => "info",
            1 => "debug",
            2 => "trace",
            _ => "trace,hyper=debug,tower=debug",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_follows_verbosity() {
        let levels: Vec<String> = (0..4)
            .map(|verbose| {
                AppConfig {
                    verbose,
                    log_filter: None,
                }
                .log_level()
                .to_string()
            })
            .collect();

        assert_eq!(
            levels,
            vec!["info", "debug", "trace", "trace,hyper=debug,tower=debug"]
        );
    }

    #[test]
    fn test_explicit_filter_wins() {
        let config = AppConfig::default().with_log_filter("probcalc=debug,sqlx=warn");
        assert_eq!(config.log_level(), "probcalc=debug,sqlx=warn");
    }
}
