//! Logging setup
//!
//! `tracing-subscriber` registry with an env filter and a single fmt layer,
//! pretty or JSON. Output goes to stderr or to a file, never to stdout,
//! which is reserved for command output.

use std::fs::OpenOptions;
use std::sync::Mutex;
use thiserror::Error;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("Failed to open log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to install subscriber: {0}")]
    Init(String),
}

/// Filter directive for the configured level
///
/// `RUST_LOG`, when set, wins over the config file.
pub fn filter_directive(config: &LoggingConfig) -> String {
    format!("customer_analyzer={}", config.level.trim().to_lowercase())
}

/// Install the global subscriber
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(filter_directive(config))
            .map_err(|e| LoggingError::Filter(e.to_string()))?,
    };

    let to_file = config.file.is_some();
    let writer = match &config.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(!to_file);
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.format.eq_ignore_ascii_case("json") {
        registry.with(layer.json()).try_init()
    } else {
        registry.with(layer).try_init()
    };

    installed.map_err(|e| LoggingError::Init(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        let config = LoggingConfig {
            level: " DEBUG ".to_string(),
            ..LoggingConfig::default()
        };
        assert_eq!(filter_directive(&config), "customer_analyzer=debug");
    }

    #[test]
    fn test_directive_is_valid_filter() {
        let config = LoggingConfig::default();
        assert!(EnvFilter::try_new(filter_directive(&config)).is_ok());
    }
}
