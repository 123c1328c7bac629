//! # Logging
//!
//! Structured logging for the `resmodel` binary and for embedders that want
//! the same output shape.
//!
//! The library itself only emits `tracing` events (model summaries at
//! `debug`, diagnostics at `warn` when a [`TracingSink`](crate::diagnostics::TracingSink)
//! is used). This module installs a `tracing-subscriber` stack that renders
//! them.
//!
//! ## Environment Variables
//!
//! - `RESMODEL_LOG_LEVEL`: `trace`, `debug`, `info`, `warn` or `error` (default `warn`)
//! - `RESMODEL_LOG_FORMAT`: `json` or `pretty` (default `pretty`)
//! - `RESMODEL_LOG_TARGET_FILTER`: extra comma-separated `EnvFilter` directives
//! - `RESMODEL_LOG_INCLUDE_LOCATION`: `true` to add file and line to each event
//!
//! `RUST_LOG`, when set, takes precedence over `RESMODEL_LOG_LEVEL`.
//!
//! Output goes to stderr so that models written to stdout stay parseable.

use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    /// Comma-separated `EnvFilter` directives added on top of the level.
    pub target_filter: Option<String>,
    pub include_location: bool,
}

impl LogConfig {
    /// Read configuration from the environment, with defaults.
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("RESMODEL_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string()),
            format: LogFormat::parse(
                &env::var("RESMODEL_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            ),
            target_filter: env::var("RESMODEL_LOG_TARGET_FILTER").ok(),
            include_location: env::var("RESMODEL_LOG_INCLUDE_LOCATION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
        }
    }

    /// Verbose configuration for local debugging.
    pub fn default_dev() -> Self {
        Self {
            log_level: "debug".to_string(),
            format: LogFormat::Pretty,
            target_filter: None,
            include_location: true,
        }
    }

    pub fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "error" => Level::ERROR,
            _ => Level::WARN,
        }
    }

    /// The filter this configuration installs, before `RUST_LOG` is
    /// consulted. Invalid directives are skipped with a warning on stderr.
    pub fn env_filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::new(self.level().as_str());
        if let Some(target_filter) = &self.target_filter {
            for directive in target_filter.split(',').map(str::trim).filter(|d| !d.is_empty()) {
                match directive.parse() {
                    Ok(d) => filter = filter.add_directive(d),
                    Err(_) => eprintln!("Warning: Invalid log filter directive: {directive}"),
                }
            }
        }
        filter
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig::from_env()
    }
}

/// Install the global subscriber described by `config`.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
///
/// # Example
///
/// ```no_run
/// use resmodel::logging::{init_logging_with_config, LogConfig};
///
/// init_logging_with_config(&LogConfig::from_env()).expect("logging");
/// ```
pub fn init_logging_with_config(config: &LogConfig) -> Result<()> {
    let env_filter = if env::var_os("RUST_LOG").is_some() {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| config.env_filter())
    } else {
        config.env_filter()
    };

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")
}

/// Shorthand for [`init_logging_with_config`] with [`LogConfig::from_env`]
/// and an explicit level.
pub fn init_logging(log_level: &str) -> Result<()> {
    let mut config = LogConfig::from_env();
    config.log_level = log_level.to_string();
    init_logging_with_config(&config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_default_dev() {
        let config = LogConfig::default_dev();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.include_location);
        assert_eq!(config.level(), Level::DEBUG);
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("invalid"), LogFormat::Pretty);
    }

    #[test]
    fn test_unknown_level_falls_back_to_warn() {
        let config = LogConfig {
            log_level: "loud".into(),
            ..LogConfig::default_dev()
        };
        assert_eq!(config.level(), Level::WARN);
    }

    #[test]
    fn test_env_filter_skips_bad_directives() {
        let config = LogConfig {
            target_filter: Some("resmodel::modeller=trace, ,[[bad".into()),
            ..LogConfig::default_dev()
        };
        let rendered = config.env_filter().to_string();
        assert!(rendered.contains("resmodel::modeller=trace"));
    }
}
