//! Declarative logger configuration
//!
//! Every field has a default, so a partial document (or `{}`) is valid.

use super::error::{LoggerError, Result};
use super::output_format::OutputFormat;
use super::timestamp::TimestampFormat;
use super::verbosity::DEFAULT_VERBOSITY;
use crate::appenders::ConsoleTarget;
use serde::{Deserialize, Serialize};

fn default_colors() -> bool {
    cfg!(feature = "console")
}

/// Settings applied by [`LoggerBuilder::config`](crate::LoggerBuilder::config)
///
/// # Example
///
/// ```
/// use rust_contextual_logger::{LoggerConfig, OutputFormat};
///
/// let config = LoggerConfig::from_json_str(r#"{"verbosity": 3, "format": "json"}"#).unwrap();
/// assert_eq!(config.verbosity, 3);
/// assert_eq!(config.format, OutputFormat::Json);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    pub verbosity: i32,
    pub format: OutputFormat,
    pub timestamp_format: TimestampFormat,
    pub colors: bool,
    pub target: ConsoleTarget,
    /// Queue capacity for async delivery; `None` writes synchronously
    pub async_buffer: Option<usize>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            verbosity: DEFAULT_VERBOSITY,
            format: OutputFormat::default(),
            timestamp_format: TimestampFormat::default(),
            colors: default_colors(),
            target: ConsoleTarget::default(),
            async_buffer: None,
        }
    }
}

impl LoggerConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LoggerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.async_buffer == Some(0) {
            return Err(LoggerError::config(
                "async_buffer",
                "queue capacity must be at least 1",
            ));
        }
        Ok(())
    }
}
