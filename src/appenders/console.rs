//! Console appender implementation

use crate::core::output_format::{klog_line, text_line};
use crate::core::{Appender, LogEntry, OutputFormat, Result, TimestampFormat};
#[cfg(feature = "console")]
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Standard stream the console appender writes to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleTarget {
    #[default]
    Stderr,
    Stdout,
}

/// Writes every record as one line to stderr (or stdout)
pub struct ConsoleAppender {
    use_colors: bool,
    target: ConsoleTarget,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self {
            use_colors: cfg!(feature = "console"),
            target: ConsoleTarget::default(),
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::default(),
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            ..Self::new()
        }
    }

    /// Select the stream to write to
    ///
    /// # Example
    ///
    /// ```
    /// use rust_contextual_logger::appenders::{ConsoleAppender, ConsoleTarget};
    ///
    /// let appender = ConsoleAppender::new().with_target(ConsoleTarget::Stdout);
    /// ```
    #[must_use]
    pub fn with_target(mut self, target: ConsoleTarget) -> Self {
        self.target = target;
        self
    }

    /// Set the output format for this appender
    ///
    /// # Example
    ///
    /// ```
    /// use rust_contextual_logger::appenders::ConsoleAppender;
    /// use rust_contextual_logger::OutputFormat;
    ///
    /// let appender = ConsoleAppender::new()
    ///     .with_output_format(OutputFormat::Json);
    /// ```
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Format as text with optional colors
    fn format_text(&self, entry: &LogEntry) -> String {
        let level_tag = format!("{:5}", entry.level.to_str());

        #[cfg(feature = "console")]
        let level_tag = if self.use_colors {
            level_tag.color(entry.level.color_code()).to_string()
        } else {
            level_tag
        };

        text_line(entry, &self.timestamp_format, &level_tag)
    }

    /// klog header with the severity letter colored
    fn format_klog(&self, entry: &LogEntry) -> String {
        let severity = entry.level.short().to_string();

        #[cfg(feature = "console")]
        let severity = if self.use_colors {
            severity.color(entry.level.color_code()).to_string()
        } else {
            severity
        };

        klog_line(entry, &severity)
    }

    fn write_line(&self, line: &str) -> std::io::Result<()> {
        // One locked write per record keeps concurrent lines whole
        match self.target {
            ConsoleTarget::Stderr => writeln!(std::io::stderr().lock(), "{}", line),
            ConsoleTarget::Stdout => writeln!(std::io::stdout().lock(), "{}", line),
        }
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let output = match self.output_format {
            OutputFormat::Text => self.format_text(entry),
            OutputFormat::Klog => self.format_klog(entry),
            OutputFormat::Json => self.output_format.format(entry, &self.timestamp_format),
        };

        self.write_line(&output)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        match self.target {
            ConsoleTarget::Stderr => std::io::stderr().flush()?,
            ConsoleTarget::Stdout => std::io::stdout().flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
