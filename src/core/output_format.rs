//! Output format configuration for log entries
//!
//! Provides different output formats for log entries:
//! - Text: Human-readable single line with `key=value` tokens (default)
//! - Json: Machine-readable JSON object per line
//! - Klog: klog-style header (`I0108 10:30:45.123456 thread] ...`)

use super::log_context::escape_text;
use super::log_entry::LogEntry;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Keys written by the JSON format itself; pairs using them are not
/// allowed to replace them.
const JSON_RESERVED_KEYS: [&str; 6] = ["ts", "level", "v", "logger", "msg", "err"];

/// Output format for log entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text format (default)
    ///
    /// Example: `[2025-01-08T10:30:45.123Z] [INFO ] main - TestName: hello pod=192.168.0.1`
    #[default]
    Text,

    /// JSON format for machine processing
    ///
    /// Example: `{"level":"INFO","logger":"TestName","msg":"hello","pod":"192.168.0.1","ts":"...","v":0}`
    Json,

    /// klog header layout: severity letter, month/day and microsecond wall
    /// clock, thread, then the same body as `Text`
    ///
    /// Example: `I0108 10:30:45.123456 main] TestName: hello pod=192.168.0.1`
    ///
    /// The header always uses [`TimestampFormat::Header`].
    Klog,
}

impl OutputFormat {
    /// Format a log entry according to this output format
    pub fn format(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
        match self {
            OutputFormat::Text => text_line(entry, timestamp_format, entry.level.to_str()),
            OutputFormat::Json => self.format_json(entry, timestamp_format),
            OutputFormat::Klog => klog_line(entry, &entry.level.short().to_string()),
        }
    }

    /// Format as JSON
    fn format_json(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
        let mut json_obj = serde_json::Map::new();

        let timestamp = if timestamp_format.is_numeric() {
            match timestamp_format {
                TimestampFormat::Unix => serde_json::Value::from(entry.timestamp.timestamp()),
                _ => serde_json::Value::from(entry.timestamp.timestamp_millis()),
            }
        } else {
            serde_json::Value::String(timestamp_format.format(&entry.timestamp))
        };
        json_obj.insert("ts".to_string(), timestamp);

        json_obj.insert(
            "level".to_string(),
            serde_json::Value::String(entry.level.to_str().to_string()),
        );
        json_obj.insert("v".to_string(), serde_json::Value::from(entry.verbosity));

        if let Some(ref name) = entry.logger_name {
            json_obj.insert("logger".to_string(), serde_json::Value::String(name.clone()));
        }

        json_obj.insert(
            "msg".to_string(),
            serde_json::Value::String(entry.message.clone()),
        );

        if let Some(ref err) = entry.error {
            json_obj.insert("err".to_string(), serde_json::Value::String(err.clone()));
        }

        for (key, value) in entry.key_values.iter() {
            if JSON_RESERVED_KEYS.contains(&key) {
                continue;
            }
            json_obj.insert(key.to_string(), value.to_json_value());
        }

        serde_json::to_string(&serde_json::Value::Object(json_obj)).unwrap_or_default()
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "klog" => Ok(OutputFormat::Klog),
            _ => Err(format!("Invalid output format: '{}'", s)),
        }
    }
}

/// Build the text line with a caller supplied level tag (plain or colored)
pub(crate) fn text_line(
    entry: &LogEntry,
    timestamp_format: &TimestampFormat,
    level_tag: &str,
) -> String {
    let mut line = format!(
        "[{}] [{:5}] {} - ",
        timestamp_format.format(&entry.timestamp),
        level_tag,
        entry.thread_label()
    );
    push_body(&mut line, entry);
    line
}

/// Build the klog header line; `severity` is the (possibly colored) letter
pub(crate) fn klog_line(entry: &LogEntry, severity: &str) -> String {
    let mut line = format!(
        "{}{} {}] ",
        severity,
        TimestampFormat::Header.format(&entry.timestamp),
        entry.thread_label()
    );
    push_body(&mut line, entry);
    line
}

/// `name: message err=".." k=v ...`, shared by the text layouts
fn push_body(line: &mut String, entry: &LogEntry) {
    if let Some(ref name) = entry.logger_name {
        line.push_str(name);
        line.push_str(": ");
    }
    line.push_str(&entry.message);

    if let Some(ref err) = entry.error {
        line.push_str(" err=");
        line.push_str(&escape_text(err));
    }

    if !entry.key_values.is_empty() {
        line.push(' ');
        line.push_str(&entry.key_values.format_fields());
    }
}
