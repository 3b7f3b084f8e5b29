//! Appender trait for the log sink

use super::{error::Result, log_entry::LogEntry};

/// Destination that formats and writes records
///
/// A logger owns exactly one appender and serializes calls to it, so
/// implementations never see two `append` calls at once.
pub trait Appender: Send {
    fn append(&mut self, entry: &LogEntry) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
