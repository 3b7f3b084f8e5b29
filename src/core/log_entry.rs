//! Log entry structure

use super::log_context::KeyValues;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use std::cell::RefCell;

// Thread-local caches for thread information to avoid repeated allocations
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
    static THREAD_NAME_CACHE: RefCell<Option<Option<String>>> = const { RefCell::new(None) };
}

/// Get cached thread ID, computing and caching it on first access
fn get_thread_id() -> String {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| format!("{:?}", std::thread::current().id()))
            .clone()
    })
}

/// Get cached thread name, computing and caching it on first access
fn get_thread_name() -> Option<String> {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| std::thread::current().name().map(String::from))
            .clone()
    })
}

/// One formatted-to-be record
///
/// `key_values` already holds the bound pairs followed by the call-site
/// pairs.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    /// Verbosity the record was emitted at (0 for ungated calls)
    pub verbosity: i32,
    pub logger_name: Option<String>,
    pub message: String,
    pub error: Option<String>,
    pub key_values: KeyValues,
    pub timestamp: DateTime<Utc>,
    pub thread_id: String,
    pub thread_name: Option<String>,
}

impl LogEntry {
    /// Sanitize text to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// so one record always stays on one line.
    fn sanitize(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            verbosity: 0,
            logger_name: None,
            message: Self::sanitize(&message.into()),
            error: None,
            key_values: KeyValues::new(),
            timestamp: Utc::now(),
            thread_id: get_thread_id(),
            thread_name: get_thread_name(),
        }
    }

    pub fn with_verbosity(mut self, verbosity: i32) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set the joined logger name; sanitized like the message
    pub fn with_logger_name(mut self, name: Option<String>) -> Self {
        self.logger_name = name.map(|name| Self::sanitize(&name));
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(Self::sanitize(&error.into()));
        self
    }

    pub fn with_key_values(mut self, key_values: KeyValues) -> Self {
        self.key_values = key_values;
        self
    }

    /// Thread name if set, otherwise the thread id
    pub fn thread_label(&self) -> &str {
        self.thread_name.as_deref().unwrap_or(&self.thread_id)
    }
}
