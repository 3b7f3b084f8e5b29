//! Logger error type
//!
//! Emission never returns these; only flush, strict key/value parsing,
//! configuration and appender construction do.

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// I/O failure with what was being done and to which target
    #[error("IO error while {operation} ({target}): {source}")]
    IoOperation {
        operation: String,
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A flat key/value list whose last key has no value
    #[error("odd number of key/value elements ({count}), last key is unpaired")]
    OddKeyValues { count: usize },

    /// The async worker is gone
    #[error("logger worker has stopped")]
    LoggerStopped,

    #[error("invalid {field}: {message}")]
    InvalidConfiguration { field: String, message: String },

    #[error("writer error: {0}")]
    WriterError(String),

    /// The async queue is closed
    #[error("async worker queue is closed")]
    ChannelSendError,

    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    pub fn io_operation(
        operation: impl Into<String>,
        target: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            target: target.into(),
            source,
        }
    }

    pub fn odd_key_values(count: usize) -> Self {
        LoggerError::OddKeyValues { count }
    }

    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn writer(message: impl Into<String>) -> Self {
        LoggerError::WriterError(message.into())
    }

    pub fn other(message: impl Into<String>) -> Self {
        LoggerError::Other(message.into())
    }
}
