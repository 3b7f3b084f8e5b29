//! Core logger types and traits

pub mod appender;
pub mod config;
pub mod error;
pub mod log_context;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod timestamp;
pub mod verbosity;

pub use appender::Appender;
pub use config::LoggerConfig;
pub use error::{LoggerError, Result};
pub use log_context::{FieldValue, KeyValues, LoggerContext, MISSING_VALUE, NAME_SEPARATOR};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder, Verbose, DEFAULT_SHUTDOWN_TIMEOUT};
pub use metrics::{LoggerMetrics, MetricsSnapshot};
pub use output_format::OutputFormat;
pub use timestamp::TimestampFormat;
pub use verbosity::{Verbosity, DEFAULT_VERBOSITY};
