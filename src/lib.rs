//! # Rust Contextual Logger
//!
//! A structured, leveled logger built around immutable logger handles.
//!
//! ## Features
//!
//! - **Named loggers**: `with_name` builds hierarchical names (`parent.child`)
//! - **Bound context**: `with_values` attaches key/value pairs to every record
//!   of the derived handle, in insertion order
//! - **Verbosity gating**: `v(n).info(..)` emits only when `n <= threshold`;
//!   the threshold is shared and can change at runtime
//! - **Error records**: `error(Some(&err), ..)` adds the error text
//! - **Thread Safe**: one serialized sink, synchronous or worker-backed
//!
//! ```
//! use rust_contextual_logger::prelude::*;
//!
//! let logger = Logger::builder().verbosity(3).build();
//! let log = logger.with_name("TestName").with_values(kv!["pod" => "192.168.0.1"]);
//!
//! log.info("hello", kv!["val1" => 1]);
//! log.v(4).info("nice to meet you", ()); // below threshold: nothing written
//! logger.flush().ok();
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, ConsoleTarget, SharedBuffer, WriterAppender};
    pub use crate::core::{
        Appender, FieldValue, KeyValues, LogEntry, LogLevel, Logger, LoggerBuilder, LoggerConfig,
        LoggerContext, LoggerError, LoggerMetrics, MetricsSnapshot, OutputFormat, Result,
        TimestampFormat, Verbose, Verbosity, DEFAULT_SHUTDOWN_TIMEOUT,
    };
    pub use crate::kv;
}

pub use crate::appenders::{ConsoleAppender, ConsoleTarget, SharedBuffer, WriterAppender};
pub use crate::core::{
    Appender, FieldValue, KeyValues, LogEntry, LogLevel, Logger, LoggerBuilder, LoggerConfig,
    LoggerContext, LoggerError, LoggerMetrics, MetricsSnapshot, OutputFormat, Result,
    TimestampFormat, Verbose, Verbosity, DEFAULT_SHUTDOWN_TIMEOUT, DEFAULT_VERBOSITY,
    MISSING_VALUE, NAME_SEPARATOR,
};
