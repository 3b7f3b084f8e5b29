//! Logging macros for ergonomic key/value lists and message formatting.
//!
//! The message takes `format!` arguments; key/value pairs follow a `;`.
//! Formatting is skipped entirely for a disabled `v(n)` handle.
//!
//! # Examples
//!
//! ```
//! use rust_contextual_logger::prelude::*;
//! use rust_contextual_logger::{error, info};
//!
//! let logger = Logger::builder().verbosity(2).build();
//! let log = logger.with_name("server");
//!
//! info!(log, "Server started");
//! info!(log, "Listening on port {}", 8080; "tls" => false);
//! info!(log.v(5), "Very chatty: {}", "hidden");
//! error!(log, None, "uh oh"; "trouble" => true);
//! ```

/// Build a [`KeyValues`](crate::KeyValues) from `key => value` pairs.
///
/// # Examples
///
/// ```
/// use rust_contextual_logger::kv;
///
/// let kvs = kv!["pod" => "192.168.0.1", "container" => 4];
/// assert_eq!(kvs.format_fields(), "pod=192.168.0.1 container=4");
/// assert!(kv![].is_empty());
/// ```
#[macro_export]
macro_rules! kv {
    () => {
        $crate::KeyValues::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::KeyValues::new()$(.with($key, $value))+
    };
}

/// Log an info-level message on a `Logger` or a `v(n)` handle.
///
/// # Examples
///
/// ```
/// # use rust_contextual_logger::prelude::*;
/// # let logger = Logger::new();
/// use rust_contextual_logger::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100; "batch" => 7);
/// info!(logger.v(1), "Only shown with verbosity >= 1");
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
        let logger = &$logger;
        if logger.enabled() {
            logger.info(format!($fmt $(, $arg)*), $crate::KeyValues::new());
        }
    }};
    ($logger:expr, $fmt:literal $(, $arg:expr)* ; $($key:expr => $value:expr),+ $(,)?) => {{
        let logger = &$logger;
        if logger.enabled() {
            logger.info(format!($fmt $(, $arg)*), $crate::kv!($($key => $value),+));
        }
    }};
}

/// Log an error-level message; the second argument is an
/// `Option<&dyn std::error::Error>`.
///
/// # Examples
///
/// ```
/// # use rust_contextual_logger::prelude::*;
/// # let logger = Logger::new();
/// use rust_contextual_logger::error;
/// let err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
/// error!(logger, Some(&err), "Write failed"; "path" => "/tmp/x");
/// error!(logger, None, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $err:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $logger.error($err, format!($fmt $(, $arg)*), $crate::KeyValues::new())
    };
    ($logger:expr, $err:expr, $fmt:literal $(, $arg:expr)* ; $($key:expr => $value:expr),+ $(,)?) => {
        $logger.error($err, format!($fmt $(, $arg)*), $crate::kv!($($key => $value),+))
    };
}
