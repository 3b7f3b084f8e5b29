//! Main logger implementation
//!
//! A [`Logger`] is a cheap handle: an immutable [`LoggerContext`], the shared
//! [`Verbosity`] and the shared sink. Deriving a child logger copies the
//! context and shares the rest.

use super::{
    appender::Appender,
    config::LoggerConfig,
    error::{LoggerError, Result},
    log_context::{KeyValues, LoggerContext},
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    output_format::OutputFormat,
    timestamp::TimestampFormat,
    verbosity::Verbosity,
};
use crate::appenders::{ConsoleAppender, ConsoleTarget};
use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::Mutex;
use std::fmt;
use std::io::Write;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Default shutdown timeout for logger cleanup (5 seconds)
///
/// Used when the last handle is dropped while the async worker still has
/// records queued.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Maximum number of records the async worker writes between flushes
const BATCH_SIZE: usize = 50;

type SharedAppender = Arc<Mutex<Box<dyn Appender>>>;

enum Command {
    Write(LogEntry),
    Flush(Sender<Result<()>>),
}

/// Internal diagnostics go to stderr; a write failure there is ignored
fn report(args: fmt::Arguments<'_>) {
    report_to(std::io::stderr(), args);
}

fn report_to(mut out: impl Write, args: fmt::Arguments<'_>) {
    let _ = writeln!(out, "{}", args);
}

/// Run an appender operation, turning errors and panics into a reported
/// `Err` so a broken sink never unwinds into caller code.
fn guarded(action: &str, op: impl FnOnce() -> Result<()>) -> Result<()> {
    match catch_unwind(AssertUnwindSafe(op)) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            report(format_args!(
                "[LOGGER ERROR] Appender {} failed: {}",
                action, e
            ));
            Err(e)
        }
        Err(panic_info) => {
            let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            report(format_args!(
                "[LOGGER CRITICAL] Appender panicked during {}: {}",
                action, panic_msg
            ));
            Err(LoggerError::other(format!(
                "appender panicked during {}: {}",
                action, panic_msg
            )))
        }
    }
}

fn write_entry(appender: &mut Box<dyn Appender>, entry: &LogEntry, metrics: &LoggerMetrics) {
    match guarded("append", || appender.append(entry)) {
        Ok(()) => {
            metrics.record_logged();
        }
        Err(_) => {
            metrics.record_dropped();
        }
    }
}

fn flush_appender(appender: &mut Box<dyn Appender>, metrics: &LoggerMetrics) -> Result<()> {
    let result = guarded("flush", || appender.flush());
    if result.is_err() {
        metrics.record_flush_failure();
    }
    result
}

/// The single shared output: one appender plus, in async mode, the worker
/// thread that drains the queue into it.
struct Sink {
    appender: SharedAppender,
    sender: Option<Sender<Command>>,
    worker: Option<thread::JoinHandle<()>>,
    metrics: Arc<LoggerMetrics>,
}

impl Sink {
    fn sync(appender: Box<dyn Appender>) -> Self {
        Self {
            appender: Arc::new(Mutex::new(appender)),
            sender: None,
            worker: None,
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }

    fn with_worker(appender: Box<dyn Appender>, buffer_size: usize) -> Self {
        let (sender, receiver) = bounded(buffer_size.max(1));
        let appender: SharedAppender = Arc::new(Mutex::new(appender));
        let metrics = Arc::new(LoggerMetrics::new());

        let worker_appender = Arc::clone(&appender);
        let worker_metrics = Arc::clone(&metrics);
        let worker = thread::Builder::new()
            .name("logger-worker".to_string())
            .spawn(move || Self::run_worker(receiver, worker_appender, worker_metrics));

        match worker {
            Ok(handle) => Self {
                appender,
                sender: Some(sender),
                worker: Some(handle),
                metrics,
            },
            Err(e) => {
                report(format_args!(
                    "[LOGGER ERROR] Failed to spawn async worker, logging synchronously: {}",
                    e
                ));
                Self {
                    appender,
                    sender: None,
                    worker: None,
                    metrics,
                }
            }
        }
    }

    /// Worker loop: commands are handled strictly in arrival order, so a
    /// flush marker is acknowledged only after every earlier record.
    fn run_worker(receiver: Receiver<Command>, appender: SharedAppender, metrics: Arc<LoggerMetrics>) {
        let mut batch = Vec::with_capacity(BATCH_SIZE);

        while let Ok(command) = receiver.recv() {
            batch.push(command);
            while batch.len() < BATCH_SIZE {
                match receiver.try_recv() {
                    Ok(command) => batch.push(command),
                    Err(_) => break,
                }
            }

            let mut guard = appender.lock();
            for command in batch.drain(..) {
                match command {
                    Command::Write(entry) => write_entry(&mut guard, &entry, &metrics),
                    Command::Flush(ack) => {
                        let _ = ack.send(flush_appender(&mut guard, &metrics));
                    }
                }
            }
            let _ = flush_appender(&mut guard, &metrics);
        }
    }

    fn write(&self, entry: LogEntry) {
        match self.sender {
            Some(ref sender) => {
                // A full queue blocks the caller instead of losing the record
                if sender.send(Command::Write(entry)).is_err() {
                    self.metrics.record_dropped();
                }
            }
            None => {
                let mut appender = self.appender.lock();
                write_entry(&mut appender, &entry, &self.metrics);
            }
        }
    }

    fn flush(&self) -> Result<()> {
        match self.sender {
            Some(ref sender) => {
                let (ack_tx, ack_rx) = bounded(1);
                if sender.send(Command::Flush(ack_tx)).is_err() {
                    self.metrics.record_flush_failure();
                    return Err(LoggerError::ChannelSendError);
                }
                ack_rx.recv().unwrap_or_else(|_| {
                    self.metrics.record_flush_failure();
                    Err(LoggerError::LoggerStopped)
                })
            }
            None => {
                let mut appender = self.appender.lock();
                flush_appender(&mut appender, &self.metrics)
            }
        }
    }
}

impl Drop for Sink {
    fn drop(&mut self) {
        // Close the channel first so the worker drains and exits
        drop(self.sender.take());

        if let Some(handle) = self.worker.take() {
            let start = std::time::Instant::now();
            loop {
                if handle.is_finished() {
                    if let Err(e) = handle.join() {
                        report(format_args!(
                            "[LOGGER ERROR] Async worker thread panicked during shutdown: {:?}",
                            e
                        ));
                    }
                    break;
                }

                if start.elapsed() >= DEFAULT_SHUTDOWN_TIMEOUT {
                    report(format_args!(
                        "[LOGGER WARNING] Async worker thread did not finish within {:?} timeout. \
                         Some logs may be lost.",
                        DEFAULT_SHUTDOWN_TIMEOUT
                    ));
                    return;
                }

                thread::sleep(Duration::from_millis(10));
            }
        }

        let mut appender = self.appender.lock();
        let _ = flush_appender(&mut appender, &self.metrics);

        let snapshot = self.metrics.snapshot();
        if snapshot.dropped > 0 {
            report(format_args!(
                "[LOGGER WARNING] Logger shutting down with {} dropped logs (drop rate: {:.2}%)",
                snapshot.dropped,
                snapshot.drop_rate()
            ));
        }
    }
}

/// Structured logger handle
///
/// Cloning or deriving is cheap. Every handle derived from the same root
/// writes to the same sink and reads the same verbosity threshold.
///
/// # Example
///
/// ```
/// use rust_contextual_logger::prelude::*;
///
/// let logger = Logger::builder().verbosity(3).build();
/// let log = logger.with_name("TestName").with_values([("pod", "192.168.0.1")]);
///
/// log.info("Hello", ());
/// log.v(4).info("nice to meet you", ()); // suppressed
/// log.error(None, "uh oh", [("trouble", true)]);
/// logger.flush().ok();
/// ```
#[derive(Clone)]
pub struct Logger {
    context: Arc<LoggerContext>,
    verbosity: Verbosity,
    sink: Arc<Sink>,
}

impl Logger {
    /// Root logger writing to stderr with verbosity 0
    #[must_use]
    pub fn new() -> Self {
        LoggerBuilder::new().build()
    }

    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// New logger with `segment` appended to the name
    #[must_use]
    pub fn with_name(&self, segment: impl Into<String>) -> Logger {
        self.derive(self.context.with_name(segment))
    }

    /// New logger with `values` bound after the existing pairs
    #[must_use]
    pub fn with_values(&self, values: impl Into<KeyValues>) -> Logger {
        self.derive(self.context.with_values(&values.into()))
    }

    fn derive(&self, context: LoggerContext) -> Logger {
        Logger {
            context: Arc::new(context),
            verbosity: self.verbosity.clone(),
            sink: Arc::clone(&self.sink),
        }
    }

    /// Emit an info record; never gated by verbosity
    pub fn info(&self, message: impl Into<String>, values: impl Into<KeyValues>) {
        self.emit(LogLevel::Info, 0, message.into(), None, values.into());
    }

    /// Emit an error record; never gated by verbosity
    ///
    /// `err` is rendered as an `err` field when present.
    pub fn error(
        &self,
        err: Option<&dyn std::error::Error>,
        message: impl Into<String>,
        values: impl Into<KeyValues>,
    ) {
        self.emit(
            LogLevel::Error,
            0,
            message.into(),
            err.map(|e| e.to_string()),
            values.into(),
        );
    }

    /// Handle whose `info` only emits when `level <= threshold`
    #[inline]
    pub fn v(&self, level: i32) -> Verbose<'_> {
        Verbose {
            logger: self,
            level,
        }
    }

    /// Ungated calls always emit
    #[inline]
    pub fn enabled(&self) -> bool {
        true
    }

    /// Block until everything logged so far has reached the sink
    ///
    /// Failures are returned (and counted in [`LoggerMetrics::flush_failures`])
    /// but never panic.
    pub fn flush(&self) -> Result<()> {
        self.sink.flush()
    }

    pub fn verbosity(&self) -> &Verbosity {
        &self.verbosity
    }

    pub fn context(&self) -> &LoggerContext {
        &self.context
    }

    /// Joined hierarchical name, `None` for the root logger
    pub fn name(&self) -> Option<String> {
        self.context.name()
    }

    /// Metrics of the shared sink
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.sink.metrics
    }

    fn emit(
        &self,
        level: LogLevel,
        verbosity: i32,
        message: String,
        error: Option<String>,
        values: KeyValues,
    ) {
        let mut entry = LogEntry::new(level, message)
            .with_verbosity(verbosity)
            .with_logger_name(self.context.name())
            .with_key_values(self.context.values().chained(&values));
        if let Some(error) = error {
            entry = entry.with_error(error);
        }
        self.sink.write(entry);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("context", &self.context)
            .field("verbosity", &self.verbosity.threshold())
            .finish()
    }
}

/// Verbosity-bound view of a [`Logger`]
#[derive(Debug, Clone, Copy)]
pub struct Verbose<'a> {
    logger: &'a Logger,
    level: i32,
}

impl Verbose<'_> {
    /// Whether records at this level pass the current threshold
    #[inline]
    pub fn enabled(&self) -> bool {
        self.logger.verbosity.enabled(self.level)
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    /// Emit an info record if [`Verbose::enabled`]; otherwise nothing is
    /// formatted or written.
    pub fn info(&self, message: impl Into<String>, values: impl Into<KeyValues>) {
        if !self.enabled() {
            self.logger.metrics().record_suppressed();
            return;
        }
        self.logger
            .emit(LogLevel::Info, self.level, message.into(), None, values.into());
    }
}

/// Builder for constructing Logger with a fluent API
///
/// Format, timestamp, color and target settings apply to the default console
/// appender; an appender passed to [`LoggerBuilder::appender`] keeps its own.
///
/// # Example
/// ```
/// use rust_contextual_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .verbosity(3)
///     .output_format(OutputFormat::Json)
///     .async_mode(1000)
///     .build();
/// ```
pub struct LoggerBuilder {
    verbosity: Option<Verbosity>,
    threshold: Option<i32>,
    appender: Option<Box<dyn Appender>>,
    async_buffer: Option<usize>,
    output_format: OutputFormat,
    timestamp_format: TimestampFormat,
    use_colors: bool,
    target: ConsoleTarget,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            verbosity: None,
            threshold: None,
            appender: None,
            async_buffer: None,
            output_format: OutputFormat::default(),
            timestamp_format: TimestampFormat::default(),
            use_colors: cfg!(feature = "console"),
            target: ConsoleTarget::default(),
        }
    }

    /// Set the verbosity threshold
    ///
    /// Applied in [`LoggerBuilder::build`], after any
    /// [`LoggerBuilder::shared_verbosity`], so call order does not matter.
    /// With a shared handle the threshold is written into that handle.
    #[must_use = "builder methods return a new value"]
    pub fn verbosity(mut self, threshold: i32) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Use an existing verbosity handle, shared with whoever else holds it
    ///
    /// The handle keeps its current threshold unless
    /// [`LoggerBuilder::verbosity`] or [`LoggerBuilder::config`] also sets one.
    #[must_use = "builder methods return a new value"]
    pub fn shared_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = Some(verbosity);
        self
    }

    /// Replace the default console appender
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appender = Some(Box::new(appender));
        self
    }

    /// Deliver records through a background worker with a bounded queue
    ///
    /// If not called, the caller's thread writes each record.
    #[must_use = "builder methods return a new value"]
    pub fn async_mode(mut self, buffer_size: usize) -> Self {
        self.async_buffer = Some(buffer_size);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn target(mut self, target: ConsoleTarget) -> Self {
        self.target = target;
        self
    }

    /// Apply every setting of a [`LoggerConfig`]
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: &LoggerConfig) -> Self {
        self.threshold = Some(config.verbosity);
        self.output_format = config.format.clone();
        self.timestamp_format = config.timestamp_format.clone();
        self.use_colors = config.colors;
        self.target = config.target;
        self.async_buffer = config.async_buffer;
        self
    }

    /// Build the root Logger
    pub fn build(self) -> Logger {
        let appender = match self.appender {
            Some(appender) => appender,
            None => Box::new(
                ConsoleAppender::with_colors(self.use_colors)
                    .with_target(self.target)
                    .with_output_format(self.output_format)
                    .with_timestamp_format(self.timestamp_format),
            ),
        };

        let verbosity = self.verbosity.unwrap_or_default();
        if let Some(threshold) = self.threshold {
            verbosity.set(threshold);
        }

        let sink = match self.async_buffer {
            Some(size) => Sink::with_worker(appender, size),
            None => Sink::sync(appender),
        };

        Logger {
            context: Arc::new(LoggerContext::new()),
            verbosity,
            sink: Arc::new(sink),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
