//! Appender over any `std::io::Write`

use crate::core::{Appender, LogEntry, LoggerError, OutputFormat, Result, TimestampFormat};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// Writes one line per record to an arbitrary text writer
pub struct WriterAppender<W: Write + Send> {
    writer: W,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
}

impl<W: Write + Send> WriterAppender<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::default(),
        }
    }

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
}

impl WriterAppender<BufWriter<File>> {
    /// Append to the file at `path`, creating it if needed
    ///
    /// ```no_run
    /// use rust_contextual_logger::appenders::WriterAppender;
    ///
    /// let appender = WriterAppender::create("/var/log/app.log").unwrap();
    /// ```
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LoggerError::io_operation("opening log file", path.display().to_string(), e))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write + Send> Appender for WriterAppender<W> {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let mut output = self.output_format.format(entry, &self.timestamp_format);
        output.push('\n');

        self.writer.write_all(output.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "writer"
    }
}

impl<W: Write + Send> Drop for WriterAppender<W> {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed
        let _ = self.writer.flush();
    }
}

/// Cloneable in-memory writer
///
/// Every clone appends to the same buffer, so one clone can be handed to a
/// [`WriterAppender`] while another reads what was written.
///
/// ```
/// use rust_contextual_logger::appenders::{SharedBuffer, WriterAppender};
/// use rust_contextual_logger::Logger;
///
/// let buffer = SharedBuffer::new();
/// let logger = Logger::builder()
///     .appender(WriterAppender::new(buffer.clone()))
///     .build();
///
/// logger.info("hello", ());
/// logger.flush().unwrap();
/// assert!(buffer.contents().contains("hello"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    /// Written lines, without terminators
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(String::from).collect()
    }

    pub fn clear(&self) {
        self.bytes.lock().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{KeyValues, LogLevel};

    #[test]
    fn test_appends_one_line_per_entry() {
        let buffer = SharedBuffer::new();
        let mut appender = WriterAppender::new(buffer.clone());

        appender
            .append(&LogEntry::new(LogLevel::Info, "first"))
            .unwrap();
        appender
            .append(
                &LogEntry::new(LogLevel::Info, "second")
                    .with_key_values(KeyValues::new().with("k", "v")),
            )
            .unwrap();

        let lines = buffer.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("first"));
        assert!(lines[1].ends_with("second k=v"));
    }

    #[test]
    fn test_json_output() {
        let buffer = SharedBuffer::new();
        let mut appender =
            WriterAppender::new(buffer.clone()).with_output_format(OutputFormat::Json);

        appender.append(&LogEntry::new(LogLevel::Error, "x")).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&buffer.lines()[0]).unwrap();
        assert_eq!(parsed["level"], "ERROR");
    }

    #[test]
    fn test_file_writer_flushes() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("writer.log");

        let mut appender = WriterAppender::create(&path).expect("Failed to create appender");
        appender
            .append(&LogEntry::new(LogLevel::Info, "persisted"))
            .unwrap();
        appender.flush().unwrap();

        let content = std::fs::read_to_string(&path).expect("Failed to read log file");
        assert!(content.contains("persisted"));
    }

    #[test]
    fn test_create_reports_path_on_failure() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("missing").join("writer.log");

        let err = match WriterAppender::create(&path) {
            Ok(_) => panic!("opening under a missing directory should fail"),
            Err(e) => e,
        };
        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("writer.log"));
    }
}
