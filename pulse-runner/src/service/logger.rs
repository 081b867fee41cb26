//! Logger service
//!
//! A job hands each poll outcome to a `Logger` as one rendered line.
//! Where the line ends up is the sink's business: the console, the tracing
//! subscriber, or an in-memory buffer that tests can read back.

use pulse_core::domain::log::LogRecord;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

/// Sink for the lines a job produces
///
/// Implementations never report failure to the caller. A sink that cannot
/// write drops the line.
pub trait Logger: Send + Sync {
    /// Records one already-rendered line
    fn log(&self, line: &str);
}

/// Writes timestamped lines to a writer, stderr by default
///
/// Lines look like `2026/10/17 09:30:00 madeup.website -- 200 OK`.
pub struct ConsoleLogger {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleLogger {
    /// Creates a console logger writing to stderr
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }

    /// Creates a console logger writing to `writer`
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::stderr()
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, line: &str) {
        let timestamp = chrono::Local::now().format("%Y/%m/%d %H:%M:%S");
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        if let Err(e) = writeln!(writer, "{} {}", timestamp, line).and_then(|_| writer.flush()) {
            warn!("Dropped log line, console sink failed: {}", e);
        }
    }
}

/// Emits each line as an INFO event on the tracing subscriber
pub struct TracingLogger {
    resource: String,
}

impl TracingLogger {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
        }
    }
}

impl Logger for TracingLogger {
    fn log(&self, line: &str) {
        info!(resource = %self.resource, "{}", line);
    }
}

/// In-memory logger
///
/// Keeps every record behind an `Arc<Mutex<_>>`, so clones share one buffer.
#[derive(Clone, Default)]
pub struct InMemoryLogger {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl InMemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last logged message, or an empty string if nothing was logged
    pub fn read(&self) -> String {
        self.lock()
            .last()
            .map(|record| record.message.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Removes and returns every buffered record
    pub fn drain(&self) -> Vec<LogRecord> {
        self.lock().drain(..).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Logger for InMemoryLogger {
    fn log(&self, line: &str) {
        self.lock().push(LogRecord::now(line));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    /// Writer that shares its buffer with the test
    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_console_logger_prefixes_timestamp() {
        let buffer = SharedBuffer::default();
        let logger = ConsoleLogger::new(buffer.clone());

        logger.log("madeup.website -- 200 OK");

        let output = buffer.contents();
        let line = output.strip_suffix('\n').unwrap();
        let (timestamp, message) = line.split_at(19);

        assert_eq!(message, " madeup.website -- 200 OK");
        assert!(chrono::NaiveDateTime::parse_from_str(timestamp, "%Y/%m/%d %H:%M:%S").is_ok());
    }

    #[test]
    fn test_console_logger_swallows_write_errors() {
        let logger = ConsoleLogger::new(BrokenPipe);
        logger.log("nobody will read this");
        logger.log("or this");
    }

    #[test]
    fn test_in_memory_read_last() {
        let logger = InMemoryLogger::new();
        assert_eq!(logger.read(), "");
        assert!(logger.is_empty());

        logger.log("first");
        logger.log("second");

        assert_eq!(logger.read(), "second");
        assert_eq!(logger.len(), 2);
    }

    #[test]
    fn test_in_memory_clones_share_buffer() {
        let logger = InMemoryLogger::new();
        let handle = logger.clone();

        logger.log("shared");

        assert_eq!(handle.read(), "shared");
    }

    #[test]
    fn test_in_memory_drain() {
        let logger = InMemoryLogger::new();
        logger.log("a");
        logger.log("b");

        let drained = logger.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].message, "a");

        // Buffer should be empty after drain
        assert!(logger.is_empty());
        assert_eq!(logger.read(), "");
    }
}
