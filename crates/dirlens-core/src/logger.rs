//! Logging capability handed to engines.
//!
//! Engines never reach for a global logger. They hold an `Arc<dyn Logger>`
//! that the caller supplies; the default forwards to `tracing`, and it is up
//! to the outer entry point to install a subscriber.

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::Level;

/// Sink for diagnostic messages emitted by engines.
pub trait Logger: Send + Sync {
    /// Record a message at the given level.
    fn log(&self, level: Level, message: &str);

    /// Record a debug message.
    fn debug(&self, message: &str) {
        self.log(Level::DEBUG, message);
    }

    /// Record an informational message.
    fn info(&self, message: &str) {
        self.log(Level::INFO, message);
    }

    /// Record a warning.
    fn warn(&self, message: &str) {
        self.log(Level::WARN, message);
    }
}

/// Forwards messages to `tracing` under the `dirlens` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!(target: "dirlens", "{}", message),
            Level::WARN => tracing::warn!(target: "dirlens", "{}", message),
            Level::INFO => tracing::info!(target: "dirlens", "{}", message),
            Level::DEBUG => tracing::debug!(target: "dirlens", "{}", message),
            Level::TRACE => tracing::trace!(target: "dirlens", "{}", message),
        }
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _level: Level, _message: &str) {}
}

/// Keeps messages in memory. Useful for asserting on swallowed failures.
#[derive(Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<(Level, String)>>,
}

impl MemoryLogger {
    /// Create an empty logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded messages.
    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Number of messages recorded at `level`.
    pub fn count(&self, level: Level) -> usize {
        self.entries().iter().filter(|(l, _)| *l == level).count()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: Level, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((level, message.to_string()));
        }
    }
}

impl fmt::Debug for MemoryLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryLogger")
            .field("entries", &self.entries().len())
            .finish()
    }
}

/// The logger engines use when none is supplied.
pub fn default_logger() -> Arc<dyn Logger> {
    Arc::new(TracingLogger)
}
