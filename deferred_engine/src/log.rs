//! Internal logging system for the deferred engine
//!
//! - Pluggable logger via the `Logger` trait
//! - Severity levels (Trace, Debug, Info, Warn, Error) with a minimum-severity filter
//! - Colored console output by default; WARN and ERROR go to stderr
//! - File and line information on ERROR entries

use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;
use colored::*;
use chrono::{DateTime, Local};

/// Logger trait for custom logging implementations
///
/// # Example
///
/// ```no_run
/// use deferred_engine::deferred::log::{Logger, LogEntry};
///
/// struct StderrLogger;
///
/// impl Logger for StderrLogger {
///     fn log(&self, entry: &LogEntry) {
///         eprintln!("{}", entry);
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Log an entry
    fn log(&self, entry: &LogEntry);
}

/// A shared logger can be installed while the caller keeps a handle to it
impl<L: Logger + ?Sized> Logger for Arc<L> {
    fn log(&self, entry: &LogEntry) {
        (**self).log(entry)
    }
}

/// A single log record
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level
    pub severity: LogSeverity,

    /// Timestamp when the log was created
    pub timestamp: SystemTime,

    /// Source component (e.g., "deferred::Framebuffer", "deferred::mock")
    pub source: String,

    /// Log message
    pub message: String,

    /// Source file (only for detailed ERROR logs)
    pub file: Option<&'static str>,

    /// Source line (only for detailed ERROR logs)
    pub line: Option<u32>,
}

impl LogEntry {
    /// Entry stamped with the current time, without file:line
    pub fn new(severity: LogSeverity, source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            timestamp: SystemTime::now(),
            source: source.into(),
            message: message.into(),
            file: None,
            line: None,
        }
    }

    /// Attach the file:line the entry was emitted from
    pub fn at(mut self, file: &'static str, line: u32) -> Self {
        self.file = Some(file);
        self.line = Some(line);
        self
    }

    /// `file:line`, when known
    pub fn location(&self) -> Option<String> {
        match (self.file, self.line) {
            (Some(file), Some(line)) => Some(format!("{}:{}", file, line)),
            _ => None,
        }
    }
}

/// Uncolored `[SEVERITY] [source] message (file:line)`, no timestamp
impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] [{}] {}", self.severity.label(), self.source, self.message)?;
        if let Some(location) = self.location() {
            write!(f, " ({})", location)?;
        }
        Ok(())
    }
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Per-call tracing (bind transitions, device calls)
    Trace,

    /// Development information (deferred releases)
    Debug,

    /// Lifecycle events (framebuffer created, destroyed)
    Info,

    /// Recoverable problems
    Warn,

    /// Failed operations, logged with file:line
    Error,
}

impl LogSeverity {
    /// Fixed-width (5 columns) label
    pub fn label(self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        }
    }

    /// WARN and ERROR entries go to stderr
    pub fn is_problem(self) -> bool {
        self >= LogSeverity::Warn
    }

    fn colored_label(self) -> ColoredString {
        match self {
            LogSeverity::Trace => self.label().bright_black(),
            LogSeverity::Debug => self.label().cyan(),
            LogSeverity::Info => self.label().green(),
            LogSeverity::Warn => self.label().yellow(),
            LogSeverity::Error => self.label().red().bold(),
        }
    }
}

impl fmt::Display for LogSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().trim_end())
    }
}

/// Default logger: colored console output
///
/// Format:
/// - Normal: `[timestamp] [SEVERITY] [source] message`
/// - Error: `[timestamp] [ERROR] [source] message (file:line)`
///
/// TRACE to INFO are printed on stdout, WARN and ERROR on stderr.
pub struct DefaultLogger;

impl DefaultLogger {
    /// Render `entry` the way it is printed
    pub fn format(entry: &LogEntry) -> String {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f");

        let mut line = format!(
            "[{}] [{}] [{}] {}",
            timestamp,
            entry.severity.colored_label(),
            entry.source.bright_blue(),
            entry.message
        );
        if let Some(location) = entry.location() {
            line.push_str(&format!(" ({})", location));
        }
        line
    }
}

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let line = Self::format(entry);
        if entry.severity.is_problem() {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

// ===== LOGGING MACROS =====

/// Log a TRACE message
///
/// ```ignore
/// engine_trace!("deferred::RenderContext", "bind {:?}", mode);
/// ```
#[macro_export]
macro_rules! engine_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::deferred::Engine::log(
            $crate::deferred::log::LogSeverity::Trace,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a DEBUG message
#[macro_export]
macro_rules! engine_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::deferred::Engine::log(
            $crate::deferred::log::LogSeverity::Debug,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an INFO message
#[macro_export]
macro_rules! engine_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::deferred::Engine::log(
            $crate::deferred::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a WARN message
#[macro_export]
macro_rules! engine_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::deferred::Engine::log(
            $crate::deferred::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with file:line information
///
/// ```ignore
/// engine_error!("deferred::Framebuffer", "image allocation failed: {}", err);
/// ```
#[macro_export]
macro_rules! engine_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::deferred::Engine::log_detailed(
            $crate::deferred::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
