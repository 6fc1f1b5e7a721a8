/// Process-wide logger host
///
/// The logger is the only global state of the engine. Rendering state
/// (device, current framebuffer binding) lives in an explicit
/// `RenderContext` instead.

use std::sync::{OnceLock, RwLock};
use crate::config::Config;
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

// ===== INTERNAL STATE =====

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<LoggerState>> = OnceLock::new();

struct LoggerState {
    logger: Box<dyn Logger>,
    min_severity: LogSeverity,
}

fn logger_state() -> &'static RwLock<LoggerState> {
    LOGGER.get_or_init(|| {
        RwLock::new(LoggerState {
            logger: Box::new(DefaultLogger),
            min_severity: LogSeverity::Trace,
        })
    })
}

// ===== PUBLIC API =====

/// Engine-wide logging entry point
///
/// # Example
///
/// ```no_run
/// use deferred_engine::deferred::{Engine, log::{Logger, LogEntry, LogSeverity}};
///
/// struct Quiet;
/// impl Logger for Quiet {
///     fn log(&self, _entry: &LogEntry) {}
/// }
///
/// Engine::set_logger(Quiet);
/// Engine::set_min_severity(LogSeverity::Warn);
/// ```
pub struct Engine;

impl Engine {
    /// Replace the current logger
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        if let Ok(mut state) = logger_state().write() {
            state.logger = Box::new(logger);
        }
    }

    /// Reset logger to `DefaultLogger` and the filter to `Trace`
    pub fn reset_logger() {
        if let Ok(mut state) = logger_state().write() {
            state.logger = Box::new(DefaultLogger);
            state.min_severity = LogSeverity::Trace;
        }
    }

    /// Drop every entry below `severity`
    pub fn set_min_severity(severity: LogSeverity) {
        if let Ok(mut state) = logger_state().write() {
            state.min_severity = severity;
        }
    }

    /// Apply the logging part of `config` (minimum severity)
    pub fn apply_config(config: &Config) {
        Self::set_min_severity(config.log_severity);
    }

    /// Current minimum severity
    pub fn min_severity() -> LogSeverity {
        logger_state()
            .read()
            .map(|state| state.min_severity)
            .unwrap_or(LogSeverity::Trace)
    }

    /// Log without file:line (used by engine_trace! .. engine_warn!)
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        Self::dispatch(severity, source, message, None, None);
    }

    /// Log with file:line (used by engine_error!)
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        Self::dispatch(severity, source, message, Some(file), Some(line));
    }

    fn dispatch(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: Option<&'static str>,
        line: Option<u32>,
    ) {
        if let Ok(state) = logger_state().read() {
            if severity < state.min_severity {
                return;
            }
            let entry = LogEntry::new(severity, source, message);
            let entry = match (file, line) {
                (Some(file), Some(line)) => entry.at(file, line),
                _ => entry,
            };
            state.logger.log(&entry);
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
