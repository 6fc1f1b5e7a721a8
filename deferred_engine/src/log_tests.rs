//! Unit tests for log.rs
//!
//! Tests LogSeverity, LogEntry and DefaultLogger.

use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

fn entry(severity: LogSeverity, file: Option<&'static str>, line: Option<u32>) -> LogEntry {
    LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: "deferred::Framebuffer".to_string(),
        message: "Created framebuffer (800x600)".to_string(),
        file,
        line,
    }
}

// ============================================================================
// LOG SEVERITY TESTS
// ============================================================================

#[test]
fn test_log_severity_ordering() {
    assert!(LogSeverity::Trace < LogSeverity::Debug);
    assert!(LogSeverity::Debug < LogSeverity::Info);
    assert!(LogSeverity::Info < LogSeverity::Warn);
    assert!(LogSeverity::Warn < LogSeverity::Error);
}

#[test]
fn test_log_severity_debug() {
    assert_eq!(format!("{:?}", LogSeverity::Trace), "Trace");
    assert_eq!(format!("{:?}", LogSeverity::Warn), "Warn");
    assert_eq!(format!("{:?}", LogSeverity::Error), "Error");
}

#[test]
fn test_log_severity_labels() {
    assert_eq!(LogSeverity::Info.label(), "INFO ");
    assert_eq!(LogSeverity::Error.label(), "ERROR");
    assert_eq!(LogSeverity::Trace.label().len(), LogSeverity::Warn.label().len());
    assert_eq!(LogSeverity::Info.to_string(), "INFO");
    assert_eq!(LogSeverity::Warn.to_string(), "WARN");
}

#[test]
fn test_log_severity_problem_split() {
    assert!(!LogSeverity::Trace.is_problem());
    assert!(!LogSeverity::Info.is_problem());
    assert!(LogSeverity::Warn.is_problem());
    assert!(LogSeverity::Error.is_problem());
}

// ============================================================================
// LOG ENTRY TESTS
// ============================================================================

#[test]
fn test_log_entry_new_and_at() {
    let entry = LogEntry::new(LogSeverity::Error, "deferred::AttachmentRegistry", "Unknown attachment 'x'");
    assert!(entry.file.is_none());
    assert_eq!(entry.location(), None);

    let entry = entry.at("registry.rs", 12);
    assert_eq!(entry.file, Some("registry.rs"));
    assert_eq!(entry.line, Some(12));
    assert_eq!(entry.location().as_deref(), Some("registry.rs:12"));
}

#[test]
fn test_log_entry_display() {
    let entry = entry(LogSeverity::Info, None, None);
    assert_eq!(entry.to_string(), "[INFO ] [deferred::Framebuffer] Created framebuffer (800x600)");

    let detailed = LogEntry { severity: LogSeverity::Error, ..entry }.at("framebuffer.rs", 7);
    assert!(detailed.to_string().ends_with("(framebuffer.rs:7)"));
    assert!(detailed.to_string().starts_with("[ERROR]"));
}

#[test]
fn test_log_entry_without_file_line() {
    let entry = entry(LogSeverity::Info, None, None);

    assert_eq!(entry.severity, LogSeverity::Info);
    assert_eq!(entry.source, "deferred::Framebuffer");
    assert!(entry.file.is_none());
    assert!(entry.line.is_none());
}

#[test]
fn test_log_entry_with_file_line() {
    let entry = entry(LogSeverity::Error, Some("registry.rs"), Some(42));

    assert_eq!(entry.file, Some("registry.rs"));
    assert_eq!(entry.line, Some(42));
}

#[test]
fn test_log_entry_clone() {
    let original = entry(LogSeverity::Warn, Some("attachment.rs"), Some(7));
    let cloned = original.clone();

    assert_eq!(cloned.severity, original.severity);
    assert_eq!(cloned.message, original.message);
    assert_eq!(cloned.timestamp, original.timestamp);
}

// ============================================================================
// DEFAULT LOGGER TESTS
// ============================================================================

#[test]
fn test_default_logger_all_severities() {
    let logger = DefaultLogger;
    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        logger.log(&entry(severity, None, None));
        logger.log(&entry(severity, Some("framebuffer.rs"), Some(1)));
    }
}

#[test]
fn test_default_logger_format() {
    colored::control::set_override(false);
    let line = DefaultLogger::format(&entry(LogSeverity::Error, Some("registry.rs"), Some(3)));
    colored::control::unset_override();

    assert!(line.contains("[ERROR] [deferred::Framebuffer] Created framebuffer (800x600)"));
    assert!(line.ends_with("(registry.rs:3)"));
}

#[test]
fn test_shared_logger_receives_entries() {
    struct Capture(Mutex<Vec<String>>);
    impl Logger for Capture {
        fn log(&self, entry: &LogEntry) {
            self.0.lock().unwrap().push(entry.message.clone());
        }
    }

    let capture = Arc::new(Capture(Mutex::new(Vec::new())));
    let shared: Box<dyn Logger> = Box::new(capture.clone());
    shared.log(&entry(LogSeverity::Debug, None, None));

    assert_eq!(capture.0.lock().unwrap().as_slice(), ["Created framebuffer (800x600)".to_string()]);
}

#[test]
fn test_logger_trait_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DefaultLogger>();
}
