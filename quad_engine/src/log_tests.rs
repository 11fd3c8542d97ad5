//! Unit tests for log.rs
//!
//! Tests Logger trait, LogEntry, LogSeverity, and DefaultLogger.

use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
use std::time::SystemTime;

fn entry(severity: LogSeverity, file: Option<&'static str>, line: Option<u32>) -> LogEntry {
    LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: "quad::test".to_string(),
        message: "message body".to_string(),
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
fn test_log_severity_diagnostic_split() {
    assert!(!LogSeverity::Trace.is_diagnostic());
    assert!(!LogSeverity::Debug.is_diagnostic());
    assert!(!LogSeverity::Info.is_diagnostic());
    assert!(LogSeverity::Warn.is_diagnostic());
    assert!(LogSeverity::Error.is_diagnostic());
}

#[test]
fn test_log_severity_debug() {
    assert_eq!(format!("{:?}", LogSeverity::Trace), "Trace");
    assert_eq!(format!("{:?}", LogSeverity::Warn), "Warn");
    assert_eq!(format!("{:?}", LogSeverity::Error), "Error");
}

// ============================================================================
// LOG ENTRY TESTS
// ============================================================================

#[test]
fn test_log_entry_clone() {
    let entry1 = entry(LogSeverity::Warn, Some("shader.rs"), Some(10));
    let entry2 = entry1.clone();

    assert_eq!(entry1.severity, entry2.severity);
    assert_eq!(entry1.source, entry2.source);
    assert_eq!(entry1.message, entry2.message);
    assert_eq!(entry1.file, entry2.file);
    assert_eq!(entry1.line, entry2.line);
}

// ============================================================================
// DEFAULT LOGGER TESTS
// ============================================================================

#[test]
fn test_format_plain_without_location() {
    let text = DefaultLogger::format_plain(&entry(LogSeverity::Info, None, None));
    assert!(text.contains("[INFO ]"));
    assert!(text.contains("[quad::test]"));
    assert!(text.ends_with("message body"));
}

#[test]
fn test_format_plain_with_location() {
    let text = DefaultLogger::format_plain(&entry(LogSeverity::Error, Some("context.rs"), Some(99)));
    assert!(text.contains("[ERROR]"));
    assert!(text.ends_with("message body (context.rs:99)"));
}

#[test]
fn test_format_plain_timestamp_shape() {
    let text = DefaultLogger::format_plain(&entry(LogSeverity::Debug, None, None));
    // [YYYY-MM-DD HH:MM:SS.mmm]
    let stamp = &text[1..24];
    assert_eq!(stamp.len(), 23);
    assert_eq!(&stamp[4..5], "-");
    assert_eq!(&stamp[10..11], " ");
    assert_eq!(&stamp[19..20], ".");
}

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
        logger.log(&entry(severity, Some("log_tests.rs"), Some(1)));
    }
}
