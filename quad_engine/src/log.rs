//! Internal logging system for Quad Engine
//!
//! This module provides a small pluggable logging layer with:
//! - Customizable logger via Logger trait
//! - Severity levels (Trace, Debug, Info, Warn, Error)
//! - Colored console output by default (warnings and errors on stderr)
//! - File and line information for detailed ERROR logs

use colored::*;
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Logger trait for custom logging implementations
///
/// Implement this trait to redirect engine diagnostics (file logging, test capture, etc.)
///
/// # Example
///
/// ```no_run
/// use quad_engine::quad::log::{Logger, LogEntry};
///
/// struct FileLogger {
///     file: std::fs::File,
/// }
///
/// impl Logger for FileLogger {
///     fn log(&self, entry: &LogEntry) {
///         // Write to file...
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Log an entry
    fn log(&self, entry: &LogEntry);
}

/// Log entry containing all information about a log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level
    pub severity: LogSeverity,

    /// Timestamp when the log was created
    pub timestamp: SystemTime,

    /// Source component (e.g., "quad::Shader", "quad::gl")
    pub source: String,

    /// Log message
    pub message: String,

    /// Source file (only for detailed logs)
    pub file: Option<&'static str>,

    /// Source line (only for detailed logs)
    pub line: Option<u32>,
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Very verbose debug information (per-call tracing)
    Trace,

    /// Development/debugging information
    Debug,

    /// Important informational messages
    Info,

    /// Warning messages (missing uniforms, validation notes)
    Warn,

    /// Error messages (device errors, compile failures)
    Error,
}

impl LogSeverity {
    /// Warnings and errors belong on the diagnostic stream
    pub fn is_diagnostic(&self) -> bool {
        *self >= LogSeverity::Warn
    }
}

/// Default logger implementation using colored console output
///
/// Format:
/// - Normal: `[timestamp] [SEVERITY] [source] message`
/// - Detailed: `[timestamp] [SEVERITY] [source] message (file:line)`
pub struct DefaultLogger;

impl DefaultLogger {
    /// Render an entry without colors, in the same layout as the console output
    pub fn format_plain(entry: &LogEntry) -> String {
        compose(entry, severity_label(entry.severity), &entry.source)
    }
}

fn severity_label(severity: LogSeverity) -> &'static str {
    match severity {
        LogSeverity::Trace => "TRACE",
        LogSeverity::Debug => "DEBUG",
        LogSeverity::Info => "INFO ",
        LogSeverity::Warn => "WARN ",
        LogSeverity::Error => "ERROR",
    }
}

/// `[timestamp] [SEVERITY] [source] message`, plus `(file:line)` when known
fn compose(entry: &LogEntry, severity: impl std::fmt::Display, source: impl std::fmt::Display) -> String {
    let datetime: DateTime<Local> = entry.timestamp.into();
    let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f");

    match (entry.file, entry.line) {
        (Some(file), Some(line)) => format!(
            "[{}] [{}] [{}] {} ({}:{})",
            timestamp, severity, source, entry.message, file, line
        ),
        _ => format!("[{}] [{}] [{}] {}", timestamp, severity, source, entry.message),
    }
}

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let label = severity_label(entry.severity);
        let severity = match entry.severity {
            LogSeverity::Trace => label.bright_black(),
            LogSeverity::Debug => label.cyan(),
            LogSeverity::Info => label.green(),
            LogSeverity::Warn => label.yellow(),
            LogSeverity::Error => label.red().bold(),
        };

        let line = compose(entry, severity, entry.source.bright_blue());

        if entry.severity.is_diagnostic() {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

// ===== LOGGING MACROS =====

/// Log a TRACE message (very verbose, typically disabled)
///
/// # Example
///
/// ```ignore
/// engine_trace!("quad::Renderer", "Drawing {} indices", count);
/// ```
#[macro_export]
macro_rules! engine_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::quad::Engine::log(
            $crate::quad::log::LogSeverity::Trace,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a DEBUG message (development information)
///
/// # Example
///
/// ```ignore
/// engine_debug!("quad::Shader", "Compiled {} stage", stage);
/// ```
#[macro_export]
macro_rules! engine_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::quad::Engine::log(
            $crate::quad::log::LogSeverity::Debug,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an INFO message (important events)
///
/// # Example
///
/// ```ignore
/// engine_info!("quad::gl", "OpenGL context created");
/// ```
#[macro_export]
macro_rules! engine_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::quad::Engine::log(
            $crate::quad::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a WARN message (potential issues)
///
/// # Example
///
/// ```ignore
/// engine_warn!("quad::Shader", "Uniform '{}' doesn't exist", name);
/// ```
#[macro_export]
macro_rules! engine_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::quad::Engine::log(
            $crate::quad::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with file:line information
///
/// # Example
///
/// ```ignore
/// engine_error!("quad::Shader", "Failed to link: {}", log);
/// ```
#[macro_export]
macro_rules! engine_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::quad::Engine::log_detailed(
            $crate::quad::log::LogSeverity::Error,
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
