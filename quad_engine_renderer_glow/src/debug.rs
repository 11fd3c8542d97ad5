/// OpenGL Debug Output - Routes KHR_debug driver messages into the engine logger
///
/// Compiled only with the `gl-debug-output` feature. Messages are counted per
/// severity so a run can end with a short report.

use colored::*;
use glow::HasContext;
use quad_engine::quad::log::LogSeverity;
use quad_engine::quad::Engine;
use std::sync::atomic::{AtomicU32, Ordering};

/// Global debug message statistics (thread-safe atomic counters)
static DEBUG_STATS: DebugStatsTracker = DebugStatsTracker::new();

/// Debug message counts since the callback was installed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugMessageStats {
    pub errors: u32,
    pub warnings: u32,
    pub info: u32,
    pub notifications: u32,
}

impl DebugMessageStats {
    pub fn total(&self) -> u32 {
        self.errors + self.warnings + self.info + self.notifications
    }
}

struct DebugStatsTracker {
    errors: AtomicU32,
    warnings: AtomicU32,
    info: AtomicU32,
    notifications: AtomicU32,
}

impl DebugStatsTracker {
    const fn new() -> Self {
        Self {
            errors: AtomicU32::new(0),
            warnings: AtomicU32::new(0),
            info: AtomicU32::new(0),
            notifications: AtomicU32::new(0),
        }
    }

    fn record(&self, severity: LogSeverity) {
        let counter = match severity {
            LogSeverity::Error => &self.errors,
            LogSeverity::Warn => &self.warnings,
            LogSeverity::Info => &self.info,
            LogSeverity::Debug | LogSeverity::Trace => &self.notifications,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn get_stats(&self) -> DebugMessageStats {
        DebugMessageStats {
            errors: self.errors.load(Ordering::Relaxed),
            warnings: self.warnings.load(Ordering::Relaxed),
            info: self.info.load(Ordering::Relaxed),
            notifications: self.notifications.load(Ordering::Relaxed),
        }
    }

    fn reset(&self) {
        self.errors.store(0, Ordering::Relaxed);
        self.warnings.store(0, Ordering::Relaxed);
        self.info.store(0, Ordering::Relaxed);
        self.notifications.store(0, Ordering::Relaxed);
    }
}

/// Get current debug message statistics
pub fn get_debug_stats() -> DebugMessageStats {
    DEBUG_STATS.get_stats()
}

/// Print debug message statistics report
pub fn print_debug_stats_report() {
    let stats = get_debug_stats();

    if stats.total() == 0 {
        println!("\n{}", "✓ No OpenGL debug messages".green().bold());
        return;
    }

    println!("\n{}", "=== OpenGL Debug Output Report ===".bright_blue().bold());

    if stats.errors > 0 {
        println!("  {} {}", "Errors:".red().bold(), stats.errors);
    }
    if stats.warnings > 0 {
        println!("  {} {}", "Warnings:".yellow().bold(), stats.warnings);
    }
    if stats.info > 0 {
        println!("  {} {}", "Info:".cyan(), stats.info);
    }
    if stats.notifications > 0 {
        println!("  {} {}", "Notifications:".bright_black(), stats.notifications);
    }

    println!("  {} {}", "Total:".white().bold(), stats.total());
    println!("{}\n", "==================================".bright_blue().bold());
}

/// Map a `GL_DEBUG_SEVERITY_*` value to a log severity
pub(crate) fn severity_of(gl_severity: u32) -> LogSeverity {
    match gl_severity {
        glow::DEBUG_SEVERITY_HIGH => LogSeverity::Error,
        glow::DEBUG_SEVERITY_MEDIUM => LogSeverity::Warn,
        glow::DEBUG_SEVERITY_LOW => LogSeverity::Info,
        _ => LogSeverity::Trace,
    }
}

pub(crate) fn source_name(source: u32) -> &'static str {
    match source {
        glow::DEBUG_SOURCE_API => "API",
        glow::DEBUG_SOURCE_WINDOW_SYSTEM => "WindowSystem",
        glow::DEBUG_SOURCE_SHADER_COMPILER => "ShaderCompiler",
        glow::DEBUG_SOURCE_THIRD_PARTY => "ThirdParty",
        glow::DEBUG_SOURCE_APPLICATION => "Application",
        _ => "Other",
    }
}

pub(crate) fn type_name(message_type: u32) -> &'static str {
    match message_type {
        glow::DEBUG_TYPE_ERROR => "Error",
        glow::DEBUG_TYPE_DEPRECATED_BEHAVIOR => "Deprecated",
        glow::DEBUG_TYPE_UNDEFINED_BEHAVIOR => "Undefined",
        glow::DEBUG_TYPE_PORTABILITY => "Portability",
        glow::DEBUG_TYPE_PERFORMANCE => "Performance",
        glow::DEBUG_TYPE_MARKER => "Marker",
        _ => "Other",
    }
}

/// Enable synchronous debug output and install the message callback
///
/// Does nothing (beyond a warning) when the context lacks `KHR_debug`.
///
/// # Safety
///
/// `gl` must be current on the calling thread.
pub(crate) unsafe fn install_debug_callback(gl: &mut glow::Context) {
    if !gl.supports_debug() {
        quad_engine::engine_warn!("quad::gl", "KHR_debug unavailable, debug output disabled");
        return;
    }

    DEBUG_STATS.reset();

    gl.enable(glow::DEBUG_OUTPUT);
    gl.enable(glow::DEBUG_OUTPUT_SYNCHRONOUS);
    gl.debug_message_callback(|source, message_type, id, severity, message| {
        let severity = severity_of(severity);
        DEBUG_STATS.record(severity);
        Engine::log(
            severity,
            "quad::gl::debug",
            format!(
                "[{}/{}] #{}: {}",
                source_name(source),
                type_name(message_type),
                id,
                message
            ),
        );
    });

    quad_engine::engine_info!("quad::gl", "OpenGL debug output enabled");
}
