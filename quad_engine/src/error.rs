//! Error types for the Quad engine
//!
//! This module defines the error types used throughout the engine,
//! including native device calls, shader creation, and resource management.

use std::fmt;
use std::path::PathBuf;

use crate::graphics_device::{DeviceErrorCode, ShaderStage};

/// Result type for Quad engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Quad engine errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (handle allocation, context loss, etc.)
    BackendError(String),

    /// Invalid resource (empty buffer, conflicting layout, etc.)
    InvalidResource(String),

    /// Initialization failed (window, context, subsystems)
    InitializationFailed(String),

    /// A native device call reported one or more error codes
    ///
    /// Only produced under `FailurePolicy::Propagate`; the `Abort` policy
    /// terminates the process instead.
    DeviceCall {
        /// The call expression as written at the call site
        call: String,
        /// Source file of the call site
        file: &'static str,
        /// Source line of the call site
        line: u32,
        /// Every code drained after the call, in report order
        errors: Vec<DeviceErrorCode>,
    },

    /// A shader stage failed to compile
    ShaderCompile {
        stage: ShaderStage,
        log: String,
    },

    /// The shader program failed to link
    ShaderLink(String),

    /// The shader source file could not be read
    ShaderSourceRead {
        path: PathBuf,
        message: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::DeviceCall { call, file, line, errors } => {
                let symbols: Vec<String> = errors.iter().map(|e| e.symbol()).collect();
                write!(f, "Device call failed {{{}}}: {} {}:{}", symbols.join(", "), call, file, line)
            }
            Error::ShaderCompile { stage, log } => {
                write!(f, "Failed to compile {} shader: {}", stage, log)
            }
            Error::ShaderLink(log) => write!(f, "Failed to link shader program: {}", log),
            Error::ShaderSourceRead { path, message } => {
                write!(f, "Failed to read shader source '{}': {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an ERROR message and build an `Error::BackendError` with the same text
///
/// # Example
///
/// ```ignore
/// let err = engine_err!("quad::gl", "Failed to create buffer: {}", reason);
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::quad::Error::BackendError(message)
    }};
}

/// Log an ERROR message and return early with `Err(Error::BackendError)`
///
/// # Example
///
/// ```ignore
/// engine_bail!("quad::gl", "OpenGL {}.{} is not supported", major, minor);
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
