//! Error-check wrapper around native device calls
//!
//! Every native call goes through `device_call!`: pending errors are drained
//! before the call so stale codes are never blamed on it, then drained again
//! after it. Any code found afterwards is logged with the call text and its
//! source location, then handled according to the context's `FailurePolicy`.

use std::fmt;

use crate::graphics_device::GraphicsDevice;

/// Value returned by `GraphicsDevice::get_error` when the queue is empty
pub const NO_ERROR: u32 = 0;

/// Upper bound on reads per drain; a lost context may report errors forever.
const MAX_DRAINED_ERRORS: usize = 64;

/// Decoded native error code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceErrorCode {
    /// 0x0500
    InvalidEnum,
    /// 0x0501
    InvalidValue,
    /// 0x0502
    InvalidOperation,
    /// 0x0503
    StackOverflow,
    /// 0x0504
    StackUnderflow,
    /// 0x0505
    OutOfMemory,
    /// Anything outside the known range, kept raw
    Unknown(u32),
}

impl DeviceErrorCode {
    /// Decode a raw code; `0x0500..=0x0505` map to the named variants
    pub fn from_raw(code: u32) -> Self {
        match code {
            0x0500 => DeviceErrorCode::InvalidEnum,
            0x0501 => DeviceErrorCode::InvalidValue,
            0x0502 => DeviceErrorCode::InvalidOperation,
            0x0503 => DeviceErrorCode::StackOverflow,
            0x0504 => DeviceErrorCode::StackUnderflow,
            0x0505 => DeviceErrorCode::OutOfMemory,
            other => DeviceErrorCode::Unknown(other),
        }
    }

    /// Raw numeric code
    pub fn raw(&self) -> u32 {
        match self {
            DeviceErrorCode::InvalidEnum => 0x0500,
            DeviceErrorCode::InvalidValue => 0x0501,
            DeviceErrorCode::InvalidOperation => 0x0502,
            DeviceErrorCode::StackOverflow => 0x0503,
            DeviceErrorCode::StackUnderflow => 0x0504,
            DeviceErrorCode::OutOfMemory => 0x0505,
            DeviceErrorCode::Unknown(code) => *code,
        }
    }

    /// Human-readable symbol, or lowercase hex for unknown codes (`0x506`)
    pub fn symbol(&self) -> String {
        match self {
            DeviceErrorCode::InvalidEnum => "GL_INVALID_ENUM".to_string(),
            DeviceErrorCode::InvalidValue => "GL_INVALID_VALUE".to_string(),
            DeviceErrorCode::InvalidOperation => "GL_INVALID_OPERATION".to_string(),
            DeviceErrorCode::StackOverflow => "GL_STACK_OVERFLOW".to_string(),
            DeviceErrorCode::StackUnderflow => "GL_STACK_UNDERFLOW".to_string(),
            DeviceErrorCode::OutOfMemory => "GL_OUT_OF_MEMORY".to_string(),
            DeviceErrorCode::Unknown(code) => format!("{:#x}", code),
        }
    }
}

impl fmt::Display for DeviceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// What the checker does after reporting a failed native call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log, then abort the process (development-time assertion)
    Abort,
    /// Log, then return `Error::DeviceCall` to the caller
    Propagate,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            FailurePolicy::Abort
        } else {
            FailurePolicy::Propagate
        }
    }
}

/// Read the device error queue until it reports `NO_ERROR`
pub fn drain_errors(device: &dyn GraphicsDevice) -> Vec<DeviceErrorCode> {
    let mut errors = Vec::new();
    while errors.len() < MAX_DRAINED_ERRORS {
        let code = device.get_error();
        if code == NO_ERROR {
            break;
        }
        errors.push(DeviceErrorCode::from_raw(code));
    }
    errors
}

/// Invoke one device method through the error-check wrapper
///
/// Expands to `GraphicsContext::checked_call` with the call text, `file!()`
/// and `line!()` of the call site. Evaluates to `Result<T>`.
///
/// # Example
///
/// ```ignore
/// device_call!(ctx, |gl| gl.bind_buffer(BufferKind::Vertex, Some(id)))?;
/// ```
#[macro_export]
macro_rules! device_call {
    ($ctx:expr, |$device:ident| $call:expr) => {
        $ctx.checked_call(stringify!($call), file!(), line!(), |$device| $call)
    };
}

#[cfg(test)]
#[path = "error_check_tests.rs"]
mod tests;
