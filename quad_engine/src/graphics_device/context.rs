/// GraphicsContext - owner of the device and of the current-binding record
///
/// Binding a resource mutates process-wide driver state. The context mirrors
/// that state in an explicit `Bindings` record so callers (and tests) can see
/// which buffer, vertex array and program are current without querying the
/// driver. The record reflects the last bind issued through this context.

use std::cell::Cell;
use std::rc::Rc;

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::graphics_device::{
    drain_errors, BufferId, BufferKind, DeviceErrorCode, FailurePolicy, GraphicsDevice, ProgramId,
    VertexArrayId,
};
use crate::log::LogSeverity;
use crate::renderer::RendererConfig;

/// Currently bound resource of each kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bindings {
    pub vertex_buffer: Option<BufferId>,
    pub index_buffer: Option<BufferId>,
    pub vertex_array: Option<VertexArrayId>,
    pub program: Option<ProgramId>,
}

/// Single-threaded graphics context
///
/// Shared by every resource through `Rc`, which keeps resources on the thread
/// that owns the native context.
pub struct GraphicsContext {
    device: Box<dyn GraphicsDevice>,
    bindings: Cell<Bindings>,
    config: RendererConfig,
}

impl GraphicsContext {
    /// Wrap a device whose native context is already current on this thread
    pub fn new<D: GraphicsDevice + 'static>(device: D, config: RendererConfig) -> Rc<Self> {
        crate::engine_info!(
            "quad::Context",
            "Graphics context ready for '{}' (failure policy: {:?})",
            config.app_name,
            config.failure_policy
        );
        Rc::new(Self {
            device: Box::new(device),
            bindings: Cell::new(Bindings::default()),
            config,
        })
    }

    /// Raw device access, bypassing the error-check wrapper
    pub fn device(&self) -> &dyn GraphicsDevice {
        self.device.as_ref()
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.config.failure_policy
    }

    // ===== BINDING STATE =====

    /// Snapshot of the current bindings
    pub fn bindings(&self) -> Bindings {
        self.bindings.get()
    }

    pub fn bound_buffer(&self, kind: BufferKind) -> Option<BufferId> {
        let bindings = self.bindings.get();
        match kind {
            BufferKind::Vertex => bindings.vertex_buffer,
            BufferKind::Index => bindings.index_buffer,
        }
    }

    pub fn bound_vertex_array(&self) -> Option<VertexArrayId> {
        self.bindings.get().vertex_array
    }

    pub fn bound_program(&self) -> Option<ProgramId> {
        self.bindings.get().program
    }

    pub(crate) fn record_buffer_binding(&self, kind: BufferKind, buffer: Option<BufferId>) {
        let mut bindings = self.bindings.get();
        match kind {
            BufferKind::Vertex => bindings.vertex_buffer = buffer,
            BufferKind::Index => bindings.index_buffer = buffer,
        }
        self.bindings.set(bindings);
    }

    pub(crate) fn record_vertex_array_binding(&self, vertex_array: Option<VertexArrayId>) {
        let mut bindings = self.bindings.get();
        bindings.vertex_array = vertex_array;
        self.bindings.set(bindings);
    }

    pub(crate) fn record_program_binding(&self, program: Option<ProgramId>) {
        let mut bindings = self.bindings.get();
        bindings.program = program;
        self.bindings.set(bindings);
    }

    /// Deleting a bound object unbinds it in the driver; mirror that here.
    pub(crate) fn forget_buffer(&self, buffer: BufferId) {
        let mut bindings = self.bindings.get();
        if bindings.vertex_buffer == Some(buffer) {
            bindings.vertex_buffer = None;
        }
        if bindings.index_buffer == Some(buffer) {
            bindings.index_buffer = None;
        }
        self.bindings.set(bindings);
    }

    pub(crate) fn forget_vertex_array(&self, vertex_array: VertexArrayId) {
        if self.bound_vertex_array() == Some(vertex_array) {
            self.record_vertex_array_binding(None);
        }
    }

    pub(crate) fn forget_program(&self, program: ProgramId) {
        if self.bound_program() == Some(program) {
            self.record_program_binding(None);
        }
    }

    // ===== ERROR-CHECK WRAPPER =====

    /// Run one device call between two error-queue drains
    ///
    /// Use through `device_call!`, which fills in `call`, `file` and `line`.
    /// Returns the call's value when no error was raised. Otherwise the
    /// failure is logged, then either the process aborts or
    /// `Error::DeviceCall` is returned, depending on the failure policy.
    pub fn checked_call<T>(
        &self,
        call: &'static str,
        file: &'static str,
        line: u32,
        f: impl FnOnce(&dyn GraphicsDevice) -> T,
    ) -> Result<T> {
        let stale = drain_errors(self.device());
        if !stale.is_empty() {
            crate::engine_trace!(
                "quad::gl",
                "Discarded {} stale error(s) before {}",
                stale.len(),
                call
            );
        }

        let value = f(self.device());

        let errors = drain_errors(self.device());
        if errors.is_empty() {
            Ok(value)
        } else {
            Err(self.report_failure(call, file, line, errors))
        }
    }

    fn report_failure(
        &self,
        call: &'static str,
        file: &'static str,
        line: u32,
        errors: Vec<DeviceErrorCode>,
    ) -> Error {
        let symbols: Vec<String> = errors.iter().map(|e| e.symbol()).collect();
        Engine::log_detailed(
            LogSeverity::Error,
            "quad::gl",
            format!("[OpenGL Error] {{{}}}: {}", symbols.join(", "), call),
            file,
            line,
        );

        match self.config.failure_policy {
            FailurePolicy::Abort => std::process::abort(),
            FailurePolicy::Propagate => Error::DeviceCall {
                call: call.to_string(),
                file,
                line,
                errors,
            },
        }
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
