#![allow(dead_code)]
//! Device test utilities - in-memory GraphicsDevice for integration tests
//!
//! Integration tests only see the public API, so they cannot use the crate's
//! internal mock. `RecordingDevice` implements `GraphicsDevice` from the
//! outside the way a backend would, keeping just enough state to check what
//! the engine asked for: the method names in call order, uploaded uniforms,
//! draws and an injectable error queue.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::num::NonZeroU32;
use std::rc::Rc;

use quad_engine::quad::device::{
    BufferId, BufferKind, ClearMask, ComponentType, FailurePolicy, GraphicsContext,
    GraphicsDevice, ProgramId, ShaderId, ShaderStage, UniformLocation, VertexArrayId,
};
use quad_engine::quad::{RendererConfig, Result};

#[derive(Default)]
struct DeviceState {
    calls: Vec<&'static str>,
    errors: VecDeque<u32>,
    error_on: Option<(&'static str, u32)>,
    uniforms: HashMap<String, u32>,
    uniform_values: Vec<(u32, [f32; 4])>,
    draws: Vec<u32>,
    viewports: Vec<(i32, i32, i32, i32)>,
    next_id: u32,
}

/// Records every call; shaders always compile and programs always link
#[derive(Clone, Default)]
pub struct RecordingDevice {
    state: Rc<RefCell<DeviceState>>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an active uniform, visible from every program
    pub fn with_uniform(self, name: &str, location: u32) -> Self {
        self.state.borrow_mut().uniforms.insert(name.to_string(), location);
        self
    }

    /// Raise `code` the next time `method` is called
    pub fn fail_next(&self, method: &'static str, code: u32) {
        self.state.borrow_mut().error_on = Some((method, code));
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn uniform_values(&self) -> Vec<(u32, [f32; 4])> {
        self.state.borrow().uniform_values.clone()
    }

    pub fn draws(&self) -> Vec<u32> {
        self.state.borrow().draws.clone()
    }

    pub fn viewports(&self) -> Vec<(i32, i32, i32, i32)> {
        self.state.borrow().viewports.clone()
    }

    fn record(&self, method: &'static str) {
        let mut state = self.state.borrow_mut();
        state.calls.push(method);
        if let Some((failing, code)) = state.error_on {
            if failing == method {
                state.errors.push_back(code);
                state.error_on = None;
            }
        }
    }

    fn next_id(&self) -> NonZeroU32 {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        NonZeroU32::new(state.next_id).unwrap()
    }
}

impl GraphicsDevice for RecordingDevice {
    fn get_error(&self) -> u32 {
        self.state.borrow_mut().errors.pop_front().unwrap_or(0)
    }

    fn create_buffer(&self) -> Result<BufferId> {
        self.record("create_buffer");
        Ok(BufferId(self.next_id()))
    }

    fn delete_buffer(&self, _buffer: BufferId) {
        self.record("delete_buffer");
    }

    fn bind_buffer(&self, kind: BufferKind, _buffer: Option<BufferId>) {
        self.record(match kind {
            BufferKind::Vertex => "bind_vertex_buffer",
            BufferKind::Index => "bind_index_buffer",
        });
    }

    fn buffer_data_static(&self, _kind: BufferKind, _data: &[u8]) {
        self.record("buffer_data_static");
    }

    fn create_vertex_array(&self) -> Result<VertexArrayId> {
        self.record("create_vertex_array");
        Ok(VertexArrayId(self.next_id()))
    }

    fn delete_vertex_array(&self, _vertex_array: VertexArrayId) {
        self.record("delete_vertex_array");
    }

    fn bind_vertex_array(&self, _vertex_array: Option<VertexArrayId>) {
        self.record("bind_vertex_array");
    }

    fn enable_vertex_attrib_array(&self, _index: u32) {
        self.record("enable_vertex_attrib_array");
    }

    fn vertex_attrib_pointer(
        &self,
        _index: u32,
        _component_count: u32,
        _component_type: ComponentType,
        _normalized: bool,
        _stride: u32,
        _offset: u32,
    ) {
        self.record("vertex_attrib_pointer");
    }

    fn create_shader(&self, _stage: ShaderStage) -> Result<ShaderId> {
        self.record("create_shader");
        Ok(ShaderId(self.next_id()))
    }

    fn shader_source(&self, _shader: ShaderId, _source: &str) {
        self.record("shader_source");
    }

    fn compile_shader(&self, _shader: ShaderId) {
        self.record("compile_shader");
    }

    fn shader_compile_status(&self, _shader: ShaderId) -> bool {
        true
    }

    fn shader_info_log(&self, _shader: ShaderId) -> String {
        String::new()
    }

    fn delete_shader(&self, _shader: ShaderId) {
        self.record("delete_shader");
    }

    fn create_program(&self) -> Result<ProgramId> {
        self.record("create_program");
        Ok(ProgramId(self.next_id()))
    }

    fn attach_shader(&self, _program: ProgramId, _shader: ShaderId) {
        self.record("attach_shader");
    }

    fn link_program(&self, _program: ProgramId) {
        self.record("link_program");
    }

    fn program_link_status(&self, _program: ProgramId) -> bool {
        true
    }

    fn validate_program(&self, _program: ProgramId) {
        self.record("validate_program");
    }

    fn program_validate_status(&self, _program: ProgramId) -> bool {
        true
    }

    fn program_info_log(&self, _program: ProgramId) -> String {
        String::new()
    }

    fn delete_program(&self, _program: ProgramId) {
        self.record("delete_program");
    }

    fn use_program(&self, _program: Option<ProgramId>) {
        self.record("use_program");
    }

    fn uniform_location(&self, _program: ProgramId, name: &str) -> Option<UniformLocation> {
        self.record("uniform_location");
        self.state.borrow().uniforms.get(name).map(|l| UniformLocation(*l))
    }

    fn uniform_4f(&self, location: UniformLocation, value: [f32; 4]) {
        self.record("uniform_4f");
        self.state.borrow_mut().uniform_values.push((location.0, value));
    }

    fn clear_color(&self, _rgba: [f32; 4]) {
        self.record("clear_color");
    }

    fn clear(&self, _mask: ClearMask) {
        self.record("clear");
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record("viewport");
        self.state.borrow_mut().viewports.push((x, y, width, height));
    }

    fn draw_elements(&self, index_count: u32) {
        self.record("draw_elements");
        self.state.borrow_mut().draws.push(index_count);
    }
}

/// Context over `device` with the `Propagate` failure policy
pub fn test_context(device: &RecordingDevice) -> Rc<GraphicsContext> {
    let config = RendererConfig {
        failure_policy: FailurePolicy::Propagate,
        app_name: "Quad Integration Tests".to_string(),
        ..Default::default()
    };
    GraphicsContext::new(device.clone(), config)
}

/// Path of the shader shipped with the demo
pub fn basic_shader_path() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("quad_demo")
        .join("res")
        .join("shaders")
        .join("basic.shader")
}
