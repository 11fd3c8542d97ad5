/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Records every native call as a short string and lets tests inject driver
/// behavior: queued error codes, compile/link/validate failures and a table
/// of active uniforms. Clones share state, so a test can hand one clone to a
/// `GraphicsContext` and inspect the other.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::num::NonZeroU32;
use std::rc::Rc;

use crate::error::Result;
use crate::graphics_device::{
    BufferId, BufferKind, ClearMask, ComponentType, GraphicsDevice, ProgramId, ShaderId,
    ShaderStage, UniformLocation, VertexArrayId, NO_ERROR,
};

#[derive(Debug, Default)]
pub struct MockState {
    pub calls: Vec<String>,
    pub pending_errors: VecDeque<u32>,
    pub raise_on_next_call: Option<u32>,
    pub compile_failure: Option<(ShaderStage, String)>,
    pub link_failure: Option<String>,
    pub validate_failure: Option<String>,
    pub info_log_error: Option<u32>,
    pub uniforms: HashMap<String, u32>,
    pub uniform_queries: u32,
    pub uploads: Vec<(BufferKind, Vec<u8>)>,
    pub uniform_values: Vec<(u32, [f32; 4])>,
    pub draws: Vec<u32>,
    next_id: u32,
    shader_stages: HashMap<u32, ShaderStage>,
    compiled: HashMap<u32, bool>,
    linked: HashMap<u32, bool>,
}

#[derive(Debug, Clone, Default)]
pub struct MockGraphicsDevice {
    state: Rc<RefCell<MockState>>,
}

fn id_str(id: Option<NonZeroU32>) -> String {
    match id {
        Some(id) => id.get().to_string(),
        None => "none".to_string(),
    }
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Count recorded calls whose text starts with `prefix`
    pub fn count_calls(&self, prefix: &str) -> usize {
        self.state.borrow().calls.iter().filter(|c| c.starts_with(prefix)).count()
    }

    /// Queue an error that is already pending before the next call
    pub fn push_stale_error(&self, code: u32) {
        self.state.borrow_mut().pending_errors.push_back(code);
    }

    /// Make the next recorded call raise `code`
    pub fn raise_on_next_call(&self, code: u32) {
        self.state.borrow_mut().raise_on_next_call = Some(code);
    }

    pub fn fail_compile(&self, stage: ShaderStage, log: &str) {
        self.state.borrow_mut().compile_failure = Some((stage, log.to_string()));
    }

    pub fn fail_link(&self, log: &str) {
        self.state.borrow_mut().link_failure = Some(log.to_string());
    }

    /// Make every info-log read leave `code` pending
    pub fn raise_on_info_log(&self, code: u32) {
        self.state.borrow_mut().info_log_error = Some(code);
    }

    pub fn fail_validation(&self, log: &str) {
        self.state.borrow_mut().validate_failure = Some(log.to_string());
    }

    /// Declare an active uniform for every program
    pub fn define_uniform(&self, name: &str, location: u32) {
        self.state.borrow_mut().uniforms.insert(name.to_string(), location);
    }

    pub fn uniform_queries(&self) -> u32 {
        self.state.borrow().uniform_queries
    }

    pub fn uploads(&self) -> Vec<(BufferKind, Vec<u8>)> {
        self.state.borrow().uploads.clone()
    }

    pub fn uniform_values(&self) -> Vec<(u32, [f32; 4])> {
        self.state.borrow().uniform_values.clone()
    }

    pub fn draws(&self) -> Vec<u32> {
        self.state.borrow().draws.clone()
    }

    fn record(&self, call: String) {
        let mut state = self.state.borrow_mut();
        state.calls.push(call);
        if let Some(code) = state.raise_on_next_call.take() {
            state.pending_errors.push_back(code);
        }
    }

    fn raise_info_log_error(&self) {
        let mut state = self.state.borrow_mut();
        if let Some(code) = state.info_log_error {
            state.pending_errors.push_back(code);
        }
    }

    fn allocate(&self) -> NonZeroU32 {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        NonZeroU32::new(state.next_id).unwrap()
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn get_error(&self) -> u32 {
        self.state.borrow_mut().pending_errors.pop_front().unwrap_or(NO_ERROR)
    }

    // ===== BUFFERS =====

    fn create_buffer(&self) -> Result<BufferId> {
        let id = self.allocate();
        self.record(format!("create_buffer({})", id));
        Ok(BufferId(id))
    }

    fn delete_buffer(&self, buffer: BufferId) {
        self.record(format!("delete_buffer({})", buffer.0));
    }

    fn bind_buffer(&self, kind: BufferKind, buffer: Option<BufferId>) {
        self.record(format!("bind_buffer({:?}, {})", kind, id_str(buffer.map(|b| b.0))));
    }

    fn buffer_data_static(&self, kind: BufferKind, data: &[u8]) {
        self.record(format!("buffer_data_static({:?}, {})", kind, data.len()));
        self.state.borrow_mut().uploads.push((kind, data.to_vec()));
    }

    // ===== VERTEX ARRAYS =====

    fn create_vertex_array(&self) -> Result<VertexArrayId> {
        let id = self.allocate();
        self.record(format!("create_vertex_array({})", id));
        Ok(VertexArrayId(id))
    }

    fn delete_vertex_array(&self, vertex_array: VertexArrayId) {
        self.record(format!("delete_vertex_array({})", vertex_array.0));
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayId>) {
        self.record(format!("bind_vertex_array({})", id_str(vertex_array.map(|v| v.0))));
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(format!("enable_vertex_attrib_array({})", index));
    }

    fn vertex_attrib_pointer(
        &self,
        index: u32,
        component_count: u32,
        component_type: ComponentType,
        normalized: bool,
        stride: u32,
        offset: u32,
    ) {
        self.record(format!(
            "vertex_attrib_pointer({}, {}, {:?}, {}, {}, {})",
            index, component_count, component_type, normalized, stride, offset
        ));
    }

    // ===== SHADERS =====

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId> {
        let id = self.allocate();
        self.record(format!("create_shader({})", stage));
        self.state.borrow_mut().shader_stages.insert(id.get(), stage);
        Ok(ShaderId(id))
    }

    fn shader_source(&self, shader: ShaderId, source: &str) {
        self.record(format!("shader_source({}, {})", shader.0, source.len()));
    }

    fn compile_shader(&self, shader: ShaderId) {
        self.record(format!("compile_shader({})", shader.0));
        let mut state = self.state.borrow_mut();
        let stage = state.shader_stages.get(&shader.0.get()).copied();
        let failed = matches!(
            (&state.compile_failure, stage),
            (Some((failing, _)), Some(stage)) if *failing == stage
        );
        state.compiled.insert(shader.0.get(), !failed);
    }

    fn shader_compile_status(&self, shader: ShaderId) -> bool {
        self.state.borrow().compiled.get(&shader.0.get()).copied().unwrap_or(false)
    }

    fn shader_info_log(&self, _shader: ShaderId) -> String {
        self.raise_info_log_error();
        match &self.state.borrow().compile_failure {
            Some((_, log)) => log.clone(),
            None => String::new(),
        }
    }

    fn delete_shader(&self, shader: ShaderId) {
        self.record(format!("delete_shader({})", shader.0));
    }

    // ===== PROGRAMS =====

    fn create_program(&self) -> Result<ProgramId> {
        let id = self.allocate();
        self.record(format!("create_program({})", id));
        Ok(ProgramId(id))
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        self.record(format!("attach_shader({}, {})", program.0, shader.0));
    }

    fn link_program(&self, program: ProgramId) {
        self.record(format!("link_program({})", program.0));
        let mut state = self.state.borrow_mut();
        let ok = state.link_failure.is_none();
        state.linked.insert(program.0.get(), ok);
    }

    fn program_link_status(&self, program: ProgramId) -> bool {
        self.state.borrow().linked.get(&program.0.get()).copied().unwrap_or(false)
    }

    fn validate_program(&self, program: ProgramId) {
        self.record(format!("validate_program({})", program.0));
    }

    fn program_validate_status(&self, _program: ProgramId) -> bool {
        self.state.borrow().validate_failure.is_none()
    }

    fn program_info_log(&self, _program: ProgramId) -> String {
        self.raise_info_log_error();
        let state = self.state.borrow();
        state
            .link_failure
            .clone()
            .or_else(|| state.validate_failure.clone())
            .unwrap_or_default()
    }

    fn delete_program(&self, program: ProgramId) {
        self.record(format!("delete_program({})", program.0));
    }

    fn use_program(&self, program: Option<ProgramId>) {
        self.record(format!("use_program({})", id_str(program.map(|p| p.0))));
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        self.record(format!("uniform_location({}, {})", program.0, name));
        let mut state = self.state.borrow_mut();
        state.uniform_queries += 1;
        state.uniforms.get(name).map(|location| UniformLocation(*location))
    }

    fn uniform_4f(&self, location: UniformLocation, value: [f32; 4]) {
        self.record(format!("uniform_4f({})", location.0));
        self.state.borrow_mut().uniform_values.push((location.0, value));
    }

    // ===== FRAME =====

    fn clear_color(&self, rgba: [f32; 4]) {
        self.record(format!("clear_color({:?})", rgba));
    }

    fn clear(&self, mask: ClearMask) {
        self.record(format!("clear({:?})", mask));
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(format!("viewport({}, {}, {}, {})", x, y, width, height));
    }

    fn draw_elements(&self, index_count: u32) {
        self.record(format!("draw_elements({})", index_count));
        self.state.borrow_mut().draws.push(index_count);
    }
}

/// Context over a fresh mock device, with the `Propagate` policy so failures
/// surface as errors instead of aborting the test binary
pub fn mock_context() -> (Rc<crate::graphics_device::GraphicsContext>, MockGraphicsDevice) {
    let device = MockGraphicsDevice::new();
    let config = crate::renderer::RendererConfig {
        failure_policy: crate::graphics_device::FailurePolicy::Propagate,
        ..Default::default()
    };
    let ctx = crate::graphics_device::GraphicsContext::new(device.clone(), config);
    (ctx, device)
}
