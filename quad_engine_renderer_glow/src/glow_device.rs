/// GlowDevice - OpenGL implementation of GraphicsDevice via glow
///
/// Each trait method forwards to exactly one GL entry point. Error checking
/// is done one level up by `device_call!`, so nothing here inspects
/// `glGetError` except `get_error` itself.

use glow::HasContext;
use quad_engine::quad::device::{
    BufferId, BufferKind, ClearMask, ComponentType, GraphicsDevice, ProgramId, ShaderId,
    ShaderStage, UniformLocation, VertexArrayId,
};
use quad_engine::quad::Result;
use quad_engine::engine_err;

/// OpenGL device
///
/// Wraps a `glow::Context` whose native context is current on this thread.
/// Creating one is the only unsafe step: every later call relies on that
/// context staying current for as long as the device lives.
pub struct GlowDevice {
    gl: glow::Context,
}

impl GlowDevice {
    /// Wrap a loaded GL function table
    ///
    /// # Safety
    ///
    /// The context `gl` was loaded from must be current on the calling thread
    /// and must outlive the returned device.
    pub unsafe fn new(gl: glow::Context) -> Self {
        let version = gl.version();
        quad_engine::engine_info!(
            "quad::gl",
            "OpenGL {}.{} ({})",
            version.major,
            version.minor,
            version.vendor_info
        );

        #[allow(unused_mut)]
        let mut gl = gl;

        #[cfg(feature = "gl-debug-output")]
        crate::debug::install_debug_callback(&mut gl);

        Self { gl }
    }

    /// Underlying glow context, for calls the engine does not wrap
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }
}

// ============================================================================
// Enum conversions
// ============================================================================

pub(crate) fn buffer_target(kind: BufferKind) -> u32 {
    match kind {
        BufferKind::Vertex => glow::ARRAY_BUFFER,
        BufferKind::Index => glow::ELEMENT_ARRAY_BUFFER,
    }
}

pub(crate) fn shader_type(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

pub(crate) fn attrib_type(component_type: ComponentType) -> u32 {
    match component_type {
        ComponentType::Float => glow::FLOAT,
        ComponentType::UnsignedInt => glow::UNSIGNED_INT,
        ComponentType::UnsignedByte => glow::UNSIGNED_BYTE,
    }
}

pub(crate) fn clear_bits(mask: ClearMask) -> u32 {
    let mut bits = 0;
    if mask.contains(ClearMask::COLOR) {
        bits |= glow::COLOR_BUFFER_BIT;
    }
    if mask.contains(ClearMask::DEPTH) {
        bits |= glow::DEPTH_BUFFER_BIT;
    }
    if mask.contains(ClearMask::STENCIL) {
        bits |= glow::STENCIL_BUFFER_BIT;
    }
    bits
}

// ============================================================================
// Handle conversions
// ============================================================================

fn native_buffer(id: BufferId) -> glow::NativeBuffer {
    glow::NativeBuffer(id.0)
}

fn native_vertex_array(id: VertexArrayId) -> glow::NativeVertexArray {
    glow::NativeVertexArray(id.0)
}

fn native_shader(id: ShaderId) -> glow::NativeShader {
    glow::NativeShader(id.0)
}

fn native_program(id: ProgramId) -> glow::NativeProgram {
    glow::NativeProgram(id.0)
}

// ============================================================================
// GraphicsDevice implementation
// ============================================================================

impl GraphicsDevice for GlowDevice {
    fn get_error(&self) -> u32 {
        unsafe { self.gl.get_error() }
    }

    // ===== BUFFERS =====

    fn create_buffer(&self) -> Result<BufferId> {
        let buffer = unsafe { self.gl.create_buffer() }
            .map_err(|e| engine_err!("quad::gl", "glGenBuffers failed: {}", e))?;
        Ok(BufferId(buffer.0))
    }

    fn delete_buffer(&self, buffer: BufferId) {
        unsafe { self.gl.delete_buffer(native_buffer(buffer)) }
    }

    fn bind_buffer(&self, kind: BufferKind, buffer: Option<BufferId>) {
        unsafe { self.gl.bind_buffer(buffer_target(kind), buffer.map(native_buffer)) }
    }

    fn buffer_data_static(&self, kind: BufferKind, data: &[u8]) {
        unsafe {
            self.gl
                .buffer_data_u8_slice(buffer_target(kind), data, glow::STATIC_DRAW)
        }
    }

    // ===== VERTEX ARRAYS =====

    fn create_vertex_array(&self) -> Result<VertexArrayId> {
        let vertex_array = unsafe { self.gl.create_vertex_array() }
            .map_err(|e| engine_err!("quad::gl", "glGenVertexArrays failed: {}", e))?;
        Ok(VertexArrayId(vertex_array.0))
    }

    fn delete_vertex_array(&self, vertex_array: VertexArrayId) {
        unsafe { self.gl.delete_vertex_array(native_vertex_array(vertex_array)) }
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayId>) {
        unsafe { self.gl.bind_vertex_array(vertex_array.map(native_vertex_array)) }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) }
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
        unsafe {
            self.gl.vertex_attrib_pointer_f32(
                index,
                component_count as i32,
                attrib_type(component_type),
                normalized,
                stride as i32,
                offset as i32,
            )
        }
    }

    // ===== SHADERS =====

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId> {
        let shader = unsafe { self.gl.create_shader(shader_type(stage)) }
            .map_err(|e| engine_err!("quad::gl", "glCreateShader({}) failed: {}", stage, e))?;
        Ok(ShaderId(shader.0))
    }

    fn shader_source(&self, shader: ShaderId, source: &str) {
        unsafe { self.gl.shader_source(native_shader(shader), source) }
    }

    fn compile_shader(&self, shader: ShaderId) {
        unsafe { self.gl.compile_shader(native_shader(shader)) }
    }

    fn shader_compile_status(&self, shader: ShaderId) -> bool {
        unsafe { self.gl.get_shader_compile_status(native_shader(shader)) }
    }

    fn shader_info_log(&self, shader: ShaderId) -> String {
        unsafe { self.gl.get_shader_info_log(native_shader(shader)) }
    }

    fn delete_shader(&self, shader: ShaderId) {
        unsafe { self.gl.delete_shader(native_shader(shader)) }
    }

    // ===== PROGRAMS =====

    fn create_program(&self) -> Result<ProgramId> {
        let program = unsafe { self.gl.create_program() }
            .map_err(|e| engine_err!("quad::gl", "glCreateProgram failed: {}", e))?;
        Ok(ProgramId(program.0))
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        unsafe {
            self.gl
                .attach_shader(native_program(program), native_shader(shader))
        }
    }

    fn link_program(&self, program: ProgramId) {
        unsafe { self.gl.link_program(native_program(program)) }
    }

    fn program_link_status(&self, program: ProgramId) -> bool {
        unsafe { self.gl.get_program_link_status(native_program(program)) }
    }

    fn validate_program(&self, program: ProgramId) {
        unsafe { self.gl.validate_program(native_program(program)) }
    }

    fn program_validate_status(&self, program: ProgramId) -> bool {
        let status = unsafe {
            self.gl
                .get_program_parameter_i32(native_program(program), glow::VALIDATE_STATUS)
        };
        status != 0
    }

    fn program_info_log(&self, program: ProgramId) -> String {
        unsafe { self.gl.get_program_info_log(native_program(program)) }
    }

    fn delete_program(&self, program: ProgramId) {
        unsafe { self.gl.delete_program(native_program(program)) }
    }

    fn use_program(&self, program: Option<ProgramId>) {
        unsafe { self.gl.use_program(program.map(native_program)) }
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        unsafe { self.gl.get_uniform_location(native_program(program), name) }
            .map(|location| UniformLocation(location.0))
    }

    fn uniform_4f(&self, location: UniformLocation, value: [f32; 4]) {
        let location = glow::NativeUniformLocation(location.0);
        unsafe {
            self.gl
                .uniform_4_f32(Some(&location), value[0], value[1], value[2], value[3])
        }
    }

    // ===== FRAME =====

    fn clear_color(&self, rgba: [f32; 4]) {
        unsafe { self.gl.clear_color(rgba[0], rgba[1], rgba[2], rgba[3]) }
    }

    fn clear(&self, mask: ClearMask) {
        unsafe { self.gl.clear(clear_bits(mask)) }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) }
    }

    fn draw_elements(&self, index_count: u32) {
        unsafe {
            self.gl
                .draw_elements(glow::TRIANGLES, index_count as i32, glow::UNSIGNED_INT, 0)
        }
    }
}

#[cfg(test)]
#[path = "glow_device_tests.rs"]
mod tests;
