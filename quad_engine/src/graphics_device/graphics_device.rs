/// GraphicsDevice trait - one method per native graphics call
///
/// This is the seam between the engine and the driver. Every method maps to a
/// single immediate-mode call; the engine wraps each of them in the
/// error-check wrapper (`device_call!`) so that implementations stay thin.

use std::fmt;
use std::num::NonZeroU32;

use bitflags::bitflags;

use crate::error::Result;

// ============================================================================
// Handles
// ============================================================================

/// Native buffer object handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub NonZeroU32);

/// Native vertex array object handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexArrayId(pub NonZeroU32);

/// Native shader stage object handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderId(pub NonZeroU32);

/// Native linked program handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub NonZeroU32);

/// Location of an active uniform inside a linked program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

// ============================================================================
// Enums
// ============================================================================

/// Buffer binding point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// Vertex attribute data (GL_ARRAY_BUFFER)
    Vertex,
    /// Element indices (GL_ELEMENT_ARRAY_BUFFER)
    Index,
}

/// Shader pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Fragment shader
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// Scalar type of one vertex attribute component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    /// 32-bit float
    Float,
    /// 32-bit unsigned integer
    UnsignedInt,
    /// 8-bit unsigned integer
    UnsignedByte,
}

impl ComponentType {
    /// Size in bytes of one component
    pub fn size_bytes(&self) -> u32 {
        match self {
            ComponentType::Float => 4,
            ComponentType::UnsignedInt => 4,
            ComponentType::UnsignedByte => 1,
        }
    }
}

bitflags! {
    /// Framebuffer planes cleared by `GraphicsDevice::clear`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearMask: u32 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
    }
}

// ============================================================================
// GraphicsDevice trait
// ============================================================================

/// Native graphics API
///
/// Implemented by backend-specific devices (e.g., `GlowDevice`). Methods take
/// `&self`: the driver owns the mutable state, and binding a resource mutates
/// that process-wide state as a side effect. There is no `Send`/`Sync` bound
/// because a graphics context belongs to the thread that made it current.
///
/// Creation methods return `Err` when the driver cannot allocate a handle.
/// All other failures are reported through `get_error`.
pub trait GraphicsDevice {
    /// Pop the oldest pending error code, `0` when the queue is empty
    fn get_error(&self) -> u32;

    // ===== BUFFERS =====

    fn create_buffer(&self) -> Result<BufferId>;
    fn delete_buffer(&self, buffer: BufferId);

    /// Make `buffer` the active buffer of `kind`, or clear the binding
    fn bind_buffer(&self, kind: BufferKind, buffer: Option<BufferId>);

    /// Upload `data` to the buffer bound to `kind` with a static-draw usage hint
    fn buffer_data_static(&self, kind: BufferKind, data: &[u8]);

    // ===== VERTEX ARRAYS =====

    fn create_vertex_array(&self) -> Result<VertexArrayId>;
    fn delete_vertex_array(&self, vertex_array: VertexArrayId);
    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayId>);
    fn enable_vertex_attrib_array(&self, index: u32);

    /// Describe attribute `index` of the bound vertex array, sourced from the
    /// bound vertex buffer
    fn vertex_attrib_pointer(
        &self,
        index: u32,
        component_count: u32,
        component_type: ComponentType,
        normalized: bool,
        stride: u32,
        offset: u32,
    );

    // ===== SHADERS =====

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId>;
    fn shader_source(&self, shader: ShaderId, source: &str);
    fn compile_shader(&self, shader: ShaderId);
    fn shader_compile_status(&self, shader: ShaderId) -> bool;
    fn shader_info_log(&self, shader: ShaderId) -> String;
    fn delete_shader(&self, shader: ShaderId);

    // ===== PROGRAMS =====

    fn create_program(&self) -> Result<ProgramId>;
    fn attach_shader(&self, program: ProgramId, shader: ShaderId);
    fn link_program(&self, program: ProgramId);
    fn program_link_status(&self, program: ProgramId) -> bool;
    fn validate_program(&self, program: ProgramId);
    fn program_validate_status(&self, program: ProgramId) -> bool;
    fn program_info_log(&self, program: ProgramId) -> String;
    fn delete_program(&self, program: ProgramId);
    fn use_program(&self, program: Option<ProgramId>);

    /// Native location lookup, `None` when the program has no such active uniform
    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation>;

    /// Upload a vec4 to `location` of the program in use
    fn uniform_4f(&self, location: UniformLocation, value: [f32; 4]);

    // ===== FRAME =====

    fn clear_color(&self, rgba: [f32; 4]);
    fn clear(&self, mask: ClearMask);
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);

    /// Draw a triangle list of `index_count` `u32` indices from offset 0 of the
    /// bound index buffer
    fn draw_elements(&self, index_count: u32);
}
