/// GPU buffers - write-once vertex and index data
///
/// Data is uploaded once at construction with a static-draw usage hint.
/// There is no resize or partial update.

use std::rc::Rc;

use bytemuck::Pod;

use crate::error::{Error, Result};
use crate::graphics_device::{BufferId, BufferKind, GraphicsContext};

// ============================================================================
// Buffer
// ============================================================================

/// Untyped buffer object
pub struct Buffer {
    ctx: Rc<GraphicsContext>,
    id: BufferId,
    kind: BufferKind,
    size: u64,
}

impl Buffer {
    /// Create a buffer of `kind` and upload `data`
    ///
    /// The new buffer is left bound to its binding point.
    ///
    /// # Errors
    ///
    /// - `InvalidResource` if `data` is empty
    /// - any error of the create / bind / upload device calls
    pub fn new(ctx: Rc<GraphicsContext>, kind: BufferKind, data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            crate::engine_error!("quad::Buffer", "Refusing to create an empty {:?} buffer", kind);
            return Err(Error::InvalidResource(format!("{:?} buffer data is empty", kind)));
        }

        let id = crate::device_call!(ctx, |gl| gl.create_buffer())??;
        let buffer = Self {
            ctx,
            id,
            kind,
            size: data.len() as u64,
        };

        buffer.bind()?;
        crate::device_call!(buffer.ctx, |gl| gl.buffer_data_static(kind, data))?;

        crate::engine_debug!(
            "quad::Buffer",
            "Uploaded {} bytes to {:?} buffer {}",
            buffer.size,
            kind,
            id.0
        );
        Ok(buffer)
    }

    /// Make this buffer the active one of its kind
    pub fn bind(&self) -> Result<()> {
        let (kind, id) = (self.kind, self.id);
        crate::device_call!(self.ctx, |gl| gl.bind_buffer(kind, Some(id)))?;
        self.ctx.record_buffer_binding(kind, Some(id));
        Ok(())
    }

    /// Clear the binding point of this buffer's kind
    pub fn unbind(&self) -> Result<()> {
        let kind = self.kind;
        crate::device_call!(self.ctx, |gl| gl.bind_buffer(kind, None))?;
        self.ctx.record_buffer_binding(kind, None);
        Ok(())
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn kind(&self) -> BufferKind {
        self.kind
    }

    /// Size in bytes
    pub fn size(&self) -> u64 {
        self.size
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        // Unchecked: drop never aborts
        self.ctx.device().delete_buffer(self.id);
        self.ctx.forget_buffer(self.id);
    }
}

// ============================================================================
// VertexBuffer
// ============================================================================

/// Buffer of raw vertex data, interpreted through a `VertexLayout`
pub struct VertexBuffer {
    buffer: Buffer,
}

impl VertexBuffer {
    /// Upload any plain-old-data slice (`f32`, `[f32; 2]`, `glam::Vec2`, ...)
    pub fn new<T: Pod>(ctx: Rc<GraphicsContext>, vertices: &[T]) -> Result<Self> {
        let buffer = Buffer::new(ctx, BufferKind::Vertex, bytemuck::cast_slice(vertices))?;
        Ok(Self { buffer })
    }

    pub fn bind(&self) -> Result<()> {
        self.buffer.bind()
    }

    pub fn unbind(&self) -> Result<()> {
        self.buffer.unbind()
    }

    pub fn id(&self) -> BufferId {
        self.buffer.id()
    }

    pub fn size(&self) -> u64 {
        self.buffer.size()
    }
}

// ============================================================================
// IndexBuffer
// ============================================================================

/// Buffer of `u32` triangle-list indices
pub struct IndexBuffer {
    buffer: Buffer,
    count: u32,
}

impl IndexBuffer {
    pub fn new(ctx: Rc<GraphicsContext>, indices: &[u32]) -> Result<Self> {
        let count = u32::try_from(indices.len()).map_err(|_| {
            Error::InvalidResource(format!("{} indices exceed a u32 draw count", indices.len()))
        })?;
        let buffer = Buffer::new(ctx, BufferKind::Index, bytemuck::cast_slice(indices))?;
        Ok(Self { buffer, count })
    }

    pub fn bind(&self) -> Result<()> {
        self.buffer.bind()
    }

    pub fn unbind(&self) -> Result<()> {
        self.buffer.unbind()
    }

    /// Number of indices, the size of every draw using this buffer
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn id(&self) -> BufferId {
        self.buffer.id()
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
