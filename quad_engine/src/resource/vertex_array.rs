/// VertexArray - associates vertex buffers with shader input slots

use std::rc::Rc;

use crate::error::{Error, Result};
use crate::graphics_device::{BufferId, GraphicsContext, VertexArrayId};
use crate::resource::{VertexBuffer, VertexLayout};

/// Vertex array object
///
/// Attribute slots are assigned in layout order starting at 0; a second
/// buffer continues after the slots already used.
pub struct VertexArray {
    ctx: Rc<GraphicsContext>,
    id: VertexArrayId,
    attachments: Vec<(BufferId, VertexLayout)>,
    next_slot: u32,
}

impl VertexArray {
    pub fn new(ctx: Rc<GraphicsContext>) -> Result<Self> {
        let id = crate::device_call!(ctx, |gl| gl.create_vertex_array())??;
        crate::engine_debug!("quad::VertexArray", "Created vertex array {}", id.0);
        Ok(Self {
            ctx,
            id,
            attachments: Vec::new(),
            next_slot: 0,
        })
    }

    /// Register every attribute of `layout` as sourced from `buffer`
    ///
    /// Binds this array, then the buffer, then enables and describes one slot
    /// per attribute. Leaves both bound.
    ///
    /// # Errors
    ///
    /// - `InvalidResource` if `buffer` was already attached with a different layout
    /// - any error of the bind / attribute device calls
    pub fn add_buffer(&mut self, buffer: &VertexBuffer, layout: &VertexLayout) -> Result<()> {
        if let Some((_, existing)) = self.attachments.iter().find(|(id, _)| *id == buffer.id()) {
            if existing == layout {
                return Ok(());
            }
            crate::engine_error!(
                "quad::VertexArray",
                "Buffer {} is already attached to vertex array {} with another layout",
                buffer.id().0,
                self.id.0
            );
            return Err(Error::InvalidResource(format!(
                "buffer {} already attached with a different layout",
                buffer.id().0
            )));
        }

        if layout.is_empty() {
            crate::engine_warn!(
                "quad::VertexArray",
                "Attaching buffer {} with an empty layout, no attribute slot enabled",
                buffer.id().0
            );
        }

        self.bind()?;
        buffer.bind()?;

        let stride = layout.stride();
        for attribute in layout.attributes() {
            let slot = self.next_slot;
            let attribute = *attribute;
            crate::device_call!(self.ctx, |gl| gl.enable_vertex_attrib_array(slot))?;
            crate::device_call!(self.ctx, |gl| gl.vertex_attrib_pointer(
                slot,
                attribute.component_count,
                attribute.component_type,
                attribute.normalized,
                stride,
                attribute.offset
            ))?;
            self.next_slot += 1;
        }

        self.attachments.push((buffer.id(), layout.clone()));
        Ok(())
    }

    pub fn bind(&self) -> Result<()> {
        let id = self.id;
        crate::device_call!(self.ctx, |gl| gl.bind_vertex_array(Some(id)))?;
        self.ctx.record_vertex_array_binding(Some(id));
        Ok(())
    }

    pub fn unbind(&self) -> Result<()> {
        crate::device_call!(self.ctx, |gl| gl.bind_vertex_array(None))?;
        self.ctx.record_vertex_array_binding(None);
        Ok(())
    }

    pub fn id(&self) -> VertexArrayId {
        self.id
    }

    /// Number of enabled attribute slots
    pub fn enabled_slots(&self) -> u32 {
        self.next_slot
    }

    /// Attached (buffer, layout) pairs in attachment order
    pub fn attachments(&self) -> &[(BufferId, VertexLayout)] {
        &self.attachments
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        self.ctx.device().delete_vertex_array(self.id);
        self.ctx.forget_vertex_array(self.id);
    }
}

#[cfg(test)]
#[path = "vertex_array_tests.rs"]
mod tests;
