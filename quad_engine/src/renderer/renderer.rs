/// Renderer - clear and draw dispatch

use std::cell::Cell;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::graphics_device::{ClearMask, FailurePolicy, GraphicsContext};
use crate::resource::{IndexBuffer, ShaderProgram, VertexArray};

// ============================================================================
// Configuration and statistics
// ============================================================================

/// Renderer configuration
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// What the device-call checker does on a native error
    pub failure_policy: FailurePolicy,
    /// Color written by `Renderer::clear`
    pub clear_color: [f32; 4],
    /// Application name (diagnostics only)
    pub app_name: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::default(),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            app_name: "Quad Application".to_string(),
        }
    }
}

/// Renderer statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RendererStats {
    /// Number of draw calls this frame
    pub draw_calls: u32,
    /// Number of triangles drawn this frame
    pub triangles: u32,
}

// ============================================================================
// Renderer
// ============================================================================

/// Draw dispatch
///
/// Owns no resources: `draw` borrows the vertex array, index buffer and
/// program for the duration of one call. Whether their layouts agree with
/// each other is the caller's contract and is not checked.
pub struct Renderer {
    ctx: Rc<GraphicsContext>,
    stats: Cell<RendererStats>,
}

impl Renderer {
    pub fn new(ctx: Rc<GraphicsContext>) -> Self {
        Self {
            ctx,
            stats: Cell::new(RendererStats::default()),
        }
    }

    /// Reset per-frame statistics
    pub fn begin_frame(&self) {
        self.stats.set(RendererStats::default());
    }

    pub fn stats(&self) -> RendererStats {
        self.stats.get()
    }

    /// Clear the color buffer with the configured clear color
    pub fn clear(&self) -> Result<()> {
        let rgba = self.ctx.config().clear_color;
        crate::device_call!(self.ctx, |gl| gl.clear_color(rgba))?;
        crate::device_call!(self.ctx, |gl| gl.clear(ClearMask::COLOR))
    }

    /// Bind program, vertex array and index buffer (in that order), then issue
    /// one indexed triangle-list draw sized by the index buffer
    pub fn draw(
        &self,
        vertex_array: &VertexArray,
        index_buffer: &IndexBuffer,
        shader: &ShaderProgram,
    ) -> Result<()> {
        shader.bind()?;
        vertex_array.bind()?;
        index_buffer.bind()?;

        let count = index_buffer.count();
        crate::device_call!(self.ctx, |gl| gl.draw_elements(count))?;

        let mut stats = self.stats.get();
        stats.draw_calls += 1;
        stats.triangles += count / 3;
        self.stats.set(stats);

        crate::engine_trace!("quad::Renderer", "Drew {} indices", count);
        Ok(())
    }

    /// Set the viewport, typically after a window resize
    ///
    /// # Errors
    ///
    /// `InvalidResource` if `width` or `height` does not fit in an `i32`.
    pub fn set_viewport(&self, x: i32, y: i32, width: u32, height: u32) -> Result<()> {
        let (Ok(width), Ok(height)) = (i32::try_from(width), i32::try_from(height)) else {
            return Err(Error::InvalidResource(format!(
                "viewport {}x{} exceeds the native size range",
                width, height
            )));
        };
        crate::device_call!(self.ctx, |gl| gl.viewport(x, y, width, height))
    }
}

#[cfg(test)]
#[path = "renderer_tests.rs"]
mod tests;
