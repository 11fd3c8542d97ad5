/*!
# Quad Engine - OpenGL Renderer Backend

OpenGL implementation of the Quad engine's `GraphicsDevice` trait.

This crate provides a `GlowDevice` built on the glow bindings and a
`GlWindow` that creates a winit window with a current OpenGL core context
through glutin.

With the `gl-debug-output` feature the device also installs a `KHR_debug`
message callback that forwards driver messages to the engine logger.
*/

// OpenGL implementation modules
mod glow_device;
mod gl_window;

#[cfg(feature = "gl-debug-output")]
mod debug;

pub use glow_device::GlowDevice;
pub use gl_window::{GlWindow, WindowConfig};

// Re-export debug utilities
#[cfg(feature = "gl-debug-output")]
pub use debug::{get_debug_stats, print_debug_stats_report, DebugMessageStats};
