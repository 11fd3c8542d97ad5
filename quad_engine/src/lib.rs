/*!
# Quad Engine

Core types for a minimal immediate-mode rendering scaffold.

This crate is platform-agnostic: it talks to the graphics driver only through
the `GraphicsDevice` trait, implemented by a backend crate (OpenGL via glow)
and by a mock device in tests.

## Architecture

- **GraphicsDevice**: one method per native call
- **GraphicsContext**: owns the device, the current-binding record and the failure policy
- **device_call!**: error-check wrapper around every native call
- **VertexBuffer / IndexBuffer**: write-once GPU buffers
- **VertexLayout / VertexArray**: attribute description and slot binding
- **ShaderProgram**: combined-file parsing, compile, link, uniform cache
- **Renderer**: clear and indexed draw dispatch

Per frame the driver calls `Renderer::clear`, binds the program, sets its
uniforms, then calls `Renderer::draw`.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod graphics_device;
pub mod resource;
pub mod renderer;

// Main quad namespace module
pub mod quad {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging hub
    pub use crate::engine::Engine;

    // Renderer
    pub use crate::renderer::{Renderer, RendererConfig, RendererStats};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Device sub-module
    pub mod device {
        pub use crate::graphics_device::*;
    }

    // Resource sub-module
    pub mod resource {
        pub use crate::resource::*;
    }
}

// Re-export math library at crate root
pub use glam;
