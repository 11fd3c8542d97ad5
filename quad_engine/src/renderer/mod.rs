/// Renderer module - configuration, statistics and draw dispatch

pub mod renderer;

pub use renderer::*;
