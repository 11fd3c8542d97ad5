//! Quad demo - draws one colored quad whose red channel pulses over time
//!
//! Run with: cargo run -p quad_demo
//! With driver debug output: cargo run -p quad_demo --features gl-debug-output

use std::path::PathBuf;
use std::rc::Rc;

use quad_engine::quad::device::GraphicsContext;
use quad_engine::quad::resource::{IndexBuffer, ShaderProgram, VertexArray, VertexBuffer, VertexLayout};
use quad_engine::quad::{Renderer, RendererConfig, Result};
use quad_engine::{engine_error, engine_info};
use quad_engine_renderer_glow::{GlWindow, WindowConfig};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

const POSITIONS: [f32; 8] = [
    -0.5, -0.5,
     0.5, -0.5,
     0.5,  0.5,
    -0.5,  0.5,
];

const INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

const PULSE_STEP: f32 = 0.05;

fn shader_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("res/shaders/basic.shader")
}

// ============================================================================
// Color pulse
// ============================================================================

/// Red channel bouncing between 0 and 1 in fixed steps
///
/// The direction flips once the value has left [0, 1], so it overshoots
/// by at most one step.
struct ColorPulse {
    value: f32,
    increment: f32,
}

impl ColorPulse {
    fn new() -> Self {
        Self {
            value: 0.0,
            increment: PULSE_STEP,
        }
    }

    /// Return the current value, then advance one step
    fn next(&mut self) -> f32 {
        let current = self.value;
        if self.value > 1.0 {
            self.increment = -PULSE_STEP;
        } else if self.value < 0.0 {
            self.increment = PULSE_STEP;
        }
        self.value += self.increment;
        current
    }
}

// ============================================================================
// Scene
// ============================================================================

/// GPU resources of the quad
struct QuadScene {
    vertex_array: VertexArray,
    index_buffer: IndexBuffer,
    shader: ShaderProgram,
    _vertex_buffer: VertexBuffer,
}

impl QuadScene {
    fn new(ctx: &Rc<GraphicsContext>) -> Result<Self> {
        let mut vertex_array = VertexArray::new(ctx.clone())?;
        let vertex_buffer = VertexBuffer::new(ctx.clone(), &POSITIONS)?;

        let mut layout = VertexLayout::new();
        layout.push::<f32>(2)?;
        vertex_array.add_buffer(&vertex_buffer, &layout)?;

        let index_buffer = IndexBuffer::new(ctx.clone(), &INDICES)?;

        let shader = ShaderProgram::from_file(ctx.clone(), shader_path())?;
        shader.bind()?;
        shader.set_uniform_4f("u_Color", 0.8, 0.3, 0.8, 1.0)?;

        vertex_array.unbind()?;
        shader.unbind()?;
        vertex_buffer.unbind()?;
        index_buffer.unbind()?;

        Ok(Self {
            vertex_array,
            index_buffer,
            shader,
            _vertex_buffer: vertex_buffer,
        })
    }
}

/// Everything that exists once the window is up
///
/// Field order is drop order: GPU resources are released while the context
/// is still current.
struct Running {
    scene: QuadScene,
    renderer: Renderer,
    window: GlWindow,
}

// ============================================================================
// Application
// ============================================================================

struct QuadApp {
    window_config: WindowConfig,
    renderer_config: RendererConfig,
    running: Option<Running>,
    pulse: ColorPulse,
}

impl QuadApp {
    fn new() -> Self {
        Self {
            window_config: WindowConfig::default(),
            renderer_config: RendererConfig {
                app_name: "Quad Demo".to_string(),
                ..Default::default()
            },
            running: None,
            pulse: ColorPulse::new(),
        }
    }

    fn start(&self, event_loop: &ActiveEventLoop) -> Result<Running> {
        let (window, device) = GlWindow::new(event_loop, &self.window_config)?;
        let ctx = GraphicsContext::new(device, self.renderer_config.clone());
        let scene = QuadScene::new(&ctx)?;
        let renderer = Renderer::new(ctx);

        engine_info!("quad::Demo", "Setup complete");
        Ok(Running {
            scene,
            renderer,
            window,
        })
    }

    fn frame(&mut self) -> Result<()> {
        let Some(running) = self.running.as_ref() else {
            return Ok(());
        };
        let scene = &running.scene;
        let red = self.pulse.next();

        running.renderer.begin_frame();
        running.renderer.clear()?;

        scene.shader.bind()?;
        scene.shader.set_uniform_4f("u_Color", red, 0.3, 0.8, 1.0)?;
        running
            .renderer
            .draw(&scene.vertex_array, &scene.index_buffer, &scene.shader)?;

        running.window.swap_buffers()?;
        running.window.window().request_redraw();
        Ok(())
    }

    fn resize(&self, width: u32, height: u32) -> Result<()> {
        let Some(running) = self.running.as_ref() else {
            return Ok(());
        };
        if running.window.resize(width, height) {
            running.renderer.set_viewport(0, 0, width, height)?;
        }
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, what: &str, error: quad_engine::quad::Error) {
        engine_error!("quad::Demo", "{} failed: {}", what, error);
        self.running = None;
        event_loop.exit();
    }
}

impl ApplicationHandler for QuadApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }

        match self.start(event_loop) {
            Ok(running) => {
                running.window.window().request_redraw();
                self.running = Some(running);
            }
            Err(e) => self.fail(event_loop, "Setup", e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.running = None;
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Err(e) = self.resize(size.width, size.height) {
                    self.fail(event_loop, "Resize", e);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.frame() {
                    self.fail(event_loop, "Frame", e);
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        #[cfg(feature = "gl-debug-output")]
        quad_engine_renderer_glow::print_debug_stats_report();
    }
}

fn main() {
    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            engine_error!("quad::Demo", "Failed to create event loop: {}", e);
            std::process::exit(1);
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = QuadApp::new();
    if let Err(e) = event_loop.run_app(&mut app) {
        engine_error!("quad::Demo", "Event loop terminated with error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_starts_at_zero_and_steps_up() {
        let mut pulse = ColorPulse::new();
        assert_eq!(pulse.next(), 0.0);
        assert!((pulse.next() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_pulse_stays_within_one_step_of_range() {
        let mut pulse = ColorPulse::new();
        let values: Vec<f32> = (0..200).map(|_| pulse.next()).collect();

        assert!(values.iter().all(|v| *v >= -PULSE_STEP - 1e-4 && *v <= 1.0 + PULSE_STEP + 1e-4));
        // Goes up to the top and comes back down
        assert!(values.iter().any(|v| *v > 0.95));
        assert!(values[60..].iter().any(|v| *v < 0.05));
    }

    #[test]
    fn test_shader_file_ships_with_demo() {
        assert!(shader_path().is_file());
    }
}
