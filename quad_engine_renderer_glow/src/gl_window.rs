/// GlWindow - winit window with a current OpenGL core context
///
/// Window, display, context and surface are created together through
/// glutin-winit, then the GL function table is loaded into a `GlowDevice`.

use std::fmt::Display;
use std::num::NonZeroU32;

use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow as _};
use quad_engine::quad::{Error, Result};
use raw_window_handle::HasWindowHandle;
use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

use crate::glow_device::GlowDevice;

/// Window and context creation parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub title: String,
    /// Initial inner size in logical pixels
    pub width: u32,
    pub height: u32,
    /// Requested core-profile version (major, minor)
    pub gl_version: (u8, u8),
    /// Swap interval 1 when set, 0 otherwise
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Hello World".to_string(),
            width: 640,
            height: 480,
            gl_version: (3, 3),
            vsync: true,
        }
    }
}

/// Presentation target of the demo
pub struct GlWindow {
    // Declaration order is drop order: surface and context go before the window.
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
}

impl GlWindow {
    /// Create the window, make its context current on this thread and load GL
    ///
    /// # Errors
    ///
    /// `InitializationFailed` when any step of window, context or surface
    /// creation fails (no display, unsupported GL version, ...).
    pub fn new(event_loop: &ActiveEventLoop, config: &WindowConfig) -> Result<(Self, GlowDevice)> {
        let attributes = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(config.width, config.height));

        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(attributes))
            .build(event_loop, ConfigTemplateBuilder::new(), pick_config)
            .map_err(|e| init_failed("create window", e))?;
        let window = window.ok_or_else(|| init_failed("create window", "no window returned"))?;

        let raw_handle = window
            .window_handle()
            .map_err(|e| init_failed("get window handle", e))?
            .as_raw();

        let (major, minor) = config.gl_version;
        let context_attributes = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .build(Some(raw_handle));

        let gl_display = gl_config.display();
        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .map_err(|e| init_failed(&format!("create OpenGL {}.{} core context", major, minor), e))?;

        let surface_attributes = window
            .build_surface_attributes(Default::default())
            .map_err(|e| init_failed("describe window surface", e))?;
        let surface = unsafe { gl_display.create_window_surface(&gl_config, &surface_attributes) }
            .map_err(|e| init_failed("create window surface", e))?;

        let context = not_current
            .make_current(&surface)
            .map_err(|e| init_failed("make context current", e))?;

        let interval = if config.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = surface.set_swap_interval(&context, interval) {
            quad_engine::engine_warn!("quad::Window", "Failed to set swap interval: {}", e);
        }

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|symbol| gl_display.get_proc_address(symbol))
        };
        // The context was made current just above and is owned by the window.
        let device = unsafe { GlowDevice::new(gl) };

        quad_engine::engine_info!(
            "quad::Window",
            "Created '{}' ({}x{}, vsync {})",
            config.title,
            config.width,
            config.height,
            config.vsync
        );

        Ok((
            Self {
                surface,
                context,
                window,
            },
            device,
        ))
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Present the back buffer
    pub fn swap_buffers(&self) -> Result<()> {
        self.surface
            .swap_buffers(&self.context)
            .map_err(|e| Error::BackendError(format!("Failed to swap buffers: {}", e)))
    }

    /// Resize the surface; returns `false` for a zero-sized (minimized) window
    pub fn resize(&self, width: u32, height: u32) -> bool {
        match (NonZeroU32::new(width), NonZeroU32::new(height)) {
            (Some(width), Some(height)) => {
                self.surface.resize(&self.context, width, height);
                true
            }
            _ => false,
        }
    }
}

/// Prefer the config with the most samples
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|best, config| {
            if config.num_samples() > best.num_samples() {
                config
            } else {
                best
            }
        })
        .unwrap_or_else(|| unreachable!("DisplayBuilder::build fails on an empty config set before picking"))
}

fn init_failed(step: &str, cause: impl Display) -> Error {
    quad_engine::engine_error!("quad::Window", "Failed to {}: {}", step, cause);
    Error::InitializationFailed(format!("Failed to {}: {}", step, cause))
}
