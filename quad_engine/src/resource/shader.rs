/// ShaderProgram - compile, link and drive a vertex + fragment program
///
/// A `ShaderProgram` only exists once both stages compiled and the program
/// linked. Compile and link failures are logged with the driver's info log
/// and returned as errors, so an unusable program can never be bound or
/// drawn with.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use glam::Vec4;
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::graphics_device::{GraphicsContext, ProgramId, ShaderId, ShaderStage, UniformLocation};
use crate::resource::ShaderSource;

/// Linked, ready-to-use program
pub struct ShaderProgram {
    ctx: Rc<GraphicsContext>,
    id: ProgramId,
    path: Option<PathBuf>,
    /// Filled on first lookup, misses included; never invalidated since a
    /// program is never relinked in place
    uniform_cache: RefCell<FxHashMap<String, Option<UniformLocation>>>,
}

impl ShaderProgram {
    /// Read a combined `.shader` file and build a program from it
    pub fn from_file(ctx: Rc<GraphicsContext>, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = ShaderSource::from_file(path)?;
        let mut program = Self::from_source(ctx, &source)?;
        program.path = Some(path.to_path_buf());
        crate::engine_info!("quad::Shader", "Loaded shader program from '{}'", path.display());
        Ok(program)
    }

    /// Compile both stages of `source` and link them
    pub fn from_source(ctx: Rc<GraphicsContext>, source: &ShaderSource) -> Result<Self> {
        let vertex = compile_stage(&ctx, ShaderStage::Vertex, &source.vertex)?;
        let fragment = match compile_stage(&ctx, ShaderStage::Fragment, &source.fragment) {
            Ok(fragment) => fragment,
            Err(e) => {
                ctx.device().delete_shader(vertex);
                return Err(e);
            }
        };

        let id = link_stages(&ctx, vertex, fragment)?;
        Ok(Self {
            ctx,
            id,
            path: None,
            uniform_cache: RefCell::new(FxHashMap::default()),
        })
    }

    /// Make this program the active one
    pub fn bind(&self) -> Result<()> {
        let id = self.id;
        crate::device_call!(self.ctx, |gl| gl.use_program(Some(id)))?;
        self.ctx.record_program_binding(Some(id));
        Ok(())
    }

    /// Clear the active program
    pub fn unbind(&self) -> Result<()> {
        crate::device_call!(self.ctx, |gl| gl.use_program(None))?;
        self.ctx.record_program_binding(None);
        Ok(())
    }

    /// Location of uniform `name`, `None` if the program has no such uniform
    ///
    /// The device is queried at most once per name; a missing uniform is
    /// reported once and the miss is cached.
    pub fn uniform_location(&self, name: &str) -> Result<Option<UniformLocation>> {
        if let Some(location) = self.uniform_cache.borrow().get(name) {
            return Ok(*location);
        }

        let id = self.id;
        let location = crate::device_call!(self.ctx, |gl| gl.uniform_location(id, name))?;
        if location.is_none() {
            crate::engine_warn!("quad::Shader", "Uniform '{}' doesn't exist", name);
        }

        self.uniform_cache.borrow_mut().insert(name.to_string(), location);
        Ok(location)
    }

    /// Upload a vec4 uniform; the program must be bound by the caller
    pub fn set_uniform_4f(&self, name: &str, v0: f32, v1: f32, v2: f32, v3: f32) -> Result<()> {
        let Some(location) = self.uniform_location(name)? else {
            return Ok(());
        };
        let value = [v0, v1, v2, v3];
        crate::device_call!(self.ctx, |gl| gl.uniform_4f(location, value))
    }

    pub fn set_uniform_vec4(&self, name: &str, value: Vec4) -> Result<()> {
        self.set_uniform_4f(name, value.x, value.y, value.z, value.w)
    }

    pub fn id(&self) -> ProgramId {
        self.id
    }

    /// Source file, when built with `from_file`
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of names in the uniform cache (found or not)
    pub fn cached_uniform_count(&self) -> usize {
        self.uniform_cache.borrow().len()
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        self.ctx.device().delete_program(self.id);
        self.ctx.forget_program(self.id);
    }
}

// ============================================================================
// Compile / link helpers
// ============================================================================

/// Create, source and compile one stage
///
/// On the failure path the info-log read and the stage deletion go straight
/// to the device, so the error returned is always the compile failure.
fn compile_stage(ctx: &GraphicsContext, stage: ShaderStage, source: &str) -> Result<ShaderId> {
    let shader = crate::device_call!(ctx, |gl| gl.create_shader(stage))??;

    match submit_and_compile(ctx, shader, source) {
        Ok(true) => {
            crate::engine_debug!("quad::Shader", "Compiled {} shader {}", stage, shader.0);
            Ok(shader)
        }
        Ok(false) => {
            let log = ctx.device().shader_info_log(shader);
            crate::engine_error!("quad::Shader", "Failed to compile {} shader!\n{}", stage, log);
            ctx.device().delete_shader(shader);
            Err(Error::ShaderCompile { stage, log })
        }
        Err(e) => {
            ctx.device().delete_shader(shader);
            Err(e)
        }
    }
}

fn submit_and_compile(ctx: &GraphicsContext, shader: ShaderId, source: &str) -> Result<bool> {
    crate::device_call!(ctx, |gl| gl.shader_source(shader, source))?;
    crate::device_call!(ctx, |gl| gl.compile_shader(shader))?;
    crate::device_call!(ctx, |gl| gl.shader_compile_status(shader))
}

/// Link both stages; the stage objects are deleted whatever the outcome
fn link_stages(ctx: &GraphicsContext, vertex: ShaderId, fragment: ShaderId) -> Result<ProgramId> {
    let result = create_program(ctx, vertex, fragment);
    ctx.device().delete_shader(vertex);
    ctx.device().delete_shader(fragment);
    result
}

/// Create, link and validate the program
///
/// As in `compile_stage`, info-log reads and cleanup after a failure bypass
/// the error-check wrapper.
fn create_program(ctx: &GraphicsContext, vertex: ShaderId, fragment: ShaderId) -> Result<ProgramId> {
    let program = crate::device_call!(ctx, |gl| gl.create_program())??;

    match attach_and_link(ctx, program, vertex, fragment) {
        Ok(true) => {}
        Ok(false) => {
            let log = ctx.device().program_info_log(program);
            crate::engine_error!("quad::Shader", "Failed to link shader program!\n{}", log);
            ctx.device().delete_program(program);
            return Err(Error::ShaderLink(log));
        }
        Err(e) => {
            ctx.device().delete_program(program);
            return Err(e);
        }
    }

    match validate(ctx, program) {
        Ok(true) => {}
        Ok(false) => {
            let log = ctx.device().program_info_log(program);
            crate::engine_warn!("quad::Shader", "Shader program {} failed validation: {}", program.0, log);
        }
        Err(e) => {
            ctx.device().delete_program(program);
            return Err(e);
        }
    }

    crate::engine_debug!("quad::Shader", "Linked shader program {}", program.0);
    Ok(program)
}

fn attach_and_link(
    ctx: &GraphicsContext,
    program: ProgramId,
    vertex: ShaderId,
    fragment: ShaderId,
) -> Result<bool> {
    crate::device_call!(ctx, |gl| gl.attach_shader(program, vertex))?;
    crate::device_call!(ctx, |gl| gl.attach_shader(program, fragment))?;
    crate::device_call!(ctx, |gl| gl.link_program(program))?;
    crate::device_call!(ctx, |gl| gl.program_link_status(program))
}

fn validate(ctx: &GraphicsContext, program: ProgramId) -> Result<bool> {
    crate::device_call!(ctx, |gl| gl.validate_program(program))?;
    crate::device_call!(ctx, |gl| gl.program_validate_status(program))
}

#[cfg(test)]
#[path = "shader_tests.rs"]
mod tests;
