/// Resource module - RAII wrappers around native GPU objects
///
/// Each type exclusively owns one native handle and releases it on drop.

pub mod buffer;
pub mod vertex_layout;
pub mod vertex_array;
pub mod shader_source;
pub mod shader;

pub use buffer::*;
pub use vertex_layout::*;
pub use vertex_array::*;
pub use shader_source::*;
pub use shader::*;
