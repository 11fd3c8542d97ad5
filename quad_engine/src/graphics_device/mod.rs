/// Graphics device module - native API seam, error checking and binding state

// Module declarations
pub mod graphics_device;
pub mod error_check;
pub mod context;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use error_check::*;
pub use context::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
