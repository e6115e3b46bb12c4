/// Graphics device module - the GPU backend contract and shared GPU types

// Module declarations
pub mod graphics_device;
pub mod texture_pool;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export the de-duplicating texture pool
pub use texture_pool::TexturePool;

// Mock graphics device for unit tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
