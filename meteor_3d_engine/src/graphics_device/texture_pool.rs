/// De-duplicating texture pool, keyed by resource name.
///
/// Owned by the renderer side of the engine and shared by every scene:
/// loading the same texture name twice returns the existing GPU handle
/// without a second upload. Entries live until the pool is dropped.

use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::graphics_device::{GpuTexture, GraphicsDevice, TextureDesc};

struct PoolEntry {
    name: String,
    texture: Arc<dyn GpuTexture>,
}

/// Process-wide texture cache over a graphics device
pub struct TexturePool {
    device: Arc<Mutex<dyn GraphicsDevice>>,
    entries: Vec<PoolEntry>,
}

impl TexturePool {
    /// Create an empty pool over the given device
    pub fn new(device: Arc<Mutex<dyn GraphicsDevice>>) -> Self {
        Self {
            device,
            entries: Vec::new(),
        }
    }

    /// Return the texture registered under `name`, uploading it on first use.
    ///
    /// The scan is linear; pools hold a handful of textures and are only
    /// populated during setup.
    pub fn create_or_get(
        &mut self,
        name: &str,
        pixels: &[u8],
        size: (u32, u32),
        channels: u32,
    ) -> Result<Arc<dyn GpuTexture>> {
        if let Some(entry) = self.entries.iter().find(|entry| entry.name == name) {
            crate::engine_info!(
                "meteor3d::TexturePool",
                "Texture '{}' found in texture pool, reusing it",
                name
            );
            return Ok(Arc::clone(&entry.texture));
        }

        let desc = TextureDesc {
            label: name.to_string(),
            width: size.0,
            height: size.1,
            channels,
        };

        let texture = {
            let mut device = self.device.lock().unwrap();
            device.create_texture(&desc, pixels)?
        };

        self.entries.push(PoolEntry {
            name: name.to_string(),
            texture: Arc::clone(&texture),
        });

        crate::engine_info!("meteor3d::TexturePool", "Texture '{}' created successfully", name);

        Ok(texture)
    }

    /// Look up an already-created texture by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn GpuTexture>> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| Arc::clone(&entry.texture))
    }

    /// Number of distinct textures uploaded so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the pool holds no textures
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "texture_pool_tests.rs"]
mod tests;
