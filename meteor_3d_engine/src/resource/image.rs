/// Image resources - PNG/JPEG decode for texture upload.

use crate::error::{Error, Result};
use crate::resource::resource_root;

/// A decoded image: owned RGBA8 pixels, flipped for GPU bottom-left origin.
///
/// Every image is expanded to 4 channels on load so texture upload never
/// has to branch on the source format.
pub struct ImageResource {
    file: String,
    pixels: Vec<u8>,
    size: (u32, u32),
    channels: u32,
}

impl ImageResource {
    /// Decode `<resource root>/<relative>`.
    ///
    /// # Errors
    ///
    /// `FileOpen` when the file cannot be read or is not a supported image.
    pub fn create(relative: &str) -> Result<Self> {
        let path = resource_root().join(relative);

        let bytes = std::fs::read(&path).map_err(|io| {
            crate::engine_err!(
                "meteor3d::Resource",
                Error::FileOpen {
                    path: path.display().to_string(),
                    message: io.to_string(),
                }
            )
        })?;

        let resource = Self::from_bytes(relative, &bytes)?;

        crate::engine_info!("meteor3d::Resource", "Resource Image '{}' loaded", relative);

        Ok(resource)
    }

    /// Decode an in-memory encoded image (tests, embedded assets)
    pub fn from_bytes(name: &str, bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes).map_err(|decode| {
            crate::engine_err!(
                "meteor3d::Resource",
                Error::FileOpen {
                    path: name.to_string(),
                    message: decode.to_string(),
                }
            )
        })?;

        // GPU origin is bottom-left; image files store rows top-down.
        let rgba = decoded.flipv().into_rgba8();
        let size = (rgba.width(), rgba.height());

        Ok(Self {
            file: name.to_string(),
            pixels: rgba.into_raw(),
            size,
            channels: 4,
        })
    }

    /// Resource name relative to the resource root
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Tightly packed pixel rows, bottom row first
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Always 4 after decoding
    pub fn channels(&self) -> u32 {
        self.channels
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "image_tests.rs"]
mod tests;
