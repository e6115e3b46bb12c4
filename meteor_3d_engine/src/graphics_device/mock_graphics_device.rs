/// Mock graphics device for unit tests (no GPU required).
///
/// Records every call into a shared `MockRecord` that tests inspect after
/// driving the scene: draw calls with their index/instance counts, buffer
/// uploads with byte sizes, uniform writes and texture creations.

use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::graphics_device::{
    BufferKind, DeviceStats, GpuBuffer, GpuProgram, GpuTexture, GpuVertexArray, GraphicsDevice,
    TextureDesc, UniformLocation, UniformValue, VertexLayout,
};

/// One recorded indexed-instanced draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedDraw {
    pub index_count: u32,
    pub instance_count: u32,
}

/// Everything the mock device observed, shared with the test
#[derive(Debug, Default)]
pub struct MockRecord {
    pub draws: Vec<RecordedDraw>,
    pub line_draws: Vec<u32>,
    pub uploads: Vec<(String, usize)>,
    pub uniform_sets: Vec<(UniformLocation, UniformValue)>,
    pub textures_created: Vec<String>,
    pub cleared: u32,
    pub programs_created: u32,
}

pub struct MockBuffer {
    kind: BufferKind,
    label: String,
    record: Arc<Mutex<MockRecord>>,
    pub data: Mutex<Vec<u8>>,
}

impl GpuBuffer for MockBuffer {
    fn upload(&self, data: &[u8]) -> Result<()> {
        *self.data.lock().unwrap() = data.to_vec();
        self.record
            .lock()
            .unwrap()
            .uploads
            .push((self.label.clone(), data.len()));
        Ok(())
    }

    fn kind(&self) -> BufferKind {
        self.kind
    }
}

pub struct MockTexture {
    size: (u32, u32),
    channels: u32,
}

impl GpuTexture for MockTexture {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn channels(&self) -> u32 {
        self.channels
    }
}

/// Mock program resolving uniform names to deterministic locations
pub struct MockProgram {
    record: Arc<Mutex<MockRecord>>,
    names: Mutex<Vec<String>>,
}

impl GpuProgram for MockProgram {
    fn uniform_location(&self, name: &str) -> UniformLocation {
        let mut names = self.names.lock().unwrap();
        match names.iter().position(|known| known == name) {
            Some(index) => index as UniformLocation,
            None => {
                names.push(name.to_string());
                (names.len() - 1) as UniformLocation
            }
        }
    }

    fn set_uniform(&self, location: UniformLocation, value: UniformValue) -> Result<()> {
        if location >= 0 {
            self.record.lock().unwrap().uniform_sets.push((location, value));
        }
        Ok(())
    }

    fn bind_uniform_block(&self, _block_name: &str, _binding: u32) -> Result<()> {
        Ok(())
    }
}

pub struct MockVertexArray;

impl GpuVertexArray for MockVertexArray {}

/// The mock device itself; construct with [`MockGraphicsDevice::new`]
pub struct MockGraphicsDevice {
    record: Arc<Mutex<MockRecord>>,
    stats: DeviceStats,
    pending_error: Option<String>,
}

impl MockGraphicsDevice {
    /// Create a device plus the shared record the test keeps
    pub fn new() -> (Self, Arc<Mutex<MockRecord>>) {
        let record = Arc::new(Mutex::new(MockRecord::default()));
        (
            Self {
                record: Arc::clone(&record),
                stats: DeviceStats::default(),
                pending_error: None,
            },
            record,
        )
    }

    /// Queue an error for the next `poll_error` call
    pub fn inject_error(&mut self, message: &str) {
        self.pending_error = Some(message.to_string());
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_buffer(&mut self, kind: BufferKind, label: &str) -> Result<Arc<dyn GpuBuffer>> {
        Ok(Arc::new(MockBuffer {
            kind,
            label: label.to_string(),
            record: Arc::clone(&self.record),
            data: Mutex::new(Vec::new()),
        }))
    }

    fn create_vertex_array(
        &mut self,
        _layout: &VertexLayout,
        _vertex_buffer: &Arc<dyn GpuBuffer>,
        _index_buffer: Option<&Arc<dyn GpuBuffer>>,
    ) -> Result<Arc<dyn GpuVertexArray>> {
        Ok(Arc::new(MockVertexArray))
    }

    fn create_program(
        &mut self,
        _vertex_source: &str,
        _fragment_source: &str,
    ) -> Result<Arc<dyn GpuProgram>> {
        self.record.lock().unwrap().programs_created += 1;
        Ok(Arc::new(MockProgram {
            record: Arc::clone(&self.record),
            names: Mutex::new(Vec::new()),
        }))
    }

    fn create_texture(&mut self, desc: &TextureDesc, pixels: &[u8]) -> Result<Arc<dyn GpuTexture>> {
        assert_eq!(
            pixels.len(),
            (desc.width * desc.height * desc.channels) as usize,
            "texture '{}' pixel data does not match its descriptor",
            desc.label
        );
        self.stats.texture_uploads += 1;
        self.record.lock().unwrap().textures_created.push(desc.label.clone());
        Ok(Arc::new(MockTexture {
            size: (desc.width, desc.height),
            channels: desc.channels,
        }))
    }

    fn bind_uniform_buffer(&mut self, _binding: u32, _buffer: &Arc<dyn GpuBuffer>) -> Result<()> {
        Ok(())
    }

    fn use_program(&mut self, _program: &Arc<dyn GpuProgram>) {}

    fn bind_texture(&mut self, _unit: u32, _texture: &Arc<dyn GpuTexture>) {}

    fn draw_indexed_instanced(
        &mut self,
        _vertex_array: &Arc<dyn GpuVertexArray>,
        index_count: u32,
        instance_count: u32,
    ) -> Result<()> {
        self.stats.draw_calls += 1;
        self.stats.triangles += (index_count as u64 / 3) * instance_count as u64;
        self.record.lock().unwrap().draws.push(RecordedDraw {
            index_count,
            instance_count,
        });
        Ok(())
    }

    fn draw_lines(
        &mut self,
        _vertex_array: &Arc<dyn GpuVertexArray>,
        vertex_count: u32,
    ) -> Result<()> {
        self.stats.line_draw_calls += 1;
        self.record.lock().unwrap().line_draws.push(vertex_count);
        Ok(())
    }

    fn clear(&mut self, _color: [f32; 4]) {
        self.record.lock().unwrap().cleared += 1;
    }

    fn set_viewport(&mut self, _width: u32, _height: u32) {}

    fn poll_error(&mut self) -> Option<String> {
        self.pending_error.take()
    }

    fn stats(&self) -> DeviceStats {
        let record = self.record.lock().unwrap();
        DeviceStats {
            buffer_uploads: record.uploads.len() as u32,
            ..self.stats
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
