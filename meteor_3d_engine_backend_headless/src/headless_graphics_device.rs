/// Headless graphics device: full engine semantics, no GPU.
///
/// Buffers keep their last uploaded bytes, programs resolve uniform
/// names to stable locations, and every draw feeds the [`DeviceStats`]
/// counters the engine exposes. Shader sources are accepted verbatim;
/// an empty vertex or fragment source is the one rejected input, so
/// setup-time shader failure stays testable.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use meteor_3d_engine::error::{Error, Result};
use meteor_3d_engine::graphics_device::{
    BufferKind, DeviceStats, GpuBuffer, GpuProgram, GpuTexture, GpuVertexArray, GraphicsDevice,
    TextureDesc, UniformLocation, UniformValue, VertexLayout,
};

/// Shared counters the device and its resources feed
#[derive(Default)]
struct Counters {
    draw_calls: AtomicU32,
    triangles: AtomicU64,
    line_draw_calls: AtomicU32,
    buffer_uploads: AtomicU32,
    texture_uploads: AtomicU32,
}

struct HeadlessBuffer {
    kind: BufferKind,
    data: Mutex<Vec<u8>>,
    counters: Arc<Counters>,
}

impl GpuBuffer for HeadlessBuffer {
    fn upload(&self, data: &[u8]) -> Result<()> {
        *self.data.lock().unwrap() = data.to_vec();
        self.counters.buffer_uploads.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn kind(&self) -> BufferKind {
        self.kind
    }
}

struct HeadlessTexture {
    size: (u32, u32),
    channels: u32,
}

impl GpuTexture for HeadlessTexture {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn channels(&self) -> u32 {
        self.channels
    }
}

struct HeadlessProgram {
    names: Mutex<Vec<String>>,
    uniforms: Mutex<rustc_hash::FxHashMap<UniformLocation, UniformValue>>,
}

impl GpuProgram for HeadlessProgram {
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
            self.uniforms.lock().unwrap().insert(location, value);
        }
        Ok(())
    }

    fn bind_uniform_block(&self, _block_name: &str, _binding: u32) -> Result<()> {
        Ok(())
    }
}

struct HeadlessVertexArray;

impl GpuVertexArray for HeadlessVertexArray {}

/// The headless device itself
pub struct HeadlessGraphicsDevice {
    counters: Arc<Counters>,
    viewport: (u32, u32),
    pending_error: Option<String>,
}

impl HeadlessGraphicsDevice {
    pub fn new() -> Self {
        Self {
            counters: Arc::new(Counters::default()),
            viewport: (0, 0),
            pending_error: None,
        }
    }

    /// Current viewport, as set by the engine on resize
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Queue an error for the engine's next per-frame poll
    pub fn inject_error(&mut self, message: &str) {
        self.pending_error = Some(message.to_string());
    }
}

impl Default for HeadlessGraphicsDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsDevice for HeadlessGraphicsDevice {
    fn create_buffer(&mut self, kind: BufferKind, _label: &str) -> Result<Arc<dyn GpuBuffer>> {
        Ok(Arc::new(HeadlessBuffer {
            kind,
            data: Mutex::new(Vec::new()),
            counters: Arc::clone(&self.counters),
        }))
    }

    fn create_vertex_array(
        &mut self,
        layout: &VertexLayout,
        _vertex_buffer: &Arc<dyn GpuBuffer>,
        _index_buffer: Option<&Arc<dyn GpuBuffer>>,
    ) -> Result<Arc<dyn GpuVertexArray>> {
        if layout.attributes.is_empty() {
            return Err(Error::BackendError(
                "vertex layout has no attributes".to_string(),
            ));
        }
        Ok(Arc::new(HeadlessVertexArray))
    }

    fn create_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Arc<dyn GpuProgram>> {
        if vertex_source.trim().is_empty() {
            return Err(Error::ShaderCompile("empty vertex shader source".to_string()));
        }
        if fragment_source.trim().is_empty() {
            return Err(Error::ShaderCompile("empty fragment shader source".to_string()));
        }

        Ok(Arc::new(HeadlessProgram {
            names: Mutex::new(Vec::new()),
            uniforms: Mutex::new(rustc_hash::FxHashMap::default()),
        }))
    }

    fn create_texture(&mut self, desc: &TextureDesc, pixels: &[u8]) -> Result<Arc<dyn GpuTexture>> {
        let expected = (desc.width * desc.height * desc.channels) as usize;
        if pixels.len() != expected {
            return Err(Error::BackendError(format!(
                "texture '{}' holds {} bytes, descriptor says {}",
                desc.label,
                pixels.len(),
                expected
            )));
        }

        self.counters.texture_uploads.fetch_add(1, Ordering::Relaxed);

        Ok(Arc::new(HeadlessTexture {
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
        self.counters.draw_calls.fetch_add(1, Ordering::Relaxed);
        self.counters.triangles.fetch_add(
            (index_count as u64 / 3) * instance_count as u64,
            Ordering::Relaxed,
        );
        Ok(())
    }

    fn draw_lines(
        &mut self,
        _vertex_array: &Arc<dyn GpuVertexArray>,
        _vertex_count: u32,
    ) -> Result<()> {
        self.counters.line_draw_calls.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn clear(&mut self, _color: [f32; 4]) {}

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    fn poll_error(&mut self) -> Option<String> {
        self.pending_error.take()
    }

    fn stats(&self) -> DeviceStats {
        DeviceStats {
            draw_calls: self.counters.draw_calls.load(Ordering::Relaxed),
            triangles: self.counters.triangles.load(Ordering::Relaxed),
            line_draw_calls: self.counters.line_draw_calls.load(Ordering::Relaxed),
            buffer_uploads: self.counters.buffer_uploads.load(Ordering::Relaxed),
            texture_uploads: self.counters.texture_uploads.load(Ordering::Relaxed),
        }
    }
}
