/// GraphicsDevice trait - the minimal GPU backend surface
///
/// The engine talks to the GPU exclusively through these traits: vertex
/// arrays, buffers (vertex/index/uniform), shader program compile+link,
/// uniform upload, texture upload, indexed-instanced draw and clear.
/// Presentation (buffer swap) belongs to the window backend.
///
/// Backend implementations live outside the core crate; the headless
/// reference backend records everything in memory for tests and tooling.

use std::sync::Arc;

use crate::error::Result;

/// Buffer usage classes mirrored from the shader side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    /// Interleaved vertex attributes
    Vertex,
    /// u32 element indices
    Index,
    /// Uniform block storage (instance model matrices)
    Uniform,
}

/// One vertex attribute inside an interleaved layout
#[derive(Debug, Clone, Copy)]
pub struct VertexAttribute {
    /// Shader attribute binding index
    pub binding: u32,
    /// Number of f32 components (2, 3 or 4)
    pub components: u32,
    /// Byte offset from the start of the vertex
    pub offset: usize,
}

/// Interleaved vertex layout description for a vertex array
#[derive(Debug, Clone, Copy)]
pub struct VertexLayout {
    /// Size of one vertex in bytes
    pub stride: usize,
    /// Attributes in binding order
    pub attributes: &'static [VertexAttribute],
}

/// Texture creation parameters; pixel data is tightly packed rows
#[derive(Debug, Clone)]
pub struct TextureDesc {
    /// Debug label, usually the resource name
    pub label: String,
    pub width: u32,
    pub height: u32,
    /// 1 = R, 2 = RG, 3 = RGB, 4 = RGBA
    pub channels: u32,
}

/// A uniform value ready for upload
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Vec3([f32; 3]),
    Mat4([f32; 16]),
}

/// Resolved uniform location; -1 means the shader does not use the name
pub type UniformLocation = i32;

/// Aggregate counters a backend keeps across its lifetime.
///
/// Tests and the demo's frame report read these; a real backend may
/// approximate the memory figure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceStats {
    /// Indexed-instanced draw calls issued
    pub draw_calls: u32,
    /// Triangles submitted across all draws (index_count / 3 * instances)
    pub triangles: u64,
    /// Line-list draw calls issued
    pub line_draw_calls: u32,
    /// Buffer data uploads
    pub buffer_uploads: u32,
    /// Textures created (de-duplicated loads do not re-upload)
    pub texture_uploads: u32,
}

/// GPU buffer object
pub trait GpuBuffer: Send + Sync {
    /// Replace the buffer's contents
    fn upload(&self, data: &[u8]) -> Result<()>;

    /// Usage class this buffer was created with
    fn kind(&self) -> BufferKind;
}

/// GPU texture object
pub trait GpuTexture: Send + Sync {
    fn size(&self) -> (u32, u32);
    fn channels(&self) -> u32;
}

/// Linked shader program with resolved uniform access
pub trait GpuProgram: Send + Sync {
    /// Resolve a uniform location by name; -1 when absent
    fn uniform_location(&self, name: &str) -> UniformLocation;

    /// Upload one uniform value. Uploading to location -1 is a no-op.
    fn set_uniform(&self, location: UniformLocation, value: UniformValue) -> Result<()>;

    /// Bind a named uniform block to a buffer binding index
    fn bind_uniform_block(&self, block_name: &str, binding: u32) -> Result<()>;
}

/// Vertex array object tying a layout to its vertex/index buffers
pub trait GpuVertexArray: Send + Sync {}

/// Main graphics device trait
///
/// This is the central factory and submission interface. All calls happen
/// on the main thread; the device itself is a process-wide singleton shared
/// behind `Arc<Mutex<dyn GraphicsDevice>>`.
pub trait GraphicsDevice: Send {
    /// Create a buffer of the given kind
    fn create_buffer(&mut self, kind: BufferKind, label: &str) -> Result<Arc<dyn GpuBuffer>>;

    /// Create a vertex array describing `layout` over the given buffers
    fn create_vertex_array(
        &mut self,
        layout: &VertexLayout,
        vertex_buffer: &Arc<dyn GpuBuffer>,
        index_buffer: Option<&Arc<dyn GpuBuffer>>,
    ) -> Result<Arc<dyn GpuVertexArray>>;

    /// Compile and link a shader program from GLSL sources.
    ///
    /// # Errors
    ///
    /// `ShaderCompile` / `ShaderLink` with the backend's info log. Fatal at
    /// setup; the engine never retries.
    fn create_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Arc<dyn GpuProgram>>;

    /// Upload a texture. `pixels` holds `width * height * channels` bytes.
    fn create_texture(&mut self, desc: &TextureDesc, pixels: &[u8]) -> Result<Arc<dyn GpuTexture>>;

    /// Bind a uniform buffer to a shader binding index
    fn bind_uniform_buffer(&mut self, binding: u32, buffer: &Arc<dyn GpuBuffer>) -> Result<()>;

    /// Make a program current for subsequent uniform uploads and draws
    fn use_program(&mut self, program: &Arc<dyn GpuProgram>);

    /// Bind a texture to a sampler unit
    fn bind_texture(&mut self, unit: u32, texture: &Arc<dyn GpuTexture>);

    /// Issue one instanced triangle-list draw over the bound state
    fn draw_indexed_instanced(
        &mut self,
        vertex_array: &Arc<dyn GpuVertexArray>,
        index_count: u32,
        instance_count: u32,
    ) -> Result<()>;

    /// Issue one non-indexed line-list draw (debug renderer)
    fn draw_lines(&mut self, vertex_array: &Arc<dyn GpuVertexArray>, vertex_count: u32)
        -> Result<()>;

    /// Clear the color and depth buffers
    fn clear(&mut self, color: [f32; 4]);

    /// Resize the viewport to the framebuffer size
    fn set_viewport(&mut self, width: u32, height: u32);

    /// Drain the backend's pending error, if any.
    ///
    /// Scenes poll this once per rendered frame; a reported error is logged
    /// as a warning and the frame continues.
    fn poll_error(&mut self) -> Option<String>;

    /// Lifetime counters for tests and frame reports
    fn stats(&self) -> DeviceStats;
}
