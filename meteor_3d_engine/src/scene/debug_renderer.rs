/// Immediate-mode debug line renderer.
///
/// Owns its own vertex array, vertex buffer and shader program, separate
/// from every scene. Lines accumulate in memory during the frame;
/// `finish_rendering` uploads the buffer once, issues a single line-list
/// draw and clears it. Call after the main scene has rendered.

use std::sync::{Arc, Mutex};

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};

use crate::error::Result;
use crate::graphics_device::{
    BufferKind, GpuBuffer, GpuProgram, GpuVertexArray, GraphicsDevice, UniformLocation,
    UniformValue, VertexAttribute, VertexLayout,
};

// LAYOUT OF FIELDS MUST MATCH THE ATTRIBUTE LAYOUT IN THE DEBUG VERTEX SHADER
/// One debug vertex: position and color. 28 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DebugVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl DebugVertex {
    /// Attribute layout at bindings 0/1, stride 28
    pub const LAYOUT: VertexLayout = VertexLayout {
        stride: std::mem::size_of::<DebugVertex>(),
        attributes: &[
            VertexAttribute { binding: 0, components: 3, offset: 0 },
            VertexAttribute { binding: 1, components: 4, offset: 12 },
        ],
    };
}

/// Line-list renderer for colliders, gizmos and other overlays
pub struct DebugRenderer {
    device: Arc<Mutex<dyn GraphicsDevice>>,
    program: Arc<dyn GpuProgram>,
    vertex_buffer: Arc<dyn GpuBuffer>,
    vertex_array: Arc<dyn GpuVertexArray>,
    vertices: Vec<DebugVertex>,
    uniform_projection_matrix: UniformLocation,
    uniform_view_matrix: UniformLocation,
}

impl DebugRenderer {
    /// Compile the debug shader program and create the line buffer.
    ///
    /// # Errors
    ///
    /// `ShaderCompile` / `ShaderLink` or backend buffer errors; fatal at
    /// setup.
    pub fn new(
        device: Arc<Mutex<dyn GraphicsDevice>>,
        vertex_source: &str,
        fragment_source: &str,
        initial_vertex_capacity: usize,
    ) -> Result<Self> {
        let (program, vertex_buffer, vertex_array) = {
            let mut dev = device.lock().unwrap();

            let program = dev.create_program(vertex_source, fragment_source)?;
            let vertex_buffer = dev.create_buffer(BufferKind::Vertex, "debug vertices")?;
            let vertex_array =
                dev.create_vertex_array(&DebugVertex::LAYOUT, &vertex_buffer, None)?;

            (program, vertex_buffer, vertex_array)
        };

        let uniform_projection_matrix = program.uniform_location("camProjectionMatrix");
        let uniform_view_matrix = program.uniform_location("camViewMatrix");

        crate::engine_info!("meteor3d::DebugRenderer", "Debug renderer initialized successfully");

        Ok(Self {
            device,
            program,
            vertex_buffer,
            vertex_array,
            vertices: Vec::with_capacity(initial_vertex_capacity),
            uniform_projection_matrix,
            uniform_view_matrix,
        })
    }

    /// Queue one line from `start` to `end`
    pub fn draw_line(&mut self, start: Vec3, end: Vec3, color: Vec4) {
        self.vertices.push(DebugVertex {
            position: start.to_array(),
            color: color.to_array(),
        });
        self.vertices.push(DebugVertex {
            position: end.to_array(),
            color: color.to_array(),
        });
    }

    /// Queue the 12 edges of an axis-aligned box
    pub fn draw_box_lines(&mut self, center: Vec3, size: Vec3, color: Vec4) {
        let half = size * 0.5;
        let min = center - half;
        let max = center + half;

        let corners = [
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(max.x, max.y, max.z),
            Vec3::new(min.x, max.y, max.z),
        ];

        // Bottom face
        self.draw_line(corners[0], corners[1], color);
        self.draw_line(corners[1], corners[2], color);
        self.draw_line(corners[2], corners[3], color);
        self.draw_line(corners[3], corners[0], color);

        // Top face
        self.draw_line(corners[4], corners[5], color);
        self.draw_line(corners[5], corners[6], color);
        self.draw_line(corners[6], corners[7], color);
        self.draw_line(corners[7], corners[4], color);

        // Connecting edges
        self.draw_line(corners[0], corners[4], color);
        self.draw_line(corners[1], corners[5], color);
        self.draw_line(corners[2], corners[6], color);
        self.draw_line(corners[3], corners[7], color);
    }

    /// Upload and draw every queued line, then clear the queue.
    ///
    /// A no-op when nothing was queued this frame.
    pub fn finish_rendering(&mut self, projection: &Mat4, view: &Mat4) -> Result<()> {
        if self.vertices.is_empty() {
            return Ok(());
        }

        let mut device = self.device.lock().unwrap();

        device.use_program(&self.program);

        self.program.set_uniform(
            self.uniform_projection_matrix,
            UniformValue::Mat4(projection.to_cols_array()),
        )?;
        self.program.set_uniform(
            self.uniform_view_matrix,
            UniformValue::Mat4(view.to_cols_array()),
        )?;

        self.vertex_buffer.upload(bytemuck::cast_slice(&self.vertices))?;
        device.draw_lines(&self.vertex_array, self.vertices.len() as u32)?;

        self.vertices.clear();

        Ok(())
    }

    /// Number of vertices queued for the current frame
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "debug_renderer_tests.rs"]
mod tests;
