/// Renderer scene - batched, instanced draw of textured meshes.
///
/// One scene owns its GPU objects (vertex array, vertex/index buffers,
/// instance-matrix uniform buffer, shader program with resolved uniform
/// locations) and a list of batches. Per frame, `update` recomputes the
/// camera and every instance matrix from the caller's transform store;
/// `render` walks the batches and issues one instanced draw per mesh,
/// re-uploading material uniforms only when the mesh's material differs
/// from the previous one.

use std::sync::{Arc, Mutex};

use glam::{Vec2, Vec3};

use crate::error::{Error, Result};
use crate::graphics_device::{
    BufferKind, GpuBuffer, GpuProgram, GpuVertexArray, GraphicsDevice, UniformLocation,
    UniformValue,
};
use crate::resource::{Material, MeshVertex, Model};
use crate::scene::{Batch, BatchId, Camera, ComponentId, EntityKey, TransformStore};

/// Uniform buffer binding index of the instance model matrices.
// MUST MATCH THE BLOCK BINDING IN THE VERTEX SHADER
pub const UBO_MATRICES_BINDING: u32 = 0;

/// Largest instance count one batch can draw in a single call.
// MUST MATCH THE ARRAY SIZE IN THE VERTEX SHADER
pub const BATCH_MAX_OBJECT_COUNT: usize = 256;

/// Default component capacity reserved for a new batch
pub const BATCH_INITIAL_CAPACITY: usize = 16;

/// Frame clear color
pub const CLEAR_COLOR: [f32; 4] = [0.3, 0.3, 0.3, 1.0];

/// Uniform locations resolved once at scene construction
struct SceneUniforms {
    cam_projection_matrix: UniformLocation,
    cam_view_matrix: UniformLocation,
    cam_position: UniformLocation,
    cam_rotation: UniformLocation,
    mat_ambient_color: UniformLocation,
    mat_diffuse_color: UniformLocation,
    mat_specular_color: UniformLocation,
    mat_emissive_color: UniformLocation,
    mat_specular_exponent: UniformLocation,
    mat_dissolve: UniformLocation,
    mat_diffuse_map: UniformLocation,
    mat_has_diffuse_map: UniformLocation,
}

/// A scene of batches sharing one set of GPU buffers
pub struct Scene {
    name: String,
    device: Arc<Mutex<dyn GraphicsDevice>>,
    program: Arc<dyn GpuProgram>,
    camera: Option<Camera>,
    batches: Vec<Batch>,
    vertex_buffer: Arc<dyn GpuBuffer>,
    index_buffer: Arc<dyn GpuBuffer>,
    instance_buffer: Arc<dyn GpuBuffer>,
    vertex_array: Arc<dyn GpuVertexArray>,
    uniforms: SceneUniforms,
}

/// Clear the frame and set the viewport; call once before rendering
/// any scene.
pub fn begin_frame(device: &Arc<Mutex<dyn GraphicsDevice>>, framebuffer_size: (u32, u32)) {
    let mut device = device.lock().unwrap();
    device.set_viewport(framebuffer_size.0, framebuffer_size.1);
    device.clear(CLEAR_COLOR);
}

impl Scene {
    /// Create a scene: compile the shader program, create the GPU buffers
    /// and the vertex array, resolve uniform locations, bind the instance
    /// matrix block.
    ///
    /// # Errors
    ///
    /// `ShaderCompile` / `ShaderLink` from the program build, or any
    /// backend error creating the buffers. All fatal at setup.
    pub fn new(
        name: &str,
        device: Arc<Mutex<dyn GraphicsDevice>>,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self> {
        let (program, vertex_buffer, index_buffer, instance_buffer, vertex_array) = {
            let mut dev = device.lock().unwrap();

            let program = dev.create_program(vertex_source, fragment_source)?;

            let vertex_buffer = dev.create_buffer(BufferKind::Vertex, "scene vertices")?;
            let index_buffer = dev.create_buffer(BufferKind::Index, "scene indices")?;
            let instance_buffer = dev.create_buffer(BufferKind::Uniform, "scene matrices")?;

            let vertex_array = dev.create_vertex_array(
                &MeshVertex::LAYOUT,
                &vertex_buffer,
                Some(&index_buffer),
            )?;

            program.bind_uniform_block("modelMatrices", UBO_MATRICES_BINDING)?;
            dev.bind_uniform_buffer(UBO_MATRICES_BINDING, &instance_buffer)?;

            (program, vertex_buffer, index_buffer, instance_buffer, vertex_array)
        };

        let uniforms = SceneUniforms {
            cam_projection_matrix: program.uniform_location("camProjectionMatrix"),
            cam_view_matrix: program.uniform_location("camViewMatrix"),
            cam_position: program.uniform_location("camPosition"),
            cam_rotation: program.uniform_location("camRotation"),
            mat_ambient_color: program.uniform_location("matAmbientColor"),
            mat_diffuse_color: program.uniform_location("matDiffuseColor"),
            mat_specular_color: program.uniform_location("matSpecularColor"),
            mat_emissive_color: program.uniform_location("matEmissiveColor"),
            mat_specular_exponent: program.uniform_location("matSpecularExponent"),
            mat_dissolve: program.uniform_location("matDissolve"),
            mat_diffuse_map: program.uniform_location("matDiffuseMap"),
            mat_has_diffuse_map: program.uniform_location("matHasDiffuseMap"),
        };

        crate::engine_info!("meteor3d::Scene", "Scene '{}' created", name);

        Ok(Self {
            name: name.to_string(),
            device,
            program,
            camera: None,
            batches: Vec::new(),
            vertex_buffer,
            index_buffer,
            instance_buffer,
            vertex_array,
            uniforms,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bind the main camera. Replaces any previous camera.
    pub fn set_main_camera(&mut self, camera: Camera) {
        self.camera = Some(camera);
    }

    pub fn main_camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    pub fn main_camera_mut(&mut self) -> Option<&mut Camera> {
        self.camera.as_mut()
    }

    /// Add a batch for `model` with the default component capacity
    pub fn create_batch(&mut self, model: Arc<Model>) -> BatchId {
        self.create_batch_with_capacity(model, BATCH_INITIAL_CAPACITY)
    }

    /// Add a batch with an explicit initial component capacity
    pub fn create_batch_with_capacity(&mut self, model: Arc<Model>, capacity: usize) -> BatchId {
        self.batches.push(Batch::new(model, capacity));
        BatchId(self.batches.len() - 1)
    }

    /// Remove a batch and all its components.
    ///
    /// Batches after the removed one shift down by one position.
    pub fn destroy_batch(&mut self, batch: BatchId) -> Result<()> {
        self.check_batch(batch)?;
        self.batches.remove(batch.0);
        Ok(())
    }

    pub fn batch(&self, batch: BatchId) -> Result<&Batch> {
        self.check_batch(batch)?;
        Ok(&self.batches[batch.0])
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// Add an instance of the batch's model, transformed through `entity`.
    ///
    /// The caller keeps the entity alive (or destroys this component
    /// first). Exceeding [`BATCH_MAX_OBJECT_COUNT`] instances logs a
    /// warning; the shader will only read the first that many matrices.
    pub fn create_component(&mut self, batch: BatchId, entity: EntityKey) -> Result<ComponentId> {
        self.check_batch(batch)?;

        let offset = self.batches[batch.0].add_component(entity);

        if offset >= BATCH_MAX_OBJECT_COUNT {
            crate::engine_warn!(
                "meteor3d::Scene",
                "Batch exceeds the maximum instance count of {}",
                BATCH_MAX_OBJECT_COUNT
            );
        }

        Ok(ComponentId(offset))
    }

    /// Remove an instance. Components after it in the same batch shift
    /// down by one position.
    pub fn destroy_component(&mut self, batch: BatchId, component: ComponentId) -> Result<()> {
        self.check_batch(batch)?;

        let target = &mut self.batches[batch.0];
        if component.0 >= target.len() {
            crate::engine_bail!(
                "meteor3d::Scene",
                Error::InvalidHandle(format!(
                    "component {} exceeds batch length {}",
                    component.0,
                    target.len()
                ))
            );
        }

        target.remove_component(component.0);
        Ok(())
    }

    /// Recompute the camera matrices and every instance matrix.
    ///
    /// # Errors
    ///
    /// `NoCamera` when no main camera is bound.
    pub fn update(&mut self, transforms: &TransformStore, window_size: (u32, u32)) -> Result<()> {
        let camera = match self.camera.as_mut() {
            Some(camera) => camera,
            None => crate::engine_bail!("meteor3d::Scene", Error::NoCamera),
        };

        camera.update(transforms, window_size);

        for batch in &mut self.batches {
            batch.update_matrices(transforms);
        }

        Ok(())
    }

    /// Draw every batch.
    ///
    /// Uploads the four camera uniforms once, then per batch the instance
    /// matrices and the model's vertex pool, then per mesh the indices and
    /// (only when it changed) the material block, finishing with one
    /// instanced draw. Backend errors inside the walk are logged as
    /// warnings and the frame continues.
    ///
    /// # Errors
    ///
    /// `NoCamera` when no main camera is bound.
    pub fn render(&mut self) -> Result<()> {
        let camera = match self.camera.as_ref() {
            Some(camera) => camera,
            None => crate::engine_bail!("meteor3d::Scene", Error::NoCamera),
        };

        let mut device = self.device.lock().unwrap();

        device.use_program(&self.program);

        let uniforms = &self.uniforms;
        let program = self.program.as_ref();

        Self::upload(program, uniforms.cam_projection_matrix, UniformValue::Mat4(camera.projection_matrix().to_cols_array()));
        Self::upload(program, uniforms.cam_view_matrix, UniformValue::Mat4(camera.view_matrix().to_cols_array()));
        Self::upload(program, uniforms.cam_position, UniformValue::Vec3(camera.position().to_array()));
        Self::upload(program, uniforms.cam_rotation, UniformValue::Vec3(camera.rotation().to_array()));

        for batch in &self.batches {
            if batch.is_empty() {
                continue;
            }

            if let Err(error) = self.instance_buffer.upload(bytemuck::cast_slice(batch.matrices())) {
                crate::engine_warn!("meteor3d::Scene", "Instance matrix upload failed: {}", error);
                continue;
            }

            if let Err(error) = self.vertex_buffer.upload(bytemuck::cast_slice(&batch.model().vertices)) {
                crate::engine_warn!("meteor3d::Scene", "Vertex pool upload failed: {}", error);
                continue;
            }

            let mut previous_material: Option<&Arc<Material>> = None;

            for mesh in &batch.model().meshes {
                let same_material = match (&mesh.material, previous_material) {
                    (Some(current), Some(previous)) => Arc::ptr_eq(current, previous),
                    (None, None) => true,
                    _ => false,
                };

                if !same_material {
                    self.upload_material(&mut *device, mesh.material.as_ref());
                    previous_material = mesh.material.as_ref();
                }

                if let Err(error) = self.index_buffer.upload(bytemuck::cast_slice(&mesh.indices)) {
                    crate::engine_warn!("meteor3d::Scene", "Index upload failed: {}", error);
                    continue;
                }

                if let Err(error) = device.draw_indexed_instanced(
                    &self.vertex_array,
                    mesh.indices.len() as u32,
                    batch.len() as u32,
                ) {
                    crate::engine_warn!("meteor3d::Scene", "Draw failed: {}", error);
                }
            }
        }

        if let Some(message) = device.poll_error() {
            let error = Error::GpuRuntime(message);
            crate::engine_warn!("meteor3d::Scene", "{}", error);
        }

        Ok(())
    }

    /// Project a screen pixel at clip-space depth into world space.
    ///
    /// # Errors
    ///
    /// `NoCamera` when no main camera is bound.
    pub fn screen_to_world(
        &self,
        screen: Vec2,
        depth: f32,
        window_size: (u32, u32),
    ) -> Result<Vec3> {
        match self.camera.as_ref() {
            Some(camera) => Ok(camera.screen_to_world(screen, depth, window_size)),
            None => crate::engine_bail!("meteor3d::Scene", Error::NoCamera),
        }
    }

    fn check_batch(&self, batch: BatchId) -> Result<()> {
        if batch.0 >= self.batches.len() {
            crate::engine_bail!(
                "meteor3d::Scene",
                Error::InvalidHandle(format!(
                    "batch {} exceeds batch count {}",
                    batch.0,
                    self.batches.len()
                ))
            );
        }
        Ok(())
    }

    fn upload(program: &dyn GpuProgram, location: UniformLocation, value: UniformValue) {
        if let Err(error) = program.set_uniform(location, value) {
            crate::engine_warn!("meteor3d::Scene", "Uniform upload failed: {}", error);
        }
    }

    /// Upload the material uniform block; `None` only clears the diffuse
    /// map flag.
    fn upload_material(&self, device: &mut dyn GraphicsDevice, material: Option<&Arc<Material>>) {
        let uniforms = &self.uniforms;
        let program = self.program.as_ref();

        let Some(material) = material else {
            Self::upload(program, uniforms.mat_has_diffuse_map, UniformValue::Int(0));
            return;
        };

        Self::upload(program, uniforms.mat_ambient_color, UniformValue::Vec3(material.ambient_color.to_array()));
        Self::upload(program, uniforms.mat_diffuse_color, UniformValue::Vec3(material.diffuse_color.to_array()));
        Self::upload(program, uniforms.mat_specular_color, UniformValue::Vec3(material.specular_color.to_array()));
        Self::upload(program, uniforms.mat_emissive_color, UniformValue::Vec3(material.emissive_color.to_array()));
        Self::upload(program, uniforms.mat_specular_exponent, UniformValue::Float(material.specular_exponent));
        Self::upload(program, uniforms.mat_dissolve, UniformValue::Float(material.dissolve));

        match &material.diffuse_map {
            Some(texture) => {
                device.bind_texture(0, texture);
                Self::upload(program, uniforms.mat_diffuse_map, UniformValue::Int(0));
                Self::upload(program, uniforms.mat_has_diffuse_map, UniformValue::Int(1));
            }
            None => {
                Self::upload(program, uniforms.mat_has_diffuse_map, UniformValue::Int(0));
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
