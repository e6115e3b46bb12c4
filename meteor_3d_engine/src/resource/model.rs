/// Model library - OBJ-dialect parsing into GPU-ready vertex pools.
///
/// One model owns a contiguous vertex pool; each of its meshes owns an
/// index buffer into that pool plus the material selected by the last
/// `usemtl`. The parser bakes a caller-supplied transform offset into
/// positions and normals, so no per-model matrix exists at render time.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::resource::material::{float_operand, operand, Material, MaterialSet, LINE_MAX_TOKEN_COUNT};
use crate::resource::text::tokenize;
use crate::graphics_device::{VertexAttribute, VertexLayout};
use crate::scene::Transform;

// LAYOUT OF FIELDS MUST MATCH THE ATTRIBUTE LAYOUT IN THE VERTEX SHADER
/// One interleaved vertex: position, normal, uv. 32 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    /// Attribute layout at bindings 0/1/2, stride 32
    pub const LAYOUT: VertexLayout = VertexLayout {
        stride: std::mem::size_of::<MeshVertex>(),
        attributes: &[
            VertexAttribute { binding: 0, components: 3, offset: 0 },
            VertexAttribute { binding: 1, components: 3, offset: 12 },
            VertexAttribute { binding: 2, components: 2, offset: 24 },
        ],
    };
}

/// One mesh: an index buffer into the owning model's vertex pool
pub struct Mesh {
    pub indices: Vec<u32>,
    pub material: Option<Arc<Material>>,
}

/// A named model: vertex pool plus its meshes
pub struct Model {
    pub name: String,
    pub vertices: Vec<MeshVertex>,
    pub meshes: Vec<Mesh>,
}

/// All models parsed from one model stream, looked up by name
pub struct ModelSet {
    models: Vec<Arc<Model>>,
    by_name: FxHashMap<String, usize>,
}

/// Per-model counts gathered by the first pass
#[derive(Default, Clone)]
struct ModelCounts {
    positions: usize,
    uvs: usize,
    normals: usize,
    meshes: usize,
}

impl ModelSet {
    /// Parse a model stream referencing `materials`.
    ///
    /// Directives: `newmdl`, `o`, `v`, `vn`, `vt`, `f` (3 or 4 operands;
    /// quads triangulate to (1,2,3)(1,3,4)), `usemtl`. Positions and
    /// normals are multiplied by `offset`'s TRS matrix while ingesting
    /// (normals with w = 0). Negative face indices resolve against the
    /// pool count at the line where the face appears.
    ///
    /// # Errors
    ///
    /// `ParseUnexpectedToken` for data before `newmdl`, faces before `o`,
    /// malformed operands or unsupported operand counts;
    /// `UnknownMaterial` when `usemtl` names an absent material.
    pub fn parse(source: &str, materials: &MaterialSet, offset: &Transform) -> Result<Self> {
        let offset_matrix = offset.matrix();

        // Pass 1: per-model element counts and names.
        let mut counts: Vec<ModelCounts> = Vec::new();
        let mut names: Vec<String> = Vec::new();

        for (line_number, line) in source.lines().enumerate() {
            let tokens = tokenize(line, " ", LINE_MAX_TOKEN_COUNT);

            let Some(&keyword) = tokens.first() else {
                continue;
            };

            if keyword == "newmdl" {
                names.push(operand(&tokens, 1, line_number)?.to_string());
                counts.push(ModelCounts::default());
                continue;
            }

            let relevant = matches!(keyword, "v" | "vt" | "vn" | "o" | "f" | "usemtl");
            if !relevant {
                continue;
            }

            let Some(current) = counts.last_mut() else {
                crate::engine_bail!(
                    "meteor3d::Model",
                    Error::ParseUnexpectedToken {
                        line: line_number + 1,
                        token: keyword.to_string(),
                    }
                );
            };

            match keyword {
                "v" => current.positions += 1,
                "vt" => current.uvs += 1,
                "vn" => current.normals += 1,
                "o" => current.meshes += 1,
                _ => {}
            }
        }

        // Pass 2: triangle counts per mesh, for index pre-allocation.
        let mut face_counts: Vec<Vec<usize>> = counts
            .iter()
            .map(|model| vec![0usize; model.meshes])
            .collect();

        {
            let mut model_index = 0usize;
            let mut mesh_index = 0usize;

            for (line_number, line) in source.lines().enumerate() {
                let tokens = tokenize(line, " ", LINE_MAX_TOKEN_COUNT);

                match tokens.first() {
                    Some(&"newmdl") => {
                        model_index = face_counts.len().min(model_index + 1);
                        mesh_index = 0;
                    }
                    Some(&"o") => mesh_index += 1,
                    Some(&"f") => {
                        if mesh_index == 0 {
                            crate::engine_bail!(
                                "meteor3d::Model",
                                Error::ParseUnexpectedToken {
                                    line: line_number + 1,
                                    token: "f".to_string(),
                                }
                            );
                        }
                        let triangles = match tokens.len() {
                            4 => 1,
                            5 => 2,
                            _ => {
                                crate::engine_bail!(
                                    "meteor3d::Model",
                                    Error::ParseUnexpectedToken {
                                        line: line_number + 1,
                                        token: line.trim().to_string(),
                                    }
                                );
                            }
                        };
                        // model_index is 1-based here: `newmdl` increments first.
                        face_counts[model_index - 1][mesh_index - 1] += triangles;
                    }
                    _ => {}
                }
            }
        }

        // Pass 3: stream the data into pre-sized pools. Face indices
        // resolve against the counts accumulated so far, which is what
        // makes negative (from-the-end) references work mid-file.
        let mut models: Vec<Model> = Vec::new();
        let mut uv_pool: Vec<Vec2> = Vec::new();
        let mut normal_pool: Vec<Vec3> = Vec::new();
        let mut current_material: Option<Arc<Material>> = None;
        let mut mesh_index = 0usize;

        for (line_number, line) in source.lines().enumerate() {
            let tokens = tokenize(line, " ", LINE_MAX_TOKEN_COUNT);

            let Some(&keyword) = tokens.first() else {
                continue;
            };

            match keyword {
                "newmdl" => {
                    let model_index = models.len();
                    models.push(Model {
                        name: names[model_index].clone(),
                        vertices: Vec::with_capacity(counts[model_index].positions),
                        meshes: Vec::with_capacity(counts[model_index].meshes),
                    });
                    uv_pool = Vec::with_capacity(counts[model_index].uvs);
                    normal_pool = Vec::with_capacity(counts[model_index].normals);
                    current_material = None;
                    mesh_index = 0;
                }
                "v" => {
                    let raw = Vec3::new(
                        float_operand(&tokens, 1, line_number)?,
                        float_operand(&tokens, 2, line_number)?,
                        float_operand(&tokens, 3, line_number)?,
                    );
                    let baked = offset_matrix.transform_point3(raw);
                    let model = models.last_mut().expect("pass 1 rejected data before newmdl");
                    model.vertices.push(MeshVertex {
                        position: baked.to_array(),
                        normal: [0.0; 3],
                        uv: [0.0; 2],
                    });
                }
                "vt" => {
                    uv_pool.push(Vec2::new(
                        float_operand(&tokens, 1, line_number)?,
                        float_operand(&tokens, 2, line_number)?,
                    ));
                }
                "vn" => {
                    let raw = Vec3::new(
                        float_operand(&tokens, 1, line_number)?,
                        float_operand(&tokens, 2, line_number)?,
                        float_operand(&tokens, 3, line_number)?,
                    );
                    normal_pool.push(offset_matrix.transform_vector3(raw));
                }
                "usemtl" => {
                    let name = operand(&tokens, 1, line_number)?;
                    let material = materials.get(name).ok_or_else(|| {
                        crate::engine_err!(
                            "meteor3d::Model",
                            Error::UnknownMaterial(name.to_string())
                        )
                    })?;
                    current_material = Some(Arc::clone(material));
                }
                "o" => {
                    let model_index = models.len() - 1;
                    let model = models.last_mut().expect("pass 1 rejected data before newmdl");
                    let capacity = face_counts[model_index][mesh_index] * 3;
                    model.meshes.push(Mesh {
                        indices: Vec::with_capacity(capacity),
                        material: current_material.clone(),
                    });
                    mesh_index += 1;
                }
                "f" => {
                    let model = models.last_mut().expect("pass 1 rejected data before newmdl");
                    let corners = &tokens[1..];

                    // Triangle as-is; quad splits into (1,2,3) and (1,3,4).
                    let emit_order: &[usize] = match corners.len() {
                        3 => &[0, 1, 2],
                        4 => &[0, 1, 2, 0, 2, 3],
                        _ => unreachable!("pass 2 validated operand counts"),
                    };

                    for &corner in emit_order {
                        process_face_vertex(
                            corners[corner],
                            model,
                            &uv_pool,
                            &normal_pool,
                            line_number,
                        )?;
                    }
                }
                _ => {}
            }
        }

        let mut by_name = FxHashMap::default();
        let models: Vec<Arc<Model>> = models.into_iter().map(Arc::new).collect();

        for (index, model) in models.iter().enumerate() {
            by_name.insert(model.name.clone(), index);
            crate::engine_info!(
                "meteor3d::Model",
                "Model '{}' imported successfully with {} child meshes",
                model.name,
                model.meshes.len()
            );
        }

        Ok(Self { models, by_name })
    }

    /// Look up a model by name.
    ///
    /// # Errors
    ///
    /// `UnknownModel` when the set holds no model of that name.
    pub fn get(&self, name: &str) -> Result<Arc<Model>> {
        self.by_name
            .get(name)
            .map(|&index| Arc::clone(&self.models[index]))
            .ok_or_else(|| {
                crate::engine_err!("meteor3d::Model", Error::UnknownModel(name.to_string()))
            })
    }

    /// All models in parse order
    pub fn models(&self) -> &[Arc<Model>] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// Resolve one `v/vt/vn` face operand: append the index, write the
/// referenced uv/normal back into the pooled vertex.
///
/// Writing back into the shared vertex means a position reused with a
/// different uv/normal keeps only the last one; `model_tests` pins that
/// behavior down.
fn process_face_vertex(
    corner: &str,
    model: &mut Model,
    uv_pool: &[Vec2],
    normal_pool: &[Vec3],
    line_number: usize,
) -> Result<()> {
    let mut parts = corner.split('/');

    let vertex_index = resolve_index(parts.next().unwrap_or(""), model.vertices.len(), line_number)?;

    let uv_index = match parts.next() {
        Some("") | None => None,
        Some(token) => Some(resolve_index(token, uv_pool.len(), line_number)?),
    };

    let normal_index = match parts.next() {
        Some("") | None => None,
        Some(token) => Some(resolve_index(token, normal_pool.len(), line_number)?),
    };

    let vertex = model.vertices.get_mut(vertex_index).ok_or_else(|| {
        crate::engine_err!(
            "meteor3d::Model",
            Error::ParseUnexpectedToken {
                line: line_number + 1,
                token: corner.to_string(),
            }
        )
    })?;

    if let Some(index) = uv_index {
        let uv = uv_pool.get(index).ok_or_else(|| out_of_pool(corner, line_number))?;
        vertex.uv = uv.to_array();
    }

    if let Some(index) = normal_index {
        let normal = normal_pool.get(index).ok_or_else(|| out_of_pool(corner, line_number))?;
        vertex.normal = normal.to_array();
    }

    let mesh = model.meshes.last_mut().ok_or_else(|| {
        crate::engine_err!(
            "meteor3d::Model",
            Error::ParseUnexpectedToken {
                line: line_number + 1,
                token: corner.to_string(),
            }
        )
    })?;

    mesh.indices.push(vertex_index as u32);

    Ok(())
}

/// `1`-based indices count from the front; `-k` counts back from the
/// current pool count (`resolve(-k, n) = n - k`).
fn resolve_index(token: &str, pool_count: usize, line_number: usize) -> Result<usize> {
    let parsed: i64 = token.parse().map_err(|_| {
        crate::engine_err!(
            "meteor3d::Model",
            Error::ParseUnexpectedToken {
                line: line_number + 1,
                token: token.to_string(),
            }
        )
    })?;

    let resolved = if parsed < 0 {
        pool_count as i64 + parsed
    } else {
        parsed - 1
    };

    if resolved < 0 {
        crate::engine_bail!(
            "meteor3d::Model",
            Error::ParseUnexpectedToken {
                line: line_number + 1,
                token: token.to_string(),
            }
        );
    }

    Ok(resolved as usize)
}

fn out_of_pool(corner: &str, line_number: usize) -> Error {
    crate::engine_err!(
        "meteor3d::Model",
        Error::ParseUnexpectedToken {
            line: line_number + 1,
            token: corner.to_string(),
        }
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
