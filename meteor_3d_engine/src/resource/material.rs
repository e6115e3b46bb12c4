/// Material library - Wavefront-MTL parsing and the material set.
///
/// A material describes one surface: ambient/diffuse/specular/emissive
/// colors, specular exponent, refraction index, opacity, illumination
/// model and an optional diffuse texture. Meshes reference materials by
/// `Arc`, so material-change filtering during rendering is pointer
/// comparison.

use std::sync::Arc;

use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::graphics_device::{GpuTexture, TexturePool};
use crate::resource::image::ImageResource;
use crate::resource::text::tokenize;

/// Most tokens a material/model line can carry (`f` with 4 operands + keyword)
pub(crate) const LINE_MAX_TOKEN_COUNT: usize = 8;

/// One parsed material
pub struct Material {
    pub name: String,
    pub ambient_color: Vec3,
    pub diffuse_color: Vec3,
    pub specular_color: Vec3,
    pub emissive_color: Vec3,
    /// `Ns`
    pub specular_exponent: f32,
    /// `Ni`
    pub refraction_index: f32,
    /// `d`; 1 = opaque
    pub dissolve: f32,
    /// `illum`, passed through untouched
    pub illumination_model: i32,
    pub diffuse_map: Option<Arc<dyn GpuTexture>>,
}

impl Material {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ambient_color: Vec3::ZERO,
            diffuse_color: Vec3::ZERO,
            specular_color: Vec3::ZERO,
            emissive_color: Vec3::ZERO,
            specular_exponent: 0.0,
            refraction_index: 1.0,
            dissolve: 1.0,
            illumination_model: 0,
            diffuse_map: None,
        }
    }
}

/// A de-duplicated set of materials parsed from one `.mtl` stream
pub struct MaterialSet {
    materials: Vec<Arc<Material>>,
    by_name: FxHashMap<String, usize>,
}

impl MaterialSet {
    /// Parse an MTL stream.
    ///
    /// Recognized directives: `newmtl`, `Ns`, `Ka`, `Ke`, `Kd`, `Ks`,
    /// `Ni`, `d`, `illum`. Unknown directives are ignored silently.
    ///
    /// # Errors
    ///
    /// `ParseUnexpectedToken` for a directive before any `newmtl` or a
    /// malformed number.
    pub fn parse(source: &str) -> Result<Self> {
        Self::parse_internal(source, None)
    }

    /// Parse an MTL stream and bind one shared diffuse texture to every
    /// material, going through the de-duplicating texture pool.
    pub fn parse_textured(
        source: &str,
        texture_name: &str,
        image: &ImageResource,
        pool: &mut TexturePool,
    ) -> Result<Self> {
        let texture =
            pool.create_or_get(texture_name, image.pixels(), image.size(), image.channels())?;
        Self::parse_internal(source, Some(texture))
    }

    fn parse_internal(source: &str, diffuse_map: Option<Arc<dyn GpuTexture>>) -> Result<Self> {
        let mut materials: Vec<Material> = Vec::new();

        for (line_number, line) in source.lines().enumerate() {
            let tokens = tokenize(line, " ", LINE_MAX_TOKEN_COUNT);

            let Some(&keyword) = tokens.first() else {
                continue;
            };

            if keyword == "newmtl" {
                let name = operand(&tokens, 1, line_number)?;
                let mut material = Material::new(name);
                material.diffuse_map = diffuse_map.clone();
                materials.push(material);
                continue;
            }

            let known = matches!(
                keyword,
                "Ns" | "Ka" | "Ke" | "Kd" | "Ks" | "Ni" | "d" | "illum"
            );

            if !known {
                continue;
            }

            let Some(current) = materials.last_mut() else {
                crate::engine_bail!(
                    "meteor3d::Material",
                    Error::ParseUnexpectedToken {
                        line: line_number + 1,
                        token: keyword.to_string(),
                    }
                );
            };

            match keyword {
                "Ns" => current.specular_exponent = float_operand(&tokens, 1, line_number)?,
                "Ka" => current.ambient_color = vec3_operands(&tokens, line_number)?,
                "Ke" => current.emissive_color = vec3_operands(&tokens, line_number)?,
                "Kd" => current.diffuse_color = vec3_operands(&tokens, line_number)?,
                "Ks" => current.specular_color = vec3_operands(&tokens, line_number)?,
                "Ni" => current.refraction_index = float_operand(&tokens, 1, line_number)?,
                "d" => current.dissolve = float_operand(&tokens, 1, line_number)?,
                "illum" => {
                    current.illumination_model =
                        float_operand(&tokens, 1, line_number)? as i32;
                }
                _ => unreachable!(),
            }
        }

        let mut by_name = FxHashMap::default();
        let materials: Vec<Arc<Material>> = materials.into_iter().map(Arc::new).collect();

        for (index, material) in materials.iter().enumerate() {
            by_name.insert(material.name.clone(), index);
        }

        crate::engine_info!(
            "meteor3d::Material",
            "Material set parsed with {} materials",
            materials.len()
        );

        Ok(Self { materials, by_name })
    }

    /// Look up a material by name
    pub fn get(&self, name: &str) -> Option<&Arc<Material>> {
        self.by_name.get(name).map(|&index| &self.materials[index])
    }

    /// All materials in parse order
    pub fn materials(&self) -> &[Arc<Material>] {
        &self.materials
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

pub(crate) fn operand<'a>(tokens: &[&'a str], index: usize, line_number: usize) -> Result<&'a str> {
    tokens.get(index).copied().ok_or_else(|| {
        crate::engine_err!(
            "meteor3d::Resource",
            Error::ParseUnexpectedToken {
                line: line_number + 1,
                token: tokens.first().copied().unwrap_or_default().to_string(),
            }
        )
    })
}

pub(crate) fn float_operand(tokens: &[&str], index: usize, line_number: usize) -> Result<f32> {
    let token = operand(tokens, index, line_number)?;
    token.parse::<f32>().map_err(|_| {
        crate::engine_err!(
            "meteor3d::Resource",
            Error::ParseUnexpectedToken {
                line: line_number + 1,
                token: token.to_string(),
            }
        )
    })
}

fn vec3_operands(tokens: &[&str], line_number: usize) -> Result<Vec3> {
    Ok(Vec3::new(
        float_operand(tokens, 1, line_number)?,
        float_operand(tokens, 2, line_number)?,
        float_operand(tokens, 3, line_number)?,
    ))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "material_tests.rs"]
mod tests;
