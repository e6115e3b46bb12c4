/// Scene placement format.
///
/// Line-oriented description of a populated scene:
///
/// ```text
/// newscn <name>
/// usemdl <model-name> [capacity]
/// p x y z   position of the next instance
/// r x y z   rotation (degrees)
/// s x y z   scale — commits one instance
/// ```
///
/// Parsing yields a plain description; `build` applies it to a scene,
/// creating one batch per `usemdl` group and one entity + component per
/// committed instance.

use glam::Vec3;

use crate::error::{Error, Result};
use crate::resource::material::{float_operand, operand, LINE_MAX_TOKEN_COUNT};
use crate::resource::text::tokenize;
use crate::resource::ModelSet;
use crate::scene::{EntityKey, Scene, Transform, TransformStore, BATCH_INITIAL_CAPACITY};

/// Instances of one model in a scene description
pub struct ScenePlacement {
    pub model: String,
    pub capacity: usize,
    pub instances: Vec<Transform>,
}

/// A parsed scene file
pub struct SceneDescription {
    pub name: String,
    pub placements: Vec<ScenePlacement>,
}

impl SceneDescription {
    /// Parse a scene stream.
    ///
    /// # Errors
    ///
    /// `ParseUnexpectedToken` for placement lines before `newscn` /
    /// `usemdl` or malformed numbers.
    pub fn parse(source: &str) -> Result<Self> {
        let mut name: Option<String> = None;
        let mut placements: Vec<ScenePlacement> = Vec::new();
        let mut pending = Transform::IDENTITY;

        for (line_number, line) in source.lines().enumerate() {
            let tokens = tokenize(line, " ", LINE_MAX_TOKEN_COUNT);

            let Some(&keyword) = tokens.first() else {
                continue;
            };

            let unexpected = || {
                crate::engine_err!(
                    "meteor3d::SceneDescription",
                    Error::ParseUnexpectedToken {
                        line: line_number + 1,
                        token: keyword.to_string(),
                    }
                )
            };

            match keyword {
                "newscn" => {
                    name = Some(operand(&tokens, 1, line_number)?.to_string());
                }
                "usemdl" => {
                    if name.is_none() {
                        return Err(unexpected());
                    }
                    let model = operand(&tokens, 1, line_number)?.to_string();
                    let capacity = match tokens.get(2) {
                        Some(_) => float_operand(&tokens, 2, line_number)? as usize,
                        None => BATCH_INITIAL_CAPACITY,
                    };
                    placements.push(ScenePlacement {
                        model,
                        capacity,
                        instances: Vec::new(),
                    });
                }
                "p" | "r" | "s" => {
                    let placement = placements.last_mut().ok_or_else(unexpected)?;

                    let value = Vec3::new(
                        float_operand(&tokens, 1, line_number)?,
                        float_operand(&tokens, 2, line_number)?,
                        float_operand(&tokens, 3, line_number)?,
                    );

                    match keyword {
                        "p" => pending.position = value,
                        "r" => pending.rotation = value,
                        "s" => {
                            pending.scale = value;
                            placement.instances.push(pending);
                            pending = Transform::IDENTITY;
                        }
                        _ => unreachable!(),
                    }
                }
                _ => {}
            }
        }

        let name = name.ok_or_else(|| {
            crate::engine_err!(
                "meteor3d::SceneDescription",
                Error::ParseUnexpectedToken {
                    line: 0,
                    token: "newscn".to_string(),
                }
            )
        })?;

        crate::engine_info!(
            "meteor3d::SceneDescription",
            "Scene '{}' parsed with {} model groups",
            name,
            placements.len()
        );

        Ok(Self { name, placements })
    }

    /// Populate `scene` from this description.
    ///
    /// Creates one batch per placement and one entity per instance in the
    /// caller's transform store, returning the created entity keys in
    /// commit order.
    ///
    /// # Errors
    ///
    /// `UnknownModel` when a placement names a model absent from `models`.
    pub fn build(
        &self,
        scene: &mut Scene,
        models: &ModelSet,
        transforms: &mut TransformStore,
    ) -> Result<Vec<EntityKey>> {
        let mut entities = Vec::new();

        for placement in &self.placements {
            let model = models.get(&placement.model)?;
            let batch = scene.create_batch_with_capacity(model, placement.capacity);

            for instance in &placement.instances {
                let entity = transforms.insert(*instance);
                scene.create_component(batch, entity)?;
                entities.push(entity);
            }
        }

        crate::engine_info!(
            "meteor3d::SceneDescription",
            "Scene '{}' imported successfully",
            self.name
        );

        Ok(entities)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "scene_description_tests.rs"]
mod tests;
