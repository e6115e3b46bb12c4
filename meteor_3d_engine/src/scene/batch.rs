/// Batches and renderer components.
///
/// A batch groups every instance of one model; the scene draws a batch
/// with a single instanced call per mesh. Components are indices into the
/// batch's two parallel arrays (entity keys and instance matrices), which
/// grow and shrink together. Destroying a component shifts the components
/// after it down by one, so callers holding higher handles must treat
/// them as decremented — handles here are positions, not stable ids.

use std::sync::Arc;

use glam::Mat4;

use crate::resource::Model;
use crate::scene::TransformStore;

/// Handle of a batch inside its scene (position in the batch list)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchId(pub(crate) usize);

/// Handle of a component inside its batch (position in both arrays)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId(pub(crate) usize);

impl BatchId {
    /// Position of the batch in the scene's batch list
    pub fn index(&self) -> usize {
        self.0
    }
}

impl ComponentId {
    /// Position of the component in the batch's arrays
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Instances of one model, drawn together
pub struct Batch {
    model: Arc<Model>,
    components: Vec<crate::scene::EntityKey>,
    matrices: Vec<Mat4>,
}

impl Batch {
    pub(crate) fn new(model: Arc<Model>, initial_capacity: usize) -> Self {
        Self {
            model,
            components: Vec::with_capacity(initial_capacity),
            matrices: Vec::with_capacity(initial_capacity),
        }
    }

    /// The shared model every component instances
    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    /// Entity keys in component order
    pub fn components(&self) -> &[crate::scene::EntityKey] {
        &self.components
    }

    /// Instance matrices, rebuilt by `Scene::update`
    pub fn matrices(&self) -> &[Mat4] {
        &self.matrices
    }

    /// Number of live instances
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.components.len(), self.matrices.len());
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub(crate) fn add_component(&mut self, entity: crate::scene::EntityKey) -> usize {
        self.components.push(entity);
        self.matrices.push(Mat4::IDENTITY);
        self.components.len() - 1
    }

    pub(crate) fn remove_component(&mut self, offset: usize) {
        self.components.remove(offset);
        self.matrices.remove(offset);
    }

    /// Compose every component's model matrix from its referenced
    /// transform into the instance slot at the same offset
    pub(crate) fn update_matrices(&mut self, transforms: &TransformStore) {
        for (entity, matrix) in self.components.iter().zip(self.matrices.iter_mut()) {
            match transforms.get(*entity) {
                Some(transform) => *matrix = transform.matrix(),
                None => {
                    crate::engine_warn!(
                        "meteor3d::Batch",
                        "Component entity is gone from the transform store"
                    );
                }
            }
        }
    }
}
