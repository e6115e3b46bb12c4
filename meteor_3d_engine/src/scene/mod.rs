/// Scene module - the instanced renderer and its supporting types

pub mod batch;
pub mod camera;
pub mod debug_renderer;
pub mod scene;
pub mod scene_description;
pub mod transform;

pub use batch::*;
pub use camera::*;
pub use debug_renderer::*;
pub use scene::*;
pub use scene_description::*;
pub use transform::*;
