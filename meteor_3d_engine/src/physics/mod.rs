/// Physics module - AABB collision detection and impulse resolution

pub mod physics_scene;

pub use physics_scene::*;
