/// Audio module - spatialized sounds over an external audio engine

pub mod audio_backend;
pub mod audio_scene;

pub use audio_backend::*;
pub use audio_scene::*;
