/// Resource module - text/image loading and the model/material parsers
///
/// All resources resolve against one root: `<executable dir>/resources`,
/// falling back to `./resources` when the executable directory carries no
/// resource tree (typical for `cargo run` from a crate directory).
/// Shaders live under `shaders/`, models under `models/`, audio under
/// `audio/` and images under `textures/`.

pub mod image;
pub mod material;
pub mod model;
pub mod text;

pub use self::image::ImageResource;
pub use self::material::{Material, MaterialSet};
pub use self::model::{Mesh, MeshVertex, Model, ModelSet};
pub use self::text::{tokenize, TextResource};

use std::path::PathBuf;

/// Resolve the resource root directory
pub fn resource_root() -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let root = dir.join("resources");
            if root.is_dir() {
                return root;
            }
        }
    }

    PathBuf::from("resources")
}
