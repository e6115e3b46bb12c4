/*!
# Meteor 3D Engine

Core traits and types for the Meteor 3D real-time engine.

This crate provides the platform-agnostic engine: the resource pipeline
(Wavefront-style models and materials, image decoding), the batched
instanced renderer, the AABB physics scene, the spatial audio scene, and
the input/context layers beneath them. The GPU, window and audio devices
are reached exclusively through traits; backend implementations (the
in-tree headless backend, or a native one) are separate crates.

## Architecture

- **GraphicsDevice**: factory + submission trait for GPU resources
- **WindowBackend**: window lifecycle, events, presentation
- **AudioBackend**: spatial-audio engine surface
- **Scene / Batch**: instanced draw of models, one call per mesh
- **PhysicsScene / AudioScene**: component arrays over recycled slots
- **TransformStore**: the caller-owned entity table every component
  references instead of owning its transform
*/

// Error handling module
pub mod error;

// Logging module with the engine_*! macros
pub mod log;

// Engine singleton manager and frame-loop driver
pub mod engine;

// GPU backend contract and the de-duplicating texture pool
pub mod graphics_device;

// Window lifecycle over the window/input backend
pub mod context;

// Edge-tracked keyboard/mouse state machine
pub mod input;

// Text/image resources and the model/material parsers
pub mod resource;

// The instanced renderer: scenes, batches, cameras, debug lines
pub mod scene;

// AABB collision detection and resolution
pub mod physics;

// Spatialized sound components
pub mod audio;

// Shared helpers: slot allocator, angle helpers, frame timer
pub mod utils;

// Re-export error types at crate root
pub use error::{Error, Result};

// Re-export the engine driver and application trait
pub use engine::{App, Engine};

// Re-export math library
pub use glam;
