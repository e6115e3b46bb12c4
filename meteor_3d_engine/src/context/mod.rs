/// Context module - window lifecycle over the window/input backend

pub mod context;
pub mod window_backend;

pub use context::*;
pub use window_backend::*;
