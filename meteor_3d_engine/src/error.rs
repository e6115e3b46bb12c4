//! Error types for the Meteor3D engine
//!
//! One crate-level error enum shared by every subsystem: resources,
//! rendering, physics and audio. Setup-phase errors are fatal and
//! propagate out of `App::setup`; per-frame errors are logged and the
//! frame continues.

use std::fmt;

/// Result type for Meteor3D engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Meteor3D engine errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A resource file could not be opened
    FileOpen { path: String, message: String },

    /// A resource exceeds an engine limit (e.g. text line length)
    ResourceTooLarge(String),

    /// A parser met a token it cannot accept at that position
    ParseUnexpectedToken { line: usize, token: String },

    /// `usemtl` named a material absent from the supplied material set
    UnknownMaterial(String),

    /// A batch was requested for a model absent from the model pool
    UnknownModel(String),

    /// A handle names a freed slot or exceeds the subsystem's range
    InvalidHandle(String),

    /// An external backend refused to initialize
    DependencyInit(String),

    /// Shader compilation failed (fatal at setup)
    ShaderCompile(String),

    /// Shader program linking failed (fatal at setup)
    ShaderLink(String),

    /// The GPU reported an error code during a frame
    GpuRuntime(String),

    /// A scene operation needs a main camera and none is bound
    NoCamera,

    /// Backend-specific error (graphics, window or audio backend)
    BackendError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::FileOpen { path, message } => {
                write!(f, "Failed to open '{}': {}", path, message)
            }
            Error::ResourceTooLarge(msg) => write!(f, "Resource too large: {}", msg),
            Error::ParseUnexpectedToken { line, token } => {
                write!(f, "Unexpected token '{}' at line {}", token, line)
            }
            Error::UnknownMaterial(name) => {
                write!(f, "Material '{}' not found in material pool", name)
            }
            Error::UnknownModel(name) => write!(f, "Model '{}' not found in model pool", name),
            Error::InvalidHandle(msg) => write!(f, "Invalid handle: {}", msg),
            Error::DependencyInit(msg) => write!(f, "Dependency initialization failed: {}", msg),
            Error::ShaderCompile(msg) => write!(f, "Shader compilation failed: {}", msg),
            Error::ShaderLink(msg) => write!(f, "Shader program linking failed: {}", msg),
            Error::GpuRuntime(msg) => write!(f, "GPU runtime error: {}", msg),
            Error::NoCamera => write!(f, "No main camera is bound to the scene"),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Build an error value and log it with source location.
///
/// # Example
///
/// ```ignore
/// return Err(engine_err!("meteor3d::Model", Error::UnknownModel(name.to_string())));
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $error:expr) => {{
        let error: $crate::error::Error = $error;
        $crate::engine_error!($source, "{}", error);
        error
    }};
}

/// Log an error with source location and return it from the current function.
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $error:expr) => {
        return Err($crate::engine_err!($source, $error))
    };
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
