/// Context - single window + GPU context lifecycle
///
/// Wraps the window backend: applies configuration, polls events once per
/// frame, forwards input events to the input system, runs the resize
/// callback, and raises a normal engine exit when the window reports a
/// close request.

use crate::context::{CursorMode, WindowBackend, WindowConfig, WindowEvent};
use crate::engine::Engine;
use crate::error::Result;
use crate::input::Input;

/// Invoked with the new framebuffer size after every resize
pub type ResizeCallback = Box<dyn FnMut(u32, u32) + Send>;

/// The engine's single window context
pub struct Context {
    backend: Box<dyn WindowBackend>,
    config: WindowConfig,
    resize_callback: Option<ResizeCallback>,
}

impl Context {
    /// Initialize the context: start the backend and create the window.
    ///
    /// # Errors
    ///
    /// `DependencyInit` when the backend cannot create a window.
    pub fn initialize(mut backend: Box<dyn WindowBackend>) -> Result<Self> {
        backend.create_window()?;

        crate::engine_info!("meteor3d::Context", "Main window created successfully");

        Ok(Self {
            backend,
            config: WindowConfig::default(),
            resize_callback: None,
        })
    }

    /// Apply all window settings at once
    pub fn configure(&mut self, config: WindowConfig, resize_callback: Option<ResizeCallback>) {
        self.resize_callback = resize_callback;
        self.set_title(&config.title);
        self.set_size(config.size.0, config.size.1);
        self.set_fullscreen(config.fullscreen);
        self.set_vsync(config.vsync);
    }

    pub fn set_title(&mut self, title: &str) {
        self.config.title = title.to_string();
        self.backend.set_title(title);
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.config.size = (width, height);
        self.backend.set_size(width, height);
    }

    pub fn set_vsync(&mut self, vsync: bool) {
        self.config.vsync = vsync;
        self.backend.set_vsync(vsync);
    }

    /// Toggle fullscreen; leaving restores the last requested size
    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.config.fullscreen = fullscreen;
        self.backend.set_fullscreen(fullscreen);
    }

    pub fn is_fullscreen(&self) -> bool {
        self.config.fullscreen
    }

    pub fn set_cursor_mode(&mut self, mode: CursorMode) {
        self.backend.set_cursor_mode(mode);
    }

    /// Current framebuffer size in pixels
    pub fn framebuffer_size(&self) -> (u32, u32) {
        self.backend.framebuffer_size()
    }

    /// Poll events and dispatch them.
    ///
    /// Input events feed the input system's edge machine; resizes run the
    /// registered callback; a close request raises a normal engine exit.
    /// Call once per frame, before `Input::update`.
    pub fn update(&mut self, input: &mut Input) {
        for event in self.backend.poll_events() {
            match event {
                WindowEvent::CloseRequested => {
                    crate::engine_info!("meteor3d::Context", "Main window close input received");
                    Engine::request_exit();
                }
                WindowEvent::Resized { width, height } => {
                    if let Some(callback) = self.resize_callback.as_mut() {
                        callback(width, height);
                    }
                }
                other => input.handle_event(other),
            }
        }
    }

    /// Present the frame
    pub fn swap_buffers(&mut self) {
        self.backend.swap_buffers();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
