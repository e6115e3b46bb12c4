/// WindowBackend trait - the window/input backend contract
///
/// The engine owns exactly one window through this trait: creation,
/// swap, event polling, cursor mode and the usual title/size/vsync/
/// fullscreen switches. Backends translate their native events into
/// [`WindowEvent`] values; the context forwards them to the input system
/// and the resize callback.

use crate::error::Result;
use crate::input::{Key, MouseButton};

/// Cursor behavior inside the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMode {
    /// Visible and free to leave the window
    Normal,
    /// Invisible while hovering the window
    Hidden,
    /// Grabbed and hidden; used for mouse-look
    Captured,
}

/// Backend-neutral window event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowEvent {
    /// The user asked to close the window
    CloseRequested,
    /// Framebuffer size changed (also sent after fullscreen toggles)
    Resized { width: u32, height: u32 },
    /// Keyboard key edge
    Key { key: Key, pressed: bool },
    /// Mouse button edge
    MouseButton { button: MouseButton, pressed: bool },
    /// Cursor moved, in window pixels
    CursorMoved { x: f64, y: f64 },
    /// Scroll wheel, vertical offset in lines
    Scroll { delta: f32 },
}

/// Initial window settings applied by `Context::configure`
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub size: (u32, u32),
    pub vsync: bool,
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            size: (1080, 720),
            vsync: false,
            fullscreen: false,
        }
    }
}

/// Window/input backend trait
///
/// One implementation drives one native window. `create_window` runs once
/// during `Context::initialize`; the remaining calls assume it succeeded.
pub trait WindowBackend: Send {
    /// Create the single window with a default size and empty title.
    ///
    /// # Errors
    ///
    /// `DependencyInit` when the native toolkit refuses to start.
    fn create_window(&mut self) -> Result<()>;

    /// Present the back buffer
    fn swap_buffers(&mut self);

    /// Drain all pending native events, translated
    fn poll_events(&mut self) -> Vec<WindowEvent>;

    fn set_title(&mut self, title: &str);

    /// Request a window size; the backend answers with a `Resized` event
    fn set_size(&mut self, width: u32, height: u32);

    fn set_vsync(&mut self, vsync: bool);

    /// Enter or leave fullscreen. Entering adopts the primary monitor's
    /// current video mode; leaving restores the last requested size at
    /// position (100, 100).
    fn set_fullscreen(&mut self, fullscreen: bool);

    fn set_cursor_mode(&mut self, mode: CursorMode);

    /// Current framebuffer size in pixels
    fn framebuffer_size(&self) -> (u32, u32);
}
