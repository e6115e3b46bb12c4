/// Headless window: settings and events without an OS window.
///
/// Tests and the demo inject [`WindowEvent`]s through a shared queue;
/// `poll_events` drains it. Size/fullscreen behave like the native
/// contract: a size request answers with a `Resized` event, entering
/// fullscreen adopts a fixed "monitor" mode, and leaving restores the
/// last requested size.

use std::sync::{Arc, Mutex};

use meteor_3d_engine::context::{CursorMode, WindowBackend, WindowEvent};
use meteor_3d_engine::error::Result;

/// The primary "monitor" video mode the headless window adopts in
/// fullscreen
pub const MONITOR_SIZE: (u32, u32) = (1920, 1080);

/// Shared handle for injecting events into a running backend
pub type EventQueue = Arc<Mutex<Vec<WindowEvent>>>;

pub struct HeadlessWindowBackend {
    events: EventQueue,
    title: String,
    requested_size: (u32, u32),
    framebuffer: (u32, u32),
    vsync: bool,
    fullscreen: bool,
    cursor_mode: CursorMode,
    swap_count: u64,
}

impl HeadlessWindowBackend {
    /// Create a backend plus the queue used to inject events
    pub fn new() -> (Self, EventQueue) {
        let events: EventQueue = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                events: Arc::clone(&events),
                title: String::new(),
                requested_size: (1080, 720),
                framebuffer: (1080, 720),
                vsync: false,
                fullscreen: false,
                cursor_mode: CursorMode::Normal,
                swap_count: 0,
            },
            events,
        )
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn vsync(&self) -> bool {
        self.vsync
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn cursor_mode(&self) -> CursorMode {
        self.cursor_mode
    }

    /// Number of presented frames
    pub fn swap_count(&self) -> u64 {
        self.swap_count
    }
}

impl WindowBackend for HeadlessWindowBackend {
    fn create_window(&mut self) -> Result<()> {
        Ok(())
    }

    fn swap_buffers(&mut self) {
        self.swap_count += 1;
    }

    fn poll_events(&mut self) -> Vec<WindowEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.requested_size = (width, height);

        if !self.fullscreen {
            self.framebuffer = (width, height);
            self.events
                .lock()
                .unwrap()
                .push(WindowEvent::Resized { width, height });
        }
    }

    fn set_vsync(&mut self, vsync: bool) {
        self.vsync = vsync;
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;

        // Fullscreen adopts the monitor mode; leaving restores the last
        // requested window size.
        let (width, height) = if fullscreen {
            MONITOR_SIZE
        } else {
            self.requested_size
        };

        self.framebuffer = (width, height);
        self.events
            .lock()
            .unwrap()
            .push(WindowEvent::Resized { width, height });
    }

    fn set_cursor_mode(&mut self, mode: CursorMode) {
        self.cursor_mode = mode;
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        self.framebuffer
    }
}
