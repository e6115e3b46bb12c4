/// Per-frame edge-tracked input state machine.
///
/// Four states per key/button, encoded as a bitmask so `key(k, DOWN |
/// PRESSED)` tests "currently active". Backend events write the edge
/// states (`DOWN` on press, `UP` on release); `update` runs once at frame
/// start and promotes `DOWN -> PRESSED`, `UP -> RELEASED`, snapshots the
/// mouse position for delta queries and clears the scroll accumulator.

use bitflags::bitflags;
use glam::{Vec2, Vec3};

use crate::context::WindowEvent;
use crate::input::{Key, MouseButton};
use crate::utils::normalized_or_zero;

bitflags! {
    /// State mask of one key or mouse button
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct KeyState: u8 {
        /// Idle, not held
        const RELEASED = 1 << 0;
        /// Went down this frame
        const DOWN = 1 << 1;
        /// Held since at least one frame
        const PRESSED = 1 << 2;
        /// Went up this frame
        const UP = 1 << 3;
    }
}

impl KeyState {
    /// Promote the edge states at frame start
    fn promote(&mut self) {
        if *self == KeyState::DOWN {
            *self = KeyState::PRESSED;
        } else if *self == KeyState::UP {
            *self = KeyState::RELEASED;
        }
    }
}

/// Keyboard and mouse state for the single window
pub struct Input {
    keys: [KeyState; Key::COUNT],
    mouse_buttons: [KeyState; MouseButton::COUNT],
    mouse_position: Vec2,
    previous_mouse_position: Vec2,
    scroll: f32,
}

impl Input {
    /// All keys released, mouse at the origin
    pub fn new() -> Self {
        Self {
            keys: [KeyState::RELEASED; Key::COUNT],
            mouse_buttons: [KeyState::RELEASED; MouseButton::COUNT],
            mouse_position: Vec2::ZERO,
            previous_mouse_position: Vec2::ZERO,
            scroll: 0.0,
        }
    }

    /// Apply one translated backend event.
    ///
    /// Called by the context while polling; key repeats arrive as extra
    /// press events and leave an already-down key untouched.
    pub fn handle_event(&mut self, event: WindowEvent) {
        match event {
            WindowEvent::Key { key, pressed } => {
                let state = &mut self.keys[key as usize];
                if pressed {
                    if !state.intersects(KeyState::DOWN | KeyState::PRESSED) {
                        *state = KeyState::DOWN;
                    }
                } else {
                    *state = KeyState::UP;
                }
            }
            WindowEvent::MouseButton { button, pressed } => {
                let state = &mut self.mouse_buttons[button as usize];
                if pressed {
                    if !state.intersects(KeyState::DOWN | KeyState::PRESSED) {
                        *state = KeyState::DOWN;
                    }
                } else {
                    *state = KeyState::UP;
                }
            }
            WindowEvent::CursorMoved { x, y } => {
                self.mouse_position = Vec2::new(x as f32, y as f32);
            }
            WindowEvent::Scroll { delta } => {
                self.scroll += delta;
            }
            WindowEvent::CloseRequested | WindowEvent::Resized { .. } => {}
        }
    }

    /// Advance one frame: promote edges, snapshot mouse, clear scroll.
    ///
    /// Must run once per frame, after the context polled events and before
    /// the application reads input.
    pub fn update(&mut self) {
        self.previous_mouse_position = self.mouse_position;
        self.scroll = 0.0;

        for state in self.keys.iter_mut() {
            state.promote();
        }

        for state in self.mouse_buttons.iter_mut() {
            state.promote();
        }
    }

    /// Whether the key's state intersects the given mask
    pub fn key(&self, key: Key, mask: KeyState) -> bool {
        self.key_state(key).intersects(mask)
    }

    /// Exact state of a key
    pub fn key_state(&self, key: Key) -> KeyState {
        self.keys[key as usize]
    }

    /// Whether the button's state intersects the given mask
    pub fn mouse_button(&self, button: MouseButton, mask: KeyState) -> bool {
        self.mouse_button_state(button).intersects(mask)
    }

    /// Exact state of a mouse button
    pub fn mouse_button_state(&self, button: MouseButton) -> KeyState {
        self.mouse_buttons[button as usize]
    }

    /// Cursor position in window pixels, as of the last event
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Cursor movement since the previous frame
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_position - self.previous_mouse_position
    }

    /// Scroll accumulated since the last `update`
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// WASD/arrow/space/ctrl movement axes, normalized.
    ///
    /// `x = (D|Right) - (A|Left)`, `y = (W|Up) - (S|Down)`,
    /// `z = Space - (LCtrl|RCtrl)`; the zero vector stays zero.
    pub fn movement_vector(&self) -> Vec3 {
        const ACTIVE: KeyState = KeyState::DOWN.union(KeyState::PRESSED);

        let mut input = Vec3::ZERO;

        if self.key(Key::W, ACTIVE) || self.key(Key::UpArrow, ACTIVE) {
            input.y += 1.0;
        }
        if self.key(Key::S, ACTIVE) || self.key(Key::DownArrow, ACTIVE) {
            input.y -= 1.0;
        }
        if self.key(Key::D, ACTIVE) || self.key(Key::RightArrow, ACTIVE) {
            input.x += 1.0;
        }
        if self.key(Key::A, ACTIVE) || self.key(Key::LeftArrow, ACTIVE) {
            input.x -= 1.0;
        }
        if self.key(Key::Space, ACTIVE) {
            input.z += 1.0;
        }
        if self.key(Key::LeftControl, ACTIVE) || self.key(Key::RightControl, ACTIVE) {
            input.z -= 1.0;
        }

        normalized_or_zero(input)
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "input_tests.rs"]
mod tests;
