/// Key and mouse button identifiers.
///
/// Backend-neutral codes; the window backend translates its native codes
/// into these. The discriminants index the input system's state arrays.

/// Keyboard keys tracked by the input system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Key {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,
    Space,
    Escape,
    Enter,
    Tab,
    Backspace,
    LeftArrow,
    RightArrow,
    DownArrow,
    UpArrow,
    LeftShift,
    LeftControl,
    LeftAlt,
    LeftSuper,
    RightShift,
    RightControl,
    RightAlt,
    RightSuper,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
}

impl Key {
    /// Number of tracked keys; sizes the input state array
    pub const COUNT: usize = Key::F12 as usize + 1;
}

/// Mouse buttons tracked by the input system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
}

impl MouseButton {
    /// Number of tracked buttons; sizes the input state array
    pub const COUNT: usize = MouseButton::Forward as usize + 1;
}
