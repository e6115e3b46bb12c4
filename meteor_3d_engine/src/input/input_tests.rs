use super::*;

fn press(input: &mut Input, key: Key) {
    input.handle_event(WindowEvent::Key { key, pressed: true });
}

fn release(input: &mut Input, key: Key) {
    input.handle_event(WindowEvent::Key { key, pressed: false });
}

// ============================================================================
// Edge machine tests
// ============================================================================

#[test]
fn test_edge_trace_press_update_update_release_update() {
    let mut input = Input::new();

    press(&mut input, Key::A);
    assert_eq!(input.key_state(Key::A), KeyState::DOWN);

    input.update();
    assert_eq!(input.key_state(Key::A), KeyState::PRESSED);

    input.update();
    assert_eq!(input.key_state(Key::A), KeyState::PRESSED);

    release(&mut input, Key::A);
    assert_eq!(input.key_state(Key::A), KeyState::UP);

    input.update();
    assert_eq!(input.key_state(Key::A), KeyState::RELEASED);
}

#[test]
fn test_mask_query_down_or_pressed_means_active() {
    let mut input = Input::new();

    assert!(!input.key(Key::W, KeyState::DOWN | KeyState::PRESSED));

    press(&mut input, Key::W);
    assert!(input.key(Key::W, KeyState::DOWN | KeyState::PRESSED));

    input.update();
    assert!(input.key(Key::W, KeyState::DOWN | KeyState::PRESSED));

    release(&mut input, Key::W);
    assert!(!input.key(Key::W, KeyState::DOWN | KeyState::PRESSED));
    assert!(input.key(Key::W, KeyState::UP));
}

#[test]
fn test_key_repeat_does_not_reset_pressed_to_down() {
    let mut input = Input::new();

    press(&mut input, Key::A);
    input.update();
    assert_eq!(input.key_state(Key::A), KeyState::PRESSED);

    // OS key repeat sends another press while the key is held
    press(&mut input, Key::A);
    assert_eq!(input.key_state(Key::A), KeyState::PRESSED);
}

#[test]
fn test_mouse_button_edges() {
    let mut input = Input::new();

    input.handle_event(WindowEvent::MouseButton {
        button: MouseButton::Left,
        pressed: true,
    });
    assert_eq!(input.mouse_button_state(MouseButton::Left), KeyState::DOWN);

    input.update();
    assert_eq!(input.mouse_button_state(MouseButton::Left), KeyState::PRESSED);

    input.handle_event(WindowEvent::MouseButton {
        button: MouseButton::Left,
        pressed: false,
    });
    input.update();
    assert_eq!(input.mouse_button_state(MouseButton::Left), KeyState::RELEASED);
}

// ============================================================================
// Mouse position and scroll tests
// ============================================================================

#[test]
fn test_mouse_delta_is_relative_to_previous_frame() {
    let mut input = Input::new();

    input.handle_event(WindowEvent::CursorMoved { x: 100.0, y: 50.0 });
    input.update();

    input.handle_event(WindowEvent::CursorMoved { x: 130.0, y: 40.0 });
    assert_eq!(input.mouse_delta(), Vec2::new(30.0, -10.0));

    input.update();
    assert_eq!(input.mouse_delta(), Vec2::ZERO);
}

#[test]
fn test_scroll_accumulates_then_clears_on_update() {
    let mut input = Input::new();

    input.handle_event(WindowEvent::Scroll { delta: 1.0 });
    input.handle_event(WindowEvent::Scroll { delta: 0.5 });
    assert_eq!(input.scroll(), 1.5);

    input.update();
    assert_eq!(input.scroll(), 0.0);
}

// ============================================================================
// Movement vector tests
// ============================================================================

#[test]
fn test_movement_vector_axes() {
    let mut input = Input::new();

    press(&mut input, Key::D);
    assert_eq!(input.movement_vector(), Vec3::new(1.0, 0.0, 0.0));

    release(&mut input, Key::D);
    input.update();
    input.update();

    press(&mut input, Key::W);
    assert_eq!(input.movement_vector(), Vec3::new(0.0, 1.0, 0.0));

    press(&mut input, Key::Space);
    let diagonal = input.movement_vector();
    assert!((diagonal.length() - 1.0).abs() < 1e-5);
    assert!(diagonal.y > 0.0 && diagonal.z > 0.0);
}

#[test]
fn test_movement_vector_opposites_cancel() {
    let mut input = Input::new();

    press(&mut input, Key::A);
    press(&mut input, Key::D);
    press(&mut input, Key::LeftControl);
    press(&mut input, Key::Space);

    assert_eq!(input.movement_vector(), Vec3::ZERO);
}

#[test]
fn test_movement_vector_arrow_aliases() {
    let mut input = Input::new();

    press(&mut input, Key::UpArrow);
    press(&mut input, Key::RightArrow);

    let vector = input.movement_vector();
    assert!(vector.x > 0.0 && vector.y > 0.0);
    assert!((vector.length() - 1.0).abs() < 1e-5);
}
