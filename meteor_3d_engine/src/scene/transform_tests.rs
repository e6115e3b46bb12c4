use super::*;

use glam::Vec4;

const EPSILON: f32 = 1e-5;

#[test]
fn test_identity_matrix() {
    assert_eq!(Transform::IDENTITY.matrix(), Mat4::IDENTITY);
}

#[test]
fn test_matrix_composition_order_is_t_rx_ry_rz_s() {
    let transform = Transform {
        position: Vec3::new(1.0, 2.0, 3.0),
        rotation: Vec3::new(10.0, 20.0, 30.0),
        scale: Vec3::new(2.0, 3.0, 4.0),
    };

    let expected = Mat4::from_translation(transform.position)
        * Mat4::from_rotation_x(10.0_f32.to_radians())
        * Mat4::from_rotation_y(20.0_f32.to_radians())
        * Mat4::from_rotation_z(30.0_f32.to_radians())
        * Mat4::from_scale(transform.scale);

    let difference = transform.matrix() - expected;
    for column in 0..4 {
        assert!(difference.col(column).length() < EPSILON);
    }
}

#[test]
fn test_rotation_is_degrees() {
    let transform = Transform {
        position: Vec3::ZERO,
        rotation: Vec3::new(0.0, 90.0, 0.0),
        scale: Vec3::ONE,
    };

    // +x rotates to -z under a 90 degree yaw
    let rotated = transform.matrix() * Vec4::new(1.0, 0.0, 0.0, 1.0);
    assert!((rotated.x - 0.0).abs() < EPSILON);
    assert!((rotated.z - -1.0).abs() < EPSILON);
}

#[test]
fn test_store_insert_get_remove() {
    let mut store = TransformStore::new();
    assert!(store.is_empty());

    let key = store.insert(Transform::from_position(Vec3::new(1.0, 0.0, 0.0)));
    assert_eq!(store.len(), 1);
    assert!(store.contains(key));
    assert_eq!(store.get(key).unwrap().position, Vec3::new(1.0, 0.0, 0.0));

    store.get_mut(key).unwrap().position.y = 5.0;
    assert_eq!(store.get(key).unwrap().position.y, 5.0);

    let removed = store.remove(key).unwrap();
    assert_eq!(removed.position.y, 5.0);
    assert!(!store.contains(key));
    assert!(store.get(key).is_none());
}

#[test]
fn test_store_keys_survive_growth() {
    let mut store = TransformStore::new();
    let first = store.insert(Transform::from_position(Vec3::X));

    // Grow the store well past any initial capacity
    for i in 0..1000 {
        store.insert(Transform::from_position(Vec3::new(i as f32, 0.0, 0.0)));
    }

    assert_eq!(store.get(first).unwrap().position, Vec3::X);
}

#[test]
fn test_removed_key_stays_dead_after_reuse() {
    let mut store = TransformStore::new();
    let dead = store.insert(Transform::IDENTITY);
    store.remove(dead);

    // The slot may be recycled, but the old key must not resolve
    let _replacement = store.insert(Transform::from_position(Vec3::Y));
    assert!(store.get(dead).is_none());
}
