use super::*;

use crate::resource::MaterialSet;

fn no_materials() -> MaterialSet {
    MaterialSet::parse("").unwrap()
}

fn white_material() -> MaterialSet {
    MaterialSet::parse("newmtl white\nKd 1 1 1\n").unwrap()
}

// ============================================================================
// Face emission tests
// ============================================================================

#[test]
fn test_mixed_triangle_and_quad_faces() {
    // One triangle plus one quad; the quad triangulates to (1,2,3)(1,3,4).
    let source = "\
newmdl mixed
v 0 0 0
v 1 0 0
v 1 1 0
v 0 0 1
v 1 0 1
v 1 1 1
v 0 1 1
vt 0 0
vt 1 0
vt 1 1
vn 0 0 1
vn 0 0 1
vn 0 0 1
o mesh
f 1/1/1 2/2/2 3/3/3
f 4// 5// 6// 7//
";

    let set = ModelSet::parse(source, &no_materials(), &Transform::IDENTITY).unwrap();
    let model = set.get("mixed").unwrap();

    assert_eq!(model.meshes.len(), 1);
    assert_eq!(model.meshes[0].indices, vec![0, 1, 2, 3, 4, 5, 3, 5, 6]);
}

#[test]
fn test_index_count_matches_face_operands() {
    // sum(len(indices)) == sum over faces of 3 * (operand_count - 2)
    let source = "\
newmdl counted
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
o quads
f 1 2 3 4
f 1 2 3
o tris
f 2 3 4
";

    let set = ModelSet::parse(source, &no_materials(), &Transform::IDENTITY).unwrap();
    let model = set.get("counted").unwrap();

    let total: usize = model.meshes.iter().map(|mesh| mesh.indices.len()).sum();
    assert_eq!(total, 3 * 2 + 3 + 3);
    assert_eq!(model.meshes[0].indices.len(), 9);
    assert_eq!(model.meshes[1].indices.len(), 3);
}

#[test]
fn test_negative_indices_resolve_from_the_end() {
    // resolve(-k, n) = n - k against the pool count at the face line
    let source = "\
newmdl negative
v 0 0 0
v 1 0 0
v 2 0 0
o mesh
f -3 -2 -1
";

    let set = ModelSet::parse(source, &no_materials(), &Transform::IDENTITY).unwrap();
    let model = set.get("negative").unwrap();

    assert_eq!(model.meshes[0].indices, vec![0, 1, 2]);
}

#[test]
fn test_face_writes_uv_and_normal_into_the_pooled_vertex() {
    let source = "\
newmdl written
v 0 0 0
v 1 0 0
v 0 1 0
vt 0.25 0.75
vn 0 1 0
o mesh
f 1/1/1 2/1/1 3/1/1
";

    let set = ModelSet::parse(source, &no_materials(), &Transform::IDENTITY).unwrap();
    let model = set.get("written").unwrap();

    for vertex in &model.vertices {
        assert_eq!(vertex.uv, [0.25, 0.75]);
        assert_eq!(vertex.normal, [0.0, 1.0, 0.0]);
    }
}

#[test]
fn test_shared_position_with_different_uvs_keeps_the_last_one() {
    // Two faces name the same position with different uvs: the write-back
    // into the shared pool keeps only the later uv.
    let source = "\
newmdl shared
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 1
o mesh
f 1/1 2/1 3/1
f 1/2 2/2 3/2
";

    let set = ModelSet::parse(source, &no_materials(), &Transform::IDENTITY).unwrap();
    let model = set.get("shared").unwrap();

    assert_eq!(model.vertices[0].uv, [1.0, 1.0]);
}

// ============================================================================
// Offset baking tests
// ============================================================================

#[test]
fn test_offset_is_baked_into_positions() {
    let offset = Transform {
        position: glam::Vec3::new(1.0, 2.0, 3.0),
        rotation: glam::Vec3::new(0.0, 90.0, 0.0),
        scale: glam::Vec3::new(2.0, 2.0, 2.0),
    };

    let source = "newmdl baked\nv 1 0 0\nv 0 1 0\no mesh\nf 1 2 1\n";
    let set = ModelSet::parse(source, &no_materials(), &offset).unwrap();
    let model = set.get("baked").unwrap();

    let expected_first = offset.matrix().transform_point3(glam::Vec3::new(1.0, 0.0, 0.0));
    let expected_second = offset.matrix().transform_point3(glam::Vec3::new(0.0, 1.0, 0.0));

    let first = glam::Vec3::from_array(model.vertices[0].position);
    let second = glam::Vec3::from_array(model.vertices[1].position);

    assert!((first - expected_first).length() < 1e-5);
    assert!((second - expected_second).length() < 1e-5);
}

#[test]
fn test_offset_translation_does_not_move_normals() {
    let offset = Transform {
        position: glam::Vec3::new(10.0, 0.0, 0.0),
        rotation: glam::Vec3::ZERO,
        scale: glam::Vec3::ONE,
    };

    let source = "newmdl n\nv 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\no mesh\nf 1//1 2//1 3//1\n";
    let set = ModelSet::parse(source, &no_materials(), &offset).unwrap();
    let model = set.get("n").unwrap();

    assert_eq!(model.vertices[0].normal, [0.0, 0.0, 1.0]);
    // Positions did move
    assert_eq!(model.vertices[0].position, [10.0, 0.0, 0.0]);
}

// ============================================================================
// Material selection tests
// ============================================================================

#[test]
fn test_usemtl_selects_the_mesh_material() {
    let source = "\
newmdl gun
v 0 0 0
v 1 0 0
v 0 1 0
usemtl white
o mesh
f 1 2 3
";

    let set = ModelSet::parse(source, &white_material(), &Transform::IDENTITY).unwrap();
    let model = set.get("gun").unwrap();

    let material = model.meshes[0].material.as_ref().unwrap();
    assert_eq!(material.name, "white");
}

#[test]
fn test_unknown_material_is_rejected() {
    let source = "newmdl m\nv 0 0 0\nusemtl chrome\no mesh\nf 1 1 1\n";
    let result = ModelSet::parse(source, &white_material(), &Transform::IDENTITY);

    assert_eq!(
        result.err(),
        Some(crate::error::Error::UnknownMaterial("chrome".to_string()))
    );
}

// ============================================================================
// Structure error tests
// ============================================================================

#[test]
fn test_data_before_newmdl_is_rejected() {
    let result = ModelSet::parse("v 0 0 0\n", &no_materials(), &Transform::IDENTITY);
    assert!(matches!(
        result,
        Err(crate::error::Error::ParseUnexpectedToken { line: 1, .. })
    ));
}

#[test]
fn test_face_before_mesh_is_rejected() {
    let source = "newmdl m\nv 0 0 0\nf 1 1 1\n";
    let result = ModelSet::parse(source, &no_materials(), &Transform::IDENTITY);
    assert!(matches!(
        result,
        Err(crate::error::Error::ParseUnexpectedToken { line: 3, .. })
    ));
}

#[test]
fn test_five_operand_face_is_rejected() {
    let source = "newmdl m\nv 0 0 0\no mesh\nf 1 1 1 1 1\n";
    let result = ModelSet::parse(source, &no_materials(), &Transform::IDENTITY);
    assert!(matches!(
        result,
        Err(crate::error::Error::ParseUnexpectedToken { .. })
    ));
}

// ============================================================================
// Multi-model tests
// ============================================================================

#[test]
fn test_multiple_models_in_one_stream() {
    let source = "\
newmdl first
v 0 0 0
v 1 0 0
v 0 1 0
o a
f 1 2 3
newmdl second
v 0 0 1
v 1 0 1
v 0 1 1
o b
f 1 2 3
";

    let set = ModelSet::parse(source, &no_materials(), &Transform::IDENTITY).unwrap();
    assert_eq!(set.len(), 2);

    // Each model indexes its own pool, restarting at zero.
    assert_eq!(set.get("first").unwrap().meshes[0].indices, vec![0, 1, 2]);
    assert_eq!(set.get("second").unwrap().meshes[0].indices, vec![0, 1, 2]);
    assert_eq!(set.get("second").unwrap().vertices[0].position, [0.0, 0.0, 1.0]);
}

#[test]
fn test_unknown_model_lookup_is_rejected() {
    let set = ModelSet::parse("newmdl only\nv 0 0 0\n", &no_materials(), &Transform::IDENTITY)
        .unwrap();
    assert_eq!(
        set.get("other").err(),
        Some(crate::error::Error::UnknownModel("other".to_string()))
    );
}

#[test]
fn test_vertex_layout_is_32_bytes() {
    assert_eq!(std::mem::size_of::<MeshVertex>(), 32);
    assert_eq!(MeshVertex::LAYOUT.stride, 32);
    assert_eq!(MeshVertex::LAYOUT.attributes.len(), 3);
    assert_eq!(MeshVertex::LAYOUT.attributes[1].offset, 12);
    assert_eq!(MeshVertex::LAYOUT.attributes[2].offset, 24);
}
