//! Whole-geometry operations: smooth normals, merging, de-indexing.
//!
//! These exercise several attributes of one geometry at once, which the
//! per-module unit tests do not.

use approx::assert_abs_diff_eq;
use three_core::prelude::*;

// ============================================================================
// Fixtures
// ============================================================================

/// Two triangles sharing the edge 0-2, folded 90 degrees along it.
///
/// Face (0, 1, 2) lies in the XY plane facing +Z; face (0, 2, 3) lies in
/// the YZ plane facing +X.
const FOLDED_POSITIONS: [f64; 12] = [
    0.0, 0.0, 0.0, //
    1.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, //
    0.0, 0.0, 1.0, //
];
const FOLDED_INDEX: [u32; 6] = [0, 1, 2, 0, 2, 3];

fn attribute(values: &[f64], item_size: usize) -> BufferAttribute {
    BufferAttribute::new(TypedArray::Float64(values.to_vec()), item_size, false).unwrap()
}

fn folded_quad() -> BufferGeometry {
    let mut g = BufferGeometry::new();
    g.add_attribute("position", attribute(&FOLDED_POSITIONS, 3)).unwrap();
    g.set_index_from_slice(&FOLDED_INDEX).unwrap();
    g
}

fn normal_at(g: &BufferGeometry, i: usize) -> [f64; 3] {
    g.attribute("normal").unwrap().get_vector3(i).to_array()
}

// ============================================================================
// Vertex normals
// ============================================================================

#[test]
fn shared_vertices_average_face_normals() {
    let mut g = folded_quad();
    g.compute_vertex_normals().unwrap();

    let h = std::f64::consts::FRAC_1_SQRT_2;
    // shared edge: normalized sum of +Z and +X
    assert_abs_diff_eq!(normal_at(&g, 0)[..], [h, 0.0, h][..], epsilon = 1e-6);
    assert_abs_diff_eq!(normal_at(&g, 2)[..], [h, 0.0, h][..], epsilon = 1e-6);
    // corners owned by one face keep that face's normal
    assert_eq!(normal_at(&g, 1), [0.0, 0.0, 1.0]);
    assert_eq!(normal_at(&g, 3), [1.0, 0.0, 0.0]);
}

#[test]
fn normals_are_unit_length() {
    let mut g = folded_quad();
    g.scale(3.0, 0.5, 2.0).unwrap();
    g.compute_vertex_normals().unwrap();

    let normal = g.attribute("normal").unwrap();
    for i in 0..normal.count() {
        assert_abs_diff_eq!(normal.get_vector3(i).length(), 1.0, epsilon = 1e-6);
    }
}

#[test]
fn recomputing_normals_bumps_version() {
    let mut g = folded_quad();
    g.compute_vertex_normals().unwrap();
    let first = g.attribute("normal").unwrap().version();
    g.compute_vertex_normals().unwrap();
    assert!(g.attribute("normal").unwrap().version() > first);
}

// ============================================================================
// Merge
// ============================================================================

#[test]
fn merge_copies_shared_attributes_at_offset() {
    let mut target = BufferGeometry::new();
    target.add_attribute("position", attribute(&[0.0; 12], 3)).unwrap();

    let mut source = BufferGeometry::new();
    source.add_attribute("position", attribute(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3)).unwrap();
    source.add_attribute("uv", attribute(&[0.5, 0.5, 0.5, 0.5], 2)).unwrap();

    target.merge(&source, 2).unwrap();

    let position = target.attribute("position").unwrap();
    assert_eq!(
        position.array().to_f64_vec(),
        vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]
    );
    assert_eq!(position.version(), 1);
    // names missing from the target are not added
    assert!(target.attribute("uv").is_none());
}

#[test]
fn merge_past_the_end_writes_nothing() {
    let mut target = BufferGeometry::new();
    target.add_attribute("normal", attribute(&[0.0; 12], 3)).unwrap();
    target.add_attribute("position", attribute(&[0.0; 6], 3)).unwrap();

    let mut source = BufferGeometry::new();
    source.add_attribute("normal", attribute(&[1.0; 3], 3)).unwrap();
    source.add_attribute("position", attribute(&[1.0; 3], 3)).unwrap();

    // "normal" fits at offset 2, "position" does not
    let err = target.merge(&source, 2).unwrap_err();
    assert_eq!(err, Error::OutOfRange { offset: 6, len: 3, capacity: 6 });

    for (_, attr) in target.attributes() {
        assert!(attr.array().iter().all(|v| v == 0.0));
        assert_eq!(attr.version(), 0);
    }
}

// ============================================================================
// De-indexing
// ============================================================================

#[test]
fn to_non_indexed_expands_every_attribute() {
    let mut g = folded_quad();
    g.name = "folded".into();
    let uv = BufferAttribute::new(vec![0.0f32, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0], 2, false).unwrap();
    g.add_attribute("uv", uv).unwrap();
    g.add_group(0, 3, 0).add_group(3, 3, 1);

    let flat = g.to_non_indexed().unwrap();
    assert!(flat.index().is_none());
    assert_eq!(flat.name, "folded");
    assert_eq!(flat.groups(), g.groups());
    assert_ne!(flat.id(), g.id());

    let position = flat.attribute("position").unwrap();
    assert_eq!(position.count(), 6);
    for (corner, &vertex) in FOLDED_INDEX.iter().enumerate() {
        let v = vertex as usize;
        assert_eq!(position.get_vector3(corner).to_array(), FOLDED_POSITIONS[v * 3..v * 3 + 3]);
    }

    let uv = flat.attribute("uv").unwrap();
    assert_eq!(uv.kind(), ArrayKind::Float32);
    assert_eq!((uv.get_x(5), uv.get_y(5)), (1.0, 1.0));
}

#[test]
fn to_non_indexed_on_flat_geometry_is_a_copy() {
    let mut g = BufferGeometry::new();
    g.add_attribute("position", attribute(&FOLDED_POSITIONS, 3)).unwrap();
    let copy = g.to_non_indexed().unwrap();
    assert_eq!(copy, g);
}

#[test]
fn to_non_indexed_rejects_dangling_index() {
    let mut g = folded_quad();
    g.set_index_from_slice(&[0, 1, 4]).unwrap();
    assert!(matches!(g.to_non_indexed(), Err(Error::OutOfRange { .. })));
}

#[test]
fn flat_normals_after_de_indexing() {
    let mut flat = folded_quad().to_non_indexed().unwrap();
    flat.compute_vertex_normals().unwrap();

    for corner in 0..3 {
        assert_eq!(normal_at(&flat, corner), [0.0, 0.0, 1.0]);
    }
    for corner in 3..6 {
        assert_eq!(normal_at(&flat, corner), [1.0, 0.0, 0.0]);
    }
}
