// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2023 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the stlfix crate.

use crate::{
    mesh::tests::{facet, mesh_from, unit_cube, unit_tetrahedron},
    repair::RepairOptions,
};
use rand::{SeedableRng, rngs::SmallRng, seq::SliceRandom};
use vector_traits::glam::Vec3;

#[test]
fn repair_clean_tetrahedron() {
    let mut mesh = mesh_from(unit_tetrahedron());
    mesh.repair(&RepairOptions::default());
    assert_eq!(4, mesh.stats.number_of_facets);
    assert_eq!(4, mesh.stats.connected_facets_3_edge);
    assert_eq!(0, mesh.stats.facets_reversed);
    assert_eq!(0, mesh.stats.facets_added);
    assert_eq!(0, mesh.stats.facets_removed);
    assert_eq!(1, mesh.stats.number_of_parts);
    assert!((mesh.calculate_volume() - 1.0 / 6.0).abs() < 1e-5);
    let expected_area = 1.5 + 3.0f32.sqrt() / 2.0;
    assert!((mesh.calculate_surface_area() - expected_area).abs() < 1e-5);
}

#[test]
fn repair_clean_cube() {
    let mut mesh = mesh_from(unit_cube());
    mesh.repair(&RepairOptions::default());
    assert_eq!(12, mesh.stats.number_of_facets);
    assert_eq!(12, mesh.stats.connected_facets_3_edge);
    assert_eq!(1, mesh.stats.number_of_parts);
    assert_eq!(0, mesh.stats.facets_reversed);
    assert!((mesh.calculate_volume() - 1.0).abs() < 1e-5);
}

#[test]
fn one_reversed_facet_is_flipped_back() {
    let mut facets = unit_cube();
    // flip the winding of a facet away from the flood-fill seed; its
    // normal follows the bad winding, like a real broken exporter would
    facets[5].vertices.swap(0, 1);
    facets[5].normal = -facets[5].normal;
    let mut mesh = mesh_from(facets);
    mesh.repair(&RepairOptions::default());
    assert_eq!(1, mesh.stats.facets_reversed);
    assert_eq!(12, mesh.stats.connected_facets_3_edge);
    assert_eq!(1, mesh.stats.number_of_parts);
    assert!((mesh.calculate_volume() - 1.0).abs() < 1e-5);
    assert!(mesh.verify_neighbors());
    assert_eq!(0, mesh.stats.backwards_edges);
}

#[test]
fn triangular_hole_is_filled() {
    let mut facets = unit_cube();
    let _ = facets.remove(7);
    let mut mesh = mesh_from(facets);
    mesh.repair(&RepairOptions::default());
    // a single missing triangle leaves a three-edge boundary, one facet
    // closes it
    assert_eq!(1, mesh.stats.facets_added);
    assert_eq!(12, mesh.stats.number_of_facets);
    assert_eq!(12, mesh.stats.connected_facets_3_edge);
    assert!((mesh.calculate_volume() - 1.0).abs() < 1e-4);
}

#[test]
fn quad_hole_is_filled_with_two_facets() {
    let mut facets = unit_cube();
    // both triangles of the back face
    let _ = facets.remove(7);
    let _ = facets.remove(6);
    let mut mesh = mesh_from(facets);
    mesh.check_facets_exact();
    let boundary_slots: usize = mesh
        .neighbors()
        .iter()
        .map(|n| 3 - n.num_connected())
        .sum();
    assert_eq!(4, boundary_slots);
    mesh.repair(&RepairOptions::default());
    assert_eq!(2, mesh.stats.facets_added);
    assert_eq!(12, mesh.stats.number_of_facets);
    assert_eq!(12, mesh.stats.connected_facets_3_edge);
    assert!((mesh.calculate_volume() - 1.0).abs() < 1e-4);
}

#[test]
fn two_disjoint_cubes_are_two_parts() {
    let mut facets = unit_cube();
    for mut facet in unit_cube() {
        for vertex in &mut facet.vertices {
            vertex.x += 2.0;
        }
        facets.push(facet);
    }
    let mut mesh = mesh_from(facets);
    mesh.repair(&RepairOptions::default());
    assert_eq!(2, mesh.stats.number_of_parts);
    assert_eq!(24, mesh.stats.connected_facets_3_edge);
    assert!((mesh.calculate_volume() - 2.0).abs() < 1e-4);
}

#[test]
fn displaced_corner_is_snapped_back() {
    let mut facets = unit_cube();
    // facet 10 is (3,0,4); nudge its copy of the corner (0,0,0) so both
    // its edges through that corner stop matching exactly
    facets[10].vertices[1].x = 1e-4;
    let mut mesh = mesh_from(facets);
    let options = RepairOptions {
        tolerance: Some(1e-3),
        ..RepairOptions::default()
    };
    mesh.repair(&options);
    assert!(mesh.stats.edges_fixed >= 2);
    assert_eq!(12, mesh.stats.number_of_facets);
    assert_eq!(12, mesh.stats.connected_facets_3_edge);
    assert!((mesh.calculate_volume() - 1.0).abs() < 1e-3);
}

#[test]
fn vertices_at_exactly_tolerance_distance_snap() {
    // two triangles meant to share the edge (0,0,0)-(1,0,0), with one
    // endpoint displaced by exactly the tolerance (an exact binary float)
    let tolerance = 0.25f32;
    let facets = vec![
        facet((0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (0.5, -1.0, 0.0)),
        facet((1.0, tolerance, 0.0), (0.0, 0.0, 0.0), (0.5, 1.0, 0.0)),
    ];
    let mut mesh = mesh_from(facets);
    let snapped = mesh.check_facets_nearby(tolerance);
    assert_eq!(1, snapped);
    assert_eq!(2, mesh.stats.connected_facets_1_edge);
    assert_eq!(2, mesh.stats.edges_fixed);
}

#[test]
fn degenerate_facet_is_pruned() {
    let mut facets = unit_cube();
    facets.push(facet((0.0, 0.0, 0.0), (0.0, 0.0, 0.0), (1.0, 0.0, 0.0)));
    let mut mesh = mesh_from(facets);
    mesh.repair(&RepairOptions::default());
    assert_eq!(1, mesh.stats.degenerate_facets);
    assert_eq!(12, mesh.stats.number_of_facets);
    assert_eq!(12, mesh.stats.connected_facets_3_edge);
    assert!((mesh.calculate_volume() - 1.0).abs() < 1e-5);
}

#[test]
fn isolated_triangle_survives_exact_only() {
    let facets = vec![facet((0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (0.0, 1.0, 0.0))];
    let mut mesh = mesh_from(facets);
    let options = RepairOptions {
        fix_all: false,
        exact: true,
        ..RepairOptions::default()
    };
    mesh.repair(&options);
    assert_eq!(1, mesh.stats.number_of_facets);
    assert_eq!(0, mesh.stats.connected_facets_3_edge);
}

#[test]
fn isolated_triangle_is_removed_by_fix_all() {
    let facets = vec![facet((0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (0.0, 1.0, 0.0))];
    let mut mesh = mesh_from(facets);
    mesh.repair(&RepairOptions::default());
    assert_eq!(0, mesh.stats.number_of_facets);
    assert_eq!(1, mesh.stats.facets_removed);
}

#[test]
fn exact_matching_is_idempotent() {
    let mut facets = unit_cube();
    facets[5].vertices.swap(0, 1);
    let mut mesh = mesh_from(facets);
    mesh.check_facets_exact();
    let first = mesh.neighbors().to_vec();
    mesh.check_facets_exact();
    assert_eq!(first, mesh.neighbors());
}

#[test]
fn matched_slot_count_is_even() {
    for facets in [unit_tetrahedron(), unit_cube()] {
        let mut mesh = mesh_from(facets);
        mesh.check_facets_exact();
        let matched: usize = mesh.neighbors().iter().map(|n| n.num_connected()).sum();
        assert_eq!(0, matched % 2);
    }
}

#[test]
fn normal_value_fixing_is_idempotent() {
    let mut facets = unit_cube();
    // scramble some stored normals
    facets[2].normal = Vec3::new(7.0, -3.0, 0.5);
    facets[9].normal = Vec3::ZERO;
    let mut mesh = mesh_from(facets);
    mesh.fix_normal_values();
    let fixed = mesh.stats.normals_fixed;
    assert!(fixed >= 2);
    let snapshot = mesh.facets().to_vec();
    mesh.fix_normal_values();
    assert_eq!(snapshot, mesh.facets());
    assert_eq!(fixed, mesh.stats.normals_fixed);
}

#[test]
fn backwards_edges_resolve_after_orientation_fix() {
    let mut facets = unit_cube();
    facets[5].vertices.swap(0, 1);
    let mut mesh = mesh_from(facets);
    mesh.check_facets_exact();
    assert!(mesh.verify_neighbors());
    assert_eq!(3, mesh.stats.backwards_edges);
    mesh.fix_normal_directions();
    assert!(mesh.verify_neighbors());
    assert_eq!(0, mesh.stats.backwards_edges);
}

#[test]
fn inside_out_component_is_flipped_whole() {
    let mut facets = unit_cube();
    // a consistently wound but inward-facing cube
    for facet in &mut facets {
        facet.vertices.swap(0, 1);
        facet.normal = -facet.normal;
    }
    let mut mesh = mesh_from(facets);
    mesh.check_facets_exact();
    mesh.fix_normal_directions();
    assert_eq!(12, mesh.stats.facets_reversed);
    assert_eq!(1, mesh.stats.number_of_parts);
    assert!(mesh.calculate_volume() > 0.0);
}

#[test]
fn repair_does_not_depend_on_facet_order() {
    let mut rng = SmallRng::seed_from_u64(42);
    for _ in 0..8 {
        let mut facets = unit_cube();
        facets.shuffle(&mut rng);
        let mut mesh = mesh_from(facets);
        mesh.repair(&RepairOptions::default());
        assert_eq!(12, mesh.stats.connected_facets_3_edge);
        assert_eq!(1, mesh.stats.number_of_parts);
        assert_eq!(0, mesh.stats.facets_reversed);
        assert!((mesh.calculate_volume() - 1.0).abs() < 1e-5);
    }
}
