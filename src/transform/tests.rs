// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2023 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the stlfix crate.

use crate::mesh::tests::{mesh_from, unit_cube};
use vector_traits::glam::Vec3;

#[test]
fn translate_moves_the_minimum() {
    let mut mesh = mesh_from(unit_cube());
    mesh.translate(5.0, -2.0, 0.5);
    assert_eq!(Vec3::new(5.0, -2.0, 0.5), mesh.stats.min);
    assert_eq!(Vec3::new(6.0, -1.0, 1.5), mesh.stats.max);
}

#[test]
fn translate_relative_shifts_both_bounds() {
    let mut mesh = mesh_from(unit_cube());
    mesh.translate_relative(0.0, 0.0, 10.0);
    assert_eq!(Vec3::new(0.0, 0.0, 10.0), mesh.stats.min);
    assert_eq!(Vec3::new(1.0, 1.0, 11.0), mesh.stats.max);
}

#[test]
fn uniform_scale_scales_the_volume_cubically() {
    let mut mesh = mesh_from(unit_cube());
    mesh.scale(2.0);
    assert!((mesh.calculate_volume() - 8.0).abs() < 1e-4);
    assert_eq!(Vec3::splat(2.0), mesh.stats.size);
}

#[test]
fn versor_scale_is_per_axis() {
    let mut mesh = mesh_from(unit_cube());
    mesh.scale_versor([1.0, 2.0, 3.0]);
    assert_eq!(Vec3::new(1.0, 2.0, 3.0), mesh.stats.size);
}

#[test]
fn rotate_z_by_a_quarter_turn() {
    let mut mesh = mesh_from(unit_cube());
    mesh.rotate_z(90.0);
    // (1,0,0) lands on (0,1,0): x now spans [-1, 0]
    assert!((mesh.stats.min.x + 1.0).abs() < 1e-5);
    assert!(mesh.stats.max.x.abs() < 1e-5);
    assert!((mesh.stats.max.y - 1.0).abs() < 1e-5);
}

#[test]
fn full_turn_is_close_to_identity() {
    let mut mesh = mesh_from(unit_cube());
    let before = mesh.facets().to_vec();
    mesh.rotate_x(360.0);
    for (a, b) in before.iter().zip(mesh.facets()) {
        for k in 0..3 {
            assert!((a.vertices[k] - b.vertices[k]).abs().max_element() < 1e-5);
        }
    }
}

#[test]
fn mirroring_keeps_the_mesh_outward() {
    let mut mesh = mesh_from(unit_cube());
    mesh.mirror_xy();
    // vertices moved to z in [-1,0], winding reversed along with them
    assert_eq!(-1.0, mesh.stats.min.z);
    assert!((mesh.calculate_volume() - 1.0).abs() < 1e-5);
}

#[test]
fn mirror_twice_restores_the_volume_and_bounds() {
    let mut mesh = mesh_from(unit_cube());
    mesh.mirror_yz();
    mesh.mirror_yz();
    assert_eq!(Vec3::ZERO, mesh.stats.min);
    assert!((mesh.calculate_volume() - 1.0).abs() < 1e-5);
}

#[test]
fn transforms_leave_a_repairable_mesh() {
    let mut mesh = mesh_from(unit_cube());
    mesh.rotate_z(30.0);
    mesh.rotate_x(45.0);
    mesh.scale(3.0);
    mesh.translate(10.0, 10.0, 10.0);
    mesh.repair(&crate::repair::RepairOptions::default());
    assert_eq!(12, mesh.stats.connected_facets_3_edge);
    assert_eq!(1, mesh.stats.number_of_parts);
    assert!((mesh.calculate_volume() - 27.0).abs() < 1e-2);
}
