// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2023 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the stlfix crate.

use crate::geo::{
    edge_length_squared, facet_normal, normalize, signed_tetra_volume, triangle_area, vertex_key,
};
use vector_traits::glam::Vec3;

#[test]
fn right_hand_rule_normal() {
    let vertices = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    ];
    assert_eq!(Vec3::new(0.0, 0.0, 1.0), facet_normal(&vertices));
}

#[test]
fn normalize_rejects_near_zero() {
    assert_eq!(None, normalize(Vec3::ZERO));
    assert_eq!(None, normalize(Vec3::splat(1e-9)));
    assert_eq!(Some(Vec3::new(1.0, 0.0, 0.0)), normalize(Vec3::new(3.0, 0.0, 0.0)));
}

#[test]
fn tetra_volume_of_unit_corner() {
    let volume = signed_tetra_volume(
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
    );
    assert!((volume - 1.0 / 6.0).abs() < 1e-7);
}

#[test]
fn area_of_right_triangle() {
    let area = triangle_area(
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    );
    assert!((area - 0.5).abs() < 1e-7);
}

#[test]
fn edge_length_is_squared() {
    let len2 = edge_length_squared(Vec3::ZERO, Vec3::new(3.0, 4.0, 0.0));
    assert_eq!(25.0, len2);
}

#[test]
fn negative_zero_keys_like_zero() {
    let a = Vec3::new(0.0, 1.0, 2.0);
    let b = Vec3::new(-0.0, 1.0, 2.0);
    assert_eq!(vertex_key(a), vertex_key(b));
    // distinct values stay distinct
    assert_ne!(vertex_key(a), vertex_key(Vec3::new(0.0, 1.0, 2.5)));
}
