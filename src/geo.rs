// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2023 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the stlfix crate.

//! Small single-precision geometry kit. Everything here works on `f32`
//! because that is all the precision an STL file carries.

#[cfg(test)]
mod tests;

use vector_traits::glam::Vec3;

/// Vectors shorter than this cannot be normalized in a meaningful way.
pub const MIN_NORMAL_LENGTH: f32 = 1e-8;

/// The bit patterns of a vertex, with `-0.0` collapsed onto `+0.0` so both
/// hash and compare alike.
#[inline]
pub(crate) fn vertex_key(v: Vec3) -> [u32; 3] {
    // adding 0.0 turns -0.0 into +0.0 and leaves every other value alone
    [
        (v.x + 0.0).to_bits(),
        (v.y + 0.0).to_bits(),
        (v.z + 0.0).to_bits(),
    ]
}

/// Right-hand-rule normal of the triangle `(v0,v1,v2)`, unnormalized.
#[inline]
pub fn facet_normal(vertices: &[Vec3; 3]) -> Vec3 {
    (vertices[1] - vertices[0]).cross(vertices[2] - vertices[0])
}

/// `Some(unit vector)` or `None` when the input is too short to carry a
/// direction.
#[inline]
pub fn normalize(v: Vec3) -> Option<Vec3> {
    let length = v.length();
    if length < MIN_NORMAL_LENGTH {
        None
    } else {
        Some(v / length)
    }
}

#[inline]
pub fn edge_length_squared(a: Vec3, b: Vec3) -> f32 {
    (b - a).length_squared()
}

/// Signed volume of the tetrahedron spanned by the triangle and the origin.
/// Summed over a closed mesh this yields the enclosed volume, positive for
/// outward-facing windings.
#[inline]
pub fn signed_tetra_volume(v0: Vec3, v1: Vec3, v2: Vec3) -> f32 {
    v0.dot(v1.cross(v2)) / 6.0
}

#[inline]
pub fn triangle_area(v0: Vec3, v1: Vec3, v2: Vec3) -> f32 {
    (v1 - v0).cross(v2 - v0).length() / 2.0
}
