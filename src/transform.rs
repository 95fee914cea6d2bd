// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2023 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the stlfix crate.

//! Affine transforms on the whole mesh. None of them touch the stored
//! normals; a repair run with normal-value fixing brings those back in
//! line.

#[cfg(test)]
mod tests;

use crate::mesh::Mesh;
use vector_traits::glam::Vec3;

impl Mesh {
    fn for_each_vertex(&mut self, mut op: impl FnMut(Vec3) -> Vec3) {
        for facet in &mut self.facets {
            for vertex in &mut facet.vertices {
                *vertex = op(*vertex);
            }
        }
        self.invalidate_shared_vertices();
        self.update_bounds();
    }

    /// Moves the mesh so its bounding-box minimum lands on `(x,y,z)`.
    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        let offset = Vec3::new(x, y, z) - self.stats.min;
        self.for_each_vertex(|v| v + offset);
    }

    pub fn translate_relative(&mut self, x: f32, y: f32, z: f32) {
        let offset = Vec3::new(x, y, z);
        self.for_each_vertex(|v| v + offset);
    }

    pub fn scale(&mut self, factor: f32) {
        self.scale_versor([factor, factor, factor]);
    }

    /// Per-axis scaling. A non-uniform versor skews the stored normals;
    /// they stay untouched here like in every other transform.
    pub fn scale_versor(&mut self, versor: [f32; 3]) {
        let factors = Vec3::from_array(versor);
        self.for_each_vertex(|v| v * factors);
    }

    /// Rotates CCW about the x axis by `angle` degrees.
    pub fn rotate_x(&mut self, angle: f32) {
        let (sin, cos) = angle.to_radians().sin_cos();
        self.for_each_vertex(|v| {
            Vec3::new(v.x, v.y * cos - v.z * sin, v.y * sin + v.z * cos)
        });
    }

    /// Rotates CCW about the y axis by `angle` degrees.
    pub fn rotate_y(&mut self, angle: f32) {
        let (sin, cos) = angle.to_radians().sin_cos();
        self.for_each_vertex(|v| {
            Vec3::new(v.z * sin + v.x * cos, v.y, v.z * cos - v.x * sin)
        });
    }

    /// Rotates CCW about the z axis by `angle` degrees.
    pub fn rotate_z(&mut self, angle: f32) {
        let (sin, cos) = angle.to_radians().sin_cos();
        self.for_each_vertex(|v| {
            Vec3::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos, v.z)
        });
    }

    /// Mirrors about the xy plane. The winding of every facet is reversed
    /// afterwards so the mesh stays outward-facing.
    pub fn mirror_xy(&mut self) {
        self.for_each_vertex(|v| Vec3::new(v.x, v.y, -v.z));
        self.reverse_all_facets();
    }

    /// Mirrors about the yz plane.
    pub fn mirror_yz(&mut self) {
        self.for_each_vertex(|v| Vec3::new(-v.x, v.y, v.z));
        self.reverse_all_facets();
    }

    /// Mirrors about the xz plane.
    pub fn mirror_xz(&mut self) {
        self.for_each_vertex(|v| Vec3::new(v.x, -v.y, v.z));
        self.reverse_all_facets();
    }
}
