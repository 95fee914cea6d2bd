// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2023 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the stlfix crate.

//! Normal value fixing: every stored normal is rewritten with the unit
//! normal the right-hand rule yields for the current vertices.

use crate::{geo, mesh::Mesh};
use vector_traits::glam::Vec3;

/// A stored normal further than this from the computed one, in any
/// component, counts as fixed.
const NORMAL_TOLERANCE: f32 = 0.001;

impl Mesh {
    /// Recomputes all normals. Degenerate facets get the zero vector.
    /// Running this twice changes nothing the first run did not change.
    pub fn fix_normal_values(&mut self) {
        for facet in &mut self.facets {
            let computed = match geo::normalize(geo::facet_normal(&facet.vertices)) {
                Some(unit) => unit,
                None => {
                    eprintln!("Warning: facet has zero-length normal, storing a zero vector");
                    Vec3::ZERO
                }
            };
            let delta = (computed - facet.normal).abs();
            if delta.max_element() > NORMAL_TOLERANCE {
                self.stats.normals_fixed += 1;
            }
            facet.normal = computed;
        }
    }
}
