// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2023 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the stlfix crate.

//! Nearby matching: snaps vertices of unmatched edges onto each other when
//! they lie within a tolerance, so a following exact pass can pair the
//! edges. One call is one pass at one tolerance; the repair driver loops
//! with a growing tolerance.

use crate::{geo, mesh::Mesh};
use itertools::iproduct;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use vector_traits::glam::Vec3;

/// One endpoint of an unmatched edge, addressed by facet and local vertex.
#[derive(Debug, Clone, Copy)]
struct EndPoint {
    facet: u32,
    vertex: u8,
}

#[inline]
fn cell_of(v: Vec3, inv_tolerance: f32) -> (i32, i32, i32) {
    (
        (v.x * inv_tolerance).floor() as i32,
        (v.y * inv_tolerance).floor() as i32,
        (v.z * inv_tolerance).floor() as i32,
    )
}

impl Mesh {
    /// One snap-and-rematch pass. Endpoints are snapped in pass order: once
    /// a position has been written it is the canonical position for every
    /// later comparison. Returns the number of snapped vertices.
    pub fn check_facets_nearby(&mut self, tolerance: f32) -> usize {
        if tolerance <= 0.0 {
            return 0;
        }
        self.check_facets_exact();
        if self.stats.connected_facets_3_edge >= self.stats.number_of_facets {
            return 0;
        }
        let matched_before = self.matched_slot_count();

        // every (facet, vertex) that sits on at least one unmatched edge,
        // in facet order
        let mut seen = FxHashSet::default();
        let mut points = Vec::<EndPoint>::new();
        for f in 0..self.facets.len() {
            for e in 0..3 {
                if self.neighbors[f].neighbor[e] >= 0 {
                    continue;
                }
                for vertex in [e as u8, ((e + 1) % 3) as u8] {
                    if seen.insert((f as u32, vertex)) {
                        points.push(EndPoint {
                            facet: f as u32,
                            vertex,
                        });
                    }
                }
            }
        }

        let inv_tolerance = 1.0 / tolerance;
        let tolerance_squared = tolerance * tolerance;
        let mut cells: FxHashMap<(i32, i32, i32), SmallVec<[u32; 4]>> =
            FxHashMap::with_capacity_and_hasher(points.len(), Default::default());
        for (i, p) in points.iter().enumerate() {
            let pos = self.facets[p.facet as usize].vertices[p.vertex as usize];
            cells
                .entry(cell_of(pos, inv_tolerance))
                .or_default()
                .push(i as u32);
        }

        let mut snapped = vec![false; points.len()];
        let mut snaps = 0;
        for i in 0..points.len() {
            if snapped[i] {
                continue;
            }
            let p = points[i];
            let p_pos = self.facets[p.facet as usize].vertices[p.vertex as usize];
            let (cx, cy, cz) = cell_of(p_pos, inv_tolerance);
            for (dx, dy, dz) in iproduct!(-1..=1, -1..=1, -1..=1) {
                let Some(candidates) = cells.get(&(cx + dx, cy + dy, cz + dz)) else {
                    continue;
                };
                for &j in candidates {
                    let j = j as usize;
                    if j == i || snapped[j] {
                        continue;
                    }
                    let q = points[j];
                    if q.facet == p.facet {
                        continue;
                    }
                    let q_pos = self.facets[q.facet as usize].vertices[q.vertex as usize];
                    if geo::vertex_key(q_pos) == geo::vertex_key(p_pos) {
                        // already coincident, exact matching has said all
                        // there is to say about this pair
                        continue;
                    }
                    if geo::edge_length_squared(p_pos, q_pos) > tolerance_squared {
                        continue;
                    }
                    // never collapse a facet onto itself
                    let collides = (0..3).any(|k| {
                        k != q.vertex as usize
                            && geo::vertex_key(self.facets[q.facet as usize].vertices[k])
                                == geo::vertex_key(p_pos)
                    });
                    if collides {
                        continue;
                    }
                    self.facets[q.facet as usize].vertices[q.vertex as usize] = p_pos;
                    snapped[j] = true;
                    snaps += 1;
                }
            }
        }

        if snaps > 0 {
            self.invalidate_shared_vertices();
        }
        self.check_facets_exact();
        let matched_after = self.matched_slot_count();
        self.stats.edges_fixed += matched_after.saturating_sub(matched_before);
        snaps
    }

    fn matched_slot_count(&self) -> usize {
        self.neighbors.iter().map(|n| n.num_connected()).sum()
    }
}
