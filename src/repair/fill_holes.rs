// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2023 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the stlfix crate.

//! Hole filling: walks the directed graph of boundary edges into cycles and
//! closes each cycle with a triangle fan. The fan is wound opposite to the
//! boundary so the new facets agree with the facets around the hole.
//!
//! No claim is made that the added geometry is what the missing surface
//! looked like; a non-planar loop still gets its fan.

use crate::{
    geo,
    mesh::{Facet, Mesh},
};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use vector_traits::glam::Vec3;

#[derive(Debug, Clone, Copy)]
struct BoundaryEdge {
    from_key: [u32; 3],
    to_key: [u32; 3],
    from: Vec3,
}

impl Mesh {
    /// Adds facets until no boundary cycle remains, then rebuilds
    /// connectivity. Boundary chains that never close (non-manifold rims)
    /// are left alone.
    pub fn fill_holes(&mut self) {
        let boundary: Vec<BoundaryEdge> = (0..self.facets.len())
            .flat_map(|f| (0..3).map(move |e| (f, e)))
            .filter(|&(f, e)| self.neighbors[f].neighbor[e] < 0)
            .filter_map(|(f, e)| {
                let facet = &self.facets[f];
                if facet.is_degenerate() {
                    return None;
                }
                let from = facet.vertices[e];
                Some(BoundaryEdge {
                    from_key: geo::vertex_key(from),
                    to_key: geo::vertex_key(facet.vertices[(e + 1) % 3]),
                    from,
                })
            })
            .collect();
        if boundary.is_empty() {
            return;
        }

        let mut outgoing: FxHashMap<[u32; 3], SmallVec<[u32; 2]>> =
            FxHashMap::with_capacity_and_hasher(boundary.len(), Default::default());
        for (i, edge) in boundary.iter().enumerate() {
            outgoing.entry(edge.from_key).or_default().push(i as u32);
        }

        let mut used = vec![false; boundary.len()];
        let mut added = Vec::<Facet>::new();
        for start in 0..boundary.len() {
            if used[start] {
                continue;
            }
            if let Some(cycle) = walk_cycle(&boundary, &outgoing, &mut used, start) {
                fan_fill(&cycle, &mut added);
            }
        }
        if added.is_empty() {
            return;
        }

        self.stats.facets_added += added.len();
        for facet in added {
            self.add_facet(facet);
        }
        self.check_facets_exact();
    }
}

/// Follows boundary edges from `start` until the walk returns to its first
/// vertex. Returns the cycle's vertices in boundary direction, or `None`
/// for a dead end. Edges of an abandoned walk stay available for later
/// starts.
fn walk_cycle(
    boundary: &[BoundaryEdge],
    outgoing: &FxHashMap<[u32; 3], SmallVec<[u32; 2]>>,
    used: &mut [bool],
    start: usize,
) -> Option<Vec<Vec3>> {
    let mut cycle = vec![boundary[start].from];
    let mut taken = vec![start];
    let mut cursor = boundary[start].to_key;
    used[start] = true;

    while cursor != boundary[start].from_key {
        let next = outgoing
            .get(&cursor)
            .and_then(|candidates| candidates.iter().find(|&&c| !used[c as usize]));
        let Some(&next) = next else {
            // dead end, give the edges back
            for &i in &taken {
                used[i] = false;
            }
            // the starting edge itself leads nowhere, never try it again
            used[start] = true;
            return None;
        };
        let next = next as usize;
        used[next] = true;
        taken.push(next);
        cycle.push(boundary[next].from);
        cursor = boundary[next].to_key;
    }
    if cycle.len() < 3 {
        return None;
    }
    Some(cycle)
}

/// Fans a boundary cycle `a0..aL` from its first vertex: the triangles
/// `(a0, a[i+1], a[i])` traverse every boundary edge opposite to the facet
/// on the other side, and every interior diagonal twice in opposite
/// directions.
fn fan_fill(cycle: &[Vec3], added: &mut Vec<Facet>) {
    for i in 1..cycle.len() - 1 {
        let vertices = [cycle[0], cycle[i + 1], cycle[i]];
        let normal = geo::normalize(geo::facet_normal(&vertices)).unwrap_or(Vec3::ZERO);
        added.push(Facet::new(normal, vertices));
    }
}
