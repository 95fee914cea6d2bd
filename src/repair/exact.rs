// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2023 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the stlfix crate.

//! Exact edge matching: rebuilds the whole neighbor table by pairing edges
//! whose endpoint coordinates agree bit for bit.

use super::edge_hash::edge_fingerprint;
use crate::mesh::Mesh;

impl Mesh {
    /// Rebuilds facet-to-facet connectivity from the current coordinates.
    /// Facets with a degenerate edge contribute no edges at all and are
    /// left for the pruner. Safe to run any number of times; the result
    /// only depends on the current coordinates.
    pub fn check_facets_exact(&mut self) {
        self.reset_neighbors();
        let mut hash = std::mem::take(&mut self.edge_hash);
        hash.prepare(self.facets.len());

        for f in 0..self.facets.len() {
            let fingerprints = [
                edge_fingerprint(&self.facets[f], 0),
                edge_fingerprint(&self.facets[f], 1),
                edge_fingerprint(&self.facets[f], 2),
            ];
            if fingerprints.iter().any(|fp| fp.is_none()) {
                // degenerate facet, matching any of its edges would pair
                // the facet with itself
                continue;
            }
            for fp in fingerprints.into_iter().flatten() {
                let (key, which_edge) = fp;
                if let Some((g, g_edge)) = hash.insert_or_take(key, f as u32, which_edge) {
                    self.record_neighbors(f, which_edge, g as usize, g_edge);
                }
            }
        }

        self.stats.collisions = hash.collisions;
        self.edge_hash = hash;
        self.connection_tallies();
    }

    /// Writes both sides of a discovered edge pairing. Equal swap flags on
    /// the two `which_edge` tags mean both facets walk the edge in the same
    /// direction, which the orientation fixer later resolves.
    fn record_neighbors(&mut self, f: usize, f_edge_raw: u8, g: usize, g_edge_raw: u8) {
        let fe = (f_edge_raw % 3) as usize;
        let ge = (g_edge_raw % 3) as usize;
        self.neighbors[f].neighbor[fe] = g as i32;
        self.neighbors[g].neighbor[ge] = f as i32;
        let same_direction = (f_edge_raw < 3) == (g_edge_raw < 3);
        if same_direction {
            self.neighbors[f].which_vertex_not[fe] = -2;
            self.neighbors[g].which_vertex_not[ge] = -2;
        } else {
            self.neighbors[f].which_vertex_not[fe] = ((ge + 2) % 3) as i8;
            self.neighbors[g].which_vertex_not[ge] = ((fe + 2) % 3) as i8;
        }
    }
}
