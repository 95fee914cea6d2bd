// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2023 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the stlfix crate.

//! Orientation fixing: a worklist flood fill over the neighbor graph flips
//! every facet that disagrees with its component's seed, counting shells
//! along the way. A component that ends up inside out (negative net signed
//! volume) is flipped as a whole.

use crate::{geo, mesh::Mesh};
use vob::Vob;

fn filled_vob(size: usize) -> Vob<u32> {
    let mut v = Vob::<u32>::new_with_storage_type(0);
    v.resize(size, false);
    v
}

impl Mesh {
    /// Makes the winding of every facet agree with its component's seed
    /// facet, then flips components whose signed volume is negative.
    /// Iterative on a worklist, no recursion.
    pub fn fix_normal_directions(&mut self) {
        let facet_count = self.facets.len();
        if facet_count == 0 {
            self.stats.number_of_parts = 0;
            return;
        }

        let mut visited = filled_vob(facet_count);
        // which shell each facet belongs to
        let mut component = vec![0u32; facet_count];
        let mut worklist = Vec::<usize>::new();
        let mut parts = 0u32;
        let mut seed = 0;

        loop {
            while seed < facet_count && visited.get(seed).unwrap_or(false) {
                seed += 1;
            }
            if seed >= facet_count {
                break;
            }
            // the seed's stored winding is the reference for its shell
            let _ = visited.set(seed, true);
            component[seed] = parts;
            worklist.push(seed);
            while let Some(f) = worklist.pop() {
                for e in 0..3 {
                    let g = self.neighbors[f].neighbor[e];
                    if g < 0 {
                        continue;
                    }
                    let g = g as usize;
                    if visited.get(g).unwrap_or(false) {
                        // a disagreement between two already-visited facets
                        // means the surface is not orientable; verify
                        // reports it as a backwards edge
                        continue;
                    }
                    if self.neighbors[f].which_vertex_not[e] == -2 {
                        self.reverse_facet(g);
                        self.stats.facets_reversed += 1;
                    }
                    let _ = visited.set(g, true);
                    component[g] = parts;
                    worklist.push(g);
                }
            }
            parts += 1;
        }
        self.stats.number_of_parts = parts as usize;

        // inside-out shells: net signed volume per component decides
        let mut volumes = vec![0.0f32; parts as usize];
        for (f, facet) in self.facets.iter().enumerate() {
            volumes[component[f] as usize] +=
                geo::signed_tetra_volume(facet.vertices[0], facet.vertices[1], facet.vertices[2]);
        }
        for f in 0..facet_count {
            if volumes[component[f] as usize] < 0.0 {
                self.reverse_facet(f);
                self.stats.facets_reversed += 1;
            }
        }
    }

    /// Flips every facet, normals included. Used by the mirror transforms
    /// and the `--reverse-all` option; does not count as repair work.
    pub fn reverse_all_facets(&mut self) {
        for f in 0..self.facets.len() {
            self.reverse_facet(f);
        }
    }
}
