// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2023 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the stlfix crate.

//! The repair pipeline: exact matching, nearby matching, pruning, hole
//! filling, orientation and normal fixing, plus the driver that runs them
//! in the canonical order.

pub(crate) mod edge_hash;
mod exact;
mod fill_holes;
mod nearby;
mod normals;
mod orient;
mod prune;
#[cfg(test)]
mod tests;

use crate::mesh::Mesh;

/// Which repair steps to run and with what parameters. The default is the
/// fix-everything configuration the command line uses when no individual
/// step is selected.
#[derive(Debug, Clone)]
pub struct RepairOptions {
    /// Run every step. Selecting an individual step below is expected to
    /// come with `fix_all` turned off.
    pub fix_all: bool,
    pub exact: bool,
    /// Starting tolerance for nearby matching; half the shortest edge of
    /// the mesh when not set. Snapping at the full shortest edge would
    /// treat legitimate mesh edges as cracks.
    pub tolerance: Option<f32>,
    /// Tolerance growth per nearby iteration; bounding diameter / 10000
    /// when not set.
    pub increment: Option<f32>,
    pub nearby: bool,
    pub iterations: usize,
    pub remove_unconnected: bool,
    pub fill_holes: bool,
    pub normal_directions: bool,
    pub normal_values: bool,
    pub reverse_all: bool,
    pub verbose: bool,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            fix_all: true,
            exact: false,
            tolerance: None,
            increment: None,
            nearby: false,
            iterations: 2,
            remove_unconnected: false,
            fill_holes: false,
            normal_directions: false,
            normal_values: false,
            reverse_all: false,
            verbose: false,
        }
    }
}

impl Mesh {
    /// Runs the selected repair steps in pipeline order: exact matching,
    /// nearby matching at a growing tolerance, pruning, hole filling,
    /// orientation fixing, normal rewriting, and finally the optional
    /// reverse-all.
    pub fn repair(&mut self, options: &RepairOptions) {
        let connectivity_needed = options.fix_all
            || options.exact
            || options.nearby
            || options.remove_unconnected
            || options.fill_holes
            || options.normal_directions;

        if connectivity_needed {
            if options.verbose {
                println!("Checking exact...");
            }
            self.check_facets_exact();
            self.stats.facets_w_1_bad_edge =
                self.stats.connected_facets_2_edge - self.stats.connected_facets_3_edge;
            self.stats.facets_w_2_bad_edge =
                self.stats.connected_facets_1_edge - self.stats.connected_facets_2_edge;
            self.stats.facets_w_3_bad_edge =
                self.stats.number_of_facets - self.stats.connected_facets_1_edge;
        }

        if options.nearby || options.fix_all {
            let mut tolerance = options
                .tolerance
                .unwrap_or(self.stats.shortest_edge / 2.0);
            let increment = options
                .increment
                .unwrap_or(self.stats.bounding_diameter / 10_000.0);
            for i in 0..options.iterations {
                if self.stats.connected_facets_3_edge >= self.stats.number_of_facets {
                    break;
                }
                if options.verbose {
                    println!(
                        "Checking nearby. Tolerance= {} Iteration={} of {}...",
                        tolerance,
                        i + 1,
                        options.iterations
                    );
                }
                let _ = self.check_facets_nearby(tolerance);
                tolerance += increment;
            }
        }

        if options.remove_unconnected || options.fix_all {
            if options.verbose {
                println!("Removing unconnected facets...");
            }
            let _ = self.remove_unconnected_facets();
        }

        if (options.fill_holes || options.fix_all)
            && self.stats.connected_facets_3_edge < self.stats.number_of_facets
        {
            if options.verbose {
                println!("Filling holes...");
            }
            self.fill_holes();
        }

        if options.normal_directions || options.fix_all {
            if options.verbose {
                println!("Fixing normal directions...");
            }
            self.fix_normal_directions();
        }

        if options.normal_values || options.fix_all {
            if options.verbose {
                println!("Fixing normal values...");
            }
            self.fix_normal_values();
        }

        if options.reverse_all {
            if options.verbose {
                println!("Reversing all facets...");
            }
            self.reverse_all_facets();
        }
    }
}
