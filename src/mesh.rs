// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2023 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the stlfix crate.

//! The mesh value itself: a dense facet store, the per-facet neighbor table
//! and the accumulated statistics. Repair passes live in [`crate::repair`]
//! and operate on this through exclusive references.


use crate::{
    geo,
    repair::edge_hash::EdgeHash,
    shared::SharedVertices,
};
use vector_traits::glam::Vec3;

/// One triangle of the mesh: a stored normal, three vertices in winding
/// order and two bytes of opaque trailer data carried over from binary STL.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Facet {
    pub normal: Vec3,
    pub vertices: [Vec3; 3],
    pub extra: [u8; 2],
}

impl Facet {
    pub fn new(normal: Vec3, vertices: [Vec3; 3]) -> Self {
        Self {
            normal,
            vertices,
            extra: [0; 2],
        }
    }

    /// True when two vertices coincide bitwise or a coordinate is not
    /// finite. Such a facet has no usable edges.
    pub fn is_degenerate(&self) -> bool {
        if self.vertices.iter().any(|v| !v.is_finite()) {
            return true;
        }
        let keys = self.vertices.map(geo::vertex_key);
        keys[0] == keys[1] || keys[1] == keys[2] || keys[2] == keys[0]
    }
}

/// Neighbor slots of one facet, one per local edge.
///
/// `neighbor[e]` is the id of the facet across edge `e`, or -1.
/// `which_vertex_not[e]` is the local index of the neighbor's vertex that is
/// *not* on the shared edge, -1 when unmatched, or -2 when the two facets
/// traverse the shared edge in the same direction and one of them still
/// needs to be flipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbors {
    pub neighbor: [i32; 3],
    pub which_vertex_not: [i8; 3],
}

impl Default for Neighbors {
    fn default() -> Self {
        Self {
            neighbor: [-1; 3],
            which_vertex_not: [-1; 3],
        }
    }
}

impl Neighbors {
    pub fn num_connected(&self) -> usize {
        self.neighbor.iter().filter(|&&n| n >= 0).count()
    }
}

/// What kind of file the mesh came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StlType {
    #[default]
    Binary,
    Ascii,
    /// Built or merged in memory, no single backing file.
    InMemory,
}

/// Counters and figures accumulated while loading and repairing.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub number_of_facets: usize,
    pub original_num_facets: usize,
    pub min: Vec3,
    pub max: Vec3,
    pub size: Vec3,
    pub bounding_diameter: f32,
    pub shortest_edge: f32,
    pub volume: f32,
    pub surface_area: f32,
    /// Facets with at least 1/2/3 matched neighbor slots.
    pub connected_facets_1_edge: usize,
    pub connected_facets_2_edge: usize,
    pub connected_facets_3_edge: usize,
    /// Snapshot of the facets with exactly k unmatched edges, taken after
    /// the first exact matching pass of a repair run.
    pub facets_w_1_bad_edge: usize,
    pub facets_w_2_bad_edge: usize,
    pub facets_w_3_bad_edge: usize,
    pub edges_fixed: usize,
    pub degenerate_facets: usize,
    pub facets_removed: usize,
    pub facets_added: usize,
    pub facets_reversed: usize,
    pub backwards_edges: usize,
    pub normals_fixed: usize,
    pub number_of_parts: usize,
    pub shared_vertices: usize,
    pub collisions: usize,
}

/// A triangular surface mesh plus everything the repair pipeline derives
/// from it. All repair operations take `&mut self` and run to completion.
#[derive(Debug)]
pub struct Mesh {
    pub header: String,
    pub stl_type: StlType,
    pub stats: Stats,
    pub(crate) facets: Vec<Facet>,
    pub(crate) neighbors: Vec<Neighbors>,
    pub(crate) shared: Option<SharedVertices>,
    /// Edge record pool, reset and reused between matching passes.
    pub(crate) edge_hash: EdgeHash,
}

impl Mesh {
    pub fn from_facets(header: String, stl_type: StlType, facets: Vec<Facet>) -> Self {
        let neighbors = vec![Neighbors::default(); facets.len()];
        let mut mesh = Self {
            header,
            stl_type,
            stats: Stats::default(),
            facets,
            neighbors,
            shared: None,
            edge_hash: EdgeHash::default(),
        };
        mesh.stats.number_of_facets = mesh.facets.len();
        mesh.stats.original_num_facets = mesh.facets.len();
        mesh.update_bounds();
        mesh
    }

    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }

    pub fn neighbors(&self) -> &[Neighbors] {
        &self.neighbors
    }

    pub fn len(&self) -> usize {
        self.facets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    /// Makes room for at least `additional` more facets up front.
    pub fn reserve(&mut self, additional: usize) {
        self.facets.reserve(additional);
        self.neighbors.reserve(additional);
    }

    /// Appends a facet; its neighbor slots start out unmatched.
    pub fn add_facet(&mut self, facet: Facet) {
        self.facets.push(facet);
        self.neighbors.push(Neighbors::default());
        self.stats.number_of_facets = self.facets.len();
        self.invalidate_shared_vertices();
    }

    /// Removes facet `f` by swapping the last facet into its slot.
    /// Neighbor slots pointing at `f` are cleared, slots pointing at the
    /// moved facet are patched to its new id.
    pub(crate) fn swap_remove_facet(&mut self, f: usize) {
        for e in 0..3 {
            let g = self.neighbors[f].neighbor[e];
            if g < 0 {
                continue;
            }
            let g = g as usize;
            for e2 in 0..3 {
                if self.neighbors[g].neighbor[e2] == f as i32 {
                    self.neighbors[g].neighbor[e2] = -1;
                    self.neighbors[g].which_vertex_not[e2] = -1;
                }
            }
        }
        let moved = self.facets.len() - 1;
        let _ = self.facets.swap_remove(f);
        let _ = self.neighbors.swap_remove(f);
        if f != moved {
            for e in 0..3 {
                let g = self.neighbors[f].neighbor[e];
                if g < 0 {
                    continue;
                }
                let g = g as usize;
                for e2 in 0..3 {
                    if self.neighbors[g].neighbor[e2] == moved as i32 {
                        self.neighbors[g].neighbor[e2] = f as i32;
                    }
                }
            }
        }
        self.stats.number_of_facets = self.facets.len();
        self.invalidate_shared_vertices();
    }

    /// Flips the winding of facet `f` and keeps the neighbor table
    /// consistent: slots 1 and 2 trade places and the pairing sense of every
    /// edge touching `f` is re-derived.
    pub(crate) fn reverse_facet(&mut self, f: usize) {
        self.facets[f].vertices.swap(0, 1);
        self.facets[f].normal = -self.facets[f].normal;
        self.neighbors[f].neighbor.swap(1, 2);
        self.neighbors[f].which_vertex_not.swap(1, 2);

        for e in 0..3 {
            let g = self.neighbors[f].neighbor[e];
            if g < 0 {
                continue;
            }
            let g = g as usize;
            let ka = geo::vertex_key(self.facets[f].vertices[e]);
            let kb = geo::vertex_key(self.facets[f].vertices[(e + 1) % 3]);

            // f's own tag: a proper pairing became same-direction, a
            // same-direction pairing became proper
            self.neighbors[f].which_vertex_not[e] =
                match self.neighbors[f].which_vertex_not[e] {
                    -2 => opposite_vertex(&self.facets[g], ka, kb),
                    _ => -2,
                };

            if let Some(ge) = self.paired_slot(g, f, ka, kb) {
                self.neighbors[g].which_vertex_not[ge] =
                    match self.neighbors[g].which_vertex_not[ge] {
                        -2 => opposite_vertex(&self.facets[f], ka, kb),
                        _ => -2,
                    };
            }
        }
        self.invalidate_shared_vertices();
    }

    /// The slot of `g` that pairs with facet `f` across the edge with the
    /// endpoint keys `ka`/`kb`.
    pub(crate) fn paired_slot(
        &self,
        g: usize,
        f: usize,
        ka: [u32; 3],
        kb: [u32; 3],
    ) -> Option<usize> {
        (0..3).find(|&e| {
            self.neighbors[g].neighbor[e] == f as i32 && {
                let ga = geo::vertex_key(self.facets[g].vertices[e]);
                let gb = geo::vertex_key(self.facets[g].vertices[(e + 1) % 3]);
                (ga == ka && gb == kb) || (ga == kb && gb == ka)
            }
        })
    }

    pub(crate) fn reset_neighbors(&mut self) {
        self.neighbors.clear();
        self.neighbors
            .resize(self.facets.len(), Neighbors::default());
    }

    /// Recomputes the bounding box, bounding diameter and shortest edge
    /// from the current vertex coordinates.
    pub fn update_bounds(&mut self) {
        if self.facets.is_empty() {
            self.stats.min = Vec3::ZERO;
            self.stats.max = Vec3::ZERO;
            self.stats.size = Vec3::ZERO;
            self.stats.bounding_diameter = 0.0;
            self.stats.shortest_edge = 0.0;
            return;
        }
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        let mut shortest = f32::MAX;
        for facet in &self.facets {
            for e in 0..3 {
                let v = facet.vertices[e];
                min = min.min(v);
                max = max.max(v);
                let len2 = geo::edge_length_squared(v, facet.vertices[(e + 1) % 3]);
                // zero-length edges belong to degenerate facets and say
                // nothing about the mesh resolution
                if len2 > 0.0 && len2 < shortest {
                    shortest = len2;
                }
            }
        }
        self.stats.min = min;
        self.stats.max = max;
        self.stats.size = max - min;
        self.stats.bounding_diameter = self.stats.size.length();
        self.stats.shortest_edge = if shortest < f32::MAX {
            shortest.sqrt()
        } else {
            0.0
        };
    }

    /// Net signed volume, stored in the stats and returned.
    pub fn calculate_volume(&mut self) -> f32 {
        let mut volume = 0.0f32;
        for facet in &self.facets {
            volume +=
                geo::signed_tetra_volume(facet.vertices[0], facet.vertices[1], facet.vertices[2]);
        }
        self.stats.volume = volume;
        volume
    }

    pub fn calculate_surface_area(&mut self) -> f32 {
        let mut area = 0.0f32;
        for facet in &self.facets {
            area += geo::triangle_area(facet.vertices[0], facet.vertices[1], facet.vertices[2]);
        }
        self.stats.surface_area = area;
        area
    }

    /// Refreshes the `connected_facets_{1,2,3}_edge` tallies.
    pub(crate) fn connection_tallies(&mut self) {
        let (mut c1, mut c2, mut c3) = (0, 0, 0);
        for n in &self.neighbors {
            let connected = n.num_connected();
            if connected >= 1 {
                c1 += 1;
            }
            if connected >= 2 {
                c2 += 1;
            }
            if connected == 3 {
                c3 += 1;
            }
        }
        self.stats.connected_facets_1_edge = c1;
        self.stats.connected_facets_2_edge = c2;
        self.stats.connected_facets_3_edge = c3;
    }

    /// Checks that the neighbor relation is symmetric and counts the edges
    /// whose two facets traverse them in the same direction. Returns false
    /// when an asymmetry was found.
    pub fn verify_neighbors(&mut self) -> bool {
        let mut ok = true;
        let mut backwards = 0;
        for f in 0..self.facets.len() {
            for e in 0..3 {
                let g = self.neighbors[f].neighbor[e];
                if g < 0 {
                    continue;
                }
                let ka = geo::vertex_key(self.facets[f].vertices[e]);
                let kb = geo::vertex_key(self.facets[f].vertices[(e + 1) % 3]);
                if self.paired_slot(g as usize, f, ka, kb).is_none() {
                    eprintln!("verify_neighbors: facet {f} edge {e} points at {g}, which does not point back");
                    ok = false;
                }
                if self.neighbors[f].which_vertex_not[e] == -2 && f < g as usize {
                    backwards += 1;
                }
            }
        }
        self.stats.backwards_edges = backwards;
        ok
    }

    pub fn invalidate_shared_vertices(&mut self) {
        self.shared = None;
    }

    /// Writes the human-readable statistics block. Volume, surface area and
    /// the connection tallies are recomputed first.
    pub fn write_stats<W: std::io::Write>(
        &mut self,
        out: &mut W,
        input_file: &str,
    ) -> Result<(), crate::StlFixError> {
        let _ = self.calculate_volume();
        let _ = self.calculate_surface_area();
        self.connection_tallies();
        let s = &self.stats;
        let file_type = match self.stl_type {
            StlType::Binary => "Binary STL file",
            StlType::Ascii => "ASCII STL file",
            StlType::InMemory => "In-memory mesh",
        };
        let final_w_1 = s.connected_facets_2_edge - s.connected_facets_3_edge;
        let final_w_2 = s.connected_facets_1_edge - s.connected_facets_2_edge;
        let final_w_3 = s.number_of_facets - s.connected_facets_1_edge;
        let original_bad = s.facets_w_1_bad_edge + s.facets_w_2_bad_edge + s.facets_w_3_bad_edge;
        let final_bad = final_w_1 + final_w_2 + final_w_3;
        writeln!(out, "============== Results produced by stlfix ==============")?;
        writeln!(out, "Input file         : {input_file}")?;
        writeln!(out, "File type          : {file_type}")?;
        writeln!(out, "Header             : {}", self.header)?;
        writeln!(out, "============== Size ==============")?;
        writeln!(out, "Min X = {:.6}, Max X = {:.6}", s.min.x, s.max.x)?;
        writeln!(out, "Min Y = {:.6}, Max Y = {:.6}", s.min.y, s.max.y)?;
        writeln!(out, "Min Z = {:.6}, Max Z = {:.6}", s.min.z, s.max.z)?;
        writeln!(out, "========= Facet Status ========== Original ============ Final ====")?;
        writeln!(
            out,
            "Number of facets                 : {:5}               {:5}",
            s.original_num_facets, s.number_of_facets
        )?;
        writeln!(
            out,
            "Facets with 1 disconnected edge  : {:5}               {:5}",
            s.facets_w_1_bad_edge, final_w_1
        )?;
        writeln!(
            out,
            "Facets with 2 disconnected edges : {:5}               {:5}",
            s.facets_w_2_bad_edge, final_w_2
        )?;
        writeln!(
            out,
            "Facets with 3 disconnected edges : {:5}               {:5}",
            s.facets_w_3_bad_edge, final_w_3
        )?;
        writeln!(
            out,
            "Total disconnected facets        : {original_bad:5}               {final_bad:5}",
        )?;
        writeln!(out, "=== Processing Statistics ===     ===== Other Statistics =====")?;
        writeln!(
            out,
            "Number of parts       : {:5}        Volume   : {:.6}",
            s.number_of_parts, s.volume
        )?;
        writeln!(
            out,
            "Degenerate facets     : {:5}        Surface  : {:.6}",
            s.degenerate_facets, s.surface_area
        )?;
        writeln!(out, "Edges fixed           : {:5}", s.edges_fixed)?;
        writeln!(out, "Facets removed        : {:5}", s.facets_removed)?;
        writeln!(out, "Facets added          : {:5}", s.facets_added)?;
        writeln!(out, "Facets reversed       : {:5}", s.facets_reversed)?;
        writeln!(out, "Backwards edges       : {:5}", s.backwards_edges)?;
        writeln!(out, "Normals fixed         : {:5}", s.normals_fixed)?;
        Ok(())
    }
}

/// The local index of the vertex of `facet` that lies on neither endpoint
/// of the edge `ka`/`kb`. Exact because paired edges have bit-identical
/// endpoints.
fn opposite_vertex(facet: &Facet, ka: [u32; 3], kb: [u32; 3]) -> i8 {
    for (k, v) in facet.vertices.iter().enumerate() {
        let key = geo::vertex_key(*v);
        if key != ka && key != kb {
            return k as i8;
        }
    }
    -1
}
