// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2023 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the stlfix crate.

//! Shared-vertex generation: collapses the per-facet vertex triples into a
//! deduplicated vertex array plus an index triple per facet, the form the
//! OFF/OBJ/VRML writers need.


use crate::{StlFixError, mesh::Mesh};
use ahash::AHashMap;
use vector_traits::glam::Vec3;

/// The deduplicated tables: `vertices[v_indices[f][k]]` is vertex `k` of
/// facet `f`.
#[derive(Debug, Clone, Default)]
pub struct SharedVertices {
    pub vertices: Vec<Vec3>,
    pub v_indices: Vec<[u32; 3]>,
}

/// Assigns one index per distinct vertex, keyed by the coordinate bit
/// patterns.
pub(crate) struct VertexDeduplicator {
    set: AHashMap<[u32; 3], u32>,
    pub vertices: Vec<Vec3>,
}

impl VertexDeduplicator {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            set: AHashMap::with_capacity(capacity),
            vertices: Vec::with_capacity(capacity),
        }
    }

    /// Get a previously assigned index, or insert the vertex and return the
    /// new index.
    pub fn get_index_or_insert(&mut self, vertex: Vec3) -> Result<u32, StlFixError> {
        if !vertex.is_finite() {
            return Err(StlFixError::FloatNotFinite(format!(
                "The vertex was not finite ({},{},{})",
                vertex.x, vertex.y, vertex.z
            )));
        }
        let index = self
            .set
            .entry(crate::geo::vertex_key(vertex))
            .or_insert_with(|| {
                let new_index = self.vertices.len();
                self.vertices.push(vertex);
                new_index as u32
            });
        Ok(*index)
    }
}

impl Mesh {
    /// Builds the shared-vertex tables unless a valid build already exists.
    /// Any mutation of coordinates or topology throws the tables away.
    pub fn generate_shared_vertices(&mut self) -> Result<&SharedVertices, StlFixError> {
        if self.shared.is_none() {
            let mut dedup = VertexDeduplicator::with_capacity(self.facets.len() / 2 + 1);
            let mut v_indices = Vec::with_capacity(self.facets.len());
            for facet in &self.facets {
                let mut triple = [0u32; 3];
                for (k, vertex) in facet.vertices.iter().enumerate() {
                    triple[k] = dedup.get_index_or_insert(*vertex)?;
                }
                v_indices.push(triple);
            }
            self.shared = Some(SharedVertices {
                vertices: dedup.vertices,
                v_indices,
            });
        }
        let shared = self.shared.as_ref().expect("just built");
        self.stats.shared_vertices = shared.vertices.len();
        Ok(shared)
    }
}
