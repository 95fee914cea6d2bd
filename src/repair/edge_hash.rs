// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2023 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the stlfix crate.

//! Chained hash table over orientation-stripped edge fingerprints. Buckets
//! and chain links are indices into a dense record pool, so matching passes
//! can reset and reuse the allocation instead of churning the allocator.

#[cfg(test)]
mod tests;

use crate::{geo, mesh::Facet};

/// Six bit patterns: both endpoints of an edge, lexicographically ordered
/// so (A,B) and (B,A) produce the same fingerprint.
pub(crate) type EdgeKey = [u32; 6];

/// The fingerprint of facet edge `e` (`v[e]` -> `v[e+1]`), plus the
/// `which_edge` tag: the local edge index, +3 when the endpoints had to be
/// swapped into lexicographic order. `None` for edges that cannot be
/// matched: coincident endpoints or non-finite coordinates.
pub(crate) fn edge_fingerprint(facet: &Facet, e: usize) -> Option<(EdgeKey, u8)> {
    let a = facet.vertices[e];
    let b = facet.vertices[(e + 1) % 3];
    if !(a.is_finite() && b.is_finite()) {
        return None;
    }
    let ka = geo::vertex_key(a);
    let kb = geo::vertex_key(b);
    if ka == kb {
        return None;
    }
    if ka <= kb {
        Some(([ka[0], ka[1], ka[2], kb[0], kb[1], kb[2]], e as u8))
    } else {
        Some(([kb[0], kb[1], kb[2], ka[0], ka[1], ka[2]], e as u8 + 3))
    }
}

#[derive(Debug, Clone, Copy)]
struct EdgeRecord {
    key: EdgeKey,
    facet: u32,
    which_edge: u8,
    /// Next record in the bucket chain, or the free list when the record is
    /// unused. -1 terminates either chain.
    next: i32,
}

/// The index itself. `heads` has a prime number of buckets, sized for the
/// facet count the table was last prepared for.
#[derive(Debug, Default)]
pub(crate) struct EdgeHash {
    heads: Vec<i32>,
    pool: Vec<EdgeRecord>,
    free: i32,
    /// Chain probes beyond the first record of a bucket.
    pub(crate) collisions: usize,
}

impl EdgeHash {
    /// Clears the table, re-bucketing only when the facet count outgrew the
    /// current bucket array.
    pub(crate) fn prepare(&mut self, facets: usize) {
        let wanted = bucket_count(facets);
        if self.heads.len() < wanted {
            self.heads = vec![-1; wanted];
        } else {
            self.heads.fill(-1);
        }
        self.pool.clear();
        self.free = -1;
        self.collisions = 0;
    }

    fn bucket(&self, key: &EdgeKey) -> usize {
        let folded = key
            .iter()
            .fold(0u32, |acc, &k| (acc ^ k).wrapping_mul(0x9e37_79b9));
        folded as usize % self.heads.len()
    }

    /// Looks for a pending record with the same fingerprint. On a hit the
    /// record is unlinked (a fingerprint pairs at most two edges) and its
    /// facet/tag returned; on a miss the edge is filed for later matching.
    pub(crate) fn insert_or_take(
        &mut self,
        key: EdgeKey,
        facet: u32,
        which_edge: u8,
    ) -> Option<(u32, u8)> {
        let bucket = self.bucket(&key);
        let mut prev = -1i32;
        let mut cur = self.heads[bucket];
        while cur >= 0 {
            if prev >= 0 {
                self.collisions += 1;
            }
            let record = self.pool[cur as usize];
            if record.key == key {
                // unlink and recycle
                if prev < 0 {
                    self.heads[bucket] = record.next;
                } else {
                    self.pool[prev as usize].next = record.next;
                }
                self.pool[cur as usize].next = self.free;
                self.free = cur;
                return Some((record.facet, record.which_edge));
            }
            prev = cur;
            cur = record.next;
        }
        let record = EdgeRecord {
            key,
            facet,
            which_edge,
            next: self.heads[bucket],
        };
        if self.free >= 0 {
            let slot = self.free as usize;
            self.free = self.pool[slot].next;
            self.pool[slot] = record;
            self.heads[bucket] = slot as i32;
        } else {
            self.pool.push(record);
            self.heads[bucket] = (self.pool.len() - 1) as i32;
        }
        None
    }
}

/// Smallest prime at least twice the facet count (with a small floor so
/// toy meshes do not degenerate into a single chain).
pub(crate) fn bucket_count(facets: usize) -> usize {
    let mut candidate = (2 * facets).max(11);
    while !is_prime(candidate) {
        candidate += 1;
    }
    candidate
}

fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}
