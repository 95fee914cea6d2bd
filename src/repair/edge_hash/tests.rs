// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2023 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the stlfix crate.

use crate::{
    mesh::Facet,
    repair::edge_hash::{EdgeHash, bucket_count, edge_fingerprint},
};
use vector_traits::glam::Vec3;

fn triangle(v0: Vec3, v1: Vec3, v2: Vec3) -> Facet {
    Facet::new(Vec3::ZERO, [v0, v1, v2])
}

#[test]
fn bucket_counts_are_prime_and_large_enough() {
    assert_eq!(11, bucket_count(0));
    assert_eq!(13, bucket_count(6));
    assert_eq!(211, bucket_count(100));
    for facets in [1, 7, 12, 50, 1000] {
        let m = bucket_count(facets);
        assert!(m >= 2 * facets.max(1));
        assert!((2..m).all(|d| d * d > m || m % d != 0));
    }
}

#[test]
fn shared_edge_has_one_fingerprint() {
    let a = Vec3::new(0.0, 0.0, 0.0);
    let b = Vec3::new(1.0, 0.0, 0.0);
    let up = Vec3::new(0.5, 1.0, 0.0);
    let down = Vec3::new(0.5, -1.0, 0.0);
    // edge 0 of the first facet runs a->b, edge 0 of the second b->a
    let (key_ab, tag_ab) = edge_fingerprint(&triangle(a, b, up), 0).unwrap();
    let (key_ba, tag_ba) = edge_fingerprint(&triangle(b, a, down), 0).unwrap();
    assert_eq!(key_ab, key_ba);
    // opposite traversal shows up as differing swap flags
    assert_ne!(tag_ab < 3, tag_ba < 3);
}

#[test]
fn degenerate_and_nan_edges_have_no_fingerprint() {
    let a = Vec3::new(1.0, 2.0, 3.0);
    let b = Vec3::new(0.0, 0.0, 0.0);
    assert!(edge_fingerprint(&triangle(a, a, b), 0).is_none());
    assert!(edge_fingerprint(&triangle(a, a, b), 1).is_some());
    let poisoned = Vec3::new(f32::NAN, 0.0, 0.0);
    assert!(edge_fingerprint(&triangle(poisoned, a, b), 0).is_none());
}

#[test]
fn insert_then_take_pairs_up() {
    let a = Vec3::new(0.0, 0.0, 0.0);
    let b = Vec3::new(1.0, 0.0, 0.0);
    let up = Vec3::new(0.5, 1.0, 0.0);
    let down = Vec3::new(0.5, -1.0, 0.0);
    let (key, tag_first) = edge_fingerprint(&triangle(a, b, up), 0).unwrap();
    let (key_back, tag_second) = edge_fingerprint(&triangle(b, a, down), 0).unwrap();

    let mut hash = EdgeHash::default();
    hash.prepare(2);
    assert_eq!(None, hash.insert_or_take(key, 0, tag_first));
    assert_eq!(
        Some((0, tag_first)),
        hash.insert_or_take(key_back, 1, tag_second)
    );
    // the record was unlinked: a third incidence starts over
    assert_eq!(None, hash.insert_or_take(key, 2, tag_first));
}
