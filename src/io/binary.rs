// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2023 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the stlfix crate.

//! Binary STL: an 80-byte header, a little-endian facet count, then 50
//! bytes per facet (twelve `f32` plus two trailer bytes that are preserved
//! verbatim).

use crate::{
    StlFixError,
    mesh::{Facet, Mesh, StlType},
};
use vector_traits::glam::Vec3;

pub const HEADER_SIZE: usize = 84;
pub const FACET_SIZE: usize = 50;

/// True when the facet count at offset 80 accounts for the file size.
pub(crate) fn size_matches(bytes: &[u8]) -> bool {
    if bytes.len() < HEADER_SIZE {
        return false;
    }
    let count = u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]) as usize;
    count
        .checked_mul(FACET_SIZE)
        .and_then(|n| n.checked_add(HEADER_SIZE))
        == Some(bytes.len())
}

pub fn parse(bytes: &[u8]) -> Result<Mesh, StlFixError> {
    if bytes.len() < HEADER_SIZE {
        return Err(StlFixError::InvalidFormat(format!(
            "Binary STL needs at least {HEADER_SIZE} bytes, got {}",
            bytes.len()
        )));
    }
    let count = u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]) as usize;
    let expected = HEADER_SIZE + count * FACET_SIZE;
    if bytes.len() != expected {
        return Err(StlFixError::InvalidFormat(format!(
            "Binary STL with {count} facets should be {expected} bytes, got {}",
            bytes.len()
        )));
    }
    let header = String::from_utf8_lossy(&bytes[..80])
        .trim_end_matches('\0')
        .trim_end()
        .to_string();

    let mut facets = Vec::with_capacity(count);
    for chunk in bytes[HEADER_SIZE..].chunks_exact(FACET_SIZE) {
        let mut floats = [0.0f32; 12];
        for (i, word) in chunk[..48].chunks_exact(4).enumerate() {
            floats[i] = f32::from_le_bytes([word[0], word[1], word[2], word[3]]);
        }
        facets.push(Facet {
            normal: Vec3::new(floats[0], floats[1], floats[2]),
            vertices: [
                Vec3::new(floats[3], floats[4], floats[5]),
                Vec3::new(floats[6], floats[7], floats[8]),
                Vec3::new(floats[9], floats[10], floats[11]),
            ],
            extra: [chunk[48], chunk[49]],
        });
    }
    Ok(Mesh::from_facets(header, StlType::Binary, facets))
}

pub fn write<W: std::io::Write>(mesh: &Mesh, out: &mut W, label: &str) -> Result<(), StlFixError> {
    let mut header = [0u8; 80];
    let label_bytes = label.as_bytes();
    let n = label_bytes.len().min(80);
    header[..n].copy_from_slice(&label_bytes[..n]);
    out.write_all(&header)?;
    out.write_all(&(mesh.len() as u32).to_le_bytes())?;

    let mut record = Vec::with_capacity(FACET_SIZE);
    for facet in mesh.facets() {
        record.clear();
        for value in [
            facet.normal.x,
            facet.normal.y,
            facet.normal.z,
            facet.vertices[0].x,
            facet.vertices[0].y,
            facet.vertices[0].z,
            facet.vertices[1].x,
            facet.vertices[1].y,
            facet.vertices[1].z,
            facet.vertices[2].x,
            facet.vertices[2].y,
            facet.vertices[2].z,
        ] {
            record.extend_from_slice(&value.to_le_bytes());
        }
        record.extend_from_slice(&facet.extra);
        out.write_all(&record)?;
    }
    Ok(())
}
