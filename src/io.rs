// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2023 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the stlfix crate.

//! Reading and writing meshes: binary and ASCII STL plus the OBJ, OFF,
//! DXF and VRML exporters.

pub mod ascii;
pub mod binary;
pub mod exporters;

use crate::{
    StlFixError,
    mesh::{Mesh, StlType},
};
use std::{fs, io::Write, path::Path};

/// Reads an STL file, auto-detecting the format.
pub fn read_stl(path: impl AsRef<Path>) -> Result<Mesh, StlFixError> {
    read_stl_bytes(&fs::read(path)?)
}

/// Parses an in-memory STL payload.
///
/// A payload whose size matches the facet count stored at offset 80 is
/// binary; anything else must start with the `solid` keyword and parse as
/// ASCII.
pub fn read_stl_bytes(bytes: &[u8]) -> Result<Mesh, StlFixError> {
    if binary::size_matches(bytes) {
        return binary::parse(bytes);
    }
    let looks_ascii = bytes
        .iter()
        .skip_while(|b| b.is_ascii_whitespace())
        .take(5)
        .map(u8::to_ascii_lowercase)
        .eq(*b"solid");
    if looks_ascii {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| StlFixError::InvalidFormat(format!("Not valid ASCII STL: {e}")))?;
        return ascii::parse(text);
    }
    Err(StlFixError::InvalidFormat(
        "Neither a binary STL of plausible size nor an ASCII STL starting with \"solid\""
            .to_string(),
    ))
}

/// Writes `mesh` as binary STL.
pub fn write_binary_file(
    mesh: &Mesh,
    path: impl AsRef<Path>,
    label: &str,
) -> Result<(), StlFixError> {
    let mut out = std::io::BufWriter::new(fs::File::create(path)?);
    binary::write(mesh, &mut out, label)?;
    Ok(out.flush()?)
}

/// Writes `mesh` as ASCII STL.
pub fn write_ascii_file(
    mesh: &Mesh,
    path: impl AsRef<Path>,
    label: &str,
) -> Result<(), StlFixError> {
    let mut out = std::io::BufWriter::new(fs::File::create(path)?);
    ascii::write(mesh, &mut out, label)?;
    Ok(out.flush()?)
}

/// Appends the facets of another STL file to `mesh`.
///
/// No translation is applied; if a file is merged with itself the two
/// copies occupy the same space.
pub fn open_merge(mesh: &mut Mesh, path: impl AsRef<Path>) -> Result<(), StlFixError> {
    let other = read_stl(path)?;
    mesh.reserve(other.len());
    for facet in other.facets() {
        mesh.add_facet(*facet);
    }
    mesh.stl_type = StlType::InMemory;
    mesh.stats.original_num_facets = mesh.stats.number_of_facets;
    mesh.update_bounds();
    Ok(())
}
