// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2023 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the stlfix crate.

//! Non-STL output formats. OBJ, OFF and VRML work from the shared-vertex
//! tables (built on demand); DXF emits one `3DFACE` per facet and needs no
//! shared vertices.

use crate::{StlFixError, mesh::Mesh};
use itertools::Itertools;
use std::{fs, io::Write, path::Path};

fn fmt3(buffer: &mut ryu::Buffer, v: vector_traits::glam::Vec3) -> String {
    // ryu's output borrows the buffer, so format one component at a time
    let x = buffer.format(v.x).to_string();
    let y = buffer.format(v.y).to_string();
    let z = buffer.format(v.z).to_string();
    [x, y, z].iter().join(" ")
}

pub fn write_obj<W: Write>(mesh: &mut Mesh, out: &mut W) -> Result<(), StlFixError> {
    let shared = mesh.generate_shared_vertices()?;
    let mut buffer = ryu::Buffer::new();
    for vertex in &shared.vertices {
        writeln!(out, "v {}", fmt3(&mut buffer, *vertex))?;
    }
    for triple in &shared.v_indices {
        // OBJ indices are 1-based
        writeln!(out, "f {} {} {}", triple[0] + 1, triple[1] + 1, triple[2] + 1)?;
    }
    Ok(())
}

pub fn write_off<W: Write>(mesh: &mut Mesh, out: &mut W) -> Result<(), StlFixError> {
    let shared = mesh.generate_shared_vertices()?;
    let mut buffer = ryu::Buffer::new();
    writeln!(out, "OFF")?;
    writeln!(out, "{} {} 0", shared.vertices.len(), shared.v_indices.len())?;
    for vertex in &shared.vertices {
        writeln!(out, "{}", fmt3(&mut buffer, *vertex))?;
    }
    for triple in &shared.v_indices {
        writeln!(out, "3 {} {} {}", triple[0], triple[1], triple[2])?;
    }
    Ok(())
}

pub fn write_vrml<W: Write>(mesh: &mut Mesh, out: &mut W) -> Result<(), StlFixError> {
    let shared = mesh.generate_shared_vertices()?;
    let mut buffer = ryu::Buffer::new();
    writeln!(out, "#VRML V1.0 ascii")?;
    writeln!(out)?;
    writeln!(out, "Separator {{")?;
    writeln!(out, "\tDEF STLShape ShapeHints {{")?;
    writeln!(out, "\t\tvertexOrdering COUNTERCLOCKWISE")?;
    writeln!(out, "\t\tfaceType CONVEX")?;
    writeln!(out, "\t\tshapeType SOLID")?;
    writeln!(out, "\t\tcreaseAngle 0.0")?;
    writeln!(out, "\t}}")?;
    writeln!(out, "\tDEF STLModel Separator {{")?;
    writeln!(out, "\t\tDEF STLColor Material {{")?;
    writeln!(out, "\t\t\temissiveColor 0.7 0.7 0.0")?;
    writeln!(out, "\t\t}}")?;
    writeln!(out, "\t\tDEF STLVertices Coordinate3 {{")?;
    writeln!(out, "\t\t\tpoint [")?;
    for (i, vertex) in shared.vertices.iter().enumerate() {
        let separator = if i + 1 < shared.vertices.len() { "," } else { "" };
        writeln!(out, "\t\t\t\t{}{separator}", fmt3(&mut buffer, *vertex))?;
    }
    writeln!(out, "\t\t\t]")?;
    writeln!(out, "\t\t}}")?;
    writeln!(out, "\t\tDEF STLTriangles IndexedFaceSet {{")?;
    writeln!(out, "\t\t\tcoordIndex [")?;
    for (i, triple) in shared.v_indices.iter().enumerate() {
        let separator = if i + 1 < shared.v_indices.len() { "," } else { "" };
        writeln!(
            out,
            "\t\t\t\t{}, {}, {}, -1{separator}",
            triple[0], triple[1], triple[2]
        )?;
    }
    writeln!(out, "\t\t\t]")?;
    writeln!(out, "\t\t}}")?;
    writeln!(out, "\t}}")?;
    writeln!(out, "}}")?;
    Ok(())
}

pub fn write_dxf<W: Write>(mesh: &Mesh, out: &mut W, label: &str) -> Result<(), StlFixError> {
    let mut buffer = ryu::Buffer::new();
    writeln!(out, "999\n{label}")?;
    writeln!(out, "0\nSECTION\n2\nHEADER\n0\nENDSEC")?;
    writeln!(out, "0\nSECTION\n2\nENTITIES")?;
    for facet in mesh.facets() {
        writeln!(out, "0\n3DFACE\n8\n0")?;
        // the fourth corner repeats the third, a triangle in DXF terms
        let corners = [
            facet.vertices[0],
            facet.vertices[1],
            facet.vertices[2],
            facet.vertices[2],
        ];
        for (i, corner) in corners.iter().enumerate() {
            for (axis, value) in [(10, corner.x), (20, corner.y), (30, corner.z)] {
                writeln!(out, "{}\n{}", axis + i, buffer.format(value))?;
            }
        }
    }
    writeln!(out, "0\nENDSEC\n0\nEOF")?;
    Ok(())
}

pub fn write_obj_file(mesh: &mut Mesh, path: impl AsRef<Path>) -> Result<(), StlFixError> {
    let mut out = std::io::BufWriter::new(fs::File::create(path)?);
    write_obj(mesh, &mut out)?;
    Ok(out.flush()?)
}

pub fn write_off_file(mesh: &mut Mesh, path: impl AsRef<Path>) -> Result<(), StlFixError> {
    let mut out = std::io::BufWriter::new(fs::File::create(path)?);
    write_off(mesh, &mut out)?;
    Ok(out.flush()?)
}

pub fn write_vrml_file(mesh: &mut Mesh, path: impl AsRef<Path>) -> Result<(), StlFixError> {
    let mut out = std::io::BufWriter::new(fs::File::create(path)?);
    write_vrml(mesh, &mut out)?;
    Ok(out.flush()?)
}

pub fn write_dxf_file(
    mesh: &Mesh,
    path: impl AsRef<Path>,
    label: &str,
) -> Result<(), StlFixError> {
    let mut out = std::io::BufWriter::new(fs::File::create(path)?);
    write_dxf(mesh, &mut out, label)?;
    Ok(out.flush()?)
}
