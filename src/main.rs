// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2023 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the stlfix crate.

//! Command-line front-end. Operations always run in the same pipeline
//! order regardless of where the options appear on the command line:
//! rotations, mirrors, scale, translate, merge, repair, then the writers.

use clap::Parser;
use std::{path::PathBuf, process::ExitCode};
use stlfix::{io, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "stlfix", version)]
#[command(about = "Process and repair triangulated solid meshes stored as STL")]
#[command(after_help = "The operations are executed in a fixed pipeline order; \
the order of the options on the command line does not matter.")]
struct Args {
    /// Input STL file
    file: PathBuf,

    /// Rotate CCW about the x axis by the given angle in degrees
    #[arg(long = "x-rotate", value_name = "angle")]
    x_rotate: Option<f32>,

    /// Rotate CCW about the y axis by the given angle in degrees
    #[arg(long = "y-rotate", value_name = "angle")]
    y_rotate: Option<f32>,

    /// Rotate CCW about the z axis by the given angle in degrees
    #[arg(long = "z-rotate", value_name = "angle")]
    z_rotate: Option<f32>,

    /// Mirror about the xy plane
    #[arg(long = "xy-mirror")]
    xy_mirror: bool,

    /// Mirror about the yz plane
    #[arg(long = "yz-mirror")]
    yz_mirror: bool,

    /// Mirror about the xz plane
    #[arg(long = "xz-mirror")]
    xz_mirror: bool,

    /// Scale the mesh by the given factor
    #[arg(long, value_name = "factor")]
    scale: Option<f32>,

    /// Translate the mesh so its minimum lands on x,y,z
    #[arg(long, value_name = "x,y,z", value_parser = parse_triplet)]
    translate: Option<Triplet>,

    /// Merge the named file with the input file
    #[arg(long, value_name = "name")]
    merge: Option<PathBuf>,

    /// Only check for perfectly matched edges
    #[arg(short, long)]
    exact: bool,

    /// Find and connect nearby facets, correct bad facets
    #[arg(short, long)]
    nearby: bool,

    /// Initial tolerance to use for the nearby check
    #[arg(short, long, value_name = "tol")]
    tolerance: Option<f32>,

    /// Number of iterations for the nearby check
    #[arg(short, long, value_name = "i", default_value_t = 2)]
    iterations: usize,

    /// Amount to increment the tolerance after each iteration
    #[arg(short = 'm', long, value_name = "inc")]
    increment: Option<f32>,

    /// Remove facets that have 0 neighbors
    #[arg(short = 'u', long = "remove-unconnected")]
    remove_unconnected: bool,

    /// Add facets to fill holes
    #[arg(short = 'f', long = "fill-holes")]
    fill_holes: bool,

    /// Check and fix the direction of normals (ie cw, ccw)
    #[arg(short = 'd', long = "normal-directions")]
    normal_directions: bool,

    /// Check and fix normal values
    #[arg(short = 'v', long = "normal-values")]
    normal_values: bool,

    /// Reverse the directions of all facets and normals
    #[arg(long = "reverse-all")]
    reverse_all: bool,

    /// Don't do any check on the input file
    #[arg(short = 'c', long = "no-check")]
    no_check: bool,

    /// Output a binary STL file with the given name
    #[arg(short = 'b', long = "write-binary-stl", value_name = "name")]
    write_binary_stl: Option<PathBuf>,

    /// Output an ASCII STL file with the given name
    #[arg(short = 'a', long = "write-ascii-stl", value_name = "name")]
    write_ascii_stl: Option<PathBuf>,

    /// Output a Geomview OFF format file with the given name
    #[arg(long = "write-off", value_name = "name")]
    write_off: Option<PathBuf>,

    /// Output a DXF format file with the given name
    #[arg(long = "write-dxf", value_name = "name")]
    write_dxf: Option<PathBuf>,

    /// Output an OBJ format file with the given name
    #[arg(long = "write-obj", value_name = "name")]
    write_obj: Option<PathBuf>,

    /// Output a VRML format file with the given name
    #[arg(long = "write-vrml", value_name = "name")]
    write_vrml: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy)]
struct Triplet {
    x: f32,
    y: f32,
    z: f32,
}

fn parse_triplet(s: &str) -> Result<Triplet, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z, got {s:?}"));
    }
    let mut values = [0.0f32; 3];
    for (slot, part) in values.iter_mut().zip(&parts) {
        *slot = part
            .trim()
            .parse::<f32>()
            .map_err(|e| format!("bad coordinate {part:?}: {e}"))?;
    }
    Ok(Triplet {
        x: values[0],
        y: values[1],
        z: values[2],
    })
}

fn repair_options(args: &Args) -> RepairOptions {
    let individual_step = args.exact
        || args.nearby
        || args.remove_unconnected
        || args.fill_holes
        || args.normal_directions
        || args.normal_values
        || args.reverse_all
        || args.no_check;
    RepairOptions {
        fix_all: !individual_step,
        exact: args.exact,
        tolerance: args.tolerance,
        increment: args.increment,
        nearby: args.nearby,
        iterations: args.iterations,
        remove_unconnected: args.remove_unconnected,
        fill_holes: args.fill_holes,
        normal_directions: args.normal_directions,
        normal_values: args.normal_values,
        reverse_all: args.reverse_all,
        verbose: true,
    }
}

fn run(args: &Args) -> Result<ExitCode, StlFixError> {
    let input_file = args.file.display().to_string();
    println!("Opening {input_file}");
    let mut mesh = read_stl(&args.file)?;

    if let Some(angle) = args.x_rotate {
        println!("Rotating about the x axis by {angle} degrees...");
        mesh.rotate_x(angle);
    }
    if let Some(angle) = args.y_rotate {
        println!("Rotating about the y axis by {angle} degrees...");
        mesh.rotate_y(angle);
    }
    if let Some(angle) = args.z_rotate {
        println!("Rotating about the z axis by {angle} degrees...");
        mesh.rotate_z(angle);
    }
    if args.xy_mirror {
        println!("Mirroring about the xy plane...");
        mesh.mirror_xy();
    }
    if args.yz_mirror {
        println!("Mirroring about the yz plane...");
        mesh.mirror_yz();
    }
    if args.xz_mirror {
        println!("Mirroring about the xz plane...");
        mesh.mirror_xz();
    }
    if let Some(factor) = args.scale {
        println!("Scaling by factor {factor}...");
        mesh.scale(factor);
    }
    if let Some(t) = args.translate {
        println!("Translating to {}, {}, {} ...", t.x, t.y, t.z);
        mesh.translate(t.x, t.y, t.z);
    }
    if let Some(merge_file) = &args.merge {
        println!("Merging {} with {input_file}", merge_file.display());
        io::open_merge(&mut mesh, merge_file)?;
    }

    mesh.repair(&repair_options(args));

    let label = format!("Processed by stlfix {}", env!("CARGO_PKG_VERSION"));
    let mut failed = false;
    let mut report = |what: &str, result: Result<(), StlFixError>| {
        if let Err(e) = result {
            eprintln!("Writing the {what} file failed: {e}");
            failed = true;
        }
    };

    if let Some(path) = &args.write_off {
        println!("Writing OFF file {}", path.display());
        report("OFF", io::exporters::write_off_file(&mut mesh, path));
    }
    if let Some(path) = &args.write_obj {
        println!("Writing OBJ file {}", path.display());
        report("OBJ", io::exporters::write_obj_file(&mut mesh, path));
    }
    if let Some(path) = &args.write_dxf {
        println!("Writing DXF file {}", path.display());
        report("DXF", io::exporters::write_dxf_file(&mesh, path, &label));
    }
    if let Some(path) = &args.write_vrml {
        println!("Writing VRML file {}", path.display());
        report("VRML", io::exporters::write_vrml_file(&mut mesh, path));
    }
    if let Some(path) = &args.write_ascii_stl {
        println!("Writing ASCII STL file {}", path.display());
        report("ASCII STL", io::write_ascii_file(&mesh, path, &label));
    }
    if let Some(path) = &args.write_binary_stl {
        println!("Writing binary STL file {}", path.display());
        report("binary STL", io::write_binary_file(&mesh, path, &label));
    }

    mesh.write_stats(&mut std::io::stdout().lock(), &input_file)?;

    if failed {
        eprintln!("Some part of the procedure failed, see the log above.");
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("stlfix: {e}");
            ExitCode::FAILURE
        }
    }
}
