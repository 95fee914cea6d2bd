// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2023 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the stlfix crate.

#![deny(
    rust_2018_compatibility,
    rust_2018_idioms,
    nonstandard_style,
    unused,
    future_incompatible,
    non_camel_case_types,
    unused_parens,
    non_upper_case_globals,
    unused_qualifications,
    unused_results,
    unused_imports,
    unused_variables,
    bare_trait_objects,
    ellipsis_inclusive_range_patterns,
    elided_lifetimes_in_paths
)]
#![warn(clippy::explicit_into_iter_loop)]

pub mod geo;
pub mod io;
pub mod mesh;
pub mod repair;
pub mod shared;
pub mod transform;

pub mod prelude {
    pub use crate::{
        StlFixError,
        io::{read_stl, read_stl_bytes},
        mesh::{Facet, Mesh, StlType},
        repair::RepairOptions,
    };
}

#[derive(thiserror::Error, Debug)]
pub enum StlFixError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid STL data: {0}")]
    InvalidFormat(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("The float value was not finite: {0}")]
    FloatNotFinite(String),
}
