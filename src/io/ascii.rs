// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2023 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the stlfix crate.

//! ASCII STL: a case-insensitive keyword stream with arbitrary whitespace.
//! A `logos` lexer feeds a small state machine; errors report the 1-based
//! line they were found on.

use crate::{
    StlFixError,
    mesh::{Facet, Mesh, StlType},
};
use logos::Logos;
use vector_traits::glam::Vec3;

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
enum Token {
    #[token("solid", ignore(ascii_case))]
    Solid,

    #[token("endsolid", ignore(ascii_case))]
    EndSolid,

    #[token("facet", ignore(ascii_case))]
    Facet,

    #[token("endfacet", ignore(ascii_case))]
    EndFacet,

    #[token("normal", ignore(ascii_case))]
    Normal,

    #[token("outer", ignore(ascii_case))]
    Outer,

    #[token("loop", ignore(ascii_case))]
    Loop,

    #[token("endloop", ignore(ascii_case))]
    EndLoop,

    #[token("vertex", ignore(ascii_case))]
    Vertex,

    #[regex(r"[-+]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][-+]?[0-9]+)?", priority = 3)]
    Number,

    #[token("\n")]
    Eol,

    /// Anything else that is not whitespace; solid names are made of these.
    #[regex(r"[^ \t\r\n]+", priority = 1)]
    Word,

    #[regex(r"[ \t\r\f]+", logos::skip)]
    Skip,
}

#[derive(Debug, PartialEq, Clone, Copy)]
enum ParseState {
    /// Before `solid`.
    Start,
    /// Consuming the rest of the `solid` line as the name.
    SolidName,
    /// Between facets.
    Body,
    /// After `facet`.
    ExpectNormal,
    /// Collecting the three normal components.
    NormalValues,
    /// After the normal, before `outer loop`.
    ExpectOuter,
    ExpectLoop,
    /// Inside the loop: `vertex` or `endloop`.
    InLoop,
    /// Collecting the three components of one vertex.
    VertexValues,
    /// After `endloop`.
    ExpectEndFacet,
    /// Skipping the rest of the `endsolid` line.
    EndSolidTrail,
}

fn unexpected(state: ParseState, slice: &str, line: usize) -> StlFixError {
    StlFixError::ParseError(format!(
        "Unexpected token {slice:?} in state {state:?} at line {line}"
    ))
}

pub fn parse(text: &str) -> Result<Mesh, StlFixError> {
    let mut lex = Token::lexer(text);
    let mut state = ParseState::Start;
    let mut line = 1_usize;

    let mut header = String::new();
    let mut first_solid = true;
    let mut facets = Vec::<Facet>::new();
    let mut numbers = Vec::<f32>::with_capacity(3);
    let mut normal = Vec3::ZERO;
    let mut vertices = Vec::<Vec3>::with_capacity(3);

    while let Some(token) = lex.next() {
        let token = token.map_err(|()| {
            StlFixError::ParseError(format!("Unrecognized input near line {line}"))
        })?;
        if token == Token::Eol {
            line += 1;
        }
        match state {
            ParseState::Start => match token {
                Token::Solid => {
                    state = ParseState::SolidName;
                }
                Token::Eol => {}
                _ => return Err(unexpected(state, lex.slice(), line)),
            },
            ParseState::SolidName => match token {
                Token::Eol => state = ParseState::Body,
                _ => {
                    if first_solid {
                        if !header.is_empty() {
                            header.push(' ');
                        }
                        header.push_str(lex.slice());
                    }
                }
            },
            ParseState::Body => match token {
                Token::Facet => state = ParseState::ExpectNormal,
                Token::EndSolid => {
                    first_solid = false;
                    state = ParseState::EndSolidTrail;
                }
                Token::Eol => {}
                _ => return Err(unexpected(state, lex.slice(), line)),
            },
            ParseState::ExpectNormal => match token {
                Token::Normal => {
                    numbers.clear();
                    state = ParseState::NormalValues;
                }
                Token::Eol => {}
                _ => return Err(unexpected(state, lex.slice(), line)),
            },
            ParseState::NormalValues => match token {
                Token::Number => {
                    numbers.push(parse_number(lex.slice(), line)?);
                    if numbers.len() == 3 {
                        normal = Vec3::new(numbers[0], numbers[1], numbers[2]);
                        vertices.clear();
                        state = ParseState::ExpectOuter;
                    }
                }
                Token::Eol => {}
                _ => return Err(unexpected(state, lex.slice(), line)),
            },
            ParseState::ExpectOuter => match token {
                Token::Outer => state = ParseState::ExpectLoop,
                Token::Eol => {}
                _ => return Err(unexpected(state, lex.slice(), line)),
            },
            ParseState::ExpectLoop => match token {
                Token::Loop => state = ParseState::InLoop,
                Token::Eol => {}
                _ => return Err(unexpected(state, lex.slice(), line)),
            },
            ParseState::InLoop => match token {
                Token::Vertex => {
                    if vertices.len() == 3 {
                        return Err(StlFixError::ParseError(format!(
                            "More than three vertices in a facet at line {line}"
                        )));
                    }
                    numbers.clear();
                    state = ParseState::VertexValues;
                }
                Token::EndLoop => {
                    if vertices.len() != 3 {
                        return Err(StlFixError::ParseError(format!(
                            "Facet with {} vertices at line {line}",
                            vertices.len()
                        )));
                    }
                    state = ParseState::ExpectEndFacet;
                }
                Token::Eol => {}
                _ => return Err(unexpected(state, lex.slice(), line)),
            },
            ParseState::VertexValues => match token {
                Token::Number => {
                    numbers.push(parse_number(lex.slice(), line)?);
                    if numbers.len() == 3 {
                        vertices.push(Vec3::new(numbers[0], numbers[1], numbers[2]));
                        state = ParseState::InLoop;
                    }
                }
                Token::Eol => {}
                _ => return Err(unexpected(state, lex.slice(), line)),
            },
            ParseState::ExpectEndFacet => match token {
                Token::EndFacet => {
                    facets.push(Facet::new(normal, [vertices[0], vertices[1], vertices[2]]));
                    state = ParseState::Body;
                }
                Token::Eol => {}
                _ => return Err(unexpected(state, lex.slice(), line)),
            },
            ParseState::EndSolidTrail => match token {
                // files may hold several solids, all facets are kept
                Token::Eol => state = ParseState::Start,
                _ => {}
            },
        }
    }

    match state {
        ParseState::Start | ParseState::Body | ParseState::EndSolidTrail => {
            Ok(Mesh::from_facets(header, StlType::Ascii, facets))
        }
        _ => Err(StlFixError::ParseError(format!(
            "Unexpected end of file in state {state:?} at line {line}"
        ))),
    }
}

fn parse_number(slice: &str, line: usize) -> Result<f32, StlFixError> {
    slice
        .parse::<f32>()
        .map_err(|e| StlFixError::ParseError(format!("Bad number {slice:?} at line {line}: {e}")))
}

pub fn write<W: std::io::Write>(mesh: &Mesh, out: &mut W, label: &str) -> Result<(), StlFixError> {
    let mut buffer = ryu::Buffer::new();
    writeln!(out, "solid  {label}")?;
    for facet in mesh.facets() {
        write!(out, "  facet normal")?;
        for c in [facet.normal.x, facet.normal.y, facet.normal.z] {
            write!(out, " {}", buffer.format(c))?;
        }
        writeln!(out)?;
        writeln!(out, "    outer loop")?;
        for vertex in &facet.vertices {
            write!(out, "      vertex")?;
            for c in [vertex.x, vertex.y, vertex.z] {
                write!(out, " {}", buffer.format(c))?;
            }
            writeln!(out)?;
        }
        writeln!(out, "    endloop")?;
        writeln!(out, "  endfacet")?;
    }
    writeln!(out, "endsolid  {label}")?;
    Ok(())
}
