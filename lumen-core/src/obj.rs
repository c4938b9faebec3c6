/// Importer for the text mesh format (`v`, `vt`, `vn` and `f` records)
///
/// Faces are fan-triangulated from their first vertex. Each distinct
/// `position/uv/normal` combination becomes exactly one output vertex, so two
/// face tokens with the same triple always share an index.
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{info, warn};
use nalgebra::{Point2, Point3, Vector3};
use nom::{
    bytes::complete::take_till1,
    character::complete::{char, space0, space1, u32 as index},
    combinator::{all_consuming, opt},
    multi::many_m_n,
    number::complete::float,
    sequence::{pair, preceded},
    IResult,
};

use crate::error::{FaceError, ImportError};
use crate::geometry::{Geometry, Vertex};

/// Zero-based references into the raw attribute arrays.
///
/// Components omitted in the face token (`i`, `i/j`, `i//k`) are `None`
/// and resolve to a zero texture coordinate or zero normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceKey {
    pub position: usize,
    pub tex_coord: Option<usize>,
    pub normal: Option<usize>,
}

/// Parse mesh text held in memory
pub fn parse_obj(input: &str) -> Result<Geometry, ImportError> {
    ObjBuilder::new(Vector3::repeat(1.0)).parse(input, "<memory>")
}

/// Parse mesh text, scaling positions by `scale` while reading.
///
/// Normals are multiplied by the inverse scale and renormalised, which is the
/// inverse-transpose for an axis-aligned scale. Scale components must be non-zero.
pub fn parse_obj_scaled(input: &str, scale: Vector3<f32>) -> Result<Geometry, ImportError> {
    ObjBuilder::new(scale).parse(input, "<memory>")
}

/// Load and parse a mesh file
pub fn load_obj(path: impl AsRef<Path>) -> Result<Geometry, ImportError> {
    load_obj_scaled(path, Vector3::repeat(1.0))
}

/// Load a mesh file with per-axis scaling, used to flatten a cube into a platform
pub fn load_obj_scaled(path: impl AsRef<Path>, scale: Vector3<f32>) -> Result<Geometry, ImportError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    // Stray non-UTF-8 bytes only spoil the line they sit on
    let text = String::from_utf8_lossy(&bytes);
    ObjBuilder::new(scale).parse(&text, &path.display().to_string())
}

#[derive(Debug)]
enum Record<'a> {
    Position(Vec<f32>),
    TexCoord(Vec<f32>),
    Normal(Vec<f32>),
    Face(Vec<&'a str>),
    Other,
}

struct ObjBuilder {
    scale: Vector3<f32>,
    positions: Vec<Point3<f32>>,
    tex_coords: Vec<Point2<f32>>,
    normals: Vec<Vector3<f32>>,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    cache: HashMap<FaceKey, u32>,
}

impl ObjBuilder {
    fn new(scale: Vector3<f32>) -> Self {
        Self {
            scale,
            positions: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            vertices: Vec::new(),
            indices: Vec::new(),
            cache: HashMap::new(),
        }
    }

    fn parse(mut self, input: &str, source_name: &str) -> Result<Geometry, ImportError> {
        let mut skipped = 0usize;

        for (line_no, line) in input.lines().enumerate() {
            let record = match parse_record(line) {
                Ok((_, record)) => record,
                Err(_) => continue, // blank line
            };

            match record {
                Record::Position(values) => {
                    let [x, y, z] = components::<3>(&values, line_no, "v");
                    self.positions
                        .push(Point3::new(x * self.scale.x, y * self.scale.y, z * self.scale.z));
                }
                Record::TexCoord(values) => {
                    let [u, v] = components::<2>(&values, line_no, "vt");
                    self.tex_coords.push(Point2::new(u, 1.0 - v));
                }
                Record::Normal(values) => {
                    let [x, y, z] = components::<3>(&values, line_no, "vn");
                    let normal = Vector3::new(x, y, z).component_div(&self.scale);
                    let length = normal.norm();
                    self.normals
                        .push(if length > 1e-4 { normal / length } else { normal });
                }
                Record::Face(tokens) => {
                    if let Err(e) = self.push_face(&tokens) {
                        warn!("{}:{}: {}, skipping face", source_name, line_no + 1, e);
                        skipped += 1;
                    }
                }
                Record::Other => {}
            }
        }

        let geometry = Geometry::from_parts(self.vertices, self.indices);
        if geometry.is_empty() {
            return Err(ImportError::Empty {
                source_name: source_name.to_string(),
            });
        }

        info!(
            "Imported {}: {} vertices, {} triangles ({} faces skipped)",
            source_name,
            geometry.vertices().len(),
            geometry.triangle_count(),
            skipped
        );

        Ok(geometry)
    }

    /// Validate the whole face before touching the output buffers, so a bad
    /// token never leaves a partial polygon behind.
    fn push_face(&mut self, tokens: &[&str]) -> Result<(), FaceError> {
        if tokens.len() < 3 {
            return Err(FaceError::TooFewVertices(tokens.len()));
        }

        let keys = tokens
            .iter()
            .map(|token| parse_face_key(token))
            .collect::<Result<Vec<_>, _>>()?;
        for key in &keys {
            self.check_bounds(key)?;
        }

        output_index(self.vertices.len() + keys.len() - 1)?;

        let resolved = keys
            .into_iter()
            .map(|key| self.vertex_index(key))
            .collect::<Result<Vec<_>, _>>()?;
        for i in 1..resolved.len() - 1 {
            self.indices
                .extend_from_slice(&[resolved[0], resolved[i], resolved[i + 1]]);
        }

        Ok(())
    }

    fn check_bounds(&self, key: &FaceKey) -> Result<(), FaceError> {
        let checks = [
            ("position", Some(key.position), self.positions.len()),
            ("texture coordinate", key.tex_coord, self.tex_coords.len()),
            ("normal", key.normal, self.normals.len()),
        ];

        for (attribute, index, len) in checks {
            if let Some(index) = index {
                if index >= len {
                    return Err(FaceError::IndexOutOfRange {
                        attribute,
                        index: index + 1,
                        len,
                    });
                }
            }
        }
        Ok(())
    }

    fn vertex_index(&mut self, key: FaceKey) -> Result<u32, FaceError> {
        if let Some(&index) = self.cache.get(&key) {
            return Ok(index);
        }

        let vertex = Vertex::new(
            self.positions[key.position],
            key.normal.map_or_else(Vector3::zeros, |n| self.normals[n]),
            key.tex_coord.map_or_else(Point2::origin, |t| self.tex_coords[t]),
        );
        let index = output_index(self.vertices.len())?;
        self.vertices.push(vertex);
        self.cache.insert(key, index);
        Ok(index)
    }
}

/// Index buffer entry for the vertex stored at `position`
fn output_index(position: usize) -> Result<u32, FaceError> {
    u32::try_from(position).map_err(|_| FaceError::IndexOverflow(position))
}

/// Take the first `N` values of a record, padding missing ones with zero
fn components<const N: usize>(values: &[f32], line_no: usize, prefix: &str) -> [f32; N] {
    if values.len() < N {
        warn!(
            "line {}: `{}` record has {} components, expected {}",
            line_no + 1,
            prefix,
            values.len(),
            N
        );
    }
    let mut out = [0.0; N];
    for (slot, value) in out.iter_mut().zip(values) {
        *slot = *value;
    }
    out
}

fn parse_record(input: &str) -> IResult<&str, Record<'_>> {
    let (input, _) = space0(input)?;
    let (rest, prefix) = take_till1(|c: char| c.is_whitespace())(input)?;

    let record = match prefix {
        "v" => Record::Position(floats(rest, 3)),
        "vt" => Record::TexCoord(floats(rest, 3)),
        "vn" => Record::Normal(floats(rest, 3)),
        "f" => Record::Face(rest.split_whitespace().collect()),
        _ => Record::Other,
    };
    Ok(("", record))
}

fn floats(input: &str, max: usize) -> Vec<f32> {
    let parsed: IResult<&str, Vec<f32>> = many_m_n(0, max, preceded(space1, float))(input);
    parsed.map(|(_, values)| values).unwrap_or_default()
}

/// `i`, `i/j`, `i/j/k` or `i//k`, all 1-based
fn face_token(input: &str) -> IResult<&str, (u32, Option<u32>, Option<u32>)> {
    let (input, position) = index(input)?;
    let (input, tail) = opt(preceded(
        char('/'),
        pair(opt(index), opt(preceded(char('/'), opt(index)))),
    ))(input)?;

    let (tex_coord, normal) = match tail {
        Some((tex_coord, normal)) => (tex_coord, normal.flatten()),
        None => (None, None),
    };
    Ok((input, (position, tex_coord, normal)))
}

fn parse_face_key(token: &str) -> Result<FaceKey, FaceError> {
    let malformed = || FaceError::MalformedToken(token.to_string());

    let (_, (position, tex_coord, normal)) = all_consuming(face_token)(token).map_err(|_| malformed())?;

    let zero_based = |i: u32| (i as usize).checked_sub(1);
    Ok(FaceKey {
        position: zero_based(position).ok_or_else(malformed)?,
        tex_coord: tex_coord.map(|i| zero_based(i).ok_or_else(malformed)).transpose()?,
        normal: normal.map(|i| zero_based(i).ok_or_else(malformed)).transpose()?,
    })
}
