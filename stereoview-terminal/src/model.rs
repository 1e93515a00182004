//! Line-model loading: STL wireframes, plain segment lists and a built-in cube.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::info;
use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, multispace1, not_line_ending, space0, space1},
    combinator::{all_consuming, opt},
    multi::many0,
    number::complete::double,
    sequence::{preceded, terminated},
    IResult,
};
use stereoview_core::{Point, Section};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid STL: {0}")]
    Stl(String),

    #[error("line {line}: {message}")]
    Segment { line: usize, message: String },
}

pub type Triangle = [Point; 3];

/// Load a model from disk, choosing the format by extension
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<Vec<Section>, ModelError> {
    let path = path.as_ref();
    let is_stl = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("stl"))
        .unwrap_or(false);

    let sections = if is_stl {
        let triangles = parse_stl(&fs::read(path)?)?;
        wireframe(&triangles)
    } else {
        parse_segments(&fs::read_to_string(path)?)?
    };

    info!("loaded {} segments from {}", sections.len(), path.display());
    Ok(sections)
}

/// Unit cube used when no model is given
pub fn demo_cube() -> Vec<Section> {
    stereoview_core::geometry::cube_wireframe(
        Point::new(-1.0, -1.0, -1.0),
        Point::new(1.0, 1.0, 1.0),
    )
}

/// Unique triangle edges, in first-seen order
pub fn wireframe(triangles: &[Triangle]) -> Vec<Section> {
    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    for triangle in triangles {
        for i in 0..3 {
            let edge = Section::new(triangle[i], triangle[(i + 1) % 3]);
            if seen.insert(edge_key(&edge)) {
                edges.push(edge);
            }
        }
    }
    edges
}

type PointKey = [u64; 3];

fn point_key(p: &Point) -> PointKey {
    // fold -0.0 into 0.0 so mirrored facets share edges
    [p.x + 0.0, p.y + 0.0, p.z + 0.0].map(f64::to_bits)
}

fn edge_key(edge: &Section) -> (PointKey, PointKey) {
    let (a, b) = (point_key(&edge.begin), point_key(&edge.end));
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Parse a plain segment list: one `x1 y1 z1 x2 y2 z2` per line, `#` starts
/// a comment, blank lines are skipped.
pub fn parse_segments(input: &str) -> Result<Vec<Section>, ModelError> {
    let mut sections = Vec::new();
    for (index, raw) in input.lines().enumerate() {
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }
        match all_consuming(segment_line)(content) {
            Ok((_, section)) => sections.push(section),
            Err(e) => {
                return Err(ModelError::Segment {
                    line: index + 1,
                    message: format!("expected six numbers ({})", e),
                })
            }
        }
    }
    Ok(sections)
}

fn segment_line(input: &str) -> IResult<&str, Section> {
    let (input, begin) = point3(input)?;
    let (input, _) = space1(input)?;
    let (input, end) = point3(input)?;
    let (input, _) = space0(input)?;
    Ok((input, Section::new(begin, end)))
}

fn point3(input: &str) -> IResult<&str, Point> {
    let (input, x) = double(input)?;
    let (input, y) = preceded(space1, double)(input)?;
    let (input, z) = preceded(space1, double)(input)?;
    Ok((input, Point::new(x, y, z)))
}

/// Detect and parse an STL file (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<Vec<Triangle>, ModelError> {
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(triangles) = parse_ascii_stl(text) {
                return Ok(triangles);
            }
        }
    }
    parse_binary_stl(data)
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Vec<Triangle>, ModelError> {
    const HEADER: usize = 80;
    const FACET: usize = 50;

    if data.len() < HEADER + 4 {
        return Err(ModelError::Stl("file too small to be a valid STL".into()));
    }
    let count = u32::from_le_bytes([data[80], data[81], data[82], data[83]]) as usize;
    let body = &data[HEADER + 4..];
    if body.len() < count * FACET {
        return Err(ModelError::Stl(format!(
            "expected {} facets, found {} bytes",
            count,
            body.len()
        )));
    }

    let read_f32 =
        |bytes: &[u8]| f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64;
    let triangles = body
        .chunks_exact(FACET)
        .take(count)
        .map(|facet| {
            // skip the 12-byte normal and the trailing attribute count
            let vertex = |i: usize| {
                let at = 12 + i * 12;
                Point::new(
                    read_f32(&facet[at..]),
                    read_f32(&facet[at + 4..]),
                    read_f32(&facet[at + 8..]),
                )
            };
            [vertex(0), vertex(1), vertex(2)]
        })
        .collect();
    Ok(triangles)
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Vec<Triangle>, ModelError> {
    match parse_ascii_stl_impl(input) {
        Ok((_, triangles)) => Ok(triangles),
        Err(e) => Err(ModelError::Stl(format!("failed to parse ASCII STL: {:?}", e))),
    }
}

fn parse_ascii_stl_impl(input: &str) -> IResult<&str, Vec<Triangle>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _) = not_line_ending(input)?;
    let (input, triangles) = many0(parse_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    let (input, _) = opt(terminated(not_line_ending, multispace0))(input)?;
    Ok((input, triangles))
}

fn parse_facet(input: &str) -> IResult<&str, Triangle> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _) = parse_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v1) = parse_vertex(input)?;
    let (input, v2) = parse_vertex(input)?;
    let (input, v3) = parse_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;
    Ok((input, [v1, v2, v3]))
}

fn parse_vertex(input: &str) -> IResult<&str, Point> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    parse_vector3(input)
}

fn parse_vector3(input: &str) -> IResult<&str, Point> {
    let (input, _) = multispace0(input)?;
    let (input, x) = double(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = double(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = double(input)?;
    Ok((input, Point::new(x, y, z)))
}
