/// Geometry primitives for line models
use nalgebra::Point3;

/// A model-space point
pub type Point = Point3<f64>;

/// One 3D line segment of a model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Section {
    pub begin: Point,
    pub end: Point,
}

impl Section {
    pub fn new(begin: Point, end: Point) -> Self {
        Self { begin, end }
    }

    pub fn from_coords(x1: f64, y1: f64, z1: f64, x2: f64, y2: f64, z2: f64) -> Self {
        Self {
            begin: Point::new(x1, y1, z1),
            end: Point::new(x2, y2, z2),
        }
    }
}

/// Axis-aligned bounds of every segment endpoint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Bounds of all endpoints, or `None` for an empty model
    pub fn of(sections: &[Section]) -> Option<Self> {
        let first = sections.first()?;
        let mut bounds = Self {
            min: first.begin,
            max: first.begin,
        };
        for section in sections {
            bounds.include(&section.begin);
            bounds.include(&section.end);
        }
        Some(bounds)
    }

    fn include(&mut self, point: &Point) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    pub fn center(&self) -> Point {
        nalgebra::center(&self.min, &self.max)
    }
}

/// Rotation pivot for a model: the midpoint of its bounding box.
///
/// An empty model has no extent and pivots about the origin.
pub fn bounding_center(sections: &[Section]) -> Point {
    Bounds::of(sections)
        .map(|bounds| bounds.center())
        .unwrap_or_else(Point::origin)
}

/// The twelve edges of an axis-aligned cube spanning `min..=max`
pub fn cube_wireframe(min: Point, max: Point) -> Vec<Section> {
    let corner = |i: usize| {
        Point::new(
            if i & 1 == 0 { min.x } else { max.x },
            if i & 2 == 0 { min.y } else { max.y },
            if i & 4 == 0 { min.z } else { max.z },
        )
    };

    let mut edges = Vec::with_capacity(12);
    for i in 0..8 {
        for bit in [1, 2, 4] {
            if i & bit == 0 {
                edges.push(Section::new(corner(i), corner(i | bit)));
            }
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unit_cube_center() {
        let cube = cube_wireframe(Point::origin(), Point::new(1.0, 1.0, 1.0));
        assert_eq!(cube.len(), 12);

        let center = bounding_center(&cube);
        assert_relative_eq!(center, Point::new(0.5, 0.5, 0.5), epsilon = 1e-12);
    }

    #[test]
    fn test_empty_model_centers_on_origin() {
        assert_eq!(bounding_center(&[]), Point::origin());
        assert!(Bounds::of(&[]).is_none());
    }

    #[test]
    fn test_bounds_ignore_origin_when_model_is_offset() {
        let sections = [Section::from_coords(2.0, 3.0, 4.0, 6.0, 5.0, 8.0)];
        let bounds = Bounds::of(&sections).unwrap();
        assert_eq!(bounds.min, Point::new(2.0, 3.0, 4.0));
        assert_eq!(bounds.max, Point::new(6.0, 5.0, 8.0));
        assert_eq!(bounding_center(&sections), Point::new(4.0, 4.0, 6.0));
    }
}
