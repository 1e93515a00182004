/// Homogeneous 4x4 transforms used by the stereo pipeline
use nalgebra::{Point2, Rotation3, Vector3};

use crate::geometry::Point;

/// Affine homogeneous transform; `a * b` applies `b` first
pub type Matrix4 = nalgebra::Matrix4<f64>;

/// Rotation axis for [`Transform::axis_rotation`].
///
/// Vertical pointer drags rotate about `X`, horizontal drags and the eye
/// toe-in rotate about `Y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Axis::X),
            1 => Some(Axis::Y),
            2 => Some(Axis::Z),
            _ => None,
        }
    }

    fn unit(self) -> nalgebra::Unit<Vector3<f64>> {
        match self {
            Axis::X => Vector3::x_axis(),
            Axis::Y => Vector3::y_axis(),
            Axis::Z => Vector3::z_axis(),
        }
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    pub fn identity() -> Matrix4 {
        Matrix4::identity()
    }

    /// Create a translation matrix
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Matrix4 {
        Matrix4::new_translation(&Vector3::new(dx, dy, dz))
    }

    /// Translation that moves the origin onto `point`
    pub fn move_to(point: &Point) -> Matrix4 {
        Self::translation(point.x, point.y, point.z)
    }

    /// Right-handed rotation by `angle` radians about a single axis
    pub fn axis_rotation(angle: f64, axis: Axis) -> Matrix4 {
        Rotation3::from_axis_angle(&axis.unit(), angle).to_homogeneous()
    }

    /// `a * b`: the transform that applies `b`, then `a`
    pub fn compose(a: &Matrix4, b: &Matrix4) -> Matrix4 {
        a * b
    }

    /// Transform a model point and drop its depth, giving its position on
    /// the 2D line plane.
    pub fn project(matrix: &Matrix4, point: &Point) -> Point2<f64> {
        let p = matrix.transform_point(point);
        Point2::new(p.x, p.y)
    }

    /// True when the bottom row is `[0, 0, 0, 1]`
    pub fn is_affine(matrix: &Matrix4) -> bool {
        let row = matrix.row(3);
        row[0] == 0.0 && row[1] == 0.0 && row[2] == 0.0 && row[3] == 1.0
    }
}
