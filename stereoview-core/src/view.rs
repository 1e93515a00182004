/// Model translation/rotation state and the derived main matrix
use crate::geometry::Point;
use crate::transform::{Matrix4, Transform};

/// Owns the translation and rotation applied to the model.
///
/// `main = translation * move_to(center) * rotation * move_to(-center)` is
/// recomputed by every setter, so the model always spins about its own
/// bounding-box center.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewTransformState {
    translation: Matrix4,
    rotation: Matrix4,
    center: Point,
    main: Matrix4,
}

impl ViewTransformState {
    pub fn new() -> Self {
        Self {
            translation: Matrix4::identity(),
            rotation: Matrix4::identity(),
            center: Point::origin(),
            main: Matrix4::identity(),
        }
    }

    pub fn translation(&self) -> &Matrix4 {
        &self.translation
    }

    pub fn rotation(&self) -> &Matrix4 {
        &self.rotation
    }

    pub fn center(&self) -> &Point {
        &self.center
    }

    pub fn main(&self) -> &Matrix4 {
        &self.main
    }

    pub fn set_center(&mut self, center: Point) {
        self.center = center;
        self.recompute();
    }

    pub fn set_transform(&mut self, translation: Matrix4, rotation: Matrix4) {
        self.translation = translation;
        self.rotation = rotation;
        self.recompute();
    }

    /// Mutate the rotation in place (e.g. one inertial tick)
    pub fn update_rotation<R>(&mut self, f: impl FnOnce(&mut Matrix4) -> R) -> R {
        let result = f(&mut self.rotation);
        self.recompute();
        result
    }

    /// Identity translation and rotation. The center is kept until the next
    /// data set supplies a new one.
    pub fn reset(&mut self) {
        self.translation = Matrix4::identity();
        self.rotation = Matrix4::identity();
        self.recompute();
    }

    fn recompute(&mut self) {
        let to_center = Transform::move_to(&self.center);
        let from_center = Transform::translation(-self.center.x, -self.center.y, -self.center.z);
        self.main = self.translation * to_center * self.rotation * from_center;
    }
}

impl Default for ViewTransformState {
    fn default() -> Self {
        Self::new()
    }
}
