/// Toe-in stereo pair derivation
use std::f64::consts::FRAC_PI_2;

use crate::transform::{Axis, Matrix4, Transform};

/// Per-eye model transforms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeMatrices {
    pub left: Matrix4,
    pub right: Matrix4,
}

impl EyeMatrices {
    /// Both eyes see exactly `main`
    pub fn mono(main: Matrix4) -> Self {
        Self {
            left: main,
            right: main,
        }
    }
}

impl Default for EyeMatrices {
    fn default() -> Self {
        Self::mono(Matrix4::identity())
    }
}

/// Derives the left/right eye matrices from the shared main matrix.
///
/// Each eye sits `eye_distance / 2` off the view axis and is turned inward
/// so both converge on a point `eye_target` away.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StereoProjector {
    pub eye_distance: f64,
    pub eye_target: f64,
}

impl StereoProjector {
    pub fn new(eye_distance: f64, eye_target: f64) -> Self {
        Self {
            eye_distance,
            eye_target,
        }
    }

    /// Half toe-in angle in radians; zero separation is a mono view.
    pub fn toe_in(&self) -> f64 {
        if self.eye_distance == 0.0 {
            return 0.0;
        }
        FRAC_PI_2 - self.eye_target.atan2(self.eye_distance / 2.0)
    }

    pub fn eye_matrices(&self, main: &Matrix4) -> EyeMatrices {
        let a = self.toe_in();
        let half = self.eye_distance / 2.0;

        let left =
            Transform::translation(half, 0.0, 0.0) * Transform::axis_rotation(a, Axis::Y) * main;
        let right =
            Transform::translation(-half, 0.0, 0.0) * Transform::axis_rotation(-a, Axis::Y) * main;
        EyeMatrices { left, right }
    }
}

impl Default for StereoProjector {
    fn default() -> Self {
        Self::new(0.1, 7.0)
    }
}
