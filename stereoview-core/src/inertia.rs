//! Pointer-driven rotation with exponential decay.
//!
//! Drag motion feeds a smoothed angular velocity; every heartbeat applies
//! one incremental rotation and damps the velocity until it snaps to rest.

use serde::{Deserialize, Serialize};

use crate::transform::{Axis, Matrix4, Transform};

/// Tuning constants for [`InertialRotationController`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InertiaParams {
    /// Weight kept from the previous velocity on each drag move
    pub carry: f64,
    /// Weight given to the latest pointer delta on each drag move
    pub follow: f64,
    /// Per-tick velocity multiplier, in (0, 1)
    pub resistance: f64,
    /// Speeds below this snap to zero
    pub rest_threshold: f64,
    /// Pointer units per radian
    pub density: f64,
}

impl InertiaParams {
    pub const CARRY: f64 = 0.1;
    pub const FOLLOW: f64 = 0.9;
    pub const RESISTANCE: f64 = 0.995;
    pub const REST_THRESHOLD: f64 = 0.01;
    pub const DENSITY: f64 = 100.0;
}

impl Default for InertiaParams {
    fn default() -> Self {
        Self {
            carry: Self::CARRY,
            follow: Self::FOLLOW,
            resistance: Self::RESISTANCE,
            rest_threshold: Self::REST_THRESHOLD,
            density: Self::DENSITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationVelocity {
    pub speed_x: f64,
    pub speed_y: f64,
}

impl RotationVelocity {
    pub fn is_zero(&self) -> bool {
        self.speed_x == 0.0 && self.speed_y == 0.0
    }
}

/// Converts pointer drags into a decaying angular velocity
#[derive(Debug, Clone)]
pub struct InertialRotationController {
    params: InertiaParams,
    velocity: RotationVelocity,
    pointer: (f64, f64),
    dragging: bool,
}

impl InertialRotationController {
    pub fn new(params: InertiaParams) -> Self {
        Self {
            params,
            velocity: RotationVelocity::default(),
            pointer: (0.0, 0.0),
            dragging: false,
        }
    }

    pub fn params(&self) -> &InertiaParams {
        &self.params
    }

    pub fn velocity(&self) -> RotationVelocity {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: RotationVelocity) {
        self.velocity = velocity;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_at_rest(&self) -> bool {
        self.velocity.is_zero()
    }

    /// Stop all motion immediately
    pub fn halt(&mut self) {
        self.velocity = RotationVelocity::default();
    }

    /// Button pressed: stop spinning and anchor at the pointer
    pub fn drag_start(&mut self, x: f64, y: f64) {
        self.halt();
        self.pointer = (x, y);
        self.dragging = true;
    }

    pub fn drag_end(&mut self) {
        self.dragging = false;
    }

    /// Pointer moved. Velocity only follows while a button is held, but the
    /// anchor always tracks the pointer.
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        if self.dragging {
            let (dx, dy) = (x - self.pointer.0, y - self.pointer.1);
            let p = &self.params;
            self.velocity.speed_x = self.velocity.speed_x * p.carry + dx * p.follow;
            self.velocity.speed_y = self.velocity.speed_y * p.carry + dy * p.follow;
        }
        self.pointer = (x, y);
    }

    /// Incremental rotation for the current velocity
    pub fn step_rotation(&self) -> Matrix4 {
        let d = self.params.density;
        Transform::axis_rotation(-self.velocity.speed_x / d, Axis::Y)
            * Transform::axis_rotation(self.velocity.speed_y / d, Axis::X)
    }

    /// One tick: rotate, decay, snap. Returns `true` while still moving.
    pub fn heartbeat(&mut self, rotation: &mut Matrix4) -> bool {
        *rotation = self.step_rotation() * *rotation;

        let p = self.params;
        self.velocity.speed_x = settle(self.velocity.speed_x * p.resistance, p.rest_threshold);
        self.velocity.speed_y = settle(self.velocity.speed_y * p.resistance, p.rest_threshold);

        !self.is_at_rest()
    }
}

impl Default for InertialRotationController {
    fn default() -> Self {
        Self::new(InertiaParams::default())
    }
}

fn settle(speed: f64, threshold: f64) -> f64 {
    if speed.abs() < threshold {
        0.0
    } else {
        speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_drag_smoothing() {
        let mut c = InertialRotationController::default();
        c.drag_start(10.0, 10.0);
        c.pointer_moved(20.0, 5.0);
        assert_relative_eq!(c.velocity().speed_x, 9.0, epsilon = 1e-12);
        assert_relative_eq!(c.velocity().speed_y, -4.5, epsilon = 1e-12);

        c.pointer_moved(20.0, 5.0);
        assert_relative_eq!(c.velocity().speed_x, 0.9, epsilon = 1e-12);
        assert_relative_eq!(c.velocity().speed_y, -0.45, epsilon = 1e-12);
    }

    #[test]
    fn test_move_without_button_only_tracks_pointer() {
        let mut c = InertialRotationController::default();
        c.pointer_moved(50.0, 50.0);
        assert!(c.is_at_rest());

        c.drag_start(0.0, 0.0);
        c.drag_end();
        c.pointer_moved(30.0, 0.0);
        assert!(c.is_at_rest());
    }

    #[test]
    fn test_drag_start_resets_velocity() {
        let mut c = InertialRotationController::default();
        c.set_velocity(RotationVelocity { speed_x: 12.0, speed_y: -3.0 });
        c.drag_start(1.0, 1.0);
        assert!(c.is_at_rest());
        assert!(c.is_dragging());
    }

    #[test]
    fn test_decay_reaches_rest() {
        let mut c = InertialRotationController::default();
        let speed0: f64 = 40.0;
        c.set_velocity(RotationVelocity { speed_x: speed0, speed_y: -speed0 / 2.0 });
        let bound = ((0.01 / speed0).ln() / 0.995f64.ln()).ceil() as usize + 1;

        let mut rotation = Matrix4::identity();
        let mut ticks = 0;
        while c.heartbeat(&mut rotation) {
            ticks += 1;
            assert!(ticks <= bound, "no rest after {} ticks", ticks);
        }
        assert!(c.is_at_rest());

        // resting is idempotent and no longer rotates
        let before = rotation;
        assert!(!c.heartbeat(&mut rotation));
        assert_eq!(c.velocity(), RotationVelocity::default());
        assert_eq!(rotation, before);
    }

    #[test]
    fn test_heartbeat_rotates_by_velocity() {
        let mut c = InertialRotationController::default();
        c.set_velocity(RotationVelocity { speed_x: 100.0, speed_y: 0.0 });
        let mut rotation = Matrix4::identity();
        assert!(c.heartbeat(&mut rotation));

        assert_relative_eq!(rotation, Transform::axis_rotation(-1.0, Axis::Y), epsilon = 1e-12);
        assert_relative_eq!(c.velocity().speed_x, 99.5, epsilon = 1e-12);
    }

    #[test]
    fn test_small_speed_snaps_to_zero() {
        let mut c = InertialRotationController::default();
        c.set_velocity(RotationVelocity { speed_x: 0.01, speed_y: 0.0 });
        let mut rotation = Matrix4::identity();
        assert!(!c.heartbeat(&mut rotation));
        assert!(c.is_at_rest());
    }

    #[test]
    fn test_params_are_overridable() {
        let params = InertiaParams { resistance: 0.5, ..InertiaParams::default() };
        let mut c = InertialRotationController::new(params);
        c.set_velocity(RotationVelocity { speed_x: 1.0, speed_y: 0.0 });
        let mut rotation = Matrix4::identity();
        c.heartbeat(&mut rotation);
        assert_relative_eq!(c.velocity().speed_x, 0.5, epsilon = 1e-12);
    }
}
