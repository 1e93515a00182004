//! The stereo viewer state and its control-loop operations.
//!
//! [`StereoViewer`] owns every piece of mutable view state and threads it
//! through input handling, the per-tick inertial update and drawing. The
//! window system feeds it [`InputEvent`]s; a [`RenderBackend`] draws the two
//! eye buffers.

use std::sync::Arc;

use log::{debug, info};

use crate::builder::{EyeBuffers, ProjectionBuilder};
use crate::camera::{aspect_ratio, Camera2D, Direction, ViewRect};
use crate::config::ViewerConfig;
use crate::error::Result;
use crate::geometry::{bounding_center, Point, Section};
use crate::inertia::InertialRotationController;
use crate::render::{BlendMode, EyeColors, RenderBackend, Rgb};
use crate::stereo::{EyeMatrices, StereoProjector};
use crate::transform::Matrix4;
use crate::view::ViewTransformState;

/// Window-system input, already decoded
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Close,
    ButtonDown { x: f64, y: f64 },
    ButtonUp { x: f64, y: f64 },
    PointerMoved { x: f64, y: f64 },
    Scroll { delta: f64 },
    Key(Direction),
}

/// Source of input events for one control-loop iteration
pub trait EventSource {
    /// Next pending event, or `None` once the queue is drained
    fn poll_event(&mut self) -> Result<Option<InputEvent>>;
}

pub struct StereoViewer {
    view: ViewTransformState,
    projector: StereoProjector,
    inertia: InertialRotationController,
    builder: ProjectionBuilder,
    camera: Camera2D,
    window_size: (u32, u32),
    open: bool,
}

impl StereoViewer {
    pub fn new(config: &ViewerConfig) -> Self {
        let mut camera = Camera2D::new(config.zoom);
        camera.pan_step = config.pan_step;
        camera.zoom_base = config.zoom_base;

        let mut builder = ProjectionBuilder::new();
        builder.set_colors(config.colors);

        Self {
            view: ViewTransformState::new(),
            projector: StereoProjector::new(config.eye_distance, config.eye_target),
            inertia: InertialRotationController::new(config.inertia),
            builder,
            camera,
            window_size: (800, 600),
            open: true,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    pub fn view(&self) -> &ViewTransformState {
        &self.view
    }

    pub fn projector(&self) -> &StereoProjector {
        &self.projector
    }

    pub fn inertia(&self) -> &InertialRotationController {
        &self.inertia
    }

    pub fn eye_matrices(&self) -> &EyeMatrices {
        self.builder.eye_matrices()
    }

    pub fn colors(&self) -> &EyeColors {
        self.builder.colors()
    }

    pub fn center(&self) -> &Point {
        self.view.center()
    }

    pub fn sections(&self) -> &Arc<[Section]> {
        self.builder.sections()
    }

    pub fn buffers(&self) -> Result<&EyeBuffers> {
        self.builder.buffers()
    }

    /// Size of the live window, used when an export keeps its proportions
    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    /// Replace the model and reset all view state.
    ///
    /// The projection runs in the background while the new pivot is
    /// computed; both are complete when this returns.
    pub fn set_data(&mut self, sections: Arc<[Section]>) -> Result<()> {
        self.builder.wait()?;
        self.builder.set_sections(Arc::clone(&sections))?;

        self.view.reset();
        self.inertia.halt();
        self.camera.reset_offsets();

        self.update_eye_matrices();
        self.builder.async_calculate()?;

        let center = bounding_center(&sections);
        self.view.set_center(center);

        self.builder.wait()?;
        info!(
            "loaded {} sections, center ({:.3}, {:.3}, {:.3})",
            sections.len(),
            center.x,
            center.y,
            center.z
        );
        Ok(())
    }

    /// Apply an externally supplied translation/rotation pair
    pub fn update(&mut self, translation: Matrix4, rotation: Matrix4) -> Result<()> {
        self.inertia.halt();
        self.view.set_transform(translation, rotation);
        self.rebuild()
    }

    pub fn set_eye_distance(&mut self, distance: f64) -> Result<()> {
        self.projector.eye_distance = distance;
        self.rebuild()
    }

    pub fn set_eye_focus(&mut self, focus: f64) -> Result<()> {
        self.projector.eye_target = focus;
        self.rebuild()
    }

    pub fn set_colors(&mut self, left: Rgb, right: Rgb) -> Result<()> {
        self.builder.set_colors(EyeColors { left, right });
        self.rebuild()
    }

    /// Dispatch one input event; returns whether it was consumed
    pub fn handle_event(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::Close => {
                self.open = false;
                true
            }
            InputEvent::ButtonDown { x, y } => {
                self.inertia.drag_start(x, y);
                true
            }
            InputEvent::ButtonUp { .. } => {
                self.inertia.drag_end();
                true
            }
            InputEvent::PointerMoved { x, y } => {
                self.inertia.pointer_moved(x, y);
                true
            }
            InputEvent::Scroll { delta } => {
                self.camera.scroll(delta);
                true
            }
            InputEvent::Key(direction) => {
                // pans, but lets the frontend see the key too
                self.camera.pan(direction);
                false
            }
        }
    }

    /// One inertial tick. Rebuilds and returns `true` while still rotating.
    pub fn heartbeat(&mut self) -> Result<bool> {
        let inertia = &mut self.inertia;
        let moving = self.view.update_rotation(|rotation| inertia.heartbeat(rotation));
        if moving {
            self.rebuild()?;
        }
        Ok(moving)
    }

    /// Draw both eye buffers onto `target`.
    ///
    /// With `preserve_window_aspect` the visible region is framed by the live
    /// window's proportions instead of the target's.
    pub fn render_to<B: RenderBackend + ?Sized>(
        &self,
        target: &mut B,
        preserve_window_aspect: bool,
    ) -> Result<()> {
        let buffers = self.builder.buffers()?;

        target.clear(Rgb::BLACK);
        target.set_viewport(self.viewport_for(target.size(), preserve_window_aspect));
        target.draw_lines(&buffers.left, BlendMode::Additive);
        target.draw_lines(&buffers.right, BlendMode::Additive);
        Ok(())
    }

    /// Visible region for a surface of `size`
    pub fn viewport_for(&self, size: (u32, u32), preserve_window_aspect: bool) -> ViewRect {
        let (w, h) = if preserve_window_aspect { self.window_size } else { size };
        self.camera.view_rect(aspect_ratio(w, h))
    }

    /// One control-loop iteration: drain input, tick, paint.
    /// Returns `false` once the viewer has been closed.
    pub fn process_events<S, B>(&mut self, source: &mut S, target: &mut B) -> Result<bool>
    where
        S: EventSource + ?Sized,
        B: RenderBackend + ?Sized,
    {
        if !self.open {
            return Ok(false);
        }
        while let Some(event) = source.poll_event()? {
            if !self.handle_event(event) {
                debug!("unconsumed event {:?}", event);
            }
        }
        if !self.open {
            return Ok(false);
        }

        self.heartbeat()?;
        self.render_to(target, false)?;
        Ok(true)
    }

    fn update_eye_matrices(&mut self) {
        let eyes = self.projector.eye_matrices(self.view.main());
        self.builder.set_eye_matrices(eyes);
    }

    fn rebuild(&mut self) -> Result<()> {
        self.update_eye_matrices();
        self.builder.calculate()
    }
}

impl Default for StereoViewer {
    fn default() -> Self {
        Self::new(&ViewerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::cube_wireframe;
    use crate::inertia::RotationVelocity;
    use crate::transform::{Axis, Transform};
    use approx::assert_relative_eq;

    fn unit_cube() -> Arc<[Section]> {
        Arc::from(cube_wireframe(Point::origin(), Point::new(1.0, 1.0, 1.0)))
    }

    #[test]
    fn test_set_data_resets_and_centers() {
        let mut viewer = StereoViewer::default();
        viewer
            .update(Transform::translation(1.0, 2.0, 3.0), Transform::axis_rotation(0.5, Axis::X))
            .unwrap();
        viewer.handle_event(InputEvent::Key(Direction::Up));

        viewer.set_data(unit_cube()).unwrap();

        assert_eq!(*viewer.view().translation(), Matrix4::identity());
        assert_eq!(*viewer.view().rotation(), Matrix4::identity());
        assert_eq!(viewer.camera().offset_y, 0.0);
        assert!(viewer.inertia().is_at_rest());
        assert_relative_eq!(*viewer.center(), Point::new(0.5, 0.5, 0.5));

        let buffers = viewer.buffers().unwrap();
        assert_eq!(buffers.left.len(), 24);
        assert_eq!(buffers.right.len(), 24);
    }

    #[test]
    fn test_set_data_with_empty_model() {
        let mut viewer = StereoViewer::default();
        viewer.set_data(Arc::from(Vec::new())).unwrap();
        assert_eq!(*viewer.center(), Point::origin());
        assert!(viewer.buffers().unwrap().is_empty());
    }

    #[test]
    fn test_heartbeat_rebuilds_while_moving() {
        let mut viewer = StereoViewer::default();
        viewer.set_data(unit_cube()).unwrap();
        let before = viewer.buffers().unwrap().clone();

        viewer.handle_event(InputEvent::ButtonDown { x: 0.0, y: 0.0 });
        viewer.handle_event(InputEvent::PointerMoved { x: 30.0, y: 0.0 });
        viewer.handle_event(InputEvent::ButtonUp { x: 30.0, y: 0.0 });

        assert!(viewer.heartbeat().unwrap());
        assert_ne!(viewer.buffers().unwrap(), &before);

        let mut ticks = 0;
        while viewer.heartbeat().unwrap() {
            ticks += 1;
            assert!(ticks < 10_000);
        }
        assert!(!viewer.heartbeat().unwrap());
    }

    #[test]
    fn test_resting_rotation_is_about_center() {
        let mut viewer = StereoViewer::default();
        viewer.set_data(unit_cube()).unwrap();
        viewer.set_eye_distance(0.0).unwrap();

        viewer.inertia.set_velocity(RotationVelocity { speed_x: 50.0, speed_y: 20.0 });
        viewer.heartbeat().unwrap();

        let center = viewer.view().main().transform_point(&Point::new(0.5, 0.5, 0.5));
        assert_relative_eq!(center, Point::new(0.5, 0.5, 0.5), epsilon = 1e-12);
    }

    #[test]
    fn test_update_halts_inertia() {
        let mut viewer = StereoViewer::default();
        viewer.inertia.set_velocity(RotationVelocity { speed_x: 5.0, speed_y: 5.0 });
        viewer.update(Matrix4::identity(), Matrix4::identity()).unwrap();
        assert!(viewer.inertia().is_at_rest());
    }

    #[test]
    fn test_settings_rebuild_eagerly() {
        let mut viewer = StereoViewer::default();
        viewer.set_data(unit_cube()).unwrap();

        viewer.set_eye_distance(0.0).unwrap();
        let eyes = *viewer.eye_matrices();
        assert_eq!(eyes.left, eyes.right);
        let buffers = viewer.buffers().unwrap();
        assert_eq!(
            buffers.left.iter().map(|v| v.position).collect::<Vec<_>>(),
            buffers.right.iter().map(|v| v.position).collect::<Vec<_>>()
        );

        viewer.set_eye_focus(2.0).unwrap();
        assert_eq!(viewer.projector().eye_target, 2.0);

        viewer.set_colors(Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)).unwrap();
        assert!(viewer.buffers().unwrap().left.iter().all(|v| v.color == Rgb::new(1, 2, 3)));
        assert!(viewer.buffers().unwrap().right.iter().all(|v| v.color == Rgb::new(4, 5, 6)));
    }

    #[test]
    fn test_key_pans_but_is_not_consumed() {
        let mut viewer = StereoViewer::default();
        assert!(!viewer.handle_event(InputEvent::Key(Direction::Left)));
        assert_relative_eq!(viewer.camera().offset_x, 0.3, epsilon = 1e-12);
        assert!(viewer.handle_event(InputEvent::Scroll { delta: 1.0 }));
        assert_relative_eq!(viewer.camera().zoom, 5.4, epsilon = 1e-12);
    }

    #[test]
    fn test_viewport_respects_window_aspect() {
        let mut viewer = StereoViewer::default();
        viewer.set_window_size(400, 200);
        let own = viewer.viewport_for((100, 100), false);
        let windowed = viewer.viewport_for((100, 100), true);
        assert_relative_eq!(own.width, 6.0);
        assert_relative_eq!(windowed.width, 12.0);
        assert_relative_eq!(windowed.height, 6.0);
    }
}
