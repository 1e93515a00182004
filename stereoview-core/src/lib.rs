//! Stereoview Core Library - stereo projection pipeline for line models
//!
//! This library turns a 3D line-segment model into two pre-projected 2D line
//! lists, one per eye, meant to be drawn with additive blending. It covers
//! the transform math, the toe-in stereo pair, inertial rotation, the
//! background projection builder and the 2D zoom/pan camera.

pub mod builder;
pub mod camera;
pub mod config;
pub mod error;
pub mod geometry;
pub mod inertia;
pub mod render;
pub mod stereo;
pub mod transform;
pub mod view;
pub mod viewer;

// Re-export commonly used types
pub use builder::{EyeBuffers, ProjectionBuilder};
pub use camera::{Camera2D, Direction, ViewRect};
pub use config::{ExportConfig, ViewerConfig};
pub use error::{Error, Result};
pub use geometry::{bounding_center, Point, Section};
pub use inertia::{InertiaParams, InertialRotationController, RotationVelocity};
pub use render::{BlendMode, EyeColors, LineVertex, RenderBackend, Rgb};
pub use stereo::{EyeMatrices, StereoProjector};
pub use transform::{Axis, Matrix4, Transform};
pub use view::ViewTransformState;
pub use viewer::{EventSource, InputEvent, StereoViewer};
