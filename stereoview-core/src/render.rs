/// Draw-call seam between the viewer and a rasterizing backend
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::camera::ViewRect;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const CYAN: Rgb = Rgb::new(0, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Per-channel sum, saturating at 255
    pub fn saturating_add(self, other: Rgb) -> Rgb {
        Rgb {
            r: self.r.saturating_add(other.r),
            g: self.g.saturating_add(other.g),
            b: self.b.saturating_add(other.b),
        }
    }

    /// Combine `src` onto `self` the way a draw call with `mode` would
    pub fn blend(self, src: Rgb, mode: BlendMode) -> Rgb {
        match mode {
            BlendMode::Replace => src,
            BlendMode::Additive => self.saturating_add(src),
        }
    }

    pub fn is_black(&self) -> bool {
        *self == Rgb::BLACK
    }
}

/// Color pair for the two eyes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EyeColors {
    pub left: Rgb,
    pub right: Rgb,
}

impl Default for EyeColors {
    fn default() -> Self {
        Self {
            left: Rgb::RED,
            right: Rgb::CYAN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    Replace,
    /// Source and destination add; overlapping red/cyan lines combine
    Additive,
}

/// One endpoint of a projected line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineVertex {
    pub position: Point2<f64>,
    pub color: Rgb,
}

/// A surface that can draw line lists
pub trait RenderBackend {
    /// Output size in pixels
    fn size(&self) -> (u32, u32);

    fn clear(&mut self, color: Rgb);

    /// Region of the logical line plane that maps onto the whole surface
    fn set_viewport(&mut self, rect: ViewRect);

    /// Draw `vertices` as a line list: each consecutive pair is one line
    fn draw_lines(&mut self, vertices: &[LineVertex], mode: BlendMode);
}
