/// Zoom/pan mapping of the 2D line plane onto an output surface
use log::warn;
use nalgebra::Point2;

/// Pan direction for a single key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Visible region of the line plane, y pointing up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewRect {
    pub left: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewRect {
    pub fn center(&self) -> Point2<f64> {
        Point2::new(self.left + self.width / 2.0, self.bottom + self.height / 2.0)
    }

    /// Map a plane point to pixel coordinates on a `width` x `height`
    /// surface (origin top-left, y down).
    pub fn to_pixel(&self, point: &Point2<f64>, width: u32, height: u32) -> (f64, f64) {
        let (w, h) = (width as f64, height as f64);
        let px = if self.width > 0.0 {
            (point.x - self.left) / self.width * w
        } else {
            w / 2.0
        };
        let py = if self.height > 0.0 {
            (self.bottom + self.height - point.y) / self.height * h
        } else {
            h / 2.0
        };
        (px, py)
    }
}

/// Width over height, with a degenerate size treated as square
pub fn aspect_ratio(width: u32, height: u32) -> f64 {
    if width == 0 || height == 0 {
        1.0
    } else {
        width as f64 / height as f64
    }
}

/// 2D camera over the projected line buffers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera2D {
    /// Height of the visible region in plane units
    pub zoom: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    /// Fraction of `zoom` moved per pan key press
    pub pan_step: f64,
    /// Zoom multiplier per scroll notch
    pub zoom_base: f64,
}

impl Camera2D {
    pub const PAN_STEP: f64 = 0.05;
    pub const ZOOM_BASE: f64 = 0.9;

    pub fn new(zoom: f64) -> Self {
        Self {
            zoom,
            offset_x: 0.0,
            offset_y: 0.0,
            pan_step: Self::PAN_STEP,
            zoom_base: Self::ZOOM_BASE,
        }
    }

    /// Shift the view by one pan step. Arrow keys move the model, so the
    /// offsets move opposite to the picture.
    pub fn pan(&mut self, direction: Direction) {
        let step = self.pan_step * self.zoom;
        match direction {
            Direction::Up => self.offset_y += step,
            Direction::Down => self.offset_y -= step,
            Direction::Left => self.offset_x += step,
            Direction::Right => self.offset_x -= step,
        }
    }

    /// Apply `delta` scroll notches; positive zooms in
    pub fn scroll(&mut self, delta: f64) {
        self.set_zoom(self.zoom * self.zoom_base.powf(delta));
    }

    /// Accepts only finite, positive zoom values
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() && zoom > 0.0 {
            self.zoom = zoom;
        } else {
            warn!("ignoring zoom value {}", zoom);
        }
    }

    pub fn reset_offsets(&mut self) {
        self.offset_x = 0.0;
        self.offset_y = 0.0;
    }

    /// Region shown on a surface with the given aspect ratio
    pub fn view_rect(&self, aspect: f64) -> ViewRect {
        let width = self.zoom * aspect;
        ViewRect {
            left: self.offset_x - width / 2.0,
            bottom: self.offset_y - self.zoom / 2.0,
            width,
            height: self.zoom,
        }
    }
}

impl Default for Camera2D {
    fn default() -> Self {
        Self::new(6.0)
    }
}
