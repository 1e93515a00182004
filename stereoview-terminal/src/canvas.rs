/// Offscreen RGB surface used for still-image export
use image::{Rgb as Pixel, RgbImage};
use stereoview_core::camera::ViewRect;
use stereoview_core::{BlendMode, Camera2D, LineVertex, RenderBackend, Rgb};

use crate::raster::line_pixels;

pub struct Canvas {
    image: RgbImage,
    viewport: ViewRect,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::new(width, height),
            viewport: Camera2D::default()
                .view_rect(stereoview_core::camera::aspect_ratio(width, height)),
        }
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        let Pixel([r, g, b]) = *self.image.get_pixel(x, y);
        Rgb::new(r, g, b)
    }

    fn plot(&mut self, x: u32, y: u32, color: Rgb, mode: BlendMode) {
        let blended = self.pixel(x, y).blend(color, mode);
        self.image.put_pixel(x, y, Pixel([blended.r, blended.g, blended.b]));
    }
}

impl RenderBackend for Canvas {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn clear(&mut self, color: Rgb) {
        for pixel in self.image.pixels_mut() {
            *pixel = Pixel([color.r, color.g, color.b]);
        }
    }

    fn set_viewport(&mut self, rect: ViewRect) {
        self.viewport = rect;
    }

    fn draw_lines(&mut self, vertices: &[LineVertex], mode: BlendMode) {
        let (width, height) = self.size();
        for line in vertices.chunks_exact(2) {
            let a = self.viewport.to_pixel(&line[0].position, width, height);
            let b = self.viewport.to_pixel(&line[1].position, width, height);
            for (x, y) in line_pixels(a, b, width, height) {
                self.plot(x, y, line[0].color, mode);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    fn vertex(x: f64, y: f64, color: Rgb) -> LineVertex {
        LineVertex {
            position: Point2::new(x, y),
            color,
        }
    }

    #[test]
    fn test_overlapping_eyes_add_up() {
        let mut canvas = Canvas::new(20, 20);
        canvas.clear(Rgb::BLACK);
        canvas.set_viewport(Camera2D::new(2.0).view_rect(1.0));

        let left = [vertex(-1.0, 0.0, Rgb::RED), vertex(1.0, 0.0, Rgb::RED)];
        let right = [vertex(0.0, -1.0, Rgb::CYAN), vertex(0.0, 1.0, Rgb::CYAN)];
        canvas.draw_lines(&left, BlendMode::Additive);
        canvas.draw_lines(&right, BlendMode::Additive);

        // the crossing pixel holds both colors, elsewhere only one
        assert_eq!(canvas.pixel(10, 10), Rgb::new(255, 255, 255));
        assert_eq!(canvas.pixel(2, 10), Rgb::RED);
        assert_eq!(canvas.pixel(10, 2), Rgb::CYAN);
        assert_eq!(canvas.pixel(2, 2), Rgb::BLACK);
    }

    #[test]
    fn test_clear() {
        let mut canvas = Canvas::new(4, 3);
        canvas.clear(Rgb::new(9, 8, 7));
        assert_eq!(canvas.size(), (4, 3));
        assert!(canvas.image().pixels().all(|p| p.0 == [9, 8, 7]));
    }
}
