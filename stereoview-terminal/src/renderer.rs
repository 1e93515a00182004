/// ASCII line rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use stereoview_core::camera::{aspect_ratio, ViewRect};
use stereoview_core::{BlendMode, Camera2D, LineVertex, RenderBackend, Rgb};

use crate::raster::line_pixels;

/// Character luminosity ramp (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Dimmest glyph used for a lit cell, so a single dark channel stays visible
const MIN_LIT_GLYPH: usize = 4;

/// Each terminal cell is treated as one pixel wide and two pixels tall,
/// which keeps the logical surface roughly square.
const PIXELS_PER_ROW: u32 = 2;

/// Terminal renderer that draws additive colored line lists into a cell grid
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    cells: Vec<Rgb>,
    viewport: ViewRect,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let pixel_height = height as u32 * PIXELS_PER_ROW;
        Self {
            width,
            height,
            cells: vec![Rgb::BLACK; width * height],
            viewport: Camera2D::default().view_rect(aspect_ratio(width as u32, pixel_height)),
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![Rgb::BLACK; width * height];
    }

    pub fn cell(&self, column: usize, row: usize) -> Rgb {
        self.cells[row * self.width + column]
    }

    /// Glyph for a cell; brighter sums pick denser characters
    pub fn glyph(color: Rgb) -> char {
        if color.is_black() {
            return ' ';
        }
        let sum = color.r as usize + color.g as usize + color.b as usize;
        let index = sum * (LUMINOSITY_RAMP.len() - 1) / (3 * 255);
        LUMINOSITY_RAMP[index.clamp(MIN_LIT_GLYPH, LUMINOSITY_RAMP.len() - 1)]
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let color = self.cell(x, y);
                if color.is_black() {
                    writer.queue(Print(' '))?;
                    continue;
                }
                writer.queue(SetForegroundColor(Color::Rgb {
                    r: color.r,
                    g: color.g,
                    b: color.b,
                }))?;
                writer.queue(Print(Self::glyph(color)))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl RenderBackend for AsciiRenderer {
    fn size(&self) -> (u32, u32) {
        (self.width as u32, self.height as u32 * PIXELS_PER_ROW)
    }

    fn clear(&mut self, color: Rgb) {
        for cell in &mut self.cells {
            *cell = color;
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

            // several pixels of one line can share a cell; light it once
            let mut last_cell = None;
            for (x, y) in line_pixels(a, b, width, height) {
                let idx = (y / PIXELS_PER_ROW) as usize * self.width + x as usize;
                if last_cell == Some(idx) {
                    continue;
                }
                last_cell = Some(idx);
                self.cells[idx] = self.cells[idx].blend(line[0].color, mode);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    fn line(from: (f64, f64), to: (f64, f64), color: Rgb) -> [LineVertex; 2] {
        [
            LineVertex { position: Point2::new(from.0, from.1), color },
            LineVertex { position: Point2::new(to.0, to.1), color },
        ]
    }

    #[test]
    fn test_surface_size_counts_two_pixels_per_row() {
        let renderer = AsciiRenderer::new(80, 24);
        assert_eq!(renderer.size(), (80, 48));
    }

    #[test]
    fn test_vertical_line_lights_each_cell_once() {
        let mut renderer = AsciiRenderer::new(10, 5);
        renderer.clear(Rgb::BLACK);
        renderer.set_viewport(Camera2D::new(2.0).view_rect(1.0));
        renderer.draw_lines(
            &line((0.0, -1.0), (0.0, 1.0), Rgb::new(100, 0, 0)),
            BlendMode::Additive,
        );

        for row in 0..5 {
            assert_eq!(renderer.cell(5, row), Rgb::new(100, 0, 0));
        }
        assert_eq!(renderer.cell(0, 0), Rgb::BLACK);
    }

    #[test]
    fn test_overlap_is_additive() {
        let mut renderer = AsciiRenderer::new(10, 5);
        renderer.clear(Rgb::BLACK);
        renderer.set_viewport(Camera2D::new(2.0).view_rect(1.0));
        renderer.draw_lines(&line((-1.0, 0.0), (1.0, 0.0), Rgb::RED), BlendMode::Additive);
        renderer.draw_lines(&line((-1.0, 0.0), (1.0, 0.0), Rgb::CYAN), BlendMode::Additive);
        assert_eq!(renderer.cell(3, 2), Rgb::new(255, 255, 255));
        assert_eq!(AsciiRenderer::glyph(renderer.cell(3, 2)), '@');
    }

    #[test]
    fn test_glyph_ramp() {
        assert_eq!(AsciiRenderer::glyph(Rgb::BLACK), ' ');
        assert_eq!(AsciiRenderer::glyph(Rgb::new(1, 0, 0)), '=');
        assert_eq!(AsciiRenderer::glyph(Rgb::CYAN), '*');
    }

    #[test]
    fn test_draw_writes_every_cell() {
        let mut renderer = AsciiRenderer::new(3, 2);
        renderer.clear(Rgb::RED);
        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert_eq!(text.matches('=').count(), 6);
    }
}
