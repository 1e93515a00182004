/// Line rasterization shared by the terminal and offscreen backends

/// Clip the segment `a -> b` to the box `[min, max]` (Liang-Barsky).
/// Returns `None` when nothing of the segment is inside or a coordinate is
/// not finite.
pub fn clip_segment(
    a: (f64, f64),
    b: (f64, f64),
    min: (f64, f64),
    max: (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    if ![a.0, a.1, b.0, b.1].iter().all(|v| v.is_finite()) {
        return None;
    }

    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;

    for (p, q) in [
        (-dx, a.0 - min.0),
        (dx, max.0 - a.0),
        (-dy, a.1 - min.1),
        (dy, max.1 - a.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some((
        (a.0 + t0 * dx, a.1 + t0 * dy),
        (a.0 + t1 * dx, a.1 + t1 * dy),
    ))
}

/// Pixels covered by the segment between two pixel coordinates, clipped to
/// a `width` x `height` grid.
pub fn line_pixels(a: (f64, f64), b: (f64, f64), width: u32, height: u32) -> Vec<(u32, u32)> {
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let max = (width as f64 - 0.5, height as f64 - 0.5);
    let Some((a, b)) = clip_segment(a, b, (0.0, 0.0), max) else {
        return Vec::new();
    };

    let (mut x, mut y) = (a.0.floor() as i64, a.1.floor() as i64);
    let (x1, y1) = (b.0.floor() as i64, b.1.floor() as i64);
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut pixels = Vec::with_capacity((dx.max(-dy) + 1) as usize);
    loop {
        if x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height {
            pixels.push((x as u32, y as u32));
        }
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_line() {
        let pixels = line_pixels((0.0, 2.0), (4.0, 2.0), 10, 10);
        assert_eq!(pixels, vec![(0, 2), (1, 2), (2, 2), (3, 2), (4, 2)]);
    }

    #[test]
    fn test_diagonal_line() {
        let pixels = line_pixels((0.0, 0.0), (3.0, 3.0), 10, 10);
        assert_eq!(pixels, vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn test_line_is_clipped_to_grid() {
        let pixels = line_pixels((-1.0e9, 1.0), (1.0e9, 1.0), 5, 3);
        assert_eq!(pixels.len(), 5);
        assert!(pixels.iter().all(|&(x, y)| x < 5 && y == 1));
    }

    #[test]
    fn test_outside_and_invalid_lines() {
        assert!(line_pixels((20.0, 20.0), (30.0, 30.0), 10, 10).is_empty());
        assert!(line_pixels((f64::NAN, 0.0), (1.0, 1.0), 10, 10).is_empty());
        assert!(line_pixels((0.0, 0.0), (1.0, 1.0), 0, 10).is_empty());
    }

    #[test]
    fn test_clip_segment() {
        let clipped = clip_segment((-5.0, 0.5), (5.0, 0.5), (0.0, 0.0), (1.0, 1.0)).unwrap();
        assert_eq!(clipped, ((0.0, 0.5), (1.0, 0.5)));
        assert!(clip_segment((2.0, 2.0), (3.0, 3.0), (0.0, 0.0), (1.0, 1.0)).is_none());
    }
}
