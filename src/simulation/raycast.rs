//! Integer line rasterization used for ray casting against the wall grid.

use super::geometric_utils::Pixel;
use geo::coord;

/// Iterator over the pixels of a Bresenham line, both endpoints included.
///
/// The line is 8-connected: every step moves one pixel along the major axis
/// and at most one along the minor axis, so the `i`-th pixel is exactly `i`
/// steps (Chebyshev distance) away from the origin. Ties step the x axis
/// first (`2 * err >= dy`), then the y axis (`2 * err <= dx`).
#[derive(Debug, Clone)]
pub struct BresenhamLine {
    current: Pixel,
    end: Pixel,
    dx: i32,
    dy: i32,
    sx: i32,
    sy: i32,
    err: i32,
    done: bool,
}

impl BresenhamLine {
    /// Creates a line from `from` to `to`.
    pub fn new(from: Pixel, to: Pixel) -> Self {
        let dx = (to.x - from.x).abs();
        let dy = -(to.y - from.y).abs();
        Self {
            current: from,
            end: to,
            dx,
            dy,
            sx: if from.x < to.x { 1 } else { -1 },
            sy: if from.y < to.y { 1 } else { -1 },
            err: dx + dy,
            done: false,
        }
    }
}

impl Iterator for BresenhamLine {
    type Item = Pixel;

    fn next(&mut self) -> Option<Pixel> {
        if self.done {
            return None;
        }

        let pixel = self.current;
        if pixel == self.end {
            self.done = true;
            return Some(pixel);
        }

        let e2 = 2 * self.err;
        let mut next = pixel;
        if e2 >= self.dy {
            self.err += self.dy;
            next.x += self.sx;
        }
        if e2 <= self.dx {
            self.err += self.dx;
            next.y += self.sy;
        }
        self.current = next;

        Some(pixel)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let remaining = (self.end.x - self.current.x)
            .abs()
            .max((self.end.y - self.current.y).abs()) as usize
            + 1;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BresenhamLine {}

/// Collects the pixels between two points, see [`BresenhamLine`].
pub fn get_line(from: Pixel, to: Pixel) -> Vec<Pixel> {
    BresenhamLine::new(from, to).collect()
}

/// Index of the first pixel along the line for which `is_wall` holds.
pub fn first_hit(from: Pixel, to: Pixel, mut is_wall: impl FnMut(Pixel) -> bool) -> Option<usize> {
    BresenhamLine::new(from, to).position(|pixel| is_wall(pixel))
}

/// Convenience constructor for pixels in tests and callers.
pub fn pixel(x: i32, y: i32) -> Pixel {
    coord! { x: x, y: y }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_point_line() {
        assert_eq!(get_line(pixel(3, 4), pixel(3, 4)), vec![pixel(3, 4)]);
    }

    #[test]
    fn vertical_line_includes_both_ends() {
        let line = get_line(pixel(0, 0), pixel(0, 10));
        assert_eq!(line.len(), 11);
        assert_eq!(line[0], pixel(0, 0));
        assert_eq!(line[5], pixel(0, 5));
        assert_eq!(line[10], pixel(0, 10));
    }

    #[test]
    fn negative_direction() {
        let line = get_line(pixel(5, 5), pixel(0, 5));
        assert_eq!(
            line,
            (0..=5).rev().map(|x| pixel(x, 5)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn diagonal_steps_both_axes() {
        let line = get_line(pixel(0, 0), pixel(4, -4));
        assert_eq!(line, (0..=4).map(|i| pixel(i, -i)).collect::<Vec<_>>());
    }

    #[test]
    fn shallow_line_is_eight_connected() {
        let line = get_line(pixel(0, 0), pixel(7, 3));
        assert_eq!(line.len(), 8);
        for (i, window) in line.windows(2).enumerate() {
            let step_x = (window[1].x - window[0].x).abs();
            let step_y = (window[1].y - window[0].y).abs();
            assert_eq!(step_x, 1, "step {i} must advance the major axis");
            assert!(step_y <= 1);
        }
        assert_eq!(*line.last().unwrap(), pixel(7, 3));
    }

    #[test]
    fn size_hint_matches_length() {
        let line = BresenhamLine::new(pixel(2, 9), pixel(-6, 1));
        assert_eq!(line.len(), 9);
        assert_eq!(line.count(), 9);
    }

    #[test]
    fn first_hit_reports_index() {
        let hit = first_hit(pixel(0, 0), pixel(0, 10), |p| p == pixel(0, 5));
        assert_eq!(hit, Some(5));
        assert_eq!(first_hit(pixel(0, 0), pixel(0, 10), |_| false), None);
    }
}
