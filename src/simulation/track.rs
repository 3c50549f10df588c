//! Racing track parsed from an RGB image.
//!
//! Each pixel of the source image is one grid cell:
//! - red channel >= 128 marks a wall
//! - blue channel >= 128 marks a finish pixel (any number of them)
//! - green channel >= 128 marks the start; only the first one in scan order is used
//!
//! Every cell reachable from the finish by diagonal steps is labelled with its
//! step count to the nearest finish pixel. That label doubles as the race score.

use std::path::Path;

use geo::Point;
use image::RgbImage;
use ndarray::Array2;
use tracing::{info, warn};

use super::error::TrackFormatError;
use super::geometric_utils::{Pixel, location_to_pixel, translate};
use super::raycast::{first_hit, pixel};

const CHANNEL_THRESHOLD: u8 = 128;

/// Diagonal neighbour offsets used by the distance flood fill.
const DIAGONALS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// A parsed track: wall grid, finish pixels, start pixel and distance field.
///
/// Grids are indexed `[x, y]`. The track is immutable after construction.
#[derive(Debug, Clone)]
pub struct Track {
    width: usize,
    height: usize,
    walls: Array2<bool>,
    finish: Vec<Pixel>,
    start: Pixel,
    distance: Array2<u32>,
    extra_starts: usize,
}

impl Track {
    /// Loads and parses a track image from disk.
    pub fn load(path: impl AsRef<Path>, flip_vertical: bool) -> Result<Self, TrackFormatError> {
        let path = path.as_ref();
        let image = image::open(path)?.to_rgb8();
        let track = Self::from_image(&image, flip_vertical)?;
        info!(
            path = %path.display(),
            width = track.width,
            height = track.height,
            finish_pixels = track.finish.len(),
            "track loaded"
        );
        Ok(track)
    }

    /// Parses a track from an in-memory RGB image.
    ///
    /// With `flip_vertical` the bottom image row becomes `y = 0`; otherwise
    /// `y` follows the image rows top to bottom.
    pub fn from_image(image: &RgbImage, flip_vertical: bool) -> Result<Self, TrackFormatError> {
        let (width, height) = (image.width() as usize, image.height() as usize);
        if width == 0 || height == 0 {
            return Err(TrackFormatError::Empty);
        }

        let sample = |x: usize, y: usize| {
            let row = if flip_vertical { height - 1 - y } else { y };
            image.get_pixel(x as u32, row as u32).0
        };

        let walls = Array2::from_shape_fn((width, height), |(x, y)| {
            sample(x, y)[0] >= CHANNEL_THRESHOLD
        });

        let mut finish = Vec::new();
        let mut starts = Vec::new();
        for x in 0..width {
            for y in 0..height {
                let [_, green, blue] = sample(x, y);
                if blue >= CHANNEL_THRESHOLD {
                    finish.push(pixel(x as i32, y as i32));
                }
                if green >= CHANNEL_THRESHOLD {
                    starts.push(pixel(x as i32, y as i32));
                }
            }
        }

        let start = *starts.first().ok_or(TrackFormatError::MissingStart)?;
        let extra_starts = starts.len() - 1;
        if extra_starts > 0 {
            warn!(
                start = ?(start.x, start.y),
                ignored = extra_starts,
                "track has several start pixels, using the first"
            );
        }

        let distance = distance_field(&walls, &finish);

        Ok(Self {
            width,
            height,
            walls,
            finish,
            start,
            distance,
            extra_starts,
        })
    }

    /// Grid width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The start pixel.
    pub fn start(&self) -> Pixel {
        self.start
    }

    /// The start pixel as a world coordinate.
    pub fn start_position(&self) -> Point<f32> {
        Point::new(self.start.x as f32, self.start.y as f32)
    }

    /// All finish pixels in scan order.
    pub fn finish_points(&self) -> &[Pixel] {
        &self.finish
    }

    /// Number of green pixels that were ignored because an earlier one won.
    pub fn extra_starts(&self) -> usize {
        self.extra_starts
    }

    /// Wall occupancy grid, indexed `[x, y]`.
    pub fn walls(&self) -> &Array2<bool> {
        &self.walls
    }

    /// Distance field, indexed `[x, y]`. 0 means wall or unreachable.
    pub fn distance_field(&self) -> &Array2<u32> {
        &self.distance
    }

    /// Largest value of the distance field.
    pub fn max_distance(&self) -> u32 {
        self.distance.iter().copied().max().unwrap_or(0)
    }

    /// Whether the pixel lies on the grid.
    pub fn contains(&self, pixel: Pixel) -> bool {
        self.index(pixel).is_some()
    }

    /// Whether the pixel is a wall. Off-grid pixels count as walls.
    pub fn is_wall(&self, pixel: Pixel) -> bool {
        self.index(pixel).is_none_or(|index| self.walls[index])
    }

    /// Distance field value of an on-grid pixel.
    pub fn distance_at(&self, pixel: Pixel) -> Option<u32> {
        self.index(pixel).map(|index| self.distance[index])
    }

    /// Whether the world position lies on a wall pixel.
    ///
    /// # Panics
    ///
    /// Panics if the rounded position is outside the grid.
    pub fn check_collision(&self, position: Point<f32>) -> bool {
        self.walls[self.checked_index(position)]
    }

    /// Distance field value at the world position: 0 for walls and
    /// unreachable cells, 1 on the finish.
    ///
    /// # Panics
    ///
    /// Panics if the rounded position is outside the grid.
    pub fn get_distance(&self, position: Point<f32>) -> u32 {
        self.distance[self.checked_index(position)]
    }

    /// Casts a ray from `origin` towards `angle` (degrees) and returns the
    /// number of pixels along the rasterized line before the first wall.
    ///
    /// The origin pixel is index 0. Pixels past the grid edge count as walls.
    /// Returns `None` when no wall lies within `max_distance`.
    pub fn ray_trace_to_wall(
        &self,
        origin: Point<f32>,
        angle: f32,
        max_distance: f32,
    ) -> Option<u32> {
        let from = location_to_pixel(origin);
        let to = location_to_pixel(translate(origin, max_distance, angle));
        first_hit(from, to, |pixel| self.is_wall(pixel)).map(|index| index as u32)
    }

    fn index(&self, pixel: Pixel) -> Option<(usize, usize)> {
        let x = usize::try_from(pixel.x).ok().filter(|&x| x < self.width)?;
        let y = usize::try_from(pixel.y).ok().filter(|&y| y < self.height)?;
        Some((x, y))
    }

    fn checked_index(&self, position: Point<f32>) -> (usize, usize) {
        let pixel = location_to_pixel(position);
        self.index(pixel).unwrap_or_else(|| {
            panic!(
                "position ({}, {}) maps to pixel ({}, {}) outside the {}x{} track",
                position.x(),
                position.y(),
                pixel.x,
                pixel.y,
                self.width,
                self.height
            )
        })
    }
}

/// Multi-source breadth-first flood fill from the finish pixels.
///
/// Finish pixels get 1, every non-wall diagonal neighbour of a layer that has
/// not been labelled yet gets the layer value plus one.
fn distance_field(walls: &Array2<bool>, finish: &[Pixel]) -> Array2<u32> {
    let (width, height) = walls.dim();
    let mut distance = Array2::<u32>::zeros((width, height));

    let mut frontier: Vec<(usize, usize)> = finish
        .iter()
        .map(|p| (p.x as usize, p.y as usize))
        .collect();
    for &cell in &frontier {
        distance[cell] = 1;
    }

    let mut layer = 1;
    while !frontier.is_empty() {
        layer += 1;
        let mut next = Vec::new();
        for &(x, y) in &frontier {
            for (dx, dy) in DIAGONALS {
                let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy))
                else {
                    continue;
                };
                if nx >= width || ny >= height {
                    continue;
                }
                if !walls[(nx, ny)] && distance[(nx, ny)] == 0 {
                    distance[(nx, ny)] = layer;
                    next.push((nx, ny));
                }
            }
        }
        frontier = next;
    }

    distance
}
