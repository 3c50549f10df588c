//! Ray-cast distance sensor mounted on a player.

use geo::Point;
use serde::{Deserialize, Serialize};

use super::track::Track;

/// Linear distance sensor pointing at a fixed offset from the player heading.
///
/// The last reading is cached in [`DistanceSensor::percept`] so the renderer
/// can draw it after the tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceSensor {
    /// Offset from the player heading in degrees.
    pub angle: f32,
    /// Maximum sensing range in world units.
    pub depth: f32,
    /// Last reading, `None` before the first tick.
    pub percept: Option<f32>,
    /// Whether the last ray met a wall. A wall exactly at `depth` reads the
    /// same as a clear ray, so the reading alone cannot tell.
    #[serde(default)]
    pub hit: bool,
}

impl DistanceSensor {
    /// Creates a sensor with no reading yet.
    pub fn new(angle: f32, depth: f32) -> Self {
        Self {
            angle,
            depth,
            percept: None,
            hit: false,
        }
    }

    /// Builds one sensor per angle, all with the same depth.
    pub fn fan(angles: &[f32], depth: f32) -> Vec<Self> {
        angles.iter().map(|&angle| Self::new(angle, depth)).collect()
    }

    /// Measures the distance to the nearest wall along the sensor ray.
    ///
    /// A clear ray reads as `depth`, never as a missing value.
    pub fn perceive(&mut self, track: &Track, position: Point<f32>, rotation: f32) -> f32 {
        let wall = track.ray_trace_to_wall(position, self.absolute_angle(rotation), self.depth);
        let reading = wall.map_or(self.depth, |distance| distance as f32);
        self.hit = wall.is_some();
        self.percept = Some(reading);
        reading
    }

    /// Sensor direction in degrees for a player facing `rotation`.
    pub fn absolute_angle(&self, rotation: f32) -> f32 {
        rotation + self.angle
    }

    /// Whether the last reading found no wall within range.
    pub fn is_clear(&self) -> bool {
        self.percept.is_some() && !self.hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    /// Wall row at `y = 0`, start at (2, 10).
    fn wall_ahead_track() -> Track {
        let mut image = RgbImage::from_pixel(5, 14, Rgb([0, 0, 0]));
        for x in 0..5 {
            image.put_pixel(x, 0, Rgb([255, 0, 0]));
        }
        image.put_pixel(2, 10, Rgb([0, 255, 0]));
        Track::from_image(&image, false).unwrap()
    }

    #[test]
    fn wall_at_full_depth_is_not_clear() {
        let track = wall_ahead_track();
        let mut sensor = DistanceSensor::new(0.0, 10.0);
        let reading = sensor.perceive(&track, track.start_position(), 0.0);
        assert!((reading - 10.0).abs() < f32::EPSILON);
        assert!(sensor.hit);
        assert!(!sensor.is_clear());
    }

    #[test]
    fn short_ray_is_clear() {
        let track = wall_ahead_track();
        let mut sensor = DistanceSensor::new(0.0, 9.0);
        assert!(!sensor.is_clear());
        let reading = sensor.perceive(&track, track.start_position(), 0.0);
        assert!((reading - 9.0).abs() < f32::EPSILON);
        assert!(!sensor.hit);
        assert!(sensor.is_clear());
    }
}
