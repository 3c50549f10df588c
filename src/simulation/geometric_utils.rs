//! Geometric utility functions shared by the track, sensors and the race loop.
//!
//! Angles are in degrees. 0° points up the screen (towards decreasing `y`)
//! and angles grow clockwise, so 90° points towards increasing `x`.

use geo::{Coord, Point, coord};

/// Integer pixel coordinate on the track grid.
pub type Pixel = Coord<i32>;

/// Moves `position` by `distance` in the direction of `angle` (degrees).
///
/// # Arguments
///
/// * `position` - Origin in world coordinates
/// * `distance` - Distance to travel, may be zero
/// * `angle` - Heading in degrees, see the module docs for the convention
///
/// # Returns
///
/// The translated point.
pub fn translate(position: Point<f32>, distance: f32, angle: f32) -> Point<f32> {
    let rad = (angle - 90.0).to_radians();
    position + Point::new(rad.cos() * distance, rad.sin() * distance)
}

/// Rounds a world coordinate to the pixel that contains it.
///
/// Halves round away from zero.
pub fn location_to_pixel(position: Point<f32>) -> Pixel {
    coord! {
        x: position.x().round() as i32,
        y: position.y().round() as i32,
    }
}

/// Normalizes an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid of a tiny negative value rounds up to exactly 360.0
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Clamps a policy command into `[-1, 1]`. NaN becomes 0.
pub fn clamp_command(command: f32) -> f32 {
    if command.is_nan() {
        0.0
    } else {
        command.clamp(-1.0, 1.0)
    }
}
