use geo::Point;
use image::RgbImage;
use macroquad::prelude::*;
use tracing::debug;

use train_race::simulation::geometric_utils::translate;
use train_race::simulation::player::Player;
use train_race::simulation::race::Race;
use train_race::simulation::sensor::DistanceSensor;
use train_race::simulation::track::Track;

/// Length of the heading line in [`TrainStyle::Line`], in track pixels.
const HEADING_LENGTH: f32 = 3.0;
/// Drawn car body size in track pixels.
const BODY_SIZE: (f32, f32) = (7.8, 2.1);

/// How players are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainStyle {
    /// Rotated body rectangle.
    Body,
    /// Short line along the heading.
    Line,
    /// Not drawn.
    Hidden,
}

impl TrainStyle {
    fn next(self) -> Self {
        match self {
            Self::Body => Self::Line,
            Self::Line => Self::Hidden,
            Self::Hidden => Self::Body,
        }
    }
}

/// What is drawn behind the players.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    /// Decorated background image, falls back to the raw track.
    Decorated,
    /// The track image itself.
    Raw,
    /// Grayscale distance field.
    DistanceField,
    /// Plain black.
    Blank,
}

impl Background {
    fn next(self) -> Self {
        match self {
            Self::Decorated => Self::Raw,
            Self::Raw => Self::DistanceField,
            Self::DistanceField => Self::Blank,
            Self::Blank => Self::Decorated,
        }
    }
}

/// Display toggles owned by the driver loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySettings {
    pub train: TrainStyle,
    pub sensors: bool,
    pub background: Background,
    pub fps_limiter: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            train: TrainStyle::Body,
            sensors: false,
            background: Background::Decorated,
            fps_limiter: true,
        }
    }
}

impl DisplaySettings {
    pub fn toggle_train(&mut self) {
        self.train = self.train.next();
        debug!(train = ?self.train, "drawing train toggled");
    }

    pub fn toggle_sensors(&mut self) {
        self.sensors = !self.sensors;
        debug!(sensors = self.sensors, "drawing sensors toggled");
    }

    pub fn toggle_background(&mut self) {
        self.background = self.background.next();
        debug!(background = ?self.background, "drawing background toggled");
    }

    pub fn toggle_fps_limiter(&mut self) {
        self.fps_limiter = !self.fps_limiter;
        debug!(fps_limiter = self.fps_limiter, "fps limiter toggled");
    }
}

/// Maps world coordinates onto the window.
#[derive(Debug, Clone, Copy)]
pub struct ScreenMapping {
    pub scale: f32,
    pub track_height: f32,
    pub flip_vertical: bool,
}

impl ScreenMapping {
    pub fn new(track: &Track, scale: f32, flip_vertical: bool) -> Self {
        Self {
            scale,
            track_height: track.height() as f32,
            flip_vertical,
        }
    }

    pub fn window_size(&self, track: &Track) -> (f32, f32) {
        (
            track.width() as f32 * self.scale,
            track.height() as f32 * self.scale,
        )
    }
}

trait ToScreen {
    fn to_screen(&self, mapping: &ScreenMapping) -> Vec2;
}

impl ToScreen for Point<f32> {
    fn to_screen(&self, mapping: &ScreenMapping) -> Vec2 {
        // pixel (x, y) covers [x - 0.5, x + 0.5] in world units
        let row = if mapping.flip_vertical {
            mapping.track_height - 1.0 - self.y()
        } else {
            self.y()
        };
        vec2((self.x() + 0.5) * mapping.scale, (row + 0.5) * mapping.scale)
    }
}

/// Background textures prepared once per track.
pub struct Backdrops {
    raw: Texture2D,
    decorated: Option<Texture2D>,
    distance_field: Texture2D,
}

impl Backdrops {
    pub fn new(
        image: &RgbImage,
        decorated: Option<&RgbImage>,
        track: &Track,
        flip_vertical: bool,
    ) -> Self {
        Self {
            raw: texture_from_rgb(image),
            decorated: decorated.map(texture_from_rgb),
            distance_field: distance_field_texture(track, flip_vertical),
        }
    }
}

fn texture_from_rgb(image: &RgbImage) -> Texture2D {
    let bytes: Vec<u8> = image
        .pixels()
        .flat_map(|pixel| [pixel.0[0], pixel.0[1], pixel.0[2], 255])
        .collect();
    let texture = Texture2D::from_rgba8(image.width() as u16, image.height() as u16, &bytes);
    texture.set_filter(FilterMode::Nearest);
    texture
}

/// Grayscale rendering of the distance field laid out like the source image.
fn distance_field_texture(track: &Track, flip_vertical: bool) -> Texture2D {
    let field = track.distance_field();
    let max = track.max_distance().max(1) as f32;
    let mut bytes = Vec::with_capacity(track.width() * track.height() * 4);
    for row in 0..track.height() {
        for x in 0..track.width() {
            let y = if flip_vertical { track.height() - 1 - row } else { row };
            let value = (field[(x, y)] as f32 * 255.0 / max) as u8;
            bytes.extend_from_slice(&[value, value, value, 255]);
        }
    }
    let texture = Texture2D::from_rgba8(track.width() as u16, track.height() as u16, &bytes);
    texture.set_filter(FilterMode::Nearest);
    texture
}

fn draw_background(backdrops: &Backdrops, settings: &DisplaySettings) {
    let texture = match settings.background {
        Background::Decorated => backdrops.decorated.as_ref().unwrap_or(&backdrops.raw),
        Background::Raw => &backdrops.raw,
        Background::DistanceField => &backdrops.distance_field,
        Background::Blank => {
            clear_background(BLACK);
            return;
        }
    };
    draw_texture_ex(
        texture,
        0.0,
        0.0,
        WHITE,
        DrawTextureParams {
            dest_size: Some(vec2(screen_width(), screen_height())),
            ..Default::default()
        },
    );
}

fn player_color(player: &Player) -> Color {
    let [r, g, b] = player.color;
    Color::from_rgba(r, g, b, 255)
}

fn draw_train(player: &Player, mapping: &ScreenMapping, style: TrainStyle) {
    let origin = player.pos.to_screen(mapping);
    let heading = translate(player.pos, HEADING_LENGTH, player.rotation).to_screen(mapping);
    match style {
        TrainStyle::Body => {
            let direction = heading - origin;
            draw_rectangle_ex(
                origin.x,
                origin.y,
                BODY_SIZE.0 * mapping.scale,
                BODY_SIZE.1 * mapping.scale,
                DrawRectangleParams {
                    offset: vec2(0.5, 0.5),
                    rotation: direction.y.atan2(direction.x),
                    color: player_color(player),
                },
            );
        }
        TrainStyle::Line => {
            draw_line(origin.x, origin.y, heading.x, heading.y, 5.0, player_color(player));
        }
        TrainStyle::Hidden => {}
    }
}

fn draw_sensor(player: &Player, sensor: &DistanceSensor, mapping: &ScreenMapping) {
    let Some(percept) = sensor.percept else {
        return;
    };
    let color = if sensor.is_clear() { GREEN } else { WHITE };
    let origin = player.pos.to_screen(mapping);
    let target =
        translate(player.pos, percept, sensor.absolute_angle(player.rotation)).to_screen(mapping);
    draw_line(origin.x, origin.y, target.x, target.y, 1.0, color);
}

fn draw_scores(race: &Race, mapping: &ScreenMapping) {
    draw_rectangle(0.0, 0.0, screen_width() * 0.05, screen_height(), BLACK);

    let font_size = mapping.scale * 3.0;
    for (i, player) in race.players.iter().enumerate() {
        let text = format!("{:03} - {:03}", player.id, player.score);
        let y = (i as f32 + 1.0) * font_size;
        draw_text(&text, 0.0, y, font_size, player_color(player));
    }
}

/// Draws one frame from the fully resolved race state.
pub fn draw_race(
    race: &Race,
    backdrops: &Backdrops,
    mapping: &ScreenMapping,
    settings: &DisplaySettings,
) {
    draw_background(backdrops, settings);

    for player in &race.players {
        draw_train(player, mapping, settings.train);
        if settings.sensors {
            for sensor in &player.sensors {
                draw_sensor(player, sensor, mapping);
            }
        }
    }

    draw_scores(race, mapping);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_cycle_back_to_start() {
        let mut settings = DisplaySettings::default();
        for _ in 0..3 {
            settings.toggle_train();
        }
        for _ in 0..4 {
            settings.toggle_background();
        }
        settings.toggle_sensors();
        settings.toggle_sensors();
        assert_eq!(settings, DisplaySettings::default());
    }

    #[test]
    fn screen_mapping_flips_rows() {
        let mapping = ScreenMapping {
            scale: 2.0,
            track_height: 10.0,
            flip_vertical: true,
        };
        let screen = Point::new(0.0, 9.0).to_screen(&mapping);
        assert_eq!(screen, vec2(1.0, 1.0));
    }
}
