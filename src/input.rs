use macroquad::prelude::*;

use train_race::simulation::player::ArrowKeys;

use crate::graphics::DisplaySettings;

/// Arrow keys currently held down.
pub fn arrow_keys() -> ArrowKeys {
    ArrowKeys {
        up: is_key_down(KeyCode::Up),
        down: is_key_down(KeyCode::Down),
        left: is_key_down(KeyCode::Left),
        right: is_key_down(KeyCode::Right),
    }
}

/// Applies the display toggles on keys 1 to 4.
pub fn handle_display_keys(settings: &mut DisplaySettings) {
    if is_key_pressed(KeyCode::Key1) {
        settings.toggle_train();
    }
    if is_key_pressed(KeyCode::Key2) {
        settings.toggle_sensors();
    }
    if is_key_pressed(KeyCode::Key3) {
        settings.toggle_background();
    }
    if is_key_pressed(KeyCode::Key4) {
        settings.toggle_fps_limiter();
    }
}

/// Whether the window should close.
pub fn quit_requested() -> bool {
    is_key_pressed(KeyCode::Escape)
}
