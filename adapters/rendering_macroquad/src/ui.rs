//! Immediate-mode overlay drawing for the Macroquad rendering backend.
//!
//! This module hosts the spin button and status line so the rest of the
//! adapter only deals with the retained cell surface.

use macroquad::color::WHITE;
use reelspin_rendering::{ButtonState, Color, SpinButton};

use crate::{surface::ScreenTransform, to_macroquad_color};

const BUTTON_LABEL: &str = "Spin";
const LABEL_SIZE: f32 = 40.0;
const MESSAGE_SIZE: f32 = 28.0;

/// Fill colour used for each button state.
pub(crate) fn button_fill(state: ButtonState) -> Color {
    let base = Color::from_rgb_u8(36, 120, 56);
    match state {
        ButtonState::Normal => base,
        ButtonState::Hover => base.lighten(0.25),
        ButtonState::Pressed => Color::from_rgb_u8(24, 80, 38),
        ButtonState::Disabled => Color::new(0.3, 0.3, 0.3, 0.8),
    }
}

/// Draws the spin button in its current visual state.
pub(crate) fn draw_spin_button(button: &SpinButton, transform: &ScreenTransform) {
    let layout = button.layout();
    let top_left = transform.to_screen(layout.top_left());
    let size = layout.size() * transform.scale();

    macroquad::shapes::draw_rectangle(
        top_left.x,
        top_left.y,
        size.x,
        size.y,
        to_macroquad_color(button_fill(button.state())),
    );
    macroquad::shapes::draw_rectangle_lines(top_left.x, top_left.y, size.x, size.y, 2.0, WHITE);

    let centre = transform.to_screen(layout.center());
    let font_size = LABEL_SIZE * transform.scale().max(0.25);
    let label_width = font_size * 0.5 * BUTTON_LABEL.len() as f32;
    let _ = macroquad::text::draw_text(
        BUTTON_LABEL,
        centre.x - label_width * 0.5,
        centre.y + font_size * 0.3,
        font_size,
        WHITE,
    );
}

/// Draws a status line along the top edge of the window.
pub(crate) fn draw_message(message: &str) {
    let _ = macroquad::text::draw_text(message, 16.0, MESSAGE_SIZE + 8.0, MESSAGE_SIZE, WHITE);
}
