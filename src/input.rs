//! Window input to simulation input.

use egui::{Key, Pos2, Rect};

/// Logical commands bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Clear everything and reseed the noise field.
    Reset,
    /// Save the canvas as a PNG.
    Export,
}

pub fn command_for_key(key: Key) -> Option<Command> {
    match key {
        Key::R => Some(Command::Reset),
        Key::S => Some(Command::Export),
        _ => None,
    }
}

/// Map a screen position inside `display` (where a `canvas_w × canvas_h`
/// image is shown, possibly scaled) to canvas pixels. `None` outside.
pub fn to_canvas(pos: Pos2, display: Rect, canvas_w: f32, canvas_h: f32) -> Option<Pos2> {
    if display.width() <= 0.0 || display.height() <= 0.0 {
        return None;
    }
    let x = (pos.x - display.left()) / display.width() * canvas_w;
    let y = (pos.y - display.top()) / display.height() * canvas_h;
    let inside = x >= 0.0 && y >= 0.0 && x < canvas_w && y < canvas_h;
    inside.then_some(Pos2::new(x, y))
}

/// Largest rect with the canvas aspect ratio that fits in `available`,
/// centred. Never upscales past 1:1.
pub fn fit_canvas(available: Rect, canvas_w: f32, canvas_h: f32) -> Rect {
    let scale = (available.width() / canvas_w)
        .min(available.height() / canvas_h)
        .min(1.0)
        .max(0.0);
    Rect::from_center_size(available.center(), egui::vec2(canvas_w * scale, canvas_h * scale))
}

/// Slider readout such as `Energy: 28%`.
pub fn percent_readout(label: &str, value: f32) -> String {
    format!("{label}: {:.0}%", value.clamp(0.0, 1.0) * 100.0)
}
