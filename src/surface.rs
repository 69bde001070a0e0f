//! Draw-command boundary between the simulation and whatever owns pixels.

use crate::palette::Rgb;
use egui::{Pos2, Rect};

/// Stroke colour, opacity and width.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Pen {
    pub rgb: [u8; 3],
    pub alpha: u8,
    pub width: f32,
}

impl Pen {
    pub fn new(rgb: [u8; 3], alpha: u8, width: f32) -> Self {
        Self { rgb, alpha, width }
    }

    pub fn from_rgb(color: Rgb, alpha: u8, width: f32) -> Self {
        Self::new(color.to_bytes(), alpha, width)
    }
}

/// A fixed-size 2D drawing area that accepts stroke primitives.
///
/// Nothing is filled; every shape is an outline drawn with a [`Pen`].
pub trait Surface {
    fn size(&self) -> (u32, u32);

    /// Replace every pixel with an opaque colour.
    fn clear(&mut self, rgb: [u8; 3]);

    /// Wash the whole surface with a translucent colour. Repeated every frame
    /// this leaves fading trails.
    fn fade(&mut self, rgb: [u8; 3], alpha: u8);

    fn line(&mut self, from: Pos2, to: Pos2, pen: Pen);

    /// Circle outline, sized by diameter.
    fn circle(&mut self, center: Pos2, diameter: f32, pen: Pen);

    fn rounded_rect(&mut self, rect: Rect, rounding: f32, pen: Pen);
}

/// One recorded call on a [`Recorder`].
#[cfg(test)]
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear([u8; 3]),
    Fade([u8; 3], u8),
    Line(Pos2, Pos2, Pen),
    Circle(Pos2, f32, Pen),
    RoundedRect(Rect, f32, Pen),
}

/// Surface that keeps the command list instead of drawing.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct Recorder {
    pub width: u32,
    pub height: u32,
    pub commands: Vec<DrawCommand>,
}

#[cfg(test)]
impl Recorder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

#[cfg(test)]
impl Surface for Recorder {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, rgb: [u8; 3]) {
        self.commands.push(DrawCommand::Clear(rgb));
    }

    fn fade(&mut self, rgb: [u8; 3], alpha: u8) {
        self.commands.push(DrawCommand::Fade(rgb, alpha));
    }

    fn line(&mut self, from: Pos2, to: Pos2, pen: Pen) {
        self.commands.push(DrawCommand::Line(from, to, pen));
    }

    fn circle(&mut self, center: Pos2, diameter: f32, pen: Pen) {
        self.commands.push(DrawCommand::Circle(center, diameter, pen));
    }

    fn rounded_rect(&mut self, rect: Rect, rounding: f32, pen: Pen) {
        self.commands.push(DrawCommand::RoundedRect(rect, rounding, pen));
    }
}
