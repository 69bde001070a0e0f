//! Parameter mapping: the three mood sliders to motion constants.

use crate::easing::{ease, lerp};
use serde::{Deserialize, Serialize};

/// The three mood parameters, each in [0, 1].
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct MoodParams {
    pub energy: f32,
    pub tension: f32,
    pub warmth: f32,
}

impl Default for MoodParams {
    fn default() -> Self {
        Self {
            energy: 0.28,
            tension: 0.2,
            warmth: 0.45,
        }
    }
}

impl MoodParams {
    pub fn new(energy: f32, tension: f32, warmth: f32) -> Self {
        Self {
            energy,
            tension,
            warmth,
        }
    }

    /// Clamp every parameter into [0, 1]. Used where values enter from a
    /// config file; the sliders already enforce the range.
    pub fn clamped(self) -> Self {
        Self {
            energy: self.energy.clamp(0.0, 1.0),
            tension: self.tension.clamp(0.0, 1.0),
            warmth: self.warmth.clamp(0.0, 1.0),
        }
    }
}

/// Numeric constants derived from [`MoodParams`] once per frame.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct MotionConstants {
    /// Pixels per tick.
    pub speed: f32,
    pub noise_scale: f64,
    pub time_scale: f64,
    /// Amplitude (radians) of the per-particle angular jitter.
    pub swirl: f32,
    pub stroke_weight: f32,
    /// Trail alpha on a 0..255 scale.
    pub particle_alpha: f32,
}

impl MotionConstants {
    pub fn from_params(params: &MoodParams) -> Self {
        let energy = ease(params.energy);
        let tension = ease(params.tension);

        Self {
            speed: lerp(0.5, 3.0, energy),
            noise_scale: lerp(0.002, 0.011, tension) as f64,
            time_scale: lerp(0.0001, 0.0006, energy) as f64,
            swirl: lerp(0.0, 0.35, tension),
            stroke_weight: lerp(1.1, 1.9, tension),
            particle_alpha: lerp(20.0, 55.0, energy),
        }
    }

    pub fn alpha_u8(&self) -> u8 {
        self.particle_alpha.round().clamp(0.0, 255.0) as u8
    }
}
