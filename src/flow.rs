//! Flow field evaluator.
//!
//! The base direction comes from 3D noise over (x, y, time). The noise value
//! is spread over two full turns (4π) rather than one, which gives the field
//! more directional variety. A second, per-particle noise sample adds a small
//! angular jitter scaled by `swirl`, so particles sharing a position still
//! drift apart.

use crate::mapping::MotionConstants;
use crate::noise_source::NoiseSource;
use egui::Vec2;
use std::f64::consts::TAU;

/// Time multiplier for the per-particle jitter sample.
const JITTER_TIME_SCALE: f64 = 0.0005;

pub struct FlowField<'a, N: NoiseSource + ?Sized> {
    noise: &'a N,
    constants: MotionConstants,
    time_ms: f64,
}

impl<'a, N: NoiseSource + ?Sized> FlowField<'a, N> {
    pub fn new(noise: &'a N, constants: MotionConstants, time_ms: f64) -> Self {
        Self {
            noise,
            constants,
            time_ms,
        }
    }

    /// Direction (radians) at `(x, y)` for a particle with jitter seed `seed`.
    pub fn angle(&self, x: f32, y: f32, seed: f32) -> f64 {
        let c = &self.constants;
        let base = self.noise.sample(
            x as f64 * c.noise_scale,
            y as f64 * c.noise_scale,
            self.time_ms * c.time_scale,
        );
        let mut angle = base * TAU * 2.0;

        if c.swirl != 0.0 {
            let jitter = self.noise.sample2(seed as f64, self.time_ms * JITTER_TIME_SCALE);
            angle += (jitter - 0.5) * c.swirl as f64;
        }

        angle
    }

    pub fn velocity(&self, x: f32, y: f32, seed: f32) -> Vec2 {
        let angle = self.angle(x, y, seed);
        let speed = self.constants.speed as f64;
        Vec2::new((angle.cos() * speed) as f32, (angle.sin() * speed) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::MoodParams;
    use crate::noise_source::testing::ConstNoise;
    use crate::noise_source::PerlinNoise;

    #[test]
    fn test_angle_spans_two_turns() {
        let constants = MotionConstants::from_params(&MoodParams::new(0.0, 0.0, 0.5));
        let noise = ConstNoise::new(0.25);
        let field = FlowField::new(&noise, constants, 0.0);
        // 0.25 of 4π is π.
        assert!((field.angle(10.0, 10.0, 0.0) - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_speed_sets_magnitude() {
        let constants = MotionConstants::from_params(&MoodParams::new(1.0, 0.4, 0.5));
        let noise = PerlinNoise::new(11);
        let field = FlowField::new(&noise, constants, 1234.0);
        for i in 0..20 {
            let v = field.velocity(i as f32 * 17.0, i as f32 * 9.0, i as f32);
            assert!((v.length() - 3.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_no_swirl_means_no_jitter() {
        let constants = MotionConstants::from_params(&MoodParams::new(0.0, 0.0, 0.45));
        assert_eq!(constants.swirl, 0.0);
        let noise = PerlinNoise::new(5);
        let field = FlowField::new(&noise, constants, 500.0);

        let (x, y) = (123.0_f32, 45.0_f32);
        let base = noise.sample(x as f64 * 0.002, y as f64 * 0.002, 500.0 * 0.0001);
        let pure = base * TAU * 2.0;
        for seed in [0.0, 17.5, 999.0] {
            assert_eq!(field.angle(x, y, seed), pure);
        }
        let v = field.velocity(x, y, 3.0);
        assert!((v.x - (pure.cos() * 0.5) as f32).abs() < 1e-6);
        assert!((v.y - (pure.sin() * 0.5) as f32).abs() < 1e-6);
    }

    #[test]
    fn test_swirl_decorrelates_colocated_particles() {
        let constants = MotionConstants::from_params(&MoodParams::new(0.5, 1.0, 0.5));
        let noise = PerlinNoise::new(8);
        let field = FlowField::new(&noise, constants, 2500.0);
        let a = field.angle(200.0, 200.0, 12.3);
        let b = field.angle(200.0, 200.0, 640.7);
        assert_ne!(a, b);
        assert!((a - b).abs() <= 0.35 + 1e-9);
    }
}
