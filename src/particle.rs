//! Particles and the per-tick integrator.

use crate::flow::FlowField;
use crate::noise_source::NoiseSource;
use crate::ripple::RippleField;
use egui::{Pos2, Vec2};
use rand::Rng;

/// Upper bound for the per-particle jitter seed.
const SEED_RANGE: f32 = 1000.0;

/// Individual particle data
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub pos: Pos2,
    /// Position before the last step; the trail stroke starts here.
    pub prev: Pos2,
    /// Decorrelates the swirl jitter between particles.
    pub seed: f32,
    /// Fixed warmth offset.
    pub tint: f32,
    /// The last step crossed a canvas edge.
    pub wrapped: bool,
}

impl Particle {
    pub fn new(pos: Pos2, seed: f32, tint: f32) -> Self {
        Self {
            pos,
            prev: pos,
            seed,
            tint,
            wrapped: false,
        }
    }

    /// Uniformly placed particle with a random seed and tint in `[-tint_range, tint_range)`.
    pub fn random(rng: &mut impl Rng, width: f32, height: f32, tint_range: f32) -> Self {
        let pos = Pos2::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height));
        let tint = if tint_range > 0.0 {
            rng.gen_range(-tint_range..tint_range)
        } else {
            0.0
        };
        Self::new(pos, rng.gen_range(0.0..SEED_RANGE), tint)
    }

    /// Move by `velocity` and wrap onto the torus.
    pub fn step(&mut self, velocity: Vec2, width: f32, height: f32) {
        self.prev = self.pos;
        self.pos += velocity;
        let wrapped_x = wrap_axis(&mut self.pos.x, width);
        let wrapped_y = wrap_axis(&mut self.pos.y, height);
        self.wrapped = wrapped_x || wrapped_y;
    }
}

/// Single-step toroidal correction. Returns true if the value was moved.
///
/// A tick normally moves a particle far less than a canvas extent, so one
/// add or subtract suffices. A step longer than that is reduced modulo the
/// extent instead.
pub fn wrap_axis(v: &mut f32, extent: f32) -> bool {
    let mut wrapped = false;
    if *v < 0.0 {
        *v += extent;
        wrapped = true;
    }
    // Not an else: a tiny negative plus `extent` can round up to `extent`.
    if *v >= extent {
        *v -= extent;
        wrapped = true;
    }
    if !(0.0..extent).contains(v) {
        let r = v.rem_euclid(extent);
        *v = if r.is_finite() && r < extent { r } else { 0.0 };
    }
    wrapped
}

/// Advance every particle by flow field plus ripple forces.
pub fn integrate<N, F>(
    particles: &mut [Particle],
    flow: &FlowField<'_, N>,
    forces: &F,
    width: f32,
    height: f32,
) where
    N: NoiseSource + ?Sized,
    F: RippleField + ?Sized,
{
    for p in particles.iter_mut() {
        let velocity = flow.velocity(p.pos.x, p.pos.y, p.seed) + forces.force_at(p.pos);
        p.step(velocity, width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounded::BoundedLog;
    use crate::mapping::{MoodParams, MotionConstants};
    use crate::noise_source::testing::ConstNoise;
    use crate::noise_source::PerlinNoise;
    use crate::ripple::{LinearScan, Ripple};
    use egui::pos2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_wrap_axis() {
        let mut v = -2.5;
        assert!(wrap_axis(&mut v, 900.0));
        assert_eq!(v, 897.5);

        let mut v = 900.0;
        assert!(wrap_axis(&mut v, 900.0));
        assert_eq!(v, 0.0);

        let mut v = 901.25;
        assert!(wrap_axis(&mut v, 900.0));
        assert_eq!(v, 1.25);

        let mut v = 450.0;
        assert!(!wrap_axis(&mut v, 900.0));
        assert_eq!(v, 450.0);
    }

    #[test]
    fn test_wrap_oversized_step_lands_on_canvas() {
        let mut v = 2850.0;
        assert!(wrap_axis(&mut v, 900.0));
        assert_eq!(v, 150.0);

        let mut v = -1000.0;
        assert!(wrap_axis(&mut v, 900.0));
        assert_eq!(v, 800.0);

        let mut v = 1.0e7;
        wrap_axis(&mut v, 560.0);
        assert!((0.0..560.0).contains(&v), "{v}");
    }

    #[test]
    fn test_wrap_tiny_negative_stays_in_bounds() {
        let mut v = -1e-9_f32;
        wrap_axis(&mut v, 900.0);
        assert!((0.0..900.0).contains(&v));
    }

    #[test]
    fn test_step_records_prev_and_wrap() {
        let mut p = Particle::new(pos2(899.0, 10.0), 1.0, 0.0);
        p.step(Vec2::new(2.0, 1.0), 900.0, 560.0);
        assert_eq!(p.prev, pos2(899.0, 10.0));
        assert_eq!(p.pos, pos2(1.0, 11.0));
        assert!(p.wrapped);

        p.step(Vec2::new(1.0, 1.0), 900.0, 560.0);
        assert!(!p.wrapped);
    }

    #[test]
    fn test_random_particles_in_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            let p = Particle::random(&mut rng, 900.0, 560.0, 0.12);
            assert!((0.0..900.0).contains(&p.pos.x));
            assert!((0.0..560.0).contains(&p.pos.y));
            assert!((0.0..1000.0).contains(&p.seed));
            assert!((-0.12..0.12).contains(&p.tint));
            assert_eq!(p.prev, p.pos);
        }
    }

    #[test]
    fn test_integrate_keeps_positions_in_bounds() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut particles: Vec<Particle> =
            (0..300).map(|_| Particle::random(&mut rng, 200.0, 120.0, 0.12)).collect();
        let noise = PerlinNoise::new(21);
        let mut ripples = BoundedLog::new(50);
        for i in 0..50 {
            ripples.push(Ripple::new(pos2((i * 13 % 200) as f32, (i * 7 % 120) as f32), 80.0, 0.6));
        }
        let scan = LinearScan::new(&ripples);
        let constants = MotionConstants::from_params(&MoodParams::new(1.0, 1.0, 0.5));

        for frame in 0..200 {
            let flow = FlowField::new(&noise, constants, frame as f64 * 16.0);
            integrate(&mut particles, &flow, &scan, 200.0, 120.0);
            for p in &particles {
                assert!(p.pos.x >= 0.0 && p.pos.x < 200.0, "{:?}", p.pos);
                assert!(p.pos.y >= 0.0 && p.pos.y < 120.0, "{:?}", p.pos);
            }
        }
    }

    #[test]
    fn test_integrate_adds_ripple_force_to_flow() {
        // noise 0 => angle 0 => flow points along +x at speed 0.5.
        let noise = ConstNoise::new(0.0);
        let constants = MotionConstants::from_params(&MoodParams::new(0.0, 0.0, 0.5));
        let flow = FlowField::new(&noise, constants, 0.0);
        let mut ripples = BoundedLog::new(4);
        let ripple = Ripple::new(pos2(100.0, 100.0), 80.0, 0.6);
        ripples.push(ripple);
        let scan = LinearScan::new(&ripples);

        let start = pos2(120.0, 100.0);
        let mut particles = vec![Particle::new(start, 0.0, 0.0)];
        integrate(&mut particles, &flow, &scan, 900.0, 560.0);

        let expected = start + Vec2::new(0.5, 0.0) + ripple.force_at(start);
        assert!((particles[0].pos - expected).length() < 1e-5);
    }
}
