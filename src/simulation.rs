//! Simulation state and the per-frame tick.
//!
//! Everything mutable lives in [`Simulation`]: particles, the ripple and line
//! logs, the noise source, the RNG and the clock. Pointer events mutate it
//! between ticks; `tick` reads the mood parameters, advances every particle
//! and issues draw commands.

use crate::bounded::BoundedLog;
use crate::config::{CanvasConfig, SimulationConfig};
use crate::flow::FlowField;
use crate::mapping::{MoodParams, MotionConstants};
use crate::noise_source::NoiseSource;
use crate::palette::{mood_color, Rgb};
use crate::particle::{integrate, Particle};
use crate::ripple::{LinearScan, Ripple, RippleGrid, RippleIndex};
use crate::surface::{Pen, Surface};
use egui::{pos2, Pos2, Rect, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

pub const BACKGROUND: [u8; 3] = [10, 14, 20];
const FADE_ALPHA: u8 = 18;

const RING_PEN: Pen = Pen {
    rgb: [255, 255, 255],
    alpha: 35,
    width: 1.0,
};
/// Rings are drawn at this fraction of the ripple radius, as a diameter.
const RING_SCALE: f32 = 0.9;

const LINE_WIDTH: f32 = 2.2;

const FRAME_PEN: Pen = Pen {
    rgb: [230, 220, 255],
    alpha: 18,
    width: 10.0,
};
const FRAME_INSET: f32 = 8.0;
const FRAME_ROUNDING: f32 = 18.0;

/// Noise seeds are drawn from `0..NOISE_SEED_RANGE`.
const NOISE_SEED_RANGE: u32 = 1_000_000_000;

/// A straight mark left by a click.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct LineMark {
    pub from: Pos2,
    pub to: Pos2,
    pub color: Rgb,
}

impl LineMark {
    /// Segment of `length` centred on `center` at `angle` radians.
    pub fn centered(center: Pos2, length: f32, angle: f32, color: Rgb) -> Self {
        let half = Vec2::angled(angle) * (length * 0.5);
        Self {
            from: center - half,
            to: center + half,
            color,
        }
    }
}

pub struct Simulation {
    config: SimulationConfig,
    width: f32,
    height: f32,
    particles: Vec<Particle>,
    ripples: BoundedLog<Ripple>,
    lines: BoundedLog<LineMark>,
    grid: RippleGrid,
    noise: Box<dyn NoiseSource>,
    rng: StdRng,
    time_ms: f64,
    pending_clear: bool,
}

impl Simulation {
    pub fn new(canvas: &CanvasConfig, config: SimulationConfig, noise: Box<dyn NoiseSource>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut sim = Self {
            width: canvas.width as f32,
            height: canvas.height as f32,
            particles: Vec::with_capacity(config.base_particles),
            ripples: BoundedLog::new(config.max_ripples),
            lines: BoundedLog::new(config.max_lines),
            grid: RippleGrid::new(),
            noise,
            rng,
            time_ms: 0.0,
            pending_clear: true,
            config,
        };
        sim.reset(true);
        sim
    }

    /// Drop all particles, ripples and lines, respawn the base particle
    /// count and clear the canvas on the next draw. With `reseed`, the noise
    /// field gets a fresh seed.
    pub fn reset(&mut self, reseed: bool) {
        self.ripples.clear();
        self.lines.clear();

        let (w, h, tint) = (self.width, self.height, self.config.tint_range);
        let rng = &mut self.rng;
        self.particles.clear();
        self.particles
            .extend((0..self.config.base_particles).map(|_| Particle::random(rng, w, h, tint)));

        if reseed {
            let seed = self.rng.gen_range(0..NOISE_SEED_RANGE);
            self.noise.reseed(seed);
        }
        self.pending_clear = true;

        log::debug!(
            "Reset: {} particles, noise seed {}",
            self.particles.len(),
            self.noise.seed()
        );
    }

    /// Advance the clock by `dt` seconds, move every particle, then draw.
    pub fn tick(&mut self, dt: f32, params: &MoodParams, surface: &mut dyn Surface) {
        self.advance(dt, params);
        self.draw(params, surface);
    }

    /// Move every particle one step. Displacement is per tick; `dt` only
    /// drives the noise clock.
    pub fn advance(&mut self, dt: f32, params: &MoodParams) {
        self.time_ms += dt.max(0.0) as f64 * 1000.0;

        let constants = MotionConstants::from_params(params);
        let flow = FlowField::new(self.noise.as_ref(), constants, self.time_ms);

        match self.config.ripple_index {
            RippleIndex::Linear => {
                let scan = LinearScan::new(&self.ripples);
                integrate(&mut self.particles, &flow, &scan, self.width, self.height);
            }
            RippleIndex::Grid => {
                self.grid.rebuild(&self.ripples);
                integrate(&mut self.particles, &flow, &self.grid, self.width, self.height);
            }
        }
    }

    /// Issue this frame's draw commands: fade, trails, rings, marks, frame.
    pub fn draw(&mut self, params: &MoodParams, surface: &mut dyn Surface) {
        if self.pending_clear {
            surface.clear(BACKGROUND);
            self.pending_clear = false;
        }
        surface.fade(BACKGROUND, FADE_ALPHA);

        let constants = MotionConstants::from_params(params);
        let alpha = constants.alpha_u8();
        for p in &self.particles {
            // A wrapped step would otherwise streak across the whole canvas.
            if p.wrapped {
                continue;
            }
            let color = mood_color(params.warmth, p.tint);
            surface.line(p.prev, p.pos, Pen::from_rgb(color, alpha, constants.stroke_weight));
        }

        for r in &self.ripples {
            surface.circle(r.origin, r.radius * RING_SCALE, RING_PEN);
        }

        for l in &self.lines {
            surface.line(l.from, l.to, Pen::from_rgb(l.color, 255, LINE_WIDTH));
        }

        let frame = Rect::from_min_max(
            pos2(FRAME_INSET, FRAME_INSET),
            pos2(self.width - FRAME_INSET, self.height - FRAME_INSET),
        );
        surface.rounded_rect(frame, FRAME_ROUNDING, FRAME_PEN);
    }

    /// Leave a ripple at `point`. Ignored outside the canvas.
    pub fn handle_pointer_move(&mut self, point: Pos2) -> bool {
        if !self.contains(point) {
            return false;
        }
        self.ripples.push(Ripple::new(
            point,
            self.config.ripple_radius,
            self.config.ripple_strength,
        ));
        true
    }

    /// Leave a randomly sized and angled line mark centred on `point`,
    /// coloured from the current warmth. Ignored outside the canvas.
    pub fn handle_pointer_down(&mut self, point: Pos2, warmth: f32) -> bool {
        if !self.contains(point) {
            return false;
        }
        let cfg = &self.config;
        let length = self.rng.gen_range(cfg.line_length_min..cfg.line_length_max);
        let angle = self.rng.gen_range(0.0..TAU);
        let jitter = if cfg.line_tint_jitter > 0.0 {
            self.rng.gen_range(-cfg.line_tint_jitter..cfg.line_tint_jitter)
        } else {
            0.0
        };
        let mark = LineMark::centered(point, length, angle, mood_color(warmth, jitter));
        self.lines.push(mark);
        true
    }

    pub fn contains(&self, point: Pos2) -> bool {
        point.x >= 0.0 && point.y >= 0.0 && point.x < self.width && point.y < self.height
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn ripples(&self) -> &BoundedLog<Ripple> {
        &self.ripples
    }

    pub fn lines(&self) -> &BoundedLog<LineMark> {
        &self.lines
    }

    pub fn noise_seed(&self) -> u32 {
        self.noise.seed()
    }

    pub fn time_ms(&self) -> f64 {
        self.time_ms
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}
