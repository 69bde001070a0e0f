//! Configuration System for Mood Flow

use crate::mapping::MoodParams;
use crate::ripple::RippleIndex;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Looked up in the working directory at startup.
pub const DEFAULT_CONFIG_FILE: &str = "mood_flow.json";

// ============================================================================
// Canvas
// ============================================================================

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 900,
            height: 560,
        }
    }
}

// ============================================================================
// Simulation
// ============================================================================

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub base_particles: usize,
    pub max_ripples: usize,
    pub max_lines: usize,
    pub ripple_radius: f32,
    pub ripple_strength: f32,
    /// Particle tints are drawn from `[-tint_range, tint_range)`.
    pub tint_range: f32,
    pub line_length_min: f32,
    pub line_length_max: f32,
    /// Line colours shift warmth by up to this much either way.
    pub line_tint_jitter: f32,
    pub ripple_index: RippleIndex,
    /// Fixed RNG seed; fresh entropy when absent.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            base_particles: 650,
            max_ripples: 600,
            max_lines: 200,
            ripple_radius: 80.0,
            ripple_strength: 0.6,
            tint_range: 0.12,
            line_length_min: 90.0,
            line_length_max: 220.0,
            line_tint_jitter: 0.05,
            ripple_index: RippleIndex::Linear,
            seed: None,
        }
    }
}

// Ceilings for values read from disk. A tick moves a particle by at most
// the flow speed plus the summed ripple strengths, which these keep far below
// any canvas that is allowed.
const MAX_CANVAS_SIDE: u32 = 8192;
const MIN_CANVAS_SIDE: u32 = 16;
const MAX_PARTICLES: usize = 50_000;
const MAX_EVENTS: usize = 10_000;
const MAX_RIPPLE_RADIUS: f32 = 1000.0;
const MAX_RIPPLE_STRENGTH: f32 = 5.0;
const MAX_LINE_LENGTH: f32 = 4000.0;
const MAX_TINT: f32 = 1.0;

impl SimulationConfig {
    /// Replace values that would break an invariant with their defaults and
    /// clamp the rest to their ceilings.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.base_particles > MAX_PARTICLES {
            log::warn!("base_particles {} capped at {MAX_PARTICLES}", self.base_particles);
            self.base_particles = MAX_PARTICLES;
        }
        if self.max_ripples > MAX_EVENTS {
            log::warn!("max_ripples {} capped at {MAX_EVENTS}", self.max_ripples);
            self.max_ripples = MAX_EVENTS;
        }
        if self.max_lines > MAX_EVENTS {
            log::warn!("max_lines {} capped at {MAX_EVENTS}", self.max_lines);
            self.max_lines = MAX_EVENTS;
        }
        self.ripple_radius = positive_capped(
            "ripple_radius",
            self.ripple_radius,
            defaults.ripple_radius,
            MAX_RIPPLE_RADIUS,
        );
        self.ripple_strength = positive_capped(
            "ripple_strength",
            self.ripple_strength,
            defaults.ripple_strength,
            MAX_RIPPLE_STRENGTH,
        );
        let lengths_ok = self.line_length_min.is_finite()
            && self.line_length_max.is_finite()
            && self.line_length_min > 0.0
            && self.line_length_max > self.line_length_min
            && self.line_length_max <= MAX_LINE_LENGTH;
        if !lengths_ok {
            log::warn!(
                "line length range {}..{} is invalid, using {}..{}",
                self.line_length_min,
                self.line_length_max,
                defaults.line_length_min,
                defaults.line_length_max
            );
            self.line_length_min = defaults.line_length_min;
            self.line_length_max = defaults.line_length_max;
        }
        self.tint_range = tint_capped("tint_range", self.tint_range, defaults.tint_range);
        self.line_tint_jitter =
            tint_capped("line_tint_jitter", self.line_tint_jitter, defaults.line_tint_jitter);
        self
    }
}

/// `value` when finite and positive, capped at `max`; `default` otherwise.
fn positive_capped(name: &str, value: f32, default: f32, max: f32) -> f32 {
    if !(value.is_finite() && value > 0.0) {
        log::warn!("{name} must be positive and finite, using {default}");
        return default;
    }
    if value > max {
        log::warn!("{name} {value} capped at {max}");
        return max;
    }
    value
}

/// Magnitude of a tint offset, at most [`MAX_TINT`].
fn tint_capped(name: &str, value: f32, default: f32) -> f32 {
    if !value.is_finite() {
        log::warn!("{name} must be finite, using {default}");
        return default;
    }
    value.abs().min(MAX_TINT)
}

// ============================================================================
// Export
// ============================================================================

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    pub directory: String,
    pub file_stem: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            file_stem: "mood_expression".to_string(),
        }
    }
}

// ============================================================================
// Main App Configuration
// ============================================================================

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub canvas: CanvasConfig,
    pub simulation: SimulationConfig,
    /// Slider positions at startup.
    pub mood: MoodParams,
    pub export: ExportConfig,
}

impl AppConfig {
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json =
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&json)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config.sanitized())
    }

    /// Load `path` if it exists, otherwise defaults. A broken file is
    /// reported and ignored.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Failed to load {}: {e:#}; using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn sanitized(mut self) -> Self {
        let defaults = CanvasConfig::default();
        let side_ok = |v: u32| (MIN_CANVAS_SIDE..=MAX_CANVAS_SIDE).contains(&v);
        if !side_ok(self.canvas.width) || !side_ok(self.canvas.height) {
            log::warn!(
                "canvas size {}x{} is out of range, using {}x{}",
                self.canvas.width,
                self.canvas.height,
                defaults.width,
                defaults.height
            );
            self.canvas = defaults;
        }
        self.simulation = self.simulation.sanitized();
        self.mood = self.mood.clamped();
        self
    }
}
