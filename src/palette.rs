//! Warmth palette.
//!
//! A fixed four-source gradient: two cool colours and two warm colours are
//! each pre-blended into an anchor, then warmth picks a point between the
//! anchors through the easing curve.

use crate::easing::ease;

/// RGB colour with f32 channels in 0..255. Rounded to bytes only when a
/// stroke is issued.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Per-channel linear blend. Exact at both ends: `t = 0` gives `self`,
    /// `t = 1` gives `other`.
    pub fn blend(self, other: Rgb, t: f32) -> Rgb {
        let s = 1.0 - t;
        Rgb {
            r: self.r * s + other.r * t,
            g: self.g * s + other.g * t,
            b: self.b * s + other.b * t,
        }
    }

    pub fn to_bytes(self) -> [u8; 3] {
        [
            self.r.round().clamp(0.0, 255.0) as u8,
            self.g.round().clamp(0.0, 255.0) as u8,
            self.b.round().clamp(0.0, 255.0) as u8,
        ]
    }
}

const COOL_A: Rgb = Rgb::new(40.0, 140.0, 255.0);
const COOL_B: Rgb = Rgb::new(120.0, 80.0, 255.0);
const COOL_MIX: f32 = 0.55;

const WARM_A: Rgb = Rgb::new(255.0, 140.0, 90.0);
const WARM_B: Rgb = Rgb::new(255.0, 210.0, 120.0);
const WARM_MIX: f32 = 0.4;

pub fn cool_anchor() -> Rgb {
    COOL_A.blend(COOL_B, COOL_MIX)
}

pub fn warm_anchor() -> Rgb {
    WARM_A.blend(WARM_B, WARM_MIX)
}

/// Colour for a warmth value shifted by a per-item tint offset.
pub fn mood_color(warmth: f32, tint: f32) -> Rgb {
    let t = (warmth + tint).clamp(0.0, 1.0);
    cool_anchor().blend(warm_anchor(), ease(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cold_end_is_cool_anchor() {
        assert_eq!(mood_color(0.0, 0.0), cool_anchor());
        assert_eq!(cool_anchor().to_bytes(), [84, 107, 255]);
    }

    #[test]
    fn test_warm_end_is_warm_anchor() {
        assert_eq!(mood_color(1.0, 0.0), warm_anchor());
        assert_eq!(warm_anchor().to_bytes(), [255, 168, 102]);
    }

    #[test]
    fn test_tint_is_clamped() {
        assert_eq!(mood_color(0.05, -0.12), cool_anchor());
        assert_eq!(mood_color(0.95, 0.12), warm_anchor());
    }

    #[test]
    fn test_midpoint_is_halfway() {
        let mid = mood_color(0.5, 0.0);
        let c = cool_anchor();
        let w = warm_anchor();
        assert!((mid.r - (c.r + w.r) / 2.0).abs() < 1e-3);
        assert!((mid.g - (c.g + w.g) / 2.0).abs() < 1e-3);
        assert!((mid.b - (c.b + w.b) / 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_red_channel_rises_with_warmth() {
        let mut prev = mood_color(0.0, 0.0).r;
        for i in 1..=20 {
            let r = mood_color(i as f32 / 20.0, 0.0).r;
            assert!(r >= prev);
            prev = r;
        }
    }
}
