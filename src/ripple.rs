//! Ripple sources and the force accumulator.
//!
//! Each ripple is a fixed vortex: inside its radius it pushes particles along
//! the tangent to the radius vector, with a cubic falloff that is strongest
//! at the centre and vanishes at the rim. Forces from all ripples covering a
//! point are summed.

use crate::bounded::BoundedLog;
use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Offsets shorter than this (squared) have no defined tangent, so the
/// ripple contributes nothing there.
const MIN_OFFSET_SQ: f32 = 1e-12;

/// Added to the squared distance so the falloff never sees d = 0.
const DIST_SQ_EPSILON: f32 = 1.0;

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Ripple {
    pub origin: Pos2,
    pub radius: f32,
    pub strength: f32,
}

impl Ripple {
    pub fn new(origin: Pos2, radius: f32, strength: f32) -> Self {
        Self {
            origin,
            radius,
            strength,
        }
    }

    /// Falloff-scaled strength at `p`, or `None` when `p` is out of reach.
    pub fn falloff(&self, p: Pos2) -> Option<f32> {
        let d2 = (p - self.origin).length_sq() + DIST_SQ_EPSILON;
        if d2 >= self.radius * self.radius {
            return None;
        }
        let t = 1.0 - d2.sqrt() / self.radius;
        Some(self.strength * t * t * t)
    }

    /// Tangential force this ripple applies at `p`.
    pub fn force_at(&self, p: Pos2) -> Vec2 {
        let offset = p - self.origin;
        let Some(strength) = self.falloff(p) else {
            return Vec2::ZERO;
        };
        if offset.length_sq() < MIN_OFFSET_SQ {
            return Vec2::ZERO;
        }
        let d = (offset.length_sq() + DIST_SQ_EPSILON).sqrt();
        Vec2::new(-offset.y / d, offset.x / d) * strength
    }
}

/// Anything that can report the summed ripple force at a point.
pub trait RippleField {
    fn force_at(&self, p: Pos2) -> Vec2;
}

/// How the simulation looks up ripples near a particle.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum RippleIndex {
    /// Visit every ripple for every particle.
    #[default]
    Linear,
    /// Bucket ripples into a uniform grid rebuilt each frame.
    Grid,
}

/// Full scan over the ripple log.
pub struct LinearScan<'a> {
    ripples: &'a BoundedLog<Ripple>,
}

impl<'a> LinearScan<'a> {
    pub fn new(ripples: &'a BoundedLog<Ripple>) -> Self {
        Self { ripples }
    }
}

impl RippleField for LinearScan<'_> {
    fn force_at(&self, p: Pos2) -> Vec2 {
        self.ripples
            .iter()
            .fold(Vec2::ZERO, |acc, r| acc + r.force_at(p))
    }
}

/// Uniform grid over ripple origins.
///
/// Cell size equals the largest ripple radius, so every ripple that can reach
/// a point sits in the point's cell or one of its eight neighbours. Candidates
/// are summed in insertion order, which makes the result identical to
/// [`LinearScan`].
pub struct RippleGrid {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<usize>>,
    ripples: Vec<Ripple>,
}

impl Default for RippleGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl RippleGrid {
    pub fn new() -> Self {
        Self {
            cell_size: 1.0,
            cells: HashMap::new(),
            ripples: Vec::new(),
        }
    }

    pub fn rebuild(&mut self, ripples: &BoundedLog<Ripple>) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
        self.ripples.clear();
        self.ripples.extend(ripples.iter().copied());

        let max_radius = self
            .ripples
            .iter()
            .map(|r| r.radius)
            .fold(0.0_f32, f32::max);
        let cell_size = max_radius.max(1.0);
        if cell_size != self.cell_size {
            self.cells.clear();
            self.cell_size = cell_size;
        }

        for (i, r) in self.ripples.iter().enumerate() {
            let cell = self.cell_of(r.origin);
            self.cells.entry(cell).or_default().push(i);
        }
    }

    fn cell_of(&self, p: Pos2) -> (i32, i32) {
        (
            (p.x / self.cell_size).floor() as i32,
            (p.y / self.cell_size).floor() as i32,
        )
    }

    /// The point's cell and its eight neighbours. Each bucket holds
    /// ripple indices in ascending order.
    fn neighbourhood(&self, p: Pos2) -> [&[usize]; 9] {
        let (cx, cy) = self.cell_of(p);
        let mut buckets: [&[usize]; 9] = [&[][..]; 9];
        for (slot, (dx, dy)) in buckets
            .iter_mut()
            .zip((-1..=1).flat_map(|dx| (-1..=1).map(move |dy| (dx, dy))))
        {
            if let Some(bucket) = self.cells.get(&(cx + dx, cy + dy)) {
                *slot = bucket;
            }
        }
        buckets
    }
}

impl RippleField for RippleGrid {
    /// Merges the nine sorted buckets on the fly so ripples are summed in
    /// insertion order without collecting them first.
    fn force_at(&self, p: Pos2) -> Vec2 {
        let mut buckets = self.neighbourhood(p);
        let mut acc = Vec2::ZERO;
        loop {
            let next = buckets
                .iter()
                .enumerate()
                .filter_map(|(slot, b)| b.first().map(|&i| (i, slot)))
                .min();
            let Some((i, slot)) = next else {
                return acc;
            };
            let rest = buckets[slot];
            buckets[slot] = &rest[1..];
            acc += self.ripples[i].force_at(p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn ripple_at(x: f32, y: f32) -> Ripple {
        Ripple::new(pos2(x, y), 80.0, 0.6)
    }

    #[test]
    fn test_no_force_at_or_beyond_radius() {
        let r = ripple_at(100.0, 100.0);
        assert_eq!(r.falloff(pos2(180.0, 100.0)), None);
        assert_eq!(r.force_at(pos2(180.0, 100.0)), Vec2::ZERO);
        assert_eq!(r.force_at(pos2(300.0, 300.0)), Vec2::ZERO);
        // sqrt(79.5² + 1) is still under 80, so this one is inside.
        assert!(r.falloff(pos2(179.5, 100.0)).is_some());
    }

    #[test]
    fn test_falloff_at_centre() {
        let r = ripple_at(100.0, 100.0);
        let s = r.falloff(pos2(100.0, 100.0)).unwrap();
        let expected = 0.6 * (1.0_f32 - 1.0 / 80.0).powi(3);
        assert!((s - expected).abs() < 1e-6);
        assert!((s - 0.577).abs() < 1e-3);
    }

    #[test]
    fn test_zero_offset_gives_zero_force() {
        let r = ripple_at(100.0, 100.0);
        assert_eq!(r.force_at(pos2(100.0, 100.0)), Vec2::ZERO);
    }

    #[test]
    fn test_force_is_tangential() {
        let r = ripple_at(100.0, 100.0);
        let p = pos2(130.0, 110.0);
        let f = r.force_at(p);
        let radial = p - r.origin;
        assert!(f.length() > 0.0);
        assert!(f.dot(radial).abs() < 1e-4);
        // Counter-clockwise in screen space: +x offset pushes +y.
        let f_right = r.force_at(pos2(140.0, 100.0));
        assert!(f_right.y > 0.0);
        assert!(f_right.x.abs() < 1e-6);
    }

    #[test]
    fn test_falloff_decreases_outward() {
        let r = ripple_at(0.0, 0.0);
        let mut prev = f32::MAX;
        for d in [2.0, 10.0, 30.0, 50.0, 70.0, 79.0] {
            let s = r.falloff(pos2(d, 0.0)).unwrap();
            assert!(s < prev);
            prev = s;
        }
    }

    #[test]
    fn test_linear_scan_sums_ripples() {
        let mut log = BoundedLog::new(10);
        log.push(ripple_at(100.0, 100.0));
        log.push(ripple_at(120.0, 100.0));
        let p = pos2(110.0, 130.0);
        let expected = log.iter().next().unwrap().force_at(p) + log.iter().nth(1).unwrap().force_at(p);
        assert_eq!(LinearScan::new(&log).force_at(p), expected);
    }

    #[test]
    fn test_opposite_ripples_cancel() {
        let mut log = BoundedLog::new(10);
        log.push(ripple_at(90.0, 100.0));
        log.push(ripple_at(110.0, 100.0));
        // Midpoint: tangents point in opposite directions.
        let f = LinearScan::new(&log).force_at(pos2(100.0, 100.0));
        assert!(f.length() < 1e-5);
    }

    #[test]
    fn test_grid_matches_linear_scan() {
        let mut log = BoundedLog::new(600);
        for i in 0..400 {
            let x = (i * 37 % 900) as f32 + 0.5;
            let y = (i * 53 % 560) as f32 + 0.25;
            log.push(ripple_at(x, y));
        }
        let mut grid = RippleGrid::new();
        grid.rebuild(&log);
        let scan = LinearScan::new(&log);

        for i in 0..300 {
            let p = pos2((i * 29 % 900) as f32 + 0.3, (i * 71 % 560) as f32 + 0.7);
            assert_eq!(grid.force_at(p), scan.force_at(p), "at {p:?}");
        }
    }

    #[test]
    fn test_grid_matches_scan_with_clustered_ripples() {
        // Interleave pushes across neighbouring cells so the merged order
        // differs from bucket order.
        let mut log = BoundedLog::new(64);
        for i in 0..200 {
            let cell = (i % 4) as f32;
            log.push(Ripple::new(
                pos2(100.0 + cell * 45.0 + (i % 7) as f32, 100.0 + (i % 3) as f32 * 30.0),
                40.0 + (i % 5) as f32 * 10.0,
                0.6,
            ));
        }
        let mut grid = RippleGrid::new();
        grid.rebuild(&log);
        let scan = LinearScan::new(&log);
        for x in (60..300).step_by(7) {
            for y in (60..200).step_by(11) {
                let p = pos2(x as f32 + 0.5, y as f32 + 0.25);
                assert_eq!(grid.force_at(p), scan.force_at(p), "at {p:?}");
            }
        }
    }

    #[test]
    fn test_grid_rebuild_drops_evicted() {
        let mut log = BoundedLog::new(1);
        log.push(ripple_at(50.0, 50.0));
        let mut grid = RippleGrid::new();
        grid.rebuild(&log);
        assert_ne!(grid.force_at(pos2(60.0, 50.0)), Vec2::ZERO);

        log.push(ripple_at(800.0, 500.0));
        grid.rebuild(&log);
        assert_eq!(grid.force_at(pos2(60.0, 50.0)), Vec2::ZERO);
    }

    #[test]
    fn test_empty_grid() {
        let grid = RippleGrid::new();
        assert_eq!(grid.force_at(pos2(1.0, 1.0)), Vec2::ZERO);
    }
}
