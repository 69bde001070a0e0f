//! CPU rasterizer.
//!
//! The canvas is never cleared between frames (trails come from the
//! translucent fade), so it needs a persistent pixel buffer. Strokes are
//! rendered with one pixel of anti-aliasing from a signed distance per shape
//! and composited with straight-alpha OVER into an f32 RGB buffer, which is
//! quantized to RGBA8 for display and export.

use crate::surface::{Pen, Surface};
use egui::{Pos2, Rect, Vec2};
use rayon::prelude::*;

pub struct Raster {
    width: u32,
    height: u32,
    /// RGB in 0..255 float space.
    rgb: Vec<f32>,
    /// Output RGBA8, alpha always opaque.
    out_rgba: Vec<u8>,
}

impl Raster {
    pub fn new(width: u32, height: u32) -> Self {
        let px = (width * height) as usize;
        Self {
            width,
            height,
            rgb: vec![0.0; px * 3],
            out_rgba: vec![255; px * 4],
        }
    }

    /// Quantize the float buffer to RGBA8.
    pub fn to_rgba(&mut self) -> &[u8] {
        self.out_rgba
            .par_chunks_mut(4)
            .zip(self.rgb.par_chunks(3))
            .for_each(|(out, src)| {
                out[0] = src[0].round().clamp(0.0, 255.0) as u8;
                out[1] = src[1].round().clamp(0.0, 255.0) as u8;
                out[2] = src[2].round().clamp(0.0, 255.0) as u8;
                out[3] = 255;
            });
        &self.out_rgba
    }

    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> [f32; 3] {
        let base = ((y * self.width + x) * 3) as usize;
        [self.rgb[base], self.rgb[base + 1], self.rgb[base + 2]]
    }

    #[inline]
    fn blend_px(&mut self, x: i32, y: i32, rgb: [f32; 3], a: f32) {
        if a <= 0.0 || x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let base = (y as usize * self.width as usize + x as usize) * 3;
        let inv = 1.0 - a;
        self.rgb[base] = self.rgb[base] * inv + rgb[0] * a;
        self.rgb[base + 1] = self.rgb[base + 1] * inv + rgb[1] * a;
        self.rgb[base + 2] = self.rgb[base + 2] * inv + rgb[2] * a;
    }

    /// Pixel span covered by `[lo, hi]`, clipped to `0..limit`.
    fn span(lo: f32, hi: f32, limit: u32) -> Option<(i32, i32)> {
        let min = lo.floor().max(0.0) as i32;
        let max = hi.ceil().min(limit as f32 - 1.0) as i32;
        (min <= max).then_some((min, max))
    }

    /// Stroke every pixel in the box whose centre lies within the pen's
    /// half-width of the outline described by `dist`.
    fn stroke_region(
        &mut self,
        x_range: (i32, i32),
        y_range: (i32, i32),
        pen: Pen,
        dist: impl Fn(Pos2) -> f32,
    ) {
        let rgb = pen_rgb(pen);
        let alpha = pen.alpha as f32 / 255.0;
        let half = pen.width * 0.5;
        for py in y_range.0..=y_range.1 {
            for px in x_range.0..=x_range.1 {
                let center = Pos2::new(px as f32 + 0.5, py as f32 + 0.5);
                let coverage = coverage(half, dist(center));
                if coverage > 0.0 {
                    self.blend_px(px, py, rgb, alpha * coverage);
                }
            }
        }
    }
}

fn pen_rgb(pen: Pen) -> [f32; 3] {
    [pen.rgb[0] as f32, pen.rgb[1] as f32, pen.rgb[2] as f32]
}

/// Fraction of a pixel covered by a stroke of half-width `half` whose
/// centre line is `dist` away.
#[inline]
fn coverage(half: f32, dist: f32) -> f32 {
    (half + 0.5 - dist).clamp(0.0, 1.0)
}

fn segment_distance(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq <= f32::EPSILON {
        return (p - a).length();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}

fn rounded_rect_sdf(p: Pos2, center: Pos2, half_size: Vec2, rounding: f32) -> f32 {
    let d = p - center;
    let q = Vec2::new(d.x.abs(), d.y.abs()) - (half_size - Vec2::splat(rounding));
    let outside = Vec2::new(q.x.max(0.0), q.y.max(0.0)).length();
    outside + q.x.max(q.y).min(0.0) - rounding
}

impl Surface for Raster {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, rgb: [u8; 3]) {
        let c = [rgb[0] as f32, rgb[1] as f32, rgb[2] as f32];
        self.rgb.par_chunks_mut(3).for_each(|px| px.copy_from_slice(&c));
    }

    fn fade(&mut self, rgb: [u8; 3], alpha: u8) {
        let a = alpha as f32 / 255.0;
        let inv = 1.0 - a;
        let c = [rgb[0] as f32 * a, rgb[1] as f32 * a, rgb[2] as f32 * a];
        self.rgb.par_chunks_mut(3).for_each(|px| {
            px[0] = px[0] * inv + c[0];
            px[1] = px[1] * inv + c[1];
            px[2] = px[2] * inv + c[2];
        });
    }

    fn line(&mut self, from: Pos2, to: Pos2, pen: Pen) {
        let reach = pen.width * 0.5 + 1.0;
        let Some(xs) = Raster::span(from.x.min(to.x) - reach, from.x.max(to.x) + reach, self.width)
        else {
            return;
        };
        let Some(ys) = Raster::span(from.y.min(to.y) - reach, from.y.max(to.y) + reach, self.height)
        else {
            return;
        };
        self.stroke_region(xs, ys, pen, |p| segment_distance(p, from, to));
    }

    fn circle(&mut self, center: Pos2, diameter: f32, pen: Pen) {
        let radius = diameter * 0.5;
        let reach = radius + pen.width * 0.5 + 1.0;
        let Some(xs) = Raster::span(center.x - reach, center.x + reach, self.width) else {
            return;
        };
        let Some(ys) = Raster::span(center.y - reach, center.y + reach, self.height) else {
            return;
        };
        self.stroke_region(xs, ys, pen, |p| ((p - center).length() - radius).abs());
    }

    fn rounded_rect(&mut self, rect: Rect, rounding: f32, pen: Pen) {
        let half_size = rect.size() * 0.5;
        let rounding = rounding.clamp(0.0, half_size.x.min(half_size.y));
        let center = rect.center();
        let reach = pen.width * 0.5 + 1.0;
        let dist = |p: Pos2| rounded_rect_sdf(p, center, half_size, rounding).abs();

        let outer = rect.expand(reach);
        let Some(xs) = Raster::span(outer.left(), outer.right(), self.width) else {
            return;
        };
        let Some(ys) = Raster::span(outer.top(), outer.bottom(), self.height) else {
            return;
        };

        // Only the border band can be touched: full rows near the top and
        // bottom edges (corners included), left/right strips in between.
        let band = reach + rounding;
        let inner_top = (rect.top() + band).ceil() as i32;
        let inner_bottom = (rect.bottom() - band).floor() as i32;
        let left_strip = (xs.0, ((rect.left() + reach).ceil() as i32).min(xs.1));
        let right_strip = (((rect.right() - reach).floor() as i32).max(xs.0), xs.1);

        if inner_top > inner_bottom {
            self.stroke_region(xs, ys, pen, dist);
            return;
        }
        if ys.0 < inner_top {
            self.stroke_region(xs, (ys.0, (inner_top - 1).min(ys.1)), pen, dist);
        }
        let mid = (inner_top.max(ys.0), inner_bottom.min(ys.1));
        if mid.0 <= mid.1 {
            self.stroke_region(left_strip, mid, pen, dist);
            self.stroke_region(right_strip, mid, pen, dist);
        }
        if inner_bottom < ys.1 {
            self.stroke_region(xs, ((inner_bottom + 1).max(ys.0), ys.1), pen, dist);
        }
    }
}
