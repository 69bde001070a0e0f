//! Easing curve shared by every slider-to-magnitude conversion.

/// Smoothstep S-curve: `x² · (3 − 2x)`.
///
/// Slope is zero at both ends and 1.5 at the midpoint, so a small slider
/// change near 0 or 1 moves the output less than the same change near 0.5.
#[inline]
pub fn ease(x: f32) -> f32 {
    x * x * (3.0 - 2.0 * x)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_endpoints() {
        assert_eq!(ease(0.0), 0.0);
        assert_eq!(ease(1.0), 1.0);
        assert_eq!(ease(0.5), 0.5);
    }

    #[test]
    fn test_ease_range_and_symmetry() {
        for i in 0..=1000 {
            let x = i as f32 / 1000.0;
            let y = ease(x);
            assert!((0.0..=1.0).contains(&y), "ease({x}) = {y}");
            assert!((y - (1.0 - ease(1.0 - x))).abs() < 1e-6);
        }
    }

    #[test]
    fn test_ease_monotonic() {
        let mut prev = ease(0.0);
        for i in 1..=1000 {
            let y = ease(i as f32 / 1000.0);
            assert!(y >= prev);
            prev = y;
        }
    }

    #[test]
    fn test_ease_flatter_near_endpoints() {
        let step = 0.05;
        let near_zero = ease(step) - ease(0.0);
        let near_mid = ease(0.5 + step / 2.0) - ease(0.5 - step / 2.0);
        assert!(near_zero < near_mid);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.5, 3.0, 0.0), 0.5);
        assert_eq!(lerp(0.5, 3.0, 1.0), 3.0);
        assert_eq!(lerp(20.0, 55.0, 0.5), 37.5);
    }
}
