//! Coherent noise source for the flow field.

use ::noise::{NoiseFn, Perlin};

/// Deterministic coherent noise in [0, 1], reseedable.
pub trait NoiseSource {
    fn sample(&self, x: f64, y: f64, z: f64) -> f64;

    fn sample2(&self, x: f64, y: f64) -> f64 {
        self.sample(x, y, 0.0)
    }

    fn reseed(&mut self, seed: u32);

    fn seed(&self) -> u32;
}

const OCTAVES: u32 = 4;
const FALLOFF: f64 = 0.5;

/// Octave-summed Perlin noise remapped from [-1, 1] to [0, 1].
pub struct PerlinNoise {
    perlin: Perlin,
    seed: u32,
}

impl PerlinNoise {
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            seed,
        }
    }
}

impl NoiseSource for PerlinNoise {
    fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let mut amp = 1.0;
        let mut freq = 1.0;
        let mut sum = 0.0;
        let mut norm = 0.0;

        for _ in 0..OCTAVES {
            sum += self.perlin.get([x * freq, y * freq, z * freq]) * amp;
            norm += amp;
            amp *= FALLOFF;
            freq *= 2.0;
        }

        let val = sum / norm;
        ((val + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    fn reseed(&mut self, seed: u32) {
        self.perlin = Perlin::new(seed);
        self.seed = seed;
    }

    fn seed(&self) -> u32 {
        self.seed
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::NoiseSource;

    /// Returns the same value everywhere.
    pub struct ConstNoise {
        pub value: f64,
        pub seed: u32,
    }

    impl ConstNoise {
        pub fn new(value: f64) -> Self {
            Self { value, seed: 0 }
        }
    }

    impl NoiseSource for ConstNoise {
        fn sample(&self, _x: f64, _y: f64, _z: f64) -> f64 {
            self.value
        }

        fn reseed(&mut self, seed: u32) {
            self.seed = seed;
        }

        fn seed(&self) -> u32 {
            self.seed
        }
    }
}
