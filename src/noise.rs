//! Noise primitives shared by the backgrounds.
//!
//! The lattice value noise here is the CPU reference for the functions in
//! `topography.wgsl`: same hash, same interpolation, same octave weights, so
//! tests can reason about what the GPU draws.

use glam::Vec2;
use ::noise::{NoiseFn, OpenSimplex};

/// Pseudo-random value in [0, 1] for a lattice point
pub fn hash(p: Vec2) -> f32 {
    fract(p.dot(Vec2::new(127.1, 311.7)).sin() * 43758.547)
}

/// Shader-style fract: `x - floor(x)`, non-negative for negative inputs
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// Smooth 2D value noise in [0, 1]
pub fn value_noise(p: Vec2) -> f32 {
    let i = p.floor();
    let f = p - i;
    // Cubic Hermite fade keeps the first derivative continuous across cells
    let u = f * f * (Vec2::splat(3.0) - 2.0 * f);

    let a = hash(i);
    let b = hash(i + Vec2::new(1.0, 0.0));
    let c = hash(i + Vec2::new(0.0, 1.0));
    let d = hash(i + Vec2::new(1.0, 1.0));

    lerp(lerp(a, b, u.x), lerp(c, d, u.x), u.y)
}

/// Fractal Brownian motion: `octaves` layers of value noise, amplitude
/// halving and frequency doubling per layer, starting at amplitude 0.5
///
/// Result lies in [0, 1 - 0.5^octaves].
pub fn fbm(p: Vec2, octaves: u32) -> f32 {
    let mut value = 0.0;
    let mut amplitude = 0.5;
    let mut frequency = 1.0;

    for _ in 0..octaves {
        value += amplitude * value_noise(p * frequency);
        amplitude *= 0.5;
        frequency *= 2.0;
    }

    value
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Seeded 3D simplex noise used by the wave field, output in roughly [-1, 1]
pub struct WaveNoise {
    simplex: OpenSimplex,
}

impl WaveNoise {
    pub fn new(seed: u32) -> Self {
        Self {
            simplex: OpenSimplex::new(seed),
        }
    }

    pub fn sample(&self, x: f64, y: f64, z: f64) -> f32 {
        self.simplex.get([x, y, z]) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_hash_is_deterministic_and_bounded() {
        let p = Vec2::new(3.0, -7.0);
        assert_eq!(hash(p), hash(p));
        for x in -20..20 {
            for y in -20..20 {
                let h = hash(Vec2::new(x as f32, y as f32));
                assert!((0.0..=1.0).contains(&h), "hash out of range: {h}");
            }
        }
    }

    #[test]
    fn test_value_noise_matches_hash_at_lattice() {
        let p = Vec2::new(4.0, 9.0);
        assert!((value_noise(p) - hash(p)).abs() < 1e-6);
    }

    #[test]
    fn test_continuous_across_lattice_boundary() {
        let eps = 1e-4;
        for cell in -5..5 {
            let edge = cell as f32;
            let left = fbm(Vec2::new(edge - eps, 0.37), 4);
            let right = fbm(Vec2::new(edge + eps, 0.37), 4);
            assert!((left - right).abs() < 1e-2, "jump at x = {edge}");
        }
    }

    #[test]
    fn test_wave_noise_seeded() {
        let a = WaveNoise::new(7);
        let b = WaveNoise::new(7);
        assert_eq!(a.sample(0.3, 0.6, 0.1), b.sample(0.3, 0.6, 0.1));
    }

    proptest! {
        #[test]
        fn fbm_stays_in_range(x in -50.0f32..50.0, y in -50.0f32..50.0, octaves in 1u32..7) {
            let v = fbm(Vec2::new(x, y), octaves);
            prop_assert!(v >= 0.0);
            prop_assert!(v <= 1.0 - 0.5f32.powi(octaves as i32) + 1e-5);
        }

        #[test]
        fn fbm_is_continuous(x in -50.0f32..50.0, y in -50.0f32..50.0) {
            let p = Vec2::new(x, y);
            let q = p + Vec2::splat(1e-3);
            prop_assert!((fbm(p, 4) - fbm(q, 4)).abs() < 0.02);
        }

        #[test]
        fn wave_noise_is_continuous(x in -10.0f64..10.0, z in 0.0f64..5.0) {
            let noise = WaveNoise::new(42);
            let a = noise.sample(x, 0.3, z);
            let b = noise.sample(x + 1e-4, 0.3, z);
            prop_assert!((a - b).abs() < 0.01);
        }
    }
}
