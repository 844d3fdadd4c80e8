//! Seeded 2D Perlin noise.
//!
//! Every generator owns a permutation table shuffled by its seed, so two
//! generators built from the same seed produce identical values for all
//! inputs. Chunk generation leans on that: a chunk's tiles depend only on
//! the seed and the chunk coordinate, never on generation order.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Perlin gradient noise over a seed-shuffled permutation table.
#[derive(Clone)]
pub struct Perlin {
    /// 256-entry permutation repeated twice, so corner hashing never
    /// needs a wrap-around branch.
    perm: [u8; 512],
}

impl Perlin {
    /// Build a generator for the given seed.
    ///
    /// The permutation table is Fisher-Yates shuffled by a PRNG seeded
    /// from `seed`, then doubled to 512 entries.
    pub fn new(seed: u64) -> Self {
        let mut table = [0u8; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = i as u8;
        }

        let mut rng = StdRng::seed_from_u64(seed);
        for i in (1..256).rev() {
            let j = rng.random_range(0..=i);
            table.swap(i, j);
        }

        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = table[i & 255];
        }
        Self { perm }
    }

    /// Sample the noise field at (x, y). Returns a value in [0, 1].
    pub fn noise(&self, x: f64, y: f64) -> f64 {
        let xf = x.floor();
        let yf = y.floor();
        // Two's-complement & wraps negative cells into the table range
        let xi = (xf as i64 & 255) as usize;
        let yi = (yf as i64 & 255) as usize;
        let dx = x - xf;
        let dy = y - yf;

        let u = fade(dx);
        let v = fade(dy);

        let aa = self.perm[self.perm[xi] as usize + yi] as usize;
        let ab = self.perm[self.perm[xi] as usize + yi + 1] as usize;
        let ba = self.perm[self.perm[xi + 1] as usize + yi] as usize;
        let bb = self.perm[self.perm[xi + 1] as usize + yi + 1] as usize;

        let x1 = lerp(grad(aa, dx, dy), grad(ba, dx - 1.0, dy), u);
        let x2 = lerp(grad(ab, dx, dy - 1.0), grad(bb, dx - 1.0, dy - 1.0), u);
        let raw = lerp(x1, x2, v);

        // Unit gradients bound the raw value to +-sqrt(2)/2
        ((raw * std::f64::consts::SQRT_2).clamp(-1.0, 1.0) + 1.0) * 0.5
    }

    /// Sum `octaves` samples at increasing frequency and decreasing
    /// amplitude, normalized back into [0, 1] by the total amplitude.
    pub fn fractal(&self, x: f64, y: f64, octaves: u32, persistence: f64, lacunarity: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_amplitude = 0.0;

        for _ in 0..octaves.max(1) {
            total += self.noise(x * frequency, y * frequency) * amplitude;
            max_amplitude += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }

        total / max_amplitude
    }
}

/// Quintic smoothing curve: 6t^5 - 15t^4 + 10t^3.
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Dot product of the hashed unit gradient with the corner offset.
#[inline]
fn grad(hash: usize, x: f64, y: f64) -> f64 {
    const DIAG: f64 = std::f64::consts::FRAC_1_SQRT_2;
    match hash & 7 {
        0 => x,
        1 => -x,
        2 => y,
        3 => -y,
        4 => DIAG * (x + y),
        5 => DIAG * (x - y),
        6 => DIAG * (-x + y),
        _ => DIAG * (-x - y),
    }
}
