//! # Simplex Noise Implementation
//!
//! Deterministic 2D coherent noise for perturbing cluster boundaries.
//!
//! ## Seeding
//!
//! Every noise layer draws three offsets and a 256-entry permutation from a
//! [`LegacyRandom`] stream, so a given seed builds identical tables on any
//! platform. Tables are immutable after construction; sampling takes `&self`
//! and is safe to call from any number of threads.
//!
//! ## Octaves
//!
//! [`OctaveNoise`] stacks several layers. Octave `i` is sampled at frequency
//! `2^-i` with amplitude `2^i`, and the sum is divided by the total amplitude,
//! keeping the result inside `[-1, 1]`.

use crate::error::{ProceduralError, ProceduralResult};
use crate::random::LegacyRandom;

/// World seed for deterministic generation.
///
/// Only the noise field is derived from it. Cluster radii are seeded from
/// anchor positions instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldSeed(i64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: i64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for WorldSeed {
    fn from(seed: i64) -> Self {
        Self(seed)
    }
}

/// A seeded, continuous 2D scalar field.
///
/// Implementations must return the same value for the same inputs for as long
/// as they live, and must not mutate anything while sampling.
pub trait NoiseField: Send + Sync {
    /// Samples the field at `(x, y)`.
    fn sample(&self, x: f64, y: f64) -> f64;
}

/// Pre-computed permutation table for noise.
///
/// This is computed once from the random stream and reused.
#[derive(Clone, Debug)]
struct PermutationTable {
    /// 256 shuffled entries; lookups wrap with `& 255`.
    perm: [u8; 256],
}

impl PermutationTable {
    /// 2D projections of the first 12 edge gradients of a cube.
    const GRADIENTS: [[i8; 2]; 12] = [
        [1, 1], [-1, 1], [1, -1], [-1, -1],
        [1, 0], [-1, 0], [1, 0], [-1, 0],
        [0, 1], [0, -1], [0, 1], [0, -1],
    ];

    /// Shuffles the identity permutation with a forward Fisher-Yates pass.
    fn new(rng: &mut LegacyRandom) -> Self {
        let mut perm = [0u8; 256];

        // Initialize with identity permutation
        for (i, entry) in perm.iter_mut().enumerate() {
            *entry = i as u8;
        }

        for i in 0..256 {
            let j = rng.next_int((256 - i) as i32) as usize;
            perm.swap(i, i + j);
        }

        Self { perm }
    }

    /// Gets a permutation value (with automatic wrapping).
    #[inline]
    fn get(&self, index: i32) -> i32 {
        i32::from(self.perm[(index & 255) as usize])
    }

    /// Gets a gradient for a given hash.
    #[inline]
    fn gradient(hash: i32) -> [i8; 2] {
        Self::GRADIENTS[(hash % 12) as usize]
    }
}

/// 2D Simplex noise generator.
///
/// Produces smooth, continuous noise values in the range [-1, 1].
#[derive(Clone, Debug)]
pub struct SimplexNoise {
    /// The permutation table.
    perm_table: PermutationTable,
    /// Per-layer offsets drawn before the permutation; kept so the stream
    /// position after construction matches other implementations.
    offsets: [f64; 3],
}

impl SimplexNoise {
    /// Skewing factor for 2D simplex grid.
    const F2: f64 = 0.366_025_403_784_438_6; // (sqrt(3) - 1) / 2
    /// Unskewing factor for 2D simplex grid.
    const G2: f64 = 0.211_324_865_405_187_1; // (3 - sqrt(3)) / 6

    /// Creates a new simplex noise layer, consuming three doubles and 256
    /// bounded integers from `rng`.
    #[must_use]
    pub fn new(rng: &mut LegacyRandom) -> Self {
        let offsets = [
            rng.next_f64() * 256.0,
            rng.next_f64() * 256.0,
            rng.next_f64() * 256.0,
        ];
        Self {
            perm_table: PermutationTable::new(rng),
            offsets,
        }
    }

    /// Coordinate offsets drawn at construction.
    #[must_use]
    pub const fn offsets(&self) -> [f64; 3] {
        self.offsets
    }

    /// Samples 2D simplex noise at the given coordinates.
    ///
    /// # Returns
    ///
    /// A value in the range [-1, 1].
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        // Skew input coordinates to simplex grid
        let skew = (x + y) * Self::F2;
        let i = fast_floor(x + skew);
        let j = fast_floor(y + skew);

        // Unskew to get first corner in simplex
        let unskew = (i + j) as f64 * Self::G2;
        let x0 = x - (i as f64 - unskew);
        let y0 = y - (j as f64 - unskew);

        // Determine which simplex we're in (upper or lower triangle)
        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        // Offsets for second and third corners
        let x1 = x0 - f64::from(i1) + Self::G2;
        let y1 = y0 - f64::from(j1) + Self::G2;
        let x2 = x0 - 1.0 + 2.0 * Self::G2;
        let y2 = y0 - 1.0 + 2.0 * Self::G2;

        // Hash coordinates to get gradient indices (low byte only)
        let ii = (i & 255) as i32;
        let jj = (j & 255) as i32;
        let table = &self.perm_table;

        let gi0 = table.get(ii + table.get(jj));
        let gi1 = table.get(ii + i1 + table.get(jj + j1));
        let gi2 = table.get(ii + 1 + table.get(jj + 1));

        // Calculate contribution from three corners
        let n0 = Self::contribution(x0, y0, gi0);
        let n1 = Self::contribution(x1, y1, gi1);
        let n2 = Self::contribution(x2, y2, gi2);

        // The magic number 70.0 normalizes the output
        70.0 * (n0 + n1 + n2)
    }

    /// Calculates the contribution from one corner of the simplex.
    #[inline]
    fn contribution(x: f64, y: f64, hash: i32) -> f64 {
        let t = 0.5 - x * x - y * y;
        if t < 0.0 {
            0.0
        } else {
            let grad = PermutationTable::gradient(hash);
            let t2 = t * t;
            t2 * t2 * (x * f64::from(grad[0]) + y * f64::from(grad[1]))
        }
    }
}

impl NoiseField for SimplexNoise {
    fn sample(&self, x: f64, y: f64) -> f64 {
        Self::sample(self, x, y)
    }
}

/// Octave-summed simplex noise.
///
/// # Example
///
/// ```rust,ignore
/// let noise = OctaveNoise::new(WorldSeed::new(42), 4)?;
/// let value = noise.sample(1.5, 200.3);
/// assert!((-1.0..=1.0).contains(&value));
/// ```
#[derive(Clone, Debug)]
pub struct OctaveNoise {
    /// One simplex layer per octave, lowest index = highest frequency.
    levels: Vec<SimplexNoise>,
    /// Sum of all octave amplitudes, used to normalize.
    total_amplitude: f64,
}

impl OctaveNoise {
    /// Creates an octave noise field seeded from `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`ProceduralError::InvalidOctaves`] if `octaves` is zero.
    pub fn new(seed: WorldSeed, octaves: u32) -> ProceduralResult<Self> {
        let mut rng = LegacyRandom::from_seed(seed.value());
        Self::from_random(&mut rng, octaves)
    }

    /// Creates an octave noise field, drawing every layer from `rng` in order.
    ///
    /// # Errors
    ///
    /// Returns [`ProceduralError::InvalidOctaves`] if `octaves` is zero.
    pub fn from_random(rng: &mut LegacyRandom, octaves: u32) -> ProceduralResult<Self> {
        if octaves == 0 {
            return Err(ProceduralError::InvalidOctaves);
        }

        let levels: Vec<SimplexNoise> = (0..octaves).map(|_| SimplexNoise::new(rng)).collect();
        let total_amplitude: f64 = (0..octaves).map(|i| f64::from(1u32 << i.min(31))).sum();

        Ok(Self {
            levels,
            total_amplitude,
        })
    }

    /// Number of layers.
    #[must_use]
    pub fn octaves(&self) -> usize {
        self.levels.len()
    }

    /// Samples the summed layers, normalized to [-1, 1].
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let mut total = 0.0;
        let mut frequency = 1.0;

        for level in &self.levels {
            total += level.sample(x * frequency, y * frequency) / frequency;
            frequency /= 2.0;
        }

        total / self.total_amplitude
    }
}

impl NoiseField for OctaveNoise {
    fn sample(&self, x: f64, y: f64) -> f64 {
        Self::sample(self, x, y)
    }
}

/// Fast floor function.
///
/// Faster than `f64::floor()` for our use case. Returns `i64` because skewed
/// lookup coordinates of far-out anchors exceed the `i32` range.
#[inline]
fn fast_floor(x: f64) -> i64 {
    let xi = x as i64;
    if x < xi as f64 {
        xi - 1
    } else {
        xi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let noise1 = OctaveNoise::new(WorldSeed::new(12345), 4).unwrap();
        let noise2 = OctaveNoise::new(WorldSeed::new(12345), 4).unwrap();

        // Same seed should produce identical results
        for i in 0..100 {
            let x = f64::from(i) * 0.1;
            let y = f64::from(i) * 0.17;
            assert_eq!(
                noise1.sample(x, y).to_bits(),
                noise2.sample(x, y).to_bits(),
                "Noise should be deterministic"
            );
        }
    }

    #[test]
    fn test_different_seeds_different_results() {
        let noise1 = SimplexNoise::new(&mut LegacyRandom::from_seed(1));
        let noise2 = SimplexNoise::new(&mut LegacyRandom::from_seed(2));

        let differs = (0..50).any(|i| {
            let x = f64::from(i) * 3.7 + 0.5;
            (noise1.sample(x, 100.3) - noise2.sample(x, 100.3)).abs() > 1e-9
        });

        assert!(differs, "Different seeds should produce different results");
    }

    #[test]
    fn test_range() {
        let simplex = SimplexNoise::new(&mut LegacyRandom::from_seed(42));
        let octaves = OctaveNoise::new(WorldSeed::new(42), 4).unwrap();

        // Sample many points and verify range
        for i in 0..10000 {
            let x = (f64::from(i) * 0.1) - 500.0;
            let y = (f64::from(i) * 0.13) - 650.0;

            let value = simplex.sample(x, y);
            assert!((-1.0..=1.0).contains(&value), "Simplex {value} out of range at ({x}, {y})");

            let value = octaves.sample(x, y);
            assert!((-1.0..=1.0).contains(&value), "Octave {value} out of range at ({x}, {y})");
        }
    }

    #[test]
    fn test_continuity() {
        let noise = OctaveNoise::new(WorldSeed::new(42), 4).unwrap();

        // Sample adjacent points - should be similar
        let x = 100.0;
        let y = 100.0;
        let delta = 0.001;

        let v1 = noise.sample(x, y);
        let v2 = noise.sample(x + delta, y);
        let v3 = noise.sample(x, y + delta);

        let diff1 = (v1 - v2).abs();
        let diff2 = (v1 - v3).abs();

        // Adjacent samples should be very similar
        assert!(diff1 < 0.01, "Noise should be continuous: diff = {diff1}");
        assert!(diff2 < 0.01, "Noise should be continuous: diff = {diff2}");
    }

    #[test]
    fn test_spatial_variation() {
        let noise = OctaveNoise::new(WorldSeed::new(0), 4).unwrap();

        let values: Vec<f64> = (0..40)
            .map(|i| noise.sample(f64::from(i) * 1.3, f64::from(i) * 0.7))
            .collect();

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!(max - min > 0.01, "Octave noise should vary in space");
    }

    #[test]
    fn test_layers_consume_stream_in_order() {
        let mut rng = LegacyRandom::from_seed(5);
        let field = OctaveNoise::from_random(&mut rng, 2).unwrap();

        let mut manual = LegacyRandom::from_seed(5);
        let first = SimplexNoise::new(&mut manual);
        let second = SimplexNoise::new(&mut manual);

        assert_eq!(rng, manual, "Both paths should leave the stream at the same place");
        assert_eq!(field.octaves(), 2);
        assert_eq!(first.offsets(), field.levels[0].offsets());
        assert_eq!(second.offsets(), field.levels[1].offsets());
    }

    #[test]
    fn test_zero_octaves_rejected() {
        assert_eq!(
            OctaveNoise::new(WorldSeed::new(1), 0).unwrap_err(),
            ProceduralError::InvalidOctaves
        );
    }

    #[test]
    fn test_offsets_in_range() {
        let noise = SimplexNoise::new(&mut LegacyRandom::from_seed(3));
        for offset in noise.offsets() {
            assert!((0.0..256.0).contains(&offset));
        }
    }

    #[test]
    fn test_fast_floor() {
        assert_eq!(fast_floor(1.5), 1);
        assert_eq!(fast_floor(-1.5), -2);
        assert_eq!(fast_floor(-2.0), -2);
        assert_eq!(fast_floor(0.0), 0);
        assert_eq!(fast_floor(-2_147_483_648.5), -2_147_483_649);
        assert_eq!(fast_floor(-3.7e9), -3_700_000_000);
        assert_eq!(fast_floor(3.7e9 + 0.25), 3_700_000_000);
    }

    #[test]
    fn test_sample_far_from_origin() {
        let simplex = SimplexNoise::new(&mut LegacyRandom::from_seed(42));
        let octaves = OctaveNoise::new(WorldSeed::new(42), 4).unwrap();

        // Skewed coordinates here fall outside the i32 lattice range
        for (x, y) in [
            (-1.3e9 + 1.0, -1.3e9 + 1.5),
            (-2_147_483_648.0 - 3.1, -2_147_483_648.0 + 2.0),
            (2_147_483_647.0 + 3.1, 2_147_483_647.0 + 0.5),
            (-2.1e9, 2.1e9),
        ] {
            for value in [simplex.sample(x, y), octaves.sample(x, y)] {
                assert!(value.is_finite(), "non-finite noise at ({x}, {y})");
                assert!(value.abs() <= 1.0 + 1e-6, "noise {value} out of range at ({x}, {y})");
            }
        }
    }
}
