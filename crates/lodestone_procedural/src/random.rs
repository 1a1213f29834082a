//! # Legacy Random
//!
//! A 48-bit linear congruential generator producing exactly the stream of
//! `java.util.Random`. Cluster radii are drawn from it so that a shape derived
//! here matches one derived by any other implementation of the same stream.
//!
//! This is NOT a cryptographic generator. It exists for reproducibility.

use rand::{Error, RngCore, SeedableRng};

const MULTIPLIER: i64 = 0x5_DEEC_E66D;
const ADDEND: i64 = 0xB;
const MASK: i64 = (1 << 48) - 1;
/// `2^-53`, the spacing of doubles in `[0, 1)`.
const DOUBLE_UNIT: f64 = 1.0 / (1u64 << 53) as f64;

/// Deterministic 48-bit LCG.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegacyRandom {
    seed: i64,
}

impl LegacyRandom {
    /// Creates a stream from a 64-bit seed (scrambled the same way as the JVM).
    #[inline]
    #[must_use]
    pub const fn from_seed(seed: i64) -> Self {
        Self {
            seed: (seed ^ MULTIPLIER) & MASK,
        }
    }

    /// Advances the state and returns the top `bits` bits (1..=32).
    #[inline]
    pub fn next_bits(&mut self, bits: u32) -> i32 {
        debug_assert!((1..=32).contains(&bits));
        self.seed = self.seed.wrapping_mul(MULTIPLIER).wrapping_add(ADDEND) & MASK;
        // state is masked to 48 bits, so the shift never sees a sign bit
        (self.seed >> (48 - bits)) as i32
    }

    /// Uniform `i32` over the whole range.
    #[inline]
    pub fn next_i32(&mut self) -> i32 {
        self.next_bits(32)
    }

    /// Uniform integer in `[0, bound)`.
    ///
    /// # Panics
    ///
    /// Panics if `bound <= 0`.
    pub fn next_int(&mut self, bound: i32) -> i32 {
        assert!(bound > 0, "bound must be positive, got {bound}");

        if bound & bound.wrapping_neg() == bound {
            // power of two: take the high bits directly
            return ((i64::from(bound) * i64::from(self.next_bits(31))) >> 31) as i32;
        }

        loop {
            let bits = self.next_bits(31);
            let value = bits % bound;
            // reject the partial block at the top of the range
            if bits.wrapping_sub(value).wrapping_add(bound - 1) >= 0 {
                return value;
            }
        }
    }

    /// Uniform `i64` built from two 32-bit draws.
    #[inline]
    pub fn next_i64(&mut self) -> i64 {
        let high = i64::from(self.next_bits(32));
        let low = i64::from(self.next_bits(32));
        (high << 32).wrapping_add(low)
    }

    /// Uniform double in `[0, 1)` with 53 bits of precision.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        let high = i64::from(self.next_bits(26)) << 27;
        let low = i64::from(self.next_bits(27));
        (high + low) as f64 * DOUBLE_UNIT
    }

    /// Fair coin flip.
    #[inline]
    pub fn next_bool(&mut self) -> bool {
        self.next_bits(1) != 0
    }

    /// Discards `count` draws.
    pub fn consume_count(&mut self, count: usize) {
        for _ in 0..count {
            self.next_bits(32);
        }
    }
}

impl RngCore for LegacyRandom {
    fn next_u32(&mut self) -> u32 {
        self.next_i32() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_i64() as u64
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for LegacyRandom {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::from_seed(i64::from_be_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::from_seed(state as i64)
    }
}
