//! # Cluster Shape Provider
//!
//! Derives [`ClusterShape`]s around anchors.
//!
//! ## Seeding
//!
//! The world seed builds the provider's noise field once and is never used
//! again. Each shape's radius comes from a [`LegacyRandom`] seeded purely from
//! the anchor coordinates, so any worker evaluating the same anchor draws the
//! same radius regardless of world seed or generation order.

use std::sync::Arc;

use lodestone_shared::{BlockPos, Vec3d};
use tracing::{debug, trace};

use super::shape::ClusterShape;
use super::size::ClusterSizeConfig;
use crate::error::ProceduralResult;
use crate::noise::{NoiseField, OctaveNoise, WorldSeed};
use crate::random::LegacyRandom;

/// Position hash seeding the per-anchor random stream.
///
/// `31 * (31 * (31 + x) + y) + z` in wrapping 32-bit arithmetic, sign-extended.
#[inline]
#[must_use]
pub const fn position_seed(pos: BlockPos) -> i64 {
    let hash = 31i32
        .wrapping_add(pos.x)
        .wrapping_mul(31)
        .wrapping_add(pos.y)
        .wrapping_mul(31)
        .wrapping_add(pos.z);
    hash as i64
}

/// Builds cluster shapes that share one noise field.
#[derive(Debug)]
pub struct ClusterShapeProvider<N = OctaveNoise> {
    size: ClusterSizeConfig,
    noise: Arc<N>,
}

impl ClusterShapeProvider<OctaveNoise> {
    /// Octave count of the default noise field.
    pub const NOISE_OCTAVES: u32 = 4;

    /// Creates a provider with a fresh 4-octave noise field seeded from `seed`.
    ///
    /// # Errors
    ///
    /// Any error of [`ClusterSizeConfig::validate`].
    pub fn new(size: ClusterSizeConfig, seed: WorldSeed) -> ProceduralResult<Self> {
        size.validate()?;
        let noise = OctaveNoise::new(seed, Self::NOISE_OCTAVES)?;

        debug!(
            seed = seed.value(),
            octaves = Self::NOISE_OCTAVES,
            ?size,
            "cluster shape provider ready"
        );

        Ok(Self {
            size,
            noise: Arc::new(noise),
        })
    }
}

impl<N: NoiseField> ClusterShapeProvider<N> {
    /// Creates a provider around an existing noise field.
    ///
    /// # Errors
    ///
    /// Any error of [`ClusterSizeConfig::validate`].
    pub fn with_noise(size: ClusterSizeConfig, noise: N) -> ProceduralResult<Self> {
        Self::with_shared_noise(size, Arc::new(noise))
    }

    /// Creates a provider that shares `noise` with other owners.
    ///
    /// # Errors
    ///
    /// Any error of [`ClusterSizeConfig::validate`].
    pub fn with_shared_noise(size: ClusterSizeConfig, noise: Arc<N>) -> ProceduralResult<Self> {
        size.validate()?;
        Ok(Self { size, noise })
    }

    /// Derives the shape anchored at `anchor`.
    ///
    /// Draws the X, Y and Z radii in that order from the anchor's stream.
    #[must_use]
    pub fn around(&self, anchor: BlockPos) -> ClusterShape<N> {
        let mut rng = Self::random_around(anchor);

        let radius_x = self.size.horizontal_size + rng.next_int(self.size.horizontal_variation);
        let radius_y = self.size.vertical_size + rng.next_int(self.size.vertical_variation);
        let radius_z = self.size.horizontal_size + rng.next_int(self.size.horizontal_variation);

        let radius = Vec3d::new(
            f64::from(radius_x),
            f64::from(radius_y),
            f64::from(radius_z),
        );
        trace!(%anchor, %radius, "derived cluster shape");

        // validated sizes are >= 1, so every component is positive
        ClusterShape::from_parts(anchor, radius, Arc::clone(&self.noise))
    }

    /// Maximum horizontal radius bound (`horizontal_size + horizontal_variation`).
    ///
    /// Use it to size a conservative search area before deriving any shape.
    #[must_use]
    pub const fn radius(&self) -> i32 {
        self.size.max_horizontal_radius()
    }

    /// The random stream a shape at `anchor` draws its radius from.
    #[must_use]
    pub const fn random_around(anchor: BlockPos) -> LegacyRandom {
        LegacyRandom::from_seed(position_seed(anchor))
    }

    /// The size configuration shapes are drawn from.
    #[must_use]
    pub const fn size_config(&self) -> &ClusterSizeConfig {
        &self.size
    }

    /// The noise field shared by every shape from this provider.
    #[must_use]
    pub fn noise(&self) -> &Arc<N> {
        &self.noise
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProceduralError;

    fn scenario_provider(seed: i64) -> ClusterShapeProvider {
        ClusterShapeProvider::new(ClusterSizeConfig::new(2, 3, 1, 2), WorldSeed::new(seed)).unwrap()
    }

    #[test]
    fn test_position_seed() {
        assert_eq!(position_seed(BlockPos::new(100, 64, 200)), 128_075);
        assert_eq!(position_seed(BlockPos::ORIGIN), 29_791);
        // wraps like 32-bit arithmetic, then sign-extends
        assert_eq!(position_seed(BlockPos::new(i32::MAX, 5, 5)), -2_147_454_658);
    }

    #[test]
    fn test_scenario_radius() {
        let shape = scenario_provider(42).around(BlockPos::new(100, 64, 200));
        assert_eq!(shape.radius(), Vec3d::new(3.0, 2.0, 2.0));
        assert_eq!(shape.upper_bound(), 66);
        assert_eq!(shape.lower_bound(), 62);
    }

    #[test]
    fn test_known_radii() {
        let provider = scenario_provider(7);
        assert_eq!(provider.around(BlockPos::ORIGIN).radius(), Vec3d::new(2.0, 2.0, 2.0));
        assert_eq!(
            provider.around(BlockPos::new(-5, 70, 12)).radius(),
            Vec3d::new(4.0, 2.0, 2.0)
        );
    }

    #[test]
    fn test_radius_bound() {
        assert_eq!(scenario_provider(0).radius(), 5);
    }

    #[test]
    fn test_shapes_share_noise() {
        let provider = scenario_provider(1);
        let a = provider.around(BlockPos::new(0, 10, 0));
        let b = provider.around(BlockPos::new(50, 10, -50));

        assert!(Arc::ptr_eq(a.noise(), b.noise()));
        assert!(Arc::ptr_eq(a.noise(), provider.noise()));
    }

    #[test]
    fn test_rejects_invalid_size() {
        let result = ClusterShapeProvider::new(ClusterSizeConfig::new(2, 0, 1, 2), WorldSeed::new(1));
        assert!(matches!(result, Err(ProceduralError::InvalidSize { .. })));
    }

    #[test]
    fn test_random_around_is_position_stream() {
        let anchor = BlockPos::new(3, -4, 5);
        let mut expected = LegacyRandom::from_seed(position_seed(anchor));
        let mut actual = ClusterShapeProvider::<OctaveNoise>::random_around(anchor);
        assert_eq!(actual.next_i32(), expected.next_i32());
    }
}
