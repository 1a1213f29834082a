//! # Cluster Shape
//!
//! A noise-perturbed ellipsoid around an integer anchor.
//!
//! ## Membership
//!
//! A candidate is normalized per axis by the radius, converted to a radial
//! distance `r` plus azimuth `phi` and polar angle `theta`, and accepted when
//! `r` is below the boundary radius at that direction:
//!
//! ```text
//! max_r = noise(phi + anchor.x, theta + anchor.z) / 16 + 0.5
//! ```
//!
//! Near `phi = π` the lookup is blended towards the sample at `phi = -π` so the
//! boundary closes without a seam. The blend only runs on the positive side.

use std::f64::consts::PI;
use std::sync::Arc;

use lodestone_shared::{BlockPos, Vec3d};

use crate::error::{ProceduralError, ProceduralResult};
use crate::noise::{NoiseField, OctaveNoise};

/// Azimuth above which the lookup starts blending towards the wraparound sample.
pub const SEAM_CUTOFF: f64 = 0.75 * PI;

/// Immutable cluster geometry bound to a shared noise field.
#[derive(Debug)]
pub struct ClusterShape<N = OctaveNoise> {
    anchor: BlockPos,
    radius: Vec3d,
    noise: Arc<N>,
}

// Manual impl: cloning a shape shares the noise field, `N` need not be `Clone`.
impl<N> Clone for ClusterShape<N> {
    fn clone(&self) -> Self {
        Self {
            anchor: self.anchor,
            radius: self.radius,
            noise: Arc::clone(&self.noise),
        }
    }
}

impl<N: NoiseField> ClusterShape<N> {
    /// Creates a shape around `anchor`.
    ///
    /// # Errors
    ///
    /// [`ProceduralError::InvalidRadius`] if any radius component is zero,
    /// negative or not finite.
    pub fn new(anchor: BlockPos, radius: Vec3d, noise: Arc<N>) -> ProceduralResult<Self> {
        if !radius.is_strictly_positive() {
            return Err(ProceduralError::InvalidRadius {
                x: radius.x,
                y: radius.y,
                z: radius.z,
            });
        }
        Ok(Self::from_parts(anchor, radius, noise))
    }

    /// Builds a shape whose radius the caller has already checked.
    pub(crate) fn from_parts(anchor: BlockPos, radius: Vec3d, noise: Arc<N>) -> Self {
        debug_assert!(radius.is_strictly_positive());
        Self {
            anchor,
            radius,
            noise,
        }
    }

    /// The anchor this shape is centred on.
    #[inline]
    #[must_use]
    pub const fn anchor(&self) -> BlockPos {
        self.anchor
    }

    /// Per-axis radius of the unperturbed ellipsoid.
    #[inline]
    #[must_use]
    pub const fn radius(&self) -> Vec3d {
        self.radius
    }

    /// The shared noise field.
    #[must_use]
    pub fn noise(&self) -> &Arc<N> {
        &self.noise
    }

    /// Returns `true` if `pos` lies inside the cluster.
    #[must_use]
    pub fn is_inside(&self, pos: BlockPos) -> bool {
        // normalize distances by the radius
        let dx = (f64::from(pos.x) - f64::from(self.anchor.x)) / self.radius.x;
        let dy = (f64::from(pos.y) - f64::from(self.anchor.y)) / self.radius.y;
        let dz = (f64::from(pos.z) - f64::from(self.anchor.z)) / self.radius.z;

        let r = (dx * dx + dy * dy + dz * dz).sqrt();
        if r == 0.0 {
            // the anchor itself, and no direction to look up
            return true;
        }

        let phi = dz.atan2(dx);
        let theta = (dy / r).clamp(-1.0, 1.0).acos();

        r < self.boundary_radius(phi, theta)
    }

    /// Boundary radius in normalized space for the direction `(phi, theta)`.
    ///
    /// `phi` is the azimuth in `(-π, π]`, `theta` the polar angle in `[0, π]`.
    /// The result lies in `[0.4375, 0.5625]` for a field bounded by `[-1, 1]`.
    #[must_use]
    pub fn boundary_radius(&self, phi: f64, theta: f64) -> f64 {
        let anchor_x = f64::from(self.anchor.x);
        let y = theta + f64::from(self.anchor.z);

        let mut noise = self.noise.sample(phi + anchor_x, y);

        if phi > SEAM_CUTOFF {
            let wrapped = self.noise.sample(-PI + anchor_x, y);
            let t = (phi - SEAM_CUTOFF) / (PI - SEAM_CUTOFF);
            noise = lerp(t, noise, wrapped);
        }

        noise / 16.0 + 0.5
    }

    /// Highest Y layer that can contain part of the cluster (inclusive).
    #[must_use]
    pub fn upper_bound(&self) -> i32 {
        (f64::from(self.anchor.y) + self.radius.y).ceil() as i32
    }

    /// Lowest Y layer that can contain part of the cluster (inclusive).
    #[must_use]
    pub fn lower_bound(&self) -> i32 {
        (f64::from(self.anchor.y) - self.radius.y).floor() as i32
    }

    /// Inclusive corners of the box every inside position falls in.
    #[must_use]
    pub fn bounding_box(&self) -> (BlockPos, BlockPos) {
        let reach_x = self.radius.x.ceil() as i32;
        let reach_z = self.radius.z.ceil() as i32;
        (
            BlockPos::new(
                self.anchor.x.saturating_sub(reach_x),
                self.lower_bound(),
                self.anchor.z.saturating_sub(reach_z),
            ),
            BlockPos::new(
                self.anchor.x.saturating_add(reach_x),
                self.upper_bound(),
                self.anchor.z.saturating_add(reach_z),
            ),
        )
    }

    /// Every position inside the cluster, in Y-major then X then Z order.
    pub fn positions(&self) -> impl Iterator<Item = BlockPos> + '_ {
        let (min, max) = self.bounding_box();
        (min.y..=max.y)
            .flat_map(move |y| {
                (min.x..=max.x).flat_map(move |x| (min.z..=max.z).map(move |z| BlockPos::new(x, y, z)))
            })
            .filter(move |pos| self.is_inside(*pos))
    }
}

/// Linear interpolation from `start` (t = 0) to `end` (t = 1).
#[inline]
fn lerp(t: f64, start: f64, end: f64) -> f64 {
    start + t * (end - start)
}
