//! # LODESTONE Procedural Generation
//!
//! Deterministic cluster shapes for reproducible worlds.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same anchor and seed always produce the same shape
//! 2. **Position-seeded**: A cluster's radius depends only on its anchor, so
//!    independently generated chunks agree on its boundary
//! 3. **Immutable**: Shapes hold no mutable state and can be queried from any thread
//! 4. **Shared noise**: One noise field per provider, handed out by `Arc`
//!
//! ## Core Components
//!
//! - `LegacyRandom`: 48-bit LCG stream, bit-compatible with `java.util.Random`
//! - `SimplexNoise` / `OctaveNoise`: seeded 2D coherent noise
//! - `ClusterShape`: noise-perturbed ellipsoid membership test
//! - `ClusterShapeProvider`: derives shapes around anchors
//! - `ReloadableProvider`: rebuilds its provider when configuration changes
//!
//! ## Example
//!
//! ```rust,ignore
//! use lodestone_procedural::{ClusterShapeProvider, ClusterSizeConfig, WorldSeed};
//! use lodestone_shared::BlockPos;
//!
//! let size = ClusterSizeConfig::new(2, 3, 1, 2);
//! let provider = ClusterShapeProvider::new(size, WorldSeed::new(42))?;
//!
//! let shape = provider.around(BlockPos::new(100, 64, 200));
//! for y in shape.lower_bound()..=shape.upper_bound() {
//!     // scan candidates in this layer
//! }
//! assert!(shape.is_inside(BlockPos::new(100, 64, 200)));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod cluster;
pub mod error;
pub mod noise;
pub mod random;

pub use cluster::{
    position_seed, ClusterShape, ClusterShapeProvider, ClusterSizeConfig, ReloadableProvider,
};
pub use error::{ProceduralError, ProceduralResult};
pub use noise::{NoiseField, OctaveNoise, SimplexNoise, WorldSeed};
pub use random::LegacyRandom;
