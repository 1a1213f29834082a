//! # Cluster Shapes
//!
//! Organic, noise-perturbed ellipsoids around integer anchors.
//!
//! - [`ClusterSizeConfig`]: how large clusters may grow
//! - [`ClusterShapeProvider`]: position-seeded radius draw, one shared noise field
//! - [`ClusterShape`]: the immutable membership test
//! - [`ReloadableProvider`]: follows a config category across reloads

mod provider;
mod reload;
mod shape;
mod size;

pub use provider::{position_seed, ClusterShapeProvider};
pub use reload::ReloadableProvider;
pub use shape::{ClusterShape, SEAM_CUTOFF};
pub use size::ClusterSizeConfig;
