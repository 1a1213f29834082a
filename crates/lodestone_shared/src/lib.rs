//! # LODESTONE Shared
//!
//! Coordinate and vector types used by every LODESTONE crate.
//!
//! ## RULE
//!
//! This crate holds plain data only. Anything that needs a seed, a noise
//! field or configuration lives in `lodestone_procedural` or
//! `lodestone_config`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod math;

pub use math::{BlockPos, Vec3d};
