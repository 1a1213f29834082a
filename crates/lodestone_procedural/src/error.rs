//! # Procedural Error Types
//!
//! Everything that can reject a cluster before it is built. Once a provider
//! exists, deriving and querying shapes cannot fail.

use thiserror::Error;

/// Errors raised while building noise fields, providers and shapes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProceduralError {
    /// A size or variation field was below its minimum.
    #[error("invalid cluster size: {field} must be at least {minimum}, got {value}")]
    InvalidSize {
        /// Name of the offending field.
        field: &'static str,
        /// Smallest accepted value.
        minimum: i32,
        /// The value that was supplied.
        value: i32,
    },

    /// `size + variation` does not fit in an `i32`.
    #[error("cluster size overflow: {size_field} + {variation_field} exceeds i32::MAX")]
    SizeOverflow {
        /// Name of the base size field.
        size_field: &'static str,
        /// Name of the variation field.
        variation_field: &'static str,
    },

    /// A radius component was zero, negative or not finite.
    #[error("invalid cluster radius ({x}, {y}, {z}): every component must be finite and positive")]
    InvalidRadius {
        /// X component.
        x: f64,
        /// Y component.
        y: f64,
        /// Z component.
        z: f64,
    },

    /// A noise field needs at least one octave.
    #[error("noise field needs at least one octave")]
    InvalidOctaves,

    /// A size configuration document could not be parsed.
    #[error("invalid size configuration: {0}")]
    InvalidConfig(String),

    /// A size key is missing from the configuration store, or has the wrong type.
    #[error("missing integer config key {category}/{key}")]
    MissingConfigKey {
        /// Full category path.
        category: String,
        /// Bare key name.
        key: &'static str,
    },
}

/// Result type for procedural operations.
pub type ProceduralResult<T> = Result<T, ProceduralError>;
