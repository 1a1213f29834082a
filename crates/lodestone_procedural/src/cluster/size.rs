//! Cluster size configuration.
//!
//! Four integers describe how large a cluster may grow: a base radius and an
//! exclusive random variation, horizontally and vertically. Loaded from TOML or
//! from a live [`ConfigStore`] category, and always validated before use.

use lodestone_config::ConfigStore;
use serde::{Deserialize, Serialize};

use crate::error::{ProceduralError, ProceduralResult};

/// Per-axis cluster size bounds.
///
/// A drawn radius lies in `[size, size + variation - 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterSizeConfig {
    /// Base radius along X and Z.
    pub horizontal_size: i32,
    /// Exclusive upper bound of the random X/Z addition.
    pub horizontal_variation: i32,
    /// Base radius along Y.
    pub vertical_size: i32,
    /// Exclusive upper bound of the random Y addition.
    pub vertical_variation: i32,
}

impl ClusterSizeConfig {
    /// Config key for [`Self::horizontal_size`].
    pub const HORIZONTAL_SIZE_KEY: &'static str = "horizontal_size";
    /// Config key for [`Self::horizontal_variation`].
    pub const HORIZONTAL_VARIATION_KEY: &'static str = "horizontal_variation";
    /// Config key for [`Self::vertical_size`].
    pub const VERTICAL_SIZE_KEY: &'static str = "vertical_size";
    /// Config key for [`Self::vertical_variation`].
    pub const VERTICAL_VARIATION_KEY: &'static str = "vertical_variation";

    /// Creates a size configuration. Not validated until used.
    #[must_use]
    pub const fn new(
        horizontal_size: i32,
        horizontal_variation: i32,
        vertical_size: i32,
        vertical_variation: i32,
    ) -> Self {
        Self {
            horizontal_size,
            horizontal_variation,
            vertical_size,
            vertical_variation,
        }
    }

    /// Checks every field so that each drawn radius is strictly positive and
    /// `size + variation` fits in an `i32`.
    ///
    /// # Errors
    ///
    /// [`ProceduralError::InvalidSize`] for a field below 1,
    /// [`ProceduralError::SizeOverflow`] if a maximum radius overflows.
    pub fn validate(&self) -> ProceduralResult<()> {
        let fields = [
            (Self::HORIZONTAL_SIZE_KEY, self.horizontal_size),
            (Self::HORIZONTAL_VARIATION_KEY, self.horizontal_variation),
            (Self::VERTICAL_SIZE_KEY, self.vertical_size),
            (Self::VERTICAL_VARIATION_KEY, self.vertical_variation),
        ];
        for (field, value) in fields {
            if value < 1 {
                return Err(ProceduralError::InvalidSize {
                    field,
                    minimum: 1,
                    value,
                });
            }
        }

        if self.horizontal_size.checked_add(self.horizontal_variation).is_none() {
            return Err(ProceduralError::SizeOverflow {
                size_field: Self::HORIZONTAL_SIZE_KEY,
                variation_field: Self::HORIZONTAL_VARIATION_KEY,
            });
        }
        if self.vertical_size.checked_add(self.vertical_variation).is_none() {
            return Err(ProceduralError::SizeOverflow {
                size_field: Self::VERTICAL_SIZE_KEY,
                variation_field: Self::VERTICAL_VARIATION_KEY,
            });
        }
        Ok(())
    }

    /// Largest X/Z radius a shape can draw, plus one.
    ///
    /// Only meaningful on a validated configuration.
    #[must_use]
    pub const fn max_horizontal_radius(&self) -> i32 {
        self.horizontal_size + self.horizontal_variation
    }

    /// Largest Y radius a shape can draw, plus one.
    ///
    /// Only meaningful on a validated configuration.
    #[must_use]
    pub const fn max_vertical_radius(&self) -> i32 {
        self.vertical_size + self.vertical_variation
    }

    /// Parses and validates a TOML document with the four size keys.
    ///
    /// # Errors
    ///
    /// [`ProceduralError::InvalidConfig`] on malformed TOML or unknown keys,
    /// otherwise the errors of [`Self::validate`].
    pub fn from_toml_str(source: &str) -> ProceduralResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| ProceduralError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates the four size keys from `category` of a config store.
    ///
    /// # Errors
    ///
    /// [`ProceduralError::MissingConfigKey`] when a key is absent or not an
    /// integer, otherwise the errors of [`Self::validate`].
    pub fn from_store(store: &ConfigStore, category: &str) -> ProceduralResult<Self> {
        let read = |key: &'static str| {
            store
                .get_int(category, key)
                .ok_or_else(|| ProceduralError::MissingConfigKey {
                    category: category.to_owned(),
                    key,
                })
        };

        let config = Self::new(
            read(Self::HORIZONTAL_SIZE_KEY)?,
            read(Self::HORIZONTAL_VARIATION_KEY)?,
            read(Self::VERTICAL_SIZE_KEY)?,
            read(Self::VERTICAL_VARIATION_KEY)?,
        );
        config.validate()?;
        Ok(config)
    }

    /// Registers the four size keys in `category` with this configuration as
    /// defaults. Keys that already exist keep their stored value.
    pub fn define_in(&self, store: &ConfigStore, category: &str) {
        store.define(category, Self::HORIZONTAL_SIZE_KEY, self.horizontal_size);
        store.define(category, Self::HORIZONTAL_VARIATION_KEY, self.horizontal_variation);
        store.define(category, Self::VERTICAL_SIZE_KEY, self.vertical_size);
        store.define(category, Self::VERTICAL_VARIATION_KEY, self.vertical_variation);
    }
}

impl Default for ClusterSizeConfig {
    fn default() -> Self {
        Self::new(14, 9, 7, 3)
    }
}
