//! # LODESTONE Config
//!
//! A typed configuration table that can be changed while the program runs.
//!
//! ## Model
//!
//! Values live under a category path (`module` or `module.category`) and a
//! bare key name. A mutation names its key as `T:name`, where `T` is a type
//! tag:
//!
//! | Tag | Type     |
//! |-----|----------|
//! | `B` | `bool`   |
//! | `I` | `i32`    |
//! | `D` | `f64`    |
//! | `S` | `String` |
//!
//! ## Mutation Rules
//!
//! 1. Unknown keys and unparseable values are ignored, not errors
//! 2. A real change notifies every registered [`ReloadListener`]
//! 3. Persisting writes the whole table to its TOML file
//!
//! ## Example
//!
//! ```rust,ignore
//! use lodestone_config::{ConfigStore, SetOutcome};
//!
//! let store = ConfigStore::open("config/lodestone.toml")?;
//! store.define("ores.clusters", "horizontal_size", 14);
//!
//! let outcome = store.set_value("ores", "clusters", "I:horizontal_size", "20", true)?;
//! assert_eq!(outcome, SetOutcome::Changed);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod store;
pub mod value;

pub use error::{ConfigError, ConfigResult};
pub use store::{ConfigStore, ReloadListener, SetOutcome};
pub use value::{ConfigValue, TypedKey, ValueKind};
