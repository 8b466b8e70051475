//! # Unified Configuration
//!
//! Overlays command-line options and environment variables on top of a
//! KNF [`knf::Config`] under a deterministic precedence:
//!
//! 1. The command-line option named by the property's mapping
//! 2. The environment variable captured when the overlay was bound
//! 3. The base configuration file
//!
//! Binding captures and then clears every mapped environment variable,
//! so later lookups are deterministic no matter what other code does to
//! the environment. The overlay implements the same typed accessor
//! capability as the store itself, so validators apply uniformly.

pub mod mapping;
pub mod overlay;

pub use mapping::{Mapping, add_options, to_env_var, to_option};
pub use overlay::*;
