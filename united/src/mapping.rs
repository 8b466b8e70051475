//! # Source Mappings
//!
//! A [`Mapping`] ties a property to the command-line option and the
//! environment variable that may override it. The name transforms are
//! total functions over conventional names:
//!
//! | Property | Option | Variable |
//! |----------|--------|----------|
//! | `net:port` | `net-port` | `NET_PORT` |
//! | `db:max_connections` | `db-max-connections` | `DB_MAX_CONNECTIONS` |

use std::collections::HashMap;

/// Overlay sources for one property. An empty field means "no overlay
/// from that source".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    pub property: String,
    pub option: String,
    pub variable: String,
}

impl Mapping {
    /// Derives the option and variable names mechanically from the
    /// property name.
    #[must_use]
    pub fn simple(property: &str) -> Self {
        Self {
            property: property.to_string(),
            option: to_option(property),
            variable: to_env_var(property),
        }
    }
}

/// Converts a property name to its conventional option name:
/// lower-case, with `:` and `_` replaced by `-`.
#[must_use]
pub fn to_option(name: &str) -> String {
    name.to_lowercase().replace([':', '_'], "-")
}

/// Converts a property name to its conventional environment variable
/// name: upper-case, with `:` and `-` replaced by `_`.
#[must_use]
pub fn to_env_var(name: &str) -> String {
    name.to_uppercase().replace([':', '-'], "_")
}

/// Registers empty option entries, keyed by [`to_option`], for every
/// given property name. Existing entries are kept.
pub fn add_options(options: &mut HashMap<String, String>, names: &[&str]) {
    for name in names {
        options.entry(to_option(name)).or_default();
    }
}
