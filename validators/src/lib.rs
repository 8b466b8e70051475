//! # Configuration Validators
//!
//! Property-level validation for KNF configurations.
//!
//! A [`Validator`] ties a property name to a predicate from the
//! [`checks`] catalogue and a dynamically-typed argument. Validators run
//! against anything implementing the [`ConfigAccess`] capability set, so
//! the file-backed store and the unified overlay validate uniformly.
//!
//! Validators accumulate rather than short-circuit: every predicate runs
//! on every call, and argument-type problems are reported through the
//! same error list as regular violations.
//!
//! # Usage
//!
//! ```rust
//! use knf::Config;
//! use validators::{Validator, checks, validate};
//!
//! let config = Config::parse(b"[net]\n  port: 8080\n").unwrap();
//!
//! let rules = vec![
//!     Validator::new("net:port", checks::set, ()),
//!     Validator::new("net:port", checks::greater, 1024),
//!     Validator::new("net:port", checks::less, 65535),
//! ];
//!
//! assert!(validate(&config, &rules).is_empty());
//! ```

pub mod checks;
pub mod errors;

use knf::{ConfigAccess, Value};

pub use errors::ValidationError;

/// A predicate from the [`checks`] catalogue: inspects one property
/// against one argument and reports the violation it found, if any.
pub type Predicate = fn(&dyn ConfigAccess, &str, &Value) -> Option<ValidationError>;

/// A single validation rule: property, predicate and argument.
pub struct Validator {
    pub property: String,
    pub predicate: Predicate,
    pub argument: Value,
}

impl Validator {
    pub fn new<V: Into<Value>>(property: &str, predicate: Predicate, argument: V) -> Self {
        Self {
            property: property.to_string(),
            predicate,
            argument: argument.into(),
        }
    }
}

/// Runs every validator in declaration order and collects all reported
/// errors. An empty result means the configuration is valid.
pub fn validate(config: &dyn ConfigAccess, validators: &[Validator]) -> Vec<ValidationError> {
    validators
        .iter()
        .filter_map(|v| (v.predicate)(config, &v.property, &v.argument))
        .collect()
}

/// Runs the validators against the global configuration handle. While no
/// configuration is installed a single not-initialized error is
/// returned.
pub fn validate_global(validators: &[Validator]) -> Vec<ValidationError> {
    if !knf::global::is_configured() {
        return vec![ValidationError::NotInitialized];
    }

    validate(&knf::global::GlobalConfig, validators)
}
