//! # Unified Overlay
//!
//! Combines a base [`Config`] with command-line options and environment
//! variables under a fixed precedence: option value, then the
//! environment snapshot captured at bind time, then the file.
//!
//! Binding intentionally mutates the process environment: every mapped
//! variable is captured into a private snapshot and then cleared, so
//! code reading the environment directly afterwards cannot disagree with
//! the overlay's idea of precedence. Callers that need those variables
//! must read them before [`combine`] runs.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use knf::{Config, ConfigAccess, DurationUnit, normalize_name};
use parking_lot::RwLock;
use tracing::{debug, info};
use validators::{ValidationError, Validator};

use crate::mapping::Mapping;

/// Seam into the command-line option store: is the option set?
pub type OptionHas = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// Seam into the command-line option store: the option's string value.
pub type OptionGet = Box<dyn Fn(&str) -> String + Send + Sync>;

static UNITED: RwLock<Option<United>> = RwLock::new(None);

/// A base configuration overlaid with options and captured environment
/// variables. Implements [`ConfigAccess`], so typed getters and the
/// validator framework apply exactly as they do to a plain [`Config`].
pub struct United {
    config: Config,
    mappings: HashMap<String, Mapping>,
    env: HashMap<String, String>,
    option_has: OptionHas,
    option_get: OptionGet,
}

impl United {
    /// Builds an overlay, capturing and clearing the environment
    /// variable of every mapping that names one.
    pub fn new(
        config: Config,
        mappings: Vec<Mapping>,
        option_has: OptionHas,
        option_get: OptionGet,
    ) -> Self {
        let mut captured = HashMap::new();
        let mut keyed = HashMap::new();

        for mapping in mappings {
            if !mapping.variable.is_empty() {
                let value = std::env::var(&mapping.variable).unwrap_or_default();

                debug!("Captured environment variable {}", mapping.variable);
                captured.insert(mapping.variable.clone(), value);

                // best-effort hardening: a cleared variable cannot be
                // re-read by downstream code behind the overlay's back
                unsafe { std::env::remove_var(&mapping.variable) };
            }

            let key = normalize_name(&mapping.property)
                .unwrap_or_else(|| mapping.property.to_lowercase());
            keyed.insert(key, mapping);
        }

        Self {
            config,
            mappings: keyed,
            env: captured,
            option_has,
            option_get,
        }
    }

    /// The installed mapping for a property, if any.
    #[must_use]
    pub fn mapping(&self, name: &str) -> Option<&Mapping> {
        let key = normalize_name(name)?;
        self.mappings.get(&key)
    }
}

impl ConfigAccess for United {
    fn raw(&self, name: &str) -> Option<String> {
        if let Some(mapping) = self.mapping(name) {
            if !mapping.option.is_empty() && (self.option_has)(&mapping.option) {
                return Some((self.option_get)(&mapping.option));
            }

            if !mapping.variable.is_empty() {
                if let Some(value) = self.env.get(&mapping.variable) {
                    if !value.is_empty() {
                        return Some(value.clone());
                    }
                }
            }
        }

        self.config.raw(name)
    }
}

/// Installs the process-wide overlay with explicit option-store seams.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Binds a base configuration, a set of mappings and an option store
/// into the process-wide unified configuration. Subsequent lookups
/// through the module-level getters resolve under the fixed precedence
/// option > captured environment > file.
///
/// ## Usage
/// ```rust,no_run
/// use knf::Config;
/// use united::{Mapping, combine_with};
///
/// fn main() -> Result<(), knf::ConfigError> {
///     let config = Config::read("/etc/app.knf")?;
///
///     combine_with(
///         config,
///         vec![Mapping::simple("net:port")],
///         Box::new(|option| option == "net-port"),
///         Box::new(|_| "7000".to_string()),
///     );
///
///     assert_eq!(united::get_i("net:port"), 7000);
///     Ok(())
/// }
/// ```
///
/// ## Environment Mutation
/// Every mapped environment variable is read into a private snapshot
/// and cleared. Concurrent readers during the bind see either the old
/// or the new overlay, never a half-initialised one.
pub fn combine_with(
    config: Config,
    mappings: Vec<Mapping>,
    option_has: OptionHas,
    option_get: OptionGet,
) {
    let united = United::new(config, mappings, option_has, option_get);

    info!(
        "Unified configuration bound ({} mappings)",
        united.mappings.len()
    );

    *UNITED.write() = Some(united);
}

/// Installs the process-wide overlay without an option store; only the
/// environment and the file participate in lookups.
pub fn combine(config: Config, mappings: Vec<Mapping>) {
    combine_with(
        config,
        mappings,
        Box::new(|_| false),
        Box::new(|_| String::new()),
    );
}

/// [`combine`] with mappings derived mechanically from property names.
pub fn combine_simple(config: Config, names: &[&str]) {
    combine(config, names.iter().map(|n| Mapping::simple(n)).collect());
}

/// Drops the installed overlay. Intended for tests.
pub fn reset() {
    *UNITED.write() = None;
}

/// The installed mapping triple for a property, or `None` while the
/// property (or the overlay itself) is unbound.
#[must_use]
pub fn get_mapping(name: &str) -> Option<Mapping> {
    UNITED.read().as_ref().and_then(|u| u.mapping(name).cloned())
}

/// Runs the validators against the installed overlay. While no overlay
/// is bound a single not-initialized error is returned.
pub fn validate(rules: &[Validator]) -> Vec<ValidationError> {
    match &*UNITED.read() {
        Some(united) => validators::validate(united, rules),
        None => vec![ValidationError::NotInitialized],
    }
}

fn with<R>(default: R, f: impl FnOnce(&United) -> R) -> R {
    match &*UNITED.read() {
        Some(united) => f(united),
        None => default,
    }
}

#[must_use]
pub fn has(name: &str) -> bool {
    with(false, |u| u.has(name))
}

#[must_use]
pub fn get_s(name: &str) -> String {
    with(String::new(), |u| u.get_s(name))
}

#[must_use]
pub fn get_s_or(name: &str, default: &str) -> String {
    with(default.to_string(), |u| u.get_s_or(name, default))
}

#[must_use]
pub fn get_i(name: &str) -> i32 {
    with(0, |u| u.get_i(name))
}

#[must_use]
pub fn get_i_or(name: &str, default: i32) -> i32 {
    with(default, |u| u.get_i_or(name, default))
}

#[must_use]
pub fn get_i64(name: &str) -> i64 {
    with(0, |u| u.get_i64(name))
}

#[must_use]
pub fn get_i64_or(name: &str, default: i64) -> i64 {
    with(default, |u| u.get_i64_or(name, default))
}

#[must_use]
pub fn get_u(name: &str) -> u32 {
    with(0, |u| u.get_u(name))
}

#[must_use]
pub fn get_u_or(name: &str, default: u32) -> u32 {
    with(default, |u| u.get_u_or(name, default))
}

#[must_use]
pub fn get_u64(name: &str) -> u64 {
    with(0, |u| u.get_u64(name))
}

#[must_use]
pub fn get_u64_or(name: &str, default: u64) -> u64 {
    with(default, |u| u.get_u64_or(name, default))
}

#[must_use]
pub fn get_f(name: &str) -> f64 {
    with(0.0, |u| u.get_f(name))
}

#[must_use]
pub fn get_f_or(name: &str, default: f64) -> f64 {
    with(default, |u| u.get_f_or(name, default))
}

#[must_use]
pub fn get_b(name: &str) -> bool {
    with(false, |u| u.get_b(name))
}

#[must_use]
pub fn get_b_or(name: &str, default: bool) -> bool {
    with(default, |u| u.get_b_or(name, default))
}

#[must_use]
pub fn get_m(name: &str) -> u32 {
    with(0, |u| u.get_m(name))
}

#[must_use]
pub fn get_m_or(name: &str, default: u32) -> u32 {
    with(default, |u| u.get_m_or(name, default))
}

#[must_use]
pub fn get_d(name: &str, unit: DurationUnit) -> Duration {
    with(Duration::ZERO, |u| u.get_d(name, unit))
}

#[must_use]
pub fn get_d_or(name: &str, unit: DurationUnit, default: Duration) -> Duration {
    with(default, |u| u.get_d_or(name, unit, default))
}

#[must_use]
pub fn get_td(name: &str) -> Duration {
    with(Duration::ZERO, |u| u.get_td(name))
}

#[must_use]
pub fn get_td_or(name: &str, default: Duration) -> Duration {
    with(default, |u| u.get_td_or(name, default))
}

#[must_use]
pub fn get_sz(name: &str) -> u64 {
    with(0, |u| u.get_sz(name))
}

#[must_use]
pub fn get_sz_or(name: &str, default: u64) -> u64 {
    with(default, |u| u.get_sz_or(name, default))
}

#[must_use]
pub fn get_ts(name: &str) -> DateTime<Utc> {
    with(DateTime::UNIX_EPOCH, |u| u.get_ts(name))
}

#[must_use]
pub fn get_ts_or(name: &str, default: DateTime<Utc>) -> DateTime<Utc> {
    with(default, |u| u.get_ts_or(name, default))
}

#[must_use]
pub fn get_tz(name: &str) -> Option<Tz> {
    with(None, |u| u.get_tz(name))
}

#[must_use]
pub fn get_tz_or(name: &str, default: Option<Tz>) -> Option<Tz> {
    with(default, |u| u.get_tz_or(name, default))
}

#[must_use]
pub fn get_l(name: &str) -> Vec<String> {
    with(Vec::new(), |u| u.get_l(name))
}

#[must_use]
pub fn get_l_or(name: &str, default: &[String]) -> Vec<String> {
    with(default.to_vec(), |u| u.get_l_or(name, default))
}
