//! # Global Configuration Handle
//!
//! Process-wide configuration pointer for programs that do not thread a
//! [`Config`] value explicitly. [`load`] installs a configuration on
//! success and the module mirrors the typed accessor surface against it;
//! while no configuration is installed every getter returns its default
//! (or the type zero) and never panics.
//!
//! The state lives in a single module-level slot so tests can [`reset`]
//! it; tests touching the handle must be serialised.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use parking_lot::RwLock;
use tracing::info;

use crate::access::{ConfigAccess, Value};
use crate::config::{Config, ConfigError};
use crate::value::DurationUnit;

static GLOBAL: RwLock<Option<Config>> = RwLock::new(None);

/// Parses the given file and, only on success, replaces the global
/// configuration. On failure the previously installed configuration (if
/// any) stays active.
pub fn load<P: AsRef<Path>>(path: P) -> Result<(), ConfigError> {
    let config = Config::read(path)?;

    info!("Global configuration loaded from {}", config.path());

    *GLOBAL.write() = Some(config);

    Ok(())
}

/// Drops the installed configuration. Intended for tests.
pub fn reset() {
    *GLOBAL.write() = None;
}

/// True if a configuration is currently installed.
#[must_use]
pub fn is_configured() -> bool {
    GLOBAL.read().is_some()
}

/// Zero-sized view of the global handle usable wherever a
/// [`ConfigAccess`] is expected (most notably the validator framework).
/// While no configuration is installed every lookup resolves to `None`.
pub struct GlobalConfig;

impl ConfigAccess for GlobalConfig {
    fn raw(&self, name: &str) -> Option<String> {
        GLOBAL.read().as_ref().and_then(|c| c.raw(name))
    }
}

fn with<R>(default: R, f: impl FnOnce(&Config) -> R) -> R {
    match &*GLOBAL.read() {
        Some(config) => f(config),
        None => default,
    }
}

/// Reloads the installed configuration from its backing file.
pub fn reload() -> Result<HashMap<String, bool>, ConfigError> {
    match &*GLOBAL.read() {
        Some(config) => config.reload(),
        None => Err(ConfigError::NotInitialized),
    }
}

/// Registers an alias on the installed configuration.
pub fn alias(old: &str, new: &str) -> Result<(), ConfigError> {
    match &*GLOBAL.read() {
        Some(config) => config.alias(old, new),
        None => Err(ConfigError::NotInitialized),
    }
}

#[must_use]
pub fn has(name: &str) -> bool {
    with(false, |c| c.has(name))
}

#[must_use]
pub fn has_section(name: &str) -> bool {
    with(false, |c| c.has_section(name))
}

#[must_use]
pub fn sections() -> Vec<String> {
    with(Vec::new(), |c| c.sections())
}

#[must_use]
pub fn props(section: &str) -> Vec<String> {
    with(Vec::new(), |c| c.props(section))
}

pub fn is<V: Into<Value>>(name: &str, value: V) -> bool {
    let value = value.into();
    with(matches!(value, Value::Empty), |c| c.is(name, value))
}

#[must_use]
pub fn get_s(name: &str) -> String {
    with(String::new(), |c| c.get_s(name))
}

#[must_use]
pub fn get_s_or(name: &str, default: &str) -> String {
    with(default.to_string(), |c| c.get_s_or(name, default))
}

#[must_use]
pub fn get_i(name: &str) -> i32 {
    with(0, |c| c.get_i(name))
}

#[must_use]
pub fn get_i_or(name: &str, default: i32) -> i32 {
    with(default, |c| c.get_i_or(name, default))
}

#[must_use]
pub fn get_i64(name: &str) -> i64 {
    with(0, |c| c.get_i64(name))
}

#[must_use]
pub fn get_i64_or(name: &str, default: i64) -> i64 {
    with(default, |c| c.get_i64_or(name, default))
}

#[must_use]
pub fn get_u(name: &str) -> u32 {
    with(0, |c| c.get_u(name))
}

#[must_use]
pub fn get_u_or(name: &str, default: u32) -> u32 {
    with(default, |c| c.get_u_or(name, default))
}

#[must_use]
pub fn get_u64(name: &str) -> u64 {
    with(0, |c| c.get_u64(name))
}

#[must_use]
pub fn get_u64_or(name: &str, default: u64) -> u64 {
    with(default, |c| c.get_u64_or(name, default))
}

#[must_use]
pub fn get_f(name: &str) -> f64 {
    with(0.0, |c| c.get_f(name))
}

#[must_use]
pub fn get_f_or(name: &str, default: f64) -> f64 {
    with(default, |c| c.get_f_or(name, default))
}

#[must_use]
pub fn get_b(name: &str) -> bool {
    with(false, |c| c.get_b(name))
}

#[must_use]
pub fn get_b_or(name: &str, default: bool) -> bool {
    with(default, |c| c.get_b_or(name, default))
}

#[must_use]
pub fn get_m(name: &str) -> u32 {
    with(0, |c| c.get_m(name))
}

#[must_use]
pub fn get_m_or(name: &str, default: u32) -> u32 {
    with(default, |c| c.get_m_or(name, default))
}

#[must_use]
pub fn get_d(name: &str, unit: DurationUnit) -> Duration {
    with(Duration::ZERO, |c| c.get_d(name, unit))
}

#[must_use]
pub fn get_d_or(name: &str, unit: DurationUnit, default: Duration) -> Duration {
    with(default, |c| c.get_d_or(name, unit, default))
}

#[must_use]
pub fn get_td(name: &str) -> Duration {
    with(Duration::ZERO, |c| c.get_td(name))
}

#[must_use]
pub fn get_td_or(name: &str, default: Duration) -> Duration {
    with(default, |c| c.get_td_or(name, default))
}

#[must_use]
pub fn get_sz(name: &str) -> u64 {
    with(0, |c| c.get_sz(name))
}

#[must_use]
pub fn get_sz_or(name: &str, default: u64) -> u64 {
    with(default, |c| c.get_sz_or(name, default))
}

#[must_use]
pub fn get_ts(name: &str) -> DateTime<Utc> {
    with(DateTime::UNIX_EPOCH, |c| c.get_ts(name))
}

#[must_use]
pub fn get_ts_or(name: &str, default: DateTime<Utc>) -> DateTime<Utc> {
    with(default, |c| c.get_ts_or(name, default))
}

#[must_use]
pub fn get_tz(name: &str) -> Option<Tz> {
    with(None, |c| c.get_tz(name))
}

#[must_use]
pub fn get_tz_or(name: &str, default: Option<Tz>) -> Option<Tz> {
    with(default, |c| c.get_tz_or(name, default))
}

#[must_use]
pub fn get_l(name: &str) -> Vec<String> {
    with(Vec::new(), |c| c.get_l(name))
}

#[must_use]
pub fn get_l_or(name: &str, default: &[String]) -> Vec<String> {
    with(default.to_vec(), |c| c.get_l_or(name, default))
}
