//! # Typed Accessor Capability
//!
//! [`ConfigAccess`] is the capability set shared by the file-backed store
//! and the unified overlay: everything that can resolve a property name to
//! its raw string gains the full typed getter surface. The validator
//! framework targets this trait, so both stores validate uniformly.
//!
//! [`Value`] is the tagged variant of legal dynamic-argument shapes used
//! by the equality helper and the validators.

use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::value::{self, DurationUnit};

/// Typed read access to a configuration source.
///
/// Implementors provide [`ConfigAccess::raw`]; every typed getter is
/// derived from it. Each kind has a `get_*_or` form taking an explicit
/// default and a `get_*` form using the type zero. Defaults apply when the
/// property is missing or its raw value is empty; a present-but-malformed
/// value decodes to the type zero instead.
pub trait ConfigAccess: Send + Sync {
    /// Resolves a property name to its raw string value.
    ///
    /// Returns `None` for invalid names and unknown properties. Alias
    /// handling, overlay precedence and similar concerns live behind this
    /// seam.
    fn raw(&self, name: &str) -> Option<String>;

    /// Returns true if the property has a non-empty raw value.
    fn has(&self, name: &str) -> bool {
        self.raw(name).is_some_and(|v| !v.is_empty())
    }

    fn get_s_or(&self, name: &str, default: &str) -> String {
        match self.raw(name) {
            Some(v) if !v.is_empty() => v,
            _ => default.to_string(),
        }
    }

    fn get_s(&self, name: &str) -> String {
        self.get_s_or(name, "")
    }

    fn get_i_or(&self, name: &str, default: i32) -> i32 {
        self.raw(name)
            .map_or(default, |v| value::parse_int(&v, default))
    }

    fn get_i(&self, name: &str) -> i32 {
        self.get_i_or(name, 0)
    }

    fn get_i64_or(&self, name: &str, default: i64) -> i64 {
        self.raw(name)
            .map_or(default, |v| value::parse_int64(&v, default))
    }

    fn get_i64(&self, name: &str) -> i64 {
        self.get_i64_or(name, 0)
    }

    fn get_u_or(&self, name: &str, default: u32) -> u32 {
        self.raw(name)
            .map_or(default, |v| value::parse_uint(&v, default))
    }

    fn get_u(&self, name: &str) -> u32 {
        self.get_u_or(name, 0)
    }

    fn get_u64_or(&self, name: &str, default: u64) -> u64 {
        self.raw(name)
            .map_or(default, |v| value::parse_uint64(&v, default))
    }

    fn get_u64(&self, name: &str) -> u64 {
        self.get_u64_or(name, 0)
    }

    fn get_f_or(&self, name: &str, default: f64) -> f64 {
        self.raw(name)
            .map_or(default, |v| value::parse_float(&v, default))
    }

    fn get_f(&self, name: &str) -> f64 {
        self.get_f_or(name, 0.0)
    }

    fn get_b_or(&self, name: &str, default: bool) -> bool {
        self.raw(name)
            .map_or(default, |v| value::parse_bool(&v, default))
    }

    fn get_b(&self, name: &str) -> bool {
        self.get_b_or(name, false)
    }

    fn get_m_or(&self, name: &str, default: u32) -> u32 {
        self.raw(name)
            .map_or(default, |v| value::parse_mode(&v, default))
    }

    fn get_m(&self, name: &str) -> u32 {
        self.get_m_or(name, 0)
    }

    fn get_d_or(&self, name: &str, unit: DurationUnit, default: Duration) -> Duration {
        self.raw(name)
            .map_or(default, |v| value::parse_duration(&v, unit, default))
    }

    fn get_d(&self, name: &str, unit: DurationUnit) -> Duration {
        self.get_d_or(name, unit, Duration::ZERO)
    }

    fn get_td_or(&self, name: &str, default: Duration) -> Duration {
        self.raw(name)
            .map_or(default, |v| value::parse_time_duration(&v, default))
    }

    fn get_td(&self, name: &str) -> Duration {
        self.get_td_or(name, Duration::ZERO)
    }

    fn get_sz_or(&self, name: &str, default: u64) -> u64 {
        self.raw(name)
            .map_or(default, |v| value::parse_size(&v, default))
    }

    fn get_sz(&self, name: &str) -> u64 {
        self.get_sz_or(name, 0)
    }

    fn get_ts_or(&self, name: &str, default: DateTime<Utc>) -> DateTime<Utc> {
        self.raw(name)
            .map_or(default, |v| value::parse_timestamp(&v, default))
    }

    fn get_ts(&self, name: &str) -> DateTime<Utc> {
        self.get_ts_or(name, DateTime::UNIX_EPOCH)
    }

    fn get_tz_or(&self, name: &str, default: Option<Tz>) -> Option<Tz> {
        self.raw(name)
            .map_or(default, |v| value::parse_timezone(&v, default))
    }

    fn get_tz(&self, name: &str) -> Option<Tz> {
        self.get_tz_or(name, None)
    }

    fn get_l_or(&self, name: &str, default: &[String]) -> Vec<String> {
        self.raw(name)
            .map_or_else(|| default.to_vec(), |v| value::parse_list(&v, default))
    }

    fn get_l(&self, name: &str) -> Vec<String> {
        self.get_l_or(name, &[])
    }
}

/// Inclusive numeric range argument for range validators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub from: f64,
    pub to: f64,
}

/// Dynamic argument for the equality helper and the validators.
///
/// Tagged variant of the legal argument shapes; anything a validator
/// cannot handle is rejected with an argument-type error carrying
/// [`Value::type_name`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Empty,
    Str(String),
    Int(i32),
    Int64(i64),
    Uint(u32),
    Uint64(u64),
    Float(f64),
    Bool(bool),
    Dur(Duration),
    Ts(DateTime<Utc>),
    Tz(Tz),
    List(Vec<String>),
    Range(Range),
}

impl Value {
    /// Human-readable shape name, used in argument-type errors.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Empty => "empty",
            Value::Str(_) => "string",
            Value::Int(_) => "int",
            Value::Int64(_) => "int64",
            Value::Uint(_) => "uint",
            Value::Uint64(_) => "uint64",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Dur(_) => "duration",
            Value::Ts(_) => "timestamp",
            Value::Tz(_) => "timezone",
            Value::List(_) => "list",
            Value::Range(_) => "range",
        }
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Empty
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Uint(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Uint64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Duration> for Value {
    fn from(v: Duration) -> Self {
        Value::Dur(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Ts(v)
    }
}

impl From<Tz> for Value {
    fn from(v: Tz) -> Self {
        Value::Tz(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::List(v)
    }
}

impl From<Vec<&str>> for Value {
    fn from(v: Vec<&str>) -> Self {
        Value::List(v.into_iter().map(str::to_string).collect())
    }
}

impl From<Range> for Value {
    fn from(v: Range) -> Self {
        Value::Range(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapAccess(HashMap<String, String>);

    impl ConfigAccess for MapAccess {
        fn raw(&self, name: &str) -> Option<String> {
            self.0.get(name).cloned()
        }
    }

    fn access(pairs: &[(&str, &str)]) -> MapAccess {
        MapAccess(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_getters_decode_raw_values() {
        let cfg = access(&[
            ("net:port", "8080"),
            ("net:ratio", "0.5"),
            ("net:debug", "yes"),
            ("net:mode", "640"),
            ("net:size", "2kb"),
            ("net:wait", "15m"),
            ("net:peers", "a,b"),
        ]);

        assert_eq!(cfg.get_i("net:port"), 8080);
        assert_eq!(cfg.get_u64("net:port"), 8080);
        assert_eq!(cfg.get_f("net:ratio"), 0.5);
        assert!(cfg.get_b("net:debug"));
        assert_eq!(cfg.get_m("net:mode"), 0o640);
        assert_eq!(cfg.get_sz("net:size"), 2048);
        assert_eq!(cfg.get_td("net:wait"), Duration::from_secs(900));
        assert_eq!(cfg.get_l("net:peers"), vec!["a", "b"]);
    }

    #[test]
    fn test_getters_fall_back_to_defaults() {
        let cfg = access(&[("net:empty", "")]);

        assert_eq!(cfg.get_s_or("net:missing", "fallback"), "fallback");
        assert_eq!(cfg.get_s_or("net:empty", "fallback"), "fallback");
        assert_eq!(cfg.get_i_or("net:missing", 80), 80);
        assert_eq!(cfg.get_i_or("net:empty", 80), 80);
        assert_eq!(cfg.get_b_or("net:missing", true), true);
        assert_eq!(cfg.get_d("net:missing", DurationUnit::Hour), Duration::ZERO);
    }

    #[test]
    fn test_has_requires_non_empty_value() {
        let cfg = access(&[("a:set", "x"), ("a:empty", "")]);

        assert!(cfg.has("a:set"));
        assert!(!cfg.has("a:empty"));
        assert!(!cfg.has("a:missing"));
    }

    #[test]
    fn test_value_type_names() {
        assert_eq!(Value::from(5i32).type_name(), "int");
        assert_eq!(Value::from(5u64).type_name(), "uint64");
        assert_eq!(Value::from("x").type_name(), "string");
        assert_eq!(Value::from(vec!["a"]).type_name(), "list");
        assert_eq!(
            Value::from(Range { from: 1.0, to: 2.0 }).type_name(),
            "range"
        );
        assert_eq!(Value::from(()).type_name(), "empty");
    }
}
