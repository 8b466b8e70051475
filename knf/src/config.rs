//! # Configuration Store
//!
//! Holds parsed KNF data behind a readers-writer lock and composes the
//! raw string store with the value decoders into the typed accessor
//! surface. Supports aliasing, merging and file-backed reload with a
//! per-property change map.

use std::collections::HashMap;
use std::path::Path;

use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use tracing::{debug, info};

use crate::access::{ConfigAccess, Value};
use crate::parser::{self, ParseError};

/// Sentinel stored in the data map under a section's case-folded name so
/// section presence can be told apart from a property lookup.
pub(crate) const SECTION_MARKER: &str = "!";

/// Configuration store error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration is not initialized")]
    NotInitialized,

    #[error("Reload requires a file-backed configuration")]
    NoBackingFile,

    #[error("Invalid property name: {name:?}")]
    InvalidName { name: String },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parsed configuration data; guarded by the [`Config`] lock.
#[derive(Debug, Default)]
pub(crate) struct Store {
    /// Source file path; empty when parsed from memory.
    pub(crate) path: String,

    /// Case-folded fully-qualified name → raw value; section sentinels
    /// live here under the bare section name.
    pub(crate) data: HashMap<String, String>,

    /// Section names in file order, file casing preserved.
    pub(crate) sections: Vec<String>,

    /// Fully-qualified property names in file order, file casing
    /// preserved.
    pub(crate) props: Vec<String>,

    /// Case-folded alias: new name → old name, single hop.
    pub(crate) aliases: HashMap<String, String>,
}

/// A parsed KNF configuration.
///
/// All reads take the shared lock and all mutation ([`Config::reload`],
/// [`Config::alias`], [`Config::merge`]) takes the exclusive lock, so a
/// `Config` is safe to share across threads.
#[derive(Debug)]
pub struct Config {
    inner: RwLock<Store>,
}

/// Canonical (case-folded, trimmed) form of a property name, or `None`
/// when the name is not two non-empty tokens separated by a single colon.
#[must_use]
pub fn normalize_name(name: &str) -> Option<String> {
    let (section, prop) = name.split_once(':')?;

    if prop.contains(':') {
        return None;
    }

    let section = section.trim();
    let prop = prop.trim();

    if section.is_empty() || prop.is_empty() {
        return None;
    }

    Some(format!(
        "{}:{}",
        section.to_lowercase(),
        prop.to_lowercase()
    ))
}

impl Config {
    /// Reads and parses a KNF file.
    ///
    /// # M-CANONICAL-DOCS
    ///
    /// ## Purpose
    /// File-backed entry point: parses the file at `path` into a fully
    /// populated store and remembers the path so [`Config::reload`] can
    /// re-read it later.
    ///
    /// ## Usage
    /// ```rust,no_run
    /// use knf::{Config, ConfigAccess};
    ///
    /// fn main() -> Result<(), knf::ConfigError> {
    ///     let config = Config::read("/etc/app.knf")?;
    ///     println!("host: {}", config.get_s_or("net:host", "localhost"));
    ///     Ok(())
    /// }
    /// ```
    ///
    /// ## Error Handling
    /// Returns `ConfigError::Io` when the file cannot be read and
    /// `ConfigError::Parse` (with a 1-based line number) when it is
    /// ill-formed. No partially parsed configuration is ever exposed.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut store = parser::parse_text(&text)?;

        store.path = path.to_string_lossy().into_owned();

        Ok(Self {
            inner: RwLock::new(store),
        })
    }

    /// Parses KNF data from a byte buffer. The resulting configuration
    /// has no backing file and therefore cannot be reloaded.
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        let text = String::from_utf8_lossy(data);
        let store = parser::parse_text(&text)?;

        Ok(Self {
            inner: RwLock::new(store),
        })
    }

    /// Source file path; empty for configurations parsed from memory.
    #[must_use]
    pub fn path(&self) -> String {
        self.inner.read().path.clone()
    }

    /// Registers an alias: reads of `new` consult `old` first and fall
    /// back to `new`'s own value when `old` is empty or missing.
    ///
    /// The alias table is a single-level rewrite — alias targets are
    /// never chased recursively.
    pub fn alias(&self, old: &str, new: &str) -> Result<(), ConfigError> {
        let old_key = normalize_name(old).ok_or_else(|| ConfigError::InvalidName {
            name: old.to_string(),
        })?;
        let new_key = normalize_name(new).ok_or_else(|| ConfigError::InvalidName {
            name: new.to_string(),
        })?;

        self.inner.write().aliases.insert(new_key, old_key);

        Ok(())
    }

    /// True if the file defined the given section.
    #[must_use]
    pub fn has_section(&self, name: &str) -> bool {
        self.inner
            .read()
            .data
            .get(&name.trim().to_lowercase())
            .is_some_and(|v| v == SECTION_MARKER)
    }

    /// Section names in the order they first appear in the file.
    #[must_use]
    pub fn sections(&self) -> Vec<String> {
        self.inner.read().sections.clone()
    }

    /// Bare property names of a section in file order; unknown sections
    /// yield an empty list. Aliases do not affect enumeration.
    #[must_use]
    pub fn props(&self, section: &str) -> Vec<String> {
        let prefix = format!("{}:", section.trim().to_lowercase());

        self.inner
            .read()
            .props
            .iter()
            .filter(|p| p.to_lowercase().starts_with(&prefix))
            .filter_map(|p| p.split_once(':').map(|(_, name)| name.to_string()))
            .collect()
    }

    /// Compares the property against a dynamically-typed value using the
    /// getter matching the value's shape. Time zones compare by name,
    /// timestamps by Unix seconds and lists element-wise.
    pub fn is<V: Into<Value>>(&self, name: &str, value: V) -> bool {
        match value.into() {
            Value::Empty => self.get_s(name).is_empty(),
            Value::Str(v) => self.get_s(name) == v,
            Value::Int(v) => self.get_i(name) == v,
            Value::Int64(v) => self.get_i64(name) == v,
            Value::Uint(v) => self.get_u(name) == v,
            Value::Uint64(v) => self.get_u64(name) == v,
            Value::Float(v) => self.get_f(name) == v,
            Value::Bool(v) => self.get_b(name) == v,
            Value::Dur(v) => self.get_td(name) == v,
            Value::Ts(v) => self.get_ts(name).timestamp() == v.timestamp(),
            Value::Tz(v) => self.get_tz(name).map(|z| z.name().to_string())
                == Some(v.name().to_string()),
            Value::List(v) => self.get_l(name) == v,
            Value::Range(_) => false,
        }
    }

    /// Copies all entries of `other` into this store. Collisions resolve
    /// in favour of `other`; sections and properties not yet present are
    /// appended in `other`'s order.
    pub fn merge(&self, other: &Config) {
        let (data, sections, props) = {
            let o = other.inner.read();
            (o.data.clone(), o.sections.clone(), o.props.clone())
        };

        let mut store = self.inner.write();

        for section in sections {
            let known = store
                .sections
                .iter()
                .any(|s| s.to_lowercase() == section.to_lowercase());

            if !known {
                store.sections.push(section);
            }
        }

        for prop in props {
            let key = prop.to_lowercase();

            if !store.data.contains_key(&key) {
                store.props.push(prop);
            }
        }

        let copied = data.len();
        store.data.extend(data);

        debug!("Merged {} entries into configuration", copied);
    }

    /// Re-parses the backing file and swaps the data in atomically.
    ///
    /// # M-CANONICAL-DOCS
    ///
    /// ## Purpose
    /// Refreshes a file-backed configuration and reports, for every
    /// property known before the reload, whether its raw value changed.
    ///
    /// ## Usage
    /// ```rust,no_run
    /// use knf::Config;
    ///
    /// fn main() -> Result<(), knf::ConfigError> {
    ///     let config = Config::read("/etc/app.knf")?;
    ///     let changes = config.reload()?;
    ///
    ///     for (property, changed) in &changes {
    ///         if *changed {
    ///             println!("{property} changed");
    ///         }
    ///     }
    ///     Ok(())
    /// }
    /// ```
    ///
    /// ## Error Handling
    /// Fails with `NoBackingFile` for configurations parsed from memory
    /// and propagates IO/parse failures. On any error the current data
    /// stays fully visible; readers never observe an intermediate state.
    pub fn reload(&self) -> Result<HashMap<String, bool>, ConfigError> {
        let path = self.path();

        if path.is_empty() {
            return Err(ConfigError::NoBackingFile);
        }

        let text = std::fs::read_to_string(&path)?;
        let mut reloaded = parser::parse_text(&text)?;
        reloaded.path = path.clone();

        let store = self.inner.upgradable_read();
        let mut changes = HashMap::new();

        for prop in &store.props {
            let key = prop.to_lowercase();
            let changed = store.data.get(&key) != reloaded.data.get(&key);

            if changed {
                debug!("Property {} changed on reload", key);
            }

            changes.insert(key, changed);
        }

        let mut store = RwLockUpgradableReadGuard::upgrade(store);
        store.data = reloaded.data;
        store.sections = reloaded.sections;
        store.props = reloaded.props;

        info!(
            "Configuration reloaded from {} ({} properties changed)",
            path,
            changes.values().filter(|c| **c).count()
        );

        Ok(changes)
    }
}

impl ConfigAccess for Config {
    fn raw(&self, name: &str) -> Option<String> {
        let key = normalize_name(name)?;
        let store = self.inner.read();

        if let Some(old) = store.aliases.get(&key) {
            if let Some(value) = store.data.get(old) {
                if !value.is_empty() {
                    return Some(value.clone());
                }
            }
        }

        store.data.get(&key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    fn config(text: &str) -> Config {
        Config::parse(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_parse_and_read() {
        let cfg = config("[net]\n  host: example.com\n  port: 8080\n");

        assert_eq!(cfg.get_s("net:host"), "example.com");
        assert_eq!(cfg.get_i_or("net:port", 80), 8080);
        assert_eq!(cfg.get_i_or("net:missing", 80), 80);
        assert_eq!(cfg.sections(), vec!["net"]);
        assert_eq!(cfg.props("net"), vec!["host", "port"]);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let cfg = config("[Net]\n  Host: example.com\n");

        assert_eq!(cfg.get_s("net:host"), "example.com");
        assert_eq!(cfg.get_s("NET:HOST"), "example.com");
        assert_eq!(cfg.get_s("Net:Host"), "example.com");
    }

    #[test]
    fn test_enumeration_preserves_file_casing() {
        let cfg = config("[Net]\n  Host: a\n  portNumber: b\n");

        assert_eq!(cfg.sections(), vec!["Net"]);
        assert_eq!(cfg.props("net"), vec!["Host", "portNumber"]);
    }

    #[test]
    fn test_invalid_names_return_defaults() {
        let cfg = config("[net]\n  host: example.com\n");

        assert_eq!(cfg.get_s_or("host", "d"), "d");
        assert_eq!(cfg.get_s_or("a:b:c", "d"), "d");
        assert_eq!(cfg.get_s_or(":host", "d"), "d");
        assert_eq!(cfg.get_s_or("net:", "d"), "d");
        assert_eq!(cfg.get_i_or("host", 5), 5);
    }

    #[test]
    fn test_section_marker_is_never_a_property_value() {
        let cfg = config("[net]\n  host: a\n");

        assert!(cfg.has_section("net"));
        assert!(cfg.has_section("NET"));
        assert!(!cfg.has_section("missing"));
        assert_eq!(cfg.get_s("net:net"), "");
    }

    #[test]
    fn test_has_reports_non_empty_values() {
        let cfg = config("[net]\n  host: a\n  empty:\n");

        assert!(cfg.has("net:host"));
        assert!(!cfg.has("net:empty"));
        assert!(!cfg.has("net:missing"));
    }

    #[test]
    fn test_alias_prefers_old_property_value() {
        let cfg = config("[a]\n  old: from-old\n[b]\n  new: from-new\n");

        cfg.alias("a:old", "b:new").unwrap();

        assert_eq!(cfg.get_s("b:new"), "from-old");
        assert_eq!(cfg.get_s("a:old"), "from-old");
    }

    #[test]
    fn test_alias_falls_back_when_old_is_empty() {
        let cfg = config("[a]\n  old:\n[b]\n  new: from-new\n");

        cfg.alias("a:old", "b:new").unwrap();

        assert_eq!(cfg.get_s("b:new"), "from-new");
    }

    #[test]
    fn test_alias_does_not_affect_enumeration() {
        let cfg = config("[a]\n  old: 1\n[b]\n  new: 2\n");

        cfg.alias("a:old", "b:new").unwrap();

        assert_eq!(cfg.props("b"), vec!["new"]);
        assert_eq!(cfg.sections(), vec!["a", "b"]);
    }

    #[test]
    fn test_alias_rejects_invalid_names() {
        let cfg = config("[a]\n  x: 1\n");

        assert!(matches!(
            cfg.alias("bad", "a:x"),
            Err(ConfigError::InvalidName { .. })
        ));
        assert!(matches!(
            cfg.alias("a:x", "also bad"),
            Err(ConfigError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_is_dispatches_on_value_shape() {
        let cfg = config(
            "[s]\n  num: 5\n  ratio: 2.5\n  flag: yes\n  name: demo\n  list: a, b\n  wait: 30s\n  zone: Europe/Vienna\n  when: 1709629048\n",
        );

        assert!(cfg.is("s:num", 5));
        assert!(cfg.is("s:num", 5i64));
        assert!(cfg.is("s:num", 5u64));
        assert!(!cfg.is("s:num", 6));
        assert!(cfg.is("s:ratio", 2.5));
        assert!(cfg.is("s:flag", true));
        assert!(cfg.is("s:name", "demo"));
        assert!(cfg.is("s:list", vec!["a", "b"]));
        assert!(cfg.is("s:wait", std::time::Duration::from_secs(30)));
        assert!(cfg.is("s:zone", chrono_tz::Europe::Vienna));
        assert!(cfg.is(
            "s:when",
            chrono::DateTime::from_timestamp(1_709_629_048, 0).unwrap()
        ));
        assert!(cfg.is("s:missing", ()));
        assert!(!cfg.is("s:name", ()));
    }

    #[test]
    fn test_merge_later_values_win() {
        let base = config("[a]\n  x: 1\n  y: 2\n");
        let other = config("[a]\n  y: 3\n[b]\n  z: 4\n");

        base.merge(&other);

        assert_eq!(base.get_s("a:x"), "1");
        assert_eq!(base.get_s("a:y"), "3");
        assert_eq!(base.get_s("b:z"), "4");
        assert_eq!(base.sections(), vec!["a", "b"]);
        assert_eq!(base.props("a"), vec!["x", "y"]);
        assert_eq!(base.props("b"), vec!["z"]);
    }

    #[test]
    fn test_reload_returns_change_map() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.knf");

        std::fs::write(&path, "[a]\n  x: 1\n  y: 2\n").unwrap();
        let cfg = Config::read(&path).unwrap();

        std::fs::write(&path, "[a]\n  x: 1\n  y: 3\n").unwrap();
        let changes = cfg.reload().unwrap();

        assert_eq!(changes.get("a:x"), Some(&false));
        assert_eq!(changes.get("a:y"), Some(&true));
        assert_eq!(changes.len(), 2);
        assert_eq!(cfg.get_s("a:y"), "3");
    }

    #[test]
    fn test_reload_keeps_state_on_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.knf");

        std::fs::write(&path, "[a]\n  x: 1\n").unwrap();
        let cfg = Config::read(&path).unwrap();

        std::fs::write(&path, "x: no section\n").unwrap();
        assert!(cfg.reload().is_err());

        assert_eq!(cfg.get_s("a:x"), "1");
        assert_eq!(cfg.sections(), vec!["a"]);
    }

    #[test]
    fn test_reload_requires_backing_file() {
        let cfg = config("[a]\n  x: 1\n");

        assert!(matches!(cfg.reload(), Err(ConfigError::NoBackingFile)));
    }

    #[test]
    fn test_reload_keeps_aliases() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.knf");

        std::fs::write(&path, "[a]\n  old: 1\n[b]\n  new: 2\n").unwrap();
        let cfg = Config::read(&path).unwrap();
        cfg.alias("a:old", "b:new").unwrap();

        cfg.reload().unwrap();

        assert_eq!(cfg.get_s("b:new"), "1");
    }

    #[test]
    fn test_reload_is_atomic_for_concurrent_readers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.knf");

        std::fs::write(&path, "[a]\n  x: 1\n  y: 2\n").unwrap();
        let cfg = Arc::new(Config::read(&path).unwrap());

        std::fs::write(&path, "[a]\n  x: 10\n  y: 20\n").unwrap();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let cfg = Arc::clone(&cfg);
                scope.spawn(move || {
                    for _ in 0..500 {
                        // each read sees the full pre- or post-reload
                        // store, never an emptied or half-swapped one
                        let x = cfg.get_i("a:x");
                        let y = cfg.get_i("a:y");
                        assert!(x == 1 || x == 10, "torn read: x = {x}");
                        assert!(y == 2 || y == 20, "torn read: y = {y}");
                        assert_eq!(cfg.sections(), vec!["a"]);
                    }
                });
            }

            cfg.reload().unwrap();
        });

        assert_eq!(cfg.get_i("a:x"), 10);
        assert_eq!(cfg.get_i("a:y"), 20);
    }

    #[test]
    fn test_path_is_empty_for_memory_configs() {
        let cfg = config("[a]\n  x: 1\n");
        assert_eq!(cfg.path(), "");

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[a]\n  x: 1\n").unwrap();
        let cfg = Config::read(file.path()).unwrap();
        assert!(!cfg.path().is_empty());
    }

    #[test]
    fn test_read_missing_file_fails() {
        assert!(matches!(
            Config::read("/nonexistent/app.knf"),
            Err(ConfigError::Io(_))
        ));
    }
}
