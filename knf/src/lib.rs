//! # KNF Configuration
//!
//! Core of the hierarchical configuration subsystem: the KNF textual
//! format (sectioned, colon-separated, macro-capable), a typed accessor
//! surface over the parsed data, property aliasing, merging, file-backed
//! reload with a per-property change map and a process-wide global
//! handle.
//!
//! This crate provides:
//! - Pure value decoders for every supported property kind
//! - A line-oriented KNF parser with `{section:property}` macro expansion
//! - A lock-guarded, thread-safe configuration store
//! - The [`ConfigAccess`] capability trait shared with the unified
//!   overlay and targeted by the validator framework
//! - A global handle mirroring the typed accessor surface
//!
//! # Best Practices
//!
//! - Getters never fail: missing or empty values resolve to the supplied
//!   default, malformed values to the type zero
//! - Parsing and reload are atomic; a partial configuration is never
//!   observable
//! - Uses `thiserror` for structured error definitions

pub mod access;
pub mod config;
pub mod global;
pub mod parser;
pub mod value;

pub use access::{ConfigAccess, Range, Value};
pub use config::{Config, ConfigError, normalize_name};
pub use parser::ParseError;
pub use value::DurationUnit;
