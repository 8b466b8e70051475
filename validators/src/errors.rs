//! # Validation Errors
//!
//! Every violation a predicate can report. Message texts follow a fixed
//! schema (property name, verb, argument) so they can be matched by log
//! scrapers; see the predicate catalogue for which variant each check
//! raises.

use std::time::Duration;

use thiserror::Error;

/// A reported validation failure.
///
/// Argument-type problems ([`ValidationError::WrongArgument`],
/// [`ValidationError::EmptyArgument`]) are returned through the same
/// channel as regular violations — a misconfigured validator never
/// panics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Configuration is not initialized")]
    NotInitialized,

    #[error("Property {property} must be set")]
    NotSet { property: String },

    #[error("Property {property} must be one of {allowed:?}")]
    NotInSet {
        property: String,
        allowed: Vec<String>,
    },

    #[error("Property {property} can't be greater than {limit}")]
    TooBig { property: String, limit: String },

    #[error("Property {property} can't be less than {limit}")]
    TooSmall { property: String, limit: String },

    #[error("Property {property} must be in range {from}-{to}")]
    OutOfRange {
        property: String,
        from: f64,
        to: f64,
    },

    #[error("Property {property} can't be equal to {value}")]
    Equals { property: String, value: String },

    #[error("Property {property} value can't be longer than {limit} characters")]
    TooLong { property: String, limit: usize },

    #[error("Property {property} value can't be shorter than {limit} characters")]
    TooShort { property: String, limit: usize },

    #[error("Property {property} value must be exactly {limit} characters long")]
    WrongLength { property: String, limit: usize },

    #[error("Property {property} value must have prefix {prefix:?}")]
    NoPrefix { property: String, prefix: String },

    #[error("Property {property} value must have suffix {suffix:?}")]
    NoSuffix { property: String, suffix: String },

    #[error("Property {property} size can't be greater than {limit}")]
    SizeTooBig { property: String, limit: u64 },

    #[error("Property {property} size can't be less than {limit}")]
    SizeTooSmall { property: String, limit: u64 },

    #[error("Property {property} duration can't be longer than {limit:?}")]
    DurationTooLong { property: String, limit: Duration },

    #[error("Property {property} duration can't be shorter than {limit:?}")]
    DurationTooShort { property: String, limit: Duration },

    #[error("Property {property} must have a boolean value")]
    NotBool { property: String },

    #[error("Property {property} must have a numeric value")]
    NotNum { property: String },

    #[error("Property {property} must have a float value")]
    NotFloat { property: String },

    #[error("Property {property} must have a size value")]
    NotSize { property: String },

    #[error("Property {property} must have a duration value")]
    NotDur { property: String },

    #[error("Validator {validator} got unsupported argument type {type_name} for property {property}")]
    WrongArgument {
        validator: &'static str,
        property: String,
        type_name: &'static str,
    },

    #[error("Validator {validator} got an empty argument for property {property}")]
    EmptyArgument {
        validator: &'static str,
        property: String,
    },
}
