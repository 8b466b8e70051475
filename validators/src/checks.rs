//! # Predicate Catalogue
//!
//! Property-level checks invoked against the [`ConfigAccess`] capability
//! set. Each predicate returns `None` on success or the violation it
//! found; an argument shape a predicate cannot handle produces a
//! [`ValidationError::WrongArgument`] instead of a panic.
//!
//! Bound checks are inclusive: `less(n)` passes values up to and
//! including `n`, `greater(n)` passes values down to and including `n`;
//! the length, size and duration families follow the same pattern.

use knf::{ConfigAccess, Value, value};

use crate::errors::ValidationError;

fn wrong(validator: &'static str, property: &str, arg: &Value) -> ValidationError {
    ValidationError::WrongArgument {
        validator,
        property: property.to_string(),
        type_name: arg.type_name(),
    }
}

/// Fails when the property's string value is empty.
pub fn set(config: &dyn ConfigAccess, property: &str, _arg: &Value) -> Option<ValidationError> {
    config.get_s(property).is_empty().then(|| ValidationError::NotSet {
        property: property.to_string(),
    })
}

/// Fails when the property's string value is not an element of the list.
pub fn set_to_any(
    config: &dyn ConfigAccess,
    property: &str,
    arg: &Value,
) -> Option<ValidationError> {
    let Value::List(allowed) = arg else {
        return Some(wrong("SetToAny", property, arg));
    };

    let current = config.get_s(property);

    if allowed.iter().any(|item| *item == current) {
        return None;
    }

    Some(ValidationError::NotInSet {
        property: property.to_string(),
        allowed: allowed.clone(),
    })
}

/// Case-folded variant of [`set_to_any`].
pub fn set_to_any_ignore_case(
    config: &dyn ConfigAccess,
    property: &str,
    arg: &Value,
) -> Option<ValidationError> {
    let Value::List(allowed) = arg else {
        return Some(wrong("SetToAnyIgnoreCase", property, arg));
    };

    let current = config.get_s(property).to_lowercase();

    if allowed.iter().any(|item| item.to_lowercase() == current) {
        return None;
    }

    Some(ValidationError::NotInSet {
        property: property.to_string(),
        allowed: allowed.clone(),
    })
}

/// Fails when the property's numeric value exceeds the argument.
pub fn less(config: &dyn ConfigAccess, property: &str, arg: &Value) -> Option<ValidationError> {
    let too_big = |limit: String| ValidationError::TooBig {
        property: property.to_string(),
        limit,
    };

    match arg {
        Value::Int(n) => (config.get_i(property) > *n).then(|| too_big(n.to_string())),
        Value::Int64(n) => (config.get_i64(property) > *n).then(|| too_big(n.to_string())),
        Value::Uint(n) => (config.get_u(property) > *n).then(|| too_big(n.to_string())),
        Value::Uint64(n) => (config.get_u64(property) > *n).then(|| too_big(n.to_string())),
        Value::Float(n) => (config.get_f(property) > *n).then(|| too_big(n.to_string())),
        _ => Some(wrong("Less", property, arg)),
    }
}

/// Fails when the property's numeric value is below the argument.
pub fn greater(config: &dyn ConfigAccess, property: &str, arg: &Value) -> Option<ValidationError> {
    let too_small = |limit: String| ValidationError::TooSmall {
        property: property.to_string(),
        limit,
    };

    match arg {
        Value::Int(n) => (config.get_i(property) < *n).then(|| too_small(n.to_string())),
        Value::Int64(n) => (config.get_i64(property) < *n).then(|| too_small(n.to_string())),
        Value::Uint(n) => (config.get_u(property) < *n).then(|| too_small(n.to_string())),
        Value::Uint64(n) => (config.get_u64(property) < *n).then(|| too_small(n.to_string())),
        Value::Float(n) => (config.get_f(property) < *n).then(|| too_small(n.to_string())),
        _ => Some(wrong("Greater", property, arg)),
    }
}

/// Fails when the property's value lies outside the inclusive range; both
/// the value and the endpoints are coerced through float.
pub fn in_range(config: &dyn ConfigAccess, property: &str, arg: &Value) -> Option<ValidationError> {
    let Value::Range(range) = arg else {
        return Some(wrong("InRange", property, arg));
    };

    let current = config.get_f(property);

    if current < range.from || current > range.to {
        return Some(ValidationError::OutOfRange {
            property: property.to_string(),
            from: range.from,
            to: range.to,
        });
    }

    None
}

/// Fails when the property's value equals the argument. Dispatches on
/// int, float, bool and string argument shapes.
pub fn not_equals(
    config: &dyn ConfigAccess,
    property: &str,
    arg: &Value,
) -> Option<ValidationError> {
    let equals = |value: String| ValidationError::Equals {
        property: property.to_string(),
        value,
    };

    match arg {
        Value::Int(n) => (config.get_i(property) == *n).then(|| equals(n.to_string())),
        Value::Float(n) => (config.get_f(property) == *n).then(|| equals(n.to_string())),
        Value::Bool(b) => (config.get_b(property) == *b).then(|| equals(b.to_string())),
        Value::Str(s) => (config.get_s(property) == *s).then(|| equals(s.clone())),
        _ => Some(wrong("NotEquals", property, arg)),
    }
}

fn length_limit(arg: &Value) -> Option<usize> {
    match arg {
        Value::Int(n) if *n >= 0 => Some(*n as usize),
        Value::Uint(n) => Some(*n as usize),
        _ => None,
    }
}

/// Fails when the value's visual length exceeds the argument.
pub fn len_shorter(
    config: &dyn ConfigAccess,
    property: &str,
    arg: &Value,
) -> Option<ValidationError> {
    let Some(limit) = length_limit(arg) else {
        return Some(wrong("LenShorter", property, arg));
    };

    (config.get_s(property).chars().count() > limit).then(|| ValidationError::TooLong {
        property: property.to_string(),
        limit,
    })
}

/// Fails when the value's visual length is below the argument.
pub fn len_longer(
    config: &dyn ConfigAccess,
    property: &str,
    arg: &Value,
) -> Option<ValidationError> {
    let Some(limit) = length_limit(arg) else {
        return Some(wrong("LenLonger", property, arg));
    };

    (config.get_s(property).chars().count() < limit).then(|| ValidationError::TooShort {
        property: property.to_string(),
        limit,
    })
}

/// Fails when the value's visual length differs from the argument.
pub fn len_equals(
    config: &dyn ConfigAccess,
    property: &str,
    arg: &Value,
) -> Option<ValidationError> {
    let Some(limit) = length_limit(arg) else {
        return Some(wrong("LenEquals", property, arg));
    };

    (config.get_s(property).chars().count() != limit).then(|| ValidationError::WrongLength {
        property: property.to_string(),
        limit,
    })
}

/// Fails when the value does not start with the argument. An empty
/// prefix is an input error.
pub fn has_prefix(
    config: &dyn ConfigAccess,
    property: &str,
    arg: &Value,
) -> Option<ValidationError> {
    let Value::Str(prefix) = arg else {
        return Some(wrong("HasPrefix", property, arg));
    };

    if prefix.is_empty() {
        return Some(ValidationError::EmptyArgument {
            validator: "HasPrefix",
            property: property.to_string(),
        });
    }

    (!config.get_s(property).starts_with(prefix.as_str())).then(|| ValidationError::NoPrefix {
        property: property.to_string(),
        prefix: prefix.clone(),
    })
}

/// Fails when the value does not end with the argument. An empty suffix
/// is an input error.
pub fn has_suffix(
    config: &dyn ConfigAccess,
    property: &str,
    arg: &Value,
) -> Option<ValidationError> {
    let Value::Str(suffix) = arg else {
        return Some(wrong("HasSuffix", property, arg));
    };

    if suffix.is_empty() {
        return Some(ValidationError::EmptyArgument {
            validator: "HasSuffix",
            property: property.to_string(),
        });
    }

    (!config.get_s(property).ends_with(suffix.as_str())).then(|| ValidationError::NoSuffix {
        property: property.to_string(),
        suffix: suffix.clone(),
    })
}

fn size_limit(arg: &Value) -> Option<u64> {
    match arg {
        Value::Uint64(n) => Some(*n),
        Value::Uint(n) => Some(u64::from(*n)),
        Value::Int(n) if *n >= 0 => Some(*n as u64),
        Value::Int64(n) if *n >= 0 => Some(*n as u64),
        Value::Str(s) if !s.is_empty() => Some(value::parse_size(s, 0)),
        _ => None,
    }
}

/// Fails when the byte-size-decoded value exceeds the argument.
pub fn size_less(
    config: &dyn ConfigAccess,
    property: &str,
    arg: &Value,
) -> Option<ValidationError> {
    let Some(limit) = size_limit(arg) else {
        return Some(wrong("SizeLess", property, arg));
    };

    (config.get_sz(property) > limit).then(|| ValidationError::SizeTooBig {
        property: property.to_string(),
        limit,
    })
}

/// Fails when the byte-size-decoded value is below the argument.
pub fn size_greater(
    config: &dyn ConfigAccess,
    property: &str,
    arg: &Value,
) -> Option<ValidationError> {
    let Some(limit) = size_limit(arg) else {
        return Some(wrong("SizeGreater", property, arg));
    };

    (config.get_sz(property) < limit).then(|| ValidationError::SizeTooSmall {
        property: property.to_string(),
        limit,
    })
}

/// Fails when the calendar-duration-decoded value exceeds the argument.
/// An unset property is a no-op success.
pub fn dur_shorter(
    config: &dyn ConfigAccess,
    property: &str,
    arg: &Value,
) -> Option<ValidationError> {
    let Value::Dur(limit) = arg else {
        return Some(wrong("DurShorter", property, arg));
    };

    if config.get_s(property).is_empty() {
        return None;
    }

    (config.get_td(property) > *limit).then(|| ValidationError::DurationTooLong {
        property: property.to_string(),
        limit: *limit,
    })
}

/// Fails when the calendar-duration-decoded value is below the argument.
/// An unset property is a no-op success.
pub fn dur_longer(
    config: &dyn ConfigAccess,
    property: &str,
    arg: &Value,
) -> Option<ValidationError> {
    let Value::Dur(limit) = arg else {
        return Some(wrong("DurLonger", property, arg));
    };

    if config.get_s(property).is_empty() {
        return None;
    }

    (config.get_td(property) < *limit).then(|| ValidationError::DurationTooShort {
        property: property.to_string(),
        limit: *limit,
    })
}

/// Fails when the value is not a recognised boolean surface form. Unset
/// is always type-compatible.
pub fn type_bool(
    config: &dyn ConfigAccess,
    property: &str,
    _arg: &Value,
) -> Option<ValidationError> {
    let current = config.get_s(property).to_lowercase();

    match current.as_str() {
        "" | "0" | "1" | "true" | "false" | "yes" | "no" => None,
        _ => Some(ValidationError::NotBool {
            property: property.to_string(),
        }),
    }
}

/// Fails when the value is not an integer (decimal, or hexadecimal with a
/// `0x` prefix). Unset is always type-compatible.
pub fn type_num(
    config: &dyn ConfigAccess,
    property: &str,
    _arg: &Value,
) -> Option<ValidationError> {
    let current = config.get_s(property);

    if current.is_empty() || is_integer(&current) {
        return None;
    }

    Some(ValidationError::NotNum {
        property: property.to_string(),
    })
}

/// Fails when the value is not a decimal floating point number. Unset is
/// always type-compatible.
pub fn type_float(
    config: &dyn ConfigAccess,
    property: &str,
    _arg: &Value,
) -> Option<ValidationError> {
    let current = config.get_s(property);

    if current.is_empty() || current.parse::<f64>().is_ok() {
        return None;
    }

    Some(ValidationError::NotFloat {
        property: property.to_string(),
    })
}

/// Fails when the value is not a byte size (numeric prefix plus optional
/// unit suffix). Unset is always type-compatible.
pub fn type_size(
    config: &dyn ConfigAccess,
    property: &str,
    _arg: &Value,
) -> Option<ValidationError> {
    let current = config.get_s(property);

    if current.is_empty() || is_size(&current) {
        return None;
    }

    Some(ValidationError::NotSize {
        property: property.to_string(),
    })
}

/// Fails when the value is not a calendar duration (decimal integer plus
/// a `s|m|h|d|w` suffix). Unset is always type-compatible.
pub fn type_dur(
    config: &dyn ConfigAccess,
    property: &str,
    _arg: &Value,
) -> Option<ValidationError> {
    let current = config.get_s(property);

    if current.is_empty() || is_time_duration(&current) {
        return None;
    }

    Some(ValidationError::NotDur {
        property: property.to_string(),
    })
}

fn is_integer(raw: &str) -> bool {
    let body = raw.strip_prefix('-').unwrap_or(raw);

    match body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        Some(hex) => !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => !body.is_empty() && body.chars().all(|c| c.is_ascii_digit()),
    }
}

fn is_size(raw: &str) -> bool {
    let trimmed = raw.trim();
    let split = trimmed
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(trimmed.len());
    let (number, suffix) = trimmed.split_at(split);

    let known_suffix = matches!(
        suffix.trim().to_lowercase().as_str(),
        "" | "b" | "k" | "kb" | "m" | "mb" | "g" | "gb" | "t" | "tb"
    );

    known_suffix && number.trim().parse::<f64>().is_ok()
}

fn is_time_duration(raw: &str) -> bool {
    let Some(last) = raw.chars().last() else {
        return false;
    };

    if !matches!(last.to_ascii_lowercase(), 's' | 'm' | 'h' | 'd' | 'w') {
        return false;
    }

    let prefix = &raw[..raw.len() - last.len_utf8()];

    !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_digit())
}
