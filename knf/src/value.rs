//! # Value Decoders
//!
//! Pure decoders from raw property strings into typed values.
//!
//! Every decoder follows the same contract: an empty string yields the
//! caller-supplied default, while a non-empty but malformed string yields
//! the type zero. The default is only honoured for "missing", never for
//! "malformed" — callers that want stricter handling should pair a getter
//! with a type-shape validator.

use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Highest value a file mode can carry (`07777` octal).
const MODE_MAX: u32 = 0o7777;

/// Unit multiplier for fixed-unit duration decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
}

impl DurationUnit {
    /// Number of seconds in one unit.
    #[must_use]
    pub fn secs(self) -> u64 {
        match self {
            DurationUnit::Second => 1,
            DurationUnit::Minute => 60,
            DurationUnit::Hour => 3_600,
            DurationUnit::Day => 86_400,
            DurationUnit::Week => 604_800,
        }
    }
}

/// Decodes a signed 32-bit integer. A `0x` prefix (after the optional
/// sign) switches to hexadecimal.
#[must_use]
pub fn parse_int(raw: &str, default: i32) -> i32 {
    if raw.is_empty() {
        return default;
    }

    let (negative, body) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };

    let parsed = match strip_hex_prefix(body) {
        Some(hex) => i32::from_str_radix(hex, 16),
        None => body.parse::<i32>(),
    };

    match parsed {
        Ok(v) if negative => -v,
        Ok(v) => v,
        Err(_) => 0,
    }
}

/// Decodes a signed 64-bit integer with the same rules as [`parse_int`].
#[must_use]
pub fn parse_int64(raw: &str, default: i64) -> i64 {
    if raw.is_empty() {
        return default;
    }

    let (negative, body) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };

    let parsed = match strip_hex_prefix(body) {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => body.parse::<i64>(),
    };

    match parsed {
        Ok(v) if negative => -v,
        Ok(v) => v,
        Err(_) => 0,
    }
}

/// Decodes an unsigned 32-bit integer. A leading sign is a parse failure.
#[must_use]
pub fn parse_uint(raw: &str, default: u32) -> u32 {
    if raw.is_empty() {
        return default;
    }

    let parsed = match strip_hex_prefix(raw) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => raw.parse::<u32>(),
    };

    parsed.unwrap_or(0)
}

/// Decodes an unsigned 64-bit integer with the same rules as [`parse_uint`].
#[must_use]
pub fn parse_uint64(raw: &str, default: u64) -> u64 {
    if raw.is_empty() {
        return default;
    }

    let parsed = match strip_hex_prefix(raw) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => raw.parse::<u64>(),
    };

    parsed.unwrap_or(0)
}

/// Decodes a decimal floating point value.
#[must_use]
pub fn parse_float(raw: &str, default: f64) -> f64 {
    if raw.is_empty() {
        return default;
    }

    raw.parse::<f64>().unwrap_or(0.0)
}

/// Decodes a boolean. `"0"`, `"false"` and `"no"` (case-insensitive) are
/// false; every other non-empty string is true.
#[must_use]
pub fn parse_bool(raw: &str, default: bool) -> bool {
    if raw.is_empty() {
        return default;
    }

    !matches!(raw.to_lowercase().as_str(), "0" | "false" | "no")
}

/// Decodes a file mode: base-8 unsigned in `[0, 0o7777]`.
#[must_use]
pub fn parse_mode(raw: &str, default: u32) -> u32 {
    if raw.is_empty() {
        return default;
    }

    match u32::from_str_radix(raw, 8) {
        Ok(v) if v <= MODE_MAX => v,
        _ => 0,
    }
}

/// Decodes a fixed-unit duration: a decimal integer multiplied by the
/// given unit, so `"24"` with [`DurationUnit::Second`] is 24 seconds.
///
/// A parse failure yields a zero duration while an empty string honours
/// the default — this asymmetry is intentional: defaults cover "missing",
/// not "malformed".
#[must_use]
pub fn parse_duration(raw: &str, unit: DurationUnit, default: Duration) -> Duration {
    if raw.is_empty() {
        return default;
    }

    match raw.parse::<u64>() {
        Ok(v) => Duration::from_secs(v.saturating_mul(unit.secs())),
        Err(_) => Duration::ZERO,
    }
}

/// Decodes a calendar duration: a decimal integer followed by a unit
/// letter (`s`, `m`, `h`, `d` or `w`, case-insensitive). The suffix is
/// required; anything else decodes to zero.
#[must_use]
pub fn parse_time_duration(raw: &str, default: Duration) -> Duration {
    if raw.is_empty() {
        return default;
    }

    let Some(last) = raw.chars().last() else {
        return Duration::ZERO;
    };

    let mult = match last.to_ascii_lowercase() {
        's' => 1,
        'm' => 60,
        'h' => 3_600,
        'd' => 86_400,
        'w' => 604_800,
        _ => return Duration::ZERO,
    };

    let prefix = &raw[..raw.len() - last.len_utf8()];

    match prefix.parse::<u64>() {
        Ok(v) => Duration::from_secs(v.saturating_mul(mult)),
        Err(_) => Duration::ZERO,
    }
}

/// Decodes a byte size: a numeric prefix (fractions allowed) with an
/// optional suffix. Decimal suffixes (`k`, `m`, `g`, `t`) use powers of
/// 1000; binary suffixes (`kb`, `mb`, `gb`, `tb`) use powers of 1024.
/// The result is truncated to an unsigned 64-bit integer.
#[must_use]
pub fn parse_size(raw: &str, default: u64) -> u64 {
    if raw.is_empty() {
        return default;
    }

    let trimmed = raw.trim();
    let split = trimmed
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(trimmed.len());
    let (number, suffix) = trimmed.split_at(split);

    let mult: u64 = match suffix.trim().to_lowercase().as_str() {
        "" | "b" => 1,
        "k" => 1000,
        "kb" => 1024,
        "m" => 1000_u64.pow(2),
        "mb" => 1024_u64.pow(2),
        "g" => 1000_u64.pow(3),
        "gb" => 1024_u64.pow(3),
        "t" => 1000_u64.pow(4),
        "tb" => 1024_u64.pow(4),
        _ => return 0,
    };

    match number.trim().parse::<f64>() {
        Ok(v) => (v * mult as f64) as u64,
        Err(_) => 0,
    }
}

/// Decodes a Unix-seconds timestamp.
#[must_use]
pub fn parse_timestamp(raw: &str, default: DateTime<Utc>) -> DateTime<Utc> {
    if raw.is_empty() {
        return default;
    }

    raw.parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// Resolves an IANA location name through the bundled zone database.
#[must_use]
pub fn parse_timezone(raw: &str, default: Option<Tz>) -> Option<Tz> {
    if raw.is_empty() {
        return default;
    }

    raw.parse::<Tz>().ok()
}

/// Decodes a comma-separated list, trimming surrounding spaces from each
/// element.
#[must_use]
pub fn parse_list(raw: &str, default: &[String]) -> Vec<String> {
    if raw.is_empty() {
        return default.to_vec();
    }

    raw.split(',').map(|item| item.trim().to_string()).collect()
}

fn strip_hex_prefix(body: &str) -> Option<&str> {
    body.strip_prefix("0x").or_else(|| body.strip_prefix("0X"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("42", 0), 42);
        assert_eq!(parse_int("-42", 0), -42);
        assert_eq!(parse_int("0x1F", 0), 31);
        assert_eq!(parse_int("-0x1f", 0), -31);
        assert_eq!(parse_int("", 7), 7);
        assert_eq!(parse_int("abc", 7), 0);
        assert_eq!(parse_int("12.5", 7), 0);
    }

    #[test]
    fn test_parse_int64() {
        assert_eq!(parse_int64("9000000000", 0), 9_000_000_000);
        assert_eq!(parse_int64("-9000000000", 0), -9_000_000_000);
        assert_eq!(parse_int64("0xFF", 0), 255);
        assert_eq!(parse_int64("", -1), -1);
        assert_eq!(parse_int64("nope", -1), 0);
    }

    #[test]
    fn test_parse_uint() {
        assert_eq!(parse_uint("42", 0), 42);
        assert_eq!(parse_uint("0x10", 0), 16);
        assert_eq!(parse_uint("-1", 9), 0);
        assert_eq!(parse_uint("", 9), 9);
    }

    #[test]
    fn test_parse_uint64() {
        assert_eq!(parse_uint64("18000000000", 0), 18_000_000_000);
        assert_eq!(parse_uint64("0xff", 0), 255);
        assert_eq!(parse_uint64("", 3), 3);
        assert_eq!(parse_uint64("x", 3), 0);
    }

    #[test]
    fn test_parse_float() {
        assert_eq!(parse_float("12.5", 0.0), 12.5);
        assert_eq!(parse_float("-0.25", 0.0), -0.25);
        assert_eq!(parse_float("", 1.5), 1.5);
        assert_eq!(parse_float("abc", 1.5), 0.0);
    }

    #[test]
    fn test_parse_bool() {
        for falsy in ["0", "false", "FALSE", "no", "No"] {
            assert!(!parse_bool(falsy, true), "{falsy} must be false");
        }
        for truthy in ["1", "true", "yes", "enabled", "anything"] {
            assert!(parse_bool(truthy, false), "{truthy} must be true");
        }
        assert!(parse_bool("", true));
        assert!(!parse_bool("", false));
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode("644", 0), 0o644);
        assert_eq!(parse_mode("7777", 0), 0o7777);
        assert_eq!(parse_mode("10000", 0), 0);
        assert_eq!(parse_mode("abc", 0), 0);
        assert_eq!(parse_mode("", 0o600), 0o600);
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(
            parse_duration("24", DurationUnit::Second, Duration::ZERO),
            Duration::from_secs(24)
        );
        assert_eq!(
            parse_duration("2", DurationUnit::Hour, Duration::ZERO),
            Duration::from_secs(7_200)
        );
        assert_eq!(
            parse_duration("", DurationUnit::Minute, Duration::from_secs(60)),
            Duration::from_secs(60)
        );
        // malformed input yields zero, not the default
        assert_eq!(
            parse_duration("x", DurationUnit::Minute, Duration::from_secs(60)),
            Duration::ZERO
        );
    }

    #[test]
    fn test_parse_time_duration() {
        assert_eq!(
            parse_time_duration("30s", Duration::ZERO),
            Duration::from_secs(30)
        );
        assert_eq!(
            parse_time_duration("5M", Duration::ZERO),
            Duration::from_secs(300)
        );
        assert_eq!(
            parse_time_duration("2h", Duration::ZERO),
            Duration::from_secs(7_200)
        );
        assert_eq!(
            parse_time_duration("1d", Duration::ZERO),
            Duration::from_secs(86_400)
        );
        assert_eq!(
            parse_time_duration("2w", Duration::ZERO),
            Duration::from_secs(1_209_600)
        );
        // the unit suffix is required
        assert_eq!(parse_time_duration("30", Duration::ZERO), Duration::ZERO);
        assert_eq!(parse_time_duration("s", Duration::ZERO), Duration::ZERO);
        assert_eq!(parse_time_duration("3x", Duration::ZERO), Duration::ZERO);
        assert_eq!(
            parse_time_duration("", Duration::from_secs(9)),
            Duration::from_secs(9)
        );
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("512", 0), 512);
        assert_eq!(parse_size("512b", 0), 512);
        assert_eq!(parse_size("1k", 0), 1000);
        assert_eq!(parse_size("1kb", 0), 1024);
        assert_eq!(parse_size("5M", 0), 5_000_000);
        assert_eq!(parse_size("5MB", 0), 5 * 1024 * 1024);
        assert_eq!(parse_size("2g", 0), 2_000_000_000);
        assert_eq!(parse_size("2gb", 0), 2 * 1024 * 1024 * 1024);
        assert_eq!(parse_size("1t", 0), 1_000_000_000_000);
        assert_eq!(parse_size("1tb", 0), 1_099_511_627_776);
        assert_eq!(parse_size("1.5kb", 0), 1536);
        assert_eq!(parse_size(" 2 mb ", 0), 2 * 1024 * 1024);
        assert_eq!(parse_size("", 42), 42);
        assert_eq!(parse_size("10x", 42), 0);
        assert_eq!(parse_size("abc", 42), 0);
    }

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp("1709629048", DateTime::UNIX_EPOCH);
        assert_eq!(ts.timestamp(), 1_709_629_048);
        assert_eq!(
            parse_timestamp("", ts).timestamp(),
            1_709_629_048,
            "empty input honours the default"
        );
        assert_eq!(
            parse_timestamp("bad", ts),
            DateTime::UNIX_EPOCH,
            "malformed input yields the epoch"
        );
    }

    #[test]
    fn test_parse_timezone() {
        let zone = parse_timezone("Europe/Vienna", None);
        assert_eq!(zone.map(|z| z.name()), Some("Europe/Vienna"));
        assert_eq!(parse_timezone("Nowhere/Nothing", None), None);
        assert_eq!(
            parse_timezone("", Some(chrono_tz::UTC)),
            Some(chrono_tz::UTC)
        );
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(
            parse_list("a, b , c", &[]),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
        assert_eq!(parse_list("solo", &[]), vec!["solo".to_string()]);
        let def = vec!["x".to_string()];
        assert_eq!(parse_list("", &def), def);
        assert!(parse_list("", &[]).is_empty());
    }
}
