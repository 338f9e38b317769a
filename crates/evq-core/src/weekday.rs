//! Weekday resolution for the `weekday` query parameter.
//!
//! Accepts either a day number (`0` = Sunday … `6` = Saturday) or a
//! Traditional Chinese day name such as `三`, `週三`, `星期日` or `禮拜天`.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

/// Day-name prefixes stripped before the final glyph is looked up.
const PREFIXES: &[&str] = &["星期", "週", "禮拜"];

static WEEKDAY_GLYPHS: phf::Map<char, u8> = phf::phf_map! {
    '日' => 0,
    '天' => 0,
    '一' => 1,
    '二' => 2,
    '三' => 3,
    '四' => 4,
    '五' => 5,
    '六' => 6,
};

/// A whole-string decimal literal, optionally signed, with optional exponent.
static DECIMAL_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$").expect("Invalid regex")
});

/// An unsigned hex, octal or binary literal (`0x1f`, `0o17`, `0b101`).
static RADIX_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^0(?:[xX](?P<hex>[0-9a-fA-F]+)|[oO](?P<oct>[0-7]+)|[bB](?P<bin>[01]+))$")
        .expect("Invalid regex")
});

/// Numeric reading of a parameter: surrounding whitespace is ignored and a
/// blank string reads as zero.
fn numeric_value(input: &str) -> Option<f64> {
    let s = input.trim();
    if s.is_empty() {
        return Some(0.0);
    }
    if let Some(caps) = RADIX_LITERAL.captures(s) {
        let (digits, radix) = match (caps.name("hex"), caps.name("oct"), caps.name("bin")) {
            (Some(d), _, _) => (d, 16),
            (_, Some(d), _) => (d, 8),
            (_, _, Some(d)) => (d, 2),
            _ => return None,
        };
        return u64::from_str_radix(digits.as_str(), radix).ok().map(|n| n as f64);
    }
    if DECIMAL_LITERAL.is_match(s) {
        return s.parse::<f64>().ok();
    }
    None
}

/// Resolve a weekday parameter to `0..=6`, or `None` when it is empty or
/// unrecognized (meaning "no weekday filter").
///
/// A non-empty but blank value reads as `0`, Sunday.
pub fn parse_weekday(input: &str) -> Option<u8> {
    if input.is_empty() {
        return None;
    }

    if let Some(n) = numeric_value(input) {
        if n.fract() == 0.0 && (0.0..=6.0).contains(&n) {
            return Some(n as u8);
        }
    }

    let stripped = PREFIXES
        .iter()
        .fold(input.trim().to_string(), |acc, prefix| acc.replace(prefix, ""));
    stripped
        .chars()
        .last()
        .and_then(|glyph| WEEKDAY_GLYPHS.get(&glyph).copied())
}

/// Weekday number of a date, Sunday = 0.
pub fn weekday_of(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Whether any day in `first..=last` falls on `weekday`. When `last` precedes
/// `first` only `first` itself is tested.
pub fn range_hits_weekday(first: NaiveDate, last: NaiveDate, weekday: u8) -> bool {
    let span = (last - first).num_days();
    if span < 0 {
        return weekday_of(first) == weekday;
    }
    if span >= 6 {
        return true;
    }
    let ahead = (i64::from(weekday) - i64::from(weekday_of(first))).rem_euclid(7);
    ahead <= span
}
