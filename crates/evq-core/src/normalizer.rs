//! Normalizer — resolves raw event records into [`NormalizedEvent`] values.
//!
//! Every canonical field has a static alias table: an ordered list of field
//! paths tried first-match-wins. Text fields take the first *truthy* candidate
//! (empty strings and zeros fall through to the next alias); numeric fields
//! take the first *present* candidate and parse it, so a present-but-invalid
//! price does not fall back to the next alias.
//!
//! Normalization never fails. Anything missing or mistyped degrades to an
//! empty string or `None`.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::types::{EventSpan, NormalizedEvent, RawEvent};

// ---------------------------------------------------------------------------
// Alias tables
// ---------------------------------------------------------------------------

/// Where a candidate value lives in a raw record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPath {
    /// A top-level key.
    Top(&'static str),
    /// A key of the nested `venue` object.
    Venue(&'static str),
}

use FieldPath::{Top, Venue};

pub const TITLE: &[FieldPath] = &[Top("title"), Top("name")];
pub const DESCRIPTION: &[FieldPath] = &[Top("desc"), Top("description")];
pub const KIND: &[FieldPath] = &[Top("type"), Top("category")];
pub const START: &[FieldPath] = &[Top("start_at"), Top("start"), Top("date")];
pub const END: &[FieldPath] = &[Top("end_at"), Top("end")];
pub const URL: &[FieldPath] = &[Top("url"), Top("link")];
pub const PRICE_MIN: &[FieldPath] = &[Top("price_min"), Top("priceMin"), Top("price")];
pub const PRICE_MAX: &[FieldPath] = &[Top("price_max"), Top("priceMax"), Top("price")];
pub const VENUE_NAME: &[FieldPath] = &[Venue("name"), Top("venue_name")];
pub const DISTRICT: &[FieldPath] = &[Venue("district"), Venue("area"), Top("district")];
pub const LAT: &[FieldPath] = &[Venue("lat"), Venue("latitude"), Top("lat"), Top("latitude")];
pub const LNG: &[FieldPath] = &[
    Venue("lng"),
    Venue("longitude"),
    Top("lng"),
    Top("longitude"),
];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the canonical projection of one raw record.
pub fn normalize(raw: RawEvent) -> NormalizedEvent {
    let title = first_text(&raw, TITLE);
    let description = first_text(&raw, DESCRIPTION);
    let kind = first_text(&raw, KIND);
    let start = first_text(&raw, START);
    let end = first_text(&raw, END);
    let url = first_text(&raw, URL);
    let venue_name = first_text(&raw, VENUE_NAME);
    let district = first_text(&raw, DISTRICT);

    let price_min = first_number(&raw, PRICE_MIN);
    let price_max = first_number(&raw, PRICE_MAX);
    let lat = first_number(&raw, LAT);
    let lng = first_number(&raw, LNG);

    let search_blob = search_blob(&[
        &title,
        &description,
        &kind,
        &venue_name,
        &district,
        &start,
        &end,
        &url,
    ]);
    let span = EventSpan::from_fields(&start, &end);

    NormalizedEvent {
        raw,
        title,
        description,
        kind,
        start,
        end,
        url,
        price_min,
        price_max,
        venue_name,
        district,
        lat,
        lng,
        search_blob,
        span,
    }
}

/// Normalize a whole batch, preserving order.
pub fn normalize_all(batch: Vec<RawEvent>) -> Vec<NormalizedEvent> {
    batch.into_iter().map(normalize).collect()
}

/// Join the non-empty parts with single spaces and lowercase the result.
pub fn search_blob(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

// ---------------------------------------------------------------------------
// Resolution helpers
// ---------------------------------------------------------------------------

fn lookup<'a>(raw: &'a Value, path: FieldPath) -> Option<&'a Value> {
    match path {
        Top(key) => raw.get(key),
        Venue(key) => raw
            .get("venue")
            .filter(|venue| venue.is_object())
            .and_then(|venue| venue.get(key)),
    }
}

/// First candidate with a truthy textual value, or an empty string.
pub fn first_text(raw: &Value, paths: &[FieldPath]) -> String {
    paths
        .iter()
        .filter_map(|path| lookup(raw, *path))
        .find_map(truthy_text)
        .unwrap_or_default()
}

/// First non-null candidate, parsed as a finite float.
pub fn first_number(raw: &Value, paths: &[FieldPath]) -> Option<f64> {
    paths
        .iter()
        .find_map(|path| lookup(raw, *path).filter(|v| !v.is_null()))
        .and_then(number_value)
}

fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => n
            .as_f64()
            .filter(|f| *f != 0.0 && f.is_finite())
            .map(|f| number_text(n, f)),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Integers print without a fraction (`3.0` is `"3"`); other floats print in
/// their shortest round-trip form.
fn number_text(n: &serde_json::Number, f: f64) -> String {
    match (n.as_i64(), n.as_u64()) {
        (Some(i), _) => i.to_string(),
        (_, Some(u)) => u.to_string(),
        _ => f.to_string(),
    }
}

fn number_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => parse_float_prefix(s),
        _ => None,
    }
}

/// Leading decimal literal: optional sign, mantissa with at least one digit,
/// optional exponent. Anything after it is ignored.
static FLOAT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
        .expect("Invalid regex")
});

/// Parse the longest leading decimal literal of `input`, ignoring leading
/// whitespace and any trailing text (`"50 TWD"` is 50). Non-finite results
/// are rejected.
pub fn parse_float_prefix(input: &str) -> Option<f64> {
    let literal = FLOAT_PREFIX.captures(input)?.get(1)?;
    literal.as_str().parse::<f64>().ok().filter(|n| n.is_finite())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("50", Some(50.0))]
    #[case("  12.5", Some(12.5))]
    #[case("50 TWD", Some(50.0))]
    #[case("-3e2x", Some(-300.0))]
    #[case(".5", Some(0.5))]
    #[case("7.", Some(7.0))]
    #[case("1e", Some(1.0))]
    #[case("0", Some(0.0))]
    #[case("+4.5kg", Some(4.5))]
    #[case("1.5e+2 NTD", Some(150.0))]
    #[case("free", None)]
    #[case("", None)]
    #[case(".", None)]
    #[case("-", None)]
    #[case("Infinity", None)]
    #[case("1e999", None)]
    fn float_prefix(#[case] input: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_float_prefix(input), expected);
    }

    #[test]
    fn title_prefers_title_over_name() {
        let ev = normalize(json!({ "title": "Jazz Night", "name": "Other" }));
        assert_eq!(ev.title, "Jazz Night");
        let ev = normalize(json!({ "name": "Only Name" }));
        assert_eq!(ev.title, "Only Name");
    }

    #[test]
    fn empty_text_falls_through_to_next_alias() {
        let ev = normalize(json!({ "title": "", "name": "Fallback" }));
        assert_eq!(ev.title, "Fallback");
    }

    #[test]
    fn numeric_text_fields_are_rendered() {
        let ev = normalize(json!({ "title": 2024, "type": 0, "category": "music" }));
        assert_eq!(ev.title, "2024");
        assert_eq!(ev.kind, "music");
    }

    #[rstest]
    #[case(json!({ "title": 3.0 }), "3")]
    #[case(json!({ "title": 2.50 }), "2.5")]
    #[case(json!({ "title": -7 }), "-7")]
    #[case(json!({ "title": 0.0, "name": "Zero falls through" }), "Zero falls through")]
    fn numeric_titles_render_like_text(#[case] raw: Value, #[case] expected: &str) {
        assert_eq!(normalize(raw).title, expected);
    }

    #[test]
    fn structured_title_falls_through() {
        let ev = normalize(json!({ "title": { "zh": "爵士" }, "name": "Jazz" }));
        assert_eq!(ev.title, "Jazz");
    }

    #[test]
    fn bare_price_is_both_bounds() {
        let ev = normalize(json!({ "price": "300" }));
        assert_eq!((ev.price_min, ev.price_max), (Some(300.0), Some(300.0)));
    }

    #[test]
    fn present_invalid_price_does_not_fall_back() {
        let ev = normalize(json!({ "price_min": "ask", "price": 0 }));
        assert_eq!(ev.price_min, None);
        assert_eq!(ev.price_max, Some(0.0));
    }

    #[test]
    fn null_price_falls_back() {
        let ev = normalize(json!({ "price_min": null, "priceMin": 20 }));
        assert_eq!(ev.price_min, Some(20.0));
    }

    #[test]
    fn venue_object_beats_flat_fields() {
        let ev = normalize(json!({
            "venue": { "name": "Legacy", "area": "Zhongshan", "latitude": "25.05", "lng": 121.5 },
            "venue_name": "Flat",
            "district": "Da'an",
            "lat": 1.0,
        }));
        assert_eq!(ev.venue_name, "Legacy");
        assert_eq!(ev.district, "Zhongshan");
        assert_eq!(ev.lat, Some(25.05));
        assert_eq!(ev.lng, Some(121.5));
    }

    #[test]
    fn non_object_venue_is_ignored() {
        let ev = normalize(json!({ "venue": "Legacy", "venue_name": "Flat", "latitude": 25 }));
        assert_eq!(ev.venue_name, "Flat");
        assert_eq!(ev.lat, Some(25.0));
    }

    #[test]
    fn non_object_record_degrades_to_empty() {
        let ev = normalize(json!("just a string"));
        assert_eq!(ev.title, "");
        assert_eq!(ev.search_blob, "");
        assert_eq!(ev.price_min, None);
    }

    #[test]
    fn search_blob_skips_empty_and_lowercases() {
        let ev = normalize(json!({
            "name": "Jazz Night",
            "category": "Music",
            "date": "2024-05-10",
            "link": "https://Example.com/E",
        }));
        assert_eq!(ev.search_blob, "jazz night music 2024-05-10 https://example.com/e");
    }
}
