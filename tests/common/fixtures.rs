//! Static event corpora used across harnesses.
//!
//! The corpus deliberately mixes every alias the normalizer understands:
//! `title`/`name`, `type`/`category`, `start_at`/`start`/`date`, nested and
//! flattened venues, single prices and min/max pairs.

use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// Six Taipei events. 2024-06-03 is a Monday.
pub fn corpus() -> Vec<Value> {
    vec![
        json!({
            "title": "Jazz Night Market",
            "desc": "jazz festival night market",
            "type": "music",
            "start_at": "2024-06-03T19:00",
            "end_at": "2024-06-05T22:00",
            "price_min": 0,
            "price_max": 500,
            "venue": {
                "name": "Huashan 1914",
                "district": "Zhongzheng",
                "lat": 25.044,
                "lng": 121.529
            }
        }),
        json!({
            "name": "Solo Jazz",
            "description": "an evening of jazz piano",
            "category": "music",
            "start": "2024-06-07T20:00",
            "price": 800,
            "venue_name": "Blue Note",
            "district": "Da'an"
        }),
        json!({
            "title": "Night Photography Walk",
            "type": "workshop",
            "date": "2024-06-09",
            "price": "0",
            "district": "Wanhua",
            "link": "https://example.com/walk"
        }),
        json!({
            "title": "Museum Open Day",
            "type": "exhibition",
            "start": "2024-05-10",
            "end": "2024-05-12",
            "price_min": null,
            "venue": { "name": "National Palace Museum", "area": "Shilin" }
        }),
        json!({
            "title": "Mystery Meetup",
            "type": "meetup",
            "district": "Xinyi"
        }),
        json!({
            "title": "Summer Art Fair",
            "type": "exhibition",
            "start_at": "2024-07-01",
            "end_at": "2024-08-31",
            "priceMin": "100",
            "priceMax": "300",
            "venue": { "name": "Songshan Cultural Park", "district": "Xinyi" }
        }),
    ]
}

/// Titles of [`corpus`] in document order.
pub const CORPUS_TITLES: &[&str] = &[
    "Jazz Night Market",
    "Solo Jazz",
    "Night Photography Walk",
    "Museum Open Day",
    "Mystery Meetup",
    "Summer Art Fair",
];

/// `n` numbered events, all matching the query "event".
pub fn numbered(prefix: &str, n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| json!({ "title": format!("{prefix} event {i}"), "type": "bulk" }))
        .collect()
}

/// Write `records` as a JSON document named `events.json` inside `dir`.
pub fn write_document(dir: &Path, records: &[Value]) -> PathBuf {
    let path = dir.join("events.json");
    std::fs::write(&path, serde_json::to_string_pretty(records).unwrap()).unwrap();
    path
}
