//! Test builders — ergonomic constructors for raw records, stores and queries.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use evq_core::{EventPage, EventStore, QueryParams};
use serde_json::{json, Map, Value};

// ---------------------------------------------------------------------------
// EventBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for raw event records.
///
/// # Example
///
/// ```rust
/// let raw = EventBuilder::new("Jazz Night")
///     .kind("music")
///     .dates("2024-06-03", "2024-06-05")
///     .price_range(0, 500)
///     .build();
/// ```
pub struct EventBuilder {
    fields: Map<String, Value>,
}

impl EventBuilder {
    pub fn new(title: &str) -> Self {
        Self::untitled().field("title", title)
    }

    pub fn untitled() -> Self {
        Self { fields: Map::new() }
    }

    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn kind(self, kind: &str) -> Self {
        self.field("type", kind)
    }

    pub fn district(self, district: &str) -> Self {
        self.field("district", district)
    }

    pub fn start(self, start: &str) -> Self {
        self.field("start", start)
    }

    pub fn end(self, end: &str) -> Self {
        self.field("end", end)
    }

    pub fn dates(self, start: &str, end: &str) -> Self {
        self.start(start).end(end)
    }

    pub fn price(self, price: impl Into<Value>) -> Self {
        self.field("price", price)
    }

    pub fn price_range(self, min: impl Into<Value>, max: impl Into<Value>) -> Self {
        self.field("price_min", min).field("price_max", max)
    }

    pub fn venue(self, name: &str, district: &str) -> Self {
        self.field("venue", json!({ "name": name, "district": district }))
    }

    pub fn build(self) -> Value {
        Value::Object(self.fields)
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Build [`QueryParams`] from `(key, value)` pairs using the wire names
/// (`freeOnly`, `dateFrom`, …), exactly as the HTTP layer would.
pub fn params(pairs: &[(&str, &str)]) -> QueryParams {
    let object: Map<String, Value> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect();
    serde_json::from_value(Value::Object(object)).expect("query params must deserialize")
}

/// Build a store holding `records` as its first generation.
pub fn store_of(records: Vec<Value>) -> EventStore {
    EventStore::with_events(records)
}

/// Run `pairs` against `store`.
pub fn run(store: &EventStore, pairs: &[(&str, &str)]) -> EventPage {
    store.query(&params(pairs))
}

/// Titles of the records in a page, resolved the same way the normalizer
/// resolves them (`title`, then `name`).
pub fn titles(page: &EventPage) -> Vec<String> {
    page.results
        .iter()
        .map(|raw| evq_core::normalize(raw.clone()).title)
        .collect()
}
