//! Core types for evq-core.
//!
//! This module defines the data structures shared across the layers: the
//! canonical [`NormalizedEvent`] produced by the normalizer, the parsed
//! [`EventSpan`] cached on it, and the [`EventPage`] / [`MetaListing`]
//! shapes returned to callers.

use chrono::NaiveDateTime;
use serde::Serialize;

/// A raw event record as it appears in the backing document. No shape is
/// assumed; the normalizer reads whatever it can out of it.
pub type RawEvent = serde_json::Value;

/// The canonical, fully-resolved projection of a [`RawEvent`].
///
/// Built once per record by [`normalize`](crate::normalizer::normalize) and
/// never mutated afterwards. Callers only ever see `raw`; every other field
/// exists to answer queries.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedEvent {
    /// The record exactly as loaded, returned verbatim in query results.
    pub raw: RawEvent,
    pub title: String,
    pub description: String,
    /// Category of the event (`type` / `category` in the document).
    pub kind: String,
    /// ISO-like start timestamp, or empty.
    pub start: String,
    /// ISO-like end timestamp, or empty.
    pub end: String,
    pub url: String,
    /// `None` means the price is unknown, which is never the same as free.
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub venue_name: String,
    pub district: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Lowercased, space-joined text of the searchable fields.
    pub search_blob: String,
    /// Parsed form of `start` / `end`.
    pub span: EventSpan,
}

/// One endpoint of an event interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// The field was empty.
    Missing,
    /// The field held text that is not a recognizable timestamp.
    Unparsed,
    At(NaiveDateTime),
}

impl Endpoint {
    pub fn is_present(&self) -> bool {
        !matches!(self, Endpoint::Missing)
    }

    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Endpoint::At(ts) => Some(*ts),
            _ => None,
        }
    }
}

/// The `[start, end]` endpoints of an event, parsed once at normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventSpan {
    pub start: Endpoint,
    pub end: Endpoint,
}

impl EventSpan {
    pub fn from_fields(start: &str, end: &str) -> Self {
        Self {
            start: crate::dates::endpoint(start),
            end: crate::dates::endpoint(end),
        }
    }

    /// The effective interval: when only one endpoint is present the event is
    /// treated as a zero-width interval at that endpoint. `None` when neither
    /// endpoint is present.
    pub fn effective(&self) -> Option<(Endpoint, Endpoint)> {
        match (self.start.is_present(), self.end.is_present()) {
            (false, false) => None,
            (true, false) => Some((self.start, self.start)),
            (false, true) => Some((self.end, self.end)),
            (true, true) => Some((self.start, self.end)),
        }
    }
}

/// One page of `/events` results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventPage {
    /// Size of the filtered set before pagination.
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
    pub results: Vec<RawEvent>,
}

/// Distinct `type` and `district` values across the working set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetaListing {
    pub types: Vec<String>,
    pub districts: Vec<String>,
}
