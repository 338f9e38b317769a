//! Query engine — answers `/events` requests over a working set.
//!
//! A request arrives as a flat map of strings ([`QueryParams`]). It is
//! compiled once into an [`EventFilter`] plus a [`Pagination`], then every
//! event is tested against the active predicates in order:
//!
//! 1. type (exact)
//! 2. district (exact)
//! 3. free-only
//! 4. text search (every word a substring of the search blob)
//! 5. date-range overlap
//! 6. weekday of occurrence
//!
//! Filtering never reorders. Malformed parameters never fail the query; they
//! fall back to their defaults.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::Deserialize;

use crate::dates::parse_timestamp;
use crate::types::{EventPage, EventSpan, NormalizedEvent};
use crate::weekday::{parse_weekday, range_hits_weekday, weekday_of};

pub const DEFAULT_LIMIT: usize = 200;
pub const MAX_LIMIT: usize = 1000;

// ---------------------------------------------------------------------------
// Request parameters
// ---------------------------------------------------------------------------

/// Raw `/events` parameters, exactly as received. Missing keys are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    pub q: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub district: String,
    pub weekday: String,
    #[serde(rename = "freeOnly")]
    pub free_only: String,
    #[serde(rename = "dateFrom")]
    pub date_from: String,
    #[serde(rename = "dateTo")]
    pub date_to: String,
    pub limit: String,
    pub offset: String,
}

impl QueryParams {
    fn field_mut(&mut self, key: &str) -> Option<&mut String> {
        Some(match key {
            "q" => &mut self.q,
            "type" => &mut self.kind,
            "district" => &mut self.district,
            "weekday" => &mut self.weekday,
            "freeOnly" => &mut self.free_only,
            "dateFrom" => &mut self.date_from,
            "dateTo" => &mut self.date_to,
            "limit" => &mut self.limit,
            "offset" => &mut self.offset,
            _ => return None,
        })
    }
}

/// Collect decoded query-string pairs. Unknown keys are ignored; a key given
/// more than once keeps every value, joined with `,` (`q=a&q=b` is `"a,b"`).
impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Self {
        let mut params = Self::default();
        let mut seen = HashSet::new();
        for (key, value) in pairs {
            let key = key.as_ref();
            let Some(field) = params.field_mut(key) else {
                continue;
            };
            if !seen.insert(key.to_owned()) {
                field.push(',');
            }
            field.push_str(value.as_ref());
        }
        params
    }
}

// ---------------------------------------------------------------------------
// Compiled filter
// ---------------------------------------------------------------------------

/// Caller-supplied date bounds. A bound that was given but does not parse is
/// kept as `None`: the filter stays active, that half of the test is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

/// The active predicates of one query. `None` / empty means inactive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub kind: Option<String>,
    pub district: Option<String>,
    pub free_only: bool,
    /// Lowercased search words.
    pub words: Vec<String>,
    pub date_range: Option<DateRange>,
    /// `0..=6`, Sunday = 0.
    pub weekday: Option<u8>,
}

impl EventFilter {
    pub fn from_params(params: &QueryParams) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());

        let date_range = (!params.date_from.is_empty() || !params.date_to.is_empty()).then(|| {
            DateRange {
                from: parse_timestamp(&params.date_from),
                to: parse_timestamp(&params.date_to),
            }
        });

        Self {
            kind: non_empty(&params.kind),
            district: non_empty(&params.district),
            free_only: params.free_only.to_lowercase() == "true",
            words: params
                .q
                .trim()
                .to_lowercase()
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            date_range,
            weekday: parse_weekday(&params.weekday),
        }
    }

    /// Whether `event` passes every active predicate.
    pub fn matches(&self, event: &NormalizedEvent) -> bool {
        if let Some(kind) = &self.kind {
            if event.kind != *kind {
                return false;
            }
        }
        if let Some(district) = &self.district {
            if event.district != *district {
                return false;
            }
        }
        if self.free_only && !is_free(event) {
            return false;
        }
        if !self.words.iter().all(|w| event.search_blob.contains(w.as_str())) {
            return false;
        }
        if let Some(range) = &self.date_range {
            if !overlaps_range(&event.span, range) {
                return false;
            }
        }
        if let Some(weekday) = self.weekday {
            if !hits_weekday(&event.span, weekday) {
                return false;
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// An event is free when either price bound is exactly zero. Unknown prices
/// are not free, and `min = 0, max = 500` still counts as free.
pub fn is_free(event: &NormalizedEvent) -> bool {
    event.price_min == Some(0.0) || event.price_max == Some(0.0)
}

/// Whether the event's effective interval overlaps the requested bounds.
/// Events without any date never overlap.
pub fn overlaps_range(span: &EventSpan, range: &DateRange) -> bool {
    let Some((start, end)) = span.effective() else {
        return false;
    };
    if let (Some(from), Some(end)) = (range.from, end.timestamp()) {
        if end < from {
            return false;
        }
    }
    if let (Some(to), Some(start)) = (range.to, start.timestamp()) {
        if start > to {
            return false;
        }
    }
    true
}

/// Whether any calendar day of the event falls on `weekday`.
///
/// An unparsable start fails the test; an unparsable end reduces it to the
/// start day.
pub fn hits_weekday(span: &EventSpan, weekday: u8) -> bool {
    let Some((first, last)) = span.effective() else {
        return false;
    };
    match (first.timestamp(), last.timestamp()) {
        (Some(first), Some(last)) => range_hits_weekday(first.date(), last.date(), weekday),
        _ => span
            .start
            .timestamp()
            .is_some_and(|start| weekday_of(start.date()) == weekday),
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub offset: usize,
    pub limit: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    pub fn from_params(params: &QueryParams) -> Self {
        let offset = parse_int_prefix(&params.offset)
            .map(|n| n.max(0) as usize)
            .unwrap_or(0);
        let limit = match parse_int_prefix(&params.limit) {
            None | Some(0) => DEFAULT_LIMIT,
            Some(n) => n.clamp(1, MAX_LIMIT as i64) as usize,
        };
        Self { offset, limit }
    }
}

static INT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([+-]?)([0-9]+)").expect("Invalid regex"));

/// Parse the leading base-10 integer of `input` (`"20abc"` is 20). Values
/// beyond `i64` saturate.
pub fn parse_int_prefix(input: &str) -> Option<i64> {
    let caps = INT_PREFIX.captures(input)?;
    let negative = &caps[1] == "-";
    let magnitude = caps[2].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Every event that passes `filter`, in working-set order.
pub fn matching<'a>(
    events: &'a [NormalizedEvent],
    filter: &'a EventFilter,
) -> impl Iterator<Item = &'a NormalizedEvent> + 'a {
    events.iter().filter(move |event| filter.matches(event))
}

/// Answer one `/events` request against `events`.
pub fn query(events: &[NormalizedEvent], params: &QueryParams) -> EventPage {
    let filter = EventFilter::from_params(params);
    let page = Pagination::from_params(params);

    let hits: Vec<&NormalizedEvent> = matching(events, &filter).collect();
    let results = hits
        .iter()
        .skip(page.offset)
        .take(page.limit)
        .map(|event| event.raw.clone())
        .collect();

    tracing::debug!(
        total = hits.len(),
        offset = page.offset,
        limit = page.limit,
        "query: evaluated"
    );

    EventPage {
        total: hits.len(),
        offset: page.offset,
        limit: page.limit,
        results,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
