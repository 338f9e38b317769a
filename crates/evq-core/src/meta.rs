//! Meta listing — the distinct categories and districts of a working set,
//! used to populate filter menus.

use std::collections::BTreeSet;

use crate::types::{MetaListing, NormalizedEvent};

/// Distinct non-empty `type` and `district` values, each sorted ascending.
pub fn meta_listing(events: &[NormalizedEvent]) -> MetaListing {
    MetaListing {
        types: distinct(events.iter().map(|e| e.kind.as_str())),
        districts: distinct(events.iter().map(|e| e.district.as_str())),
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .filter(|s| !s.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
