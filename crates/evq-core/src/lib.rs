//! evq-core — normalization and query engine for evq.
//!
//! # Architecture
//!
//! ```text
//! raw records ──► Normalizer ──► EventStore (working set) ──► Query engine
//!                                        │
//!                                        └──► Meta listing
//! ```
//!
//! The normalizer and the query engine are total: malformed input degrades
//! to defaults instead of failing. The store swaps whole working sets
//! atomically; loading the backing document lives in `evq-source`.

pub mod config;
pub mod dates;
pub mod meta;
pub mod normalizer;
pub mod query;
pub mod store;
pub mod types;
pub mod weekday;

pub use normalizer::normalize;
pub use query::{query, QueryParams};
pub use store::{EventStore, WorkingSet};
pub use types::{EventPage, MetaListing, NormalizedEvent, RawEvent};
