//! evq — filtered queries over an in-memory JSON event listing.
//!
//! This crate holds the HTTP layer; the engine lives in `evq-core` and the
//! document loader in `evq-source`.
//!
//! # Architecture
//!
//! ```text
//! events.json ──► Source (load / watch) ──► Store ──► Query engine ──► HTTP / CLI
//! ```
//!
//! The query engine is synchronous; only the server and the file watcher run
//! on tokio.

pub mod server;

pub use evq_core::{EventPage, EventStore, MetaListing, NormalizedEvent, QueryParams};
