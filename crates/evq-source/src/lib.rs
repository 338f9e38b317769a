//! evq-source — the backing event document.
//!
//! Loads a JSON array of raw event records from disk and, optionally, keeps
//! watching it so every change is swapped into the [`evq_core::EventStore`].
//! A document that fails to load never replaces the working set.

pub mod error;
pub mod loader;
pub mod watcher;

pub use error::SourceError;
pub use loader::{load_document, reload_from};
pub use watcher::DocumentWatcher;
