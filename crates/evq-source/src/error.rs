//! Error types for document loading and watching.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong between the event document and the store.
/// The store itself never fails; a failed reload leaves it untouched.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} does not hold a JSON array of events", path.display())]
    NotAnArray { path: PathBuf },

    #[error("failed to watch {}: {source}", path.display())]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}

pub type Result<T> = std::result::Result<T, SourceError>;
