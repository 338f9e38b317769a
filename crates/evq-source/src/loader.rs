//! Reads the backing event document into raw records.

use std::path::Path;
use std::sync::Arc;

use evq_core::{EventStore, RawEvent, WorkingSet};
use serde_json::Value;

use crate::error::{Result, SourceError};

/// Read `path` and return its top-level array of records. Individual records
/// are not validated; that is the normalizer's job.
pub fn load_document(path: &Path) -> Result<Vec<RawEvent>> {
    let text = std::fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(path, &text)
}

pub(crate) fn parse_document(path: &Path, text: &str) -> Result<Vec<RawEvent>> {
    let doc: Value = serde_json::from_str(text).map_err(|source| SourceError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    match doc {
        Value::Array(records) => Ok(records),
        _ => Err(SourceError::NotAnArray {
            path: path.to_path_buf(),
        }),
    }
}

/// Load `path` and swap it into `store`. On error the store keeps serving
/// its current working set.
pub fn reload_from(path: &Path, store: &EventStore) -> Result<Arc<WorkingSet>> {
    let records = load_document(path)?;
    Ok(store.reload(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn array_document_yields_records() {
        let records =
            parse_document(Path::new("events.json"), r#"[{"title":"a"}, 3, null]"#).unwrap();
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn object_document_is_rejected() {
        let err = parse_document(Path::new("events.json"), r#"{"events": []}"#).unwrap_err();
        assert!(matches!(err, SourceError::NotAnArray { .. }));
        assert_eq!(err.to_string(), "events.json does not hold a JSON array of events");
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = parse_document(Path::new("events.json"), "[{").unwrap_err();
        assert!(matches!(err, SourceError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load_document(Path::new("/nope/events.json")).unwrap_err();
        assert!(matches!(err, SourceError::Read { .. }));
    }
}
