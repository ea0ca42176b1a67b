//! Input loading: read descriptors and record data from JSON files.
//!
//! The library pass itself works on in-memory structures; this module is the
//! file-system edge used by the CLI and by hosts that export their metadata
//! to disk. Errors map to the fatal [`ActionTagError`] variants so a missing
//! or unreadable file is reported with its path.

use crate::error::ActionTagError;
use crate::model::{FieldDescriptor, RecordData};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Load a JSON array of field descriptors.
pub fn load_metadata(path: impl AsRef<Path>) -> Result<Vec<FieldDescriptor>, ActionTagError> {
    let fields: Vec<FieldDescriptor> = load_json(path.as_ref())?;
    debug!("Loaded {} field descriptors from {}", fields.len(), path.as_ref().display());
    Ok(fields)
}

/// Load a JSON object `record → event → field → value`.
pub fn load_records(path: impl AsRef<Path>) -> Result<RecordData, ActionTagError> {
    let records: RecordData = load_json(path.as_ref())?;
    debug!("Loaded {} records from {}", records.len(), path.as_ref().display());
    Ok(records)
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ActionTagError> {
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ActionTagError::FileNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => ActionTagError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => ActionTagError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    serde_json::from_str(&text).map_err(|source| ActionTagError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Pretty-print `value` as JSON into `path`, creating or truncating it.
pub fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<(), ActionTagError> {
    let path = path.as_ref();
    let write_err = |source: std::io::Error| ActionTagError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };
    let mut json = serde_json::to_string_pretty(value)
        .map_err(|e| write_err(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
    json.push('\n');
    std::fs::write(path, json).map_err(write_err)
}
