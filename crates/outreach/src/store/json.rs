//! Shared helpers for reading and writing JSON store files.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::error::StoreError;

/// Reads a JSON document, creating the file with the type's default value if
/// it does not exist yet.
pub fn read_json_file<T>(path: &Path) -> Result<T, StoreError>
where
    T: Default + DeserializeOwned + Serialize,
{
    if !path.exists() {
        let value = T::default();
        write_json_file(path, &value)?;
        return Ok(value);
    }

    let content = fs::read_to_string(path).map_err(|e| StoreError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(serde_json::from_str(&content)?)
}

/// Writes a JSON document, creating parent directories as needed.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StoreError::CreateDirectory {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content).map_err(|e| StoreError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}
