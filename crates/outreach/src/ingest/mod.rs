//! Decoding uploaded contact lists into raw records.
//!
//! A raw record is one data row keyed by the file's own header labels; no
//! schema is imposed here. Keys and values are trimmed and values that trim
//! to nothing are omitted entirely rather than stored as empty strings.
//! Decoding is all-or-nothing: a malformed stream fails the whole call.
//!
//! Upload gating (size limits, allowed extensions, temp-file cleanup) is the
//! caller's concern, not this module's.

pub mod delimited;
pub mod export;
pub mod sheet;
pub mod suggest;

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use crate::error::IngestError;

pub use delimited::{decode_delimited, read_delimited_headers};
pub use export::export_csv;
pub use sheet::{decode_sheet, read_sheet_headers};
pub use suggest::suggest_mappings;

/// One decoded row: arbitrary column label to scalar value, stringified.
pub type RawRecord = BTreeMap<String, String>;

/// Supported upload formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    DelimitedText,
    Spreadsheet,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "csv" => Ok(TableFormat::DelimitedText),
            "xlsx" | "xls" => Ok(TableFormat::Spreadsheet),
            other => Err(IngestError::UnsupportedFormat(format!(".{}", other))),
        }
    }
}

/// Decodes a whole file, dispatching on its extension.
pub fn decode_file(path: &Path) -> Result<Vec<RawRecord>, IngestError> {
    match TableFormat::from_path(path)? {
        TableFormat::DelimitedText => {
            let file = File::open(path).map_err(|e| IngestError::ReadFile {
                path: path.to_path_buf(),
                source: e,
            })?;
            decode_delimited(file)
        }
        TableFormat::Spreadsheet => {
            let bytes = std::fs::read(path).map_err(|e| IngestError::ReadFile {
                path: path.to_path_buf(),
                source: e,
            })?;
            decode_sheet(&bytes)
        }
    }
}

/// Reads just the header row of a file, preserving column order.
pub fn read_headers(path: &Path) -> Result<Vec<String>, IngestError> {
    match TableFormat::from_path(path)? {
        TableFormat::DelimitedText => {
            let file = File::open(path).map_err(|e| IngestError::ReadFile {
                path: path.to_path_buf(),
                source: e,
            })?;
            read_delimited_headers(file)
        }
        TableFormat::Spreadsheet => {
            let bytes = std::fs::read(path).map_err(|e| IngestError::ReadFile {
                path: path.to_path_buf(),
                source: e,
            })?;
            read_sheet_headers(&bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(
            TableFormat::from_path(Path::new("contacts.csv")).unwrap(),
            TableFormat::DelimitedText
        );
        assert_eq!(
            TableFormat::from_path(Path::new("contacts.XLSX")).unwrap(),
            TableFormat::Spreadsheet
        );
        assert!(matches!(
            TableFormat::from_path(Path::new("contacts.pdf")),
            Err(IngestError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            TableFormat::from_path(Path::new("contacts")),
            Err(IngestError::UnsupportedFormat(_))
        ));
    }
}
