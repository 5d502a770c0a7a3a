//! Spreadsheet (xlsx/xls) decoding via calamine.

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;

use crate::error::IngestError;
use crate::ingest::RawRecord;

/// Decodes the first sheet of a workbook using the first row as headers.
/// Empty cells are skipped and values that trim to nothing are omitted, the
/// same rule as the delimited decoder.
pub fn decode_sheet(bytes: &[u8]) -> Result<Vec<RawRecord>, IngestError> {
    let range = first_sheet_range(bytes)?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| cell_to_string(cell).trim().to_string())
            .collect(),
        None => return Ok(Vec::new()),
    };

    let mut records = Vec::new();
    for row in rows {
        let mut record = RawRecord::new();
        for (header, cell) in headers.iter().zip(row.iter()) {
            if header.is_empty() || matches!(cell, Data::Empty) {
                continue;
            }
            let value = cell_to_string(cell);
            let value = value.trim();
            if !value.is_empty() {
                record.insert(header.clone(), value.to_string());
            }
        }
        records.push(record);
    }

    Ok(records)
}

/// Reads the trimmed header row of the first sheet, preserving column order.
pub fn read_sheet_headers(bytes: &[u8]) -> Result<Vec<String>, IngestError> {
    let range = first_sheet_range(bytes)?;
    Ok(range
        .rows()
        .next()
        .map(|header_row| {
            header_row
                .iter()
                .map(|cell| cell_to_string(cell).trim().to_string())
                .collect()
        })
        .unwrap_or_default())
}

fn first_sheet_range(bytes: &[u8]) -> Result<calamine::Range<Data>, IngestError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| IngestError::Sheet(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| IngestError::Sheet("Workbook has no sheets".to_string()))?;

    workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| IngestError::Sheet(e.to_string()))
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(n) => n.to_string(),
        Data::Float(f) => format!("{}", f),
        Data::Bool(b) => b.to_string(),
        Data::Error(e) => format!("#ERR({:?})", e),
        Data::DateTime(dt) => format!("{}", dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}
