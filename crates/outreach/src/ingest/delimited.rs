//! Delimited-text (CSV) decoding.

use std::io::Read;

use crate::error::IngestError;
use crate::ingest::RawRecord;

/// Decodes a CSV stream using its header row as field names. Keys and values
/// are trimmed; a value that trims to the empty string is left out of the
/// record entirely.
pub fn decode_delimited<R: Read>(reader: R) -> Result<Vec<RawRecord>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        let mut record = RawRecord::new();
        for (header, value) in headers.iter().zip(row.iter()) {
            let value = value.trim();
            if !header.is_empty() && !value.is_empty() {
                record.insert(header.clone(), value.to_string());
            }
        }
        records.push(record);
    }

    Ok(records)
}

/// Reads just the trimmed header row, preserving column order.
pub fn read_delimited_headers<R: Read>(reader: R) -> Result<Vec<String>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);
    Ok(csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_with_header_row() {
        let input = "Email,Full Name,Company\na@b.com,Jane Doe,Acme\n";
        let records = decode_delimited(input.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("Email").map(String::as_str), Some("a@b.com"));
        assert_eq!(
            records[0].get("Full Name").map(String::as_str),
            Some("Jane Doe")
        );
    }

    #[test]
    fn blank_values_are_omitted_not_stored_empty() {
        let input = "Email,Full Name,Company\na@b.com,  ,Acme\n";
        let records = decode_delimited(input.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert!(!records[0].contains_key("Full Name"));
        assert_eq!(records[0].get("Email").map(String::as_str), Some("a@b.com"));
        assert_eq!(records[0].get("Company").map(String::as_str), Some("Acme"));
    }

    #[test]
    fn keys_and_values_are_trimmed() {
        let input = " Email , Name \n  a@b.com  ,  Jane  \n";
        let records = decode_delimited(input.as_bytes()).unwrap();
        assert_eq!(records[0].get("Email").map(String::as_str), Some("a@b.com"));
        assert_eq!(records[0].get("Name").map(String::as_str), Some("Jane"));
    }

    #[test]
    fn malformed_stream_fails_the_whole_call() {
        // Second data row has more fields than the header.
        let input = "Email,Name\na@b.com,Jane\nc@d.com,Joe,extra\n";
        assert!(decode_delimited(input.as_bytes()).is_err());
    }

    #[test]
    fn headers_preserve_column_order() {
        let input = "Zeta,Alpha,Mid\n1,2,3\n";
        let headers = read_delimited_headers(input.as_bytes()).unwrap();
        assert_eq!(headers, ["Zeta", "Alpha", "Mid"]);
    }
}
