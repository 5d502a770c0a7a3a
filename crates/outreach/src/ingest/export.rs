//! CSV export of processed records.

use serde_json::{Map, Value};

use crate::error::IngestError;

/// Serializes records to CSV bytes. The header row comes from the first
/// record's keys; later records contribute only the columns the first one
/// established. Non-string scalars are stringified, null and missing values
/// become empty cells.
pub fn export_csv(records: &[Map<String, Value>]) -> Result<Vec<u8>, IngestError> {
    let first = records.first().ok_or(IngestError::EmptyExport)?;
    let headers: Vec<&String> = first.keys().collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(headers.iter().map(|h| h.as_str()))?;

    for record in records {
        let row: Vec<String> = headers
            .iter()
            .map(|header| value_to_cell(record.get(header.as_str())))
            .collect();
        writer.write_record(&row)?;
    }

    writer
        .into_inner()
        .map_err(|e| IngestError::Export(e.to_string()))
}

fn value_to_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        // Nested structures are not tabular; keep them as JSON text.
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn exports_header_and_rows() {
        let records = vec![
            record(json!({"email": "a@b.com", "name": "Jane", "score": 3})),
            record(json!({"email": "c@d.com", "name": null})),
        ];
        let bytes = export_csv(&records).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "email,name,score\na@b.com,Jane,3\nc@d.com,,\n");
    }

    #[test]
    fn quoting_is_handled_by_the_writer() {
        let records = vec![record(json!({"name": "Doe, Jane", "note": "said \"hi\""}))];
        let text = String::from_utf8(export_csv(&records).unwrap()).unwrap();
        assert!(text.contains("\"Doe, Jane\""));
        assert!(text.contains("\"said \"\"hi\"\"\""));
    }

    #[test]
    fn empty_export_is_an_error() {
        assert!(matches!(export_csv(&[]), Err(IngestError::EmptyExport)));
    }
}
