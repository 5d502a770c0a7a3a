//! Upload, preview, and export endpoints for contact lists.

use axum::extract::Multipart;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use uuid::Uuid;

use outreach::contacts::{normalize, CanonicalField, FieldMapping};
use outreach::ingest;

use crate::error::ApiError;

/// Extensions accepted for uploaded contact lists.
const ALLOWED_EXTENSIONS: [&str; 3] = ["csv", "xlsx", "xls"];

/// Writes upload bytes to a named scratch file carrying the original
/// extension. The file is deleted when the returned guard drops, which
/// covers every exit path of the calling handler.
pub(crate) fn spool_upload(
    bytes: &[u8],
    original_name: Option<&str>,
) -> Result<NamedTempFile, ApiError> {
    let extension = original_name
        .and_then(|name| Path::new(name).extension())
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ApiError::bad_request(
            "Invalid file type. Allowed types: .csv, .xlsx, .xls",
        ));
    }

    let mut spooled = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(&format!(".{}", extension))
        .tempfile()
        .map_err(|e| ApiError::internal(format!("Failed to spool upload: {}", e)))?;
    spooled
        .write_all(bytes)
        .map_err(|e| ApiError::internal(format!("Failed to spool upload: {}", e)))?;
    Ok(spooled)
}

/// Pulls the file field (plus an optional `mapping` JSON field) out of a
/// multipart body.
async fn read_upload(
    multipart: &mut Multipart,
) -> Result<(Vec<u8>, Option<String>, Option<String>), ApiError> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut mapping: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed upload: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                file_name = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Malformed upload: {}", e)))?;
                file_bytes = Some(bytes.to_vec());
            }
            Some("mapping") => {
                mapping = Some(field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("Malformed upload: {}", e))
                })?);
            }
            _ => {}
        }
    }

    let bytes = file_bytes.ok_or_else(|| ApiError::bad_request("No file uploaded"))?;
    Ok((bytes, file_name, mapping))
}

fn parse_mapping_overrides(raw: Option<&str>) -> Result<FieldMapping, ApiError> {
    let base = FieldMapping::default();
    match raw.filter(|r| !r.trim().is_empty()) {
        None => Ok(base),
        Some(raw) => {
            let overrides: BTreeMap<CanonicalField, Vec<String>> = serde_json::from_str(raw)
                .map_err(|e| ApiError::bad_request(format!("Invalid mapping JSON: {}", e)))?;
            Ok(base.merged(&overrides))
        }
    }
}

/// POST /api/files/upload
///
/// Decodes and normalizes an uploaded list, returning totals, a sample, and
/// which canonical fields were detected.
pub async fn upload(mut multipart: Multipart) -> Result<Json<Value>, ApiError> {
    let (bytes, file_name, mapping_raw) = read_upload(&mut multipart).await?;
    let mapping = parse_mapping_overrides(mapping_raw.as_deref())?;

    let spooled = spool_upload(&bytes, file_name.as_deref())?;
    let records = ingest::decode_file(spooled.path())?;
    let contacts = normalize(&records, &mapping);

    let columns: Vec<&'static str> = contacts
        .first()
        .map(|contact| contact.present_fields())
        .unwrap_or_default();

    Ok(Json(json!({
        "success": true,
        "message": "File uploaded and processed successfully",
        "fileId": Uuid::new_v4().to_string(),
        "originalName": file_name,
        "totalRows": contacts.len(),
        "sampleData": contacts.iter().take(5).collect::<Vec<_>>(),
        "columns": columns,
    })))
}

/// POST /api/files/preview
///
/// Returns the raw columns, the first rows, and suggested field mappings
/// without normalizing anything.
pub async fn preview(mut multipart: Multipart) -> Result<Json<Value>, ApiError> {
    let (bytes, file_name, _) = read_upload(&mut multipart).await?;

    let spooled = spool_upload(&bytes, file_name.as_deref())?;
    let columns = ingest::read_headers(spooled.path())?;
    let records = ingest::decode_file(spooled.path())?;
    let suggestions = ingest::suggest_mappings(&columns);

    Ok(Json(json!({
        "success": true,
        "originalName": file_name,
        "columns": columns,
        "sampleData": records.iter().take(3).collect::<Vec<_>>(),
        "suggestions": suggestions,
        "fileId": Uuid::new_v4().to_string(),
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    #[serde(default)]
    pub data: Option<Vec<Map<String, Value>>>,
    #[serde(default)]
    pub filename: Option<String>,
}

/// POST /api/files/export
pub async fn export(Json(request): Json<ExportRequest>) -> Result<Response, ApiError> {
    let Some(data) = request.data else {
        return Err(ApiError::bad_request("Data array is required for export"));
    };
    if data.is_empty() {
        return Err(ApiError::bad_request("No data to export"));
    }

    let bytes = ingest::export_csv(&data)?;
    let filename = sanitize_filename(request.filename.as_deref().unwrap_or("exported_data.csv"));

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// GET /api/files/mapping-guide
pub async fn mapping_guide() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "standardFields": [
                {"field": "firstName", "description": "First name of the person", "examples": ["John", "Jane"]},
                {"field": "lastName", "description": "Last name of the person", "examples": ["Doe", "Smith"]},
                {"field": "fullName", "description": "Full name of the person", "examples": ["John Doe", "Jane Smith"]},
                {"field": "email", "description": "Email address", "examples": ["john@company.com", "jane.smith@example.org"]},
                {"field": "title", "description": "Job title or position", "examples": ["CEO", "Marketing Manager", "Software Engineer"]},
                {"field": "company", "description": "Company or organization name", "examples": ["Acme Inc", "TechCorp"]},
                {"field": "domain", "description": "Company domain or website", "examples": ["acme.io", "techcorp.com"]},
                {"field": "linkedinUrl", "description": "LinkedIn profile URL", "examples": ["https://linkedin.com/in/johndoe"]},
                {"field": "phone", "description": "Phone number", "examples": ["+1-555-123-4567", "(555) 123-4567"]},
                {"field": "city", "description": "City location", "examples": ["San Francisco", "New York"]},
                {"field": "state", "description": "State or province", "examples": ["California", "NY"]},
                {"field": "country", "description": "Country", "examples": ["United States", "Canada"]}
            ],
            "commonColumnNames": FieldMapping::default(),
            "tips": [
                "The system will automatically detect and suggest column mappings",
                "Ensure your file has headers in the first row",
                "Email addresses are required for sending emails",
                "Either firstName+lastName or fullName is required for personalization",
                "LinkedIn URLs and company domains improve prospect matching"
            ],
        },
    }))
}

fn sanitize_filename(raw: &str) -> String {
    let base = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(raw)
        .replace(['"', '\r', '\n'], "");
    if base.is_empty() {
        "exported_data.csv".to_string()
    } else {
        base
    }
}
