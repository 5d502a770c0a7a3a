//! Sending endpoints: single, bulk, personalized, file-driven, plus preview
//! and configuration checks. Every dispatch outcome is forwarded into the
//! log store with its sending-path classification.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::time::Duration;

use outreach::dispatch::{
    build_from_rows, build_personalized, dispatch_all, DispatchOutcome, MailTransport,
    OutboundMessage, PersonalizedMessage, SendReceipt,
};
use outreach::error::TransportError;
use outreach::ingest;
use outreach::store::{LogEntry, SendKind};
use outreach::template::{placeholder_catalog, render, ContactPayload};

use crate::error::ApiError;
use crate::routes::files::spool_upload;
use crate::state::{AppState, SharedState};

fn default_delay_ms() -> u64 {
    1000
}

/// Fixed pause between rows on the file-driven path.
const CSV_SEND_DELAY: Duration = Duration::from_millis(2000);

/// POST /api/email/send
pub async fn send(
    State(state): State<SharedState>,
    Json(message): Json<OutboundMessage>,
) -> Result<Response, ApiError> {
    message.ensure_sendable()?;
    let mailer = state.mailer().await?;

    match mailer.send(&message).await {
        Ok(receipt) => {
            record_single(&state, &message, Some(&receipt), None);
            Ok(Json(json!({
                "success": true,
                "message": "Email sent successfully",
                "messageId": receipt.message_id,
                "to": message.to,
                "subject": message.subject,
            }))
            .into_response())
        }
        Err(e) => {
            record_single(&state, &message, None, Some(&e));
            Ok(send_failure_response(&message, &e))
        }
    }
}

/// POST /api/email/test
pub async fn send_test(
    State(state): State<SharedState>,
    Json(request): Json<TestRequest>,
) -> Result<Response, ApiError> {
    let Some(to) = request.test_email.filter(|t| !t.trim().is_empty()) else {
        return Err(ApiError::bad_request("Test email address is required"));
    };

    let body = format!(
        "This is a test email from the outreach backend. If you received this, \
         your email configuration is working correctly!\n\nTest sent at: {}",
        Utc::now().to_rfc3339()
    );
    let message = OutboundMessage {
        to: to.clone(),
        subject: "Outreach Email Service Test".to_string(),
        html: Some(outreach::dispatch::message::text_to_html(&body)),
        text: Some(body),
        ..OutboundMessage::default()
    };

    let mailer = state.mailer().await?;
    match mailer.send(&message).await {
        Ok(receipt) => {
            record_single(&state, &message, Some(&receipt), None);
            Ok(Json(json!({
                "success": true,
                "message": "Test email sent successfully",
                "to": to,
                "messageId": receipt.message_id,
            }))
            .into_response())
        }
        Err(e) => {
            record_single(&state, &message, None, Some(&e));
            Ok(send_failure_response(&message, &e))
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRequest {
    #[serde(default)]
    pub test_email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendBulkRequest {
    #[serde(default)]
    pub emails: Option<Vec<OutboundMessage>>,
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

/// POST /api/email/send-bulk
pub async fn send_bulk(
    State(state): State<SharedState>,
    Json(request): Json<SendBulkRequest>,
) -> Result<Json<Value>, ApiError> {
    let Some(emails) = request.emails else {
        return Err(ApiError::bad_request("Emails must be an array"));
    };
    if emails.is_empty() {
        return Err(ApiError::bad_request("No emails provided"));
    }
    for (index, email) in emails.iter().enumerate() {
        if email.ensure_sendable().is_err() {
            return Err(ApiError::bad_request(format!(
                "Email {} is missing required fields: to, subject, and content",
                index + 1
            )));
        }
    }

    let mailer = state.mailer().await?;
    let report = dispatch_all(&mailer, &emails, Duration::from_millis(request.delay_ms)).await;

    record_batch(&state, SendKind::Bulk, &report.results, None);

    Ok(Json(json!({
        "success": true,
        "message": "Bulk email sending completed",
        "totalSent": emails.len(),
        "successCount": report.success_count,
        "failureCount": report.failure_count,
        "results": report.results,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizedBulkRequest {
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub contacts: Option<Vec<ContactPayload>>,
    #[serde(default)]
    pub custom_data: BTreeMap<String, Value>,
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub reply_to: Option<String>,
}

/// A dispatch outcome annotated with the contact it was rendered for.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnnotatedOutcome {
    #[serde(flatten)]
    outcome: DispatchOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    contact_company: Option<String>,
}

/// POST /api/email/send-personalized-bulk
pub async fn send_personalized_bulk(
    State(state): State<SharedState>,
    Json(request): Json<PersonalizedBulkRequest>,
) -> Result<Json<Value>, ApiError> {
    let (Some(template), Some(subject), Some(contacts)) =
        (request.template, request.subject, request.contacts)
    else {
        return Err(ApiError::bad_request(
            "Template, subject, and contacts are required",
        ));
    };
    if contacts.is_empty() {
        return Err(ApiError::bad_request("Contacts must be a non-empty array"));
    }

    let custom = stringify_custom(&request.custom_data);
    let personalized = build_personalized(
        &subject,
        &template,
        &contacts,
        &custom,
        request.from.as_deref(),
        request.reply_to.as_deref(),
    );
    if personalized.is_empty() {
        return Err(ApiError::bad_request(
            "No valid emails could be generated from the provided contacts",
        ));
    }

    let mailer = state.mailer().await?;
    let messages: Vec<OutboundMessage> =
        personalized.iter().map(|p| p.message.clone()).collect();
    let report = dispatch_all(&mailer, &messages, Duration::from_millis(request.delay_ms)).await;

    record_batch(
        &state,
        SendKind::Personalized,
        &report.results,
        Some(&personalized),
    );

    let results: Vec<AnnotatedOutcome> = report
        .results
        .into_iter()
        .map(|outcome| {
            let built = &personalized[outcome.index];
            AnnotatedOutcome {
                contact_name: built.contact_name.clone(),
                contact_company: built.contact_company.clone(),
                outcome,
            }
        })
        .collect();

    Ok(Json(json!({
        "success": true,
        "message": "Personalized bulk email sending completed",
        "totalContacts": contacts.len(),
        "validEmails": personalized.len(),
        "totalSent": personalized.len(),
        "successCount": report.success_count,
        "failureCount": report.failure_count,
        "results": results,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub contact: Option<ContactPayload>,
    #[serde(default)]
    pub custom_data: BTreeMap<String, Value>,
}

/// POST /api/email/preview-personalized
pub async fn preview_personalized(
    Json(request): Json<PreviewRequest>,
) -> Result<Json<Value>, ApiError> {
    let (Some(template), Some(subject), Some(contact)) =
        (request.template, request.subject, request.contact)
    else {
        return Err(ApiError::bad_request(
            "Template, subject, and contact are required",
        ));
    };

    let custom = stringify_custom(&request.custom_data);
    let company = contact.company_context();
    let rendered_subject = render(&subject, &contact.person, &company, &custom);
    let rendered_body = render(&template, &contact.person, &company, &custom);

    Ok(Json(json!({
        "success": true,
        "preview": {
            "to": contact.person.email,
            "subject": rendered_subject,
            "body": rendered_body,
            "html": outreach::dispatch::message::text_to_html(&rendered_body),
            "personData": {
                "firstName": contact.person.first_name,
                "lastName": contact.person.last_name,
                "fullName": contact.display_name(),
                "title": contact.person.title,
                "email": contact.person.email,
                "company": company.name,
            },
        },
    })))
}

/// GET /api/email/template-guide
pub async fn template_guide() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": placeholder_catalog(),
    }))
}

/// GET /api/email/validate-config
pub async fn validate_config(State(state): State<SharedState>) -> Json<Value> {
    match state.mailer().await {
        Err(_) => Json(json!({
            "success": false,
            "error": "Email service is not configured",
        })),
        Ok(mailer) => match mailer.verify().await {
            Ok(()) => Json(json!({
                "success": true,
                "message": "Email configuration is valid",
            })),
            Err(e) => Json(json!({
                "success": false,
                "error": e.to_string(),
            })),
        },
    }
}

/// POST /api/email/bulk-send
///
/// Multipart upload: a CSV of recipients plus subject and template fields.
/// This is the lightweight file-driven path with single-brace literal keys;
/// the spooled upload is removed on every exit path when the guard drops.
pub async fn bulk_send(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut subject: Option<String> = None;
    let mut template: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed upload: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("csvFile") | Some("file") => {
                file_name = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Malformed upload: {}", e)))?;
                file_bytes = Some(bytes.to_vec());
            }
            Some("subject") => {
                subject = Some(field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("Malformed upload: {}", e))
                })?);
            }
            Some("template") => {
                template = Some(field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("Malformed upload: {}", e))
                })?);
            }
            _ => {}
        }
    }

    let Some(file_bytes) = file_bytes else {
        return Err(ApiError::bad_request("CSV file is required"));
    };
    let (Some(subject), Some(template)) = (subject, template) else {
        return Err(ApiError::bad_request("Subject and template are required"));
    };

    let spooled = spool_upload(&file_bytes, file_name.as_deref().or(Some("upload.csv")))?;
    let rows = ingest::decode_file(spooled.path())?;

    let personalized = build_from_rows(&subject, &template, &rows);
    if personalized.is_empty() {
        return Err(ApiError::bad_request(
            "No valid email addresses found in CSV file",
        ));
    }

    let mailer = state.mailer().await?;
    let messages: Vec<OutboundMessage> =
        personalized.iter().map(|p| p.message.clone()).collect();
    let report = dispatch_all(&mailer, &messages, CSV_SEND_DELAY).await;

    record_batch(&state, SendKind::Csv, &report.results, Some(&personalized));

    Ok(Json(json!({
        "success": true,
        "message": "Bulk email sending completed",
        "totalContacts": personalized.len(),
        "totalSent": report.success_count,
        "failureCount": report.failure_count,
        "results": report.results,
    })))
}

/// Custom data arrives as arbitrary JSON scalars; placeholders substitute
/// their string forms.
fn stringify_custom(custom: &BTreeMap<String, Value>) -> BTreeMap<String, String> {
    custom
        .iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (key.clone(), text)
        })
        .collect()
}

fn send_failure_response(message: &OutboundMessage, error: &TransportError) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "success": false,
            "error": error.to_string(),
            "to": message.to,
            "subject": message.subject,
        })),
    )
        .into_response()
}

fn record_single(
    state: &AppState,
    message: &OutboundMessage,
    receipt: Option<&SendReceipt>,
    error: Option<&TransportError>,
) {
    let outcome = DispatchOutcome {
        index: 0,
        to: message.to.clone(),
        subject: message.subject.clone(),
        success: receipt.is_some(),
        message_id: receipt.and_then(|r| r.message_id.clone()),
        error: error.map(ToString::to_string),
    };
    if let Err(e) = state.log_store.append(LogEntry::new(SendKind::Single, outcome)) {
        warn!("Failed to record send log entry: {}", e);
    }
}

/// Forwards a batch's outcomes into the log store, annotated with contact
/// identity when the personalized set is available.
fn record_batch(
    state: &AppState,
    kind: SendKind,
    outcomes: &[DispatchOutcome],
    personalized: Option<&[PersonalizedMessage]>,
) {
    let entries: Vec<LogEntry> = outcomes
        .iter()
        .map(|outcome| {
            let entry = LogEntry::new(kind, outcome.clone());
            match personalized.and_then(|set| set.get(outcome.index)) {
                Some(built) => entry
                    .with_contact(built.contact_name.clone(), built.contact_company.clone()),
                None => entry,
            }
        })
        .collect();
    if let Err(e) = state.log_store.append_all(entries) {
        warn!("Failed to record batch log entries: {}", e);
    }
}
