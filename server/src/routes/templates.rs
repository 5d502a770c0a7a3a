//! Template store and dispatch history endpoints.
//!
//! Templates are upserted by id and listed; there is no delete endpoint, and
//! the store offers no delete operation to back one.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use outreach::store::MessageTemplate;

use crate::error::ApiError;
use crate::state::SharedState;

/// GET /api/email/templates
pub async fn list_templates(State(state): State<SharedState>) -> Result<Json<Value>, ApiError> {
    let templates = state.template_store.list().map_err(ApiError::from)?;
    Ok(Json(json!({
        "success": true,
        "templates": templates,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveTemplateRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

/// POST /api/email/save-template
pub async fn save_template(
    State(state): State<SharedState>,
    Json(request): Json<SaveTemplateRequest>,
) -> Result<Json<Value>, ApiError> {
    let (Some(id), Some(subject), Some(body)) = (request.id, request.subject, request.body) else {
        return Err(ApiError::bad_request("Template id, subject, and body are required"));
    };
    if id.trim().is_empty() || subject.trim().is_empty() || body.trim().is_empty() {
        return Err(ApiError::bad_request("Template id, subject, and body are required"));
    }

    state
        .template_store
        .save(MessageTemplate {
            id: id.trim().to_string(),
            subject,
            body,
            updated_at: Utc::now(),
        })
        .map_err(ApiError::from)?;

    Ok(Json(json!({
        "success": true,
        "message": "Template saved",
    })))
}

/// GET /api/email/logs
pub async fn list_logs(State(state): State<SharedState>) -> Result<Json<Value>, ApiError> {
    let logs = state.log_store.list().map_err(ApiError::from)?;
    Ok(Json(json!({
        "success": true,
        "logs": logs,
    })))
}
