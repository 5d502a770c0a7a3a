//! Registration, login, and per-account SMTP settings.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use log::warn;
use serde::Deserialize;
use serde_json::{json, Value};

use outreach::config::SmtpSettings;

use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub config: Option<SmtpSettings>,
}

fn required_credentials(request: &CredentialsRequest) -> Result<(String, String), ApiError> {
    let email = request
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty());
    let password = request.password.as_deref().filter(|p| !p.is_empty());
    match (email, password) {
        (Some(email), Some(password)) => Ok((email.to_string(), password.to_string())),
        _ => Err(ApiError::bad_request("Email and password required.")),
    }
}

/// POST /api/account/register
pub async fn register(
    State(state): State<SharedState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<Value>, ApiError> {
    let (email, password) = required_credentials(&request)?;
    state
        .account_store
        .register(&email, &password, request.config)
        .map_err(ApiError::from)?;

    Ok(Json(json!({"success": true})))
}

/// POST /api/account/login
pub async fn login(
    State(state): State<SharedState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<Value>, ApiError> {
    let (email, password) = required_credentials(&request)?;
    let config = state
        .account_store
        .login(&email, &password)
        .map_err(ApiError::from)?;
    let token = state.auth.issue(&email)?;

    Ok(Json(json!({
        "token": token,
        "config": config,
    })))
}

/// GET /api/account/config
pub async fn get_config(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let email = state.auth.verify_bearer(&headers)?;
    let config = state.account_store.config(&email).map_err(ApiError::from)?;

    Ok(Json(json!({"config": config})))
}

#[derive(Debug, Deserialize)]
pub struct SetConfigRequest {
    #[serde(default)]
    pub config: Option<SmtpSettings>,
}

/// POST /api/account/config
///
/// Saves the account's SMTP settings, mirrors them into the shared config
/// store, and swaps the live mailer handle to one built from them.
pub async fn set_config(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(request): Json<SetConfigRequest>,
) -> Result<Json<Value>, ApiError> {
    let email = state.auth.verify_bearer(&headers)?;
    let Some(config) = request.config else {
        return Err(ApiError::bad_request("Config is required."));
    };

    state
        .account_store
        .set_config(&email, config.clone())
        .map_err(ApiError::from)?;
    state.config_store.save(config.clone()).map_err(ApiError::from)?;

    let mailer_ready = match state.reconfigure_mailer(&config).await {
        Ok(()) => true,
        Err(e) => {
            warn!("Saved SMTP settings but could not build a mailer: {}", e);
            false
        }
    };

    Ok(Json(json!({
        "success": true,
        "mailerReady": mailer_ready,
    })))
}
