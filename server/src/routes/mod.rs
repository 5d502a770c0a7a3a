//! HTTP route handlers, organized by domain:
//! - `email`: sending, personalization, configuration checks
//! - `files`: upload, preview, export, mapping guide
//! - `prospects`: people-data API
//! - `templates`: template and log stores
//! - `account`: registration, login, per-account SMTP settings

pub mod account;
pub mod email;
pub mod files;
pub mod prospects;
pub mod templates;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::SharedState;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        // Email
        .route("/api/email/send", post(email::send))
        .route("/api/email/send-bulk", post(email::send_bulk))
        .route(
            "/api/email/send-personalized-bulk",
            post(email::send_personalized_bulk),
        )
        .route(
            "/api/email/preview-personalized",
            post(email::preview_personalized),
        )
        .route("/api/email/test", post(email::send_test))
        .route("/api/email/validate-config", get(email::validate_config))
        .route("/api/email/template-guide", get(email::template_guide))
        .route("/api/email/bulk-send", post(email::bulk_send))
        .route("/api/email/templates", get(templates::list_templates))
        .route("/api/email/save-template", post(templates::save_template))
        .route("/api/email/logs", get(templates::list_logs))
        // Files
        .route("/api/files/upload", post(files::upload))
        .route("/api/files/preview", post(files::preview))
        .route("/api/files/export", post(files::export))
        .route("/api/files/mapping-guide", get(files::mapping_guide))
        // Prospects
        .route("/api/prospects/search-people", post(prospects::search_people))
        .route("/api/prospects/usage", get(prospects::usage))
        .route(
            "/api/prospects/validate-config",
            get(prospects::validate_config),
        )
        // Account
        .route("/api/account/register", post(account::register))
        .route("/api/account/login", post(account::login))
        .route(
            "/api/account/config",
            get(account::get_config).post(account::set_config),
        )
        .fallback(not_found)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "timestamp": Utc::now().to_rfc3339(),
        "service": "Outreach Backend",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({"error": "Route not found"})))
}
