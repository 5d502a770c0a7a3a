//! People-data API endpoints.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use outreach::prospects::PeopleSearchQuery;

use crate::error::ApiError;
use crate::state::SharedState;

/// POST /api/prospects/search-people
pub async fn search_people(
    State(state): State<SharedState>,
    Json(query): Json<PeopleSearchQuery>,
) -> Result<Json<Value>, ApiError> {
    if !query.has_criteria() {
        return Err(ApiError::bad_request("Search parameters are required"));
    }

    let page = state
        .prospects
        .search_people(query)
        .await
        .map_err(ApiError::from)?;
    let total = page.pagination.total_entries;

    Ok(Json(json!({
        "success": true,
        "data": page,
        "totalPeople": total,
        "message": format!("Found {} people matching your criteria", total),
    })))
}

/// GET /api/prospects/validate-config
pub async fn validate_config(State(state): State<SharedState>) -> Json<Value> {
    match state.prospects.validate().await {
        Ok(()) => Json(json!({
            "success": true,
            "message": "Prospect API configuration is valid",
        })),
        Err(e) => Json(json!({
            "success": false,
            "error": e.to_string(),
        })),
    }
}

/// GET /api/prospects/usage
pub async fn usage(State(state): State<SharedState>) -> Json<Value> {
    let usage = state.prospects.usage();
    let message = if usage.configured {
        "Prospect API is configured and ready to use"
    } else {
        "Prospect API key is not configured"
    };

    Json(json!({
        "success": true,
        "message": message,
        "apiKey": usage.api_key,
        "availableEndpoints": usage.available_endpoints,
        "limitations": usage.limitations,
    }))
}
