//! Mapping domain errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use outreach::error::{
    ConfigError, IngestError, OutreachError, ProspectError, StoreError, TransportError,
};

/// An error ready to leave the HTTP boundary: a status plus a
/// human-readable message, serialized in the standard failure envelope.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "error": self.message,
        }));
        (self.status, body).into_response()
    }
}

impl From<OutreachError> for ApiError {
    fn from(error: OutreachError) -> Self {
        match error {
            OutreachError::Validation(message) => ApiError::bad_request(message),
            OutreachError::Config(e) => e.into(),
            OutreachError::Ingest(e) => e.into(),
            OutreachError::Transport(e) => e.into(),
            OutreachError::Store(e) => e.into(),
            OutreachError::Prospect(e) => e.into(),
            OutreachError::Secret(e) => ApiError::internal(e.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(error: ConfigError) -> Self {
        match error {
            // Configuration problems are the caller's to fix; report them
            // before any work starts.
            ConfigError::MissingCredentials
            | ConfigError::MissingHost
            | ConfigError::Invalid { .. } => ApiError::bad_request(error.to_string()),
            ConfigError::Secret(e) => ApiError::internal(e.to_string()),
            ConfigError::Store(e) => e.into(),
        }
    }
}

impl From<IngestError> for ApiError {
    fn from(error: IngestError) -> Self {
        match error {
            IngestError::ReadFile { .. } => ApiError::internal(error.to_string()),
            // Malformed or unsupported uploads are client errors.
            _ => ApiError::bad_request(error.to_string()),
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::NotConfigured => ApiError::bad_request(error.to_string()),
            TransportError::InvalidAddress { .. }
            | TransportError::InvalidAttachment { .. }
            | TransportError::BuildMessage(_) => ApiError::bad_request(error.to_string()),
            TransportError::Send(_) | TransportError::Verify(_) => {
                ApiError::bad_request(error.to_string())
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        let status = match &error {
            StoreError::DuplicateAccount(_) => StatusCode::CONFLICT,
            StoreError::AccountNotFound(_) => StatusCode::NOT_FOUND,
            StoreError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError {
            status,
            message: error.to_string(),
        }
    }
}

impl From<ProspectError> for ApiError {
    fn from(error: ProspectError) -> Self {
        match error {
            ProspectError::MissingApiKey => ApiError::bad_request(error.to_string()),
            ProspectError::Api { .. } => ApiError::bad_request(error.to_string()),
            ProspectError::Http(e) => ApiError::internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let error: ApiError = OutreachError::Validation("missing field".to_string()).into();
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert_eq!(error.message, "missing field");
    }

    #[test]
    fn account_errors_keep_their_distinct_statuses() {
        let conflict: ApiError = StoreError::DuplicateAccount("a@b.com".to_string()).into();
        assert_eq!(conflict.status, StatusCode::CONFLICT);

        let missing: ApiError = StoreError::AccountNotFound("a@b.com".to_string()).into();
        assert_eq!(missing.status, StatusCode::NOT_FOUND);

        let denied: ApiError = StoreError::InvalidCredentials.into();
        assert_eq!(denied.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn missing_configuration_is_a_client_error() {
        let error: ApiError = ConfigError::MissingCredentials.into();
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
    }
}
