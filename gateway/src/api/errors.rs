use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::RegistryError;

pub fn registry_error_to_response(err: RegistryError) -> Response {
    let status = match &err {
        RegistryError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        RegistryError::DuplicateRegistration { .. } => StatusCode::CONFLICT,
        RegistryError::NotFound { .. } => StatusCode::NOT_FOUND,
        RegistryError::LedgerRejected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        RegistryError::LedgerUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        RegistryError::InvalidAccountData { .. } => StatusCode::BAD_GATEWAY,
    };

    match err {
        RegistryError::LedgerRejected { ref logs, .. } => {
            let details = logs.clone();
            json_error_with_details(status, err.kind(), err.to_string(), details)
        }
        _ => json_error(status, err.kind(), err.to_string()),
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

fn json_error_with_details(
    status: StatusCode,
    code: &'static str,
    message: String,
    details: Vec<String>,
) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message,
            "details": details,
        })),
    )
        .into_response()
}
