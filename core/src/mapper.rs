//! Classifies transport failures into `ApiError` kinds.
//!
//! Checks run most-specific first and the first match wins:
//! maintenance signal, then malformed or undecodable body, then generic
//! request failure. `classify` is total; unknown shapes degrade to `RequestFailed`.

use serde_json::Value;

use crate::error::ApiError;
use crate::fields;
use crate::http::{HttpResponse, TransportError};

/// Status the vendor uses while the API is down for planned maintenance.
pub const MAINTENANCE_STATUS: u16 = 503;

pub fn classify(error: TransportError) -> ApiError {
    match error {
        TransportError::Status(response) => classify_response(response),
        TransportError::UndecodableBody { status, message } if status == MAINTENANCE_STATUS => {
            ApiError::MaintenanceMode { message }
        }
        TransportError::UndecodableBody { status, message } => {
            ApiError::malformed(format!("HTTP {status} body is not valid UTF-8: {message}"))
        }
        TransportError::Timeout(message)
        | TransportError::Connection(message)
        | TransportError::Other(message) => ApiError::RequestFailed {
            status: None,
            message,
            code: None,
            errors: None,
        },
    }
}

fn classify_response(response: HttpResponse) -> ApiError {
    let parsed = if response.body.trim().is_empty() {
        None
    } else {
        Some(serde_json::from_str::<Value>(&response.body))
    };

    if response.status == MAINTENANCE_STATUS {
        let message = parsed
            .as_ref()
            .and_then(|p| p.as_ref().ok())
            .and_then(|body| fields::optional_str(body, "message"))
            .unwrap_or("service temporarily unavailable")
            .to_string();
        return ApiError::MaintenanceMode { message };
    }

    match parsed {
        Some(Err(error)) if declares_json(&response) => ApiError::MalformedResponse {
            message: format!("HTTP {} error body is not valid JSON: {error}", response.status),
            source: Some(error),
        },
        Some(Ok(body)) if body.is_object() => ApiError::RequestFailed {
            status: Some(response.status),
            message: fields::optional_str(&body, "message")
                .map(str::to_string)
                .unwrap_or_else(|| response.body.clone()),
            code: fields::optional(&body, "code").and_then(Value::as_i64),
            errors: fields::optional(&body, "errors").cloned(),
        },
        _ => ApiError::RequestFailed {
            status: Some(response.status),
            message: if response.body.trim().is_empty() {
                format!("HTTP {}", response.status)
            } else {
                response.body
            },
            code: None,
            errors: None,
        },
    }
}

fn declares_json(response: &HttpResponse) -> bool {
    response
        .header("content-type")
        .is_some_and(|value| value.to_ascii_lowercase().contains("json"))
}
