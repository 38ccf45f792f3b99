//! Provider replies and failures to the local JSON contract. No I/O here.

use crate::domain::payment::{CreatedPayment, PaymentStatusView};
use crate::error::ApiError;
use crate::gateways::GatewayError;
use axum::http::StatusCode;
use serde_json::Value;

pub const CREATE_FAILED: &str = "Failed to create payment";
pub const STATUS_FAILED: &str = "Failed to fetch payment status";

/// An error the provider wrapped inside a 2xx reply.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedError {
    pub wrapper: String,
    pub details: String,
    pub body: Value,
}

/// Finds a top-level `error_*` object in a 2xx reply, e.g.
/// `{"error_payment_post_payments": {"status": 400, "http_body": "{...}"}}`.
/// `http_body` is decoded when it holds JSON; otherwise the wrapper object
/// itself is the error body.
pub fn find_embedded_error(reply: &Value) -> Option<EmbeddedError> {
    let fields = reply.as_object()?;
    fields.iter().find_map(|(key, value)| {
        if !key.starts_with("error_") || !value.is_object() {
            return None;
        }

        let body = match value.get("http_body").and_then(Value::as_str) {
            Some(raw) => serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())),
            None => value.clone(),
        };
        let details = body
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or("Validation error")
            .to_string();

        Some(EmbeddedError {
            wrapper: key.clone(),
            details,
            body,
        })
    })
}

pub fn created_payment(reply: Value) -> Result<CreatedPayment, ApiError> {
    if let Some(embedded) = find_embedded_error(&reply) {
        tracing::warn!(wrapper = %embedded.wrapper, details = %embedded.details, "provider embedded an error in a 2xx reply");
        return Err(ApiError::Upstream {
            status: StatusCode::BAD_REQUEST,
            error: CREATE_FAILED,
            details: embedded.details,
            status_code: None,
            provider_error: Some(embedded.body),
        });
    }

    serde_json::from_value(reply).map_err(|e| ApiError::Unexpected(e.into()))
}

pub fn payment_status(reply: Value) -> Result<PaymentStatusView, ApiError> {
    serde_json::from_value(reply).map_err(|e| ApiError::Unexpected(e.into()))
}

pub fn create_failure(err: GatewayError) -> ApiError {
    match err {
        GatewayError::Status { status, body } => ApiError::Upstream {
            status: passthrough_status(status),
            error: CREATE_FAILED,
            details: if status == 401 {
                "Invalid credentials".to_string()
            } else {
                "Service unavailable".to_string()
            },
            status_code: None,
            provider_error: Some(Value::String(body)),
        },
        other => ApiError::Unexpected(other.into()),
    }
}

pub fn status_failure(err: GatewayError) -> ApiError {
    match err {
        GatewayError::Status { status, body } => ApiError::Upstream {
            status: passthrough_status(status),
            error: STATUS_FAILED,
            details: if status == 404 {
                "Payment not found".to_string()
            } else {
                failure_details(status, &body)
            },
            status_code: Some(status),
            provider_error: None,
        },
        other => ApiError::Unexpected(other.into()),
    }
}

/// Best human-readable message in a provider error body: JSON `message`,
/// then JSON `error`, then the raw text, then `HTTP <status>`.
pub fn failure_details(status: u16, body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|json| {
        ["message", "error"]
            .iter()
            .find_map(|key| json.get(*key).and_then(Value::as_str).filter(|s| !s.is_empty()))
            .map(str::to_string)
    });

    from_json.unwrap_or_else(|| {
        if body.trim().is_empty() {
            format!("HTTP {status}")
        } else {
            body.to_string()
        }
    })
}

fn passthrough_status(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY)
}
