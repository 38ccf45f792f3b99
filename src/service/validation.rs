use crate::domain::payment::PaymentRequest;
use crate::error::ApiError;
use serde_json::Value;

pub const CONTENT_TYPE_REQUIRED: &str = "Content-Type must be application/json";
pub const EMPTY_BODY: &str = "Request body is empty";
pub const INVALID_JSON: &str = "Invalid JSON in request body";
pub const INVALID_AMOUNT: &str = "Amount must be greater than 0";
pub const SUBJECT_REQUIRED: &str = "Subject is required";
pub const PAYMENT_ID_REQUIRED: &str = "Payment ID is required";

/// Checks a create-payment request in the order the caller sees errors:
/// content type, empty body, JSON syntax, amount, subject.
pub fn validate_create(content_type: Option<&str>, body: &[u8]) -> Result<PaymentRequest, ApiError> {
    if !content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json")) {
        return Err(ApiError::Validation(CONTENT_TYPE_REQUIRED));
    }
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::Validation(EMPTY_BODY));
    }

    let input: Value = serde_json::from_slice(body).map_err(|_| ApiError::Validation(INVALID_JSON))?;

    let amount = match input.get("amount") {
        Some(Value::Number(n)) if n.as_f64().is_some_and(|v| v > 0.0) => n.clone(),
        _ => return Err(ApiError::Validation(INVALID_AMOUNT)),
    };

    let subject = input
        .get("subject")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ApiError::Validation(SUBJECT_REQUIRED))?;

    Ok(PaymentRequest {
        amount,
        currency: input.get("currency").and_then(Value::as_str).map(str::to_string),
        subject: subject.to_string(),
    })
}

pub fn validate_payment_id(id: Option<&str>) -> Result<&str, ApiError> {
    id.map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::Validation(PAYMENT_ID_REQUIRED))
}
