use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Minutes a freshly created payment stays payable at the provider.
pub const PAYMENT_TTL_MINUTES: i64 = 30;

/// Caller input for a new payment, already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub amount: Number,
    pub currency: Option<String>,
    pub subject: String,
}

/// Body of `POST /v3/payments`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundPayment {
    pub amount: Number,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub subject: String,
    pub return_url: String,
    pub cancel_url: String,
    pub expires_date: String,
}

impl OutboundPayment {
    pub fn new(req: PaymentRequest, origin: &str, now: DateTime<Utc>) -> Self {
        let origin = origin.trim_end_matches('/');
        Self {
            amount: req.amount,
            currency: req.currency,
            subject: req.subject,
            return_url: format!("{origin}/payment-success"),
            cancel_url: format!("{origin}/payment-cancelled"),
            expires_date: (now + Duration::minutes(PAYMENT_TTL_MINUTES))
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    Pending,
    Verifying,
    Done,
    /// Any status the provider adds later, kept verbatim.
    Other(String),
}

impl From<String> for PaymentStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => PaymentStatus::Pending,
            "verifying" => PaymentStatus::Verifying,
            "done" => PaymentStatus::Done,
            _ => PaymentStatus::Other(s),
        }
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Pending => "pending".to_string(),
            PaymentStatus::Verifying => "verifying".to_string(),
            PaymentStatus::Done => "done".to_string(),
            PaymentStatus::Other(s) => s,
        }
    }
}

/// Local reply of `POST /api/create-payment`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedPayment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

/// Local reply of `GET /api/payment-status/{id}`. Provider fields outside
/// this set are dropped on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentStatusView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conciliation_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_url: Option<String>,
}
