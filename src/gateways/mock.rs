use crate::domain::payment::OutboundPayment;
use crate::gateways::{GatewayError, PaymentGateway};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub enum MockBehavior {
    AlwaysSuccess,
    AlwaysUnauthorized,
    AlwaysNotFound,
    AlwaysEmbeddedError,
    /// Answer every call with this 2xx body.
    Reply(Value),
    /// Fail every call with this status and raw body.
    Fail { status: u16, body: String },
}

impl MockBehavior {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "ALWAYS_UNAUTHORIZED" => MockBehavior::AlwaysUnauthorized,
            "ALWAYS_NOT_FOUND" => MockBehavior::AlwaysNotFound,
            "ALWAYS_EMBEDDED_ERROR" => MockBehavior::AlwaysEmbeddedError,
            _ => MockBehavior::AlwaysSuccess,
        }
    }
}

/// In-process stand-in for the provider.
pub struct MockGateway {
    pub behavior: MockBehavior,
    calls: AtomicUsize,
    /// Read back by the router tests to check return/cancel URLs.
    last_created: Mutex<Option<OutboundPayment>>,
}

impl MockGateway {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            last_created: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Last body passed to `create_payment`.
    pub fn last_created(&self) -> Option<OutboundPayment> {
        self.last_created.lock().ok().and_then(|slot| slot.clone())
    }

    fn canned_failure(&self) -> Option<GatewayError> {
        match &self.behavior {
            MockBehavior::AlwaysUnauthorized => Some(GatewayError::Status {
                status: 401,
                body: json!({"status": 401, "message": "Invalid API key"}).to_string(),
            }),
            MockBehavior::AlwaysNotFound => Some(GatewayError::Status {
                status: 404,
                body: json!({"status": 404, "message": "Payment not found"}).to_string(),
            }),
            MockBehavior::Fail { status, body } => Some(GatewayError::Status {
                status: *status,
                body: body.clone(),
            }),
            _ => None,
        }
    }
}

#[async_trait::async_trait]
impl PaymentGateway for MockGateway {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_payment(&self, payment: &OutboundPayment) -> Result<Value, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut slot) = self.last_created.lock() {
            *slot = Some(payment.clone());
        }
        if let Some(err) = self.canned_failure() {
            return Err(err);
        }

        let reply = match &self.behavior {
            MockBehavior::Reply(body) => body.clone(),
            MockBehavior::AlwaysEmbeddedError => json!({
                "error_payment_post_payments": {
                    "status": 400,
                    "http_body": json!({
                        "status": 400,
                        "message": "Mock validation error",
                    })
                    .to_string(),
                }
            }),
            _ => {
                let payment_id = format!("mock_{}", uuid::Uuid::new_v4().simple());
                json!({
                    "payment_id": payment_id,
                    "payment_url": format!("https://khipu.com/payment/info/{payment_id}"),
                    "amount": payment.amount,
                    "currency": payment.currency,
                    "subject": payment.subject,
                    "expires_date": payment.expires_date,
                })
            }
        };

        Ok(reply)
    }

    async fn get_payment(&self, payment_id: &str) -> Result<Value, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.canned_failure() {
            return Err(err);
        }

        let reply = match &self.behavior {
            MockBehavior::Reply(body) => body.clone(),
            _ => json!({
                "payment_id": payment_id,
                "status": "pending",
                "status_detail": "pending",
                "amount": 1000,
                "currency": "CLP",
                "subject": "Mock payment",
                "expires_date": "2026-01-01T00:30:00.000Z",
                "payment_url": format!("https://khipu.com/payment/info/{payment_id}"),
            }),
        };

        Ok(reply)
    }
}
