use crate::config::AppConfig;
use crate::domain::payment::OutboundPayment;
use serde_json::Value;
use std::sync::Arc;

pub mod khipu;
pub mod mock;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Non-2xx reply; `body` is the raw response text.
    #[error("provider responded with HTTP {status}")]
    Status { status: u16, body: String },
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Outbound side of the payment provider API. One attempt per call.
#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync {
    fn name(&self) -> &'static str;

    async fn create_payment(&self, payment: &OutboundPayment) -> Result<Value, GatewayError>;

    async fn get_payment(&self, payment_id: &str) -> Result<Value, GatewayError>;
}

/// Picks the adapter named by `PAYMENT_GATEWAY_ADAPTER`. `None` means the
/// provider credential is missing and payment calls answer 500.
pub fn from_config(cfg: &AppConfig) -> anyhow::Result<Option<Arc<dyn PaymentGateway>>> {
    if cfg.gateway_adapter == "MOCK" {
        let gateway: Arc<dyn PaymentGateway> =
            Arc::new(mock::MockGateway::new(mock::MockBehavior::parse(&cfg.mock_behavior)));
        return Ok(Some(gateway));
    }

    let Some(api_key) = cfg.khipu_api_key.clone() else {
        tracing::warn!("KHIPU_API_KEY is not set; payment endpoints will answer 500");
        return Ok(None);
    };

    let gateway: Arc<dyn PaymentGateway> = Arc::new(khipu::KhipuGateway::new(
        &cfg.khipu_base_url,
        api_key,
        reqwest::Client::new(),
    )?);
    Ok(Some(gateway))
}

/// Loggable form of a credential: first 8 and last 4 characters. Short keys
/// are masked entirely.
pub fn redact_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "****".to_string();
    }

    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
