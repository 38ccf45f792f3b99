use crate::domain::payment::OutboundPayment;
use crate::gateways::{redact_key, GatewayError, PaymentGateway};
use reqwest::header::ACCEPT;
use reqwest::Url;
use serde_json::Value;

pub struct KhipuGateway {
    payments_url: Url,
    api_key: String,
    client: reqwest::Client,
}

impl KhipuGateway {
    pub fn new(base_url: &str, api_key: impl Into<String>, client: reqwest::Client) -> anyhow::Result<Self> {
        let mut payments_url = Url::parse(base_url)?;
        payments_url
            .path_segments_mut()
            .map_err(|_| anyhow::anyhow!("provider base url cannot carry a path: {base_url}"))?
            .pop_if_empty()
            .extend(["v3", "payments"]);

        Ok(Self {
            payments_url,
            api_key: api_key.into(),
            client,
        })
    }

    pub fn payments_url(&self) -> &Url {
        &self.payments_url
    }

    async fn read_reply(resp: reqwest::Response) -> Result<Value, GatewayError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "khipu error response");
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await?;
        tracing::debug!(status = status.as_u16(), body = %body, "khipu response");
        Ok(serde_json::from_str(&body)?)
    }
}

impl std::fmt::Debug for KhipuGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KhipuGateway")
            .field("payments_url", &self.payments_url.as_str())
            .field("api_key", &redact_key(&self.api_key))
            .finish()
    }
}

#[async_trait::async_trait]
impl PaymentGateway for KhipuGateway {
    fn name(&self) -> &'static str {
        "khipu"
    }

    async fn create_payment(&self, payment: &OutboundPayment) -> Result<Value, GatewayError> {
        tracing::info!(
            url = %self.payments_url,
            amount = %payment.amount,
            currency = payment.currency.as_deref().unwrap_or(""),
            subject = %payment.subject,
            "creating khipu payment"
        );
        let payload = serde_json::to_string(payment)?;
        tracing::debug!(api_key = %redact_key(&self.api_key), payload = %payload, "khipu request");

        let resp = self
            .client
            .post(self.payments_url.clone())
            .header("x-api-key", &self.api_key)
            .header(ACCEPT, "application/json")
            .json(payment)
            .send()
            .await?;

        Self::read_reply(resp).await
    }

    async fn get_payment(&self, payment_id: &str) -> Result<Value, GatewayError> {
        let mut url = self.payments_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(payment_id);
        }
        tracing::info!(payment_id = %payment_id, "fetching khipu payment status");

        let resp = self
            .client
            .get(url)
            .header("x-api-key", &self.api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        Self::read_reply(resp).await
    }
}
