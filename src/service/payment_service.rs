use crate::domain::payment::{CreatedPayment, OutboundPayment, PaymentStatusView};
use crate::error::ApiError;
use crate::gateways::PaymentGateway;
use crate::service::response_mapper;
use crate::service::validation::{validate_create, validate_payment_id};
use axum::http::{header, HeaderMap, Uri};
use std::sync::Arc;

#[derive(Clone)]
pub struct PaymentService {
    /// `None` when no provider credential was configured.
    pub gateway: Option<Arc<dyn PaymentGateway>>,
    pub public_origin: Option<String>,
}

impl PaymentService {
    pub fn new(gateway: Option<Arc<dyn PaymentGateway>>, public_origin: Option<String>) -> Self {
        Self {
            gateway,
            public_origin,
        }
    }

    /// `request_origin` is the caller's origin as seen by the router; the
    /// configured public origin overrides it.
    pub async fn create(
        &self,
        request_origin: Option<String>,
        headers: &HeaderMap,
        body: &[u8],
    ) -> Result<CreatedPayment, ApiError> {
        let content_type = headers.get(header::CONTENT_TYPE).and_then(|h| h.to_str().ok());
        let req = validate_create(content_type, body)?;
        let gateway = self.gateway()?;

        let origin = self
            .public_origin
            .clone()
            .or(request_origin)
            .unwrap_or_else(|| "http://localhost".to_string());
        let payment = OutboundPayment::new(req, &origin, chrono::Utc::now());
        let reply = gateway
            .create_payment(&payment)
            .await
            .map_err(response_mapper::create_failure)?;

        let created = response_mapper::created_payment(reply)?;
        tracing::info!(
            payment_id = created.payment_id.as_deref().unwrap_or(""),
            gateway = gateway.name(),
            "payment created"
        );
        Ok(created)
    }

    pub async fn status(&self, payment_id: Option<&str>) -> Result<PaymentStatusView, ApiError> {
        let payment_id = validate_payment_id(payment_id)?;
        let gateway = self.gateway()?;

        let reply = gateway
            .get_payment(payment_id)
            .await
            .map_err(response_mapper::status_failure)?;

        response_mapper::payment_status(reply)
    }

    fn gateway(&self) -> Result<&Arc<dyn PaymentGateway>, ApiError> {
        self.gateway.as_ref().ok_or(ApiError::Configuration)
    }
}

/// `<scheme>://<host>` of the caller. `host` comes from axum's `Host`
/// extractor (`Forwarded`, `X-Forwarded-Host`, `Host`, then the URI
/// authority). The scheme follows the same precedence: `Forwarded` proto,
/// then `X-Forwarded-Proto`, then the URI scheme, then `http`.
pub fn request_origin(host: Option<&str>, uri: &Uri, headers: &HeaderMap) -> Option<String> {
    let host = host.map(str::trim).filter(|h| !h.is_empty())?;
    let scheme = forwarded_proto(headers)
        .or_else(|| {
            headers
                .get("x-forwarded-proto")
                .and_then(|h| h.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(|v| v.trim().to_string())
        })
        .filter(|s| !s.is_empty())
        .or_else(|| uri.scheme_str().map(str::to_string))
        .unwrap_or_else(|| "http".to_string());

    Some(format!("{scheme}://{host}"))
}

fn forwarded_proto(headers: &HeaderMap) -> Option<String> {
    let first = headers
        .get(header::FORWARDED)
        .and_then(|h| h.to_str().ok())?
        .split(',')
        .next()?;

    first.split(';').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("proto")
            .then(|| value.trim().trim_matches('"').to_string())
    })
}
