use axum::body::Body;
use axum::http::{Request, StatusCode};
use khipu_gateway::gateways::mock::{MockBehavior, MockGateway};
use khipu_gateway::gateways::PaymentGateway;
use khipu_gateway::service::payment_service::PaymentService;
use khipu_gateway::{router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app_with(gateway: Option<Arc<MockGateway>>) -> axum::Router {
    let gateway = gateway.map(|g| g as Arc<dyn PaymentGateway>);
    router(AppState {
        payment_service: PaymentService::new(gateway, None),
    })
}

async fn post(app: axum::Router, content_type: Option<&str>, body: &str) -> (StatusCode, Value) {
    let mut req = Request::builder()
        .method("POST")
        .uri("/api/create-payment")
        .header("host", "shop.example");
    if let Some(ct) = content_type {
        req = req.header("content-type", ct);
    }

    let resp = app.oneshot(req.body(Body::from(body.to_string())).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn rejects_non_json_content_type() {
    let gateway = Arc::new(MockGateway::new(MockBehavior::AlwaysSuccess));
    let body = r#"{"amount": 1000, "currency": "CLP", "subject": "Test"}"#;

    let (status, out) = post(app_with(Some(gateway.clone())), Some("text/plain"), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(out["error"], "Content-Type must be application/json");

    let (status, _) = post(app_with(Some(gateway.clone())), None, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn rejects_empty_and_malformed_bodies() {
    let gateway = Arc::new(MockGateway::new(MockBehavior::AlwaysSuccess));

    let (status, out) = post(app_with(Some(gateway.clone())), Some("application/json"), "  \n").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(out["error"], "Request body is empty");

    let (status, out) = post(app_with(Some(gateway.clone())), Some("application/json"), "{amount: 1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(out["error"], "Invalid JSON in request body");

    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn rejects_non_positive_or_missing_amount() {
    let gateway = Arc::new(MockGateway::new(MockBehavior::AlwaysSuccess));
    let bodies = [
        json!({"amount": 0, "currency": "CLP", "subject": "Test"}),
        json!({"amount": -10, "currency": "CLP", "subject": "Test"}),
        json!({"amount": -0.5, "currency": "CLP", "subject": "Test"}),
        json!({"amount": "1000", "currency": "CLP", "subject": "Test"}),
        json!({"currency": "CLP", "subject": "Test"}),
    ];

    for body in bodies {
        let (status, out) = post(
            app_with(Some(gateway.clone())),
            Some("application/json"),
            &body.to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(out["error"], "Amount must be greater than 0");
    }
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn rejects_blank_or_missing_subject() {
    let gateway = Arc::new(MockGateway::new(MockBehavior::AlwaysSuccess));
    let bodies = [
        json!({"amount": 1000, "currency": "CLP", "subject": "   "}),
        json!({"amount": 1000, "currency": "CLP", "subject": ""}),
        json!({"amount": 1000, "currency": "CLP"}),
    ];

    for body in bodies {
        let (status, out) = post(
            app_with(Some(gateway.clone())),
            Some("application/json"),
            &body.to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(out["error"], "Subject is required");
    }
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn missing_credential_is_a_server_error() {
    let (status, out) = post(
        app_with(None),
        Some("application/json"),
        r#"{"amount": 1000, "currency": "CLP", "subject": "Test"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(out["error"], "Payment provider API key not configured");
}

#[tokio::test]
async fn returns_provider_fields_on_success() {
    let gateway = Arc::new(MockGateway::new(MockBehavior::Reply(json!({
        "payment_id": "abc123",
        "payment_url": "https://pay.example/abc123",
        "amount": 1000,
        "currency": "CLP",
        "subject": "Test",
        "simplified_transfer_url": "https://pay.example/abc123/simplified",
        "ready_for_terminal": false
    }))));

    let (status, out) = post(
        app_with(Some(gateway.clone())),
        Some("application/json; charset=utf-8"),
        r#"{"amount": 1000, "currency": "CLP", "subject": "Test"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        out,
        json!({
            "payment_id": "abc123",
            "payment_url": "https://pay.example/abc123",
            "amount": 1000,
            "currency": "CLP",
            "subject": "Test"
        })
    );
    assert_eq!(gateway.calls(), 1);
}

#[tokio::test]
async fn outbound_payment_carries_origin_urls_and_trimmed_subject() {
    let gateway = Arc::new(MockGateway::new(MockBehavior::AlwaysSuccess));

    let (status, _) = post(
        app_with(Some(gateway.clone())),
        Some("application/json"),
        r#"{"amount": 1500, "currency": "CLP", "subject": "  Order 42  "}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let sent = gateway.last_created().unwrap();
    assert_eq!(sent.subject, "Order 42");
    assert_eq!(sent.currency.as_deref(), Some("CLP"));
    assert_eq!(sent.amount.as_u64(), Some(1500));
    assert_eq!(sent.return_url, "http://shop.example/payment-success");
    assert_eq!(sent.cancel_url, "http://shop.example/payment-cancelled");
}

#[tokio::test]
async fn configured_public_origin_wins_over_host_header() {
    let gateway = Arc::new(MockGateway::new(MockBehavior::AlwaysSuccess));
    let app = router(AppState {
        payment_service: PaymentService::new(
            Some(gateway.clone() as Arc<dyn PaymentGateway>),
            Some("https://store.example".to_string()),
        ),
    });

    let (status, _) = post(
        app,
        Some("application/json"),
        r#"{"amount": 10, "currency": "USD", "subject": "Test"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        gateway.last_created().unwrap().return_url,
        "https://store.example/payment-success"
    );
}

#[tokio::test]
async fn provider_unauthorized_maps_to_invalid_credentials() {
    let gateway = Arc::new(MockGateway::new(MockBehavior::AlwaysUnauthorized));

    let (status, out) = post(
        app_with(Some(gateway)),
        Some("application/json"),
        r#"{"amount": 1000, "currency": "CLP", "subject": "Test"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(out["error"], "Failed to create payment");
    assert_eq!(out["details"], "Invalid credentials");
}

#[tokio::test]
async fn other_provider_failures_pass_status_through() {
    let gateway = Arc::new(MockGateway::new(MockBehavior::Fail {
        status: 503,
        body: "upstream maintenance".to_string(),
    }));

    let (status, out) = post(
        app_with(Some(gateway)),
        Some("application/json"),
        r#"{"amount": 1000, "currency": "CLP", "subject": "Test"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(out["details"], "Service unavailable");
    assert_eq!(out["provider_error"], "upstream maintenance");
}

#[tokio::test]
async fn embedded_error_in_success_reply_is_a_bad_request() {
    let gateway = Arc::new(MockGateway::new(MockBehavior::Reply(json!({
        "error_payment_post_payments": {
            "status": 400,
            "http_body": "{\"status\":400,\"message\":\"amount exceeds limit\"}"
        }
    }))));

    let (status, out) = post(
        app_with(Some(gateway)),
        Some("application/json"),
        r#"{"amount": 99999999, "currency": "CLP", "subject": "Test"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(out["error"], "Failed to create payment");
    assert_eq!(out["details"], "amount exceeds limit");
    assert_eq!(out["provider_error"]["status"], 400);
}

async fn return_url_for(builder: axum::http::request::Builder) -> String {
    let gateway = Arc::new(MockGateway::new(MockBehavior::AlwaysSuccess));
    let req = builder
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"amount": 1000, "currency": "CLP", "subject": "Test"}"#))
        .unwrap();

    let resp = app_with(Some(gateway.clone())).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    gateway.last_created().unwrap().return_url
}

#[tokio::test]
async fn origin_comes_from_uri_authority_without_host_header() {
    let url = return_url_for(Request::builder().uri("https://shop.example/api/create-payment")).await;
    assert_eq!(url, "https://shop.example/payment-success");
}

#[tokio::test]
async fn origin_follows_forwarded_host_behind_a_proxy() {
    let url = return_url_for(
        Request::builder()
            .uri("/api/create-payment")
            .header("host", "10.0.0.5:3000")
            .header("x-forwarded-host", "shop.example")
            .header("x-forwarded-proto", "https"),
    )
    .await;
    assert_eq!(url, "https://shop.example/payment-success");
}

#[tokio::test]
async fn origin_follows_forwarded_header() {
    let url = return_url_for(
        Request::builder()
            .uri("/api/create-payment")
            .header("host", "10.0.0.5:3000")
            .header("forwarded", "for=192.0.2.60;proto=https;host=store.example"),
    )
    .await;
    assert_eq!(url, "https://store.example/payment-success");
}

#[tokio::test]
async fn origin_falls_back_to_localhost() {
    let url = return_url_for(Request::builder().uri("/api/create-payment")).await;
    assert_eq!(url, "http://localhost/payment-success");
}
