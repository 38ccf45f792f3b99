use khipu_gateway::config::AppConfig;
use khipu_gateway::service::payment_service::PaymentService;
use khipu_gateway::{gateways, router, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();
    let gateway = gateways::from_config(&cfg)?;
    if let Some(gateway) = &gateway {
        tracing::info!(gateway = gateway.name(), "payment gateway configured");
    }

    let state = AppState {
        payment_service: PaymentService::new(gateway, cfg.public_origin.clone()),
    };
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
