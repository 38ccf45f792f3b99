#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub khipu_base_url: String,
    pub khipu_api_key: Option<String>,
    pub public_origin: Option<String>,
    pub gateway_adapter: String,
    pub mock_behavior: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            khipu_base_url: std::env::var("KHIPU_BASE_URL")
                .unwrap_or_else(|_| "https://payment-api.khipu.com".to_string()),
            khipu_api_key: non_blank_var("KHIPU_API_KEY"),
            public_origin: non_blank_var("PUBLIC_ORIGIN")
                .map(|origin| origin.trim_end_matches('/').to_string()),
            gateway_adapter: std::env::var("PAYMENT_GATEWAY_ADAPTER")
                .unwrap_or_else(|_| "KHIPU".to_string())
                .to_uppercase(),
            mock_behavior: std::env::var("MOCK_BEHAVIOR")
                .unwrap_or_else(|_| "ALWAYS_SUCCESS".to_string()),
        }
    }
}

fn non_blank_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
