use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("Payment provider API key not configured")]
    Configuration,
    #[error("{error}: {details}")]
    Upstream {
        status: StatusCode,
        error: &'static str,
        details: String,
        status_code: Option<u16>,
        provider_error: Option<Value>,
    },
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_error: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Configuration | ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream { status, .. } => *status,
        }
    }

    pub fn body(&self) -> ErrorBody {
        let bare = |error: String| ErrorBody {
            error,
            details: None,
            status_code: None,
            provider_error: None,
            message: None,
        };

        match self {
            ApiError::Validation(msg) => bare(msg.to_string()),
            ApiError::Configuration => bare(self.to_string()),
            ApiError::Upstream {
                error,
                details,
                status_code,
                provider_error,
                ..
            } => ErrorBody {
                error: error.to_string(),
                details: Some(details.clone()),
                status_code: *status_code,
                provider_error: provider_error.clone(),
                message: None,
            },
            ApiError::Unexpected(e) => ErrorBody {
                message: Some(e.to_string()),
                ..bare("Internal server error".to_string())
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Validation(msg) => tracing::debug!(reason = %msg, "rejected request"),
            ApiError::Upstream { details, .. } => {
                tracing::warn!(status = status.as_u16(), details = %details, "payment provider call failed")
            }
            ApiError::Configuration | ApiError::Unexpected(_) => {
                tracing::error!(error = %self, "request failed")
            }
        }

        (status, Json(self.body())).into_response()
    }
}
