use crate::service::payment_service::request_origin;
use crate::AppState;
use axum::body::Bytes;
use axum::extract::{Host, Path, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Json;

pub async fn create_payment(
    State(state): State<AppState>,
    host: Option<Host>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let origin = request_origin(host.as_ref().map(|Host(h)| h.as_str()), &uri, &headers);
    match state.payment_service.create(origin, &headers, &body).await {
        Ok(resp) => (StatusCode::OK, Json(resp)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Also mounted without the `{id}` segment so a missing id answers 400.
pub async fn payment_status(
    State(state): State<AppState>,
    payment_id: Option<Path<String>>,
) -> impl IntoResponse {
    let payment_id = payment_id.map(|Path(id)| id);
    match state.payment_service.status(payment_id.as_deref()).await {
        Ok(resp) => (StatusCode::OK, Json(resp)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
