use axum::{body::Bytes, extract::State, response::Json};
use std::sync::Arc;
use tokio::time::Instant;
use uuid::Uuid;

use crate::models::{WhatsAppRequest, WhatsAppResponse};
use crate::utils::logging::*;
use crate::utils::{AppError, AppResult};
use crate::AppState;

/// Endpoint do portão de CPF: `{message, sessionId}` → `{response}`
pub async fn handle_whatsapp(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> AppResult<Json<WhatsAppResponse>> {
    let start_time = Instant::now();
    let request_id = Uuid::new_v4();
    log_request_received("/api/whatsapp", "POST");

    let payload: WhatsAppRequest = serde_json::from_slice(&body).map_err(|e| {
        log_validation_error("body", &e.to_string());
        AppError::JsonError(e)
    })?;

    if payload.session_id.trim().is_empty() {
        log_validation_error("sessionId", "ausente ou vazio");
        return Err(AppError::ValidationError("sessionId é obrigatório.".to_string()));
    }

    tracing::debug!(%request_id, session = %payload.session_id, "processando mensagem");
    log_message_received("whatsapp", &payload.session_id, &payload.message);

    let reply = state.gate.handle(&payload.session_id, &payload.message).await;
    log_gate_reply(&payload.session_id, &reply.outcome);

    log_request_processed("/api/whatsapp", 200, start_time.elapsed().as_millis() as u64);

    Ok(Json(WhatsAppResponse {
        response: reply.response,
    }))
}
