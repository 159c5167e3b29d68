use axum::{body::Bytes, extract::State, response::Json};
use std::sync::Arc;
use tokio::time::Instant;

use ia_service::web_chat_system_prompt;

use crate::models::{BotRequest, BotResponse};
use crate::utils::logging::*;
use crate::utils::{AppError, AppResult};
use crate::AppState;

/// Chat web sem sessão e sem verificação de CPF
pub async fn handle_bot(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> AppResult<Json<BotResponse>> {
    let start_time = Instant::now();
    log_request_received("/api/bot", "POST");

    let request: BotRequest = serde_json::from_slice(&body).unwrap_or_default();
    let message = request.text().ok_or_else(|| {
        log_validation_error("message", "ausente ou não é texto");
        AppError::ValidationError("Mensagem inválida.".to_string())
    })?;

    let ia = state
        .ia_service
        .as_ref()
        .ok_or_else(|| AppError::ConfigError("API key não configurada.".to_string()))?;

    let avisos = request
        .avisos_text()
        .unwrap_or_else(|| state.avisos.join("\n"));
    let system_prompt = web_chat_system_prompt(&avisos, message);

    let reply = ia.generate_reply(&system_prompt, message).await.map_err(|e| {
        log_assistant_error("web", &e.to_string());
        AppError::AssistantError(e.to_string())
    })?;

    log_request_processed("/api/bot", 200, start_time.elapsed().as_millis() as u64);
    Ok(Json(BotResponse { reply }))
}
