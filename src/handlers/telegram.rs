use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use std::sync::Arc;
use tokio::time::Instant;

use crate::models::TelegramUpdate;
use crate::utils::logging::*;
use crate::utils::{constant_time_eq, AppError, AppResult};
use crate::AppState;

const SECRET_TOKEN_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

/// Confere o segredo configurado no setWebhook, quando existir
fn verify_secret_token(headers: &HeaderMap, expected: Option<&str>) -> bool {
    let expected = match expected.filter(|s| !s.is_empty()) {
        Some(secret) => secret,
        None => return true,
    };

    headers
        .get(SECRET_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|provided| constant_time_eq(provided.as_bytes(), expected.as_bytes()))
        .unwrap_or(false)
}

/// Webhook do Telegram. Mensagens de texto passam pelo mesmo portão de CPF,
/// com a sessão `telegram:<chat_id>`.
pub async fn handle_telegram(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<(StatusCode, &'static str)> {
    let start_time = Instant::now();
    log_request_received("/api/telegram", "POST");

    if !verify_secret_token(&headers, state.settings.telegram.secret_token.as_deref()) {
        log_warning("❌ Secret token inválido no webhook do Telegram!");
        return Err(AppError::Unauthorized("Invalid Telegram secret token".to_string()));
    }

    // Atualizações que não são texto (stickers, edições, callbacks...) são ignoradas
    let update = serde_json::from_slice::<TelegramUpdate>(&body).ok();
    let (chat_id, text) = match update.as_ref().and_then(TelegramUpdate::chat_text) {
        Some(found) => found,
        None => return Ok((StatusCode::OK, "Ignorado")),
    };

    let client = state
        .telegram
        .as_ref()
        .ok_or_else(|| AppError::ConfigError("TELEGRAM_BOT_TOKEN não configurado".to_string()))?;

    let session_key = format!("telegram:{}", chat_id);
    log_message_received("telegram", &session_key, text);

    let reply = state.gate.handle(&session_key, text).await;
    log_gate_reply(&session_key, &reply.outcome);

    // A sessão já avançou: um status de erro faria o Telegram reentregar a
    // atualização e contar a mesma mensagem duas vezes
    if let Err(e) = client.send_message(chat_id, &reply.response).await {
        log_warning(&format!("⚠️ Resposta não entregue ao Telegram (chat {}): {}", chat_id, e));
        log_request_processed("/api/telegram", 200, start_time.elapsed().as_millis() as u64);
        return Ok((StatusCode::OK, "Falha no envio"));
    }

    log_request_processed("/api/telegram", 200, start_time.elapsed().as_millis() as u64);
    Ok((StatusCode::OK, "Mensagem enviada"))
}
