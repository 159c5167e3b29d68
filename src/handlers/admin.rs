use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::utils::logging::*;
use crate::utils::{AppError, AppResult};
use crate::AppState;

/// Lista as sessões ativas (etapa, tentativas e última atividade)
pub async fn list_sessions(State(state): State<Arc<AppState>>) -> Json<Value> {
    log_request_received("/admin/sessoes", "GET");

    let sessions: Vec<Value> = state
        .sessions
        .snapshot()
        .await
        .into_iter()
        .map(|(session_id, record)| {
            json!({
                "session_id": session_id,
                "step": record.step,
                "cpf_tries": record.cpf_tries,
                "updated_at": record.updated_at.to_rfc3339()
            })
        })
        .collect();

    Json(json!({
        "success": true,
        "count": sessions.len(),
        "sessions": sessions,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Descarta uma sessão; a próxima mensagem dela recomeça do cumprimento
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> AppResult<Json<Value>> {
    log_request_received("/admin/sessoes/:id", "DELETE");

    if !state.gate.reset(&session_id).await? {
        return Err(AppError::NotFound(format!("Sessão '{}' não encontrada", session_id)));
    }

    log_info(&format!("🗑️ Sessão '{}' removida via admin", session_id));
    Ok(Json(json!({
        "success": true,
        "session_id": session_id
    })))
}
