use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::utils::logging::*;
use crate::AppState;

pub async fn health_check() -> Json<Value> {
    log_health_check();

    Json(json!({
        "status": "healthy",
        "service": "chamados-bot",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

pub async fn ready_check(State(state): State<Arc<AppState>>) -> Result<Json<Value>, StatusCode> {
    log_integration_status_check();

    // Sem assistente, sessões autenticadas só recebem a mensagem de erro
    let assistant_status = if state.assistant_configured() {
        "configured"
    } else {
        "not_configured"
    };
    let overall_ready = state.assistant_configured();

    let response = json!({
        "ready": overall_ready,
        "service": "chamados-bot",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "dependencies": {
            "openai": {
                "status": assistant_status,
                "model": state.settings.openai.model
            }
        }
    });

    if overall_ready {
        Ok(Json(response))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

pub async fn status_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    log_integration_status_check();

    let active_sessions = state.sessions.len().await;

    Json(json!({
        "service": "chamados-bot",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": state.settings.app.environment,
        "sessions": {
            "active": active_sessions,
            "ttl_minutes": state.settings.sessao.ttl_minutes,
            "eviction_enabled": state.settings.sessao.ttl_minutes > 0
        },
        "cpf": {
            "authorized_count": state.allow_list.len(),
            "max_tries": atendimento::MAX_CPF_TRIES
        },
        "integrations": {
            "openai": {
                "configured": state.assistant_configured(),
                "model": state.settings.openai.model
            },
            "telegram": {
                "configured": state.telegram.is_some(),
                "secret_token_configured": state.settings.telegram.secret_token.is_some()
            },
            "admin": {
                "api_key_configured": state.settings.admin.api_key.is_some()
            }
        }
    }))
}
