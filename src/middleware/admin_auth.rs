//! Middleware de autenticação para endpoints administrativos
//!
//! Valida que a requisição contém um API key válido no header X-Admin-Key.
//! Protege a listagem e remoção de sessões em produção.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::utils::constant_time_eq;
use crate::AppState;

/// Guarda das rotas `/admin/sessoes*`.
///
/// A chave vem de `admin.api_key` (`ADMIN_API_KEY` no deploy) e é comparada
/// em tempo constante com o header `X-Admin-Key`:
///
/// ```bash
/// curl -H "X-Admin-Key: $ADMIN_API_KEY" http://localhost:3000/admin/sessoes
/// ```
///
/// Sem chave configurada, `app.environment = "production"` responde 503 e
/// qualquer outro ambiente libera o acesso com aviso no log.
pub async fn require_admin_key(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    let provided_key = headers
        .get("X-Admin-Key")
        .and_then(|v| v.to_str().ok());

    let expected_key = state
        .settings
        .admin
        .api_key
        .as_deref()
        .filter(|key| !key.is_empty());

    let is_production = state.settings.app.is_production();

    match (expected_key, provided_key, is_production) {
        (Some(expected), Some(provided), _)
            if constant_time_eq(expected.as_bytes(), provided.as_bytes()) =>
        {
            tracing::debug!("🔑 Acesso administrativo liberado: {}", request.uri().path());
            Ok(next.run(request).await)
        }

        (Some(_), provided, _) => {
            tracing::warn!(
                "🔒 Acesso administrativo negado em {} (X-Admin-Key {})",
                request.uri().path(),
                if provided.is_some() { "incorreta" } else { "ausente" }
            );
            Err(unauthorized_response())
        }

        // Sem chave fora de produção: liberado para uso local
        (None, _, false) => {
            tracing::warn!(
                "⚠️ ADMIN_API_KEY ausente; {} liberado fora de produção",
                request.uri().path()
            );
            Ok(next.run(request).await)
        }

        (None, _, true) => {
            tracing::error!("🚨 ADMIN_API_KEY ausente em produção; rotas administrativas fechadas");
            Err(service_unavailable_response())
        }
    }
}

fn unauthorized_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "Chave administrativa ausente ou inválida.",
            "status": 401
        })),
    )
        .into_response()
}

/// Produção sem `ADMIN_API_KEY`: rotas administrativas ficam fechadas
fn service_unavailable_response() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({
            "error": "Rotas administrativas desabilitadas: ADMIN_API_KEY não configurada.",
            "status": 503
        })),
    )
        .into_response()
}
