pub mod admin;
pub mod bot;
pub mod health;
pub mod telegram;
pub mod whatsapp;

pub use admin::*;
pub use bot::*;
pub use health::*;
pub use telegram::*;
pub use whatsapp::*;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::require_admin_key;
use crate::AppState;

/// Monta todas as rotas do serviço
pub fn router(state: Arc<AppState>) -> Router {
    let admin_routes = Router::new()
        .route("/admin/sessoes", get(list_sessions))
        .route("/admin/sessoes/:id", delete(delete_session))
        .layer(axum::middleware::from_fn_with_state(state.clone(), require_admin_key))
        .with_state(state.clone());

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .route("/status", get(status_check))
        .route("/api/whatsapp", post(handle_whatsapp))
        .route("/api/telegram", post(handle_telegram))
        .route("/api/bot", post(handle_bot))
        .with_state(state)
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
