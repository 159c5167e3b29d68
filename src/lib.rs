// Biblioteca do bot de chamados
// Expõe módulos para uso em testes e no binário

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

use atendimento::{InMemorySessionStore, SessionGate, StaticAllowList};
use ia_service::IaService;

// AppState é definido aqui para ser compartilhado
#[derive(Clone)]
pub struct AppState {
    pub settings: config::Settings,
    pub gate: Arc<SessionGate>,
    /// Mesmo store usado pelo gate (listagem administrativa e /status)
    pub sessions: Arc<InMemorySessionStore>,
    pub allow_list: Arc<StaticAllowList>,
    /// Usado diretamente apenas pelo chat web sem sessão
    pub ia_service: Option<Arc<IaService>>,
    pub avisos: Arc<Vec<String>>,
    pub telegram: Option<services::TelegramClient>,
}

impl AppState {
    pub fn assistant_configured(&self) -> bool {
        self.ia_service.is_some()
    }
}
