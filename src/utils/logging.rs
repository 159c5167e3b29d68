use tracing::{info, warn, error, debug};

use super::text::loggable_message;

pub fn log_request_received(endpoint: &str, method: &str) {
    info!("Request received: {} {}", method, endpoint);
}

pub fn log_request_processed(endpoint: &str, status: u16, duration_ms: u64) {
    info!("Request processed: {} - Status: {} - Duration: {}ms",
          endpoint, status, duration_ms);
}

pub fn log_message_received(channel: &str, session_key: &str, message: &str) {
    info!("📩 [{}] Mensagem de '{}': {}", channel, session_key, loggable_message(message, 80));
}

pub fn log_gate_reply(session_key: &str, outcome: &atendimento::GateOutcome) {
    debug!("📤 Sessão '{}' respondida: {:?}", session_key, outcome);
}

pub fn log_assistant_error(context: &str, error: &str) {
    error!("❌ Erro ao gerar resposta ({}): {}", context, error);
}

pub fn log_telegram_sent(chat_id: i64) {
    info!("✈️ Resposta enviada ao Telegram (chat {})", chat_id);
}

pub fn log_telegram_error(chat_id: i64, error: &str) {
    error!("Telegram API error: chat {} - Error: {}", chat_id, error);
}

pub fn log_allow_list_loaded(total: usize, from_file: usize) {
    info!("🪪 Lista de CPFs autorizados: {} CPFs ({} do arquivo de colaboradores)", total, from_file);
}

pub fn log_config_loaded(env: &str) {
    info!("Configuration loaded successfully for environment: {}", env);
}

pub fn log_server_startup(port: u16) {
    info!("🚀 Chamados bot server starting on port {}", port);
}

pub fn log_server_ready(port: u16) {
    info!("✅ Server ready and listening on http://0.0.0.0:{}", port);
}

pub fn log_health_check() {
    debug!("Health check requested");
}

pub fn log_integration_status_check() {
    debug!("Integration status check requested");
}

pub fn log_validation_error(field: &str, message: &str) {
    warn!("Validation error: {} - {}", field, message);
}

pub fn log_info(message: &str) {
    info!("{}", message);
}

pub fn log_warning(message: &str) {
    warn!("{}", message);
}
