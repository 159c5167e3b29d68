//! Bot de chamados: portão de CPF + assistente virtual
//!
//! Fluxo:
//! - Canais (WhatsApp, Telegram) entregam mensagens com uma chave de sessão
//! - O portão exige CPF válido e autorizado (3 tentativas)
//! - Sessões autenticadas são respondidas pela OpenAI com o quadro de avisos
//!
//! Sessões ficam em memória; com `sessao.ttl_minutes > 0` as ociosas expiram.

use anyhow::Context;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use atendimento::{GateMessages, InMemorySessionStore, SessionGate, StaticAllowList};
use chamados_bot::{
    config::{Colaboradores, Settings},
    handlers,
    services::{AssistenteChamados, TelegramClient},
    utils::logging::*,
    AppState,
};
use ia_service::{quadro_avisos, IaService, IaServiceConfig, PromptContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env é opcional (em produção as variáveis vêm do ambiente)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::new().context("Falha ao carregar configuração")?;
    log_config_loaded(&settings.app.environment);

    // Lista de CPFs autorizados: configuração + arquivo de colaboradores
    let mut cpfs = settings.cpf.autorizados.clone();
    let mut from_file = 0;
    if let Some(path) = settings.cpf.arquivo_colaboradores.as_deref() {
        match Colaboradores::load_from_file(path).await {
            Ok(colaboradores) => {
                let file_cpfs = colaboradores.cpfs();
                from_file = file_cpfs.len();
                cpfs.extend(file_cpfs);
            }
            Err(e) => {
                log_warning(&format!("⚠️ Arquivo de colaboradores não carregado: {}", e));
            }
        }
    }
    let allow_list = Arc::new(StaticAllowList::new(cpfs));
    log_allow_list_loaded(allow_list.len(), from_file);
    if allow_list.is_empty() {
        log_warning("⚠️ Nenhum CPF autorizado configurado: todas as sessões serão recusadas");
    }

    let sessions = Arc::new(InMemorySessionStore::new());
    if settings.sessao.ttl_minutes > 0 {
        let ttl = chrono::Duration::minutes(settings.sessao.ttl_minutes as i64);
        let every = std::time::Duration::from_secs(settings.sessao.cleanup_interval_seconds.max(1));
        sessions.clone().start_sweeper(ttl, every);
    } else {
        log_info("ℹ️  Expiração de sessões desabilitada (sessao.ttl_minutes = 0)");
    }

    let ia_service = match settings.openai_api_key() {
        Some(api_key) => {
            let mut config = IaServiceConfig::new(api_key.to_string())
                .with_chat_model(settings.openai.model.clone())
                .with_temperature(settings.openai.temperature)
                .with_max_tokens(settings.openai.max_tokens)
                .with_timeout_secs(settings.openai.timeout_seconds);
            if let Some(api_base) = settings.openai.api_base.as_deref() {
                config = config.with_api_base(api_base);
            }

            match IaService::new(config) {
                Ok(service) => {
                    log_info(&format!("✅ IaService inicializado (modelo {})", service.model()));
                    Some(Arc::new(service))
                }
                Err(e) => {
                    log_warning(&format!("⚠️ Falha ao inicializar IaService: {}. Serviço desabilitado.", e));
                    None
                }
            }
        }
        None => {
            log_warning("⚠️ OPENAI_API_KEY não configurada. IaService desabilitado.");
            None
        }
    };

    let avisos = Arc::new(quadro_avisos());
    let assistente = AssistenteChamados::new(
        ia_service.clone(),
        PromptContext {
            assistant_name: settings.app.assistant_name.clone(),
            public_url: settings.app.public_url.clone(),
            avisos: avisos.as_ref().clone(),
        },
    );

    let gate = SessionGate::new(sessions.clone(), allow_list.clone(), Arc::new(assistente))
        .with_messages(GateMessages::new(
            settings.app.assistant_name.clone(),
            settings.app.company_name.clone(),
        ));

    let telegram = match settings.telegram_bot_token() {
        Some(token) => Some(
            TelegramClient::new(&settings.telegram.api_url, token)
                .context("Falha ao criar cliente do Telegram")?,
        ),
        None => {
            log_info("ℹ️  TELEGRAM_BOT_TOKEN não configurado. Webhook do Telegram desabilitado.");
            None
        }
    };

    let app_state = Arc::new(AppState {
        settings: settings.clone(),
        gate: Arc::new(gate),
        sessions,
        allow_list,
        ia_service,
        avisos,
        telegram,
    });

    let app = handlers::router(app_state);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(settings.server.port);
    log_server_startup(port);

    let listener = TcpListener::bind(format!("{}:{}", settings.server.host, port))
        .await
        .with_context(|| format!("Falha ao abrir a porta {}", port))?;
    log_server_ready(port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Servidor encerrado com erro")?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    log_info("🛑 Sinal de encerramento recebido, finalizando servidor");
}
