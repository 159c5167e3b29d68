//! Armazenamento de sessões de atendimento
//!
//! O portão só conhece a interface `SessionStore` (get/put/delete). A
//! implementação em memória acompanha um varredor opcional que remove
//! sessões ociosas (TTL).

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Etapa da conversa
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStep {
    Inicio,
    CpfPendente,
    /// CPF confirmado; mensagens vão para o assistente
    #[serde(rename = "ok")]
    Autenticado,
}

impl SessionStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStep::Inicio => "inicio",
            SessionStep::CpfPendente => "cpf_pendente",
            SessionStep::Autenticado => "ok",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub step: SessionStep,
    pub cpf_tries: u32,
    pub updated_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new() -> Self {
        Self {
            step: SessionStep::Inicio,
            cpf_tries: 0,
            updated_at: Utc::now(),
        }
    }
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<SessionRecord>, StoreError>;
    async fn put(&self, key: &str, record: SessionRecord) -> Result<(), StoreError>;
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Sessões em memória (perdidas ao reiniciar o processo)
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionRecord>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Cópia de todas as sessões, ordenada pela chave
    pub async fn snapshot(&self) -> Vec<(String, SessionRecord)> {
        let sessions = self.sessions.read().await;
        let mut all: Vec<(String, SessionRecord)> = sessions
            .iter()
            .map(|(key, record)| (key.clone(), record.clone()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    /// Remove sessões sem atividade há mais de `ttl`. Retorna quantas saíram.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        let now = Utc::now();

        sessions.retain(|_, record| now - record.updated_at < ttl);

        before - sessions.len()
    }

    /// Inicia o varredor de sessões ociosas
    pub fn start_sweeper(self: Arc<Self>, ttl: Duration, every: std::time::Duration) -> JoinHandle<()> {
        tracing::info!(
            "🕐 Varredor de sessões iniciado: TTL {} min, verificação a cada {}s",
            ttl.num_minutes(),
            every.as_secs()
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);

            loop {
                interval.tick().await;

                let evicted = self.evict_idle(ttl).await;
                if evicted > 0 {
                    tracing::info!("🧹 {} sessões ociosas removidas", evicted);
                } else {
                    tracing::trace!("🔍 Nenhuma sessão ociosa");
                }
            }
        })
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<SessionRecord>, StoreError> {
        Ok(self.sessions.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, record: SessionRecord) -> Result<(), StoreError> {
        self.sessions.write().await.insert(key.to_string(), record);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.sessions.write().await.remove(key);
        Ok(())
    }
}
