//! SessionGate: máquina de estados que exige CPF antes de liberar o assistente
//!
//! Cada mensagem é processada com um lock por chave de sessão: leitura,
//! decisão e escrita acontecem como uma unidade. Mensagens duplicadas do
//! mesmo chat (reentrega de webhook) são serializadas; chats diferentes
//! nunca disputam o mesmo lock.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::cpf::{normalize_digits, validate, CpfValidation};
use crate::messages::GateMessages;
use crate::store::{SessionRecord, SessionStep, SessionStore, StoreError};

/// Tentativas de CPF antes de encerrar a sessão
pub const MAX_CPF_TRIES: u32 = 3;

#[derive(Debug, thiserror::Error)]
#[error("assistant failure: {0}")]
pub struct AssistantError(pub String);

/// Assistente externo (modelo de linguagem), chamado apenas na etapa `ok`
#[async_trait]
pub trait Assistant: Send + Sync {
    async fn reply(&self, message: &str) -> Result<String, AssistantError>;
}

/// Fonte da lista de CPFs autorizados (11 dígitos, sem pontuação)
#[async_trait]
pub trait AllowListProvider: Send + Sync {
    async fn authorized_cpfs(&self) -> Arc<HashSet<String>>;
}

/// Lista fixa, normalizada na construção
#[derive(Debug, Clone, Default)]
pub struct StaticAllowList {
    cpfs: Arc<HashSet<String>>,
}

impl StaticAllowList {
    pub fn new<I, S>(cpfs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = HashSet::new();
        for raw in cpfs {
            let digits = normalize_digits(raw.as_ref());
            if digits.len() == 11 {
                set.insert(digits);
            } else {
                tracing::warn!(
                    "⚠️ Entrada ignorada na lista de CPFs autorizados ({} dígitos)",
                    digits.len()
                );
            }
        }

        Self { cpfs: Arc::new(set) }
    }

    pub fn len(&self) -> usize {
        self.cpfs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cpfs.is_empty()
    }
}

#[async_trait]
impl AllowListProvider for StaticAllowList {
    async fn authorized_cpfs(&self) -> Arc<HashSet<String>> {
        Arc::clone(&self.cpfs)
    }
}

/// O que aconteceu com a mensagem
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Greeted,
    CpfRejected { tries: u32, unauthorized: bool },
    SessionClosed,
    Authenticated,
    Assisted,
    AssistantFailed,
    StoreFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateReply {
    pub response: String,
    pub outcome: GateOutcome,
}

impl GateReply {
    fn new(response: String, outcome: GateOutcome) -> Self {
        Self { response, outcome }
    }
}

enum Decision {
    Reply(GateReply),
    Delegate,
}

pub struct SessionGate {
    store: Arc<dyn SessionStore>,
    allow_list: Arc<dyn AllowListProvider>,
    assistant: Arc<dyn Assistant>,
    messages: GateMessages,
    key_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SessionGate {
    pub fn new(
        store: Arc<dyn SessionStore>,
        allow_list: Arc<dyn AllowListProvider>,
        assistant: Arc<dyn Assistant>,
    ) -> Self {
        Self {
            store,
            allow_list,
            assistant,
            messages: GateMessages::default(),
            key_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_messages(mut self, messages: GateMessages) -> Self {
        self.messages = messages;
        self
    }

    pub fn messages(&self) -> &GateMessages {
        &self.messages
    }

    /// Processa uma mensagem recebida e devolve a resposta ao usuário.
    /// Nunca falha: erros viram texto.
    pub async fn handle(&self, session_key: &str, message: &str) -> GateReply {
        let lock = self.key_lock(session_key).await;
        let guard = lock.lock().await;
        let decision = self.advance(session_key, message).await;
        drop(guard);
        self.release_key_lock(session_key, lock).await;

        match decision {
            Ok(Decision::Reply(reply)) => reply,
            // A chamada ao assistente fica fora do lock: não altera a sessão
            Ok(Decision::Delegate) => self.delegate(session_key, message).await,
            Err(e) => {
                tracing::error!("❌ Falha no armazenamento da sessão '{}': {}", session_key, e);
                GateReply::new(self.messages.internal_error(), GateOutcome::StoreFailed)
            }
        }
    }

    /// Estado atual de uma sessão (sem alterar nada)
    pub async fn session(&self, session_key: &str) -> Result<Option<SessionRecord>, StoreError> {
        self.store.get(session_key).await
    }

    /// Descarta a sessão; a próxima mensagem recomeça em `inicio`
    pub async fn reset(&self, session_key: &str) -> Result<bool, StoreError> {
        let lock = self.key_lock(session_key).await;
        let guard = lock.lock().await;
        let result = self.remove(session_key).await;
        drop(guard);
        self.release_key_lock(session_key, lock).await;
        result
    }

    async fn remove(&self, session_key: &str) -> Result<bool, StoreError> {
        if self.store.get(session_key).await?.is_none() {
            return Ok(false);
        }
        self.store.delete(session_key).await?;
        tracing::info!("🗑️ Sessão '{}' descartada", session_key);
        Ok(true)
    }

    async fn advance(&self, session_key: &str, message: &str) -> Result<Decision, StoreError> {
        let mut session = match self.store.get(session_key).await? {
            Some(session) => session,
            None => {
                tracing::info!("🆕 Nova sessão de atendimento: '{}'", session_key);
                SessionRecord::new()
            }
        };

        match session.step {
            SessionStep::Inicio => {
                self.save(session_key, &mut session, SessionStep::CpfPendente).await?;
                Ok(Decision::Reply(GateReply::new(
                    self.messages.greeting(),
                    GateOutcome::Greeted,
                )))
            }
            SessionStep::CpfPendente => self.check_cpf(session_key, session, message).await,
            SessionStep::Autenticado => {
                // mantém a sessão viva para o varredor de TTL
                self.save(session_key, &mut session, SessionStep::Autenticado).await?;
                Ok(Decision::Delegate)
            }
        }
    }

    async fn check_cpf(
        &self,
        session_key: &str,
        mut session: SessionRecord,
        message: &str,
    ) -> Result<Decision, StoreError> {
        let allow_list = self.allow_list.authorized_cpfs().await;

        let unauthorized = match validate(message, &allow_list) {
            CpfValidation::Authorized(cpf) => {
                self.save(session_key, &mut session, SessionStep::Autenticado).await?;
                tracing::info!(
                    "✅ Sessão '{}' autenticada com CPF {}",
                    session_key,
                    cpf.masked()
                );
                return Ok(Decision::Reply(GateReply::new(
                    self.messages.confirmed(),
                    GateOutcome::Authenticated,
                )));
            }
            CpfValidation::Unauthorized(cpf) => {
                tracing::warn!(
                    "🚫 Sessão '{}': CPF {} fora da lista de autorizados",
                    session_key,
                    cpf.masked()
                );
                true
            }
            CpfValidation::Invalid => false,
        };

        session.cpf_tries += 1;

        if session.cpf_tries >= MAX_CPF_TRIES {
            self.store.delete(session_key).await?;
            tracing::warn!(
                "🛑 Sessão '{}' encerrada após {} tentativas de CPF",
                session_key,
                MAX_CPF_TRIES
            );
            return Ok(Decision::Reply(GateReply::new(
                self.messages.finalized(),
                GateOutcome::SessionClosed,
            )));
        }

        let tries = session.cpf_tries;
        self.save(session_key, &mut session, SessionStep::CpfPendente).await?;
        tracing::info!(
            "⚠️ Sessão '{}': CPF rejeitado (tentativa {}/{})",
            session_key,
            tries,
            MAX_CPF_TRIES
        );

        Ok(Decision::Reply(GateReply::new(
            self.messages.retry(tries, unauthorized),
            GateOutcome::CpfRejected { tries, unauthorized },
        )))
    }

    async fn delegate(&self, session_key: &str, message: &str) -> GateReply {
        match self.assistant.reply(message).await {
            Ok(reply) => GateReply::new(reply, GateOutcome::Assisted),
            Err(e) => {
                tracing::error!("❌ Assistente falhou para sessão '{}': {}", session_key, e);
                GateReply::new(
                    self.messages.assistant_unavailable(),
                    GateOutcome::AssistantFailed,
                )
            }
        }
    }

    async fn save(
        &self,
        session_key: &str,
        session: &mut SessionRecord,
        step: SessionStep,
    ) -> Result<(), StoreError> {
        if session.step != step {
            tracing::debug!(
                "🔀 Sessão '{}': {} → {}",
                session_key,
                session.step.as_str(),
                step.as_str()
            );
        }
        session.step = step;
        session.updated_at = Utc::now();
        self.store.put(session_key, session.clone()).await
    }

    async fn key_lock(&self, session_key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.key_locks.lock().await;
        Arc::clone(locks.entry(session_key.to_string()).or_default())
    }

    /// Remove o lock do mapa quando ninguém mais o usa
    async fn release_key_lock(&self, session_key: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.key_locks.lock().await;
        // uma referência no mapa + a nossa
        let unused = Arc::strong_count(&lock) == 2;
        drop(lock);
        if unused {
            locks.remove(session_key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemorySessionStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const AUTHORIZED: &str = "52998224725";
    const VALID_NOT_LISTED: &str = "11144477735";

    struct EchoAssistant {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Assistant for EchoAssistant {
        async fn reply(&self, message: &str) -> Result<String, AssistantError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("eco: {}", message))
        }
    }

    struct FailingAssistant;

    #[async_trait]
    impl Assistant for FailingAssistant {
        async fn reply(&self, _message: &str) -> Result<String, AssistantError> {
            Err(AssistantError("timeout".to_string()))
        }
    }

    /// Store que demora entre leitura e escrita, para expor condições de corrida
    struct SlowStore {
        inner: InMemorySessionStore,
    }

    #[async_trait]
    impl SessionStore for SlowStore {
        async fn get(&self, key: &str) -> Result<Option<SessionRecord>, StoreError> {
            let record = self.inner.get(key).await?;
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(record)
        }

        async fn put(&self, key: &str, record: SessionRecord) -> Result<(), StoreError> {
            self.inner.put(key, record).await
        }

        async fn delete(&self, key: &str) -> Result<(), StoreError> {
            self.inner.delete(key).await
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl SessionStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<SessionRecord>, StoreError> {
            Err(StoreError::Unavailable("redis offline".to_string()))
        }

        async fn put(&self, _key: &str, _record: SessionRecord) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("redis offline".to_string()))
        }

        async fn delete(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("redis offline".to_string()))
        }
    }

    fn gate_with(store: Arc<dyn SessionStore>, assistant: Arc<dyn Assistant>) -> SessionGate {
        SessionGate::new(store, Arc::new(StaticAllowList::new([AUTHORIZED])), assistant)
    }

    fn echo_gate() -> (SessionGate, Arc<InMemorySessionStore>, Arc<EchoAssistant>) {
        let store = Arc::new(InMemorySessionStore::new());
        let assistant = Arc::new(EchoAssistant { calls: AtomicUsize::new(0) });
        let gate = gate_with(store.clone(), assistant.clone());
        (gate, store, assistant)
    }

    async fn record(gate: &SessionGate, key: &str) -> Option<SessionRecord> {
        gate.session(key).await.unwrap()
    }

    #[tokio::test]
    async fn test_first_message_greets_and_asks_cpf() {
        let (gate, _, _) = echo_gate();

        let reply = gate.handle("abc", "oi").await;

        assert_eq!(reply.outcome, GateOutcome::Greeted);
        assert!(reply.response.contains("CPF"));
        assert!(reply.response.contains("Hevelyn"));

        let session = record(&gate, "abc").await.unwrap();
        assert_eq!(session.step, SessionStep::CpfPendente);
        assert_eq!(session.cpf_tries, 0);
    }

    #[tokio::test]
    async fn test_invalid_cpf_counts_attempt() {
        let (gate, _, _) = echo_gate();
        gate.handle("abc", "oi").await;

        let reply = gate.handle("abc", "11111111111").await;

        assert_eq!(
            reply.outcome,
            GateOutcome::CpfRejected { tries: 1, unauthorized: false }
        );
        assert!(reply.response.contains("CPF inválido"));
        assert!(reply.response.contains("Tentativa 1/3"));

        let session = record(&gate, "abc").await.unwrap();
        assert_eq!(session.step, SessionStep::CpfPendente);
        assert_eq!(session.cpf_tries, 1);
    }

    #[tokio::test]
    async fn test_unauthorized_cpf_has_distinct_message() {
        let (gate, _, _) = echo_gate();
        gate.handle("abc", "oi").await;

        let reply = gate.handle("abc", VALID_NOT_LISTED).await;

        assert_eq!(
            reply.outcome,
            GateOutcome::CpfRejected { tries: 1, unauthorized: true }
        );
        assert!(reply.response.contains("não está na lista"));
        assert_eq!(record(&gate, "abc").await.unwrap().cpf_tries, 1);
    }

    #[tokio::test]
    async fn test_three_failures_close_session_and_restart() {
        let (gate, _, assistant) = echo_gate();
        gate.handle("abc", "oi").await;

        gate.handle("abc", "11111111111").await;
        let second = gate.handle("abc", VALID_NOT_LISTED).await;
        assert_eq!(
            second.outcome,
            GateOutcome::CpfRejected { tries: 2, unauthorized: true }
        );

        let third = gate.handle("abc", "123").await;
        assert_eq!(third.outcome, GateOutcome::SessionClosed);
        assert!(third.response.contains("finalizado"));
        assert!(record(&gate, "abc").await.is_none());

        let again = gate.handle("abc", "oi de novo").await;
        assert_eq!(again.outcome, GateOutcome::Greeted);
        let session = record(&gate, "abc").await.unwrap();
        assert_eq!(session.step, SessionStep::CpfPendente);
        assert_eq!(session.cpf_tries, 0);
        assert_eq!(assistant.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_authorized_cpf_promotes_session() {
        let (gate, _, _) = echo_gate();
        gate.handle("abc", "oi").await;
        gate.handle("abc", "000").await;

        let reply = gate.handle("abc", "529.982.247-25").await;

        assert_eq!(reply.outcome, GateOutcome::Authenticated);
        assert!(reply.response.contains("CPF recebido com sucesso"));

        let session = record(&gate, "abc").await.unwrap();
        assert_eq!(session.step, SessionStep::Autenticado);
        assert_eq!(session.cpf_tries, 1);
    }

    #[tokio::test]
    async fn test_cpf_on_first_message_is_not_accepted() {
        let (gate, _, _) = echo_gate();

        let reply = gate.handle("abc", AUTHORIZED).await;

        assert_eq!(reply.outcome, GateOutcome::Greeted);
        assert_eq!(record(&gate, "abc").await.unwrap().step, SessionStep::CpfPendente);
    }

    #[tokio::test]
    async fn test_authenticated_session_passes_through() {
        let (gate, _, assistant) = echo_gate();
        gate.handle("abc", "oi").await;
        gate.handle("abc", AUTHORIZED).await;

        let reply = gate.handle("abc", "Como vejo meu contracheque?").await;

        assert_eq!(reply.outcome, GateOutcome::Assisted);
        assert_eq!(reply.response, "eco: Como vejo meu contracheque?");
        assert_eq!(assistant.calls.load(Ordering::SeqCst), 1);
        assert_eq!(record(&gate, "abc").await.unwrap().step, SessionStep::Autenticado);
    }

    #[tokio::test]
    async fn test_assistant_failure_keeps_session() {
        let store = Arc::new(InMemorySessionStore::new());
        let gate = gate_with(store, Arc::new(FailingAssistant));
        gate.handle("abc", "oi").await;
        gate.handle("abc", AUTHORIZED).await;

        let reply = gate.handle("abc", "preciso de ajuda").await;

        assert_eq!(reply.outcome, GateOutcome::AssistantFailed);
        assert!(reply.response.contains("Tente novamente mais tarde"));
        let session = record(&gate, "abc").await.unwrap();
        assert_eq!(session.step, SessionStep::Autenticado);
        assert_eq!(session.cpf_tries, 0);
    }

    #[tokio::test]
    async fn test_store_failure_becomes_reply() {
        let gate = gate_with(
            Arc::new(BrokenStore),
            Arc::new(EchoAssistant { calls: AtomicUsize::new(0) }),
        );

        let reply = gate.handle("abc", "oi").await;

        assert_eq!(reply.outcome, GateOutcome::StoreFailed);
        assert!(reply.response.contains("Erro interno"));
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let (gate, store, _) = echo_gate();
        gate.handle("chat-a", "oi").await;
        gate.handle("chat-b", "oi").await;

        gate.handle("chat-a", "999").await;
        gate.handle("chat-b", AUTHORIZED).await;

        assert_eq!(record(&gate, "chat-a").await.unwrap().cpf_tries, 1);
        assert_eq!(record(&gate, "chat-b").await.unwrap().step, SessionStep::Autenticado);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_messages_same_session_are_serialized() {
        let store = Arc::new(SlowStore { inner: InMemorySessionStore::new() });
        let gate = Arc::new(gate_with(
            store.clone(),
            Arc::new(EchoAssistant { calls: AtomicUsize::new(0) }),
        ));
        gate.handle("abc", "oi").await;

        let (first, second) = tokio::join!(
            {
                let gate = gate.clone();
                tokio::spawn(async move { gate.handle("abc", "11111111111").await })
            },
            {
                let gate = gate.clone();
                tokio::spawn(async move { gate.handle("abc", "22222222222").await })
            }
        );

        let mut tries: Vec<u32> = [first.unwrap(), second.unwrap()]
            .into_iter()
            .map(|reply| match reply.outcome {
                GateOutcome::CpfRejected { tries, .. } => tries,
                other => panic!("resultado inesperado: {:?}", other),
            })
            .collect();
        tries.sort();

        assert_eq!(tries, vec![1, 2]);
        assert_eq!(store.inner.get("abc").await.unwrap().unwrap().cpf_tries, 2);
        assert!(gate.key_locks.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_reset_discards_session() {
        let (gate, _, _) = echo_gate();
        gate.handle("abc", "oi").await;

        assert!(gate.reset("abc").await.unwrap());
        assert!(!gate.reset("abc").await.unwrap());
        assert_eq!(gate.handle("abc", "oi").await.outcome, GateOutcome::Greeted);
    }

    #[test]
    fn test_static_allow_list_normalizes_entries() {
        let list = StaticAllowList::new(["529.982.247-25", "123456", "111.444.777-35"]);
        assert_eq!(list.len(), 2);
        assert!(list.cpfs.contains("52998224725"));
        assert!(list.cpfs.contains("11144477735"));
    }
}
