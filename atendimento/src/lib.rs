//! Atendimento: portão de identificação por CPF para conversas via mensageria
//!
//! Cada conversa (chave de sessão = chat/telefone) passa por três etapas:
//!   1. `inicio`: primeira mensagem → saudação + pedido de CPF
//!   2. `cpf_pendente`: aguarda um CPF válido E autorizado (máximo 3 tentativas)
//!   3. `ok`: mensagens seguem direto para o assistente externo
//!
//! Após 3 tentativas inválidas a sessão é removida e a próxima mensagem
//! recomeça do zero.
//!
//! Exemplo:
//! ```text
//! "oi"            -> saudação, pede CPF           (cpf_pendente, 0 tentativas)
//! "11111111111"   -> "CPF inválido... 1/3"        (cpf_pendente, 1 tentativa)
//! "529.982.247-25"-> "CPF recebido com sucesso"   (ok)
//! "meu holerite?" -> resposta do assistente
//! ```

pub mod cpf;
pub mod gate;
pub mod messages;
pub mod store;

pub use cpf::{is_structurally_valid, normalize_digits, validate, Cpf, CpfValidation, InvalidCpf};
pub use gate::{
    AllowListProvider, Assistant, AssistantError, GateOutcome, GateReply, SessionGate,
    StaticAllowList, MAX_CPF_TRIES,
};
pub use messages::GateMessages;
pub use store::{InMemorySessionStore, SessionRecord, SessionStep, SessionStore, StoreError};
