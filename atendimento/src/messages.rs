//! Textos enviados ao usuário pelo portão de CPF

use crate::gate::MAX_CPF_TRIES;

#[derive(Debug, Clone)]
pub struct GateMessages {
    /// Nome da assistente virtual usado na saudação
    pub assistant_name: String,
    pub company_name: String,
}

impl Default for GateMessages {
    fn default() -> Self {
        Self {
            assistant_name: "Hevelyn".to_string(),
            company_name: "NoLevel".to_string(),
        }
    }
}

impl GateMessages {
    pub fn new(assistant_name: impl Into<String>, company_name: impl Into<String>) -> Self {
        Self {
            assistant_name: assistant_name.into(),
            company_name: company_name.into(),
        }
    }

    pub fn greeting(&self) -> String {
        format!(
            "🌸 Oi! Eu sou a *{}*, sua assistente virtual {}.\n\
             Posso te ajudar com informações ou abrir um chamado se for necessário.\n\n\
             Para começar, por favor, digite seu *CPF* (apenas números).\n\
             Isso é necessário para sua identificação e para que eu possa te ajudar melhor.",
            self.assistant_name, self.company_name
        )
    }

    /// Pedido de nova tentativa; CPF fora da lista recebe texto próprio
    pub fn retry(&self, tries: u32, unauthorized: bool) -> String {
        let reason = if unauthorized {
            "CPF não está na lista de CPFs autorizados."
        } else {
            "CPF inválido."
        };

        format!(
            "⚠️ {} Por favor, digite apenas os 11 números do seu CPF. Tentativa {}/{}.",
            reason, tries, MAX_CPF_TRIES
        )
    }

    pub fn finalized(&self) -> String {
        format!(
            "⚠️ Você não informou um CPF válido após {} tentativas. O atendimento foi finalizado.",
            MAX_CPF_TRIES
        )
    }

    pub fn confirmed(&self) -> String {
        "✅ Obrigado! CPF recebido com sucesso. Agora posso te ajudar com sua solicitação.".to_string()
    }

    pub fn assistant_unavailable(&self) -> String {
        "Tivemos um erro ao processar sua mensagem. Tente novamente mais tarde.".to_string()
    }

    pub fn internal_error(&self) -> String {
        "Erro interno. Tente novamente mais tarde.".to_string()
    }
}
