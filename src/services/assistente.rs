//! Adaptador entre o portão de CPF e o serviço de IA
//!
//! Monta o prompt de sistema (quadro de avisos + link de chamado com
//! protocolo novo a cada mensagem) e delega ao `IaService`.

use async_trait::async_trait;
use std::sync::Arc;

use atendimento::{Assistant, AssistantError};
use ia_service::{generate_protocol, whatsapp_system_prompt, IaService, PromptContext};

#[derive(Clone)]
pub struct AssistenteChamados {
    ia_service: Option<Arc<IaService>>,
    context: PromptContext,
}

impl AssistenteChamados {
    pub fn new(ia_service: Option<Arc<IaService>>, context: PromptContext) -> Self {
        Self { ia_service, context }
    }

    pub fn is_configured(&self) -> bool {
        self.ia_service.is_some()
    }

    fn system_prompt(&self) -> String {
        let protocolo = generate_protocol(chrono::Local::now().naive_local());
        whatsapp_system_prompt(&self.context, &protocolo)
    }
}

#[async_trait]
impl Assistant for AssistenteChamados {
    async fn reply(&self, message: &str) -> Result<String, AssistantError> {
        let ia = self
            .ia_service
            .as_ref()
            .ok_or_else(|| AssistantError("IaService não configurado (OPENAI_API_KEY ausente)".to_string()))?;

        ia.generate_reply(&self.system_prompt(), message)
            .await
            .map_err(|e| AssistantError(e.to_string()))
    }
}
