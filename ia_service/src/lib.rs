//! Serviço de IA usando async-openai
//!
//! Fornece a resposta da assistente virtual para dúvidas de colaboradores
//! sobre chamados internos:
//! - Chat completion (gpt-3.5-turbo por padrão) com prompt de sistema
//! - Quadro de avisos padrão usado como base de conhecimento
//! - Protocolo de chamado (`tk-DDMMYYYYHHMMSSmmm`) para o link de abertura

pub mod avisos;
pub mod prompts;

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use std::error::Error;
use std::fmt;
use std::time::Duration;

pub use avisos::quadro_avisos;
pub use prompts::{generate_protocol, web_chat_system_prompt, whatsapp_system_prompt, PromptContext};

/// Resposta usada quando o modelo devolve conteúdo vazio
pub const EMPTY_REPLY_FALLBACK: &str = "Desculpe, não consegui entender.";

/// Erros do serviço de IA
#[derive(Debug)]
pub enum IaServiceError {
    OpenAIError(String),
    Timeout(u64),
    ConfigError(String),
}

impl fmt::Display for IaServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IaServiceError::OpenAIError(msg) => write!(f, "OpenAI error: {}", msg),
            IaServiceError::Timeout(secs) => write!(f, "OpenAI timeout after {}s", secs),
            IaServiceError::ConfigError(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl Error for IaServiceError {}

pub type IaResult<T> = Result<T, IaServiceError>;

/// Configuração do serviço de IA
#[derive(Clone)]
pub struct IaServiceConfig {
    /// API key da OpenAI
    pub api_key: String,
    /// Endpoint alternativo (proxy, testes)
    pub api_base: Option<String>,
    /// Modelo de chat (padrão: gpt-3.5-turbo)
    pub chat_model: String,
    /// Temperatura (padrão: 0.7)
    pub temperature: f32,
    /// Max tokens da resposta (padrão: 512)
    pub max_tokens: u32,
    /// Tempo máximo de uma chamada em segundos (padrão: 30)
    pub timeout_secs: u64,
}

impl fmt::Debug for IaServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IaServiceConfig")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("chat_model", &self.chat_model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl IaServiceConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            api_base: None,
            chat_model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_tokens: 512,
            timeout_secs: 30,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = model.into();
        self
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = temp;
        self
    }

    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = tokens;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Serviço principal de IA
#[derive(Clone)]
pub struct IaService {
    client: Client<OpenAIConfig>,
    config: IaServiceConfig,
}

impl IaService {
    /// Cria novo serviço de IA
    pub fn new(config: IaServiceConfig) -> IaResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(IaServiceError::ConfigError("OpenAI API key vazia".to_string()));
        }

        let mut openai_config = OpenAIConfig::new().with_api_key(&config.api_key);
        if let Some(ref base) = config.api_base {
            openai_config = openai_config.with_api_base(base);
        }
        let client = Client::with_config(openai_config);

        tracing::info!("✅ IaService inicializado com modelo: {}", config.chat_model);

        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.chat_model
    }

    /// Gera a resposta da assistente para `user_message` sob `system_prompt`.
    ///
    /// Conteúdo vazio vira [`EMPTY_REPLY_FALLBACK`]; falhas de rede, da API ou
    /// timeout viram erro para o chamador decidir a mensagem ao usuário.
    pub async fn generate_reply(&self, system_prompt: &str, user_message: &str) -> IaResult<String> {
        tracing::info!("💬 Gerando resposta com {}", self.config.chat_model);

        let system = ChatCompletionRequestSystemMessageArgs::default()
            .content(system_prompt)
            .build()
            .map_err(|e| IaServiceError::OpenAIError(format!("Failed to build system message: {}", e)))?;

        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(|e| IaServiceError::OpenAIError(format!("Failed to build message: {}", e)))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.chat_model)
            .messages(vec![
                ChatCompletionRequestMessage::System(system),
                ChatCompletionRequestMessage::User(user),
            ])
            .temperature(self.config.temperature)
            .max_tokens(self.config.max_tokens)
            .build()
            .map_err(|e| IaServiceError::OpenAIError(format!("Failed to build request: {}", e)))?;

        let chat = self.client.chat();
        let call = chat.create(request);
        let response = tokio::time::timeout(Duration::from_secs(self.config.timeout_secs), call)
            .await
            .map_err(|_| IaServiceError::Timeout(self.config.timeout_secs))?
            .map_err(|e| IaServiceError::OpenAIError(format!("API call failed: {}", e)))?;

        let reply = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .unwrap_or(EMPTY_REPLY_FALLBACK)
            .to_string();

        tracing::info!("✅ Resposta gerada: {} chars", reply.len());

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_and_builders() {
        let config = IaServiceConfig::new("sk-test".to_string());
        assert_eq!(config.chat_model, "gpt-3.5-turbo");
        assert_eq!(config.max_tokens, 512);
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);

        let config = config
            .with_chat_model("gpt-4o-mini")
            .with_temperature(0.2)
            .with_max_tokens(256)
            .with_timeout_secs(5);
        assert_eq!(config.chat_model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, 256);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = IaServiceConfig::new("sk-secret".to_string());
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_rejects_empty_api_key() {
        assert!(matches!(
            IaService::new(IaServiceConfig::new("   ".to_string())),
            Err(IaServiceError::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_api_is_an_error() {
        let config = IaServiceConfig::new("sk-test".to_string())
            .with_api_base("http://127.0.0.1:9/v1")
            .with_timeout_secs(5);
        let service = IaService::new(config).unwrap();

        let result = service.generate_reply("sistema", "oi").await;

        assert!(result.is_err());
    }
}
