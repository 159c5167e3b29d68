use serde::{Deserialize, Serialize};
use config::{Config, ConfigError, Environment, File};

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub sessao: SessaoSettings,
    #[serde(default)]
    pub cpf: CpfSettings,
    #[serde(default)]
    pub openai: OpenAISettings,
    #[serde(default)]
    pub telegram: TelegramSettings,
    #[serde(default)]
    pub admin: AdminSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AppSettings {
    /// development | production
    pub environment: String,
    /// URL pública do portal de chamados (link enviado pela assistente)
    pub public_url: String,
    pub assistant_name: String,
    pub company_name: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            public_url: "http://localhost:3000".to_string(),
            assistant_name: "Hevelyn".to_string(),
            company_name: "NoLevel".to_string(),
        }
    }
}

impl AppSettings {
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SessaoSettings {
    /// Minutos sem mensagens até a sessão ser descartada (0 = nunca)
    pub ttl_minutes: u64,
    pub cleanup_interval_seconds: u64,
}

impl Default for SessaoSettings {
    fn default() -> Self {
        Self {
            ttl_minutes: 0,
            cleanup_interval_seconds: 60,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct CpfSettings {
    /// CPFs autorizados (com ou sem pontuação)
    pub autorizados: Vec<String>,
    /// YAML com a lista de colaboradores (`colaboradores: [{nome, cpf, setor}]`)
    pub arquivo_colaboradores: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct OpenAISettings {
    pub api_key: Option<String>,
    pub api_base: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
}

impl Default for OpenAISettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: None,
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_tokens: 512,
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TelegramSettings {
    pub bot_token: Option<String>,
    pub api_url: String,
    /// Valor esperado em X-Telegram-Bot-Api-Secret-Token (opcional)
    pub secret_token: Option<String>,
}

impl Default for TelegramSettings {
    fn default() -> Self {
        Self {
            bot_token: None,
            api_url: "https://api.telegram.org".to_string(),
            secret_token: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AdminSettings {
    /// Chave exigida em X-Admin-Key para /admin/*
    pub api_key: Option<String>,
}

/// Variáveis `CHAMADOS__<SECAO>__<CAMPO>`; `CPF__AUTORIZADOS` aceita lista separada por vírgula
fn environment_source() -> Environment {
    Environment::with_prefix("CHAMADOS")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("cpf.autorizados")
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            // Arquivo de configuração base
            .add_source(File::with_name("config/default").required(false))
            // Arquivo específico do ambiente
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // CHAMADOS__OPENAI__MODEL=gpt-4o-mini etc.
            .add_source(environment_source());

        // Variáveis "clássicas" usadas no deploy
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            builder = builder.set_override("openai.api_key", key)?;
        }
        if let Ok(token) = std::env::var("TELEGRAM_BOT_TOKEN") {
            builder = builder.set_override("telegram.bot_token", token)?;
        }
        if let Ok(key) = std::env::var("ADMIN_API_KEY") {
            builder = builder.set_override("admin.api_key", key)?;
        }
        if let Ok(url) = std::env::var("NEXT_PUBLIC_URL") {
            builder = builder.set_override("app.public_url", url)?;
        }
        if let Ok(env) = std::env::var("RUST_ENV") {
            builder = builder.set_override("app.environment", env)?;
        }

        let s = builder.build()?;

        s.try_deserialize()
    }

    /// Chave não vazia, se configurada
    pub fn openai_api_key(&self) -> Option<&str> {
        self.openai
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }

    pub fn telegram_bot_token(&self) -> Option<&str> {
        self.telegram
            .bot_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
    }
}
