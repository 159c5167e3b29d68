use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use crate::utils::{AppError, AppResult};
use crate::utils::logging::*;

/// Cliente mínimo da Telegram Bot API (apenas sendMessage)
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: String,
}

impl TelegramClient {
    /// `api_url` sem o token, ex.: https://api.telegram.org
    pub fn new(api_url: &str, bot_token: &str) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), bot_token),
        })
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> AppResult<()> {
        let response = self
            .client
            .post(format!("{}/sendMessage", self.base_url))
            .json(&json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            log_telegram_error(chat_id, &body);
            return Err(AppError::TelegramApi(format!("status {} - {}", status, body)));
        }

        let body: Value = response.json().await?;
        if body.get("ok").and_then(Value::as_bool) == Some(false) {
            let description = body
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            log_telegram_error(chat_id, &description);
            return Err(AppError::TelegramApi(description));
        }

        log_telegram_sent(chat_id);
        Ok(())
    }
}
