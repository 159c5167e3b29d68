use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Corpo recebido em /api/whatsapp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatsAppRequest {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "sessionId", default)]
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatsAppResponse {
    pub response: String,
}

/// Corpo recebido em /api/bot (chat web sem sessão)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BotRequest {
    #[serde(default)]
    pub message: Option<Value>,
    /// Lista de avisos ou texto livre; ausente = quadro padrão
    #[serde(default)]
    pub avisos: Option<Value>,
}

impl BotRequest {
    /// Mensagem não vazia, se for texto
    pub fn text(&self) -> Option<&str> {
        self.message
            .as_ref()
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty())
    }

    /// Avisos enviados pelo cliente, renderizados como texto
    pub fn avisos_text(&self) -> Option<String> {
        match self.avisos.as_ref()? {
            Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            Value::Array(items) => {
                let lines: Vec<String> = items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect();
                (!lines.is_empty()).then(|| lines.join("\n"))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotResponse {
    pub reply: String,
}

/// Update do Telegram (apenas os campos usados)
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUpdate {
    pub message: Option<TelegramMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramMessage {
    pub chat: TelegramChat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramChat {
    pub id: i64,
}

impl TelegramUpdate {
    /// (chat_id, texto) quando a atualização é uma mensagem de texto
    pub fn chat_text(&self) -> Option<(i64, &str)> {
        let message = self.message.as_ref()?;
        let text = message.text.as_deref().filter(|t| !t.is_empty())?;
        Some((message.chat.id, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_whatsapp_request_uses_camel_case_session_id() {
        let req: WhatsAppRequest =
            serde_json::from_value(json!({ "message": "oi", "sessionId": "5511999990000" })).unwrap();
        assert_eq!(req.session_id, "5511999990000");
        assert_eq!(req.message, "oi");
    }

    #[test]
    fn test_bot_request_text() {
        let req: BotRequest = serde_json::from_value(json!({ "message": 42 })).unwrap();
        assert!(req.text().is_none());

        let req: BotRequest = serde_json::from_value(json!({ "message": "  " })).unwrap();
        assert!(req.text().is_none());

        let req: BotRequest = serde_json::from_value(json!({ "message": "Como peço férias?" })).unwrap();
        assert_eq!(req.text(), Some("Como peço férias?"));
    }

    #[test]
    fn test_bot_request_avisos_text() {
        let req: BotRequest =
            serde_json::from_value(json!({ "avisos": ["Aviso A", "Aviso B"] })).unwrap();
        assert_eq!(req.avisos_text().as_deref(), Some("Aviso A\nAviso B"));

        let req: BotRequest = serde_json::from_value(json!({ "avisos": "Aviso único" })).unwrap();
        assert_eq!(req.avisos_text().as_deref(), Some("Aviso único"));

        let req: BotRequest = serde_json::from_value(json!({ "avisos": [] })).unwrap();
        assert!(req.avisos_text().is_none());
    }

    #[test]
    fn test_telegram_update_chat_text() {
        let update: TelegramUpdate = serde_json::from_value(json!({
            "update_id": 1,
            "message": { "message_id": 9, "chat": { "id": 777, "type": "private" }, "text": "oi" }
        }))
        .unwrap();
        assert_eq!(update.chat_text(), Some((777, "oi")));

        let sticker: TelegramUpdate = serde_json::from_value(json!({
            "update_id": 2,
            "message": { "message_id": 10, "chat": { "id": 777 }, "sticker": {} }
        }))
        .unwrap();
        assert!(sticker.chat_text().is_none());
    }
}
