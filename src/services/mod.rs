pub mod assistente;
pub mod telegram;

pub use assistente::AssistenteChamados;
pub use telegram::TelegramClient;
