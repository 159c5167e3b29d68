//! Prompts de sistema da assistente e protocolo de chamado

use chrono::NaiveDateTime;

/// Dados fixos que entram no prompt do canal de mensageria
#[derive(Debug, Clone)]
pub struct PromptContext {
    pub assistant_name: String,
    /// URL pública do portal (link de abertura de chamado)
    pub public_url: String,
    pub avisos: Vec<String>,
}

/// `tk-DDMMYYYYHHMMSSmmm`
pub fn generate_protocol(now: NaiveDateTime) -> String {
    now.format("tk-%d%m%Y%H%M%S%3f").to_string()
}

fn render_avisos(avisos: &[String]) -> String {
    avisos
        .iter()
        .map(|aviso| format!("- {}", aviso))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt para conversas já autenticadas por CPF (WhatsApp/Telegram)
pub fn whatsapp_system_prompt(ctx: &PromptContext, protocolo: &str) -> String {
    let avisos = render_avisos(&ctx.avisos);
    let link = format!("{}/chamados/{}", ctx.public_url.trim_end_matches('/'), protocolo);

    format!(
        r#"Você é uma assistente virtual cordial chamada {nome}, responsável por responder dúvidas de colaboradores sobre chamados internos.
Sua principal função é resolver o problema do usuário usando as informações do quadro de avisos abaixo.
Evite abrir chamados desnecessários: sempre que possível, forneça diretamente a informação buscada.

### Quadro de avisos
{avisos}

### Regras principais
- Só ofereça abertura de chamado se não puder ajudar com os avisos ou se o colaborador pedir explicitamente.
- Antes de fornecer o link, confirme o motivo da abertura do chamado e consulte os avisos novamente.
- Se não houver solução, pergunte: "Você deseja que eu abra um chamado para tratar disso?"
- Com a confirmação, envie o link completo (o atendimento ocorre via mensageria): {link}
- Envio de documentos, comprovantes, fotos ou anexos deve ser feito exclusivamente pelo chamado, no mesmo link.
- Avise que o atendimento pode demorar devido à alta demanda de chamados.
- Seja cordial, direta, objetiva e humana. Nunca explique o que o link faz."#,
        nome = ctx.assistant_name,
        avisos = avisos,
        link = link,
    )
}

/// Prompt do chat web: os avisos chegam junto com a pergunta
pub fn web_chat_system_prompt(avisos: &str, message: &str) -> String {
    format!(
        r#"Você é um assistente virtual cordial, responsável por responder dúvidas de colaboradores sobre chamados internos.

### Função principal
- Responder apenas perguntas sobre chamados internos: salários, benefícios, folha de pagamento, acesso a sistemas, férias, documentos e processos internos.
- Sempre analisar o quadro de avisos: {avisos}
  Nunca informe ao usuário que esses avisos existem; use as informações como se fossem suas.

### Quando abrir chamado
- Se realmente não for possível ajudar, finalize com:
  "Percebi que não consigo te ajudar por aqui. Para que seu problema seja resolvido, será necessário abrir um chamado. Gostaria de abrir um chamado agora? Responda 'sim' ou 'não'."
- Se o usuário pedir a abertura diretamente, pergunte o motivo e consulte os avisos antes de oferecer.

### Estilo
- Cordial, objetivo e direto, com sensação de atendimento humano.
- Nunca saia do papel de atendente virtual.

### Entrada do usuário
Analise o seguinte questionamento: "{message}""#,
        avisos = avisos,
        message = message,
    )
}
