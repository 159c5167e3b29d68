//! Utilitários de texto para logs e validação de cabeçalhos

/// Primeiros `max_chars` caracteres em uma linha, com "…" quando cortado
///
/// # Exemplo
/// ```
/// use chamados_bot::utils::text::message_preview;
///
/// assert_eq!(message_preview("Olá,\nquero férias", 20), "Olá, quero férias");
/// assert_eq!(message_preview("Preciso do informe de rendimentos", 7), "Preciso…");
/// ```
pub fn message_preview(message: &str, max_chars: usize) -> String {
    let single_line = message.split_whitespace().collect::<Vec<_>>().join(" ");

    match single_line.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &single_line[..cut]),
        None => single_line,
    }
}

/// Texto de mensagem seguro para log: CPF vira `529.***.***-25` e
/// qualquer outro dígito vira `*`
pub fn loggable_message(message: &str, max_chars: usize) -> String {
    if let Some(cpf) = atendimento::Cpf::parse(message) {
        return cpf.masked();
    }

    let masked: String = message
        .chars()
        .map(|c| if c.is_ascii_digit() { '*' } else { c })
        .collect();
    message_preview(&masked, max_chars)
}

/// Comparação de tempo constante para evitar timing attacks
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
