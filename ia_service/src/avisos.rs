//! Quadro de avisos padrão usado como base de conhecimento da assistente

/// Avisos publicados para os colaboradores, agrupados por assunto
pub fn quadro_avisos() -> Vec<String> {
    [
        // Folha de pagamento
        "O contracheque está disponível todo mês no portal do colaborador.",
        "Pagamentos são sempre realizados no último dia útil; em caso de atraso, o ajuste ocorre no próximo dia útil automaticamente.",
        "Alteração de conta bancária pode levar até 48h para refletir no sistema de pagamento.",
        "Adicionais (hora extra, noturno, insalubridade) são creditados no mês seguinte ao registro.",
        // Benefícios
        "Solicitações de vale-transporte - deve abrir chamado para o setor de beneficios solicitando",
        "Inclusão ou exclusão de dependentes no plano de saúde - deve abrir chamado para o setor de beneficios solicitando",
        "Problemas com cartão de benefícios - deve abrir chamado para o setor de beneficios solicitando",
        // Férias e afastamentos
        "O pedido de férias deve ser registrado com pelo menos 30 dias de antecedência no portal.",
        "Afastamentos médicos precisam de atestado enviado em até 48h pelo sistema para evitar desconto.",
        "Licenças como maternidade, paternidade e luto devem ser solicitadas pelo portal na aba “Licenças”.",
        // Documentação e cadastro
        "Alterações de endereço, telefone ou estado civil podem ser feitas diretamente no portal do colaborador.",
        "Informe de rendimentos para imposto de renda fica disponível no portal a partir de março de cada ano.",
        "Documentos pendentes devem ser enviados digitalizados pelo sistema; isso agiliza qualquer aprovação.",
        // Acesso e sistemas
        "Senha expirada? Você pode redefinir diretamente no portal de login.",
        "Conta bloqueada por tentativas inválidas? Aguarde 15 minutos e tente novamente ou use a recuperação de senha.",
        // Geral
        "Dúvidas sobre status de solicitações podem ser consultadas diretamente no portal de acompanhamento.",
        "Antes de abrir um chamado, verifique no painel de mensagens automáticas se já existe aviso sobre sua solicitação.",
    ]
    .iter()
    .map(|aviso| aviso.to_string())
    .collect()
}
