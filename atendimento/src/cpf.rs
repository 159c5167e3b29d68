//! Validação de CPF (dígitos verificadores módulo 11) e checagem na lista de autorizados

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

const CPF_LEN: usize = 11;

/// CPF já validado estruturalmente (11 dígitos, apenas números).
/// Desserialização passa por [`Cpf::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cpf(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("CPF inválido")]
pub struct InvalidCpf;

impl Cpf {
    /// Normaliza a entrada e devolve `Some` apenas se os dígitos verificadores conferem
    pub fn parse(raw: &str) -> Option<Self> {
        let digits = normalize_digits(raw);
        if has_valid_check_digits(&digits) {
            Some(Self(digits))
        } else {
            None
        }
    }

    /// Os 11 dígitos, sem pontuação
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Forma mascarada para logs: `529.***.***-25`
    pub fn masked(&self) -> String {
        format!("{}.***.***-{}", &self.0[..3], &self.0[9..])
    }
}

impl TryFrom<String> for Cpf {
    type Error = InvalidCpf;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw).ok_or(InvalidCpf)
    }
}

impl From<Cpf> for String {
    fn from(cpf: Cpf) -> Self {
        cpf.0
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}-{}",
            &self.0[..3],
            &self.0[3..6],
            &self.0[6..9],
            &self.0[9..]
        )
    }
}

/// Resultado da validação contra a lista de autorizados
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CpfValidation {
    /// Não tem 11 dígitos, é sequência repetida ou os verificadores não batem
    Invalid,
    /// CPF bem formado, mas fora da lista
    Unauthorized(Cpf),
    Authorized(Cpf),
}

impl CpfValidation {
    pub fn is_authorized(&self) -> bool {
        matches!(self, CpfValidation::Authorized(_))
    }
}

/// Remove tudo que não for dígito ASCII
pub fn normalize_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn is_structurally_valid(raw: &str) -> bool {
    Cpf::parse(raw).is_some()
}

/// Valida o CPF e verifica se a forma normalizada está em `allow_list`
pub fn validate(raw: &str, allow_list: &HashSet<String>) -> CpfValidation {
    match Cpf::parse(raw) {
        None => CpfValidation::Invalid,
        Some(cpf) if allow_list.contains(cpf.as_str()) => CpfValidation::Authorized(cpf),
        Some(cpf) => CpfValidation::Unauthorized(cpf),
    }
}

fn has_valid_check_digits(digits: &str) -> bool {
    if digits.len() != CPF_LEN {
        return false;
    }

    let values: Vec<u32> = digits.bytes().map(|b| u32::from(b - b'0')).collect();

    // 00000000000, 11111111111, ... passam no módulo 11 mas não são CPFs
    if values.iter().all(|&d| d == values[0]) {
        return false;
    }

    check_digit(&values[..9]) == values[9] && check_digit(&values[..10]) == values[10]
}

/// Pesos decrescentes até 2: 10..2 para o primeiro verificador, 11..2 para o segundo
fn check_digit(digits: &[u32]) -> u32 {
    let first_weight = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .zip((2..=first_weight).rev())
        .map(|(digit, weight)| digit * weight)
        .sum();

    match (sum * 10) % 11 {
        10 => 0,
        rest => rest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn allow(cpfs: &[&str]) -> HashSet<String> {
        cpfs.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_known_valid_cpf() {
        assert!(is_structurally_valid("52998224725"));
        assert!(is_structurally_valid("529.982.247-25"));
        assert!(is_structurally_valid("111.444.777-35"));
    }

    #[test]
    fn test_wrong_check_digits() {
        assert!(!is_structurally_valid("52998224700"));
        assert!(!is_structurally_valid("52998224715"));
        assert!(!is_structurally_valid("52998224726"));
    }

    #[test]
    fn test_rejects_wrong_length() {
        for raw in ["", "...-", "123", "5299822472", "529982247250", "cpf: 1234567890123"] {
            assert!(!is_structurally_valid(raw), "deveria rejeitar {:?}", raw);
        }
    }

    #[test]
    fn test_rejects_repeated_digits() {
        for d in 0..=9 {
            let raw = d.to_string().repeat(11);
            assert!(!is_structurally_valid(&raw), "deveria rejeitar {}", raw);
        }
    }

    #[test]
    fn test_random_generated_cpfs() {
        let mut rng = rand::thread_rng();

        for _ in 0..200 {
            let mut digits: Vec<u32> = (0..9).map(|_| rng.gen_range(0..10)).collect();
            if digits.iter().all(|&d| d == digits[0]) {
                continue;
            }
            let d1 = check_digit(&digits);
            digits.push(d1);
            let d2 = check_digit(&digits);
            digits.push(d2);

            let raw: String = digits.iter().map(|d| d.to_string()).collect();
            assert!(is_structurally_valid(&raw), "gerado {} deveria ser válido", raw);

            let mut broken = digits.clone();
            broken[10] = (broken[10] + 1) % 10;
            let raw: String = broken.iter().map(|d| d.to_string()).collect();
            assert!(!is_structurally_valid(&raw), "{} não deveria ser válido", raw);
        }
    }

    #[test]
    fn test_validate_tri_state() {
        let list = allow(&["52998224725"]);

        assert!(validate("52998224725", &list).is_authorized());
        assert!(validate("529.982.247-25", &list).is_authorized());
        assert!(matches!(validate("11144477735", &list), CpfValidation::Unauthorized(_)));
        assert_eq!(validate("123", &list), CpfValidation::Invalid);
        assert_eq!(validate("52998224700", &list), CpfValidation::Invalid);
    }

    #[test]
    fn test_display_and_mask() {
        let cpf = Cpf::parse("52998224725").unwrap();
        assert_eq!(cpf.to_string(), "529.982.247-25");
        assert_eq!(cpf.masked(), "529.***.***-25");
        assert_eq!(cpf.as_str(), "52998224725");
    }

    #[test]
    fn test_deserialize_goes_through_parse() {
        let cpf: Cpf = serde_json::from_str("\"529.982.247-25\"").unwrap();
        assert_eq!(cpf.as_str(), "52998224725");
        assert_eq!(serde_json::to_string(&cpf).unwrap(), "\"52998224725\"");

        assert!(serde_json::from_str::<Cpf>("\"12\"").is_err());
        assert!(serde_json::from_str::<Cpf>("\"52998224700\"").is_err());
    }
}
