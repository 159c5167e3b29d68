//! Carregador da lista de colaboradores autorizados
//!
//! O arquivo YAML (caminho em `cpf.arquivo_colaboradores`) segue o formato:
//!
//! ```yaml
//! colaboradores:
//!   - nome: Maria Souza
//!     cpf: 529.982.247-25
//!     setor: Financeiro
//! ```

use serde::{Deserialize, Serialize};

use atendimento::normalize_digits;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Colaborador {
    pub nome: String,
    pub cpf: String,
    #[serde(default)]
    pub setor: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Colaboradores {
    #[serde(default)]
    pub colaboradores: Vec<Colaborador>,
}

#[derive(Debug, thiserror::Error)]
pub enum ColaboradoresError {
    #[error("Erro ao ler arquivo {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML de colaboradores inválido: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Colaboradores {
    /// Carrega do arquivo local
    pub async fn load_from_file(path: &str) -> Result<Self, ColaboradoresError> {
        tracing::info!("📂 Carregando colaboradores de: {}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ColaboradoresError::Io {
                path: path.to_string(),
                source,
            })?;

        Self::parse_yaml(&content)
    }

    /// Parse do conteúdo YAML
    pub fn parse_yaml(content: &str) -> Result<Self, ColaboradoresError> {
        let parsed: Colaboradores = serde_yaml::from_str(content)?;

        tracing::info!("✅ {} colaboradores carregados", parsed.colaboradores.len());

        Ok(parsed)
    }

    /// CPFs normalizados (apenas dígitos)
    pub fn cpfs(&self) -> Vec<String> {
        self.colaboradores
            .iter()
            .map(|c| normalize_digits(&c.cpf))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.colaboradores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colaboradores.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const YAML: &str = r#"
colaboradores:
  - nome: Maria Souza
    cpf: 529.982.247-25
    setor: Financeiro
  - nome: João Lima
    cpf: "11144477735"
"#;

    #[test]
    fn test_parse_yaml_normalizes_cpfs() {
        let colaboradores = Colaboradores::parse_yaml(YAML).unwrap();

        assert_eq!(colaboradores.len(), 2);
        assert_eq!(colaboradores.cpfs(), vec!["52998224725", "11144477735"]);
        assert_eq!(colaboradores.colaboradores[0].setor.as_deref(), Some("Financeiro"));
        assert!(colaboradores.colaboradores[1].setor.is_none());
    }

    #[test]
    fn test_parse_invalid_yaml() {
        assert!(matches!(
            Colaboradores::parse_yaml("colaboradores: [nome: "),
            Err(ColaboradoresError::Yaml(_))
        ));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(YAML.as_bytes()).unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let colaboradores = Colaboradores::load_from_file(&path).await.unwrap();

        assert_eq!(colaboradores.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let result = Colaboradores::load_from_file("/nao/existe/colaboradores.yaml").await;
        assert!(matches!(result, Err(ColaboradoresError::Io { .. })));
    }
}
