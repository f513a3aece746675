// src/models/scrapper.rs
use super::nulo_como_padrao;
use serde::{Deserialize, Serialize};

/// Último estado conhecido do scrapper de disciplinas (só leitura).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusScrapper {
    #[serde(default, deserialize_with = "nulo_como_padrao")]
    pub executando: bool,
    #[serde(default)]
    pub ultima_execucao: Option<String>,
    #[serde(default)]
    pub ultimo_sucesso: Option<String>,
    #[serde(default, deserialize_with = "nulo_como_padrao")]
    pub disciplinas_capturadas: u32,
    #[serde(default, deserialize_with = "nulo_como_padrao")]
    pub professores_capturados: u32,
    #[serde(default)]
    pub ultimo_administrador: Option<String>,
    #[serde(default)]
    pub ultimo_erro: Option<String>,
    #[serde(default, deserialize_with = "nulo_como_padrao")]
    pub total_execucoes: u32,
}

/// Credenciais do CAGR enviadas para POST /api/admin/scrapper/execute.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredenciaisScrapper {
    pub cagr_username: String,
    pub cagr_password: String,
}

// Nunca escrever a senha nos logs
impl std::fmt::Debug for CredenciaisScrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredenciaisScrapper")
            .field("cagr_username", &self.cagr_username)
            .field("cagr_password", &"***")
            .finish()
    }
}
