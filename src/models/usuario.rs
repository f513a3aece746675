// src/models/usuario.rs
use super::nulo_como_padrao;
use serde::{Deserialize, Serialize};

// Utilizador como devolvido por POST /api/admin/users (chave: email)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    pub email: String,
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub matricula: Option<String>,
    #[serde(default)]
    pub curso: Option<String>,
    #[serde(default, deserialize_with = "nulo_como_padrao")]
    pub admin: bool,
}

// Registo de banimento (chave: matrícula)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsuarioBanido {
    pub matricula: String,
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub banido_em: Option<String>, // LocalDateTime sem fuso
    #[serde(default)]
    pub banido_por: Option<String>,
    #[serde(default)]
    pub motivo: Option<String>,
}

/// Utilizador da sessão atual (GET /api/me). Só o email interessa ao painel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsuarioAtual {
    pub email: String,
}

/// Corpo de POST /api/admin/ban-user
#[derive(Debug, Serialize)]
pub struct PedidoBanimento<'a> {
    pub email: &'a str,
    pub motivo: Option<&'a str>,
}
