// src/error.rs
use axum::{http::StatusCode, response::Html, response::IntoResponse};
use thiserror::Error;

// --- Erros do backend REST ---

/// Taxonomia das falhas de uma chamada ao backend.
///
/// Cada handler do painel decide o que mostrar a partir desta classificação;
/// nenhum destes erros atravessa a fronteira de um módulo.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    // 401: sessão inválida, o painel redireciona para /login
    #[error("Não autenticado")]
    NaoAutenticado,

    // 403
    #[error("Acesso negado")]
    AcessoNegado,

    // 400, com o texto devolvido pelo backend
    #[error("Pedido inválido: {0}")]
    Validacao(String),

    // 409
    #[error("Conflito: {0}")]
    Conflito(String),

    // 404
    #[error("Não encontrado: {0}")]
    NaoEncontrado(String),

    #[error("Resposta inesperada ({status}): {mensagem}")]
    Status { status: u16, mensagem: String },

    // Falha de transporte (ligação recusada, timeout, ...)
    #[error("Erro de rede: {0}")]
    Rede(String),

    #[error("Resposta inválida do backend: {0}")]
    Decodificacao(String),
}

impl ApiError {
    /// Classifica uma resposta não-2xx a partir do código HTTP e do corpo em texto.
    pub fn a_partir_do_status(status: u16, corpo: String) -> Self {
        let corpo = parse_mensagem_erro(&corpo).unwrap_or_default();
        match status {
            401 => ApiError::NaoAutenticado,
            403 => ApiError::AcessoNegado,
            400 => ApiError::Validacao(corpo),
            404 => ApiError::NaoEncontrado(corpo),
            409 => ApiError::Conflito(corpo),
            _ => ApiError::Status {
                status,
                mensagem: corpo,
            },
        }
    }

    /// Texto devolvido pelo servidor, quando existe.
    pub fn mensagem_servidor(&self) -> Option<&str> {
        match self {
            ApiError::Validacao(m)
            | ApiError::Conflito(m)
            | ApiError::NaoEncontrado(m)
            | ApiError::Status { mensagem: m, .. } => Some(m.as_str()).filter(|m| !m.is_empty()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decodificacao(e.to_string())
        } else {
            ApiError::Rede(e.to_string())
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Extrai uma mensagem legível de um corpo de erro do servidor.
///
/// Aceita JSON com `message`, `error` ou `mensagem`; caso contrário usa o texto
/// cru. Corpo vazio não tem mensagem.
pub fn parse_mensagem_erro(corpo: &str) -> Option<String> {
    let corpo = corpo.trim();
    if corpo.is_empty() {
        return None;
    }

    if let Ok(valor) = serde_json::from_str::<serde_json::Value>(corpo) {
        let campo = ["message", "error", "mensagem"]
            .iter()
            .find_map(|chave| valor.get(*chave).and_then(|m| m.as_str()));
        if let Some(mensagem) = campo {
            return Some(mensagem.to_string());
        }
        if let Some(texto) = valor.as_str() {
            return Some(texto.to_string());
        }
    }

    Some(corpo.to_string())
}

// --- Erros do próprio servidor do painel ---

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Erro de variável de ambiente: {0}")]
    EnvVarError(#[from] std::env::VarError),

    #[error("Configuração inválida: {0}")]
    ConfigInvalida(String),

    #[error("Erro ao montar cliente HTTP: {0}")]
    ClienteHttp(#[from] reqwest::Error),

    #[error("Erro ao renderizar template: {0}")]
    TemplateError(#[from] askama::Error),

    #[error("Erro na sessão: {0}")]
    SessionError(String),
}

// Como converter AppError numa resposta HTTP
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // Loga o erro detalhado no servidor
        tracing::error!("Erro processado: {:?}", self);

        let (status, user_message) = match self {
            AppError::EnvVarError(_) | AppError::ConfigInvalida(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Erro de configuração.")
            }
            AppError::TemplateError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Erro ao montar a página.")
            }
            AppError::SessionError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Erro na gestão da sua sessão.")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado."),
        };

        (status, Html(format!(r#"
            <!DOCTYPE html><html><head><title>Erro</title><style>body{{font-family:sans-serif;}}</style></head>
            <body><h1>Erro {status_code}</h1><p>{message}</p><a href="javascript:history.back()">Voltar</a></body></html>
         "#, status_code=status.as_u16(), message=user_message))).into_response()
    }
}

// Tipo Result padrão para a aplicação
pub type AppResult<T = ()> = Result<T, AppError>;
