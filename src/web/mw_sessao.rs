// src/web/mw_sessao.rs
use crate::{error::AppError, state::SessoesConsole};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tower_sessions::Session;
use uuid::Uuid;

const CHAVE_CONSOLE: &str = "console_id";

// Garante um estado de consola para o separador e põe-no nas extensões do pedido
pub async fn garantir_sessao(
    State(sessoes): State<SessoesConsole>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let id = match session.get::<Uuid>(CHAVE_CONSOLE).await {
        Ok(Some(id)) => id,
        Ok(None) => {
            let id = Uuid::new_v4();
            session.insert(CHAVE_CONSOLE, id).await.map_err(|e| {
                tracing::error!("Sessão MW: erro ao gravar id de consola: {:?}", e);
                AppError::SessionError(format!("Erro ao criar sessão: {}", e))
            })?;
            tracing::debug!("Sessão MW: nova consola {}", id);
            id
        }
        Err(e) => {
            tracing::error!("Sessão MW: erro ao ler sessão: {:?}", e);
            return Err(AppError::SessionError(format!("Erro ao verificar sessão: {}", e)));
        }
    };

    let sessao = sessoes.obter(id).await;
    request.extensions_mut().insert(sessao);
    Ok(next.run(request).await)
}
