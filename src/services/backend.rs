// src/services/backend.rs
#![allow(async_fn_in_trait)] // trait interno, usado só com tipos concretos

use crate::{
    error::ApiResult,
    models::{
        avaliacao::{NovaAvaliacao, ResultadoAvaliacao},
        comentario::{Comentario, EstatisticasComentarios, ListaComentarios, Pagina},
        scrapper::{CredenciaisScrapper, StatusScrapper},
        usuario::{Usuario, UsuarioAtual, UsuarioBanido},
    },
};

/// Operações do backend REST usadas pelo painel e pelo widget de avaliação.
///
/// Todos os pedidos são feitos em nome do utilizador do browser (cookie de
/// sessão reencaminhado); um 401 chega sempre como `ApiError::NaoAutenticado`.
pub trait Backend {
    /// GET /api/me
    async fn usuario_atual(&self) -> ApiResult<UsuarioAtual>;

    // --- Utilizadores ---
    async fn listar_usuarios(&self) -> ApiResult<Vec<Usuario>>;
    async fn alternar_admin(&self, email: &str) -> ApiResult<()>;
    async fn excluir_usuario(&self, email: &str) -> ApiResult<()>;
    async fn banir_usuario(&self, email: &str, motivo: Option<&str>) -> ApiResult<()>;

    // --- Banidos ---
    async fn listar_banidos(&self) -> ApiResult<Vec<UsuarioBanido>>;
    async fn desbanir_usuario(&self, matricula: &str) -> ApiResult<()>;

    // --- Comentários ---
    async fn listar_comentarios(
        &self,
        lista: ListaComentarios,
        pagina: u32,
        tamanho: u32,
    ) -> ApiResult<Pagina<Comentario>>;
    async fn estatisticas_comentarios(&self) -> ApiResult<EstatisticasComentarios>;
    async fn marcar_seguro(&self, id: i64) -> ApiResult<()>;
    async fn excluir_comentario(&self, id: i64) -> ApiResult<()>;
    async fn banir_por_comentario(&self, id: i64, motivo: Option<&str>) -> ApiResult<()>;

    // --- Scrapper ---
    async fn status_scrapper(&self) -> ApiResult<StatusScrapper>;
    /// Devolve a mensagem em texto do backend.
    async fn executar_scrapper(&self, credenciais: &CredenciaisScrapper) -> ApiResult<String>;

    // --- Avaliações ---
    async fn enviar_avaliacao(&self, avaliacao: &NovaAvaliacao) -> ApiResult<ResultadoAvaliacao>;
}
