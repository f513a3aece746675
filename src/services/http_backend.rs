// src/services/http_backend.rs
use crate::{
    config::Config,
    error::{ApiError, ApiResult},
    models::{
        avaliacao::{NovaAvaliacao, ResultadoAvaliacao},
        comentario::{Comentario, EstatisticasComentarios, ListaComentarios, Pagina, PedidoMotivo},
        scrapper::{CredenciaisScrapper, StatusScrapper},
        usuario::{PedidoBanimento, Usuario, UsuarioAtual, UsuarioBanido},
    },
    services::backend::Backend,
};
use reqwest::{header, multipart, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;

/// Cliente HTTP partilhado por todos os pedidos (pool de ligações interno).
pub fn criar_cliente(config: &Config) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(config.backend_timeout)
        .build()
}

/// Implementação real de `Backend`, por pedido do browser.
///
/// Leva o cookie de sessão do backend tal como o browser o enviou, para que o
/// backend veja o mesmo utilizador.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    cookie: Option<String>,
}

impl HttpBackend {
    pub fn new(client: Client, base_url: impl Into<String>, cookie: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            cookie,
        }
    }

    fn url(&self, caminho: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), caminho)
    }

    fn pedido(&self, metodo: reqwest::Method, caminho: &str) -> RequestBuilder {
        let pedido = self.client.request(metodo, self.url(caminho));
        match &self.cookie {
            Some(cookie) => pedido.header(header::COOKIE, cookie),
            None => pedido,
        }
    }

    fn post(&self, caminho: &str) -> RequestBuilder {
        self.pedido(reqwest::Method::POST, caminho)
    }

    /// Envia o pedido e converte qualquer status não-2xx em `ApiError`.
    async fn enviar(&self, pedido: RequestBuilder, rota: &str) -> ApiResult<Response> {
        let resposta = pedido.send().await.map_err(|e| {
            tracing::error!("Backend: falha de rede em {}: {}", rota, e);
            ApiError::from(e)
        })?;

        let status = resposta.status();
        if status.is_success() {
            return Ok(resposta);
        }

        let corpo = resposta.text().await.unwrap_or_default();
        tracing::warn!("Backend: {} respondeu {} ({})", rota, status.as_u16(), corpo.trim());
        Err(ApiError::a_partir_do_status(status.as_u16(), corpo))
    }

    async fn json<T: DeserializeOwned>(&self, pedido: RequestBuilder, rota: &str) -> ApiResult<T> {
        let resposta = self.enviar(pedido, rota).await?;
        resposta.json::<T>().await.map_err(|e| {
            tracing::error!("Backend: resposta inválida de {}: {}", rota, e);
            ApiError::Decodificacao(e.to_string())
        })
    }

    async fn vazio(&self, pedido: RequestBuilder, rota: &str) -> ApiResult<()> {
        self.enviar(pedido, rota).await.map(|_| ())
    }
}

impl Backend for HttpBackend {
    async fn usuario_atual(&self) -> ApiResult<UsuarioAtual> {
        let pedido = self.pedido(reqwest::Method::GET, "/api/me");
        self.json(pedido, "/api/me").await
    }

    async fn listar_usuarios(&self) -> ApiResult<Vec<Usuario>> {
        self.json(self.post("/api/admin/users"), "/api/admin/users").await
    }

    async fn alternar_admin(&self, email: &str) -> ApiResult<()> {
        let pedido = self.post("/api/admin/toggle-admin").json(&json!({ "email": email }));
        self.vazio(pedido, "/api/admin/toggle-admin").await
    }

    async fn excluir_usuario(&self, email: &str) -> ApiResult<()> {
        let pedido = self.post("/api/admin/delete-user").json(&json!({ "email": email }));
        self.vazio(pedido, "/api/admin/delete-user").await
    }

    async fn banir_usuario(&self, email: &str, motivo: Option<&str>) -> ApiResult<()> {
        let pedido = self
            .post("/api/admin/ban-user")
            .json(&PedidoBanimento { email, motivo });
        self.vazio(pedido, "/api/admin/ban-user").await
    }

    async fn listar_banidos(&self) -> ApiResult<Vec<UsuarioBanido>> {
        self.json(self.post("/api/admin/banned-users"), "/api/admin/banned-users").await
    }

    async fn desbanir_usuario(&self, matricula: &str) -> ApiResult<()> {
        let pedido = self
            .post("/api/admin/unban-user")
            .json(&json!({ "matricula": matricula }));
        self.vazio(pedido, "/api/admin/unban-user").await
    }

    async fn listar_comentarios(
        &self,
        lista: ListaComentarios,
        pagina: u32,
        tamanho: u32,
    ) -> ApiResult<Pagina<Comentario>> {
        let caminho = match lista {
            ListaComentarios::Alarmantes => "/api/admin/comments/alarming",
            ListaComentarios::Todos => "/api/admin/comments",
        };
        let pedido = self
            .post(caminho)
            .query(&[("page", pagina), ("size", tamanho)]);
        self.json(pedido, caminho).await
    }

    async fn estatisticas_comentarios(&self) -> ApiResult<EstatisticasComentarios> {
        self.json(self.post("/api/admin/comments/stats"), "/api/admin/comments/stats")
            .await
    }

    async fn marcar_seguro(&self, id: i64) -> ApiResult<()> {
        let caminho = format!("/api/admin/comments/{}/mark-safe", id);
        self.vazio(self.post(&caminho), &caminho).await
    }

    async fn excluir_comentario(&self, id: i64) -> ApiResult<()> {
        let caminho = format!("/api/admin/comments/{}", id);
        let pedido = self.pedido(reqwest::Method::DELETE, &caminho);
        self.vazio(pedido, &caminho).await
    }

    async fn banir_por_comentario(&self, id: i64, motivo: Option<&str>) -> ApiResult<()> {
        let caminho = format!("/api/admin/comments/{}/ban-user", id);
        let pedido = self.post(&caminho).json(&PedidoMotivo { motivo });
        self.vazio(pedido, &caminho).await
    }

    async fn status_scrapper(&self) -> ApiResult<StatusScrapper> {
        self.json(self.post("/api/admin/scrapper/status"), "/api/admin/scrapper/status")
            .await
    }

    async fn executar_scrapper(&self, credenciais: &CredenciaisScrapper) -> ApiResult<String> {
        let pedido = self.post("/api/admin/scrapper/execute").json(credenciais);
        let resposta = self.enviar(pedido, "/api/admin/scrapper/execute").await?;
        Ok(resposta.text().await?)
    }

    async fn enviar_avaliacao(&self, avaliacao: &NovaAvaliacao) -> ApiResult<ResultadoAvaliacao> {
        let mut form = multipart::Form::new()
            .text("nota", avaliacao.nota.to_string())
            .text("disciplinaId", avaliacao.disciplina_id.clone());
        if let Some(professor_id) = avaliacao.alvo.professor_id() {
            form = form.text("professorId", professor_id.to_string());
        }

        let pedido = self.post("/api/avaliacao/rating").multipart(form);
        self.json(pedido, "/api/avaliacao/rating").await
    }
}
