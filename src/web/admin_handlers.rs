// src/web/admin_handlers.rs
use crate::{
    console::{estado::Aba, Efeito, PainelAdmin},
    models::{comentario::ListaComentarios, scrapper::CredenciaisScrapper},
    state::{AppState, SessaoConsole},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_cookies::Cookies;

// --- Corpos JSON enviados pelo script da página ---
#[derive(Deserialize, Debug, Default)]
pub struct IniciarForm {
    #[serde(default)]
    aba: Aba,
}

#[derive(Deserialize, Debug)]
pub struct EmailForm {
    email: String,
}

#[derive(Deserialize, Debug)]
pub struct BanirForm {
    email: String,
    #[serde(default)]
    motivo: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct MatriculaForm {
    matricula: String,
}

#[derive(Deserialize, Debug)]
pub struct ListaForm {
    lista: ListaComentarios,
}

#[derive(Deserialize, Debug)]
pub struct BanirComentarioForm {
    lista: ListaComentarios,
    #[serde(default)]
    motivo: Option<String>,
}

type Efeitos = Json<Vec<Efeito>>;

// --- Handlers ---

/// POST /admin/iniciar
/// Chamado a cada carregamento da página: o estado da página anterior é descartado.
pub async fn handle_iniciar(
    State(state): State<AppState>,
    cookies: Cookies,
    Extension(sessao): Extension<Arc<SessaoConsole>>,
    Json(form): Json<IniciarForm>,
) -> Efeitos {
    tracing::debug!("POST /admin/iniciar (aba: {})", form.aba.nome());
    let backend = state.backend(&cookies);
    Json(PainelAdmin::new(&backend, &sessao).iniciar(form.aba).await)
}

/// POST /admin/abas/{aba}
pub async fn handle_trocar_aba(
    State(state): State<AppState>,
    cookies: Cookies,
    Extension(sessao): Extension<Arc<SessaoConsole>>,
    Path(aba): Path<Aba>,
) -> Efeitos {
    tracing::debug!("POST /admin/abas/{}", aba.nome());
    let backend = state.backend(&cookies);
    Json(PainelAdmin::new(&backend, &sessao).trocar_aba(aba).await)
}

/// POST /admin/abas/{aba}/atualizar
pub async fn handle_atualizar_aba(
    State(state): State<AppState>,
    cookies: Cookies,
    Extension(sessao): Extension<Arc<SessaoConsole>>,
    Path(aba): Path<Aba>,
) -> Efeitos {
    tracing::debug!("POST /admin/abas/{}/atualizar", aba.nome());
    let backend = state.backend(&cookies);
    Json(PainelAdmin::new(&backend, &sessao).carregar_aba(aba, true).await)
}

pub async fn handle_contagem_alarmantes(
    State(state): State<AppState>,
    cookies: Cookies,
    Extension(sessao): Extension<Arc<SessaoConsole>>,
) -> Efeitos {
    let backend = state.backend(&cookies);
    Json(PainelAdmin::new(&backend, &sessao).contagem_alarmantes().await)
}

pub async fn handle_alternar_admin(
    State(state): State<AppState>,
    cookies: Cookies,
    Extension(sessao): Extension<Arc<SessaoConsole>>,
    Json(form): Json<EmailForm>,
) -> Efeitos {
    tracing::debug!("POST /admin/usuarios/alternar-admin: {}", form.email);
    let backend = state.backend(&cookies);
    Json(PainelAdmin::new(&backend, &sessao).alternar_admin(&form.email).await)
}

pub async fn handle_excluir_usuario(
    State(state): State<AppState>,
    cookies: Cookies,
    Extension(sessao): Extension<Arc<SessaoConsole>>,
    Json(form): Json<EmailForm>,
) -> Efeitos {
    tracing::debug!("POST /admin/usuarios/excluir: {}", form.email);
    let backend = state.backend(&cookies);
    Json(PainelAdmin::new(&backend, &sessao).excluir_usuario(&form.email).await)
}

pub async fn handle_banir_usuario(
    State(state): State<AppState>,
    cookies: Cookies,
    Extension(sessao): Extension<Arc<SessaoConsole>>,
    Json(form): Json<BanirForm>,
) -> Efeitos {
    tracing::debug!("POST /admin/usuarios/banir: {}", form.email);
    let backend = state.backend(&cookies);
    Json(
        PainelAdmin::new(&backend, &sessao)
            .banir_usuario(&form.email, form.motivo.as_deref())
            .await,
    )
}

pub async fn handle_desbanir_usuario(
    State(state): State<AppState>,
    cookies: Cookies,
    Extension(sessao): Extension<Arc<SessaoConsole>>,
    Json(form): Json<MatriculaForm>,
) -> Efeitos {
    tracing::debug!("POST /admin/banidos/desbanir: {}", form.matricula);
    let backend = state.backend(&cookies);
    Json(PainelAdmin::new(&backend, &sessao).desbanir_usuario(&form.matricula).await)
}

/// POST /admin/comentarios/{lista}/pagina/{pagina}
pub async fn handle_ir_para_pagina(
    State(state): State<AppState>,
    cookies: Cookies,
    Extension(sessao): Extension<Arc<SessaoConsole>>,
    Path((lista, pagina)): Path<(ListaComentarios, u32)>,
) -> Efeitos {
    tracing::debug!("POST /admin/comentarios/{}/pagina/{}", lista.nome(), pagina);
    let backend = state.backend(&cookies);
    Json(PainelAdmin::new(&backend, &sessao).ir_para_pagina(lista, pagina).await)
}

pub async fn handle_marcar_seguro(
    State(state): State<AppState>,
    cookies: Cookies,
    Extension(sessao): Extension<Arc<SessaoConsole>>,
    Path(id): Path<i64>,
) -> Efeitos {
    tracing::debug!("POST /admin/comentarios/{}/seguro", id);
    let backend = state.backend(&cookies);
    Json(PainelAdmin::new(&backend, &sessao).marcar_seguro(id).await)
}

pub async fn handle_excluir_comentario(
    State(state): State<AppState>,
    cookies: Cookies,
    Extension(sessao): Extension<Arc<SessaoConsole>>,
    Path(id): Path<i64>,
    Json(form): Json<ListaForm>,
) -> Efeitos {
    tracing::debug!("POST /admin/comentarios/{}/excluir ({})", id, form.lista.nome());
    let backend = state.backend(&cookies);
    Json(PainelAdmin::new(&backend, &sessao).excluir_comentario(form.lista, id).await)
}

pub async fn handle_banir_por_comentario(
    State(state): State<AppState>,
    cookies: Cookies,
    Extension(sessao): Extension<Arc<SessaoConsole>>,
    Path(id): Path<i64>,
    Json(form): Json<BanirComentarioForm>,
) -> Efeitos {
    tracing::debug!("POST /admin/comentarios/{}/banir ({})", id, form.lista.nome());
    let backend = state.backend(&cookies);
    Json(
        PainelAdmin::new(&backend, &sessao)
            .banir_por_comentario(form.lista, id, form.motivo.as_deref())
            .await,
    )
}

pub async fn handle_executar_scrapper(
    State(state): State<AppState>,
    cookies: Cookies,
    Extension(sessao): Extension<Arc<SessaoConsole>>,
    Json(credenciais): Json<CredenciaisScrapper>,
) -> Efeitos {
    tracing::debug!("POST /admin/scrapper/executar: {:?}", credenciais);
    let backend = state.backend(&cookies);
    Json(PainelAdmin::new(&backend, &sessao).executar_scrapper(credenciais).await)
}
