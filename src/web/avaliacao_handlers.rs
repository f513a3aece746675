// src/web/avaliacao_handlers.rs
use crate::{
    console::{avaliacao::WidgetAvaliacao, Efeito},
    models::{
        avaliacao::{Alvo, DadosPagina},
        id_opcional,
    },
    state::{AppState, SessaoConsole},
};
use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use std::sync::Arc;
use tower_cookies::Cookies;

#[derive(Deserialize, Debug, Default)]
pub struct ProfessorForm {
    #[serde(default, rename = "professorId", deserialize_with = "id_opcional")]
    professor_id: Option<String>,
}

impl ProfessorForm {
    fn alvo(&self) -> Alvo {
        Alvo::de_professor_id(self.professor_id.as_deref())
    }
}

// `nota: null` quando o rato sai das estrelas
#[derive(Deserialize, Debug)]
pub struct DestaqueForm {
    #[serde(default)]
    nota: Option<u8>,
}

#[derive(Deserialize, Debug)]
pub struct NotaForm {
    nota: u8,
}

type Efeitos = Json<Vec<Efeito>>;

pub async fn handle_iniciar(
    State(state): State<AppState>,
    cookies: Cookies,
    Extension(sessao): Extension<Arc<SessaoConsole>>,
    Json(dados): Json<DadosPagina>,
) -> Efeitos {
    tracing::debug!("POST /avaliacoes/iniciar: disciplina {}", dados.disciplina_id);
    let backend = state.backend(&cookies);
    Json(WidgetAvaliacao::new(&backend, &sessao).iniciar(dados).await)
}

pub async fn handle_abrir_modal(
    State(state): State<AppState>,
    cookies: Cookies,
    Extension(sessao): Extension<Arc<SessaoConsole>>,
    Json(form): Json<ProfessorForm>,
) -> Efeitos {
    let backend = state.backend(&cookies);
    Json(WidgetAvaliacao::new(&backend, &sessao).abrir_modal(form.alvo()).await)
}

pub async fn handle_destacar(
    State(state): State<AppState>,
    cookies: Cookies,
    Extension(sessao): Extension<Arc<SessaoConsole>>,
    Json(form): Json<DestaqueForm>,
) -> Efeitos {
    let backend = state.backend(&cookies);
    Json(WidgetAvaliacao::new(&backend, &sessao).destacar(form.nota).await)
}

pub async fn handle_selecionar_nota(
    State(state): State<AppState>,
    cookies: Cookies,
    Extension(sessao): Extension<Arc<SessaoConsole>>,
    Json(form): Json<NotaForm>,
) -> Efeitos {
    let backend = state.backend(&cookies);
    Json(WidgetAvaliacao::new(&backend, &sessao).selecionar_nota(form.nota).await)
}

pub async fn handle_fechar_modal(
    State(state): State<AppState>,
    cookies: Cookies,
    Extension(sessao): Extension<Arc<SessaoConsole>>,
) -> Efeitos {
    let backend = state.backend(&cookies);
    Json(WidgetAvaliacao::new(&backend, &sessao).fechar_modal().await)
}

pub async fn handle_confirmar(
    State(state): State<AppState>,
    cookies: Cookies,
    Extension(sessao): Extension<Arc<SessaoConsole>>,
) -> Efeitos {
    tracing::debug!("POST /avaliacoes/modal/confirmar");
    let backend = state.backend(&cookies);
    Json(WidgetAvaliacao::new(&backend, &sessao).confirmar().await)
}

pub async fn handle_selecionar_professor(
    State(state): State<AppState>,
    cookies: Cookies,
    Extension(sessao): Extension<Arc<SessaoConsole>>,
    Json(form): Json<ProfessorForm>,
) -> Efeitos {
    let backend = state.backend(&cookies);
    Json(
        WidgetAvaliacao::new(&backend, &sessao)
            .selecionar_professor(form.professor_id)
            .await,
    )
}
