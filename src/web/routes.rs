// src/web/routes.rs
use crate::{
    state::AppState,
    web::{admin_handlers, avaliacao_handlers, mw_sessao},
};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub fn create_router(app_state: AppState) -> Router {
    // --- Painel de administração ---
    let admin_routes = Router::new()
        .route("/iniciar", post(admin_handlers::handle_iniciar))
        .route("/abas/{aba}", post(admin_handlers::handle_trocar_aba))
        .route("/abas/{aba}/atualizar", post(admin_handlers::handle_atualizar_aba))
        .route("/contagem-alarmantes", post(admin_handlers::handle_contagem_alarmantes))
        .route("/usuarios/alternar-admin", post(admin_handlers::handle_alternar_admin))
        .route("/usuarios/excluir", post(admin_handlers::handle_excluir_usuario))
        .route("/usuarios/banir", post(admin_handlers::handle_banir_usuario))
        .route("/banidos/desbanir", post(admin_handlers::handle_desbanir_usuario))
        .route(
            "/comentarios/{lista}/pagina/{pagina}",
            post(admin_handlers::handle_ir_para_pagina),
        )
        .route("/comentarios/{id}/seguro", post(admin_handlers::handle_marcar_seguro))
        .route("/comentarios/{id}/excluir", post(admin_handlers::handle_excluir_comentario))
        .route("/comentarios/{id}/banir", post(admin_handlers::handle_banir_por_comentario))
        .route("/scrapper/executar", post(admin_handlers::handle_executar_scrapper));

    // --- Widget de avaliação ---
    let avaliacao_routes = Router::new()
        .route("/iniciar", post(avaliacao_handlers::handle_iniciar))
        .route("/modal", post(avaliacao_handlers::handle_abrir_modal))
        .route("/modal/destacar", post(avaliacao_handlers::handle_destacar))
        .route("/modal/nota", post(avaliacao_handlers::handle_selecionar_nota))
        .route("/modal/fechar", post(avaliacao_handlers::handle_fechar_modal))
        .route("/modal/confirmar", post(avaliacao_handlers::handle_confirmar))
        .route("/professor", post(avaliacao_handlers::handle_selecionar_professor));

    // Tudo o que tem estado de UI passa pelo middleware de sessão
    let console_routes = Router::new()
        .nest("/admin", admin_routes)
        .nest("/avaliacoes", avaliacao_routes)
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_sessao::garantir_sessao,
        ));

    Router::new()
        .route("/", get(|| async { "Painel de avaliações ativo" }))
        .merge(console_routes)
        .with_state(app_state)
}
