// src/web/mod.rs
pub mod admin_handlers;
pub mod avaliacao_handlers;
pub mod mw_sessao;
pub mod routes;
