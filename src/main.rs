// src/main.rs

// --- Declaração dos Módulos ---
mod config;
mod console;
mod error;
mod models;
mod services;
mod state;
mod templates;
mod web;

// --- Imports ---
use crate::{
    config::Config,
    error::AppError,
    services::http_backend,
    state::{AppState, SessoesConsole},
};
use axum::serve;
use std::{env, sync::Arc};
use time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Configuração do Logging (Tracing) ---
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                env::var("RUST_LOG")
                    .unwrap_or_else(|_| "painel_avaliacoes=debug,tower_http=info".into())
                    .into()
            }),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("🚀 Iniciando painel de avaliações...");

    // --- Configuração ---
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuração inválida: {}", e);
            return Err(anyhow::anyhow!("Falha ao ler configuração: {}", e));
        }
    };
    tracing::info!("🔗 Backend em {}", config.backend_url);

    let http = http_backend::criar_cliente(&config).map_err(AppError::from)?;

    // --- Configuração das Sessões ---
    // Estado de UI apenas em memória: perde-se ao reiniciar
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::hours(config.session_inactivity_hours)));
    tracing::info!("🔑 Camada de sessão configurada.");

    let sessoes = SessoesConsole::default();
    let inatividade = std::time::Duration::from_secs(
        u64::try_from(config.session_inactivity_hours.max(1)).unwrap_or(24) * 60 * 60,
    );
    let sessoes_limpeza = sessoes.clone();
    tokio::spawn(async move {
        let mut intervalo = tokio::time::interval(std::time::Duration::from_secs(60 * 60));
        loop {
            intervalo.tick().await;
            let removidas = sessoes_limpeza.limpar_inativas(inatividade).await;
            if removidas > 0 {
                tracing::debug!(
                    "🧹 {} estados de consola inativos removidos ({} ativos)",
                    removidas,
                    sessoes_limpeza.total().await
                );
            }
        }
    });
    tracing::info!("🧹 Tarefa de limpeza de sessões iniciada.");

    // --- Criação do Estado da Aplicação ---
    let addr = config.bind_addr;
    let app_state = AppState {
        http,
        config: Arc::new(config),
        sessoes,
    };

    // --- Configuração do Endereço e Listener ---
    tracing::info!("📡 Servidor escutando em http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("❌ Falha ao iniciar listener em {}: {}", addr, e);
            return Err(e.into());
        }
    };

    // --- Criação do Router e Aplicação das Camadas (Middlewares) ---
    let app = web::routes::create_router(app_state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CookieManagerLayer::new())
            .layer(session_layer),
    );
    tracing::info!("✅ Router e middlewares configurados.");

    // --- Início do Servidor ---
    if let Err(e) = serve(listener, app.into_make_service()).await {
        tracing::error!("❌ Erro fatal no servidor: {}", e);
        return Err(e.into());
    }

    Ok(())
}
