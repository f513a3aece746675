// src/state.rs
use crate::{
    config::Config,
    console::{avaliacao::EstadoAvaliacao, estado::EstadoPainel},
    services::http_backend::HttpBackend,
};
use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex as StdMutex},
    time::{Duration, Instant},
};
use tokio::sync::Mutex;
use tower_cookies::Cookies;
use uuid::Uuid;

/// Controlos (ids do DOM) com um pedido em curso.
///
/// O guarda devolvido por `ocupar` liberta o controlo quando é largado, mesmo
/// que o handler seja cancelado a meio.
#[derive(Debug, Clone, Default)]
pub struct Ocupados {
    ids: Arc<StdMutex<HashSet<String>>>,
}

impl Ocupados {
    /// `None` se o controlo já estiver ocupado.
    pub fn ocupar(&self, id: &str) -> Option<GuardaOcupado> {
        let mut ids = self.ids.lock().unwrap_or_else(|e| e.into_inner());
        if !ids.insert(id.to_string()) {
            tracing::debug!("Controlo '{}' já tem um pedido em curso, ignorado.", id);
            return None;
        }
        Some(GuardaOcupado {
            ids: self.ids.clone(),
            id: id.to_string(),
        })
    }

    pub fn ocupado(&self, id: &str) -> bool {
        self.ids
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(id)
    }
}

#[derive(Debug)]
pub struct GuardaOcupado {
    ids: Arc<StdMutex<HashSet<String>>>,
    id: String,
}

impl Drop for GuardaOcupado {
    fn drop(&mut self) {
        self.ids
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.id);
    }
}

/// Estado de UI de um separador do browser (painel + widget de avaliação).
#[derive(Debug, Default)]
pub struct SessaoConsole {
    pub painel: Arc<Mutex<EstadoPainel>>,
    pub avaliacao: Arc<Mutex<EstadoAvaliacao>>,
    pub ocupados: Ocupados,
}

#[derive(Debug)]
struct EntradaSessao {
    sessao: Arc<SessaoConsole>,
    ultimo_acesso: Instant,
}

// Mapa id de sessão -> estado de UI
#[derive(Debug, Clone, Default)]
pub struct SessoesConsole {
    entradas: Arc<Mutex<HashMap<Uuid, EntradaSessao>>>,
}

impl SessoesConsole {
    /// Devolve o estado da sessão, criando-o no primeiro acesso.
    pub async fn obter(&self, id: Uuid) -> Arc<SessaoConsole> {
        let mut entradas = self.entradas.lock().await;
        let entrada = entradas.entry(id).or_insert_with(|| {
            tracing::debug!("Novo estado de consola para a sessão {}", id);
            EntradaSessao {
                sessao: Arc::new(SessaoConsole::default()),
                ultimo_acesso: Instant::now(),
            }
        });
        entrada.ultimo_acesso = Instant::now();
        entrada.sessao.clone()
    }

    /// Remove os estados sem acesso há mais de `inatividade`. Devolve quantos saíram.
    pub async fn limpar_inativas(&self, inatividade: Duration) -> usize {
        let mut entradas = self.entradas.lock().await;
        let antes = entradas.len();
        entradas.retain(|_, e| e.ultimo_acesso.elapsed() < inatividade);
        antes - entradas.len()
    }

    pub async fn total(&self) -> usize {
        self.entradas.lock().await.len()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub http: reqwest::Client,
    pub config: Arc<Config>,
    pub sessoes: SessoesConsole,
}

impl AppState {
    /// Backend a usar neste pedido, com o cookie de sessão do browser.
    pub fn backend(&self, cookies: &Cookies) -> HttpBackend {
        let cookie = cookies
            .get(&self.config.backend_cookie)
            .map(|c| format!("{}={}", c.name(), c.value()));
        if cookie.is_none() {
            tracing::debug!("Pedido sem cookie '{}' do backend.", self.config.backend_cookie);
        }
        HttpBackend::new(self.http.clone(), self.config.backend_url.clone(), cookie)
    }
}

// Permite extrair as sessões diretamente
impl axum::extract::FromRef<AppState> for SessoesConsole {
    fn from_ref(state: &AppState) -> SessoesConsole {
        state.sessoes.clone()
    }
}
