// src/console/scrapper.rs
use super::{estado::Aba, formatar_data, renderizar, Efeito, Efeitos, PainelAdmin};
use crate::{
    error::ApiError,
    models::scrapper::{CredenciaisScrapper, StatusScrapper},
    services::backend::Backend,
    templates::{PainelErro, StatusScrapperTpl},
};

const BOTAO_EXECUTAR: &str = "credentials-submit";
const MODAL_CREDENCIAIS: &str = "credentials-modal";
const ATRASO_RECARGA_MS: u64 = 1000;

fn painel_status(status: &StatusScrapper) -> String {
    renderizar(&StatusScrapperTpl {
        executando: status.executando,
        ultima_execucao: formatar_data(status.ultima_execucao.as_deref(), "Nunca"),
        ultimo_sucesso: formatar_data(status.ultimo_sucesso.as_deref(), "Nunca"),
        disciplinas: status.disciplinas_capturadas,
        professores: status.professores_capturados,
        administrador: status
            .ultimo_administrador
            .clone()
            .unwrap_or_else(|| "N/A".into()),
        erro: status.ultimo_erro.clone().filter(|e| !e.trim().is_empty()),
    })
}

impl<'a, B: Backend> PainelAdmin<'a, B> {
    pub(super) async fn carregar_scrapper(&self, efeitos: &mut Efeitos) {
        match self.backend.status_scrapper().await {
            Ok(status) => {
                tracing::debug!(
                    "Painel: scrapper {} ({} execuções)",
                    if status.executando { "em execução" } else { "parado" },
                    status.total_execucoes
                );
                efeitos.renderizar(Aba::Scrapper.conteudo(), painel_status(&status));

                self.sessao.painel.lock().await.marcar_carregada(Aba::Scrapper);
            }
            Err(ApiError::NaoAutenticado) => {
                efeitos.redirecionar_login();
            }
            Err(e) => {
                tracing::error!("Painel: erro ao carregar status do scrapper: {}", e);
                let mensagem = format!("Erro ao carregar status: {}", e);
                efeitos.renderizar(
                    Aba::Scrapper.conteudo(),
                    renderizar(&PainelErro { mensagem: &mensagem }),
                );
            }
        }
    }

    /// Dispara o scrapper com as credenciais do CAGR do formulário.
    pub async fn executar_scrapper(&self, credenciais: CredenciaisScrapper) -> Vec<Efeito> {
        let Some(_guarda) = self.sessao.ocupados.ocupar(BOTAO_EXECUTAR) else {
            return Vec::new();
        };

        let mut efeitos = Efeitos::new();
        efeitos.ocupar_botao(BOTAO_EXECUTAR, "Executando...");

        tracing::info!("Painel: a executar scrapper ({:?})", credenciais);
        match self.backend.executar_scrapper(&credenciais).await {
            Ok(texto) => {
                efeitos
                    .alerta(format!("Sucesso: {}", texto.trim()))
                    .push(Efeito::FecharModal { alvo: MODAL_CREDENCIAIS.into() })
                    .push(Efeito::AgendarRecarga {
                        aba: Aba::Scrapper,
                        atraso_ms: ATRASO_RECARGA_MS,
                    });
                self.sessao.painel.lock().await.invalidar(Aba::Scrapper);
            }
            Err(ApiError::NaoAutenticado) => {
                efeitos.redirecionar_login();
            }
            Err(ApiError::AcessoNegado) => {
                tracing::warn!("Painel: execução do scrapper recusada (403)");
                efeitos.alerta("Acesso negado.");
            }
            Err(e @ (ApiError::Rede(_) | ApiError::Decodificacao(_))) => {
                tracing::error!("Painel: erro ao executar scrapper: {}", e);
                efeitos.alerta("Erro ao executar scrapper.");
            }
            Err(e) => {
                tracing::warn!("Painel: scrapper não executado: {}", e);
                let texto = e
                    .mensagem_servidor()
                    .map(String::from)
                    .unwrap_or_else(|| e.to_string());
                efeitos.alerta(format!("Erro: {}", texto));
            }
        }

        efeitos.restaurar_botao(BOTAO_EXECUTAR, "Executar");
        efeitos.into_vec()
    }
}
