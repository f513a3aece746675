// src/console/abas.rs
use super::{
    badge,
    estado::{Aba, EstadoPainel},
    renderizar, Efeito, Efeitos, PainelAdmin,
};
use crate::{error::ApiError, services::backend::Backend, templates::Carregando};

impl<'a, B: Backend> PainelAdmin<'a, B> {
    /// Abertura (ou recarga) da página do painel: descarta o estado da página
    /// anterior, carrega a aba ativa e o badge de alarmantes.
    pub async fn iniciar(&self, aba: Aba) -> Vec<Efeito> {
        {
            let mut estado = self.sessao.painel.lock().await;
            *estado = EstadoPainel::default();
            estado.aba_ativa = aba;
        }
        tracing::debug!("Painel: página iniciada na aba '{}'", aba.nome());

        let mut efeitos = Efeitos::new();
        efeitos.push(Efeito::AtivarAba { aba });
        efeitos.extend(self.carregar(aba, true).await);
        if aba != Aba::Alarmantes {
            efeitos.extend(self.badge_alarmantes().await);
        }
        efeitos.into_vec()
    }

    /// Clique numa aba: ativa-a e carrega os dados só na primeira visita.
    pub async fn trocar_aba(&self, aba: Aba) -> Vec<Efeito> {
        let carregada = {
            let mut estado = self.sessao.painel.lock().await;
            estado.aba_ativa = aba;
            estado.carregada(aba)
        };
        tracing::debug!("Painel: aba '{}' ativa (carregada: {})", aba.nome(), carregada);

        let mut efeitos = Efeitos::new();
        efeitos.push(Efeito::AtivarAba { aba });
        if !carregada {
            efeitos.extend(self.carregar(aba, false).await);
        }
        efeitos.into_vec()
    }

    /// Carrega os dados de uma aba. Com `forcar`, ignora o flag de carregada.
    pub async fn carregar_aba(&self, aba: Aba, forcar: bool) -> Vec<Efeito> {
        self.carregar(aba, forcar).await.into_vec()
    }

    pub(super) async fn carregar(&self, aba: Aba, forcar: bool) -> Efeitos {
        if !forcar && self.sessao.painel.lock().await.carregada(aba) {
            return Efeitos::new();
        }

        let botao = aba.botao_atualizar();
        let Some(_guarda) = self.sessao.ocupados.ocupar(botao) else {
            return Efeitos::new();
        };

        let mut efeitos = Efeitos::new();
        efeitos
            .renderizar(aba.conteudo(), renderizar(&Carregando))
            .ocupar_botao(botao, "Atualizando...");

        match aba {
            Aba::Usuarios => self.carregar_usuarios(&mut efeitos).await,
            Aba::Banidos => self.carregar_banidos(&mut efeitos).await,
            Aba::Alarmantes | Aba::Comentarios => {
                if let Some(lista) = aba.lista() {
                    self.carregar_comentarios(lista, &mut efeitos).await;
                }
            }
            Aba::Scrapper => self.carregar_scrapper(&mut efeitos).await,
        }

        // Sempre, com sucesso ou erro
        efeitos.restaurar_botao(botao, aba.rotulo_atualizar());
        efeitos
    }

    /// Badge de alarmantes mostrado ao abrir o painel, sem carregar a lista.
    pub async fn contagem_alarmantes(&self) -> Vec<Efeito> {
        self.badge_alarmantes().await.into_vec()
    }

    async fn badge_alarmantes(&self) -> Efeitos {
        let mut efeitos = Efeitos::new();
        match self.backend.estatisticas_comentarios().await {
            Ok(estatisticas) => {
                efeitos.push(badge(
                    "alarming-badge",
                    estatisticas.comentarios_alarmantes,
                    true,
                ));
            }
            Err(ApiError::NaoAutenticado) => {
                efeitos.redirecionar_login();
            }
            Err(e) => {
                tracing::debug!("Não foi possível carregar contagem de alarmantes: {}", e);
            }
        }
        efeitos
    }
}
