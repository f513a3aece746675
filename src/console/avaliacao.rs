// src/console/avaliacao.rs
//
// Widget de estrelas da página de disciplina: modal de avaliação, envio e
// atualização de todos os locais que mostram a média de um alvo.
use super::{renderizar, Efeito, Efeitos, NivelToast};
use crate::{
    models::avaliacao::{
        calcular_estatisticas, Alvo, Avaliacao, DadosPagina, NovaAvaliacao, Professor,
        ResumoAvaliacao,
    },
    services::backend::Backend,
    state::SessaoConsole,
    templates::{EstrelasModal, ModalAvaliacao, OverlayEnvio, ResumoAvaliacaoTpl},
};
use chrono::Utc;
use std::collections::HashMap;

pub const MODAL: &str = "modal-avaliacao";
pub const MODAL_ESTRELAS: &str = "modal-avaliacao-estrelas";
pub const MODAL_OVERLAY: &str = "modal-avaliacao-overlay";
pub const BOTAO_CONFIRMAR: &str = "btn-confirmar-avaliacao";
const DETALHE_PROFESSOR: &str = "avaliacao-professor-detalhe";

/// Situação do utilizador perante um alvo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Situacao {
    SemVoto,
    Enviando,
    Votou(u8),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EstadoModal {
    pub alvo: Alvo,
    pub selecionada: Option<u8>,
}

/// Cache de avaliações da página, por sessão.
#[derive(Debug, Default)]
pub struct EstadoAvaliacao {
    pub disciplina_id: Option<String>,
    pub avaliacoes: Vec<Avaliacao>,
    pub professores: Vec<Professor>,
    pub resumos: HashMap<Alvo, ResumoAvaliacao>,
    pub professor_selecionado: Option<String>,
    pub modal: Option<EstadoModal>,
    pub enviando: Option<Alvo>,
}

impl EstadoAvaliacao {
    pub fn situacao(&self, alvo: &Alvo) -> Situacao {
        if self.enviando.as_ref() == Some(alvo) {
            return Situacao::Enviando;
        }
        match self.nota_do_usuario(alvo) {
            Some(nota) => Situacao::Votou(nota),
            None => Situacao::SemVoto,
        }
    }

    /// Nota do próprio utilizador para o alvo, se já votou.
    pub fn nota_do_usuario(&self, alvo: &Alvo) -> Option<u8> {
        self.avaliacoes
            .iter()
            .find(|a| a.is_owner && a.alvo() == *alvo)
            .map(|a| a.nota)
            .filter(|nota| *nota > 0)
    }

    /// Atualiza a avaliação do utilizador para o alvo, ou acrescenta uma nova.
    pub fn registrar_avaliacao(&mut self, alvo: &Alvo, nota: u8, id: Option<i64>) {
        if let Some(existente) = self
            .avaliacoes
            .iter_mut()
            .find(|a| a.is_owner && a.alvo() == *alvo)
        {
            existente.nota = nota;
            return;
        }
        self.avaliacoes.push(Avaliacao {
            id,
            disciplina_id: self.disciplina_id.clone(),
            professor_id: alvo.professor_id().map(String::from),
            nota,
            created_at: Some(Utc::now().to_rfc3339()),
            is_owner: true,
        });
    }

    pub fn resumo(&self, alvo: &Alvo) -> ResumoAvaliacao {
        self.resumos.get(alvo).copied().unwrap_or_default()
    }

    fn nome_professor(&self, id: &str) -> &str {
        self.professores
            .iter()
            .find(|p| p.id == id)
            .and_then(|p| p.nome.as_deref())
            .unwrap_or("Professor")
    }

    /// Ids do DOM que mostram a média do alvo.
    pub fn locais(&self, alvo: &Alvo) -> Vec<String> {
        match alvo {
            Alvo::Disciplina => vec![
                "avaliacao-disciplina-cabecalho".to_string(),
                "avaliacao-disciplina-mobile".to_string(),
            ],
            Alvo::Professor(id) => {
                let mut locais = vec![
                    format!("avaliacao-professor-{}-cabecalho", id),
                    format!("avaliacao-professor-{}-mobile", id),
                    format!("avaliacao-professor-{}-lateral", id),
                ];
                if self.professor_selecionado.as_deref() == Some(id.as_str()) {
                    locais.push(DETALHE_PROFESSOR.to_string());
                }
                locais
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Estrela {
    Vazia,
    Cheia,
    Meia,
    CheiaVotada,
    MeiaVotada,
}

impl Estrela {
    pub fn classe(self) -> &'static str {
        match self {
            Estrela::Vazia => "star",
            Estrela::Cheia => "star filled",
            Estrela::Meia => "star half",
            Estrela::CheiaVotada => "star filled user-voted",
            Estrela::MeiaVotada => "star half-user-voted",
        }
    }
}

/// As cinco estrelas de uma média; `votou` troca para as variantes do próprio voto.
pub fn estrelas(media: f64, votou: bool) -> [Estrela; 5] {
    std::array::from_fn(|i| {
        let i = i as f64;
        if media >= i + 1.0 {
            if votou {
                Estrela::CheiaVotada
            } else {
                Estrela::Cheia
            }
        } else if media >= i + 0.5 {
            if votou {
                Estrela::MeiaVotada
            } else {
                Estrela::Meia
            }
        } else {
            Estrela::Vazia
        }
    })
}

pub fn texto_media(media: f64) -> String {
    if media > 0.0 {
        format!("{:.1}", media)
    } else {
        "N/A".to_string()
    }
}

pub fn texto_contagem(total: u32) -> String {
    if total == 1 {
        "1 avaliação".to_string()
    } else {
        format!("{} avaliações", total)
    }
}

fn estrelas_modal(preenchidas: u8, classe: &'static str) -> Vec<&'static str> {
    (1..=5u8)
        .map(|i| if i <= preenchidas { classe } else { "modal-star" })
        .collect()
}

fn html_resumo(resumo: ResumoAvaliacao, votou: bool, alvo: &Alvo) -> String {
    renderizar(&ResumoAvaliacaoTpl {
        classes: estrelas(resumo.media, votou).iter().map(|e| e.classe()).collect(),
        media: texto_media(resumo.media),
        contagem: texto_contagem(resumo.total),
        professor_id: alvo.professor_id().unwrap_or_default().to_string(),
    })
}

fn pintar(estado: &EstadoAvaliacao, alvo: &Alvo, efeitos: &mut Efeitos) {
    let html = html_resumo(
        estado.resumo(alvo),
        estado.nota_do_usuario(alvo).is_some(),
        alvo,
    );
    for local in estado.locais(alvo) {
        efeitos.renderizar(local, html.clone());
    }
}

/// Controlador do widget de avaliação, por sessão.
pub struct WidgetAvaliacao<'a, B: Backend> {
    backend: &'a B,
    sessao: &'a SessaoConsole,
}

impl<'a, B: Backend> WidgetAvaliacao<'a, B> {
    pub fn new(backend: &'a B, sessao: &'a SessaoConsole) -> Self {
        Self { backend, sessao }
    }

    /// Carrega os dados da página e pinta as estrelas de todos os alvos.
    pub async fn iniciar(&self, dados: DadosPagina) -> Vec<Efeito> {
        let mut estado = self.sessao.avaliacao.lock().await;

        let mut resumos = HashMap::new();
        let da_disciplina = dados
            .avaliacoes
            .iter()
            .filter(|a| a.alvo() == Alvo::Disciplina);
        resumos.insert(
            Alvo::Disciplina,
            dados
                .resumo_disciplina
                .unwrap_or_else(|| calcular_estatisticas(da_disciplina)),
        );
        for professor in &dados.professores {
            let alvo = Alvo::Professor(professor.id.clone());
            let resumo = calcular_estatisticas(dados.avaliacoes.iter().filter(|a| a.alvo() == alvo));
            resumos.insert(alvo, resumo);
        }

        tracing::debug!(
            "Avaliações: disciplina {} com {} avaliações e {} professores",
            dados.disciplina_id,
            dados.avaliacoes.len(),
            dados.professores.len()
        );

        *estado = EstadoAvaliacao {
            disciplina_id: Some(dados.disciplina_id),
            avaliacoes: dados.avaliacoes,
            professores: dados.professores,
            resumos,
            professor_selecionado: dados.professor_selecionado,
            modal: None,
            enviando: None,
        };

        let mut efeitos = Efeitos::new();
        pintar(&estado, &Alvo::Disciplina, &mut efeitos);
        for professor in &estado.professores {
            pintar(&estado, &Alvo::Professor(professor.id.clone()), &mut efeitos);
        }
        efeitos.into_vec()
    }

    /// Troca o professor mostrado no painel de detalhe.
    pub async fn selecionar_professor(&self, professor_id: Option<String>) -> Vec<Efeito> {
        let mut estado = self.sessao.avaliacao.lock().await;
        estado.professor_selecionado = professor_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty() && id != "null");

        let mut efeitos = Efeitos::new();
        if let Some(id) = estado.professor_selecionado.clone() {
            let alvo = Alvo::Professor(id);
            efeitos.renderizar(
                DETALHE_PROFESSOR,
                html_resumo(estado.resumo(&alvo), estado.nota_do_usuario(&alvo).is_some(), &alvo),
            );
        }
        efeitos.into_vec()
    }

    pub async fn abrir_modal(&self, alvo: Alvo) -> Vec<Efeito> {
        let mut estado = self.sessao.avaliacao.lock().await;
        let anterior = match estado.situacao(&alvo) {
            Situacao::Enviando => {
                tracing::debug!("Avaliações: envio em curso para {:?}, modal não aberto", alvo);
                return Vec::new();
            }
            Situacao::Votou(nota) => Some(nota),
            Situacao::SemVoto => None,
        };

        let titulo = match (&alvo, anterior) {
            (Alvo::Disciplina, None) => "Avaliar Disciplina".to_string(),
            (Alvo::Disciplina, Some(_)) => "Editar avaliação - Disciplina".to_string(),
            (Alvo::Professor(id), None) => format!("Avaliar {}", estado.nome_professor(id)),
            (Alvo::Professor(id), Some(_)) => {
                format!("Editar avaliação - {}", estado.nome_professor(id))
            }
        };
        let modal = ModalAvaliacao {
            titulo,
            subtitulo: if anterior.is_some() { "Modifique sua nota:" } else { "Selecione sua nota:" },
            anterior: anterior.map(|n| {
                let n = usize::from(n.min(5));
                format!("{}{}", "★".repeat(n), "☆".repeat(5 - n))
            }),
            estrelas: estrelas_modal(anterior.unwrap_or(0), "modal-star selected"),
            pode_confirmar: anterior.is_some(),
        };

        tracing::debug!("Avaliações: modal aberto para {:?} (nota anterior {:?})", alvo, anterior);
        estado.modal = Some(EstadoModal { alvo, selecionada: anterior });

        let mut efeitos = Efeitos::new();
        efeitos.renderizar(MODAL, renderizar(&modal));
        efeitos.into_vec()
    }

    /// Hover sobre as estrelas do modal. `None` quando o rato sai.
    pub async fn destacar(&self, nota: Option<u8>) -> Vec<Efeito> {
        let estado = self.sessao.avaliacao.lock().await;
        let Some(modal) = &estado.modal else {
            return Vec::new();
        };

        let estrelas = match nota.filter(|n| (1..=5).contains(n)) {
            Some(n) => estrelas_modal(n, "modal-star hover"),
            None => estrelas_modal(modal.selecionada.unwrap_or(0), "modal-star selected"),
        };
        let mut efeitos = Efeitos::new();
        efeitos.renderizar(MODAL_ESTRELAS, renderizar(&EstrelasModal { estrelas }));
        efeitos.into_vec()
    }

    pub async fn selecionar_nota(&self, nota: u8) -> Vec<Efeito> {
        if !(1..=5).contains(&nota) {
            tracing::warn!("Avaliações: nota {} ignorada", nota);
            return Vec::new();
        }
        let mut estado = self.sessao.avaliacao.lock().await;
        let Some(modal) = estado.modal.as_mut() else {
            return Vec::new();
        };
        modal.selecionada = Some(nota);

        let mut efeitos = Efeitos::new();
        efeitos
            .renderizar(
                MODAL_ESTRELAS,
                renderizar(&EstrelasModal { estrelas: estrelas_modal(nota, "modal-star selected") }),
            )
            .restaurar_botao(BOTAO_CONFIRMAR, "Confirmar");
        efeitos.into_vec()
    }

    pub async fn fechar_modal(&self) -> Vec<Efeito> {
        self.sessao.avaliacao.lock().await.modal = None;
        vec![Efeito::FecharModal { alvo: MODAL.into() }]
    }

    /// Botão "Confirmar" do modal.
    pub async fn confirmar(&self) -> Vec<Efeito> {
        let selecao = {
            let estado = self.sessao.avaliacao.lock().await;
            let selecao = estado
                .modal
                .as_ref()
                .and_then(|m| m.selecionada.map(|nota| (nota, m.alvo.clone())));
            // duplo clique enquanto o primeiro envio está pendente
            if let Some((_, alvo)) = &selecao {
                if estado.situacao(alvo) == Situacao::Enviando {
                    return Vec::new();
                }
            }
            selecao
        };
        let Some((nota, alvo)) = selecao else {
            let mut efeitos = Efeitos::new();
            efeitos.toast("Por favor, selecione uma avaliação.", NivelToast::Aviso);
            return efeitos.into_vec();
        };

        let mut efeitos = Efeitos::new();
        efeitos
            .renderizar(MODAL_OVERLAY, renderizar(&OverlayEnvio))
            .ocupar_botao(BOTAO_CONFIRMAR, "Enviando...");
        efeitos.extend(self.enviar(nota, alvo).await);
        efeitos.into_vec()
    }

    /// Envia a nota do utilizador para o alvo.
    pub async fn enviar_avaliacao(&self, nota: u8, alvo: Alvo) -> Vec<Efeito> {
        self.enviar(nota, alvo).await.into_vec()
    }

    async fn enviar(&self, nota: u8, alvo: Alvo) -> Efeitos {
        let mut efeitos = Efeitos::new();
        if !(1..=5).contains(&nota) {
            efeitos.toast("Nota inválida.", NivelToast::Aviso);
            return efeitos;
        }
        let Some(_guarda) = self.sessao.ocupados.ocupar(BOTAO_CONFIRMAR) else {
            return efeitos;
        };

        let disciplina_id = {
            let mut estado = self.sessao.avaliacao.lock().await;
            let Some(disciplina_id) = estado.disciplina_id.clone() else {
                tracing::warn!("Avaliações: envio sem disciplina carregada");
                efeitos
                    .renderizar(MODAL_OVERLAY, String::new())
                    .restaurar_botao(BOTAO_CONFIRMAR, "Confirmar")
                    .toast("Erro ao enviar avaliação", NivelToast::Erro);
                return efeitos;
            };
            estado.enviando = Some(alvo.clone());
            disciplina_id
        };

        tracing::info!("Avaliações: a enviar nota {} para {:?}", nota, alvo);
        let pedido = NovaAvaliacao { nota, disciplina_id, alvo };
        let resultado = self.backend.enviar_avaliacao(&pedido).await;
        let alvo = pedido.alvo;

        let mut estado = self.sessao.avaliacao.lock().await;
        estado.enviando = None;
        match resultado {
            Ok(resultado) => {
                // decidir antes de alterar o cache
                let atualizacao = estado.nota_do_usuario(&alvo).is_some();
                estado.modal = None;
                estado.registrar_avaliacao(&alvo, nota, resultado.avaliacao_id);
                estado.resumos.insert(
                    alvo.clone(),
                    ResumoAvaliacao {
                        media: resultado.nova_media,
                        total: resultado.total_avaliacoes,
                    },
                );

                efeitos.push(Efeito::FecharModal { alvo: MODAL.into() });
                pintar(&estado, &alvo, &mut efeitos);
                efeitos.toast(
                    if atualizacao { "Avaliação atualizada!" } else { "Avaliação enviada!" },
                    NivelToast::Sucesso,
                );
            }
            Err(e) => {
                tracing::error!("Avaliações: erro ao enviar nota para {:?}: {}", alvo, e);
                let mensagem = e
                    .mensagem_servidor()
                    .map(String::from)
                    .unwrap_or_else(|| "Erro ao enviar avaliação".to_string());
                efeitos
                    .renderizar(MODAL_OVERLAY, String::new())
                    .restaurar_botao(BOTAO_CONFIRMAR, "Confirmar")
                    .toast(mensagem, NivelToast::Erro);
            }
        }
        efeitos
    }
}
