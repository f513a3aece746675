// src/console/comentarios.rs
use super::{estado::Aba, formatar_data, renderizar, Efeito, Efeitos, PainelAdmin};
use crate::{
    error::ApiError,
    models::comentario::{Comentario, ListaComentarios, Pagina, TAMANHO_PAGINA},
    services::backend::Backend,
    templates::{
        Anexo, CartaoComentario, LinkDisciplina, ListaCartoes, Paginacao, PainelErro, Selo, Vazio,
    },
};

const LIMITE_PREVIA: usize = 300;
const LIMITE_TEXTO_LONGO: usize = 150;

pub fn id_cartao(lista: ListaComentarios, id: i64) -> String {
    format!("comentario-{}-{}", lista.nome(), id)
}

pub fn id_botao_seguro(id: i64) -> String {
    format!("btn-seguro-{}", id)
}

pub fn id_botao_excluir(lista: ListaComentarios, id: i64) -> String {
    format!("btn-excluir-{}-{}", lista.nome(), id)
}

pub fn id_botao_banir(lista: ListaComentarios, id: i64) -> String {
    format!("btn-banir-{}-{}", lista.nome(), id)
}

pub fn id_paginacao(lista: ListaComentarios) -> &'static str {
    match lista {
        ListaComentarios::Alarmantes => "alarming-pagination",
        ListaComentarios::Todos => "all-pagination",
    }
}

fn id_contador(lista: ListaComentarios) -> &'static str {
    match lista {
        ListaComentarios::Alarmantes => "alarming-count",
        ListaComentarios::Todos => "all-comments-count",
    }
}

fn texto_contador(lista: ListaComentarios, total: u64) -> String {
    match lista {
        ListaComentarios::Alarmantes => format!("{} para revisão", total),
        ListaComentarios::Todos => format!("{} comentário(s)", total),
    }
}

/// Corta o texto em `limite` caracteres (não bytes) e acrescenta "...".
pub fn previa(texto: &str, limite: usize) -> String {
    match texto.char_indices().nth(limite) {
        Some((corte, _)) => format!("{}...", &texto[..corte]),
        None => texto.to_string(),
    }
}

fn selos(comentario: &Comentario) -> Vec<Selo> {
    let mut selos = Vec::new();
    if comentario.denunciado {
        selos.push(Selo {
            classe: "badge-danger",
            texto: format!("🚨 Denunciado ({}x)", comentario.denuncias_count.filter(|n| *n > 0).unwrap_or(1)),
        });
    }
    if !comentario.arquivos.is_empty() {
        selos.push(Selo {
            classe: "badge-info",
            texto: format!("📎 {} arquivo(s)", comentario.arquivos.len()),
        });
    }
    let tamanho = comentario.texto.as_deref().map_or(0, |t| t.chars().count());
    if tamanho > LIMITE_TEXTO_LONGO {
        selos.push(Selo {
            classe: "badge-warning",
            texto: format!("📝 {} chars", tamanho),
        });
    }
    selos
}

fn cartao(comentario: &Comentario, lista: ListaComentarios) -> CartaoComentario {
    let disciplina = comentario.disciplina_nome.as_ref().map(|nome| LinkDisciplina {
        href: format!(
            "/class/{}",
            urlencoding::encode(comentario.disciplina_id.as_deref().unwrap_or_default())
        ),
        nome: nome.clone(),
    });

    let anexos = comentario
        .arquivos
        .iter()
        .map(|arquivo| Anexo {
            url: if arquivo.e_imagem() {
                format!("/api/arquivos/{}", arquivo.id)
            } else {
                format!("/api/arquivos/{}?download=true", arquivo.id)
            },
            nome: arquivo.nome_original.clone().unwrap_or_default(),
            imagem: arquivo.e_imagem(),
        })
        .collect();

    let editado_em = if comentario.edited {
        comentario
            .edited_at
            .as_deref()
            .map(|data| formatar_data(Some(data), "N/A"))
    } else {
        None
    };

    CartaoComentario {
        id: comentario.id,
        id_cartao: id_cartao(lista, comentario.id),
        lista: lista.nome(),
        alarmante: comentario.alarmante,
        iniciais: comentario.user_initials.clone().unwrap_or_else(|| "?".into()),
        autor: comentario.user_name.clone().unwrap_or_else(|| "Usuário".into()),
        email: comentario.user_email.clone().unwrap_or_default(),
        data: formatar_data(comentario.created_at.as_deref(), "N/A"),
        editado_em,
        selos: selos(comentario),
        disciplina,
        professor: comentario.professor_nome.clone().unwrap_or_else(|| "N/A".into()),
        respostas: comentario.respostas_count,
        texto: previa(comentario.texto.as_deref().unwrap_or_default(), LIMITE_PREVIA),
        anexos,
        votos_positivos: comentario.up_votes,
        votos_negativos: comentario.down_votes,
        mostrar_seguro: lista == ListaComentarios::Alarmantes,
        btn_seguro: id_botao_seguro(comentario.id),
        btn_excluir: id_botao_excluir(lista, comentario.id),
        btn_banir: id_botao_banir(lista, comentario.id),
    }
}

/// Cartões de uma página de comentários, ou o estado vazio da lista.
pub fn lista_cartoes(comentarios: &[Comentario], lista: ListaComentarios) -> String {
    if comentarios.is_empty() {
        let mensagem = match lista {
            ListaComentarios::Alarmantes => "✅ Nenhum comentário para revisão!",
            ListaComentarios::Todos => "Nenhum comentário encontrado.",
        };
        return renderizar(&Vazio { classe: "no-comments", mensagem });
    }
    let cartoes = comentarios.iter().map(|c| cartao(c, lista)).collect();
    renderizar(&ListaCartoes { cartoes })
}

/// Controlos de paginação; vazio quando há uma página ou menos.
pub fn paginacao<T>(pagina: &Pagina<T>, lista: ListaComentarios) -> String {
    if pagina.total_pages <= 1 {
        return String::new();
    }
    renderizar(&Paginacao {
        lista: lista.nome(),
        anterior: pagina.tem_anterior().then(|| pagina.current_page - 1),
        proxima: pagina.tem_proxima().then(|| pagina.current_page + 1),
        atual: pagina.current_page + 1,
        total: pagina.total_pages,
    })
}

impl<'a, B: Backend> PainelAdmin<'a, B> {
    pub(super) async fn carregar_comentarios(&self, lista: ListaComentarios, efeitos: &mut Efeitos) {
        let aba = Aba::da_lista(lista);
        let numero = self.sessao.painel.lock().await.pagina(lista);

        match self.backend.listar_comentarios(lista, numero, TAMANHO_PAGINA).await {
            Ok(pagina) => {
                tracing::debug!(
                    "Painel: {} página {} de {} ({} no total)",
                    lista.nome(),
                    pagina.current_page + 1,
                    pagina.total_pages,
                    pagina.total_elements
                );
                efeitos.texto(id_contador(lista), texto_contador(lista, pagina.total_elements));
                if let Some(badge) = aba.badge() {
                    efeitos.badge(badge, pagina.total_elements, lista == ListaComentarios::Alarmantes);
                }
                efeitos
                    .renderizar(aba.conteudo(), lista_cartoes(&pagina.content, lista))
                    .renderizar(id_paginacao(lista), paginacao(&pagina, lista));

                let mut estado = self.sessao.painel.lock().await;
                estado.definir_total_paginas(lista, pagina.total_pages);
                *estado.comentarios_mut(lista) = pagina.content;
                estado.marcar_carregada(aba);
            }
            Err(ApiError::NaoAutenticado) => {
                efeitos.redirecionar_login();
            }
            Err(e) => {
                tracing::error!("Painel: erro ao carregar comentários ({}): {}", lista.nome(), e);
                efeitos.renderizar(
                    aba.conteudo(),
                    renderizar(&PainelErro { mensagem: "Erro ao carregar comentários." }),
                );
            }
        }
    }

    /// Muda de página numa das listas de comentários.
    ///
    /// Só aceita páginas dentro do último `totalPages` conhecido.
    pub async fn ir_para_pagina(&self, lista: ListaComentarios, pagina: u32) -> Vec<Efeito> {
        let aba = Aba::da_lista(lista);
        {
            let mut estado = self.sessao.painel.lock().await;
            // carga em curso: a página e o flag de carregada não mudam
            if self.sessao.ocupados.ocupado(aba.botao_atualizar()) {
                tracing::debug!(
                    "Painel: '{}' ainda a carregar, página {} ignorada",
                    lista.nome(),
                    pagina
                );
                return Vec::new();
            }
            let limite = estado.total_paginas(lista).unwrap_or(0).max(1);
            if pagina >= limite {
                tracing::warn!(
                    "Painel: página {} de '{}' fora do intervalo (total {})",
                    pagina,
                    lista.nome(),
                    limite
                );
                return Vec::new();
            }
            estado.definir_pagina(lista, pagina);
            estado.invalidar(aba);
        }

        let mut efeitos = Efeitos::new();
        efeitos.push(Efeito::DesabilitarBotoes { alvo: id_paginacao(lista).to_string() });
        efeitos.extend(self.carregar(aba, false).await);
        efeitos.into_vec()
    }

    /// Tira um comentário da lista de alarmantes.
    pub async fn marcar_seguro(&self, id: i64) -> Vec<Efeito> {
        let botao = id_botao_seguro(id);
        let Some(_guarda) = self.sessao.ocupados.ocupar(&botao) else {
            return Vec::new();
        };

        let mut efeitos = Efeitos::new();
        efeitos.ocupar_botao(&botao, "Processando...");

        match self.backend.marcar_seguro(id).await {
            Ok(()) => {
                tracing::info!("Painel: comentário {} marcado como seguro", id);
                efeitos.remover(id_cartao(ListaComentarios::Alarmantes, id));
                {
                    let mut estado = self.sessao.painel.lock().await;
                    estado.alarmantes.retain(|c| c.id != id);
                    estado.invalidar(Aba::Alarmantes);
                }
                efeitos.extend(self.carregar(Aba::Alarmantes, false).await);
            }
            Err(ApiError::NaoAutenticado) => {
                efeitos.redirecionar_login();
            }
            Err(e) => {
                tracing::error!("Painel: erro ao marcar {} como seguro: {}", id, e);
                efeitos
                    .restaurar_botao(&botao, "✓ Seguro")
                    .alerta("Erro ao marcar comentário como seguro.");
            }
        }
        efeitos.into_vec()
    }

    /// Apaga um comentário; `lista` indica de que cartão veio o clique.
    pub async fn excluir_comentario(&self, lista: ListaComentarios, id: i64) -> Vec<Efeito> {
        let botao = id_botao_excluir(lista, id);
        let Some(_guarda) = self.sessao.ocupados.ocupar(&botao) else {
            return Vec::new();
        };

        let mut efeitos = Efeitos::new();
        efeitos.ocupar_botao(&botao, "Deletando...");

        match self.backend.excluir_comentario(id).await {
            Ok(()) => {
                tracing::info!("Painel: comentário {} apagado", id);
                efeitos
                    .remover(id_cartao(ListaComentarios::Alarmantes, id))
                    .remover(id_cartao(ListaComentarios::Todos, id));
                // As duas listas ficam desatualizadas
                let mut estado = self.sessao.painel.lock().await;
                estado.alarmantes.retain(|c| c.id != id);
                estado.comentarios.retain(|c| c.id != id);
                estado.invalidar(Aba::Alarmantes);
                estado.invalidar(Aba::Comentarios);
            }
            Err(ApiError::NaoAutenticado) => {
                efeitos.redirecionar_login();
            }
            Err(e) => {
                tracing::error!("Painel: erro ao apagar comentário {}: {}", id, e);
                efeitos
                    .restaurar_botao(&botao, "🗑️ Deletar")
                    .alerta("Erro ao deletar comentário.");
            }
        }
        efeitos.into_vec()
    }

    /// Bane o autor de um comentário.
    pub async fn banir_por_comentario(
        &self,
        lista: ListaComentarios,
        id: i64,
        motivo: Option<&str>,
    ) -> Vec<Efeito> {
        let botao = id_botao_banir(lista, id);
        let Some(_guarda) = self.sessao.ocupados.ocupar(&botao) else {
            return Vec::new();
        };
        let motivo = motivo.map(str::trim).filter(|m| !m.is_empty());

        let mut efeitos = Efeitos::new();
        efeitos.ocupar_botao(&botao, "Banindo...");

        match self.backend.banir_por_comentario(id, motivo).await {
            Ok(()) => {
                tracing::info!("Painel: autor do comentário {} banido", id);
                efeitos
                    .restaurar_botao(&botao, "⛔ Banir")
                    .alerta("Usuário banido com sucesso.");

                let ativa = {
                    let mut estado = self.sessao.painel.lock().await;
                    estado.invalidar(Aba::Alarmantes);
                    estado.invalidar(Aba::Comentarios);
                    estado.invalidar(Aba::Banidos);
                    estado.aba_ativa
                };
                efeitos.extend(self.carregar(ativa, false).await);
            }
            Err(ApiError::NaoAutenticado) => {
                efeitos.redirecionar_login();
            }
            Err(e @ (ApiError::Rede(_) | ApiError::Decodificacao(_))) => {
                tracing::error!("Painel: erro ao banir autor do comentário {}: {}", id, e);
                efeitos
                    .restaurar_botao(&botao, "⛔ Banir")
                    .alerta("Erro ao banir usuário.");
            }
            Err(e) => {
                tracing::warn!("Painel: banimento pelo comentário {} recusado: {}", id, e);
                let texto = e
                    .mensagem_servidor()
                    .map(String::from)
                    .unwrap_or_else(|| e.to_string());
                efeitos
                    .restaurar_botao(&botao, "⛔ Banir")
                    .alerta(format!("Erro ao banir usuário: {}", texto));
            }
        }
        efeitos.into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::comentario::Arquivo,
        services::fake_backend::{comentario, FakeBackend},
        state::SessaoConsole,
    };

    fn html_de(efeitos: &[Efeito], alvo_procurado: &str) -> Option<String> {
        efeitos.iter().rev().find_map(|e| match e {
            Efeito::Renderizar { alvo, html } if alvo == alvo_procurado => Some(html.clone()),
            _ => None,
        })
    }

    fn varios(n: i64) -> Vec<Comentario> {
        (1..=n).map(|i| comentario(i, &format!("comentário {}", i))).collect()
    }

    #[test]
    fn previa_conta_caracteres() {
        let texto = "é".repeat(301);
        let p = previa(&texto, 300);
        assert_eq!(p.chars().count(), 303);
        assert!(p.ends_with("..."));
        assert_eq!(previa("curto", 300), "curto");
    }

    #[test]
    fn selos_do_cartao() {
        let mut c = comentario(7, &"a".repeat(151));
        c.denunciado = true;
        c.arquivos = vec![
            Arquivo { id: 1, nome_original: Some("a.png".into()), tipo_mime: Some("image/png".into()) },
            Arquivo { id: 2, nome_original: Some("b.pdf".into()), tipo_mime: Some("application/pdf".into()) },
        ];
        let html = lista_cartoes(&[c], ListaComentarios::Todos);

        assert!(html.contains("🚨 Denunciado (1x)"));
        assert!(html.contains("📎 2 arquivo(s)"));
        assert!(html.contains("📝 151 chars"));
        assert!(html.contains(r#"src="/api/arquivos/1""#));
        assert!(html.contains(r#"href="/api/arquivos/2?download=true""#));
        assert!(html.contains(r#"href="/class/INE5401""#));
        // "Seguro" só existe na lista de alarmantes
        assert!(!html.contains("✓ Seguro"));
    }

    #[test]
    fn listas_vazias() {
        assert!(lista_cartoes(&[], ListaComentarios::Alarmantes).contains("✅ Nenhum comentário para revisão!"));
        assert!(lista_cartoes(&[], ListaComentarios::Todos).contains("Nenhum comentário encontrado."));
    }

    #[test]
    fn paginacao_omite_botoes_nas_pontas() {
        let pagina = |atual, total| Pagina::<()> {
            content: vec![],
            total_elements: 0,
            total_pages: total,
            current_page: atual,
        };

        assert_eq!(paginacao(&pagina(0, 1), ListaComentarios::Todos), "");

        let primeira = paginacao(&pagina(0, 3), ListaComentarios::Todos);
        assert!(!primeira.contains("← Anterior"));
        assert!(primeira.contains("Próxima →"));
        assert!(primeira.contains("Página 1 de 3"));

        let ultima = paginacao(&pagina(2, 3), ListaComentarios::Todos);
        assert!(ultima.contains("← Anterior"));
        assert!(!ultima.contains("Próxima →"));
        assert!(ultima.contains("/admin/comentarios/comments/pagina/1"));
    }

    #[tokio::test]
    async fn carregar_mostra_contador_e_paginacao() {
        let backend = FakeBackend::new().com_comentarios(vec![], varios(25));
        let sessao = SessaoConsole::default();

        let efeitos = PainelAdmin::new(&backend, &sessao)
            .carregar_aba(Aba::Comentarios, false)
            .await;

        assert!(efeitos.contains(&Efeito::Texto {
            alvo: "all-comments-count".into(),
            texto: "25 comentário(s)".into()
        }));
        assert!(html_de(&efeitos, "all-pagination").unwrap().contains("Página 1 de 3"));
        assert_eq!(sessao.painel.lock().await.total_paginas(ListaComentarios::Todos), Some(3));
    }

    #[tokio::test]
    async fn paginacao_ignorada_durante_carga() {
        let backend = FakeBackend::new().com_comentarios(vec![], varios(25));
        let sessao = SessaoConsole::default();
        let painel = PainelAdmin::new(&backend, &sessao);
        painel.carregar_aba(Aba::Comentarios, false).await;

        let guarda = sessao.ocupados.ocupar("refresh-comments");
        assert!(painel.ir_para_pagina(ListaComentarios::Todos, 1).await.is_empty());
        {
            let estado = sessao.painel.lock().await;
            assert_eq!(estado.pagina(ListaComentarios::Todos), 0);
            assert!(estado.carregada(Aba::Comentarios));
        }
        assert_eq!(backend.contar("listar_comentarios"), 1);

        drop(guarda);
        let efeitos = painel.ir_para_pagina(ListaComentarios::Todos, 1).await;
        assert!(html_de(&efeitos, "all-pagination").unwrap().contains("Página 2 de 3"));
        assert_eq!(sessao.painel.lock().await.pagina(ListaComentarios::Todos), 1);
    }

    #[tokio::test]
    async fn paginas_fora_do_intervalo_sao_rejeitadas() {
        let backend = FakeBackend::new().com_comentarios(vec![], varios(25));
        let sessao = SessaoConsole::default();
        let painel = PainelAdmin::new(&backend, &sessao);
        painel.carregar_aba(Aba::Comentarios, false).await;

        assert!(painel.ir_para_pagina(ListaComentarios::Todos, 3).await.is_empty());
        assert_eq!(backend.contar("listar_comentarios"), 1);

        let efeitos = painel.ir_para_pagina(ListaComentarios::Todos, 2).await;
        assert_eq!(
            efeitos[0],
            Efeito::DesabilitarBotoes { alvo: "all-pagination".into() }
        );
        let html = html_de(&efeitos, "all-pagination").unwrap();
        assert!(html.contains("Página 3 de 3"));
        assert!(!html.contains("Próxima →"));
        // a outra lista continua na página 0
        assert_eq!(sessao.painel.lock().await.pagina(ListaComentarios::Alarmantes), 0);
    }

    #[tokio::test]
    async fn marcar_seguro_remove_e_recarrega_alarmantes() {
        let backend = FakeBackend::new().com_comentarios(varios(1), vec![]);
        let sessao = SessaoConsole::default();
        let painel = PainelAdmin::new(&backend, &sessao);
        painel.carregar_aba(Aba::Alarmantes, false).await;

        let efeitos = painel.marcar_seguro(1).await;
        assert!(efeitos.contains(&Efeito::Remover { alvo: "comentario-alarming-1".into() }));
        assert!(html_de(&efeitos, "alarming-content")
            .unwrap()
            .contains("✅ Nenhum comentário para revisão!"));
        assert_eq!(backend.contar("listar_alarmantes"), 2);
    }

    #[tokio::test]
    async fn excluir_invalida_as_duas_listas() {
        let backend = FakeBackend::new().com_comentarios(varios(2), varios(2));
        let sessao = SessaoConsole::default();
        let painel = PainelAdmin::new(&backend, &sessao);
        painel.carregar_aba(Aba::Alarmantes, false).await;
        painel.carregar_aba(Aba::Comentarios, false).await;

        painel.excluir_comentario(ListaComentarios::Todos, 1).await;
        let estado = sessao.painel.lock().await;
        assert!(!estado.carregada(Aba::Alarmantes));
        assert!(!estado.carregada(Aba::Comentarios));
        assert_eq!(estado.comentarios.len(), 1);
    }

    #[tokio::test]
    async fn falha_ao_excluir_restaura_botao() {
        let backend = FakeBackend::new();
        backend.falhar("excluir_comentario", ApiError::Status { status: 500, mensagem: "x".into() });
        let sessao = SessaoConsole::default();

        let efeitos = PainelAdmin::new(&backend, &sessao)
            .excluir_comentario(ListaComentarios::Alarmantes, 9)
            .await;
        assert!(efeitos.contains(&Efeito::Botao {
            alvo: "btn-excluir-alarming-9".into(),
            habilitado: true,
            rotulo: "🗑️ Deletar".into(),
            carregando: false,
        }));
        assert!(efeitos.contains(&Efeito::Alerta { mensagem: "Erro ao deletar comentário.".into() }));
    }

    #[tokio::test]
    async fn banir_por_comentario_recarrega_aba_ativa() {
        let backend = FakeBackend::new().com_comentarios(varios(3), vec![]);
        let sessao = SessaoConsole::default();
        let painel = PainelAdmin::new(&backend, &sessao);
        painel.trocar_aba(Aba::Alarmantes).await;

        let efeitos = painel.banir_por_comentario(ListaComentarios::Alarmantes, 2, None).await;
        assert!(efeitos.contains(&Efeito::Alerta { mensagem: "Usuário banido com sucesso.".into() }));
        assert_eq!(backend.contar("listar_alarmantes"), 2);
        assert!(!sessao.painel.lock().await.carregada(Aba::Banidos));
    }

    #[tokio::test]
    async fn erro_do_servidor_ao_banir_por_comentario() {
        let backend = FakeBackend::new();
        backend.falhar("banir_por_comentario", ApiError::Validacao("Usuário já está banido".into()));
        let sessao = SessaoConsole::default();

        let efeitos = PainelAdmin::new(&backend, &sessao)
            .banir_por_comentario(ListaComentarios::Todos, 4, Some("spam"))
            .await;
        assert!(efeitos.contains(&Efeito::Alerta {
            mensagem: "Erro ao banir usuário: Usuário já está banido".into()
        }));
    }
}
