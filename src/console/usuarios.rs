// src/console/usuarios.rs
use super::{estado::Aba, formatar_data, renderizar, Efeito, Efeitos, PainelAdmin};
use crate::{
    error::ApiError,
    models::usuario::{Usuario, UsuarioBanido},
    services::backend::Backend,
    templates::{
        LinhaBanido, LinhaUsuario, LinhaUsuarioTpl, PainelErro, TabelaBanidos, TabelaUsuarios, Vazio,
    },
};

pub const SEM_USUARIOS: &str = "Nenhum usuário cadastrado";
pub const SEM_BANIDOS: &str = "✅ Nenhum usuário banido";

pub fn id_linha_usuario(email: &str) -> String {
    format!("linha-usuario-{}", email)
}

pub fn id_botao_admin(email: &str) -> String {
    format!("btn-admin-{}", email)
}

pub fn id_botao_excluir(email: &str) -> String {
    format!("btn-excluir-{}", email)
}

pub fn id_botao_banir(email: &str) -> String {
    format!("btn-banir-{}", email)
}

pub fn id_linha_banido(matricula: &str) -> String {
    format!("linha-banido-{}", matricula)
}

pub fn id_botao_desbanir(matricula: &str) -> String {
    format!("btn-desbanir-{}", matricula)
}

fn rotulo_admin(admin: bool) -> &'static str {
    if admin {
        "Remover Admin"
    } else {
        "Tornar Admin"
    }
}

fn ou_na(valor: Option<&str>) -> String {
    valor.filter(|v| !v.is_empty()).unwrap_or("N/A").to_string()
}

fn linha_usuario(usuario: &Usuario, proprio: bool) -> LinhaUsuario {
    LinhaUsuario {
        id_linha: id_linha_usuario(&usuario.email),
        email: usuario.email.clone(),
        nome: ou_na(usuario.nome.as_deref()),
        matricula: ou_na(usuario.matricula.as_deref()),
        curso: ou_na(usuario.curso.as_deref()),
        admin: usuario.admin,
        proprio,
        btn_admin: id_botao_admin(&usuario.email),
        btn_excluir: id_botao_excluir(&usuario.email),
        btn_banir: id_botao_banir(&usuario.email),
    }
}

/// Tabela de utilizadores, ou o estado vazio. `atual` é o email do administrador.
pub fn tabela_usuarios(usuarios: &[Usuario], atual: Option<&str>) -> String {
    if usuarios.is_empty() {
        return renderizar(&Vazio { classe: "no-users", mensagem: SEM_USUARIOS });
    }
    let linhas = usuarios
        .iter()
        .map(|u| linha_usuario(u, atual == Some(u.email.as_str())))
        .collect();
    renderizar(&TabelaUsuarios { linhas })
}

pub fn tabela_banidos(banidos: &[UsuarioBanido]) -> String {
    if banidos.is_empty() {
        return renderizar(&Vazio { classe: "no-users", mensagem: SEM_BANIDOS });
    }
    let linhas = banidos
        .iter()
        .map(|b| LinhaBanido {
            id_linha: id_linha_banido(&b.matricula),
            nome: ou_na(b.nome.as_deref()),
            email: ou_na(b.email.as_deref()),
            matricula: ou_na(Some(b.matricula.as_str())),
            banido_em: formatar_data(b.banido_em.as_deref(), "N/A"),
            banido_por: ou_na(b.banido_por.as_deref()),
            motivo: b
                .motivo
                .clone()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "-".into()),
            motivo_completo: b.motivo.clone().unwrap_or_default(),
            btn_desbanir: id_botao_desbanir(&b.matricula),
        })
        .collect();
    renderizar(&TabelaBanidos { linhas })
}

impl<'a, B: Backend> PainelAdmin<'a, B> {
    pub(super) async fn carregar_usuarios(&self, efeitos: &mut Efeitos) {
        let em_cache = self.sessao.painel.lock().await.usuario_atual.clone();

        // O utilizador atual só é pedido uma vez por sessão
        let (usuarios, atual) = match em_cache {
            Some(atual) => (self.backend.listar_usuarios().await, Ok(atual)),
            None => tokio::join!(self.backend.listar_usuarios(), self.backend.usuario_atual()),
        };

        let atual = match atual {
            Ok(atual) => Some(atual),
            Err(e) => {
                tracing::warn!("Painel: utilizador atual indisponível ({}), sem proteção da própria linha", e);
                None
            }
        };

        match usuarios {
            Ok(usuarios) => {
                let mut estado = self.sessao.painel.lock().await;
                if atual.is_some() {
                    estado.usuario_atual = atual;
                }
                let html = tabela_usuarios(
                    &usuarios,
                    estado.usuario_atual.as_ref().map(|u| u.email.as_str()),
                );
                tracing::debug!("Painel: {} utilizadores carregados", usuarios.len());
                efeitos
                    .badge("users-badge", usuarios.len() as u64, false)
                    .renderizar(Aba::Usuarios.conteudo(), html);
                estado.usuarios = usuarios;
                estado.marcar_carregada(Aba::Usuarios);
            }
            Err(ApiError::NaoAutenticado) => {
                efeitos.redirecionar_login();
            }
            Err(e) => {
                tracing::error!("Painel: erro ao carregar utilizadores: {}", e);
                efeitos.renderizar(
                    Aba::Usuarios.conteudo(),
                    renderizar(&PainelErro {
                        mensagem: "Erro ao carregar usuários. Clique em Atualizar para tentar novamente.",
                    }),
                );
            }
        }
    }

    pub(super) async fn carregar_banidos(&self, efeitos: &mut Efeitos) {
        match self.backend.listar_banidos().await {
            Ok(banidos) => {
                tracing::debug!("Painel: {} utilizadores banidos", banidos.len());
                efeitos
                    .badge("banned-badge", banidos.len() as u64, false)
                    .renderizar(Aba::Banidos.conteudo(), tabela_banidos(&banidos));
                let mut estado = self.sessao.painel.lock().await;
                estado.banidos = banidos;
                estado.marcar_carregada(Aba::Banidos);
            }
            Err(ApiError::NaoAutenticado) => {
                efeitos.redirecionar_login();
            }
            Err(e) => {
                tracing::error!("Painel: erro ao carregar banidos: {}", e);
                efeitos.renderizar(
                    Aba::Banidos.conteudo(),
                    renderizar(&PainelErro { mensagem: "Erro ao carregar usuários banidos." }),
                );
            }
        }
    }

    /// Promove ou despromove um utilizador.
    pub async fn alternar_admin(&self, email: &str) -> Vec<Efeito> {
        let botao = id_botao_admin(email);
        let Some(_guarda) = self.sessao.ocupados.ocupar(&botao) else {
            return Vec::new();
        };

        let admin = self
            .sessao
            .painel
            .lock()
            .await
            .usuarios
            .iter()
            .find(|u| u.email == email)
            .is_some_and(|u| u.admin);
        let rotulo_original = rotulo_admin(admin);

        let mut efeitos = Efeitos::new();
        efeitos.ocupar_botao(&botao, "Processando...");

        match self.backend.alternar_admin(email).await {
            Ok(()) => {
                let mut estado = self.sessao.painel.lock().await;
                let proprio = estado.e_usuario_atual(email);
                match estado.usuarios.iter_mut().find(|u| u.email == email) {
                    Some(usuario) => {
                        usuario.admin = !usuario.admin;
                        tracing::info!("Painel: '{}' agora admin={}", email, usuario.admin);
                        let linha = linha_usuario(usuario, proprio);
                        efeitos.substituir(id_linha_usuario(email), renderizar(&LinhaUsuarioTpl { linha }));
                    }
                    None => {
                        efeitos.restaurar_botao(&botao, rotulo_admin(!admin));
                    }
                }
            }
            Err(ApiError::Validacao(_)) => {
                tracing::warn!("Painel: alteração de admin recusada para '{}'", email);
                efeitos
                    .restaurar_botao(&botao, rotulo_original)
                    .alerta("Erro: Não é possível alterar o status de admin do próprio usuário.");
            }
            Err(ApiError::NaoAutenticado) => {
                efeitos.redirecionar_login();
            }
            Err(e) => {
                tracing::error!("Painel: erro ao alterar admin de '{}': {}", email, e);
                efeitos
                    .restaurar_botao(&botao, rotulo_original)
                    .alerta("Erro ao alterar status de admin.");
            }
        }
        efeitos.into_vec()
    }

    pub async fn excluir_usuario(&self, email: &str) -> Vec<Efeito> {
        let botao = id_botao_excluir(email);
        let Some(_guarda) = self.sessao.ocupados.ocupar(&botao) else {
            return Vec::new();
        };

        let mut efeitos = Efeitos::new();
        efeitos.ocupar_botao(&botao, "Excluindo...");

        let resultado = self.backend.excluir_usuario(email).await;
        efeitos.restaurar_botao(&botao, "Excluir");

        match resultado {
            Ok(()) => {
                tracing::info!("Painel: utilizador '{}' excluído", email);
                self.remover_linha_usuario(email, &mut efeitos).await;
            }
            Err(ApiError::Validacao(_)) => {
                efeitos.alerta("Erro: Não é possível excluir o próprio usuário.");
            }
            Err(ApiError::NaoAutenticado) => {
                efeitos.redirecionar_login();
            }
            Err(e) => {
                tracing::error!("Painel: erro ao excluir '{}': {}", email, e);
                efeitos.alerta("Erro ao excluir usuário.");
            }
        }
        efeitos.into_vec()
    }

    /// Bane um utilizador. `motivo` vazio é enviado como ausente.
    pub async fn banir_usuario(&self, email: &str, motivo: Option<&str>) -> Vec<Efeito> {
        let botao = id_botao_banir(email);
        let Some(_guarda) = self.sessao.ocupados.ocupar(&botao) else {
            return Vec::new();
        };
        let motivo = motivo.map(str::trim).filter(|m| !m.is_empty());

        let mut efeitos = Efeitos::new();
        efeitos.ocupar_botao(&botao, "Banindo...");

        let resultado = self.backend.banir_usuario(email, motivo).await;
        efeitos.restaurar_botao(&botao, "Banir");

        match resultado {
            Ok(()) => {
                tracing::info!("Painel: utilizador '{}' banido", email);
                self.remover_linha_usuario(email, &mut efeitos).await;
                efeitos.alerta("Usuário banido com sucesso.");

                // A lista de banidos mudou: recarrega já se estava visível
                let banidos_carregados = {
                    let mut estado = self.sessao.painel.lock().await;
                    let carregada = estado.carregada(Aba::Banidos);
                    estado.invalidar(Aba::Banidos);
                    carregada
                };
                if banidos_carregados {
                    efeitos.extend(self.carregar(Aba::Banidos, true).await);
                }
            }
            Err(ApiError::Validacao(_)) => {
                tracing::warn!("Painel: banimento recusado para '{}'", email);
                efeitos.alerta("Erro: Não é possível banir o próprio usuário.");
            }
            Err(ApiError::NaoAutenticado) => {
                efeitos.redirecionar_login();
            }
            Err(e) => {
                tracing::error!("Painel: erro ao banir '{}': {}", email, e);
                efeitos.alerta("Erro ao banir usuário.");
            }
        }
        efeitos.into_vec()
    }

    pub async fn desbanir_usuario(&self, matricula: &str) -> Vec<Efeito> {
        let botao = id_botao_desbanir(matricula);
        let Some(_guarda) = self.sessao.ocupados.ocupar(&botao) else {
            return Vec::new();
        };

        let mut efeitos = Efeitos::new();
        efeitos.ocupar_botao(&botao, "Removendo...");

        let resultado = self.backend.desbanir_usuario(matricula).await;
        efeitos.restaurar_botao(&botao, "Desbanir");

        match resultado {
            Ok(()) => {
                tracing::info!("Painel: matrícula '{}' desbanida", matricula);
                let mut estado = self.sessao.painel.lock().await;
                estado.banidos.retain(|b| b.matricula != matricula);
                efeitos
                    .remover(id_linha_banido(matricula))
                    .badge("banned-badge", estado.banidos.len() as u64, false);
                if estado.banidos.is_empty() {
                    efeitos.renderizar(Aba::Banidos.conteudo(), tabela_banidos(&[]));
                }
            }
            Err(ApiError::NaoEncontrado(_)) => {
                efeitos.alerta("Matrícula não está banida.");
            }
            Err(ApiError::NaoAutenticado) => {
                efeitos.redirecionar_login();
            }
            Err(e) => {
                tracing::error!("Painel: erro ao desbanir '{}': {}", matricula, e);
                efeitos.alerta("Erro ao remover banimento.");
            }
        }
        efeitos.into_vec()
    }

    // Remove a linha do DOM e do estado; lista vazia mostra a mensagem própria
    async fn remover_linha_usuario(&self, email: &str, efeitos: &mut Efeitos) {
        let mut estado = self.sessao.painel.lock().await;
        estado.usuarios.retain(|u| u.email != email);
        efeitos
            .remover(id_linha_usuario(email))
            .badge("users-badge", estado.usuarios.len() as u64, false);
        if estado.usuarios.is_empty() {
            efeitos.renderizar(Aba::Usuarios.conteudo(), tabela_usuarios(&[], None));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        console::URL_LOGIN,
        services::fake_backend::{banido, usuario, FakeBackend},
        state::SessaoConsole,
    };

    fn html_de(efeitos: &[Efeito], alvo_procurado: &str) -> Option<String> {
        efeitos.iter().rev().find_map(|e| match e {
            Efeito::Renderizar { alvo, html } | Efeito::Substituir { alvo, html }
                if alvo == alvo_procurado =>
            {
                Some(html.clone())
            }
            _ => None,
        })
    }

    async fn painel_carregado(backend: &FakeBackend, sessao: &SessaoConsole) {
        PainelAdmin::new(backend, sessao)
            .carregar_aba(Aba::Usuarios, true)
            .await;
    }

    #[tokio::test]
    async fn tabela_desativa_acoes_na_propria_linha() {
        let backend = FakeBackend::new()
            .com_usuario_atual("admin@ufsc.br")
            .com_usuarios(vec![usuario("admin@ufsc.br", true), usuario("ana@ufsc.br", false)]);
        let sessao = SessaoConsole::default();

        let efeitos = PainelAdmin::new(&backend, &sessao)
            .carregar_aba(Aba::Usuarios, false)
            .await;
        let html = html_de(&efeitos, "users-content").unwrap();

        assert!(html.contains("Remover Admin"));
        assert!(html.contains("Tornar Admin"));
        // 3 botões desativados na linha do administrador
        assert_eq!(html.matches(" disabled").count(), 3);
        assert!(efeitos.contains(&Efeito::Badge {
            alvo: "users-badge".into(),
            valor: Some("2".into()),
            aviso: false
        }));
    }

    #[tokio::test]
    async fn utilizador_atual_fica_em_cache() {
        let backend = FakeBackend::new()
            .com_usuario_atual("admin@ufsc.br")
            .com_usuarios(vec![usuario("ana@ufsc.br", false)]);
        let sessao = SessaoConsole::default();

        painel_carregado(&backend, &sessao).await;
        painel_carregado(&backend, &sessao).await;
        assert_eq!(backend.contar("usuario_atual"), 1);
        assert_eq!(backend.contar("listar_usuarios"), 2);
    }

    #[tokio::test]
    async fn falha_do_utilizador_atual_e_tolerada() {
        let backend = FakeBackend::new().com_usuarios(vec![usuario("ana@ufsc.br", false)]);
        backend.falhar("usuario_atual", ApiError::Rede("timeout".into()));
        let sessao = SessaoConsole::default();

        let efeitos = PainelAdmin::new(&backend, &sessao)
            .carregar_aba(Aba::Usuarios, false)
            .await;
        let html = html_de(&efeitos, "users-content").unwrap();
        assert!(html.contains("ana@ufsc.br"));
        assert!(!html.contains(" disabled"));
    }

    #[tokio::test]
    async fn alternar_admin_atualiza_a_linha() {
        let backend = FakeBackend::new()
            .com_usuario_atual("admin@ufsc.br")
            .com_usuarios(vec![usuario("ana@ufsc.br", false)]);
        let sessao = SessaoConsole::default();
        painel_carregado(&backend, &sessao).await;

        let efeitos = PainelAdmin::new(&backend, &sessao)
            .alternar_admin("ana@ufsc.br")
            .await;
        let linha = html_de(&efeitos, "linha-usuario-ana@ufsc.br").unwrap();
        assert!(linha.contains("Remover Admin"));
        assert!(linha.contains(">Admin<"));
        assert!(sessao.painel.lock().await.usuarios[0].admin);
    }

    #[tokio::test]
    async fn banir_a_si_proprio_mantem_a_linha() {
        let backend = FakeBackend::new()
            .com_usuario_atual("admin@ufsc.br")
            .com_usuarios(vec![usuario("admin@ufsc.br", true), usuario("ana@ufsc.br", false)]);
        let sessao = SessaoConsole::default();
        painel_carregado(&backend, &sessao).await;

        let efeitos = PainelAdmin::new(&backend, &sessao)
            .banir_usuario("admin@ufsc.br", Some("teste"))
            .await;

        assert!(efeitos.contains(&Efeito::Alerta {
            mensagem: "Erro: Não é possível banir o próprio usuário.".into()
        }));
        assert!(efeitos.contains(&Efeito::Botao {
            alvo: "btn-banir-admin@ufsc.br".into(),
            habilitado: true,
            rotulo: "Banir".into(),
            carregando: false,
        }));
        assert!(!efeitos.iter().any(|e| matches!(e, Efeito::Remover { .. })));
        assert_eq!(sessao.painel.lock().await.usuarios.len(), 2);
        assert!(!sessao.ocupados.ocupado("btn-banir-admin@ufsc.br"));
    }

    #[tokio::test]
    async fn banir_recarrega_banidos_se_ja_carregados() {
        let backend = FakeBackend::new()
            .com_usuario_atual("admin@ufsc.br")
            .com_usuarios(vec![usuario("ana@ufsc.br", false)]);
        let sessao = SessaoConsole::default();
        let painel = PainelAdmin::new(&backend, &sessao);
        painel.carregar_aba(Aba::Usuarios, false).await;
        painel.carregar_aba(Aba::Banidos, false).await;

        let efeitos = painel.banir_usuario("ana@ufsc.br", Some("  ")).await;

        assert!(efeitos.contains(&Efeito::Remover { alvo: "linha-usuario-ana@ufsc.br".into() }));
        assert!(efeitos.contains(&Efeito::Alerta { mensagem: "Usuário banido com sucesso.".into() }));
        // último utilizador removido: estado vazio
        assert!(html_de(&efeitos, "users-content").unwrap().contains(SEM_USUARIOS));
        assert!(html_de(&efeitos, "banned-content").unwrap().contains("ana@ufsc.br"));
        assert_eq!(backend.contar("listar_banidos"), 2);
        assert_eq!(backend.dados.lock().unwrap().banidos[0].motivo, None);
    }

    #[tokio::test]
    async fn erro_generico_ao_excluir() {
        let backend = FakeBackend::new().com_usuarios(vec![usuario("ana@ufsc.br", false)]);
        backend.falhar(
            "excluir_usuario",
            ApiError::Status { status: 500, mensagem: String::new() },
        );
        let sessao = SessaoConsole::default();

        let efeitos = PainelAdmin::new(&backend, &sessao)
            .excluir_usuario("ana@ufsc.br")
            .await;
        assert_eq!(efeitos.last(), Some(&Efeito::Alerta { mensagem: "Erro ao excluir usuário.".into() }));
    }

    #[tokio::test]
    async fn desbanir_ultimo_mostra_estado_vazio() {
        let backend = FakeBackend::new().com_banidos(vec![banido("20230001")]);
        let sessao = SessaoConsole::default();
        let painel = PainelAdmin::new(&backend, &sessao);
        painel.carregar_aba(Aba::Banidos, false).await;

        let efeitos = painel.desbanir_usuario("20230001").await;
        assert!(efeitos.contains(&Efeito::Remover { alvo: "linha-banido-20230001".into() }));
        assert!(html_de(&efeitos, "banned-content").unwrap().contains(SEM_BANIDOS));

        // segunda vez: 404
        let efeitos = painel.desbanir_usuario("20230001").await;
        assert!(efeitos.contains(&Efeito::Alerta { mensagem: "Matrícula não está banida.".into() }));
    }

    #[tokio::test]
    async fn acao_sem_sessao_redireciona() {
        let backend = FakeBackend::new();
        backend.falhar("alternar_admin", ApiError::NaoAutenticado);
        let sessao = SessaoConsole::default();

        let efeitos = PainelAdmin::new(&backend, &sessao)
            .alternar_admin("ana@ufsc.br")
            .await;
        assert_eq!(efeitos, vec![Efeito::Redirecionar { url: URL_LOGIN.into() }]);
    }

    #[test]
    fn banido_sem_motivo_mostra_traco() {
        let html = tabela_banidos(&[banido("20230001")]);
        assert!(html.contains(">-<"));
        assert!(html.contains("01/03/2025, 10:15:00"));
    }

    #[test]
    fn valores_escapados_no_html() {
        let mut u = usuario("x@ufsc.br", false);
        u.nome = Some("<script>alert(1)</script>".into());
        let html = tabela_usuarios(&[u], None);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
