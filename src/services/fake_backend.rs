// src/services/fake_backend.rs
// Backend em memória para os testes dos controladores.
use crate::{
    error::{ApiError, ApiResult},
    models::{
        avaliacao::{NovaAvaliacao, ResultadoAvaliacao},
        comentario::{Comentario, EstatisticasComentarios, ListaComentarios, Pagina},
        scrapper::{CredenciaisScrapper, StatusScrapper},
        usuario::{Usuario, UsuarioAtual, UsuarioBanido},
    },
    services::backend::Backend,
};
use std::{collections::HashMap, sync::Mutex};

#[derive(Debug, Default)]
pub struct Dados {
    pub usuario_atual: Option<UsuarioAtual>,
    pub usuarios: Vec<Usuario>,
    pub banidos: Vec<UsuarioBanido>,
    pub alarmantes: Vec<Comentario>,
    pub comentarios: Vec<Comentario>,
    pub status: StatusScrapper,
    pub mensagem_scrapper: String,
    pub resultado_avaliacao: Option<ResultadoAvaliacao>,
    pub avaliacoes_recebidas: Vec<NovaAvaliacao>,
}

#[derive(Debug, Default)]
pub struct FakeBackend {
    pub dados: Mutex<Dados>,
    // nome da operação -> erro devolvido sempre que for chamada
    falhas: Mutex<HashMap<&'static str, ApiError>>,
    chamadas: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn com_usuario_atual(self, email: &str) -> Self {
        self.dados.lock().unwrap().usuario_atual = Some(UsuarioAtual { email: email.into() });
        self
    }

    pub fn com_usuarios(self, usuarios: Vec<Usuario>) -> Self {
        self.dados.lock().unwrap().usuarios = usuarios;
        self
    }

    pub fn com_banidos(self, banidos: Vec<UsuarioBanido>) -> Self {
        self.dados.lock().unwrap().banidos = banidos;
        self
    }

    pub fn com_comentarios(self, alarmantes: Vec<Comentario>, todos: Vec<Comentario>) -> Self {
        {
            let mut dados = self.dados.lock().unwrap();
            dados.alarmantes = alarmantes;
            dados.comentarios = todos;
        }
        self
    }

    pub fn com_resultado_avaliacao(self, nova_media: f64, total: u32, id: Option<i64>) -> Self {
        self.dados.lock().unwrap().resultado_avaliacao = Some(ResultadoAvaliacao {
            nova_media,
            total_avaliacoes: total,
            avaliacao_id: id,
        });
        self
    }

    pub fn falhar(&self, operacao: &'static str, erro: ApiError) {
        self.falhas.lock().unwrap().insert(operacao, erro);
    }

    pub fn contar(&self, operacao: &str) -> usize {
        self.chamadas
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.as_str() == operacao)
            .count()
    }

    fn registrar(&self, operacao: &'static str) -> ApiResult<()> {
        self.chamadas.lock().unwrap().push(operacao.to_string());
        match self.falhas.lock().unwrap().get(operacao) {
            Some(erro) => Err(erro.clone()),
            None => Ok(()),
        }
    }

    fn e_proprio(&self, email: &str) -> bool {
        self.dados
            .lock()
            .unwrap()
            .usuario_atual
            .as_ref()
            .is_some_and(|u| u.email == email)
    }
}

pub fn usuario(email: &str, admin: bool) -> Usuario {
    Usuario {
        email: email.into(),
        nome: Some(email.split('@').next().unwrap_or(email).to_string()),
        matricula: Some(format!("2023{}", email.len())),
        curso: Some("Ciência da Computação".into()),
        admin,
    }
}

pub fn banido(matricula: &str) -> UsuarioBanido {
    UsuarioBanido {
        matricula: matricula.into(),
        nome: Some("Fulano".into()),
        email: Some("fulano@ufsc.br".into()),
        banido_em: Some("2025-03-01T10:15:00".into()),
        banido_por: Some("admin@ufsc.br".into()),
        motivo: None,
    }
}

pub fn comentario(id: i64, texto: &str) -> Comentario {
    Comentario {
        id,
        texto: Some(texto.into()),
        created_at: Some("2025-03-01T12:00:00Z".into()),
        alarmante: true,
        denunciado: false,
        denuncias_count: None,
        edited: false,
        edited_at: None,
        up_votes: 0,
        down_votes: 0,
        user_name: Some("Maria".into()),
        user_email: Some("maria@ufsc.br".into()),
        user_initials: Some("MA".into()),
        user_matricula: None,
        disciplina_id: Some("INE5401".into()),
        disciplina_nome: Some("Introdução à Computação".into()),
        professor_id: None,
        professor_nome: None,
        arquivos: vec![],
        respostas_count: 0,
    }
}

fn paginar(itens: &[Comentario], pagina: u32, tamanho: u32) -> Pagina<Comentario> {
    let tamanho = tamanho.max(1) as usize;
    let total_pages = itens.len().div_ceil(tamanho) as u32;
    let inicio = (pagina as usize * tamanho).min(itens.len());
    let fim = (inicio + tamanho).min(itens.len());
    Pagina {
        content: itens[inicio..fim].to_vec(),
        total_elements: itens.len() as u64,
        total_pages,
        current_page: pagina,
    }
}

impl Backend for FakeBackend {
    async fn usuario_atual(&self) -> ApiResult<UsuarioAtual> {
        self.registrar("usuario_atual")?;
        self.dados
            .lock()
            .unwrap()
            .usuario_atual
            .clone()
            .ok_or_else(|| ApiError::NaoEncontrado("sem utilizador".into()))
    }

    async fn listar_usuarios(&self) -> ApiResult<Vec<Usuario>> {
        self.registrar("listar_usuarios")?;
        Ok(self.dados.lock().unwrap().usuarios.clone())
    }

    async fn alternar_admin(&self, email: &str) -> ApiResult<()> {
        self.registrar("alternar_admin")?;
        if self.e_proprio(email) {
            return Err(ApiError::Validacao("Não pode alterar o próprio status".into()));
        }
        let mut dados = self.dados.lock().unwrap();
        match dados.usuarios.iter_mut().find(|u| u.email == email) {
            Some(u) => {
                u.admin = !u.admin;
                Ok(())
            }
            None => Err(ApiError::NaoEncontrado(email.into())),
        }
    }

    async fn excluir_usuario(&self, email: &str) -> ApiResult<()> {
        self.registrar("excluir_usuario")?;
        if self.e_proprio(email) {
            return Err(ApiError::Validacao("Não pode excluir o próprio usuário".into()));
        }
        self.dados.lock().unwrap().usuarios.retain(|u| u.email != email);
        Ok(())
    }

    async fn banir_usuario(&self, email: &str, motivo: Option<&str>) -> ApiResult<()> {
        self.registrar("banir_usuario")?;
        if self.e_proprio(email) {
            return Err(ApiError::Validacao("Não pode banir o próprio usuário".into()));
        }
        let mut dados = self.dados.lock().unwrap();
        let removido = dados.usuarios.iter().position(|u| u.email == email);
        if let Some(pos) = removido {
            let u = dados.usuarios.remove(pos);
            dados.banidos.push(UsuarioBanido {
                matricula: u.matricula.unwrap_or_default(),
                nome: u.nome,
                email: Some(u.email),
                banido_em: None,
                banido_por: None,
                motivo: motivo.map(String::from),
            });
        }
        Ok(())
    }

    async fn listar_banidos(&self) -> ApiResult<Vec<UsuarioBanido>> {
        self.registrar("listar_banidos")?;
        Ok(self.dados.lock().unwrap().banidos.clone())
    }

    async fn desbanir_usuario(&self, matricula: &str) -> ApiResult<()> {
        self.registrar("desbanir_usuario")?;
        let mut dados = self.dados.lock().unwrap();
        let antes = dados.banidos.len();
        dados.banidos.retain(|b| b.matricula != matricula);
        if dados.banidos.len() == antes {
            return Err(ApiError::NaoEncontrado("Matrícula não banida".into()));
        }
        Ok(())
    }

    async fn listar_comentarios(
        &self,
        lista: ListaComentarios,
        pagina: u32,
        tamanho: u32,
    ) -> ApiResult<Pagina<Comentario>> {
        match lista {
            ListaComentarios::Alarmantes => self.registrar("listar_alarmantes")?,
            ListaComentarios::Todos => self.registrar("listar_comentarios")?,
        }
        let dados = self.dados.lock().unwrap();
        let itens = match lista {
            ListaComentarios::Alarmantes => &dados.alarmantes,
            ListaComentarios::Todos => &dados.comentarios,
        };
        Ok(paginar(itens, pagina, tamanho))
    }

    async fn estatisticas_comentarios(&self) -> ApiResult<EstatisticasComentarios> {
        self.registrar("estatisticas_comentarios")?;
        let dados = self.dados.lock().unwrap();
        Ok(EstatisticasComentarios {
            total_comentarios: dados.comentarios.len() as u64,
            comentarios_alarmantes: dados.alarmantes.len() as u64,
        })
    }

    async fn marcar_seguro(&self, id: i64) -> ApiResult<()> {
        self.registrar("marcar_seguro")?;
        self.dados.lock().unwrap().alarmantes.retain(|c| c.id != id);
        Ok(())
    }

    async fn excluir_comentario(&self, id: i64) -> ApiResult<()> {
        self.registrar("excluir_comentario")?;
        let mut dados = self.dados.lock().unwrap();
        dados.alarmantes.retain(|c| c.id != id);
        dados.comentarios.retain(|c| c.id != id);
        Ok(())
    }

    async fn banir_por_comentario(&self, _id: i64, _motivo: Option<&str>) -> ApiResult<()> {
        self.registrar("banir_por_comentario")
    }

    async fn status_scrapper(&self) -> ApiResult<StatusScrapper> {
        self.registrar("status_scrapper")?;
        Ok(self.dados.lock().unwrap().status.clone())
    }

    async fn executar_scrapper(&self, _credenciais: &CredenciaisScrapper) -> ApiResult<String> {
        self.registrar("executar_scrapper")?;
        Ok(self.dados.lock().unwrap().mensagem_scrapper.clone())
    }

    async fn enviar_avaliacao(&self, avaliacao: &NovaAvaliacao) -> ApiResult<ResultadoAvaliacao> {
        self.registrar("enviar_avaliacao")?;
        let mut dados = self.dados.lock().unwrap();
        dados.avaliacoes_recebidas.push(avaliacao.clone());
        Ok(dados.resultado_avaliacao.clone().unwrap_or(ResultadoAvaliacao {
            nova_media: f64::from(avaliacao.nota),
            total_avaliacoes: 1,
            avaliacao_id: Some(1),
        }))
    }
}
