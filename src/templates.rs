// src/templates.rs
use askama::Template; // Trait necessário para Askama

// --- Fragmentos comuns ---

#[derive(Template)]
#[template(path = "carregando.html")]
pub struct Carregando;

#[derive(Template)]
#[template(path = "painel_erro.html")]
pub struct PainelErro<'a> {
    pub mensagem: &'a str,
}

// Estado vazio de uma lista ("Nenhum usuário cadastrado", ...)
#[derive(Template)]
#[template(path = "vazio.html")]
pub struct Vazio<'a> {
    pub classe: &'a str,
    pub mensagem: &'a str,
}

// --- Utilizadores ---

#[derive(Clone, Debug)]
pub struct LinhaUsuario {
    pub id_linha: String,
    pub email: String,
    pub nome: String,
    pub matricula: String,
    pub curso: String,
    pub admin: bool,
    // linha do próprio administrador: ações desativadas
    pub proprio: bool,
    pub btn_admin: String,
    pub btn_excluir: String,
    pub btn_banir: String,
}

#[derive(Template)]
#[template(path = "tabela_usuarios.html")]
pub struct TabelaUsuarios {
    pub linhas: Vec<LinhaUsuario>,
}

// Uma linha isolada, para substituir no DOM após alternar admin
#[derive(Template)]
#[template(path = "linha_usuario.html")]
pub struct LinhaUsuarioTpl {
    pub linha: LinhaUsuario,
}

#[derive(Clone, Debug)]
pub struct LinhaBanido {
    pub id_linha: String,
    pub nome: String,
    pub email: String,
    pub matricula: String,
    pub banido_em: String,
    pub banido_por: String,
    pub motivo: String,
    pub motivo_completo: String,
    pub btn_desbanir: String,
}

#[derive(Template)]
#[template(path = "tabela_banidos.html")]
pub struct TabelaBanidos {
    pub linhas: Vec<LinhaBanido>,
}

// --- Comentários ---

#[derive(Clone, Debug)]
pub struct Selo {
    pub classe: &'static str,
    pub texto: String,
}

#[derive(Clone, Debug)]
pub struct LinkDisciplina {
    pub href: String,
    pub nome: String,
}

#[derive(Clone, Debug)]
pub struct Anexo {
    pub url: String,
    pub nome: String,
    pub imagem: bool,
}

#[derive(Clone, Debug)]
pub struct CartaoComentario {
    pub id: i64,
    pub id_cartao: String,
    pub lista: &'static str,
    pub alarmante: bool,
    pub iniciais: String,
    pub autor: String,
    pub email: String,
    pub data: String,
    pub editado_em: Option<String>,
    pub selos: Vec<Selo>,
    pub disciplina: Option<LinkDisciplina>,
    pub professor: String,
    pub respostas: u32,
    pub texto: String,
    pub anexos: Vec<Anexo>,
    pub votos_positivos: i64,
    pub votos_negativos: i64,
    pub mostrar_seguro: bool,
    pub btn_seguro: String,
    pub btn_excluir: String,
    pub btn_banir: String,
}

#[derive(Template)]
#[template(path = "comentarios.html")]
pub struct ListaCartoes {
    pub cartoes: Vec<CartaoComentario>,
}

#[derive(Template)]
#[template(path = "paginacao.html")]
pub struct Paginacao {
    pub lista: &'static str,
    pub anterior: Option<u32>,
    pub proxima: Option<u32>,
    // 1-based, como é mostrado
    pub atual: u32,
    pub total: u32,
}

// --- Scrapper ---

#[derive(Template)]
#[template(path = "status_scrapper.html")]
pub struct StatusScrapperTpl {
    pub executando: bool,
    pub ultima_execucao: String,
    pub ultimo_sucesso: String,
    pub disciplinas: u32,
    pub professores: u32,
    pub administrador: String,
    pub erro: Option<String>,
}

// --- Avaliações ---

/// Estrelas, média e contagem de um local de exibição.
#[derive(Template)]
#[template(path = "resumo_avaliacao.html")]
pub struct ResumoAvaliacaoTpl {
    pub classes: Vec<&'static str>,
    pub media: String,
    pub contagem: String,
    // "" para a disciplina
    pub professor_id: String,
}

#[derive(Template)]
#[template(path = "modal_avaliacao.html")]
pub struct ModalAvaliacao {
    pub titulo: String,
    pub subtitulo: &'static str,
    // "★★★☆☆" quando já existe nota
    pub anterior: Option<String>,
    pub estrelas: Vec<&'static str>,
    pub pode_confirmar: bool,
}

#[derive(Template)]
#[template(path = "estrelas_modal.html")]
pub struct EstrelasModal {
    pub estrelas: Vec<&'static str>,
}

// Camada "Enviando avaliação..." sobre o modal
#[derive(Template)]
#[template(path = "overlay_envio.html")]
pub struct OverlayEnvio;
