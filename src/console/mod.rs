// src/console/mod.rs
//
// Controladores do painel de administração e do widget de avaliação.
// Cada operação corre contra o backend e devolve uma lista de efeitos que o
// script da página aplica ao DOM, pela ordem.
pub mod abas;
pub mod avaliacao;
pub mod comentarios;
pub mod estado;
pub mod scrapper;
pub mod usuarios;

use crate::{error::AppError, services::backend::Backend, state::SessaoConsole};
use askama::Template;
use chrono::{DateTime, Local, NaiveDateTime};
use estado::Aba;
use serde::Serialize;

pub const URL_LOGIN: &str = "/login?error=notAuthenticated";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NivelToast {
    #[serde(rename = "success")]
    Sucesso,
    #[serde(rename = "warning")]
    Aviso,
    #[serde(rename = "error")]
    Erro,
}

/// Mutação declarativa do DOM, serializada como `{"tipo": "...", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "tipo", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Efeito {
    AtivarAba { aba: Aba },
    /// innerHTML do alvo
    Renderizar { alvo: String, html: String },
    /// outerHTML do alvo
    Substituir { alvo: String, html: String },
    Remover { alvo: String },
    Texto { alvo: String, texto: String },
    /// `valor: None` esconde o badge
    Badge { alvo: String, valor: Option<String>, aviso: bool },
    Botao { alvo: String, habilitado: bool, rotulo: String, carregando: bool },
    /// Desativa todos os botões dentro do alvo
    DesabilitarBotoes { alvo: String },
    Alerta { mensagem: String },
    Toast { mensagem: String, nivel: NivelToast },
    Redirecionar { url: String },
    FecharModal { alvo: String },
    /// Pede ao browser que chame `/admin/abas/{aba}/atualizar` após o atraso
    AgendarRecarga { aba: Aba, atraso_ms: u64 },
}

/// Acumulador de efeitos de um handler.
///
/// Um 401 em qualquer ponto marca a lista: `into_vec` devolve então apenas o
/// redirecionamento para o login, descartando o resto.
#[derive(Debug, Default)]
pub struct Efeitos {
    lista: Vec<Efeito>,
    login: bool,
}

impl Efeitos {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, efeito: Efeito) -> &mut Self {
        self.lista.push(efeito);
        self
    }

    pub fn extend(&mut self, outros: Efeitos) -> &mut Self {
        self.login |= outros.login;
        self.lista.extend(outros.lista);
        self
    }

    pub fn redirecionar_login(&mut self) -> &mut Self {
        self.login = true;
        self
    }

    pub fn renderizar(&mut self, alvo: impl Into<String>, html: String) -> &mut Self {
        self.push(Efeito::Renderizar { alvo: alvo.into(), html })
    }

    pub fn substituir(&mut self, alvo: impl Into<String>, html: String) -> &mut Self {
        self.push(Efeito::Substituir { alvo: alvo.into(), html })
    }

    pub fn remover(&mut self, alvo: impl Into<String>) -> &mut Self {
        self.push(Efeito::Remover { alvo: alvo.into() })
    }

    pub fn texto(&mut self, alvo: impl Into<String>, texto: impl Into<String>) -> &mut Self {
        self.push(Efeito::Texto { alvo: alvo.into(), texto: texto.into() })
    }

    pub fn badge(&mut self, alvo: impl Into<String>, contagem: u64, aviso: bool) -> &mut Self {
        self.push(badge(alvo, contagem, aviso))
    }

    /// Botão em estado "a processar": desativado, com spinner e rótulo temporário.
    pub fn ocupar_botao(&mut self, alvo: impl Into<String>, rotulo: impl Into<String>) -> &mut Self {
        self.push(Efeito::Botao {
            alvo: alvo.into(),
            habilitado: false,
            rotulo: rotulo.into(),
            carregando: true,
        })
    }

    pub fn restaurar_botao(&mut self, alvo: impl Into<String>, rotulo: impl Into<String>) -> &mut Self {
        self.push(Efeito::Botao {
            alvo: alvo.into(),
            habilitado: true,
            rotulo: rotulo.into(),
            carregando: false,
        })
    }

    pub fn alerta(&mut self, mensagem: impl Into<String>) -> &mut Self {
        self.push(Efeito::Alerta { mensagem: mensagem.into() })
    }

    pub fn toast(&mut self, mensagem: impl Into<String>, nivel: NivelToast) -> &mut Self {
        self.push(Efeito::Toast { mensagem: mensagem.into(), nivel })
    }

    pub fn into_vec(self) -> Vec<Efeito> {
        if self.login {
            vec![Efeito::Redirecionar { url: URL_LOGIN.to_string() }]
        } else {
            self.lista
        }
    }
}

/// Regra dos badges das abas: 0 esconde, acima de 99 mostra "99+".
pub fn badge(alvo: impl Into<String>, contagem: u64, aviso: bool) -> Efeito {
    let valor = match contagem {
        0 => None,
        1..=99 => Some(contagem.to_string()),
        _ => Some("99+".to_string()),
    };
    Efeito::Badge { alvo: alvo.into(), valor, aviso }
}

/// Renderiza um template; em caso de falha loga e devolve um aviso no lugar do fragmento.
pub fn renderizar<T: Template>(template: &T) -> String {
    match template.render() {
        Ok(html) => html,
        Err(e) => {
            let erro = AppError::from(e);
            tracing::error!("Falha ao renderizar fragmento: {}", erro);
            r#"<div class="error-message"><span class="error-icon">⚠️</span> Erro ao montar a página.</div>"#
                .to_string()
        }
    }
}

/// Data no formato pt-BR (`dd/mm/aaaa, HH:MM:SS`).
///
/// Aceita instantes RFC 3339 (convertidos para a hora local) e datas sem fuso
/// (mostradas tal como chegam). Um valor ilegível é devolvido sem alteração.
pub fn formatar_data(valor: Option<&str>, ausente: &str) -> String {
    const FORMATO: &str = "%d/%m/%Y, %H:%M:%S";

    let Some(valor) = valor.map(str::trim).filter(|v| !v.is_empty()) else {
        return ausente.to_string();
    };

    if let Ok(instante) = DateTime::parse_from_rfc3339(valor) {
        return instante.with_timezone(&Local).format(FORMATO).to_string();
    }
    for formato in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(data) = NaiveDateTime::parse_from_str(valor, formato) {
            return data.format(FORMATO).to_string();
        }
    }
    valor.to_string()
}

/// Controlador do painel de administração, por sessão.
///
/// As operações estão repartidas pelos módulos `abas`, `usuarios`,
/// `comentarios` e `scrapper`.
pub struct PainelAdmin<'a, B: Backend> {
    backend: &'a B,
    sessao: &'a SessaoConsole,
}

impl<'a, B: Backend> PainelAdmin<'a, B> {
    pub fn new(backend: &'a B, sessao: &'a SessaoConsole) -> Self {
        Self { backend, sessao }
    }
}
