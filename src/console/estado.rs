// src/console/estado.rs
use crate::models::{
    comentario::{Comentario, ListaComentarios},
    usuario::{Usuario, UsuarioAtual, UsuarioBanido},
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Abas do painel. O nome serializado é o usado nas rotas e no DOM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Aba {
    #[default]
    #[serde(rename = "users")]
    Usuarios,
    #[serde(rename = "banned")]
    Banidos,
    #[serde(rename = "alarming")]
    Alarmantes,
    #[serde(rename = "comments")]
    Comentarios,
    #[serde(rename = "scrapper")]
    Scrapper,
}

impl Aba {
    pub fn nome(self) -> &'static str {
        match self {
            Aba::Usuarios => "users",
            Aba::Banidos => "banned",
            Aba::Alarmantes => "alarming",
            Aba::Comentarios => "comments",
            Aba::Scrapper => "scrapper",
        }
    }

    /// Contentor onde o conteúdo da aba é renderizado.
    pub fn conteudo(self) -> &'static str {
        match self {
            Aba::Usuarios => "users-content",
            Aba::Banidos => "banned-content",
            Aba::Alarmantes => "alarming-content",
            Aba::Comentarios => "comments-content",
            Aba::Scrapper => "scrapper-status",
        }
    }

    pub fn badge(self) -> Option<&'static str> {
        match self {
            Aba::Usuarios => Some("users-badge"),
            Aba::Banidos => Some("banned-badge"),
            Aba::Alarmantes => Some("alarming-badge"),
            Aba::Comentarios => Some("comments-badge"),
            Aba::Scrapper => None,
        }
    }

    pub fn botao_atualizar(self) -> &'static str {
        match self {
            Aba::Usuarios => "refresh-users",
            Aba::Banidos => "refresh-banned",
            Aba::Alarmantes => "refresh-alarming",
            Aba::Comentarios => "refresh-comments",
            Aba::Scrapper => "refresh-status-btn",
        }
    }

    pub fn rotulo_atualizar(self) -> &'static str {
        match self {
            Aba::Scrapper => "🔄 Atualizar Status",
            _ => "🔄 Atualizar",
        }
    }

    pub fn lista(self) -> Option<ListaComentarios> {
        match self {
            Aba::Alarmantes => Some(ListaComentarios::Alarmantes),
            Aba::Comentarios => Some(ListaComentarios::Todos),
            _ => None,
        }
    }

    pub fn da_lista(lista: ListaComentarios) -> Aba {
        match lista {
            ListaComentarios::Alarmantes => Aba::Alarmantes,
            ListaComentarios::Todos => Aba::Comentarios,
        }
    }
}

/// Estado do painel de uma sessão: abas carregadas, paginação e as listas atuais.
#[derive(Debug, Default)]
pub struct EstadoPainel {
    pub aba_ativa: Aba,
    carregadas: HashSet<Aba>,
    paginas: HashMap<ListaComentarios, u32>,
    // último totalPages conhecido por lista
    total_paginas: HashMap<ListaComentarios, u32>,

    pub usuario_atual: Option<UsuarioAtual>,
    pub usuarios: Vec<Usuario>,
    pub banidos: Vec<UsuarioBanido>,
    pub alarmantes: Vec<Comentario>,
    pub comentarios: Vec<Comentario>,
}

impl EstadoPainel {
    pub fn carregada(&self, aba: Aba) -> bool {
        self.carregadas.contains(&aba)
    }

    pub fn marcar_carregada(&mut self, aba: Aba) {
        self.carregadas.insert(aba);
    }

    pub fn invalidar(&mut self, aba: Aba) {
        self.carregadas.remove(&aba);
    }

    pub fn pagina(&self, lista: ListaComentarios) -> u32 {
        self.paginas.get(&lista).copied().unwrap_or(0)
    }

    pub fn definir_pagina(&mut self, lista: ListaComentarios, pagina: u32) {
        self.paginas.insert(lista, pagina);
    }

    pub fn total_paginas(&self, lista: ListaComentarios) -> Option<u32> {
        self.total_paginas.get(&lista).copied()
    }

    pub fn definir_total_paginas(&mut self, lista: ListaComentarios, total: u32) {
        self.total_paginas.insert(lista, total);
    }

    pub fn comentarios_mut(&mut self, lista: ListaComentarios) -> &mut Vec<Comentario> {
        match lista {
            ListaComentarios::Alarmantes => &mut self.alarmantes,
            ListaComentarios::Todos => &mut self.comentarios,
        }
    }

    pub fn e_usuario_atual(&self, email: &str) -> bool {
        self.usuario_atual.as_ref().is_some_and(|u| u.email == email)
    }
}
