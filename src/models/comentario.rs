// src/models/comentario.rs
use super::{id_opcional, nulo_como_padrao};
use serde::{Deserialize, Serialize};

/// Tamanho fixo de página usado pelo painel de moderação.
pub const TAMANHO_PAGINA: u32 = 10;

// Comentário visto pelo painel de administração (AdminCommentDTO no backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comentario {
    pub id: i64,
    #[serde(default)]
    pub texto: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "nulo_como_padrao")]
    pub alarmante: bool,
    #[serde(default, deserialize_with = "nulo_como_padrao")]
    pub denunciado: bool,
    #[serde(default)]
    pub denuncias_count: Option<u32>,
    #[serde(default, deserialize_with = "nulo_como_padrao")]
    pub edited: bool,
    #[serde(default)]
    pub edited_at: Option<String>,
    #[serde(default, deserialize_with = "nulo_como_padrao")]
    pub up_votes: i64,
    #[serde(default, deserialize_with = "nulo_como_padrao")]
    pub down_votes: i64,

    // Autor
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub user_initials: Option<String>,
    #[serde(default)]
    pub user_matricula: Option<String>,

    // Contexto (disciplina / professor)
    #[serde(default, deserialize_with = "id_opcional")]
    pub disciplina_id: Option<String>,
    #[serde(default)]
    pub disciplina_nome: Option<String>,
    #[serde(default, deserialize_with = "id_opcional")]
    pub professor_id: Option<String>,
    #[serde(default)]
    pub professor_nome: Option<String>,

    #[serde(default, deserialize_with = "nulo_como_padrao")]
    pub arquivos: Vec<Arquivo>,
    #[serde(default, deserialize_with = "nulo_como_padrao")]
    pub respostas_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arquivo {
    pub id: i64,
    #[serde(default)]
    pub nome_original: Option<String>,
    #[serde(default)]
    pub tipo_mime: Option<String>,
}

impl Arquivo {
    pub fn e_imagem(&self) -> bool {
        self.tipo_mime
            .as_deref()
            .is_some_and(|mime| mime.starts_with("image/"))
    }
}

/// Página genérica devolvida pelos endpoints paginados.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagina<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub current_page: u32,
}

impl<T> Pagina<T> {
    pub fn tem_anterior(&self) -> bool {
        self.current_page > 0
    }

    pub fn tem_proxima(&self) -> bool {
        self.total_pages > 0 && self.current_page < self.total_pages - 1
    }
}

/// POST /api/admin/comments/stats
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstatisticasComentarios {
    #[serde(default)]
    pub total_comentarios: u64,
    #[serde(default)]
    pub comentarios_alarmantes: u64,
}

/// As duas listagens de comentários do painel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListaComentarios {
    #[serde(rename = "alarming")]
    Alarmantes,
    #[serde(rename = "comments")]
    Todos,
}

impl ListaComentarios {
    pub fn nome(self) -> &'static str {
        match self {
            ListaComentarios::Alarmantes => "alarming",
            ListaComentarios::Todos => "comments",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PedidoMotivo<'a> {
    pub motivo: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desserializa_comentario_do_backend() {
        let json = r#"{
            "id": 42,
            "texto": "Professor ótimo",
            "createdAt": "2025-03-01T12:00:00Z",
            "alarmante": true,
            "denunciado": null,
            "denunciasCount": null,
            "edited": false,
            "upVotes": 3,
            "downVotes": null,
            "userEmail": "joao@ufsc.br",
            "userInitials": "JO",
            "disciplinaId": "INE5401",
            "professorId": 7,
            "arquivos": [{"id": 1, "nomeOriginal": "foto.png", "tipoMime": "image/png"}],
            "respostasCount": 2
        }"#;

        let c: Comentario = serde_json::from_str(json).unwrap();
        assert_eq!(c.id, 42);
        assert!(c.alarmante);
        assert!(!c.denunciado);
        assert_eq!(c.down_votes, 0);
        assert_eq!(c.professor_id.as_deref(), Some("7"));
        assert!(c.arquivos[0].e_imagem());
        assert_eq!(c.respostas_count, 2);
    }

    #[test]
    fn limites_da_paginacao() {
        let pagina = |atual, total| Pagina::<()> {
            content: vec![],
            total_elements: 0,
            total_pages: total,
            current_page: atual,
        };

        assert!(!pagina(0, 3).tem_anterior());
        assert!(pagina(0, 3).tem_proxima());
        assert!(pagina(2, 3).tem_anterior());
        assert!(!pagina(2, 3).tem_proxima());
        assert!(!pagina(0, 0).tem_proxima());
    }
}
