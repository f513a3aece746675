// src/models/avaliacao.rs
use super::{id_obrigatorio, id_opcional, nulo_como_padrao};
use serde::{Deserialize, Serialize};

/// Alvo de uma avaliação: a própria disciplina ou um dos seus professores.
///
/// A igualdade é estrutural: `Professor("0")` e `Disciplina` nunca colidem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Alvo {
    #[default]
    Disciplina,
    Professor(String),
}

impl Alvo {
    /// Converte o `professorId` vindo da página. Ausente, vazio ou `"null"`
    /// designam a disciplina; qualquer outro valor é guardado tal como chegou.
    pub fn de_professor_id(professor_id: Option<&str>) -> Alvo {
        match professor_id.map(str::trim) {
            None | Some("") | Some("null") => Alvo::Disciplina,
            Some(id) => Alvo::Professor(id.to_string()),
        }
    }

    pub fn professor_id(&self) -> Option<&str> {
        match self {
            Alvo::Disciplina => None,
            Alvo::Professor(id) => Some(id),
        }
    }
}

/// Avaliação (1 a 5 estrelas) de uma disciplina ou professor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Avaliacao {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "id_opcional")]
    pub disciplina_id: Option<String>,
    #[serde(default, deserialize_with = "id_opcional")]
    pub professor_id: Option<String>,
    #[serde(default, deserialize_with = "nulo_como_padrao")]
    pub nota: u8,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "nulo_como_padrao")]
    pub is_owner: bool,
}

impl Avaliacao {
    pub fn alvo(&self) -> Alvo {
        Alvo::de_professor_id(self.professor_id.as_deref())
    }
}

/// Professor listado na página da disciplina.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Professor {
    #[serde(alias = "professorId", alias = "ID", deserialize_with = "id_obrigatorio")]
    pub id: String,
    #[serde(default, alias = "name")]
    pub nome: Option<String>,
}

/// Média e total de avaliações de um alvo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumoAvaliacao {
    pub media: f64,
    pub total: u32,
}

/// Média e contagem das avaliações com nota, como o cabeçalho da página faz.
pub fn calcular_estatisticas<'a>(avaliacoes: impl IntoIterator<Item = &'a Avaliacao>) -> ResumoAvaliacao {
    let notas: Vec<u32> = avaliacoes
        .into_iter()
        .filter(|a| a.nota > 0)
        .map(|a| u32::from(a.nota))
        .collect();

    if notas.is_empty() {
        return ResumoAvaliacao::default();
    }

    let soma: u32 = notas.iter().sum();
    ResumoAvaliacao {
        media: f64::from(soma) / notas.len() as f64,
        total: notas.len() as u32,
    }
}

/// Campos enviados (multipart) para POST /api/avaliacao/rating.
#[derive(Debug, Clone, PartialEq)]
pub struct NovaAvaliacao {
    pub nota: u8,
    pub disciplina_id: String,
    pub alvo: Alvo,
}

/// Resposta de sucesso de POST /api/avaliacao/rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultadoAvaliacao {
    pub nova_media: f64,
    pub total_avaliacoes: u32,
    #[serde(default)]
    pub avaliacao_id: Option<i64>,
}

/// Dados embutidos na página da disciplina que inicializam o widget.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DadosPagina {
    #[serde(deserialize_with = "id_obrigatorio")]
    pub disciplina_id: String,
    #[serde(default)]
    pub avaliacoes: Vec<Avaliacao>,
    #[serde(default)]
    pub professores: Vec<Professor>,
    #[serde(default)]
    pub resumo_disciplina: Option<ResumoAvaliacao>,
    #[serde(default, deserialize_with = "id_opcional")]
    pub professor_selecionado: Option<String>,
}
