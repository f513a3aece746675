// src/models/mod.rs
pub mod avaliacao;
pub mod comentario;
pub mod scrapper;
pub mod usuario;

use serde::{Deserialize, Deserializer};

/// O backend (Java) devolve `null` em campos Boolean/Integer opcionais.
/// Converte `null` no valor padrão do tipo em vez de falhar a desserialização.
pub fn nulo_como_padrao<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// IDs chegam ora como número, ora como texto (dados embutidos na página)
#[derive(Deserialize)]
#[serde(untagged)]
enum IdFlexivel {
    Texto(String),
    Numero(i64),
}

impl From<IdFlexivel> for String {
    fn from(id: IdFlexivel) -> String {
        match id {
            IdFlexivel::Texto(texto) => texto,
            IdFlexivel::Numero(numero) => numero.to_string(),
        }
    }
}

/// Aceita `"5"`, `5` ou `null` e devolve sempre `Option<String>`.
pub fn id_opcional<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<IdFlexivel>::deserialize(deserializer)?.map(String::from))
}

/// Igual a `id_opcional`, mas o campo é obrigatório.
pub fn id_obrigatorio<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(IdFlexivel::deserialize(deserializer)?.into())
}
