// src/config.rs
use crate::error::{AppError, AppResult};
use std::{net::SocketAddr, time::Duration};

/// Configuração do servidor do painel, lida das variáveis de ambiente.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// URL base do backend REST (sem barra final)
    pub backend_url: String,
    /// Nome do cookie de sessão do backend reencaminhado em cada pedido
    pub backend_cookie: String,
    pub backend_timeout: Duration,
    pub session_inactivity_hours: i64,
}

impl Config {
    pub fn from_env() -> AppResult<Config> {
        dotenvy::dotenv().ok(); // Carrega .env
        Self::from_lookup(|nome| std::env::var(nome).ok())
    }

    // Separado de from_env para os testes não mexerem no ambiente do processo
    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> AppResult<Config> {
        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:3000".into())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::ConfigInvalida(format!("BIND_ADDR: {}", e)))?;

        let backend_url = var("BACKEND_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .ok_or(AppError::EnvVarError(std::env::VarError::NotPresent))?;

        let backend_cookie = var("BACKEND_COOKIE").unwrap_or_else(|| "JSESSIONID".into());

        let timeout_secs = match var("BACKEND_TIMEOUT_SECS") {
            Some(v) => v
                .parse::<u64>()
                .map_err(|e| AppError::ConfigInvalida(format!("BACKEND_TIMEOUT_SECS: {}", e)))?,
            None => 30,
        };

        let session_inactivity_hours = match var("SESSION_INACTIVITY_HOURS") {
            Some(v) => v
                .parse::<i64>()
                .map_err(|e| AppError::ConfigInvalida(format!("SESSION_INACTIVITY_HOURS: {}", e)))?,
            None => 24,
        };

        Ok(Config {
            bind_addr,
            backend_url,
            backend_cookie,
            backend_timeout: Duration::from_secs(timeout_secs),
            session_inactivity_hours,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> AppResult<Config> {
        let mapa: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|nome| mapa.get(nome).cloned())
    }

    #[test]
    fn valores_por_omissao() {
        let c = config(&[("BACKEND_URL", "http://localhost:8080/")]).unwrap();
        assert_eq!(c.backend_url, "http://localhost:8080");
        assert_eq!(c.bind_addr.port(), 3000);
        assert_eq!(c.backend_cookie, "JSESSIONID");
        assert_eq!(c.backend_timeout, Duration::from_secs(30));
        assert_eq!(c.session_inactivity_hours, 24);
    }

    #[test]
    fn backend_url_e_obrigatoria() {
        assert!(matches!(config(&[]), Err(AppError::EnvVarError(_))));
        assert!(config(&[("BACKEND_URL", "  ")]).is_err());
    }

    #[test]
    fn rejeita_numeros_invalidos() {
        let r = config(&[("BACKEND_URL", "http://b"), ("BACKEND_TIMEOUT_SECS", "trinta")]);
        assert!(matches!(r, Err(AppError::ConfigInvalida(_))));
    }
}
