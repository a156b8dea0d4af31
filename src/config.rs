use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::infrastructure::http_transport::{DEFAULT_CLIENT_ID, DEFAULT_TIMEOUT};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a valid number, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Sent as the User-Agent of every GraphQL call.
    pub client_id: String,
    pub request_timeout: Duration,
}

impl Settings {
    /// Read settings from the process environment (after `.env` is loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT") {
            Some(raw) => parse_number("PORT", raw)?,
            None => 8080,
        };
        let client_id = lookup("VENDURE_CLIENT_ID").unwrap_or_else(|| DEFAULT_CLIENT_ID.to_string());
        let request_timeout = match lookup("VENDURE_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_number("VENDURE_TIMEOUT_SECS", raw)?),
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            host,
            port,
            client_id,
            request_timeout,
        })
    }
}

fn parse_number<N: std::str::FromStr>(name: &'static str, raw: String) -> Result<N, ConfigError> {
    let parsed = raw.trim().parse();
    parsed.map_err(|_| ConfigError::InvalidNumber { name, value: raw })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.host, "0.0.0.0");
        assert_eq!(s.port, 8080);
        assert_eq!(s.client_id, "ActivePieces-Vendure-Checkout/1.0");
        assert_eq!(s.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn values_are_read_from_the_environment() {
        let s = settings(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9090"),
            ("VENDURE_CLIENT_ID", "flows/2.0"),
            ("VENDURE_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(s.host, "127.0.0.1");
        assert_eq!(s.port, 9090);
        assert_eq!(s.client_id, "flows/2.0");
        assert_eq!(s.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn invalid_port_is_rejected() {
        assert_eq!(
            settings(&[("PORT", "eighty")]).unwrap_err(),
            ConfigError::InvalidNumber {
                name: "PORT",
                value: "eighty".to_string()
            }
        );
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        let err = settings(&[("VENDURE_TIMEOUT_SECS", "-1")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "VENDURE_TIMEOUT_SECS must be a valid number, got '-1'"
        );
    }
}
