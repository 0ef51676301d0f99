use serde::Deserialize;
use std::env;
use std::net::{IpAddr, SocketAddr};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

// Главная структура конфигурации одного приложения
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub store: StoreBackend,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    pub log_json: bool,
}

impl AppConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.parse().map_err(|_| ConfigError::Invalid {
            key: "HOST",
            value: self.host.clone(),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

/// Where an application keeps its rows.
#[derive(Debug, Clone, Deserialize)]
pub enum StoreBackend {
    Postgres(DatabaseConfig),
    /// Seeded in-memory store, handy for local demos.
    Memory,
}

/// Which of the two applications a config is being built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppKind {
    Fyyur,
    Trivia,
}

impl AppKind {
    fn name(self) -> &'static str {
        match self {
            AppKind::Fyyur => "fyyur",
            AppKind::Trivia => "trivia",
        }
    }

    fn port_key(self) -> &'static str {
        match self {
            AppKind::Fyyur => "FYYUR_PORT",
            AppKind::Trivia => "TRIVIA_PORT",
        }
    }

    fn default_port(self) -> u16 {
        match self {
            AppKind::Fyyur => 5000,
            AppKind::Trivia => 5001,
        }
    }

    fn database_key(self) -> &'static str {
        match self {
            AppKind::Fyyur => "FYYUR_DATABASE_URL",
            AppKind::Trivia => "TRIVIA_DATABASE_URL",
        }
    }
}

impl Config {
    pub fn fyyur_from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(AppKind::Fyyur, |key| env::var(key).ok())
    }

    pub fn trivia_from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(AppKind::Trivia, |key| env::var(key).ok())
    }

    pub fn from_lookup<F>(kind: AppKind, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup(kind.port_key()).or_else(|| lookup("PORT")) {
            Some(raw) => parse_value(kind.port_key(), &raw)?,
            None => kind.default_port(),
        };

        let app = AppConfig {
            name: kind.name().to_string(),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            rust_log: lookup("RUST_LOG")
                .unwrap_or_else(|| "fyyur_trivia=debug,tower_http=debug".to_string()),
            log_json: matches!(lookup("LOG_FORMAT").as_deref(), Some("json")),
        };

        let store = match lookup("STORE").as_deref() {
            None | Some("postgres") => {
                let url = lookup(kind.database_key())
                    .or_else(|| lookup("DATABASE_URL"))
                    .ok_or(ConfigError::Missing("DATABASE_URL"))?;
                let pool_size = match lookup("DB_POOL_SIZE") {
                    Some(raw) => parse_value("DB_POOL_SIZE", &raw)?,
                    None => 10,
                };
                StoreBackend::Postgres(DatabaseConfig { url, pool_size })
            }
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "STORE",
                    value: other.to_string(),
                })
            }
        };

        Ok(Config { app, store })
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_for_trivia_with_app_specific_database() {
        let config = Config::from_lookup(
            AppKind::Trivia,
            lookup(&[("TRIVIA_DATABASE_URL", "postgres://localhost/trivia")]),
        )
        .unwrap();

        assert_eq!(config.app.port, 5001);
        assert_eq!(config.app.host, "0.0.0.0");
        assert!(!config.app.log_json);
        match config.store {
            StoreBackend::Postgres(db) => {
                assert_eq!(db.url, "postgres://localhost/trivia");
                assert_eq!(db.pool_size, 10);
            }
            StoreBackend::Memory => panic!("expected postgres backend"),
        }
    }

    #[test]
    fn shared_database_url_is_a_fallback() {
        let config = Config::from_lookup(
            AppKind::Fyyur,
            lookup(&[("DATABASE_URL", "postgres://localhost/fyyur"), ("FYYUR_PORT", "8080")]),
        )
        .unwrap();

        assert_eq!(config.app.port, 8080);
        assert!(matches!(config.store, StoreBackend::Postgres(ref db) if db.url == "postgres://localhost/fyyur"));
    }

    #[test]
    fn memory_store_needs_no_database() {
        let config = Config::from_lookup(
            AppKind::Fyyur,
            lookup(&[("STORE", "memory"), ("LOG_FORMAT", "json")]),
        )
        .unwrap();

        assert!(matches!(config.store, StoreBackend::Memory));
        assert!(config.app.log_json);
    }

    #[test]
    fn missing_database_url_is_reported() {
        let err = Config::from_lookup(AppKind::Trivia, lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = Config::from_lookup(
            AppKind::Trivia,
            lookup(&[("STORE", "memory"), ("TRIVIA_PORT", "eighty")]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "TRIVIA_PORT",
                value: "eighty".to_string()
            }
        );
    }

    #[test]
    fn socket_addr_requires_an_ip_host() {
        let mut config = Config::from_lookup(AppKind::Fyyur, lookup(&[("STORE", "memory")])).unwrap();
        assert_eq!(config.app.socket_addr().unwrap().port(), 5000);

        config.app.host = "not-an-ip".to_string();
        assert!(config.app.socket_addr().is_err());
    }
}
