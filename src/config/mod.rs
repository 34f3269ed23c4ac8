use std::env;
use std::net::SocketAddr;

use thiserror::Error;

use crate::utils::crypto::{CryptoError, FieldCipher};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_SEED_EMPLOYEES: usize = 50;

/// Which backend holds the employee records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageProvider {
    Postgres { database_url: String },
    Memory,
}

/// Runtime configuration resolved from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage: StorageProvider,
    pub bind_addr: SocketAddr,
    pub seed_employees: usize,
    encryption_key: String,
    encryption_iv: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("DATABASE_PROVIDER must be 'postgres' or 'memory' (got {0})")]
    InvalidProvider(String),
    #[error("invalid BIND_ADDR value: {0}")]
    BindAddress(#[from] std::net::AddrParseError),
    #[error("SEED_EMPLOYEES must be a non-negative integer (got {0})")]
    InvalidSeedCount(String),
    #[error("invalid encryption settings: {0}")]
    Encryption(#[from] CryptoError),
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any name → value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let provider = lookup("DATABASE_PROVIDER").unwrap_or_else(|| "postgres".to_string());
        let storage = match provider.to_lowercase().as_str() {
            "postgres" | "postgresql" => StorageProvider::Postgres {
                database_url: required("DATABASE_URL")?,
            },
            "memory" => StorageProvider::Memory,
            _ => return Err(ConfigError::InvalidProvider(provider)),
        };

        let bind_addr: SocketAddr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()?;

        let seed_employees: usize = match lookup("SEED_EMPLOYEES") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidSeedCount(raw))?,
            None => DEFAULT_SEED_EMPLOYEES,
        };

        let config = Self {
            storage,
            bind_addr,
            seed_employees,
            encryption_key: required("ENCRYPTION_KEY")?,
            encryption_iv: required("ENCRYPTION_IV")?,
        };
        // Fail at startup rather than on the first request.
        config.cipher()?;
        Ok(config)
    }

    /// Key and IV are used as their UTF-8 bytes, matching data already stored.
    pub fn cipher(&self) -> Result<FieldCipher, CryptoError> {
        FieldCipher::new(self.encryption_key.as_bytes(), self.encryption_iv.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    const KEY: (&str, &str) = ("ENCRYPTION_KEY", "0123456789abcdef0123456789abcdef");
    const IV: (&str, &str) = ("ENCRYPTION_IV", "abcdef9876543210");

    #[test]
    fn loads_defaults_with_postgres() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/hr"), KEY, IV]).unwrap();
        assert_eq!(
            config.storage,
            StorageProvider::Postgres {
                database_url: "postgres://localhost/hr".to_string()
            }
        );
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.seed_employees, DEFAULT_SEED_EMPLOYEES);
        assert!(config.cipher().is_ok());
    }

    #[test]
    fn memory_provider_needs_no_database_url() {
        let config = load(&[
            ("DATABASE_PROVIDER", "memory"),
            ("BIND_ADDR", "0.0.0.0:9000"),
            ("SEED_EMPLOYEES", "0"),
            KEY,
            IV,
        ])
        .unwrap();
        assert_eq!(config.storage, StorageProvider::Memory);
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:9000");
        assert_eq!(config.seed_employees, 0);
    }

    #[test]
    fn missing_secrets_are_fatal() {
        let err = load(&[("DATABASE_PROVIDER", "memory"), IV]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("ENCRYPTION_KEY")));

        let err = load(&[("DATABASE_PROVIDER", "memory"), KEY]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("ENCRYPTION_IV")));

        let err = load(&[KEY, IV]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn rejects_invalid_values() {
        let err = load(&[("DATABASE_PROVIDER", "mysql"), KEY, IV]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidProvider(p) if p == "mysql"));

        let err = load(&[("DATABASE_PROVIDER", "memory"), ("SEED_EMPLOYEES", "-4"), KEY, IV]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSeedCount(_)));

        let err = load(&[("DATABASE_PROVIDER", "memory"), ("BIND_ADDR", "nope"), KEY, IV]).unwrap_err();
        assert!(matches!(err, ConfigError::BindAddress(_)));

        let err = load(&[("DATABASE_PROVIDER", "memory"), ("ENCRYPTION_KEY", "short"), IV]).unwrap_err();
        assert!(matches!(err, ConfigError::Encryption(CryptoError::InvalidKeyLength(5))));
    }
}
