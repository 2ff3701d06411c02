//! Configuration module
//!
//! Loads configuration from environment variables.

use rust_decimal::Decimal;
use std::env;

use crate::domain::{LoanPolicy, LOAN_LIMIT};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Loan ceiling in currency units
    pub loan_limit: Decimal,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::MissingEnv("DATABASE_URL"))?;

        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"))?;

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT"))?;

        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        let loan_limit: Decimal = lookup("LOAN_LIMIT")
            .unwrap_or_else(|| LOAN_LIMIT.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("LOAN_LIMIT"))?;
        if loan_limit < Decimal::ZERO {
            return Err(ConfigError::InvalidValue("LOAN_LIMIT"));
        }

        Ok(Self {
            database_url,
            database_max_connections,
            host,
            port,
            environment,
            loan_limit,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn loan_policy(&self) -> LoanPolicy {
        LoanPolicy::new(self.loan_limit)
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/mamapesa")]).unwrap();
        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert!(!config.is_production());
        assert_eq!(config.loan_policy().loan_limit(), dec!(5000));
    }

    #[test]
    fn test_missing_database_url() {
        assert!(matches!(load(&[]), Err(ConfigError::MissingEnv("DATABASE_URL"))));
    }

    #[test]
    fn test_loan_limit_override() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/mamapesa"),
            ("LOAN_LIMIT", "7500.50"),
            ("ENVIRONMENT", "production"),
        ])
        .unwrap();
        assert_eq!(config.loan_limit, dec!(7500.50));
        assert!(config.is_production());
    }

    #[test]
    fn test_invalid_values() {
        let url = ("DATABASE_URL", "postgres://localhost/mamapesa");
        assert!(matches!(
            load(&[url, ("PORT", "http")]),
            Err(ConfigError::InvalidValue("PORT"))
        ));
        assert!(matches!(
            load(&[url, ("LOAN_LIMIT", "-1")]),
            Err(ConfigError::InvalidValue("LOAN_LIMIT"))
        ));
    }
}
