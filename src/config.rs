use crate::domain::Decimal;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    /// Fee rate applied when a trade is submitted without an explicit fee.
    pub default_fee_rate: Decimal,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let default_fee_rate = env_map
            .get("DEFAULT_FEE_RATE")
            .map(|s| s.as_str())
            .unwrap_or("0.001")
            .parse::<Decimal>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "DEFAULT_FEE_RATE".to_string(),
                    "must be a valid decimal".to_string(),
                )
            })?;

        if default_fee_rate.is_negative() {
            return Err(ConfigError::InvalidValue(
                "DEFAULT_FEE_RATE".to_string(),
                "must not be negative".to_string(),
            ));
        }

        Ok(Config {
            port,
            database_path,
            default_fee_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_required_env() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("DATABASE_PATH".to_string(), "/tmp/test.db".to_string());
        map
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_env_map(setup_required_env()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_path, "/tmp/test.db");
        assert_eq!(
            config.default_fee_rate,
            Decimal::from_str_canonical("0.001").unwrap()
        );
    }

    #[test]
    fn test_missing_database_path() {
        let mut env_map = setup_required_env();
        env_map.remove("DATABASE_PATH");
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::MissingEnv(s)) => assert_eq!(s, "DATABASE_PATH"),
            _ => panic!("Expected MissingEnv error"),
        }
    }

    #[test]
    fn test_invalid_port() {
        let mut env_map = setup_required_env();
        env_map.insert("PORT".to_string(), "not_a_number".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "PORT"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_fee_rate() {
        let mut env_map = setup_required_env();
        env_map.insert("DEFAULT_FEE_RATE".to_string(), "free".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "DEFAULT_FEE_RATE"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_negative_fee_rate_rejected() {
        let mut env_map = setup_required_env();
        env_map.insert("DEFAULT_FEE_RATE".to_string(), "-0.001".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "DEFAULT_FEE_RATE"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_explicit_fee_rate() {
        let mut env_map = setup_required_env();
        env_map.insert("DEFAULT_FEE_RATE".to_string(), "0.00075".to_string());
        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(
            config.default_fee_rate,
            Decimal::from_str_canonical("0.00075").unwrap()
        );
    }
}
