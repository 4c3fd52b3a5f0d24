use std::env;
use std::str::FromStr;

use thiserror::Error;

/// Whether task and tag routes require a signed-in session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessPolicy {
    /// Any caller may read and write the shared task list.
    Open,
    /// Callers need a live `session_id` cookie from `/api/auth/login`.
    #[default]
    Session,
}

impl FromStr for AccessPolicy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(AccessPolicy::Open),
            "session" => Ok(AccessPolicy::Session),
            other => Err(ConfigError::Invalid {
                key: "ACCESS_POLICY",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub max_connections: u32,
    pub access_policy: AccessPolicy,
    pub bcrypt_cost: u32,
}

/// The slice of configuration request handlers need, shared as `web::Data`.
#[derive(Debug, Clone, Copy)]
pub struct AppSettings {
    pub access_policy: AccessPolicy,
    pub bcrypt_cost: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            access_policy: AccessPolicy::default(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl Config {
    pub fn settings(&self) -> AppSettings {
        AppSettings {
            access_policy: self.access_policy,
            bcrypt_cost: self.bcrypt_cost,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: "DATABASE_MAX_CONNECTIONS",
                value: raw,
            })?,
            None => 5,
        };
        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|cost| (4..=31).contains(cost))
                .ok_or(ConfigError::Invalid { key: "BCRYPT_COST", value: raw })?,
            None => bcrypt::DEFAULT_COST,
        };
        let access_policy = match lookup("ACCESS_POLICY") {
            Some(raw) => raw.parse()?,
            None => AccessPolicy::default(),
        };

        Ok(Config {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://taskboard.db".to_string()),
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            max_connections,
            access_policy,
            bcrypt_cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.database_url, "sqlite://taskboard.db");
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.access_policy, AccessPolicy::Session);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("ACCESS_POLICY", "Open"),
            ("DATABASE_MAX_CONNECTIONS", "2"),
        ])
        .unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.access_policy, AccessPolicy::Open);
        assert_eq!(config.max_connections, 2);
    }

    #[test]
    fn rejects_unknown_policy() {
        let err = config_from(&[("ACCESS_POLICY", "public")]).unwrap_err();
        assert_eq!(err.to_string(), "invalid value for ACCESS_POLICY: public");
    }

    #[test]
    fn bcrypt_cost_must_be_in_range() {
        assert_eq!(config_from(&[("BCRYPT_COST", "4")]).unwrap().bcrypt_cost, 4);
        assert!(config_from(&[("BCRYPT_COST", "3")]).is_err());
        assert!(config_from(&[("BCRYPT_COST", "40")]).is_err());
    }

    #[test]
    fn rejects_non_numeric_pool_size() {
        assert!(config_from(&[("DATABASE_MAX_CONNECTIONS", "many")]).is_err());
    }
}
