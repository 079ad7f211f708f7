use std::env;

use crate::{Error, Result};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_LOG_FILTER: &str = "crypto_blog=debug,tower_http=debug";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    /// Postgres is used when set; otherwise posts live in memory.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub log_filter: String,
}

impl Config {
    /// Reads `.env` (when present) and then the process environment.
    pub fn init() -> Result<Config> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| Error::Config(format!("PORT must be a port number, got {raw:?}")))?,
            None => DEFAULT_PORT,
        };

        let database_max_connections = match non_empty("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(max) if max > 0 => max,
                _ => {
                    return Err(Error::Config(format!(
                        "DATABASE_MAX_CONNECTIONS must be a positive integer, got {raw:?}"
                    )))
                }
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Config {
            port,
            database_url: non_empty("DATABASE_URL"),
            database_max_connections,
            log_filter: non_empty("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(config_from(&[]).unwrap(), Config::default());
    }

    #[test]
    fn values_are_read_from_the_environment() {
        let config = config_from(&[
            ("PORT", "3000"),
            ("DATABASE_URL", "postgres://localhost/blog"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
            ("RUST_LOG", "info"),
        ])
        .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/blog"));
        assert_eq!(config.database_max_connections, 4);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn blank_database_url_means_memory_store() {
        assert_eq!(config_from(&[("DATABASE_URL", "  ")]).unwrap().database_url, None);
    }

    #[test]
    fn bad_numbers_are_rejected() {
        assert!(matches!(config_from(&[("PORT", "eighty")]), Err(Error::Config(_))));
        assert!(matches!(config_from(&[("PORT", "70000")]), Err(Error::Config(_))));
        assert!(matches!(
            config_from(&[("DATABASE_MAX_CONNECTIONS", "0")]),
            Err(Error::Config(_))
        ));
    }
}
