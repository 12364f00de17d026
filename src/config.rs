use std::env;

use crate::db::DEFAULT_STORAGE_KEY;
use crate::errors::AppError;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    /// SQLite file backing the key-value storage; `:memory:` keeps nothing.
    pub storage_path: String,
    pub storage_key: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                AppError::Config(format!("PORT must be a port number, got {raw:?}"))
            })?,
            None => 3000,
        };

        Ok(Self {
            port,
            storage_path: lookup("STORAGE_PATH").unwrap_or_else(|| "bokning.db".to_string()),
            storage_key: lookup("STORAGE_KEY")
                .filter(|k| !k.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.storage_path, "bokning.db");
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", " 8080 "),
            ("STORAGE_PATH", ":memory:"),
            ("STORAGE_KEY", "test.bookings"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.storage_path, ":memory:");
        assert_eq!(config.storage_key, "test.bookings");
    }

    #[test]
    fn test_blank_storage_key_uses_default() {
        let config = config_from(&[("STORAGE_KEY", "  ")]).unwrap();
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn test_unparsable_port_is_config_error() {
        let err = config_from(&[("PORT", "abc")]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("PORT"));

        let err = config_from(&[("PORT", "70000")]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
