//! API configuration module.
//!
//! Configuration is loaded once from environment variables, with fallback to
//! defaults, and handed to [`crate::AppState`]. Nothing reads the environment
//! after startup.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use axum::http::HeaderValue;
use stockroom_core::LowStockPolicy;
use stockroom_db::DbConfig;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Service name, used in logs and the health response
    pub app_name: String,

    /// Path prefix every route is nested under (empty for none)
    pub api_prefix: String,

    /// SQLite database file
    pub database_path: PathBuf,

    /// HTTP listen port
    pub http_port: u16,

    /// HTTP listen address
    pub bind_addr: String,

    /// HS256 key shared with the identity provider
    pub jwt_secret: String,

    /// Expected `iss` claim
    pub jwt_issuer: String,

    /// Expected `aud` claim
    pub jwt_audience: String,

    /// Upper bound on pooled SQLite connections
    pub db_max_connections: u32,

    /// When a low stock query reports items to restock
    pub low_stock_policy: LowStockPolicy,

    /// Browser origins allowed by CORS (`*` for any)
    pub cors_origins: Vec<HeaderValue>,
}

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5174,http://127.0.0.1:5174";

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = ApiConfig {
            app_name: lookup("APP_NAME").unwrap_or_else(|| "stockroom".to_string()),

            api_prefix: normalize_prefix(&lookup("API_PREFIX").unwrap_or_default()),

            database_path: lookup("DATABASE_PATH")
                .unwrap_or_else(|| "./stockroom.db".to_string())
                .into(),

            http_port: parse_or(&lookup, "HTTP_PORT", 8000)?,

            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string()),

            jwt_secret: required(&lookup, "JWT_SECRET")?,

            jwt_issuer: required(&lookup, "JWT_ISSUER")?,

            jwt_audience: required(&lookup, "JWT_AUDIENCE")?,

            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,

            low_stock_policy: parse_or(&lookup, "LOW_STOCK_POLICY", LowStockPolicy::default())?,

            cors_origins: parse_origins(
                &lookup("CORS_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string()),
            )?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        Ok(config)
    }

    /// Address the HTTP listener binds to (`addr:port`).
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.http_port)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path.clone()).max_connections(self.db_max_connections)
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, ConfigError> {
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingRequired(key.to_string()))
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Comma-separated origins; blank entries are skipped.
fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|_| ConfigError::InvalidValue("CORS_ORIGINS".to_string()))
        })
        .collect()
}

/// `"api/v1/"` → `"/api/v1"`, blank → `""`.
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        let mut map: HashMap<String, String> = [
            ("JWT_SECRET", "secret"),
            ("JWT_ISSUER", "https://id.example.com"),
            ("JWT_AUDIENCE", "stockroom"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        for (k, v) in pairs {
            map.insert(k.to_string(), v.to_string());
        }
        map
    }

    fn load(map: &HashMap<String, String>) -> Result<ApiConfig, ConfigError> {
        ApiConfig::load_from(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&vars(&[])).unwrap();
        assert_eq!(config.app_name, "stockroom");
        assert_eq!(config.api_prefix, "");
        assert_eq!(config.database_path, PathBuf::from("./stockroom.db"));
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.low_stock_policy, LowStockPolicy::AnyMatch);
        assert_eq!(
            config.cors_origins,
            vec![
                HeaderValue::from_static("http://localhost:5174"),
                HeaderValue::from_static("http://127.0.0.1:5174"),
            ]
        );
    }

    #[test]
    fn test_cors_origins() {
        let config = load(&vars(&[(
            "CORS_ORIGINS",
            " https://shop.example.com , ,https://admin.example.com",
        )]))
        .unwrap();
        assert_eq!(config.cors_origins.len(), 2);
        assert_eq!(config.cors_origins[0], "https://shop.example.com");
        assert_eq!(config.cors_origins[1], "https://admin.example.com");

        let config = load(&vars(&[("CORS_ORIGINS", "")])).unwrap();
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = load(&vars(&[
            ("HTTP_PORT", "9090"),
            ("BIND_ADDR", "127.0.0.1"),
            ("API_PREFIX", "api/v1/"),
            ("LOW_STOCK_POLICY", "plural_only"),
        ]))
        .unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:9090");
        assert_eq!(config.api_prefix, "/api/v1");
        assert_eq!(config.low_stock_policy, LowStockPolicy::PluralOnly);
    }

    #[test]
    fn test_missing_secret() {
        let mut map = vars(&[]);
        map.remove("JWT_SECRET");
        let err = load(&map).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired(key) if key == "JWT_SECRET"));

        let err = load(&vars(&[("JWT_ISSUER", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired(key) if key == "JWT_ISSUER"));
    }

    #[test]
    fn test_invalid_values() {
        for (key, value) in [
            ("HTTP_PORT", "eighty"),
            ("HTTP_PORT", "70000"),
            ("DB_MAX_CONNECTIONS", "0"),
            ("LOW_STOCK_POLICY", "sometimes"),
            ("CORS_ORIGINS", "http://bad\norigin"),
        ] {
            let err = load(&vars(&[(key, value)])).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue(k) if k == key), "{key}={value}");
        }
    }
}
