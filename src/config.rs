// Configuration lue depuis l'environnement (.env chargé dans main)

use std::env;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set in .env file")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Relais HTTP pour l'envoi des emails
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_url: String,
    pub user: Option<String>,
    pub pass: Option<String>,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub cors_origin: String,
    pub sync_schema: bool,
    pub mail: Option<MailConfig>,
}

const DEFAULT_MAIL_FROM: &str = "no-reply@game-store.com";

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Construit la config à partir d'une fonction de lecture (testable sans toucher à l'env)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value: raw })?,
            None => 3000,
        };

        let sync_schema = match lookup("DB_SYNC_SCHEMA") {
            Some(raw) => parse_bool(&raw)
                .ok_or(ConfigError::Invalid { name: "DB_SYNC_SCHEMA", value: raw })?,
            None => false,
        };

        let mail = lookup("MAIL_API_URL").map(|api_url| MailConfig {
            api_url,
            user: lookup("EMAIL_USER"),
            pass: lookup("EMAIL_PASS"),
            from: lookup("MAIL_FROM").unwrap_or_else(|| DEFAULT_MAIL_FROM.to_string()),
        });

        Ok(AppConfig {
            database_url,
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            jwt_secret,
            cors_origin: lookup("CORS_ORIGIN")
                .unwrap_or_else(|| "http://localhost:5173".to_string()),
            sync_schema,
            mail,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/tienda"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.cors_origin, "http://localhost:5173");
        assert!(!config.sync_schema);
        assert!(config.mail.is_none());
    }

    #[test]
    fn test_missing_secret() {
        let result = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "sqlite::memory:")]));
        assert_eq!(result.unwrap_err(), ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn test_invalid_port() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("JWT_SECRET", "secret"),
            ("PORT", "http"),
        ]));
        assert!(matches!(result, Err(ConfigError::Invalid { name: "PORT", .. })));
    }

    #[test]
    fn test_mail_relay() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("JWT_SECRET", "secret"),
            ("MAIL_API_URL", "https://mail.example.com/send"),
            ("EMAIL_USER", "tienda"),
            ("DB_SYNC_SCHEMA", "true"),
        ]))
        .unwrap();

        let mail = config.mail.unwrap();
        assert_eq!(mail.user.as_deref(), Some("tienda"));
        assert_eq!(mail.pass, None);
        assert_eq!(mail.from, DEFAULT_MAIL_FROM);
        assert!(config.sync_schema);
    }
}
