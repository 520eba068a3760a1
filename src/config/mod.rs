use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["https://fitrackify.vercel.app", "http://localhost:5173"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            _ => Environment::Production,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_expiration_secs: u64,
    pub server_host: String,
    pub server_port: u16,
    pub allowed_origins: Vec<String>,
    pub body_limit_bytes: usize,
    pub environment: Environment,
    /// Accounts registered with one of these emails become admins.
    pub admin_emails: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup so tests never
    /// have to touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        // hours, "24" or "24h"
        let jwt_expiration_hours = match get("JWT_EXPIRATION") {
            Some(raw) => parse_value::<u64>("JWT_EXPIRATION", raw.trim().trim_end_matches('h'))?,
            None => 24 * 7,
        };

        let server_port = match get("SERVER_PORT").or_else(|| get("PORT")) {
            Some(raw) => parse_value::<u16>("SERVER_PORT", &raw)?,
            None => 5000,
        };

        let allowed_origins = match get("CORS_ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty() && *s != "null")
                .map(|s| s.trim_end_matches('/').to_string())
                .collect(),
            None => DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect(),
        };

        let body_limit_bytes = match get("BODY_LIMIT_BYTES") {
            Some(raw) => parse_value::<usize>("BODY_LIMIT_BYTES", &raw)?,
            None => 100 * 1024,
        };

        let admin_emails = get("ADMIN_EMAILS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Config {
            database_url: get("DATABASE_URL"),
            jwt_secret,
            jwt_expiration_secs: jwt_expiration_hours * 3600,
            server_host: get("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port,
            allowed_origins,
            body_limit_bytes,
            environment: get("APP_ENV")
                .map(|raw| Environment::parse(&raw))
                .unwrap_or(Environment::Production),
            admin_emails,
        })
    }

    pub fn jwt_expiration(&self) -> Duration {
        Duration::from_secs(self.jwt_expiration_secs)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|allowed| allowed == origin)
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.admin_emails.iter().any(|admin| *admin == email)
    }
}

fn parse_value<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = config_from(&[("JWT_SECRET", "s3cret")]).unwrap();

        assert_eq!(config.server_port, 5000);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.jwt_expiration(), Duration::from_secs(7 * 24 * 3600));
        assert_eq!(config.body_limit_bytes, 100 * 1024);
        assert_eq!(config.environment, Environment::Production);
        assert!(config.database_url.is_none());
        assert!(config.is_origin_allowed("https://fitrackify.vercel.app"));
        assert!(config.is_origin_allowed("http://localhost:5173"));
        assert!(!config.is_origin_allowed("https://evil.example"));
        assert!(config.admin_emails.is_empty());
    }

    #[test]
    fn admin_emails_are_matched_case_insensitively() {
        let config = config_from(&[
            ("JWT_SECRET", "s3cret"),
            ("ADMIN_EMAILS", " Ops@Example.com ,, root@example.com"),
        ])
        .unwrap();

        assert_eq!(config.admin_emails, vec!["ops@example.com", "root@example.com"]);
        assert!(config.is_admin_email("OPS@example.com"));
        assert!(!config.is_admin_email("someone@example.com"));
    }

    #[test]
    fn secret_is_required() {
        let err = config_from(&[("SERVER_PORT", "8080")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = config_from(&[
            ("JWT_SECRET", "s3cret"),
            ("JWT_EXPIRATION", "12h"),
            ("PORT", "8081"),
            ("APP_ENV", "Development"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example/, ,null,https://b.example"),
        ])
        .unwrap();

        assert_eq!(config.jwt_expiration_secs, 12 * 3600);
        assert_eq!(config.server_port, 8081);
        assert!(config.is_development());
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }

    #[test]
    fn unparsable_port_is_rejected() {
        let err = config_from(&[("JWT_SECRET", "s3cret"), ("SERVER_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SERVER_PORT", .. }));
    }
}
