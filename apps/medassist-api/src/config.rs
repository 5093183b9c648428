//! Environment-based application configuration.
//!
//! Everything the process needs is read once at startup into an immutable
//! `Config` and passed down explicitly. Nothing is looked up globally after
//! that, so tests build their own `Config` from a map.

use std::time::Duration;

use axum::http::HeaderValue;
use medassist_kommo::KommoConfig;
use thiserror::Error;
use tower_sessions::cookie::SameSite;

use crate::notifier::RetryPolicy;

/// Minimum length of `SECRET_KEY`, in bytes
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Required environment variable is not set.
    ///
    /// The application requires this environment variable to be defined. Check the
    /// `.env.example` file for required configuration variables.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Environment variable is set but cannot be used.
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

impl ConfigError {
    fn invalid(var: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            var: var.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub http: HttpConfig,
    pub store: StoreConfig,
    /// `None` when Kommo credentials are absent; CRM forwarding is then log-only
    pub kommo: Option<KommoConfig>,
    pub crm: CrmDeliveryConfig,
}

/// Cross-cutting HTTP policy: CORS allow-list and session cookie
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub allowed_origins: Vec<HeaderValue>,
    pub session: SessionConfig,
}

#[derive(Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub same_site: SameSite,
    pub secure: bool,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"<redacted>")
            .field("same_site", &self.same_site)
            .field("secure", &self.secure)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    S3 { bucket: String },
    Memory,
}

#[derive(Debug, Clone)]
pub struct CrmDeliveryConfig {
    pub retry: RetryPolicy,
    pub queue_capacity: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &str| var(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()));

        let host = var("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or("API_PORT", var("API_PORT"), 8000u16)?;

        let allowed_origins = parse_origins(&required("FRONTEND_URLS")?)?;

        let secret = required("SECRET_KEY")?;
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::invalid(
                "SECRET_KEY",
                format!("must be at least {MIN_SECRET_LEN} bytes"),
            ));
        }
        let same_site = match var("SESSION_SAME_SITE") {
            Some(value) => parse_same_site(&value)?,
            None => SameSite::Lax,
        };
        let secure = parse_or("SESSION_SECURE", var("SESSION_SECURE"), true)?;

        let store = match var("DOCUMENT_STORE").as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("s3") => StoreConfig::S3 {
                bucket: var("DOCUMENT_BUCKET").unwrap_or_else(|| "medassist".to_string()),
            },
            Some("memory") => StoreConfig::Memory,
            Some(other) => {
                return Err(ConfigError::invalid(
                    "DOCUMENT_STORE",
                    format!("expected 's3' or 'memory', got '{other}'"),
                ))
            }
        };

        let kommo = match (var("KOMMO_BASE_URL"), var("KOMMO_ACCESS_TOKEN")) {
            (Some(base_url), Some(token)) => {
                let mut kommo = KommoConfig::new(base_url, token);
                kommo.pipeline_id = var("KOMMO_PIPELINE_ID")
                    .map(|raw| parse_value("KOMMO_PIPELINE_ID", &raw))
                    .transpose()?;
                kommo.timeout =
                    Duration::from_secs(parse_or("KOMMO_TIMEOUT_SECS", var("KOMMO_TIMEOUT_SECS"), 10)?);
                Some(kommo)
            }
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::MissingEnvVar("KOMMO_ACCESS_TOKEN".into())),
            (None, Some(_)) => return Err(ConfigError::MissingEnvVar("KOMMO_BASE_URL".into())),
        };

        let defaults = RetryPolicy::default();
        let max_attempts = parse_or("CRM_MAX_ATTEMPTS", var("CRM_MAX_ATTEMPTS"), defaults.max_attempts)?;
        if max_attempts == 0 {
            return Err(ConfigError::invalid("CRM_MAX_ATTEMPTS", "must be at least 1"));
        }
        let initial_backoff = match var("CRM_BACKOFF_MS") {
            Some(raw) => Duration::from_millis(parse_value("CRM_BACKOFF_MS", &raw)?),
            None => defaults.initial_backoff,
        };
        let queue_capacity = parse_or("CRM_QUEUE_CAPACITY", var("CRM_QUEUE_CAPACITY"), 256usize)?;
        if queue_capacity == 0 {
            return Err(ConfigError::invalid("CRM_QUEUE_CAPACITY", "must be at least 1"));
        }

        Ok(Self {
            host,
            port,
            http: HttpConfig {
                allowed_origins,
                session: SessionConfig {
                    secret,
                    same_site,
                    secure,
                },
            },
            store,
            kommo,
            crm: CrmDeliveryConfig {
                retry: RetryPolicy {
                    max_attempts,
                    initial_backoff,
                    max_backoff: defaults.max_backoff.max(initial_backoff),
                },
                queue_capacity,
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_value<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|err| ConfigError::invalid(var, format!("'{raw}': {err}")))
}

fn parse_or<T>(var: &str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => parse_value(var, &raw),
        None => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    let mut origins = Vec::new();
    for origin in raw.split(',').map(str::trim).filter(|o| !o.is_empty()) {
        if origin == "*" {
            return Err(ConfigError::invalid(
                "FRONTEND_URLS",
                "a wildcard origin cannot be used with credentialed CORS",
            ));
        }
        let value = HeaderValue::from_str(origin.trim_end_matches('/'))
            .map_err(|err| ConfigError::invalid("FRONTEND_URLS", format!("'{origin}': {err}")))?;
        origins.push(value);
    }

    if origins.is_empty() {
        return Err(ConfigError::invalid("FRONTEND_URLS", "no origins listed"));
    }
    Ok(origins)
}

fn parse_same_site(raw: &str) -> Result<SameSite, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" => Ok(SameSite::None),
        other => Err(ConfigError::invalid(
            "SESSION_SAME_SITE",
            format!("expected lax, strict or none, got '{other}'"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn minimal() -> Vec<(&'static str, &'static str)> {
        vec![
            ("FRONTEND_URLS", "https://app.example.com"),
            ("SECRET_KEY", SECRET),
        ]
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&minimal())).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8000");
        assert_eq!(config.http.session.same_site, SameSite::Lax);
        assert!(config.http.session.secure);
        assert_eq!(
            config.store,
            StoreConfig::S3 {
                bucket: "medassist".to_string()
            }
        );
        assert!(config.kommo.is_none());
        assert_eq!(config.crm.retry.max_attempts, 3);
        assert_eq!(config.crm.queue_capacity, 256);
    }

    #[test]
    fn test_origins_are_split_and_trimmed() {
        let mut pairs = minimal();
        pairs[0] = (
            "FRONTEND_URLS",
            " https://app.example.com/ , http://localhost:3000,,",
        );
        let config = Config::from_lookup(lookup(&pairs)).unwrap();

        assert_eq!(
            config.http.allowed_origins,
            vec![
                HeaderValue::from_static("https://app.example.com"),
                HeaderValue::from_static("http://localhost:3000"),
            ]
        );
    }

    #[test]
    fn test_wildcard_origin_is_rejected() {
        let mut pairs = minimal();
        pairs[0] = ("FRONTEND_URLS", "*");

        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref var, .. } if var == "FRONTEND_URLS"));
    }

    #[test]
    fn test_missing_required_vars() {
        let err = Config::from_lookup(lookup(&[("SECRET_KEY", SECRET)])).unwrap_err();
        assert_eq!(err, ConfigError::MissingEnvVar("FRONTEND_URLS".into()));

        let err =
            Config::from_lookup(lookup(&[("FRONTEND_URLS", "https://a.example")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingEnvVar("SECRET_KEY".into()));
    }

    #[test]
    fn test_short_secret_is_rejected() {
        let pairs = [("FRONTEND_URLS", "https://a.example"), ("SECRET_KEY", "short")];
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(err.to_string().contains("SECRET_KEY"));
    }

    #[test]
    fn test_session_and_store_overrides() {
        let mut pairs = minimal();
        pairs.extend([
            ("SESSION_SAME_SITE", "Strict"),
            ("SESSION_SECURE", "false"),
            ("DOCUMENT_STORE", "memory"),
            ("API_PORT", "9000"),
        ]);
        let config = Config::from_lookup(lookup(&pairs)).unwrap();

        assert_eq!(config.http.session.same_site, SameSite::Strict);
        assert!(!config.http.session.secure);
        assert_eq!(config.store, StoreConfig::Memory);
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_invalid_values() {
        for (key, value) in [
            ("API_PORT", "eighty"),
            ("SESSION_SECURE", "sometimes"),
            ("SESSION_SAME_SITE", "loose"),
            ("DOCUMENT_STORE", "postgres"),
            ("CRM_MAX_ATTEMPTS", "0"),
            ("CRM_QUEUE_CAPACITY", "0"),
        ] {
            let mut pairs = minimal();
            pairs.push((key, value));
            let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidValue { ref var, .. } if var == key),
                "{key}={value} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_kommo_requires_both_url_and_token() {
        let mut pairs = minimal();
        pairs.push(("KOMMO_BASE_URL", "https://clinic.kommo.com"));
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert_eq!(err, ConfigError::MissingEnvVar("KOMMO_ACCESS_TOKEN".into()));

        pairs.extend([
            ("KOMMO_ACCESS_TOKEN", "token"),
            ("KOMMO_PIPELINE_ID", "42"),
            ("KOMMO_TIMEOUT_SECS", "3"),
        ]);
        let kommo = Config::from_lookup(lookup(&pairs)).unwrap().kommo.unwrap();
        assert_eq!(kommo.pipeline_id, Some(42));
        assert_eq!(kommo.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_crm_backoff_override() {
        let mut pairs = minimal();
        pairs.extend([("CRM_BACKOFF_MS", "5"), ("CRM_MAX_ATTEMPTS", "5")]);
        let config = Config::from_lookup(lookup(&pairs)).unwrap();

        assert_eq!(config.crm.retry.initial_backoff, Duration::from_millis(5));
        assert_eq!(config.crm.retry.max_attempts, 5);
    }
}
