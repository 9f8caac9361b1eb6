//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `THREADLINE_API_BASE_URL` - Backend REST API root (default: `http://localhost:8082/api/v1`)
//! - `THREADLINE_CART_PATH` - Where the cart snapshot is kept (default: `.threadline/cart.json`)
//! - `THREADLINE_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default backend root used in local development.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8082/api/v1";

const DEFAULT_CART_PATH: &str = ".threadline/cart.json";
const DEFAULT_TIMEOUT_SECS: &str = "30";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend REST API root, always ending in `/`
    pub api_base_url: Url,
    /// Location of the persisted cart snapshot
    pub cart_path: PathBuf,
    /// Timeout applied to every backend request
    pub request_timeout: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag (e.g. production, staging)
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(&Env::process())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed.
    pub fn from_lookup(env: &Env) -> Result<Self, ConfigError> {
        let api_base_url = parse_base_url(
            "THREADLINE_API_BASE_URL",
            &env.get_or_default("THREADLINE_API_BASE_URL", DEFAULT_API_BASE_URL),
        )?;
        let cart_path = PathBuf::from(env.get_or_default("THREADLINE_CART_PATH", DEFAULT_CART_PATH));
        let timeout_secs = env
            .get_or_default("THREADLINE_REQUEST_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("THREADLINE_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            api_base_url,
            cart_path,
            request_timeout: Duration::from_secs(timeout_secs),
            sentry_dsn: env.get_optional("SENTRY_DSN"),
            sentry_environment: env.get_optional("SENTRY_ENVIRONMENT"),
        })
    }
}

/// Parse a base URL, forcing a trailing slash so relative joins keep the path.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` if `value` is not an absolute http(s) URL.
pub fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

// =============================================================================
// Variable source
// =============================================================================

/// Where configuration values come from.
///
/// The process environment in production; a fixed map in tests.
#[derive(Debug, Clone, Default)]
pub struct Env {
    overrides: Option<Vec<(String, String)>>,
}

impl Env {
    /// Read from the process environment.
    #[must_use]
    pub const fn process() -> Self {
        Self { overrides: None }
    }

    /// Read only from the given pairs.
    #[must_use]
    pub fn from_pairs<K: Into<String>, V: Into<String>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        Self {
            overrides: Some(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }

    /// Get an optional variable. Empty values count as unset.
    #[must_use]
    pub fn get_optional(&self, key: &str) -> Option<String> {
        let value = match &self.overrides {
            Some(pairs) => pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone()),
            None => std::env::var(key).ok(),
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// Get a required variable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if it is unset or empty.
    pub fn get_required(&self, key: &str) -> Result<String, ConfigError> {
        self.get_optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get a required variable as a secret.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if it is unset or empty.
    pub fn get_required_secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        self.get_required(key).map(SecretString::from)
    }

    /// Get a variable with a default value.
    #[must_use]
    pub fn get_or_default(&self, key: &str, default: &str) -> String {
        self.get_optional(key).unwrap_or_else(|| default.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::from_lookup(&Env::from_pairs::<&str, &str>([])).unwrap();
        assert_eq!(config.api_base_url.as_str(), "http://localhost:8082/api/v1/");
        assert_eq!(config.cart_path, PathBuf::from(".threadline/cart.json"));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let env = Env::from_pairs([
            ("THREADLINE_API_BASE_URL", "https://api.example.pk/v2/"),
            ("THREADLINE_CART_PATH", "/tmp/cart.json"),
            ("THREADLINE_REQUEST_TIMEOUT_SECS", "5"),
            ("SENTRY_DSN", "https://key@sentry.example.com/1"),
        ]);
        let config = StorefrontConfig::from_lookup(&env).unwrap();
        assert_eq!(config.api_base_url.as_str(), "https://api.example.pk/v2/");
        assert_eq!(config.cart_path, PathBuf::from("/tmp/cart.json"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(config.sentry_dsn.is_some());
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let url = parse_base_url("X", "http://localhost:8082/api/v1").unwrap();
        assert_eq!(url.join("products").unwrap().as_str(), "http://localhost:8082/api/v1/products");
    }

    #[test]
    fn test_invalid_base_url() {
        let env = Env::from_pairs([("THREADLINE_API_BASE_URL", "not a url")]);
        assert!(matches!(
            StorefrontConfig::from_lookup(&env),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "THREADLINE_API_BASE_URL"
        ));
        assert!(parse_base_url("X", "ftp://files.example.com").is_err());
    }

    #[test]
    fn test_invalid_timeout() {
        let env = Env::from_pairs([("THREADLINE_REQUEST_TIMEOUT_SECS", "soon")]);
        assert!(StorefrontConfig::from_lookup(&env).is_err());
    }

    #[test]
    fn test_empty_values_are_unset() {
        let env = Env::from_pairs([("SENTRY_DSN", "  ")]);
        assert!(env.get_optional("SENTRY_DSN").is_none());
        assert!(matches!(
            env.get_required("SENTRY_DSN"),
            Err(ConfigError::MissingEnvVar(_))
        ));
    }
}
