//! Back-office configuration.
//!
//! # Environment Variables
//!
//! ## Required
//! - `THREADLINE_ADMIN_EMAIL` - Admin account email
//! - `THREADLINE_ADMIN_PASSWORD` - Admin account password
//!
//! ## Optional
//! The connection variables shared with the storefront
//! (see [`threadline_storefront::config`]).

use secrecy::SecretString;
use threadline_storefront::StorefrontConfig;
use threadline_storefront::config::{ConfigError, Env};

/// Admin credentials plus the shared connection settings.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub connection: StorefrontConfig,
    pub email: String,
    pub password: SecretString,
}

impl AdminConfig {
    /// Load from `.env` and the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the credentials are missing or a connection
    /// variable is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(&Env::process())
    }

    /// Load from an explicit variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the credentials are missing or a connection
    /// variable is invalid.
    pub fn from_lookup(env: &Env) -> Result<Self, ConfigError> {
        Ok(Self {
            connection: StorefrontConfig::from_lookup(env)?,
            email: env.get_required("THREADLINE_ADMIN_EMAIL")?,
            password: env.get_required_secret("THREADLINE_ADMIN_PASSWORD")?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_credentials_required() {
        let env = Env::from_pairs([("THREADLINE_ADMIN_EMAIL", "admin@threadline.pk")]);
        let err = AdminConfig::from_lookup(&env).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "THREADLINE_ADMIN_PASSWORD"));
    }

    #[test]
    fn test_loads_credentials_and_connection() {
        let env = Env::from_pairs([
            ("THREADLINE_ADMIN_EMAIL", "admin@threadline.pk"),
            ("THREADLINE_ADMIN_PASSWORD", "hunter2"),
            ("THREADLINE_API_BASE_URL", "https://api.threadline.pk/v1"),
        ]);
        let config = AdminConfig::from_lookup(&env).unwrap();
        assert_eq!(config.email, "admin@threadline.pk");
        assert_eq!(config.password.expose_secret(), "hunter2");
        assert_eq!(
            config.connection.api_base_url.as_str(),
            "https://api.threadline.pk/v1/"
        );
    }
}
