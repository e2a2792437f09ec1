//! Gateway configuration: default credentials and endpoint overrides.

use std::env;
use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::{Credentials, ValidationError};

pub const DEFAULT_SEND_ENDPOINT: &str = "https://api.1s2u.io/bulksms";
pub const DEFAULT_BALANCE_ENDPOINT: &str = "https://api.1s2u.io/checkbalance";

pub const USERNAME_VAR: &str = "BULKSMS_USERNAME";
pub const PASSWORD_VAR: &str = "BULKSMS_PASSWORD";
pub const SEND_ENDPOINT_VAR: &str = "BULKSMS_SEND_ENDPOINT";
pub const BALANCE_ENDPOINT_VAR: &str = "BULKSMS_BALANCE_ENDPOINT";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is required")]
    MissingVar(&'static str),

    #[error("environment variable {0} is not valid unicode")]
    NotUnicode(&'static str),

    #[error("invalid default credentials: {0}")]
    Credentials(#[from] ValidationError),

    #[error("failed to load .env file: {0}")]
    DotEnv(#[source] dotenvy::Error),
}

fn default_send_endpoint() -> String {
    DEFAULT_SEND_ENDPOINT.to_owned()
}

fn default_balance_endpoint() -> String {
    DEFAULT_BALANCE_ENDPOINT.to_owned()
}

#[derive(Clone, Deserialize)]
/// Settings handed to [`crate::BulkSmsClient`] and [`crate::SmsDraft`] at construction.
///
/// Deserializable from any serde format; endpoints fall back to the public 1s2u API.
pub struct GatewayConfig {
    pub username: String,
    pub password: String,
    #[serde(default = "default_send_endpoint")]
    pub send_endpoint: String,
    #[serde(default = "default_balance_endpoint")]
    pub balance_endpoint: String,
}

impl GatewayConfig {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            send_endpoint: default_send_endpoint(),
            balance_endpoint: default_balance_endpoint(),
        }
    }

    /// Read the configuration from the process environment, loading a `.env` file first if one
    /// exists.
    ///
    /// `BULKSMS_USERNAME` and `BULKSMS_PASSWORD` are required; `BULKSMS_SEND_ENDPOINT` and
    /// `BULKSMS_BALANCE_ENDPOINT` are optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        check_dotenv(dotenvy::dotenv())?;
        Self::from_lookup(|key| env::var(key))
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Result<String, env::VarError>,
    {
        let required = |key: &'static str| match lookup(key) {
            Ok(value) => Ok(value),
            Err(env::VarError::NotPresent) => Err(ConfigError::MissingVar(key)),
            Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode(key)),
        };
        let optional = |key: &'static str, fallback: fn() -> String| match lookup(key) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            Ok(_) | Err(env::VarError::NotPresent) => Ok(fallback()),
            Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode(key)),
        };

        Ok(Self {
            username: required(USERNAME_VAR)?,
            password: required(PASSWORD_VAR)?,
            send_endpoint: optional(SEND_ENDPOINT_VAR, default_send_endpoint)?,
            balance_endpoint: optional(BALANCE_ENDPOINT_VAR, default_balance_endpoint)?,
        })
    }

    /// Validate the configured username and password.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        Ok(Credentials::new(&self.username, &self.password)?)
    }
}

/// A missing `.env` file is fine; an unreadable or malformed one is not.
fn check_dotenv(loaded: Result<PathBuf, dotenvy::Error>) -> Result<(), ConfigError> {
    match loaded {
        Ok(_) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(ConfigError::DotEnv(err)),
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .field("send_endpoint", &self.send_endpoint)
            .field("balance_endpoint", &self.balance_endpoint)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io;

    use super::*;

    fn lookup_from(
        vars: &[(&'static str, &'static str)],
    ) -> impl Fn(&'static str) -> Result<String, env::VarError> {
        let vars = vars.iter().copied().collect::<HashMap<_, _>>();
        move |key| {
            vars.get(key)
                .map(|value| (*value).to_owned())
                .ok_or(env::VarError::NotPresent)
        }
    }

    #[test]
    fn from_lookup_reads_required_and_defaults_optional() {
        let config = GatewayConfig::from_lookup(lookup_from(&[
            (USERNAME_VAR, "tester1"),
            (PASSWORD_VAR, "secret1"),
            (SEND_ENDPOINT_VAR, "  "),
        ]))
        .unwrap();
        assert_eq!(config.username, "tester1");
        assert_eq!(config.password, "secret1");
        assert_eq!(config.send_endpoint, DEFAULT_SEND_ENDPOINT);
        assert_eq!(config.balance_endpoint, DEFAULT_BALANCE_ENDPOINT);
    }

    #[test]
    fn from_lookup_applies_endpoint_overrides() {
        let config = GatewayConfig::from_lookup(lookup_from(&[
            (USERNAME_VAR, "tester1"),
            (PASSWORD_VAR, "secret1"),
            (SEND_ENDPOINT_VAR, "https://example.invalid/bulksms"),
            (BALANCE_ENDPOINT_VAR, "https://example.invalid/checkbalance"),
        ]))
        .unwrap();
        assert_eq!(config.send_endpoint, "https://example.invalid/bulksms");
        assert_eq!(config.balance_endpoint, "https://example.invalid/checkbalance");
    }

    #[test]
    fn from_lookup_reports_missing_credentials() {
        let err = GatewayConfig::from_lookup(lookup_from(&[(USERNAME_VAR, "tester1")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(PASSWORD_VAR)));
    }

    #[test]
    fn missing_dotenv_file_is_ignored() {
        let missing = dotenvy::Error::Io(io::Error::from(io::ErrorKind::NotFound));
        assert!(check_dotenv(Err(missing)).is_ok());
        assert!(check_dotenv(Ok(PathBuf::from(".env"))).is_ok());
    }

    #[test]
    fn malformed_dotenv_file_is_reported() {
        let malformed = dotenvy::Error::LineParse("BULKSMS_USERNAME tester1".to_owned(), 16);
        assert!(matches!(
            check_dotenv(Err(malformed)),
            Err(ConfigError::DotEnv(dotenvy::Error::LineParse(..)))
        ));

        let denied = dotenvy::Error::Io(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(
            check_dotenv(Err(denied)),
            Err(ConfigError::DotEnv(dotenvy::Error::Io(_)))
        ));
    }

    #[test]
    fn deserializes_with_default_endpoints() {
        let config: GatewayConfig =
            serde_json::from_str(r#"{ "username": "tester1", "password": "secret1" }"#).unwrap();
        assert_eq!(config.send_endpoint, DEFAULT_SEND_ENDPOINT);
        assert!(config.credentials().is_ok());
    }

    #[test]
    fn credentials_are_validated() {
        let config = GatewayConfig::new("tester 1", "secret1");
        assert!(matches!(
            config.credentials(),
            Err(ConfigError::Credentials(ValidationError::InvalidCharacter { .. }))
        ));
    }

    #[test]
    fn debug_redacts_password() {
        let config = GatewayConfig::new("tester1", "secret1");
        let rendered = format!("{config:?}");
        assert!(rendered.contains("tester1"));
        assert!(!rendered.contains("secret1"));
    }
}
