use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::secrets::{resolve_secret, SecretError};

fn default_port() -> u16 {
    587
}

/// SMTP connection and sender settings.
///
/// The password can be given directly (`pass`), as a file path (`passFile`),
/// or as the name of an environment variable (`passEnvVar`), tried in that
/// order. When settings are persisted, the direct password is sealed by the
/// store before it reaches disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    /// `true` selects an implicit-TLS connection, `false` STARTTLS.
    pub secure: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass_env_var: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_port(),
            secure: false,
            user: None,
            pass: None,
            pass_file: None,
            pass_env_var: None,
            from: None,
            reply_to: None,
        }
    }
}

impl SmtpSettings {
    /// Builds settings from `SMTP_*` environment variables.
    pub fn from_env() -> Self {
        let user = std::env::var("SMTP_USER").ok().filter(|v| !v.is_empty());
        Self {
            host: std::env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_port),
            secure: std::env::var("SMTP_SECURE").as_deref() == Ok("true"),
            from: std::env::var("SMTP_FROM")
                .ok()
                .filter(|v| !v.is_empty())
                .or_else(|| user.clone()),
            user,
            pass: std::env::var("SMTP_PASS").ok().filter(|v| !v.is_empty()),
            pass_file: None,
            pass_env_var: None,
            reply_to: std::env::var("SMTP_REPLY_TO").ok().filter(|v| !v.is_empty()),
        }
    }

    pub fn has_host(&self) -> bool {
        !self.host.trim().is_empty()
    }

    /// The effective sender address: `from` when set, else the SMTP user.
    pub fn sender(&self) -> Option<&str> {
        self.from.as_deref().or(self.user.as_deref())
    }

    /// Resolves the SMTP password from its configured source.
    pub fn resolve_password(&self) -> Result<SecretString, ConfigError> {
        resolve_secret(
            self.pass.as_deref(),
            self.pass_file.as_deref(),
            self.pass_env_var.as_deref(),
        )
        .map_err(|e| match e {
            SecretError::NoSourceProvided => ConfigError::MissingCredentials,
            other => ConfigError::Secret(other),
        })
    }

    /// Checks that enough is configured to attempt a send. Fails fast before
    /// any transport work begins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.has_host() {
            return Err(ConfigError::MissingHost);
        }
        if self.user.as_deref().map_or(true, |u| u.is_empty()) {
            return Err(ConfigError::MissingCredentials);
        }
        self.resolve_password().map(|_| ())
    }
}
