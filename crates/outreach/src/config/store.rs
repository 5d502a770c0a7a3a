use std::path::PathBuf;

use crate::config::SmtpSettings;
use crate::error::ConfigError;
use crate::secrets::CredentialCipher;
use crate::store::json::{read_json_file, write_json_file};

/// Flat-file store for the shared SMTP configuration.
///
/// The direct password is sealed before it is written and opened on read, so
/// the JSON document on disk never contains it in the clear.
pub struct EmailConfigStore {
    path: PathBuf,
    cipher: CredentialCipher,
}

impl EmailConfigStore {
    pub fn new(path: impl Into<PathBuf>, cipher: CredentialCipher) -> Self {
        Self {
            path: path.into(),
            cipher,
        }
    }

    /// Returns the saved settings, or `None` when nothing usable has been
    /// saved yet (no file, or a file without a host).
    pub fn read(&self) -> Result<Option<SmtpSettings>, ConfigError> {
        let mut settings: SmtpSettings = read_json_file(&self.path).map_err(ConfigError::Store)?;
        if !settings.has_host() {
            return Ok(None);
        }
        if let Some(pass) = settings.pass.take() {
            settings.pass = Some(self.cipher.open(&pass)?);
        }
        Ok(Some(settings))
    }

    pub fn save(&self, mut settings: SmtpSettings) -> Result<(), ConfigError> {
        if let Some(pass) = settings.pass.take() {
            settings.pass = Some(self.cipher.seal(&pass)?);
        }
        write_json_file(&self.path, &settings).map_err(ConfigError::Store)
    }

    /// The settings sends should use: the saved configuration when present,
    /// else the `SMTP_*` environment fallback.
    pub fn load_or_env(&self) -> Result<SmtpSettings, ConfigError> {
        Ok(self.read()?.unwrap_or_else(SmtpSettings::from_env))
    }
}
