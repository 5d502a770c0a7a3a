//! Account records with hashed passwords and per-account SMTP settings.
//!
//! Passwords are stored as argon2 PHC strings. The SMTP password inside an
//! account's settings is sealed with the credential cipher before it touches
//! disk and opened again on read.

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::SmtpSettings;
use crate::error::StoreError;
use crate::secrets::CredentialCipher;
use crate::store::json::{read_json_file, write_json_file};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AccountRecord {
    /// Argon2 PHC hash of the account password.
    password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    config: Option<SmtpSettings>,
}

pub struct AccountStore {
    path: PathBuf,
    cipher: CredentialCipher,
}

impl AccountStore {
    pub fn new(path: impl Into<PathBuf>, cipher: CredentialCipher) -> Self {
        Self {
            path: path.into(),
            cipher,
        }
    }

    /// Creates a new account. Fails if one already exists for the email.
    pub fn register(
        &self,
        email: &str,
        password: &str,
        config: Option<SmtpSettings>,
    ) -> Result<(), StoreError> {
        let mut accounts = self.load()?;
        if accounts.contains_key(email) {
            return Err(StoreError::DuplicateAccount(email.to_string()));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| StoreError::PasswordHash(e.to_string()))?
            .to_string();

        let config = config.map(|c| self.seal_config(c)).transpose()?;
        accounts.insert(
            email.to_string(),
            AccountRecord {
                password: hash,
                config,
            },
        );
        write_json_file(&self.path, &accounts)
    }

    /// Verifies the password and returns the account's SMTP settings with the
    /// stored password opened again.
    pub fn login(&self, email: &str, password: &str) -> Result<Option<SmtpSettings>, StoreError> {
        let accounts = self.load()?;
        let record = accounts
            .get(email)
            .ok_or_else(|| StoreError::AccountNotFound(email.to_string()))?;

        let parsed = PasswordHash::new(&record.password)
            .map_err(|e| StoreError::PasswordHash(e.to_string()))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| StoreError::InvalidCredentials)?;

        record
            .config
            .clone()
            .map(|c| self.open_config(c))
            .transpose()
    }

    pub fn config(&self, email: &str) -> Result<Option<SmtpSettings>, StoreError> {
        let accounts = self.load()?;
        let record = accounts
            .get(email)
            .ok_or_else(|| StoreError::AccountNotFound(email.to_string()))?;
        record
            .config
            .clone()
            .map(|c| self.open_config(c))
            .transpose()
    }

    pub fn set_config(&self, email: &str, config: SmtpSettings) -> Result<(), StoreError> {
        let mut accounts = self.load()?;
        let record = accounts
            .get_mut(email)
            .ok_or_else(|| StoreError::AccountNotFound(email.to_string()))?;
        record.config = Some(self.seal_config(config)?);
        write_json_file(&self.path, &accounts)
    }

    fn load(&self) -> Result<BTreeMap<String, AccountRecord>, StoreError> {
        read_json_file(&self.path)
    }

    fn seal_config(&self, mut config: SmtpSettings) -> Result<SmtpSettings, StoreError> {
        if let Some(pass) = config.pass.take() {
            config.pass = Some(self.cipher.seal(&pass)?);
        }
        Ok(config)
    }

    fn open_config(&self, mut config: SmtpSettings) -> Result<SmtpSettings, StoreError> {
        if let Some(pass) = config.pass.take() {
            config.pass = Some(self.cipher.open(&pass)?);
        }
        Ok(config)
    }
}
