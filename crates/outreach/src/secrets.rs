//! Secret resolution and at-rest credential encryption.
//!
//! SMTP passwords can be supplied three ways, tried in priority order:
//! a direct value, a file path (Docker secrets pattern), or the name of an
//! environment variable. Passwords persisted to the flat-file stores are
//! never written in the clear; they are sealed with AES-256-GCM using a
//! fresh random nonce per record.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::Engine;
use secrecy::SecretString;
use std::fs;

/// Error type for secret resolution and credential sealing failures.
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("No secret source provided (need one of: direct value, file path, or env var name)")]
    NoSourceProvided,

    #[error("Failed to read secret from file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Environment variable '{name}' not set")]
    EnvVarNotSet { name: String },

    #[error("Environment variable '{name}' contains invalid UTF-8")]
    EnvVarNotUnicode { name: String },

    #[error("Encryption error: {0}")]
    EncryptionError(String),

    #[error("Decryption error: {0}")]
    DecryptionError(String),

    #[error("Invalid encryption key: {0}")]
    InvalidKey(String),
}

pub type Result<T> = std::result::Result<T, SecretError>;

/// Resolves a secret from multiple sources in priority order: direct value,
/// then file contents, then environment variable. Empty strings are treated
/// as "not provided".
pub fn resolve_secret(
    direct: Option<&str>,
    file_path: Option<&str>,
    env_var: Option<&str>,
) -> Result<SecretString> {
    if let Some(value) = direct {
        if !value.is_empty() {
            return Ok(SecretString::from(value.to_string()));
        }
    }

    if let Some(path) = file_path {
        if !path.is_empty() {
            return match fs::read_to_string(path) {
                Ok(content) => Ok(SecretString::from(content.trim().to_string())),
                Err(e) => Err(SecretError::FileReadError {
                    path: path.to_string(),
                    source: e,
                }),
            };
        }
    }

    if let Some(name) = env_var {
        if !name.is_empty() {
            return match std::env::var(name) {
                // Env vars may carry trailing newlines from shell exports.
                Ok(value) => Ok(SecretString::from(value.trim())),
                Err(std::env::VarError::NotPresent) => Err(SecretError::EnvVarNotSet {
                    name: name.to_string(),
                }),
                Err(std::env::VarError::NotUnicode(_)) => Err(SecretError::EnvVarNotUnicode {
                    name: name.to_string(),
                }),
            };
        }
    }

    Err(SecretError::NoSourceProvided)
}

/// Encryption key environment variable name.
pub const CREDENTIAL_KEY_ENV_VAR: &str = "OUTREACH_CREDENTIAL_KEY";

/// Nonce size for AES-256-GCM (96 bits = 12 bytes).
const NONCE_SIZE: usize = 12;

/// Seals and opens stored credentials with AES-256-GCM.
///
/// The key is a 64-character hex string (32 bytes), normally read from the
/// `OUTREACH_CREDENTIAL_KEY` environment variable. Ciphertext is encoded as
/// base64 over `<12-byte nonce><ciphertext>`; the nonce is random per call,
/// so sealing the same plaintext twice yields different ciphertexts.
#[derive(Clone)]
pub struct CredentialCipher {
    cipher: Aes256Gcm,
}

impl CredentialCipher {
    /// Creates a cipher from the `OUTREACH_CREDENTIAL_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let key_hex = std::env::var(CREDENTIAL_KEY_ENV_VAR).map_err(|_| {
            SecretError::InvalidKey(format!(
                "Environment variable {} not set",
                CREDENTIAL_KEY_ENV_VAR
            ))
        })?;

        Self::from_hex_key(key_hex.trim())
    }

    /// Creates a cipher from a 64-character hex key (32 bytes decoded).
    pub fn from_hex_key(key_hex: &str) -> Result<Self> {
        let key_bytes = decode_hex(key_hex)
            .map_err(|e| SecretError::InvalidKey(format!("Invalid hex key: {}", e)))?;

        if key_bytes.len() != 32 {
            return Err(SecretError::InvalidKey(format!(
                "Key must be 32 bytes (64 hex chars), got {} bytes",
                key_bytes.len()
            )));
        }

        let cipher = Aes256Gcm::new_from_slice(&key_bytes)
            .map_err(|e| SecretError::InvalidKey(format!("Failed to create cipher: {}", e)))?;

        Ok(Self { cipher })
    }

    /// Seals plaintext and returns base64 of `<nonce><ciphertext>`.
    pub fn seal(&self, plaintext: &str) -> Result<String> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        getrandom::getrandom(&mut nonce_bytes).map_err(|e| {
            SecretError::EncryptionError(format!("Failed to generate random nonce: {}", e))
        })?;
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| SecretError::EncryptionError(e.to_string()))?;

        let mut combined = nonce_bytes.to_vec();
        combined.extend(ciphertext);

        Ok(base64::engine::general_purpose::STANDARD.encode(combined))
    }

    /// Opens base64 ciphertext (with prepended nonce) back to plaintext.
    pub fn open(&self, sealed: &str) -> Result<String> {
        let combined = base64::engine::general_purpose::STANDARD
            .decode(sealed)
            .map_err(|e| SecretError::DecryptionError(format!("Invalid base64: {}", e)))?;

        if combined.len() < NONCE_SIZE {
            return Err(SecretError::DecryptionError(
                "Ciphertext too short".to_string(),
            ));
        }

        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|e| SecretError::DecryptionError(e.to_string()))?;

        String::from_utf8(plaintext)
            .map_err(|e| SecretError::DecryptionError(format!("Invalid UTF-8: {}", e)))
    }
}

/// Decodes a hex string to bytes.
fn decode_hex(hex: &str) -> std::result::Result<Vec<u8>, String> {
    if hex.len() % 2 != 0 {
        return Err("Hex string must have even length".to_string());
    }

    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| format!("Invalid hex at position {}: {}", i, e))
        })
        .collect()
}
