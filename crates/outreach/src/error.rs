use std::path::PathBuf;
use thiserror::Error;

use crate::secrets::SecretError;

#[derive(Error, Debug)]
pub enum OutreachError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Prospect API error: {0}")]
    Prospect(#[from] ProspectError),

    #[error("Secret error: {0}")]
    Secret(#[from] SecretError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("SMTP credentials not found: configure user and password, or set SMTP_USER and SMTP_PASS")]
    MissingCredentials,

    #[error("No SMTP host configured")]
    MissingHost,

    #[error("Invalid SMTP settings: {message}")]
    Invalid { message: String },

    #[error("Failed to resolve SMTP password: {0}")]
    Secret(#[from] SecretError),

    #[error("Config store error: {0}")]
    Store(#[from] StoreError),
}

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Unsupported file format: {0}. Supported formats: .csv, .xlsx, .xls")]
    UnsupportedFormat(String),

    #[error("Failed to read file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse delimited text: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to decode spreadsheet: {0}")]
    Sheet(String),

    #[error("Nothing to export")]
    EmptyExport,

    #[error("CSV export failed: {0}")]
    Export(String),
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Email service is not properly configured")]
    NotConfigured,

    #[error("Invalid email address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Failed to build message: {0}")]
    BuildMessage(String),

    #[error("Invalid attachment '{filename}': {reason}")]
    InvalidAttachment { filename: String, reason: String },

    #[error("SMTP send failed: {0}")]
    Send(String),

    #[error("SMTP configuration check failed: {0}")]
    Verify(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse store JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Account already exists: {0}")]
    DuplicateAccount(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Credential encryption failed: {0}")]
    Secret(#[from] SecretError),
}

#[derive(Error, Debug)]
pub enum ProspectError {
    #[error("Prospect API key is not configured")]
    MissingApiKey,

    #[error("Prospect API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Prospect API returned status {status}: {message}")]
    Api { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, OutreachError>;
