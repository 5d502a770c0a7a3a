pub mod config;
pub mod contacts;
pub mod dispatch;
pub mod error;
pub mod ingest;
pub mod prospects;
pub mod secrets;
pub mod store;
pub mod template;

pub use config::{EmailConfigStore, SmtpSettings};
pub use contacts::{normalize, CanonicalField, Contact, FieldMapping};
pub use dispatch::{
    build_from_rows, build_personalized, dispatch_all, DispatchOutcome, DispatchReport,
    MailTransport, OutboundMessage, PersonalizedMessage, SendReceipt, SmtpMailer,
};
pub use error::{
    ConfigError, IngestError, OutreachError, ProspectError, Result, StoreError, TransportError,
};
pub use ingest::RawRecord;
pub use prospects::ProspectClient;
pub use secrets::{resolve_secret, CredentialCipher, SecretError};
pub use store::{AccountStore, LogEntry, LogStore, MessageTemplate, SendKind, TemplateStore};
pub use template::{render, CompanyContext, ContactPayload, PersonContext};
