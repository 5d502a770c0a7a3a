//! SMTP delivery configuration.
//!
//! Settings come from the shared config file when one has been saved, with a
//! fallback to `SMTP_*` environment variables so a fresh deployment can send
//! mail before anyone touches the configuration screen.

pub mod schema;
pub mod store;

pub use schema::SmtpSettings;
pub use store::EmailConfigStore;
