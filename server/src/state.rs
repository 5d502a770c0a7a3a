//! Shared application state.

use std::path::PathBuf;
use std::sync::Arc;

use log::{info, warn};
use tokio::sync::RwLock;

use outreach::config::{EmailConfigStore, SmtpSettings};
use outreach::dispatch::SmtpMailer;
use outreach::error::{ConfigError, TransportError};
use outreach::prospects::ProspectClient;
use outreach::secrets::CredentialCipher;
use outreach::store::{AccountStore, LogStore, TemplateStore};

use crate::auth::AuthKeys;
use crate::error::ApiError;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config_store: EmailConfigStore,
    pub template_store: TemplateStore,
    pub log_store: LogStore,
    pub account_store: AccountStore,
    pub prospects: ProspectClient,
    pub auth: AuthKeys,

    /// The live mailer handle. Built once from configuration and swapped
    /// wholesale on reconfigure; a live mailer is never mutated.
    mailer: RwLock<Option<SmtpMailer>>,
}

/// The default data directory, beside the user's other application data.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("outreach")
}

impl AppState {
    pub fn new(
        data_dir: PathBuf,
        cipher: CredentialCipher,
        auth: AuthKeys,
        prospects: ProspectClient,
    ) -> Self {
        let config_store =
            EmailConfigStore::new(data_dir.join("email_config.json"), cipher.clone());
        let template_store = TemplateStore::new(data_dir.join("email_templates.json"));
        let log_store = LogStore::new(data_dir.join("email_logs.json"));
        let account_store = AccountStore::new(data_dir.join("users.json"), cipher);

        Self {
            config_store,
            template_store,
            log_store,
            account_store,
            prospects,
            auth,
            mailer: RwLock::new(None),
        }
    }

    /// Builds the initial mailer from the saved config or the environment.
    /// A failure here is logged, not fatal: the server can run unconfigured
    /// and report it per request.
    pub async fn init_mailer(&self) {
        match self.build_mailer() {
            Ok(mailer) => {
                *self.mailer.write().await = Some(mailer);
                info!("SMTP mailer ready");
            }
            Err(e) => {
                warn!("SMTP mailer not configured yet: {}", e);
            }
        }
    }

    fn build_mailer(&self) -> Result<SmtpMailer, ConfigError> {
        let settings = self.config_store.load_or_env()?;
        SmtpMailer::from_settings(&settings)
    }

    /// Swaps in a mailer built from the given settings. The old handle stays
    /// valid for sends already in flight.
    pub async fn reconfigure_mailer(&self, settings: &SmtpSettings) -> Result<(), ConfigError> {
        let mailer = SmtpMailer::from_settings(settings)?;
        *self.mailer.write().await = Some(mailer);
        info!("SMTP mailer reconfigured");
        Ok(())
    }

    /// A clone of the current mailer, or a configuration error when none has
    /// been set up. Cloning keeps the read lock short; the transport shares
    /// its connection pool internally.
    pub async fn mailer(&self) -> Result<SmtpMailer, ApiError> {
        self.mailer
            .read()
            .await
            .clone()
            .ok_or_else(|| ApiError::from(TransportError::NotConfigured))
    }

}
