//! The mail transport seam.
//!
//! `MailTransport` is the injection point: production uses `SmtpMailer` over
//! lettre, tests substitute their own implementation. A mailer is built from
//! settings once and then treated as immutable; reconfiguration means
//! building a new mailer, never mutating a live one.

use async_trait::async_trait;
use base64::Engine;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use log::{debug, info};
use secrecy::ExposeSecret;
use uuid::Uuid;

use crate::config::SmtpSettings;
use crate::dispatch::message::OutboundMessage;
use crate::error::{ConfigError, TransportError};

/// What the transport reports for one accepted message.
#[derive(Debug, Clone)]
pub struct SendReceipt {
    pub message_id: Option<String>,
    pub response: String,
}

/// Async mail delivery plus a configuration check.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: &OutboundMessage) -> Result<SendReceipt, TransportError>;

    /// Checks that the transport is usable (connects and authenticates)
    /// without sending anything.
    async fn verify(&self) -> Result<(), TransportError>;
}

/// SMTP delivery over lettre's async transport.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    default_from: Mailbox,
    default_reply_to: Option<Mailbox>,
}

impl SmtpMailer {
    /// Builds a mailer from settings. `secure` selects an implicit-TLS
    /// connection; otherwise STARTTLS is used. Fails fast on missing
    /// credentials or unparseable addresses.
    pub fn from_settings(settings: &SmtpSettings) -> Result<Self, ConfigError> {
        settings.validate()?;

        let user = settings
            .user
            .clone()
            .ok_or(ConfigError::MissingCredentials)?;
        let password = settings.resolve_password()?;

        let builder = if settings.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
        }
        .map_err(|e| ConfigError::Invalid {
            message: format!("Failed to set up SMTP relay for '{}': {}", settings.host, e),
        })?;

        let transport = builder
            .port(settings.port)
            .credentials(Credentials::new(
                user,
                password.expose_secret().to_string(),
            ))
            .build();

        let from_raw = settings.sender().ok_or(ConfigError::MissingCredentials)?;
        let default_from = parse_mailbox(from_raw).map_err(|e| ConfigError::Invalid {
            message: e.to_string(),
        })?;
        let default_reply_to = settings
            .reply_to
            .as_deref()
            .map(parse_mailbox)
            .transpose()
            .map_err(|e| ConfigError::Invalid {
                message: e.to_string(),
            })?;

        info!(
            "SMTP mailer configured for {}:{} ({})",
            settings.host,
            settings.port,
            if settings.secure { "tls" } else { "starttls" }
        );

        Ok(Self {
            transport,
            default_from,
            default_reply_to,
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, message: &OutboundMessage) -> Result<SendReceipt, TransportError> {
        let (email, message_id) =
            build_email(message, &self.default_from, self.default_reply_to.as_ref())?;

        debug!("Submitting message {} to {}", message_id, message.to);
        let response = self
            .transport
            .send(email)
            .await
            .map_err(|e| TransportError::Send(e.to_string()))?;

        let detail = response.message().collect::<Vec<_>>().join(" ");
        Ok(SendReceipt {
            message_id: Some(message_id),
            response: format!("{} {}", response.code(), detail).trim().to_string(),
        })
    }

    async fn verify(&self) -> Result<(), TransportError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(TransportError::Verify(
                "SMTP server rejected the connection check".to_string(),
            )),
            Err(e) => Err(TransportError::Verify(e.to_string())),
        }
    }
}

fn parse_mailbox(raw: &str) -> Result<Mailbox, TransportError> {
    raw.parse::<Mailbox>()
        .map_err(|e| TransportError::InvalidAddress {
            address: raw.to_string(),
            reason: e.to_string(),
        })
}

/// Assembles the lettre message: a text/html alternative body, wrapped in a
/// mixed part when attachments are present. Returns the minted message id so
/// outcomes can reference it.
fn build_email(
    message: &OutboundMessage,
    default_from: &Mailbox,
    default_reply_to: Option<&Mailbox>,
) -> Result<(Message, String), TransportError> {
    let to = parse_mailbox(&message.to)?;
    let from = match message.from.as_deref() {
        Some(raw) => parse_mailbox(raw)?,
        None => default_from.clone(),
    };
    let reply_to = match message.reply_to.as_deref() {
        Some(raw) => Some(parse_mailbox(raw)?),
        None => default_reply_to.cloned(),
    };

    let message_id = format!("<{}@outreach>", Uuid::new_v4());
    let mut builder = Message::builder()
        .from(from)
        .to(to)
        .subject(message.subject.clone())
        .message_id(Some(message_id.clone()));
    if let Some(reply_to) = reply_to {
        builder = builder.reply_to(reply_to);
    }

    let mut body: Option<MultiPart> = None;
    if let Some(text) = &message.text {
        let part = SinglePart::builder()
            .header(ContentType::TEXT_PLAIN)
            .body(text.clone());
        body = Some(MultiPart::alternative().singlepart(part));
    }
    if let Some(html) = &message.html {
        let part = SinglePart::builder()
            .header(ContentType::TEXT_HTML)
            .body(html.clone());
        body = Some(match body {
            Some(multipart) => multipart.singlepart(part),
            None => MultiPart::alternative().singlepart(part),
        });
    }
    let body = body.ok_or_else(|| {
        TransportError::BuildMessage("Message has neither text nor html content".to_string())
    })?;

    let email = if message.attachments.is_empty() {
        builder.multipart(body)
    } else {
        let mut mixed = MultiPart::mixed().multipart(body);
        for attachment in &message.attachments {
            mixed = mixed.singlepart(build_attachment(attachment)?);
        }
        builder.multipart(mixed)
    }
    .map_err(|e| TransportError::BuildMessage(e.to_string()))?;

    Ok((email, message_id))
}

fn build_attachment(
    payload: &crate::dispatch::message::AttachmentPayload,
) -> Result<SinglePart, TransportError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(&payload.content)
        .map_err(|e| TransportError::InvalidAttachment {
            filename: payload.filename.clone(),
            reason: format!("content is not valid base64: {}", e),
        })?;

    let content_type = payload.content_type.clone().unwrap_or_else(|| {
        mime_guess::from_path(&payload.filename)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    });
    let content_type =
        ContentType::parse(&content_type).map_err(|e| TransportError::InvalidAttachment {
            filename: payload.filename.clone(),
            reason: format!("invalid content type '{}': {}", content_type, e),
        })?;

    Ok(Attachment::new(payload.filename.clone()).body(bytes, content_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::message::AttachmentPayload;

    fn settings() -> SmtpSettings {
        SmtpSettings {
            host: "smtp.example.com".to_string(),
            user: Some("sender@example.com".to_string()),
            pass: Some("app-password".to_string()),
            ..SmtpSettings::default()
        }
    }

    fn outbound() -> OutboundMessage {
        OutboundMessage {
            to: "ana@acme.io".to_string(),
            subject: "Hello".to_string(),
            text: Some("Hi".to_string()),
            html: Some("Hi".to_string()),
            ..OutboundMessage::default()
        }
    }

    #[test]
    fn mailer_requires_credentials() {
        let mut incomplete = settings();
        incomplete.pass = None;
        assert!(matches!(
            SmtpMailer::from_settings(&incomplete),
            Err(ConfigError::MissingCredentials)
        ));
        assert!(SmtpMailer::from_settings(&settings()).is_ok());
    }

    #[test]
    fn mailer_rejects_bad_sender_addresses() {
        let mut bad_from = settings();
        bad_from.from = Some("not an address".to_string());
        assert!(matches!(
            SmtpMailer::from_settings(&bad_from),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn build_email_requires_content() {
        let from = parse_mailbox("sender@example.com").unwrap();
        let mut message = outbound();
        message.text = None;
        message.html = None;
        assert!(matches!(
            build_email(&message, &from, None),
            Err(TransportError::BuildMessage(_))
        ));
    }

    #[test]
    fn build_email_mints_a_message_id() {
        let from = parse_mailbox("sender@example.com").unwrap();
        let (_, first) = build_email(&outbound(), &from, None).unwrap();
        let (_, second) = build_email(&outbound(), &from, None).unwrap();
        assert!(first.starts_with('<') && first.ends_with('>'));
        assert_ne!(first, second);
    }

    #[test]
    fn build_email_rejects_invalid_recipient() {
        let from = parse_mailbox("sender@example.com").unwrap();
        let mut message = outbound();
        message.to = "definitely not an email".to_string();
        assert!(matches!(
            build_email(&message, &from, None),
            Err(TransportError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn attachments_must_be_valid_base64() {
        let bad = AttachmentPayload {
            filename: "report.pdf".to_string(),
            content: "!!not base64!!".to_string(),
            content_type: None,
        };
        assert!(matches!(
            build_attachment(&bad),
            Err(TransportError::InvalidAttachment { .. })
        ));

        let good = AttachmentPayload {
            filename: "report.pdf".to_string(),
            content: base64::engine::general_purpose::STANDARD.encode(b"%PDF-1.4"),
            content_type: None,
        };
        assert!(build_attachment(&good).is_ok());
    }
}
