//! Outbound message construction and throttled bulk delivery.
//!
//! The dispatcher is strictly sequential. The downstream SMTP relay and most
//! provider rate limits are not safe under concurrent submission from one
//! sender, so messages go out one at a time with a fixed pause between them.
//! A failed send is recorded in its slot and never stops the rest of the
//! batch.

pub mod dispatcher;
pub mod message;
pub mod transport;

pub use dispatcher::{dispatch_all, DispatchOutcome, DispatchReport};
pub use message::{
    build_from_rows, build_personalized, AttachmentPayload, OutboundMessage, PersonalizedMessage,
};
pub use transport::{MailTransport, SendReceipt, SmtpMailer};
