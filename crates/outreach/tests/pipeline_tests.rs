//! End-to-end pipeline tests: decode an uploaded list, normalize it, render
//! a template per contact, dispatch through a scripted transport, and log
//! the outcomes.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

use outreach::contacts::{normalize, FieldMapping};
use outreach::dispatch::{
    build_personalized, dispatch_all, MailTransport, OutboundMessage, SendReceipt,
};
use outreach::error::TransportError;
use outreach::ingest::decode_delimited;
use outreach::store::{LogEntry, LogStore, SendKind};
use outreach::template::ContactPayload;
use tempfile::TempDir;

/// Transport double: records every accepted message and fails on addresses
/// containing "bounce".
#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<OutboundMessage>>,
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<SendReceipt, TransportError> {
        if message.to.contains("bounce") {
            return Err(TransportError::Send("mailbox unavailable".to_string()));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(SendReceipt {
            message_id: Some(format!("<{}@test>", self.sent.lock().unwrap().len())),
            response: "250 OK".to_string(),
        })
    }

    async fn verify(&self) -> Result<(), TransportError> {
        Ok(())
    }
}

const UPLOAD: &str = "\
E-Mail,Full Name,Organization,Job Title
ana@acme.io,Ana Lima,Acme,CTO
bounce@gone.example,Bo Unce,Gone,CEO
,No Email,Acme,Analyst
carla@initech.com,Carla Reyes,Initech,VP Engineering
";

#[tokio::test]
async fn upload_to_outcome_log() {
    // Ingest and normalize. The row without an email survives normalization
    // (it has a full name) but is dropped at personalization time.
    let records = decode_delimited(UPLOAD.as_bytes()).unwrap();
    assert_eq!(records.len(), 4);
    let contacts = normalize(&records, &FieldMapping::default());
    assert_eq!(contacts.len(), 4);

    // Personalize.
    let payloads: Vec<ContactPayload> = contacts.iter().map(ContactPayload::from).collect();
    let mut custom = BTreeMap::new();
    custom.insert("Event_Name".to_string(), "DevSummit".to_string());

    let personalized = build_personalized(
        "Invitation to [Event_Name] for {{companyName}}",
        "Hi {{firstName}},\n{{companyName}} would be a great fit for [Event_Name].",
        &payloads,
        &custom,
        Some("events@host.example"),
        None,
    );
    assert_eq!(personalized.len(), 3, "contact without email is dropped");

    // Dispatch sequentially through the scripted transport.
    let transport = RecordingTransport::default();
    let messages: Vec<OutboundMessage> =
        personalized.iter().map(|p| p.message.clone()).collect();
    let report = dispatch_all(&transport, &messages, Duration::ZERO).await;

    assert_eq!(report.results.len(), 3);
    assert_eq!(report.success_count, 2);
    assert_eq!(report.failure_count, 1);
    assert!(report.results[0].success);
    assert!(!report.results[1].success);
    assert!(report.results[2].success);

    // Rendering used both syntaxes and the custom key.
    let delivered = transport.sent.lock().unwrap();
    assert_eq!(delivered[0].subject, "Invitation to DevSummit for Acme");
    assert_eq!(
        delivered[0].text.as_deref(),
        Some("Hi Ana,\nAcme would be a great fit for DevSummit.")
    );
    assert_eq!(
        delivered[0].html.as_deref(),
        Some("Hi Ana,<br>Acme would be a great fit for DevSummit.")
    );

    // Forward outcomes into the log store, annotated with contact identity.
    let dir = TempDir::new().unwrap();
    let log_store = LogStore::new(dir.path().join("logs.json"));
    let entries: Vec<LogEntry> = report
        .results
        .iter()
        .map(|outcome| {
            let built = &personalized[outcome.index];
            LogEntry::new(SendKind::Personalized, outcome.clone())
                .with_contact(built.contact_name.clone(), built.contact_company.clone())
        })
        .collect();
    log_store.append_all(entries).unwrap();

    let logs = log_store.list().unwrap();
    assert_eq!(logs.len(), 3);
    assert_eq!(logs[0].contact_name.as_deref(), Some("Ana Lima"));
    assert_eq!(logs[0].contact_company.as_deref(), Some("Acme"));
    assert!(logs[1].outcome.error.is_some());
    assert!(logs.iter().all(|entry| entry.kind == SendKind::Personalized));
}

#[tokio::test]
async fn outcome_indices_follow_the_input_batch() {
    let transport = RecordingTransport::default();
    let messages: Vec<OutboundMessage> = (0..5)
        .map(|i| OutboundMessage {
            to: if i == 2 {
                "bounce@example.com".to_string()
            } else {
                format!("ok{}@example.com", i)
            },
            subject: format!("Subject {}", i),
            text: Some("Body".to_string()),
            ..OutboundMessage::default()
        })
        .collect();

    let report = dispatch_all(&transport, &messages, Duration::ZERO).await;
    assert_eq!(report.results.len(), 5);
    for (i, outcome) in report.results.iter().enumerate() {
        assert_eq!(outcome.index, i);
        assert_eq!(outcome.subject, format!("Subject {}", i));
    }
    assert_eq!(report.success_count, 4);
    assert_eq!(report.failure_count, 1);
}
