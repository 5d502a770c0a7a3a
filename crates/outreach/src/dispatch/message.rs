//! Fully resolved outbound messages and the personalization builders.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::OutreachError;
use crate::ingest::RawRecord;
use crate::template::{render, ContactPayload};

/// An attachment as accepted on the wire: base64 content plus an optional
/// content type (guessed from the filename when absent).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentPayload {
    pub filename: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// A message ready for the mail transport. Either `text` or `html` (or both)
/// must be present for the message to be sendable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutboundMessage {
    pub to: String,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<AttachmentPayload>,
}

impl OutboundMessage {
    pub fn has_content(&self) -> bool {
        self.text.is_some() || self.html.is_some()
    }

    /// Boundary validation: recipient, subject, and some content must be
    /// present before any transport work starts.
    pub fn ensure_sendable(&self) -> Result<(), OutreachError> {
        if self.to.trim().is_empty() || self.subject.trim().is_empty() || !self.has_content() {
            return Err(OutreachError::Validation(
                "Missing required email fields: to, subject, and content (text or html)"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// An outbound message plus the contact identity it was rendered for, kept
/// so outcomes and log entries can name the recipient.
#[derive(Debug, Clone)]
pub struct PersonalizedMessage {
    pub message: OutboundMessage,
    pub contact_name: Option<String>,
    pub contact_company: Option<String>,
}

/// Renders subject and body templates for every contact. A contact that
/// cannot be personalized (no email address) is dropped from the outbound
/// set; it never fails the batch.
pub fn build_personalized(
    subject_template: &str,
    body_template: &str,
    contacts: &[ContactPayload],
    custom: &BTreeMap<String, String>,
    from: Option<&str>,
    reply_to: Option<&str>,
) -> Vec<PersonalizedMessage> {
    contacts
        .iter()
        .enumerate()
        .filter_map(|(index, contact)| {
            let Some(email) = contact.person.email.as_deref().map(str::trim) else {
                debug!("Skipping contact {} without an email address", index);
                return None;
            };
            if email.is_empty() {
                debug!("Skipping contact {} without an email address", index);
                return None;
            }

            let company = contact.company_context();
            let subject = render(subject_template, &contact.person, &company, custom);
            let body = render(body_template, &contact.person, &company, custom);

            Some(PersonalizedMessage {
                message: OutboundMessage {
                    to: email.to_string(),
                    subject,
                    html: Some(text_to_html(&body)),
                    text: Some(body),
                    from: from.map(str::to_string),
                    reply_to: reply_to.map(str::to_string),
                    attachments: Vec::new(),
                },
                contact_name: contact.display_name(),
                contact_company: contact.display_company(),
            })
        })
        .collect()
}

/// The lightweight file-driven path: each uploaded row fills `{name}`,
/// `{company}`, and `{email}` by literal replacement, no synonym table and
/// no bracket syntax. Rows without a recognizable email column are skipped.
pub fn build_from_rows(
    subject_template: &str,
    body_template: &str,
    rows: &[RawRecord],
) -> Vec<PersonalizedMessage> {
    const EMAIL_KEYS: [&str; 5] = ["email", "Email", "email_address", "Email Address", "to"];
    const NAME_KEYS: [&str; 4] = ["name", "Name", "first_name", "First Name"];
    const COMPANY_KEYS: [&str; 4] = ["company", "Company", "organization", "Organization"];

    rows.iter()
        .filter_map(|row| {
            let email = row_value(row, &EMAIL_KEYS)?.trim().to_string();
            if email.is_empty() {
                return None;
            }
            let name = row_value(row, &NAME_KEYS).unwrap_or("Sir/Madam").trim();
            let company = row_value(row, &COMPANY_KEYS).unwrap_or_default().trim();

            let body = body_template
                .replace("{name}", name)
                .replace("{company}", company)
                .replace("{email}", &email);
            let subject = subject_template
                .replace("{name}", name)
                .replace("{company}", company);

            Some(PersonalizedMessage {
                message: OutboundMessage {
                    to: email,
                    subject,
                    html: Some(text_to_html(&body)),
                    text: Some(body),
                    ..OutboundMessage::default()
                },
                contact_name: Some(name.to_string()).filter(|n| !n.is_empty()),
                contact_company: Some(company.to_string()).filter(|c| !c.is_empty()),
            })
        })
        .collect()
}

fn row_value<'a>(row: &'a RawRecord, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| row.get(*key).map(String::as_str))
}

/// Plain-text body to minimal HTML, the way the composer preview does it.
pub fn text_to_html(text: &str) -> String {
    text.replace('\n', "<br>")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(email: Option<&str>, first_name: &str, company: &str) -> ContactPayload {
        let mut payload: ContactPayload = serde_json::from_value(serde_json::json!({
            "firstName": first_name,
            "company": company,
        }))
        .unwrap();
        payload.person.email = email.map(str::to_string);
        payload
    }

    #[test]
    fn validation_requires_recipient_subject_and_content() {
        let mut message = OutboundMessage {
            to: "a@b.com".to_string(),
            subject: "Hello".to_string(),
            ..OutboundMessage::default()
        };
        assert!(message.ensure_sendable().is_err());

        message.text = Some("body".to_string());
        assert!(message.ensure_sendable().is_ok());

        message.to = String::new();
        assert!(message.ensure_sendable().is_err());
    }

    #[test]
    fn personalization_renders_subject_and_body() {
        let contacts = vec![contact(Some("ana@acme.io"), "Ana", "Acme")];
        let messages = build_personalized(
            "Intro for {{companyName}}",
            "Hi {{firstName}},\nwelcome.",
            &contacts,
            &BTreeMap::new(),
            Some("sender@example.com"),
            None,
        );
        assert_eq!(messages.len(), 1);
        let built = &messages[0];
        assert_eq!(built.message.to, "ana@acme.io");
        assert_eq!(built.message.subject, "Intro for Acme");
        assert_eq!(built.message.text.as_deref(), Some("Hi Ana,\nwelcome."));
        assert_eq!(built.message.html.as_deref(), Some("Hi Ana,<br>welcome."));
        assert_eq!(built.message.from.as_deref(), Some("sender@example.com"));
        assert_eq!(built.contact_name.as_deref(), Some("Ana"));
        assert_eq!(built.contact_company.as_deref(), Some("Acme"));
    }

    #[test]
    fn contacts_without_email_are_dropped_not_fatal() {
        let contacts = vec![
            contact(None, "NoMail", "Acme"),
            contact(Some("keep@acme.io"), "Keep", "Acme"),
            contact(Some("  "), "Blank", "Acme"),
        ];
        let messages = build_personalized(
            "S",
            "B",
            &contacts,
            &BTreeMap::new(),
            None,
            None,
        );
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].message.to, "keep@acme.io");
    }

    #[test]
    fn file_driven_rows_use_literal_single_brace_keys() {
        let rows = vec![
            [
                ("Email".to_string(), "a@b.com".to_string()),
                ("Name".to_string(), "Jane".to_string()),
                ("Company".to_string(), "Acme".to_string()),
            ]
            .into_iter()
            .collect::<RawRecord>(),
            // No email column: skipped.
            [("Name".to_string(), "Ghost".to_string())]
                .into_iter()
                .collect::<RawRecord>(),
        ];

        let messages = build_from_rows("Hello {name}", "Dear {name} at {company} ({email})", &rows);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].message.subject, "Hello Jane");
        assert_eq!(
            messages[0].message.text.as_deref(),
            Some("Dear Jane at Acme (a@b.com)")
        );
    }

    #[test]
    fn file_driven_rows_default_the_salutation() {
        let rows = vec![[("email".to_string(), "a@b.com".to_string())]
            .into_iter()
            .collect::<RawRecord>()];
        let messages = build_from_rows("Hi {name}", "{name}", &rows);
        assert_eq!(messages[0].message.subject, "Hi Sir/Madam");
    }
}
