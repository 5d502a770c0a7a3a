//! Sequential throttled delivery with per-message outcome capture.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use crate::dispatch::message::OutboundMessage;
use crate::dispatch::transport::MailTransport;

/// The result of one dispatch attempt. `index` is the message's position in
/// the input batch; output order always matches input order. Immutable once
/// created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchOutcome {
    pub index: usize,
    pub to: String,
    pub subject: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything a caller needs to report a batch: the per-message outcomes in
/// input order plus the two counters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReport {
    pub results: Vec<DispatchOutcome>,
    pub success_count: usize,
    pub failure_count: usize,
}

/// Sends messages strictly one at a time, in input order.
///
/// After every send except the last the task suspends for `delay`,
/// regardless of whether that send succeeded. A transport failure is
/// captured into that message's outcome and the batch continues; the whole
/// batch always runs to completion. No retries, no deduplication, no cap on
/// batch size, and no cancellation once started.
pub async fn dispatch_all(
    transport: &dyn MailTransport,
    messages: &[OutboundMessage],
    delay: Duration,
) -> DispatchReport {
    let total = messages.len();
    let mut results = Vec::with_capacity(total);
    let mut success_count = 0;
    let mut failure_count = 0;

    for (index, message) in messages.iter().enumerate() {
        match transport.send(message).await {
            Ok(receipt) => {
                success_count += 1;
                info!(
                    to = %message.to,
                    position = index + 1,
                    total,
                    "message sent"
                );
                results.push(DispatchOutcome {
                    index,
                    to: message.to.clone(),
                    subject: message.subject.clone(),
                    success: true,
                    message_id: receipt.message_id,
                    error: None,
                });
            }
            Err(e) => {
                failure_count += 1;
                warn!(
                    to = %message.to,
                    position = index + 1,
                    total,
                    error = %e,
                    "message failed"
                );
                results.push(DispatchOutcome {
                    index,
                    to: message.to.clone(),
                    subject: message.subject.clone(),
                    success: false,
                    message_id: None,
                    error: Some(e.to_string()),
                });
            }
        }

        if index + 1 < total && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    DispatchReport {
        results,
        success_count,
        failure_count,
    }
}
