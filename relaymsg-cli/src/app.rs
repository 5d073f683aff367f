//! Dispatching messages and reporting their notifications.
//!
//! This is the caller side of the sender: it owns the receiving end of
//! the status channel and prints notifications as they arrive.

use std::io::Write;

use futures::future::join_all;
use tracing::{info, warn};

use relaymsg_core::{ConfigError, Notification, SecureSender, status_channel};

/// Summary of one `relay_all` run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Report {
    pub sent: usize,
    pub failed: usize,
    /// No destination configured; nothing was attempted.
    pub skipped: bool,
}

impl Report {
    pub fn all_sent(&self) -> bool {
        !self.skipped && self.failed == 0
    }
}

/// Render one notification as an output line.
pub fn render(n: &Notification, json: bool) -> String {
    if json {
        serde_json::to_string(n).unwrap_or_else(|_| n.data.clone())
    } else {
        n.data.clone()
    }
}

/// Send every message with its own `send` call, then print each
/// notification as it arrives and wait for all tasks to end.
pub async fn relay_all<W: Write>(
    sender: &SecureSender,
    host: &str,
    port: &str,
    messages: &[String],
    out: &mut W,
    json: bool,
) -> Result<Report, ConfigError> {
    let mut report = Report::default();
    let (tx, mut rx) = status_channel();

    let mut tasks = Vec::with_capacity(messages.len());
    for message in messages {
        match sender.send(Some(tx.clone()), host, port, message)? {
            Some(task) => tasks.push(task),
            None => {
                warn!("no destination configured; nothing sent");
                report.skipped = true;
                return Ok(report);
            }
        }
    }
    drop(tx);
    info!("dispatched {} message(s)", tasks.len());

    while let Some(n) = rx.recv().await {
        if n.is_success() {
            report.sent += 1;
        } else {
            report.failed += 1;
        }
        if let Err(e) = writeln!(out, "{}", render(&n, json)) {
            warn!("failed to write status: {e}");
        }
    }

    for finished in join_all(tasks.into_iter().map(|t| t.join())).await {
        if !finished {
            report.failed += 1;
        }
    }
    Ok(report)
}
