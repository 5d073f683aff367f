//! Outcome and notification types delivered back to the caller.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status text carried by a success notification.
pub const SUCCESS_TEXT: &str = "message sent successfully";

/// Prefix of the status text carried by a failure notification.
pub const FAILURE_PREFIX: &str = "send failed: ";

// ── NotificationKind ─────────────────────────────────────────────

/// Tag identifying what a `Notification` reports on.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    /// Result of one transmission attempt.
    TransmissionStatus = 0x1,
}

impl NotificationKind {
    pub fn code(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationKind::TransmissionStatus => write!(f, "TransmissionStatus"),
        }
    }
}

// ── SendOutcome ──────────────────────────────────────────────────

/// Result of a single transmission, produced exactly once per task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum SendOutcome {
    Success,
    /// Carries the description of the underlying I/O error.
    Failure(String),
}

impl SendOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SendOutcome::Success)
    }

    /// Human-readable status line for this outcome.
    pub fn status_text(&self) -> String {
        match self {
            SendOutcome::Success => SUCCESS_TEXT.to_string(),
            SendOutcome::Failure(desc) => format!("{FAILURE_PREFIX}{desc}"),
        }
    }
}

impl fmt::Display for SendOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.status_text())
    }
}

// ── Notification ─────────────────────────────────────────────────

/// The message handed to a `ResultSink` when a transmission settles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    /// Status text: `SUCCESS_TEXT`, or `FAILURE_PREFIX` plus the error.
    pub data: String,
    pub outcome: SendOutcome,
}

impl Notification {
    pub fn transmission_status(outcome: SendOutcome) -> Self {
        Self {
            kind: NotificationKind::TransmissionStatus,
            data: outcome.status_text(),
            outcome,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

impl From<SendOutcome> for Notification {
    fn from(outcome: SendOutcome) -> Self {
        Notification::transmission_status(outcome)
    }
}
