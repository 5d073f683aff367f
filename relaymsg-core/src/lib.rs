//! # relaymsg-core
//!
//! Fire-and-forget delivery of single text lines over TLS.
//!
//! This crate contains:
//! - **Sender**: `SecureSender`, which validates a destination and spawns
//!   one connect / write / close task per message
//! - **Network**: `Destination`, `SecureConnection` and `TlsSettings`
//!   (rustls client configuration with platform trust roots)
//! - **Message**: `SendOutcome` and the `Notification` handed back
//! - **Sink**: `ResultSink`, the one-shot channel back to the caller
//! - **State**: `SendPhase`, the per-send lifecycle
//! - **Error**: `ConfigError`, `TransportError`, `CleanupError`

pub mod error;
pub mod message;
pub mod network;
pub mod sender;
pub mod sink;
pub mod state;
pub mod task;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use error::{CleanupError, ConfigError, PhaseError, TransportError};
pub use message::{FAILURE_PREFIX, Notification, NotificationKind, SUCCESS_TEXT, SendOutcome};
pub use network::{Destination, SecureConnection, TlsSettings};
pub use sender::{SecureSender, parse_destination};
pub use sink::{Callback, ResultSink, StatusReceiver, StatusSender, status_channel};
pub use state::SendPhase;
pub use task::SendTask;
