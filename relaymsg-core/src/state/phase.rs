//! Per-send lifecycle state machine.
//!
//! Every accepted `send` call walks one `SendPhase` from `Idle` to
//! `Done`. Transitions are validated and return `Result` instead of
//! panicking.

use crate::error::PhaseError;

// ── SendPhase ────────────────────────────────────────────────────

/// The current phase of a single transmission.
///
/// ```text
///  Idle ──► Connecting ──► Writing ──► Succeeded ──┐
///               │             │                    ▼
///               └─────────────┴──────► Failed ──► Closing ──► Done
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendPhase {
    /// Task spawned, nothing attempted yet.
    #[default]
    Idle,

    /// TCP connect and TLS handshake in progress.
    Connecting,

    /// Payload and line terminator are being written and flushed.
    Writing,

    /// Payload flushed to the network.
    Succeeded,

    /// Connect, handshake or write failed.
    Failed,

    /// Releasing the writer and the socket.
    Closing,

    /// Terminal.
    Done,
}

impl SendPhase {
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Connecting => "Connecting",
            Self::Writing => "Writing",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Closing => "Closing",
            Self::Done => "Done",
        }
    }

    /// Returns `true` once the outcome is known.
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Closing | Self::Done)
    }

    fn advance(&mut self, to: SendPhase, valid: bool) -> Result<(), PhaseError> {
        if !valid {
            return Err(PhaseError {
                from: self.name(),
                to: to.name(),
            });
        }
        tracing::trace!(from = self.name(), to = to.name(), "send phase");
        *self = to;
        Ok(())
    }

    // ── Transitions ──────────────────────────────────────────────

    /// Valid from: `Idle`.
    pub fn begin_connect(&mut self) -> Result<(), PhaseError> {
        let valid = matches!(self, Self::Idle);
        self.advance(Self::Connecting, valid)
    }

    /// Valid from: `Connecting`.
    pub fn begin_write(&mut self) -> Result<(), PhaseError> {
        let valid = matches!(self, Self::Connecting);
        self.advance(Self::Writing, valid)
    }

    /// Valid from: `Writing`.
    pub fn succeed(&mut self) -> Result<(), PhaseError> {
        let valid = matches!(self, Self::Writing);
        self.advance(Self::Succeeded, valid)
    }

    /// Valid from: `Connecting`, `Writing`.
    pub fn fail(&mut self) -> Result<(), PhaseError> {
        let valid = matches!(self, Self::Connecting | Self::Writing);
        self.advance(Self::Failed, valid)
    }

    /// Valid from: `Succeeded`, `Failed`.
    pub fn begin_close(&mut self) -> Result<(), PhaseError> {
        let valid = matches!(self, Self::Succeeded | Self::Failed);
        self.advance(Self::Closing, valid)
    }

    /// Valid from: `Closing`.
    pub fn finish(&mut self) -> Result<(), PhaseError> {
        let valid = matches!(self, Self::Closing);
        self.advance(Self::Done, valid)
    }
}

impl std::fmt::Display for SendPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
