//! Error types for relaymsg.
//!
//! Only `ConfigError` ever reaches the caller as a hard failure.
//! `TransportError` is folded into a `SendOutcome::Failure` inside the
//! background task, and `CleanupError` is logged and dropped.

use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

// ── ConfigError ──────────────────────────────────────────────────

/// Errors detected synchronously, before any task is spawned.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The destination port is not a valid `u16`.
    #[error("invalid port {value:?}: {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// A CA bundle could not be read or parsed.
    #[error("failed to load CA file {path}: {source}")]
    CaFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CA bundle was readable but held no certificates.
    #[error("no certificates found in {0}")]
    NoCertificates(PathBuf),

    /// The trust store ended up empty.
    #[error("no trust roots available")]
    NoTrustRoots,

    /// rustls rejected the client configuration.
    #[error("tls configuration error: {0}")]
    Tls(#[from] rustls::Error),
}

// ── TransportError ───────────────────────────────────────────────

/// Failures of the connect / handshake / write sequence.
#[derive(Debug, Error)]
pub enum TransportError {
    /// TCP connect (including name resolution) failed.
    #[error("connect to {addr} failed: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The host cannot be used as a TLS server name.
    #[error("invalid server name {0:?}")]
    ServerName(String),

    /// The TLS handshake did not complete.
    #[error("tls handshake failed: {0}")]
    Handshake(#[source] std::io::Error),

    /// Writing or flushing the payload failed.
    #[error("write failed: {0}")]
    Write(#[source] std::io::Error),
}

// ── CleanupError ─────────────────────────────────────────────────

/// Failure while releasing a connection. Never surfaced to callers.
#[derive(Debug, Error)]
pub enum CleanupError {
    #[error("close failed: {0}")]
    Close(#[from] std::io::Error),
}

// ── PhaseError ───────────────────────────────────────────────────

/// An invalid `SendPhase` transition.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid phase transition: {from} -> {to}")]
pub struct PhaseError {
    pub from: &'static str,
    pub to: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_port_mentions_value() {
        let source = "abc".parse::<u16>().unwrap_err();
        let e = ConfigError::InvalidPort {
            value: "abc".into(),
            source,
        };
        assert!(e.to_string().contains("\"abc\""));
    }

    #[test]
    fn transport_error_keeps_io_description() {
        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let e = TransportError::Connect {
            addr: "127.0.0.1:1".into(),
            source: io_err,
        };
        let text = e.to_string();
        assert!(text.contains("127.0.0.1:1"));
        assert!(text.contains("refused"));
    }

    #[test]
    fn cleanup_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe broke");
        let e: CleanupError = io_err.into();
        assert!(matches!(e, CleanupError::Close(_)));
    }
}
