//! Fire-and-forget TLS line sender.
//!
//! `SecureSender::send` validates its input on the caller's task and
//! spawns one background task per message. That task connects, writes
//! `payload + "\n"`, flushes, notifies the sink and then closes the
//! connection, in that order. Transport errors become a
//! `SendOutcome::Failure`; close errors are only logged.

use std::future::Future;
use std::sync::Arc;

use rustls::ClientConfig;
use tokio::io::AsyncWrite;
use tokio_rustls::TlsConnector;
use tracing::{debug, error, info, trace, warn};

use crate::error::{ConfigError, PhaseError, TransportError};
use crate::message::{Notification, SendOutcome};
use crate::network::{Destination, SecureConnection, TlsSettings};
use crate::sink::ResultSink;
use crate::state::SendPhase;
use crate::task::SendTask;

// ── SecureSender ─────────────────────────────────────────────────

/// Sends single text lines over fresh TLS connections.
///
/// Holds only the immutable TLS client configuration, so it is cheap to
/// clone and every send is independent of every other.
#[derive(Clone)]
pub struct SecureSender {
    connector: TlsConnector,
}

impl SecureSender {
    pub fn new(config: Arc<ClientConfig>) -> Self {
        Self {
            connector: TlsConnector::from(config),
        }
    }

    pub fn from_settings(settings: &TlsSettings) -> Result<Self, ConfigError> {
        Ok(Self::new(settings.client_config()?))
    }

    /// Send `payload` to `host:port` in the background.
    ///
    /// - Empty `host` or `port`: returns `Ok(None)`; nothing is spawned
    ///   and no notification is delivered.
    /// - `port` not a valid `u16`: returns `ConfigError::InvalidPort`.
    /// - Otherwise spawns exactly one task and returns its handle. The
    ///   sink, if any, receives exactly one `Notification`.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn send<S: ResultSink>(
        &self,
        sink: Option<S>,
        host: &str,
        port: &str,
        payload: &str,
    ) -> Result<Option<SendTask>, ConfigError> {
        let Some(dest) = parse_destination(host, port)? else {
            return Ok(None);
        };

        info!(destination = %dest, bytes = payload.len(), "dispatching message");
        trace!(payload, "message payload");

        let connector = self.connector.clone();
        let payload = payload.to_owned();
        let task_dest = dest.clone();
        let task = SendTask::spawn(dest, async move {
            let open = SecureConnection::open(&task_dest, &connector);
            transmit(&task_dest, &payload, open, sink).await;
        });
        Ok(Some(task))
    }
}

/// Validate a host/port pair.
///
/// Returns `Ok(None)` when either is empty.
pub fn parse_destination(host: &str, port: &str) -> Result<Option<Destination>, ConfigError> {
    if host.is_empty() || port.is_empty() {
        debug!(host, port, "empty destination; nothing to send");
        return Ok(None);
    }
    let port = port.parse::<u16>().map_err(|source| ConfigError::InvalidPort {
        value: port.to_string(),
        source,
    })?;
    Ok(Some(Destination::new(host, port)))
}

// ── Background exchange ──────────────────────────────────────────

fn step(phase: &mut SendPhase, transition: fn(&mut SendPhase) -> Result<(), PhaseError>) {
    if let Err(e) = transition(phase) {
        error!("{e}");
    }
}

fn notify<K: ResultSink>(sink: Option<K>, dest: &Destination, outcome: SendOutcome) {
    match sink {
        Some(sink) => sink.deliver(Notification::transmission_status(outcome)),
        None => debug!(destination = %dest, %outcome, "no result sink; outcome discarded"),
    }
}

/// Run one exchange: open, write, notify, close.
///
/// `open` is awaited here, so the connect happens inside the
/// `Connecting` phase.
async fn transmit<S, K, F>(dest: &Destination, payload: &str, open: F, sink: Option<K>)
where
    S: AsyncWrite + Unpin,
    K: ResultSink,
    F: Future<Output = Result<SecureConnection<S>, TransportError>>,
{
    let mut phase = SendPhase::default();
    let mut conn = None;

    step(&mut phase, SendPhase::begin_connect);
    let written = match open.await {
        Ok(opened) => {
            let opened = conn.insert(opened);
            step(&mut phase, SendPhase::begin_write);
            opened.write_line(payload).await
        }
        Err(e) => Err(e),
    };

    let outcome = match written {
        Ok(()) => {
            step(&mut phase, SendPhase::succeed);
            info!(destination = %dest, "message sent");
            SendOutcome::Success
        }
        Err(e) => {
            step(&mut phase, SendPhase::fail);
            warn!(destination = %dest, "send failed: {e}");
            SendOutcome::Failure(e.to_string())
        }
    };
    notify(sink, dest, outcome);

    step(&mut phase, SendPhase::begin_close);
    if let Some(conn) = conn {
        if let Err(e) = conn.close().await {
            warn!(destination = %dest, "failed to release connection: {e}");
        }
    }
    step(&mut phase, SendPhase::finish);
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::pin::Pin;
    use std::sync::{Arc, Mutex};
    use std::task::{Context, Poll};

    use super::*;
    use crate::message::SUCCESS_TEXT;
    use crate::sink::{Callback, status_channel};

    /// In-memory stream with switchable write and shutdown failures.
    #[derive(Clone, Default)]
    struct MockStream {
        written: Arc<Mutex<Vec<u8>>>,
        shutdowns: Arc<Mutex<usize>>,
        fail_write: bool,
        fail_shutdown: bool,
    }

    impl AsyncWrite for MockStream {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            if self.fail_write {
                return Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer gone")));
            }
            self.written.lock().unwrap().extend_from_slice(buf);
            Poll::Ready(Ok(buf.len()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            *self.shutdowns.lock().unwrap() += 1;
            if self.fail_shutdown {
                return Poll::Ready(Err(io::Error::other("close exploded")));
            }
            Poll::Ready(Ok(()))
        }
    }

    fn dest() -> Destination {
        Destination::new("127.0.0.1", 8443)
    }

    fn collecting_sink() -> (Arc<Mutex<Vec<Notification>>>, Callback<impl FnOnce(Notification) + Send + 'static>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Callback({
            let seen = Arc::clone(&seen);
            move |n: Notification| seen.lock().unwrap().push(n)
        });
        (seen, sink)
    }

    #[test]
    fn empty_host_or_port_is_a_no_op() {
        assert!(parse_destination("", "8443").unwrap().is_none());
        assert!(parse_destination("127.0.0.1", "").unwrap().is_none());
        assert!(parse_destination("", "").unwrap().is_none());
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        for bad in ["abc", "-1", " 80", "65536", "8443x"] {
            let err = parse_destination("127.0.0.1", bad).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidPort { .. }), "{bad}");
        }
    }

    #[test]
    fn valid_destination() {
        let d = parse_destination("example.com", "443").unwrap().unwrap();
        assert_eq!(d.host(), "example.com");
        assert_eq!(d.port(), 443);
    }

    #[tokio::test]
    async fn success_writes_line_then_closes_once() {
        let stream = MockStream::default();
        let (tx, mut rx) = status_channel();

        let open = async { Ok(SecureConnection::new(stream.clone())) };
        transmit(&dest(), "PING", open, Some(tx)).await;

        let n = rx.recv().await.unwrap();
        assert!(n.is_success());
        assert_eq!(n.data, SUCCESS_TEXT);
        assert!(rx.recv().await.is_none());
        assert_eq!(stream.written.lock().unwrap().as_slice(), b"PING\n");
        assert_eq!(*stream.shutdowns.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn close_failure_keeps_single_success() {
        let stream = MockStream {
            fail_shutdown: true,
            ..Default::default()
        };
        let (seen, sink) = collecting_sink();

        let open = async { Ok(SecureConnection::new(stream.clone())) };
        transmit(&dest(), "PING", open, Some(sink)).await;

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].is_success());
        assert_eq!(*stream.shutdowns.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn write_failure_reports_and_still_closes() {
        let stream = MockStream {
            fail_write: true,
            ..Default::default()
        };
        let (seen, sink) = collecting_sink();

        let open = async { Ok(SecureConnection::new(stream.clone())) };
        transmit(&dest(), "PING", open, Some(sink)).await;

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(!seen[0].is_success());
        assert!(seen[0].data.contains("peer gone"));
        assert_eq!(*stream.shutdowns.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn connect_failure_reports_description() {
        let (seen, sink) = collecting_sink();

        let open = async {
            Err::<SecureConnection<MockStream>, _>(TransportError::Connect {
                addr: dest().to_string(),
                source: io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"),
            })
        };
        transmit(&dest(), "PING", open, Some(sink)).await;

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        match &seen[0].outcome {
            SendOutcome::Failure(desc) => assert!(desc.contains("connection refused")),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_sink_still_closes() {
        let stream = MockStream::default();
        let open = async { Ok(SecureConnection::new(stream.clone())) };
        transmit::<_, Callback<fn(Notification)>, _>(&dest(), "", open, None).await;

        assert_eq!(stream.written.lock().unwrap().as_slice(), b"\n");
        assert_eq!(*stream.shutdowns.lock().unwrap(), 1);
    }
}
