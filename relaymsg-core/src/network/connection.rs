use std::fmt;
use std::net::IpAddr;

use rustls::pki_types::ServerName;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;

use crate::error::{CleanupError, TransportError};

/// Validated destination of a send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    host: String,
    port: u16,
}

impl Destination {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.host.parse::<IpAddr>() {
            Ok(IpAddr::V6(_)) => write!(f, "[{}]:{}", self.host, self.port),
            _ => write!(f, "{}:{}", self.host, self.port),
        }
    }
}

/// A TLS stream behind a buffered writer, owned by exactly one send task.
///
/// `close` consumes the connection, so it can run at most once; if it
/// never runs (panic, runtime shutdown) dropping the value still
/// releases the socket.
pub struct SecureConnection<S = TlsStream<TcpStream>> {
    writer: BufWriter<S>,
}

impl SecureConnection {
    /// TCP connect to `dest`, then run the TLS handshake using the
    /// destination host as server name.
    pub async fn open(dest: &Destination, connector: &TlsConnector) -> Result<Self, TransportError> {
        let server_name = ServerName::try_from(dest.host().to_string())
            .map_err(|_| TransportError::ServerName(dest.host().to_string()))?;

        let tcp = TcpStream::connect((dest.host(), dest.port()))
            .await
            .map_err(|source| TransportError::Connect {
                addr: dest.to_string(),
                source,
            })?;

        let tls = connector
            .connect(server_name, tcp)
            .await
            .map_err(TransportError::Handshake)?;

        Ok(Self::new(tls))
    }
}

impl<S: AsyncWrite + Unpin> SecureConnection<S> {
    pub fn new(stream: S) -> Self {
        Self {
            writer: BufWriter::new(stream),
        }
    }

    /// Write `line` and a single `\n` as UTF-8, then flush.
    pub async fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        self.writer
            .write_all(line.as_bytes())
            .await
            .map_err(TransportError::Write)?;
        self.writer
            .write_all(b"\n")
            .await
            .map_err(TransportError::Write)?;
        self.writer.flush().await.map_err(TransportError::Write)
    }

    /// Close the writer, then the stream beneath it, then release the
    /// socket. Both layers are closed even if the first one fails; the
    /// first error is returned.
    pub async fn close(self) -> Result<(), CleanupError> {
        let mut writer = self.writer;
        let flushed = writer.flush().await;

        // Unflushed bytes are discarded here.
        let mut stream = writer.into_inner();
        let shutdown = stream.shutdown().await;
        drop(stream);

        flushed.and(shutdown).map_err(CleanupError::from)
    }
}
